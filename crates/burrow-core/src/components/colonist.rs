//! Colonist components.
//!
//! Every colonist entity carries the full set below from the moment it is
//! spawned, so queries never need `Option` and the archetype never changes.
//! The needs, skills, trait and state types come straight from
//! `burrow_logic`.

use serde::{Deserialize, Serialize};

pub use burrow_logic::colonist::{ColonistState, Needs, Skills, Trait};
pub use burrow_logic::grid::Position;
use burrow_logic::ids::{ColonistId, TaskId};

/// Identity of a colonist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colonist {
    pub id: ColonistId,
    pub name: String,
    /// Spawn order. Systems visit colonists in this order every tick.
    pub seq: u32,
}

/// The task this colonist holds, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentTask(pub Option<TaskId>);

/// Route being walked. The first node is where the colonist stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub nodes: Vec<Position>,
}

impl Path {
    pub fn new(nodes: Vec<Position>) -> Self {
        Self { nodes }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether there is still at least one step to take.
    pub fn has_steps(&self) -> bool {
        self.nodes.len() > 1
    }

    /// The node after the current one.
    pub fn next_step(&self) -> Option<Position> {
        self.nodes.get(1).copied()
    }

    /// Drop the current node; the next one becomes current.
    pub fn advance(&mut self) {
        if !self.nodes.is_empty() {
            self.nodes.remove(0);
        }
    }
}

/// Seconds left before the next path step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveCooldown(pub f32);

/// Owned copy of one colonist's components, for readers outside the ECS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonistSnapshot {
    pub id: ColonistId,
    pub name: String,
    pub pos: Position,
    pub needs: Needs,
    pub skills: Skills,
    #[serde(rename = "trait")]
    pub trait_: Trait,
    pub state: ColonistState,
    pub current_task: Option<TaskId>,
    pub path: Vec<Position>,
}
