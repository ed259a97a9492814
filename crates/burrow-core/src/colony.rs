//! Colony-wide state that lives outside the ECS world.
//!
//! Colonists are entities; the map, the task list, the stockpile and bed
//! registries, the id sequence, the message log and the running statistics
//! are plain data owned here and handed to systems by reference.

use serde::{Deserialize, Serialize};

use burrow_logic::building::{Bed, Stockpile};
use burrow_logic::grid::{Grid, Position};
use burrow_logic::ids::{BedId, IdSequence, StockpileId};
use burrow_logic::tasks::TaskQueue;

use crate::messages::MessageLog;

/// Running totals used for scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyStats {
    /// Largest living population seen.
    pub max_colonists: u32,
    /// Constructions completed.
    pub tiles_built: u32,
    /// Item units hauled into stockpiles.
    pub items_stockpiled: u32,
}

#[derive(Debug, Clone)]
pub struct Colony {
    pub grid: Grid,
    pub tasks: TaskQueue,
    pub stockpiles: Vec<Stockpile>,
    pub beds: Vec<Bed>,
    pub ids: IdSequence,
    pub messages: MessageLog,
    pub stats: ColonyStats,
}

impl Colony {
    pub fn new(grid: Grid, max_messages: usize) -> Self {
        Self {
            grid,
            tasks: TaskQueue::new(),
            stockpiles: Vec::new(),
            beds: Vec::new(),
            ids: IdSequence::new(),
            messages: MessageLog::new(max_messages),
            stats: ColonyStats::default(),
        }
    }

    /// Register a stockpile zone over `tiles`.
    pub fn add_stockpile(&mut self, tiles: Vec<Position>) -> StockpileId {
        let id = self.ids.next_stockpile();
        log::info!("{} created with {} tiles", id, tiles.len());
        self.stockpiles.push(Stockpile::new(id, tiles));
        id
    }

    pub fn add_bed(&mut self, pos: Position) -> BedId {
        let id = self.ids.next_bed();
        log::info!("{} placed at ({}, {})", id, pos.x, pos.y);
        self.beds.push(Bed::new(id, pos));
        id
    }

    /// Clear everything except the map.
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.stockpiles.clear();
        self.beds.clear();
        self.ids.reset();
        self.messages.clear();
        self.stats = ColonyStats::default();
    }
}
