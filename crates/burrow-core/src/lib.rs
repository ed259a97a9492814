//! Burrow Core - Colony Simulation Engine
//!
//! An ECS-based simulation of a small underground colony: colonists dig,
//! chop, haul, cook, build, eat and sleep on a tile map while their needs
//! slowly run down.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Colonists
//! - **Components**: Pure data attached to entities (Position, Needs, Path, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Everything that isn't a colonist (map, tasks, stockpiles, beds, message
//! log, statistics) lives in [`colony::Colony`] next to the world. Each
//! tick runs needs, death, AI and work in that order, then an occasional
//! forage roll.
//!
//! # Example
//!
//! ```rust,no_run
//! use burrow_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new(ColonyConfig::default());
//! engine.start_game();
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//!     if engine.is_game_over() {
//!         break;
//!     }
//! }
//! ```

pub mod colony;
pub mod components;
pub mod engine;
pub mod events;
pub mod generation;
pub mod leaderboard;
pub mod messages;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{DesignMode, GameScreen, SimulationEngine};
    pub use crate::events::{ColonyEvent, EventSink};
    pub use burrow_logic::building::BuildType;
    pub use burrow_logic::config::ColonyConfig;
    pub use burrow_logic::tasks::TaskType;
}
