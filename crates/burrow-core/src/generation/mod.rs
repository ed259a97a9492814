//! Generation - procedural creation of terrain and colonists

mod world;
mod colonists;
mod names;

pub use world::*;
pub use colonists::*;
pub use names::*;
