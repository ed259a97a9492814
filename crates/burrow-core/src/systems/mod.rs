//! Systems - logic that operates on colonist components and colony state

mod roster;
mod needs;
mod death;
mod ai;
mod work;
mod forage;

pub use roster::*;
pub use needs::*;
pub use death::*;
pub use ai::*;
pub use work::*;
pub use forage::*;
