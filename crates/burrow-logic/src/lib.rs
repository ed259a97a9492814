//! Pure colony logic for Burrow.
//!
//! This crate holds every rule of the colony that doesn't need an engine:
//! the tile grid, pathfinding, item stacks, stockpiles and construction,
//! the task queue, colonist needs and skills, and the clock. Functions take
//! plain data and return results, so they can be unit-tested in isolation
//! and driven by any host.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`building`] | Build types, material costs, stockpiles, beds, construction gating |
//! | [`colonist`] | Needs decay, skills, traits, work/movement speed |
//! | [`config`] | Colony configuration and validation |
//! | [`constants`] | Tuning constants grouped by concern |
//! | [`grid`] | Tile matrix, walkability, designations, item slots |
//! | [`ids`] | Typed ids and the per-run id sequence |
//! | [`items`] | Item stacks, stacking rules, nearest-item search |
//! | [`pathfinding`] | 4-directional A* and the 8-directional adjacency query |
//! | [`tasks`] | Tasks, work times, the task queue |
//! | [`time`] | Day/hour/minute clock |

pub mod building;
pub mod colonist;
pub mod config;
pub mod constants;
pub mod grid;
pub mod ids;
pub mod items;
pub mod pathfinding;
pub mod tasks;
pub mod time;
