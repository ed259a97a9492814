//! Typed identifiers and the sequence that hands them out.
//!
//! Every id kind has its own counter inside one [`IdSequence`]; the
//! simulation owns the sequence and resets it when a new colony starts.
//! Ids start at 1 and never repeat within a run.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColonistId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StockpileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BedId(pub u32);

impl fmt::Display for ColonistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "colonist_{}", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

impl fmt::Display for StockpileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stockpile-{}", self.0)
    }
}

impl fmt::Display for BedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bed-{}", self.0)
    }
}

/// Per-kind id counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdSequence {
    colonist: u32,
    task: u32,
    stockpile: u32,
    bed: u32,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_colonist(&mut self) -> ColonistId {
        self.colonist += 1;
        ColonistId(self.colonist)
    }

    pub fn next_task(&mut self) -> TaskId {
        self.task += 1;
        TaskId(self.task)
    }

    pub fn next_stockpile(&mut self) -> StockpileId {
        self.stockpile += 1;
        StockpileId(self.stockpile)
    }

    pub fn next_bed(&mut self) -> BedId {
        self.bed += 1;
        BedId(self.bed)
    }

    /// Start every counter over. Only call at a colony-start boundary.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
