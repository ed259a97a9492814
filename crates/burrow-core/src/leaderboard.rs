//! Leaderboard of finished colonies
//!
//! A ranked list of at most [`MAX_ENTRIES`] runs, best score first and
//! longest-lived first among equal scores. The list itself is owned by
//! the host; this module only orders it and moves it in and out of JSON.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Entries kept after each insertion.
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub days_lived: u32,
    pub max_colonists: u32,
    pub tiles_built: u32,
    /// Free-form date supplied by the host.
    pub date: String,
}

/// Score for a run: days x10, peak population x100, builds x5,
/// stockpiled items x2.
pub fn calculate_score(
    days_lived: u32,
    max_colonists: u32,
    tiles_built: u32,
    items_stockpiled: u32,
) -> u32 {
    days_lived
        .saturating_mul(10)
        .saturating_add(max_colonists.saturating_mul(100))
        .saturating_add(tiles_built.saturating_mul(5))
        .saturating_add(items_stockpiled.saturating_mul(2))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries in any order; they are ranked and capped.
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.rank();
        board
    }

    /// Insert a run and return the ranked, capped list.
    pub fn add_entry(&mut self, entry: LeaderboardEntry) -> &[LeaderboardEntry] {
        log::info!("leaderboard entry {} scored {}", entry.name, entry.score);
        self.entries.push(entry);
        self.rank();
        &self.entries
    }

    fn rank(&mut self) {
        self.entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.days_lived.cmp(&a.days_lived))
        });
        self.entries.truncate(MAX_ENTRIES);
    }

    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-based rank a new score would take, or `None` when the board is
    /// full and the score beats nobody.
    pub fn would_rank(&self, score: u32) -> Option<usize> {
        let beaten = self.entries.iter().position(|e| score > e.score);
        match beaten {
            Some(index) => Some(index + 1),
            None if self.entries.len() < MAX_ENTRIES => Some(self.entries.len() + 1),
            None => None,
        }
    }

    /// 1-based rank of the first entry with exactly this score.
    pub fn rank_of(&self, score: u32) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.score == score)
            .map(|index| index + 1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    pub fn save<W: Write>(&self, writer: W) -> Result<(), LeaderboardError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load<R: Read>(reader: R) -> Result<Self, LeaderboardError> {
        let entries: Vec<LeaderboardEntry> = serde_json::from_reader(reader)?;
        Ok(Self::from_entries(entries))
    }
}

/// Errors that can occur moving a leaderboard in or out of storage
#[derive(Debug)]
pub enum LeaderboardError {
    Json(serde_json::Error),
}

impl From<serde_json::Error> for LeaderboardError {
    fn from(e: serde_json::Error) -> Self {
        LeaderboardError::Json(e)
    }
}

impl std::fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaderboardError::Json(e) => write!(f, "Leaderboard data error: {}", e),
        }
    }
}

impl std::error::Error for LeaderboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeaderboardError::Json(e) => Some(e),
        }
    }
}
