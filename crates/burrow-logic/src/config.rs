//! Colony configuration and validation.
//!
//! `ColonyConfig` gathers the knobs a host can turn before starting a
//! colony: map size, starting population, RNG seed, forage pacing, the
//! message log cap, and two behaviour switches:
//!
//! * `free_construction` lets a build finish even when the stockpiles
//!   can't pay for it.
//! * `strict_reassignment` makes claiming a task release whoever held it
//!   before, so no colonist keeps pointing at a task it no longer owns.
//!
//! [`validate_config`] reports every problem at once.

use serde::{Deserialize, Serialize};

use crate::constants::{forage, messages, world};

/// Smallest and largest accepted map side.
pub const MIN_WORLD_SIDE: i32 = 8;
pub const MAX_WORLD_SIDE: i32 = 512;

/// Starting colonists fill three columns downward from just above the map
/// centre; this many fit before the last row leaves the cleared area.
pub const MAX_STARTING_COLONISTS: u32 = 3 * (world::CLEARING_HALF as u32 + 1);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyConfig {
    pub width: i32,
    pub height: i32,
    pub starting_colonists: u32,
    pub seed: u64,
    /// Seconds between forage rolls.
    pub forage_interval: f32,
    /// Chance that a forage roll spawns food.
    pub forage_chance: f64,
    /// Random tiles tried per successful roll.
    pub forage_attempts: u32,
    /// Forage never spawns within this many tiles of the map edge.
    pub forage_margin: i32,
    pub max_messages: usize,
    pub free_construction: bool,
    pub strict_reassignment: bool,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            width: world::DEFAULT_WIDTH,
            height: world::DEFAULT_HEIGHT,
            starting_colonists: 3,
            seed: 12345,
            forage_interval: forage::INTERVAL_SECONDS,
            forage_chance: forage::CHANCE,
            forage_attempts: forage::ATTEMPTS,
            forage_margin: forage::MARGIN,
            max_messages: messages::MAX_MESSAGES,
            free_construction: true,
            strict_reassignment: true,
        }
    }
}

impl ColonyConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_colonists(mut self, count: u32) -> Self {
        self.starting_colonists = count;
        self
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Width outside the accepted range.
    InvalidWidth(i32),
    /// Height outside the accepted range.
    InvalidHeight(i32),
    /// A colony needs at least one colonist.
    NoColonists,
    /// More colonists than the starting clearing holds.
    TooManyColonists(u32),
    /// Forage chance outside 0..=1.
    InvalidForageChance(f64),
    /// Forage interval must be positive.
    InvalidForageInterval(f32),
    /// Forage margin leaves no tiles to spawn on.
    ForageMarginTooLarge(i32),
    /// The message log must keep at least one entry.
    ZeroMessageCap,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidWidth(w) => write!(
                f,
                "width {w} outside {MIN_WORLD_SIDE}..={MAX_WORLD_SIDE}"
            ),
            ConfigError::InvalidHeight(h) => write!(
                f,
                "height {h} outside {MIN_WORLD_SIDE}..={MAX_WORLD_SIDE}"
            ),
            ConfigError::NoColonists => write!(f, "at least one starting colonist is required"),
            ConfigError::TooManyColonists(n) => write!(
                f,
                "{n} starting colonists exceed the clearing capacity of {MAX_STARTING_COLONISTS}"
            ),
            ConfigError::InvalidForageChance(c) => {
                write!(f, "forage chance {c} outside 0..=1")
            }
            ConfigError::InvalidForageInterval(i) => {
                write!(f, "forage interval {i} must be positive")
            }
            ConfigError::ForageMarginTooLarge(m) => {
                write!(f, "forage margin {m} leaves no spawnable tiles")
            }
            ConfigError::ZeroMessageCap => write!(f, "message log cap must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate a colony configuration, returning all errors found.
pub fn validate_config(config: &ColonyConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let side_range = MIN_WORLD_SIDE..=MAX_WORLD_SIDE;
    if !side_range.contains(&config.width) {
        errors.push(ConfigError::InvalidWidth(config.width));
    }
    if !side_range.contains(&config.height) {
        errors.push(ConfigError::InvalidHeight(config.height));
    }
    if config.starting_colonists == 0 {
        errors.push(ConfigError::NoColonists);
    }
    if config.starting_colonists > MAX_STARTING_COLONISTS {
        errors.push(ConfigError::TooManyColonists(config.starting_colonists));
    }
    if !(0.0..=1.0).contains(&config.forage_chance) {
        errors.push(ConfigError::InvalidForageChance(config.forage_chance));
    }
    // Written so NaN fails too.
    if !(config.forage_interval > 0.0) {
        errors.push(ConfigError::InvalidForageInterval(config.forage_interval));
    }
    let band = config.forage_margin.max(0).saturating_mul(2);
    if config.forage_margin < 0 || band >= config.width || band >= config.height {
        errors.push(ConfigError::ForageMarginTooLarge(config.forage_margin));
    }
    if config.max_messages == 0 {
        errors.push(ConfigError::ZeroMessageCap);
    }

    errors
}
