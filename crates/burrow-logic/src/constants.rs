//! Tuning constants — world size, need rates, work pacing, economy.
//!
//! Plain scalars grouped by concern. Per-enum tables (work times, build
//! costs, trait modifiers) are `match` expressions on the enums themselves
//! so adding a variant is a compile error until every table covers it.

pub mod world {
    pub const DEFAULT_WIDTH: i32 = 64;
    pub const DEFAULT_HEIGHT: i32 = 48;
    /// Rock border thickness around generated maps.
    pub const BORDER: i32 = 3;
    /// Half-size of the cleared grass square at the map centre.
    pub const CLEARING_HALF: i32 = 5;
    pub const TREE_DENSITY: f64 = 0.12;
}

pub mod time {
    pub const STARTING_DAY: u32 = 1;
    pub const STARTING_HOUR: u32 = 8;
    pub const DAY_START_HOUR: u32 = 6;
    pub const NIGHT_START_HOUR: u32 = 20;
    pub const MINUTES_PER_HOUR: f32 = 60.0;
    pub const HOURS_PER_DAY: u32 = 24;
}

pub mod needs {
    pub const MAX: f32 = 100.0;
    pub const HUNGER_DECAY: f32 = 0.5;
    pub const REST_DECAY: f32 = 0.3;
    pub const MOOD_DECAY: f32 = 0.1;
    /// Health lost per second while hunger sits at zero.
    pub const STARVATION_DAMAGE: f32 = 1.0;

    pub const THRESHOLD_GOOD: f32 = 75.0;
    pub const THRESHOLD_OKAY: f32 = 50.0;
    pub const THRESHOLD_BAD: f32 = 25.0;

    pub const STARTING_MOOD: f32 = 75.0;
    pub const MEAL_HUNGER_RESTORE: f32 = 50.0;
    pub const SLEEP_REST_PER_TICK: f32 = 2.0;
}

pub mod skills {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;
    /// Work-speed bonus per skill level on the relevant task.
    pub const BONUS_PER_LEVEL: f32 = 0.05;
}

pub mod work {
    /// Work ticks accrued per simulated second at speed 1.0.
    pub const TICKS_PER_SECOND: f32 = 10.0;
    /// Seconds between path steps at full movement speed.
    pub const MOVE_COOLDOWN: f32 = 0.1;
    pub const DEFAULT_PRIORITY: i32 = 5;
    pub const HAUL_PRIORITY: i32 = 8;
    pub const COOK_PRIORITY: i32 = 7;
    pub const EAT_PRIORITY: i32 = 10;
    pub const MIN_DESIGNATION_PRIORITY: i32 = 1;
    pub const MAX_DESIGNATION_PRIORITY: i32 = 9;
}

pub mod economy {
    pub const MAX_STACK: u32 = 99;
    pub const MINE_YIELD: u32 = 2;
    pub const CHOP_YIELD: u32 = 2;
}

pub mod forage {
    pub const INTERVAL_SECONDS: f32 = 60.0;
    pub const CHANCE: f64 = 0.3;
    pub const ATTEMPTS: u32 = 50;
    pub const MARGIN: i32 = 5;
}

pub mod messages {
    pub const MAX_MESSAGES: usize = 10;
}
