//! Colony clock. One simulated second of `update` advances one minute.

use serde::{Deserialize, Serialize};

use crate::constants::time::{
    DAY_START_HOUR, HOURS_PER_DAY, MINUTES_PER_HOUR, NIGHT_START_HOUR, STARTING_DAY,
    STARTING_HOUR,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    pub day: u32,
    pub hour: u32,
    pub minute: f32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            day: STARTING_DAY,
            hour: STARTING_HOUR,
            minute: 0.0,
        }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `minutes`, rolling minutes into hours and hours into
    /// days. Returns the number of day boundaries crossed.
    pub fn advance(&mut self, minutes: f32) -> u32 {
        if minutes > 0.0 {
            self.minute += minutes;
        }
        while self.minute >= MINUTES_PER_HOUR {
            self.minute -= MINUTES_PER_HOUR;
            self.hour += 1;
        }
        let mut rolled = 0;
        while self.hour >= HOURS_PER_DAY {
            self.hour -= HOURS_PER_DAY;
            self.day += 1;
            rolled += 1;
        }
        rolled
    }

    /// `Day D, HH:MM`.
    pub fn time_string(&self) -> String {
        format!(
            "Day {}, {:02}:{:02}",
            self.day,
            self.hour,
            self.minute.floor() as u32
        )
    }

    pub fn is_daytime(&self) -> bool {
        self.hour >= DAY_START_HOUR && self.hour < NIGHT_START_HOUR
    }

    pub fn is_nighttime(&self) -> bool {
        !self.is_daytime()
    }

    /// 0 at dawn, 1 at dusk, clamped outside daylight hours.
    pub fn day_progress(&self) -> f32 {
        if self.hour < DAY_START_HOUR {
            return 0.0;
        }
        if self.hour >= NIGHT_START_HOUR {
            return 1.0;
        }
        let day_length = (NIGHT_START_HOUR - DAY_START_HOUR) as f32;
        let hours = (self.hour - DAY_START_HOUR) as f32 + self.minute / MINUTES_PER_HOUR;
        hours / day_length
    }
}
