//! Colonist needs, skills, traits and the derived speed modifiers.
//!
//! Needs run from 0 to 100 and decay every simulated second. Health is the
//! exception: it only drops through starvation or damage, and a TOUGH
//! colonist's ceiling sits 25% higher than everyone else's.
//!
//! | Trait | Work speed | Mood decay | Max health |
//! |-------|-----------|------------|------------|
//! | Hardworker | +0.2 | ×1.0 | 100 |
//! | Lazy | −0.2 | ×1.0 | 100 |
//! | Optimist | — | ×0.5 | 100 |
//! | Pessimist | — | ×1.5 | 100 |
//! | Tough | — | ×1.0 | 125 |

use serde::{Deserialize, Serialize};

use crate::constants::needs::{
    HUNGER_DECAY, MAX, MOOD_DECAY, REST_DECAY, STARTING_MOOD, STARVATION_DAMAGE, THRESHOLD_BAD,
    THRESHOLD_GOOD, THRESHOLD_OKAY,
};
use crate::constants::skills::{self, BONUS_PER_LEVEL};
use crate::tasks::TaskType;

/// Behavioural state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColonistState {
    #[default]
    Idle,
    Working,
    Eating,
    Sleeping,
    Moving,
}

impl ColonistState {
    pub fn label(self) -> &'static str {
        match self {
            ColonistState::Idle => "idle",
            ColonistState::Working => "working",
            ColonistState::Eating => "eating",
            ColonistState::Sleeping => "sleeping",
            ColonistState::Moving => "moving",
        }
    }

    /// States in which a colonist holds a task.
    pub fn holds_task(self) -> bool {
        matches!(self, ColonistState::Working | ColonistState::Eating)
    }
}

/// Personality modifier, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trait {
    Hardworker,
    Lazy,
    Optimist,
    Pessimist,
    Tough,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Trait::Hardworker,
        Trait::Lazy,
        Trait::Optimist,
        Trait::Pessimist,
        Trait::Tough,
    ];

    pub fn work_modifier(self) -> f32 {
        match self {
            Trait::Hardworker => 0.2,
            Trait::Lazy => -0.2,
            Trait::Optimist | Trait::Pessimist | Trait::Tough => 0.0,
        }
    }

    /// Fraction by which mood decay is slowed (positive) or sped up (negative).
    pub fn mood_modifier(self) -> f32 {
        match self {
            Trait::Optimist => 0.5,
            Trait::Pessimist => -0.5,
            Trait::Hardworker | Trait::Lazy | Trait::Tough => 0.0,
        }
    }

    pub fn health_modifier(self) -> f32 {
        match self {
            Trait::Tough => 0.25,
            Trait::Hardworker | Trait::Lazy | Trait::Optimist | Trait::Pessimist => 0.0,
        }
    }

    pub fn max_health(self) -> f32 {
        MAX * (1.0 + self.health_modifier())
    }

    pub fn label(self) -> &'static str {
        match self {
            Trait::Hardworker => "hardworker",
            Trait::Lazy => "lazy",
            Trait::Optimist => "optimist",
            Trait::Pessimist => "pessimist",
            Trait::Tough => "tough",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedKind {
    Health,
    Hunger,
    Rest,
    Mood,
}

/// Coarse band a need value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedStatus {
    Good,
    Okay,
    Bad,
    Critical,
}

impl NeedStatus {
    pub fn of(value: f32) -> Self {
        if value >= THRESHOLD_GOOD {
            NeedStatus::Good
        } else if value >= THRESHOLD_OKAY {
            NeedStatus::Okay
        } else if value >= THRESHOLD_BAD {
            NeedStatus::Bad
        } else {
            NeedStatus::Critical
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub health: f32,
    pub hunger: f32,
    pub rest: f32,
    pub mood: f32,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            health: MAX,
            hunger: MAX,
            rest: MAX,
            mood: STARTING_MOOD,
        }
    }
}

impl Needs {
    pub fn get(&self, kind: NeedKind) -> f32 {
        match kind {
            NeedKind::Health => self.health,
            NeedKind::Hunger => self.hunger,
            NeedKind::Rest => self.rest,
            NeedKind::Mood => self.mood,
        }
    }

    fn slot(&mut self, kind: NeedKind) -> &mut f32 {
        match kind {
            NeedKind::Health => &mut self.health,
            NeedKind::Hunger => &mut self.hunger,
            NeedKind::Rest => &mut self.rest,
            NeedKind::Mood => &mut self.mood,
        }
    }

    /// Raise a need, capped at 100.
    pub fn satisfy(&mut self, kind: NeedKind, amount: f32) {
        let value = self.slot(kind);
        *value = (*value + amount).min(MAX);
    }

    /// One `dt`-second step of decay. Starvation damage applies once hunger
    /// has bottomed out.
    pub fn decay(&mut self, trait_: Trait, dt: f32) {
        let mood_decay = MOOD_DECAY * (1.0 - trait_.mood_modifier());
        self.hunger = (self.hunger - HUNGER_DECAY * dt).max(0.0);
        self.rest = (self.rest - REST_DECAY * dt).max(0.0);
        self.mood = (self.mood - mood_decay * dt).max(0.0);

        if self.hunger <= 0.0 {
            self.damage(STARVATION_DAMAGE * dt);
        }
    }

    pub fn damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Restore health up to the trait-adjusted ceiling.
    pub fn heal(&mut self, trait_: Trait, amount: f32) {
        self.health = (self.health + amount).min(trait_.max_health());
    }

    pub fn status(&self, kind: NeedKind) -> NeedStatus {
        NeedStatus::of(self.get(kind))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    Mining,
    Construction,
    Farming,
    Cooking,
    Combat,
}

impl SkillKind {
    pub const ALL: [SkillKind; 5] = [
        SkillKind::Mining,
        SkillKind::Construction,
        SkillKind::Farming,
        SkillKind::Cooking,
        SkillKind::Combat,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub mining: u8,
    pub construction: u8,
    pub farming: u8,
    pub cooking: u8,
    pub combat: u8,
}

impl Default for Skills {
    fn default() -> Self {
        Self::uniform(skills::MIN)
    }
}

impl Skills {
    pub fn uniform(level: u8) -> Self {
        let level = level.clamp(skills::MIN, skills::MAX);
        Self {
            mining: level,
            construction: level,
            farming: level,
            cooking: level,
            combat: level,
        }
    }

    pub fn get(&self, kind: SkillKind) -> u8 {
        match kind {
            SkillKind::Mining => self.mining,
            SkillKind::Construction => self.construction,
            SkillKind::Farming => self.farming,
            SkillKind::Cooking => self.cooking,
            SkillKind::Combat => self.combat,
        }
    }
}

/// The skill that speeds up a task type, if any.
pub fn skill_for_task(task_type: TaskType) -> Option<SkillKind> {
    match task_type {
        TaskType::Mine => Some(SkillKind::Mining),
        TaskType::Build => Some(SkillKind::Construction),
        TaskType::Cook => Some(SkillKind::Cooking),
        TaskType::Chop | TaskType::Haul | TaskType::Eat | TaskType::Sleep => None,
    }
}

/// Work-speed multiplier for a colonist on a task type.
pub fn work_speed(needs: &Needs, skills: &Skills, trait_: Trait, task_type: TaskType) -> f32 {
    let skill_bonus = skill_for_task(task_type)
        .map_or(0.0, |kind| f32::from(skills.get(kind)) * BONUS_PER_LEVEL);
    let mood_penalty = if needs.mood <= 0.0 { 0.5 } else { 1.0 };
    (1.0 + skill_bonus + trait_.work_modifier()) * mood_penalty
}

/// Exhausted colonists move at half speed.
pub fn movement_speed(needs: &Needs) -> f32 {
    if needs.rest <= 0.0 {
        0.5
    } else {
        1.0
    }
}

pub fn is_hungry(needs: &Needs) -> bool {
    needs.hunger < THRESHOLD_OKAY
}

pub fn is_tired(needs: &Needs) -> bool {
    needs.rest < THRESHOLD_BAD
}

pub fn is_dead(needs: &Needs) -> bool {
    needs.health <= 0.0
}

pub fn is_critical(needs: &Needs) -> bool {
    needs.health < THRESHOLD_BAD || needs.hunger < THRESHOLD_BAD || needs.rest < THRESHOLD_BAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_needs() {
        let needs = Needs::default();
        assert_eq!(needs.health, 100.0);
        assert_eq!(needs.hunger, 100.0);
        assert_eq!(needs.rest, 100.0);
        assert_eq!(needs.mood, 75.0);
    }

    #[test]
    fn test_decay_rates() {
        let mut needs = Needs::default();
        needs.decay(Trait::Hardworker, 2.0);
        assert!((needs.hunger - 99.0).abs() < 1e-4);
        assert!((needs.rest - 99.4).abs() < 1e-4);
        assert!((needs.mood - 74.8).abs() < 1e-4);
        assert_eq!(needs.health, 100.0);
    }

    #[test]
    fn test_mood_decay_follows_trait() {
        let mut optimist = Needs::default();
        let mut pessimist = Needs::default();
        optimist.decay(Trait::Optimist, 10.0);
        pessimist.decay(Trait::Pessimist, 10.0);
        assert!((optimist.mood - 74.5).abs() < 1e-4);
        assert!((pessimist.mood - 73.5).abs() < 1e-4);
    }

    #[test]
    fn test_decay_clamps_at_zero() {
        let mut needs = Needs {
            hunger: 0.2,
            rest: 0.1,
            mood: 0.0,
            ..Needs::default()
        };
        needs.decay(Trait::Lazy, 5.0);
        assert_eq!(needs.hunger, 0.0);
        assert_eq!(needs.rest, 0.0);
        assert_eq!(needs.mood, 0.0);
    }

    #[test]
    fn test_starvation_only_at_zero_hunger() {
        let mut fed = Needs {
            hunger: 10.0,
            ..Needs::default()
        };
        fed.decay(Trait::Lazy, 1.0);
        assert_eq!(fed.health, 100.0);

        let mut starving = Needs {
            hunger: 0.0,
            ..Needs::default()
        };
        starving.decay(Trait::Lazy, 1.0);
        assert_eq!(starving.health, 99.0);
        starving.decay(Trait::Lazy, 0.5);
        assert_eq!(starving.health, 98.5);
    }

    #[test]
    fn test_satisfy_and_heal_clamp() {
        let mut needs = Needs::default();
        needs.satisfy(NeedKind::Hunger, 40.0);
        assert_eq!(needs.hunger, 100.0);

        needs.heal(Trait::Lazy, 50.0);
        assert_eq!(needs.health, 100.0);
        needs.heal(Trait::Tough, 50.0);
        assert_eq!(needs.health, 125.0);

        needs.damage(500.0);
        assert_eq!(needs.health, 0.0);
        assert!(is_dead(&needs));
    }

    #[test]
    fn test_work_speed_formula() {
        let needs = Needs::default();
        let skills = Skills {
            mining: 10,
            ..Skills::uniform(1)
        };
        let mine = work_speed(&needs, &skills, Trait::Hardworker, TaskType::Mine);
        assert!((mine - 1.7).abs() < 1e-5);
        let haul = work_speed(&needs, &skills, Trait::Lazy, TaskType::Haul);
        assert!((haul - 0.8).abs() < 1e-5);

        let gloomy = Needs {
            mood: 0.0,
            ..Needs::default()
        };
        let slow = work_speed(&gloomy, &skills, Trait::Tough, TaskType::Chop);
        assert!((slow - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_exhaustion_halves_movement() {
        let mut needs = Needs::default();
        assert_eq!(movement_speed(&needs), 1.0);
        needs.rest = 0.0;
        assert_eq!(movement_speed(&needs), 0.5);
    }

    #[test]
    fn test_thresholds() {
        let needs = Needs {
            hunger: 49.9,
            rest: 24.9,
            ..Needs::default()
        };
        assert!(is_hungry(&needs));
        assert!(is_tired(&needs));
        assert!(is_critical(&needs));
        assert!(!is_hungry(&Needs::default()));
        assert_eq!(NeedStatus::of(75.0), NeedStatus::Good);
        assert_eq!(NeedStatus::of(50.0), NeedStatus::Okay);
        assert_eq!(NeedStatus::of(25.0), NeedStatus::Bad);
        assert_eq!(NeedStatus::of(24.0), NeedStatus::Critical);
    }
}
