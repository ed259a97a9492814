//! Simulation engine - main entry point for running a colony

use hecs::World;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use burrow_logic::building::{can_build, is_in_stockpile, Bed, BuildType, Stockpile};
use burrow_logic::config::{validate_config, ColonyConfig, ConfigError};
use burrow_logic::constants::work::{
    DEFAULT_PRIORITY, MAX_DESIGNATION_PRIORITY, MIN_DESIGNATION_PRIORITY,
};
use burrow_logic::grid::Grid;
use burrow_logic::ids::{ColonistId, TaskId};
use burrow_logic::tasks::{TaskQueue, TaskType};
use burrow_logic::time::GameClock;

use crate::colony::{Colony, ColonyStats};
use crate::components::*;
use crate::events::{ColonyEvent, EventSink, NullSink};
use crate::generation::{generate_colonists, generate_terrain, map_center, spawn_colonist};
use crate::leaderboard::{calculate_score, LeaderboardEntry};
use crate::messages::MessageLog;
use crate::systems::*;

/// Which screen the host should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameScreen {
    #[default]
    Title,
    Playing,
    Paused,
    Help,
}

/// What a drag over the map does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignMode {
    #[default]
    None,
    Mine,
    Chop,
    Stockpile,
    Build,
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world holding one entity per living colonist
    pub world: World,
    /// Map, tasks, stockpiles, beds, messages and statistics
    pub colony: Colony,
    pub clock: GameClock,
    config: ColonyConfig,
    rng: StdRng,
    events: Box<dyn EventSink>,
    screen: GameScreen,
    paused: bool,
    design_mode: DesignMode,
    selected_build: Option<BuildType>,
    selected_priority: i32,
    forage_timer: f32,
    next_seq: u32,
}

impl SimulationEngine {
    /// Create an engine on the title screen with a freshly generated map
    /// and no colonists.
    pub fn new(config: ColonyConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let grid = generate_terrain(config.width, config.height, &mut rng);
        Self {
            world: World::new(),
            colony: Colony::new(grid, config.max_messages),
            clock: GameClock::new(),
            rng,
            events: Box::new(NullSink),
            screen: GameScreen::Title,
            paused: false,
            design_mode: DesignMode::None,
            selected_build: None,
            selected_priority: DEFAULT_PRIORITY,
            forage_timer: 0.0,
            next_seq: 0,
            config,
        }
    }

    /// Like [`SimulationEngine::new`], but rejects an invalid config.
    pub fn try_new(config: ColonyConfig) -> Result<Self, Vec<ConfigError>> {
        let errors = validate_config(&config);
        if errors.is_empty() {
            Ok(Self::new(config))
        } else {
            Err(errors)
        }
    }

    /// Route colony events to `sink` from now on.
    pub fn set_event_sink(&mut self, sink: impl EventSink + 'static) {
        self.events = Box::new(sink);
    }

    /// Start a new colony on a freshly generated map.
    pub fn start_game(&mut self) {
        self.rng = StdRng::seed_from_u64(self.config.seed);
        let grid = generate_terrain(self.config.width, self.config.height, &mut self.rng);
        self.start_game_with(grid);
    }

    /// Start a new colony on the given map. Starting colonists gather
    /// around its centre.
    pub fn start_game_with(&mut self, grid: Grid) {
        self.world.clear();
        self.colony.reset();
        self.colony.grid = grid;
        self.clock = GameClock::new();
        self.screen = GameScreen::Playing;
        self.paused = false;
        self.forage_timer = 0.0;
        self.next_seq = 0;

        let center = map_center(self.colony.grid.width(), self.colony.grid.height());
        let spawned = generate_colonists(
            &mut self.world,
            &mut self.colony.ids,
            self.config.starting_colonists,
            center,
            self.next_seq,
            &mut self.rng,
        );
        self.next_seq += spawned.len() as u32;
        for entity in spawned {
            if let Ok(colonist) = self.world.get::<&Colonist>(entity) {
                self.colony
                    .messages
                    .push(format!("{} has joined the colony", colonist.name));
            }
        }
        self.track_population();

        log::info!(
            "colony started on a {}x{} map with {} colonists (seed {})",
            self.colony.grid.width(),
            self.colony.grid.height(),
            self.colonist_count(),
            self.config.seed
        );
    }

    /// Advance the simulation by `delta_seconds`. Does nothing while
    /// paused or off the playing screen.
    pub fn update(&mut self, delta_seconds: f32) {
        if self.paused || self.screen != GameScreen::Playing {
            return;
        }
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            log::warn!("ignoring update with delta {}", delta_seconds);
            return;
        }

        let rolled = self.clock.advance(delta_seconds);
        for day in (self.clock.day + 1 - rolled)..=self.clock.day {
            log::info!("day {} begins", day);
            self.colony.messages.push(format!("Day {} begins", day));
        }

        needs_system(&mut self.world, delta_seconds);
        death_system(&mut self.world, &mut self.colony, &mut *self.events);
        ai_system(
            &mut self.world,
            &mut self.colony,
            &self.config,
            &mut *self.events,
        );
        work_system(
            &mut self.world,
            &mut self.colony,
            &self.config,
            &mut *self.events,
            delta_seconds,
        );

        self.forage_timer += delta_seconds;
        if self.forage_timer >= self.config.forage_interval {
            forage_system(&mut self.colony.grid, &self.config, &mut self.rng);
            self.forage_timer = 0.0;
        }

        self.track_population();
    }

    fn track_population(&mut self) {
        let alive = self.colonist_count() as u32;
        let stats = &mut self.colony.stats;
        stats.max_colonists = stats.max_colonists.max(alive);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn screen(&self) -> GameScreen {
        self.screen
    }

    pub fn set_screen(&mut self, screen: GameScreen) {
        self.screen = screen;
    }

    pub fn design_mode(&self) -> DesignMode {
        self.design_mode
    }

    /// Switch the drag mode. Leaving build mode drops the selected build.
    pub fn set_design_mode(&mut self, mode: DesignMode) {
        self.design_mode = mode;
        if mode != DesignMode::Build {
            self.selected_build = None;
        }
    }

    pub fn selected_build(&self) -> Option<BuildType> {
        self.selected_build
    }

    /// Pick a structure to place; also enters build mode.
    pub fn set_selected_build(&mut self, build_type: BuildType) {
        self.selected_build = Some(build_type);
        self.design_mode = DesignMode::Build;
    }

    pub fn selected_priority(&self) -> i32 {
        self.selected_priority
    }

    /// Priority given to new mine and chop designations, clamped to 1..=9.
    pub fn set_selected_priority(&mut self, priority: i32) {
        self.selected_priority =
            priority.clamp(MIN_DESIGNATION_PRIORITY, MAX_DESIGNATION_PRIORITY);
    }

    /// Apply the current design mode to every tile in the rectangle
    /// spanned by two corners, in any order.
    ///
    /// Mine and chop designate matching terrain and queue a task per tile
    /// at the selected priority; tiles already carrying that designation
    /// are skipped. Stockpile mode turns every grass or floor tile in the
    /// rectangle into one stockpile. Build mode queues the selected
    /// structure on each eligible tile.
    pub fn designate_area(&mut self, a: Position, b: Position) {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        let rect = (min_y..=max_y).flat_map(move |y| (min_x..=max_x).map(move |x| Position::new(x, y)));

        match self.design_mode {
            DesignMode::None => return,
            DesignMode::Mine | DesignMode::Chop => {
                let kind = if self.design_mode == DesignMode::Mine {
                    TaskType::Mine
                } else {
                    TaskType::Chop
                };
                let mut queued = 0;
                for pos in rect {
                    let fresh = self
                        .colony
                        .grid
                        .tile(pos)
                        .is_some_and(|tile| tile.designation != Some(kind));
                    if fresh && self.colony.grid.designate(pos, kind) {
                        self.colony.tasks.create(
                            &mut self.colony.ids,
                            kind,
                            pos,
                            Some(self.selected_priority),
                        );
                        queued += 1;
                    }
                }
                log::debug!("designated {} tiles for {}", queued, kind.label());
            }
            DesignMode::Stockpile => {
                let tiles: Vec<Position> = rect
                    .filter(|&pos| {
                        can_build(&self.colony.grid, pos, BuildType::Stockpile)
                            && !is_in_stockpile(&self.colony.stockpiles, pos)
                    })
                    .collect();
                if !tiles.is_empty() {
                    let count = tiles.len();
                    self.colony.add_stockpile(tiles);
                    self.colony
                        .messages
                        .push(format!("Created stockpile with {} tiles", count));
                }
            }
            DesignMode::Build => {
                let positions: Vec<Position> = rect.collect();
                for pos in positions {
                    self.place_build(pos);
                }
                return;
            }
        }
        self.events.emit(ColonyEvent::Select);
    }

    /// Queue the selected structure at `pos`. Returns false when nothing
    /// is selected, the terrain doesn't allow it, or a build is already
    /// queued there.
    pub fn place_build(&mut self, pos: Position) -> bool {
        let Some(build_type) = self.selected_build else {
            return false;
        };
        if !can_build(&self.colony.grid, pos, build_type) {
            return false;
        }
        if self.colony.tasks.any_at(TaskType::Build, pos) {
            return false;
        }
        if build_type == BuildType::Stockpile && is_in_stockpile(&self.colony.stockpiles, pos) {
            return false;
        }
        self.colony
            .tasks
            .create_build(&mut self.colony.ids, pos, build_type);
        log::info!("queued {} at ({}, {})", build_type.label(), pos.x, pos.y);
        self.colony
            .messages
            .push(format!("Queued {} construction", build_type.label()));
        self.events.emit(ColonyEvent::Select);
        true
    }

    /// Hand every unassigned task to the nearest idle colonist. Ties go
    /// to the colonist spawned first.
    pub fn assign_tasks(&mut self) -> usize {
        let pending: Vec<(TaskId, Position)> = self
            .colony
            .tasks
            .unassigned()
            .map(|task| (task.id, task.pos))
            .collect();
        let mut assigned = 0;

        for (task_id, task_pos) in pending {
            let mut nearest: Option<(hecs::Entity, u32)> = None;
            for entity in colonists_in_order(&self.world) {
                let Ok(mut query) = self
                    .world
                    .query_one::<(&ColonistState, &Position)>(entity)
                else {
                    continue;
                };
                let Some((state, pos)) = query.get() else {
                    continue;
                };
                if *state != ColonistState::Idle {
                    continue;
                }
                let dist = pos.manhattan(task_pos);
                if nearest.map_or(true, |(_, best)| dist < best) {
                    nearest = Some((entity, dist));
                }
            }
            let Some((entity, _)) = nearest else {
                break;
            };
            if claim_task(
                &mut self.world,
                &mut self.colony.tasks,
                &self.colony.grid,
                self.config.strict_reassignment,
                entity,
                task_id,
                ColonistState::Working,
            ) {
                assigned += 1;
            }
        }
        assigned
    }

    /// Add a colonist at `pos` outside the starting roll.
    pub fn spawn_colonist(
        &mut self,
        name: &str,
        pos: Position,
        skills: Skills,
        trait_: Trait,
    ) -> ColonistId {
        let (_, id) = spawn_colonist(
            &mut self.world,
            &mut self.colony.ids,
            self.next_seq,
            name,
            pos,
            skills,
            trait_,
        );
        self.next_seq += 1;
        self.colony
            .messages
            .push(format!("{} has joined the colony", name));
        self.track_population();
        id
    }

    pub fn grid(&self) -> &Grid {
        &self.colony.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.colony.grid
    }

    pub fn set_grid(&mut self, grid: Grid) {
        self.colony.grid = grid;
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.colony.tasks
    }

    pub fn stockpiles(&self) -> &[Stockpile] {
        &self.colony.stockpiles
    }

    pub fn beds(&self) -> &[Bed] {
        &self.colony.beds
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn messages(&self) -> &MessageLog {
        &self.colony.messages
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.colony.messages.push(message);
    }

    /// Snapshots of every living colonist in spawn order.
    pub fn colonists(&self) -> Vec<ColonistSnapshot> {
        colonists_in_order(&self.world)
            .into_iter()
            .filter_map(|entity| self.snapshot(entity))
            .collect()
    }

    pub fn colonist(&self, id: ColonistId) -> Option<ColonistSnapshot> {
        find_colonist(&self.world, id).and_then(|entity| self.snapshot(entity))
    }

    fn snapshot(&self, entity: hecs::Entity) -> Option<ColonistSnapshot> {
        let mut query = self
            .world
            .query_one::<(
                &Colonist,
                &Position,
                &Needs,
                &Skills,
                &Trait,
                &ColonistState,
                &CurrentTask,
                &Path,
            )>(entity)
            .ok()?;
        let (colonist, pos, needs, skills, trait_, state, current, path) = query.get()?;
        Some(ColonistSnapshot {
            id: colonist.id,
            name: colonist.name.clone(),
            pos: *pos,
            needs: *needs,
            skills: *skills,
            trait_: *trait_,
            state: *state,
            current_task: current.0,
            path: path.nodes.clone(),
        })
    }

    pub fn colonist_count(&self) -> usize {
        colonist_count(&self.world)
    }

    /// Overwrite a colonist's needs. Returns false for an unknown id.
    pub fn set_needs(&mut self, id: ColonistId, needs: Needs) -> bool {
        let Some(entity) = find_colonist(&self.world, id) else {
            return false;
        };
        match self.world.get::<&mut Needs>(entity) {
            Ok(mut current) => {
                *current = needs;
                true
            }
            Err(_) => false,
        }
    }

    pub fn stats(&self) -> ColonyStats {
        self.colony.stats
    }

    /// Score of the current run so far.
    pub fn score(&self) -> u32 {
        let stats = self.colony.stats;
        calculate_score(
            self.clock.day,
            stats.max_colonists,
            stats.tiles_built,
            stats.items_stockpiled,
        )
    }

    /// Leaderboard entry for the current run.
    pub fn leaderboard_entry(&self, name: &str, date: &str) -> LeaderboardEntry {
        let stats = self.colony.stats;
        LeaderboardEntry {
            name: name.to_string(),
            score: self.score(),
            days_lived: self.clock.day,
            max_colonists: stats.max_colonists,
            tiles_built: stats.tiles_built,
            date: date.to_string(),
        }
    }

    pub fn time_string(&self) -> String {
        self.clock.time_string()
    }

    pub fn is_daytime(&self) -> bool {
        self.clock.is_daytime()
    }

    /// Every colonist is dead while a game is in progress.
    pub fn is_game_over(&self) -> bool {
        self.screen == GameScreen::Playing && self.colonist_count() == 0
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(ColonyConfig::default())
    }
}
