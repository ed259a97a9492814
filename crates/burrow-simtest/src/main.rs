//! Burrow Headless Simulation Harness
//!
//! Validates colony rules and runs a seeded long soak of the engine.
//! Runs entirely in-process with no renderer, input or audio.
//!
//! Usage:
//!   cargo run -p burrow-simtest
//!   cargo run -p burrow-simtest -- --verbose
//!   cargo run -p burrow-simtest -- --seed 7 --json

use std::collections::HashMap;

use burrow_core::events::ColonyEvent;
use burrow_core::leaderboard::{Leaderboard, LeaderboardEntry, MAX_ENTRIES};
use burrow_core::prelude::*;
use burrow_logic::building::{
    build, can_build, count_in_stockpiles, has_materials, MaterialCost, Stockpile,
};
use burrow_logic::colonist::{is_dead, movement_speed, work_speed, NeedKind};
use burrow_logic::config::{validate_config, ConfigError};
use burrow_logic::grid::{Grid, TileType};
use burrow_logic::ids::StockpileId;
use burrow_logic::items::{ItemStack, ItemType, StackError};
use burrow_logic::pathfinding::{adjacent_tiles, find_path, neighbors};
use burrow_logic::time::GameClock;
use serde::Serialize;

// ── Options ─────────────────────────────────────────────────────────────

struct Options {
    verbose: bool,
    json: bool,
    seed: u64,
    /// Simulated days the soak runs for.
    soak_days: u32,
}

impl Options {
    fn from_args() -> Result<Self, String> {
        let mut options = Options {
            verbose: false,
            json: false,
            seed: ColonyConfig::default().seed,
            soak_days: 3,
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" | "-v" => options.verbose = true,
                "--json" => options.json = true,
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    options.seed = value
                        .parse()
                        .map_err(|e| format!("bad seed {value:?}: {e}"))?;
                }
                "--days" => {
                    let value = args.next().ok_or("--days needs a value")?;
                    options.soak_days = value
                        .parse()
                        .map_err(|e| format!("bad day count {value:?}: {e}"))?;
                }
                other => return Err(format!("unknown argument {other:?}")),
            }
        }
        Ok(options)
    }
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    passed: usize,
    failed: usize,
    soak: Option<SoakReport>,
    results: Vec<TestResult>,
}

fn main() {
    let options = match Options::from_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("usage: burrow-simtest [--verbose] [--json] [--seed N] [--days N]");
            std::process::exit(2);
        }
    };

    let default_filter = if options.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let verbose = options.verbose && !options.json;
    if !options.json {
        println!("=== Burrow Simulation Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Pathfinding
    results.extend(validate_pathfinding(verbose));

    // 2. Item stacks
    results.extend(validate_item_stacks(verbose));

    // 3. Needs and clock
    results.extend(validate_needs_and_clock(verbose));

    // 4. Construction ledger
    results.extend(validate_construction(verbose));

    // 5. Configuration
    results.extend(validate_configuration(verbose));

    // 6. Leaderboard
    results.extend(validate_leaderboard(verbose));

    // 7. Engine scenarios
    results.extend(validate_engine_scenarios(verbose));

    // 8. Seeded soak
    let (soak_results, soak) = run_soak(options.seed, options.soak_days, verbose);
    results.extend(soak_results);

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if options.json {
        let summary = Summary {
            seed: options.seed,
            passed,
            failed,
            soak,
            results,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: could not encode summary: {e}");
                std::process::exit(2);
            }
        }
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed, total, failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn section(title: &str, verbose: bool) {
    if verbose {
        println!("--- {title} ---");
    }
}

// ── 1. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(verbose: bool) -> Vec<TestResult> {
    section("Pathfinding", verbose);
    let mut results = Vec::new();

    // Optimal, orthogonal, endpoint-correct on an open map.
    let grid = Grid::new(16, 12);
    let mut bad = Vec::new();
    let mut checked = 0;
    for (sx, sy, gx, gy) in [(0, 0, 15, 11), (3, 7, 12, 2), (8, 8, 8, 0), (5, 5, 6, 5)] {
        let (start, goal) = (Position::new(sx, sy), Position::new(gx, gy));
        let path = find_path(&grid, start, goal);
        checked += 1;
        let optimal = path.len() == start.manhattan(goal) as usize + 1;
        let ends = path.first() == Some(&start) && path.last() == Some(&goal);
        let orthogonal = path.windows(2).all(|w| w[0].manhattan(w[1]) == 1);
        if !(optimal && ends && orthogonal) {
            bad.push(format!("{start:?}->{goal:?}"));
        }
    }
    results.push(check(
        "path_optimal_on_open_map",
        bad.is_empty(),
        if bad.is_empty() {
            format!("{checked} routes optimal and orthogonal")
        } else {
            format!("bad routes: {}", bad.join(", "))
        },
    ));

    // Enclosed goal is unreachable.
    let mut walled = Grid::new(9, 9);
    let goal = Position::new(4, 4);
    for pos in neighbors(&walled, goal) {
        walled.set_tile_type(pos, TileType::Wall);
    }
    let path = find_path(&walled, Position::new(0, 0), goal);
    results.push(check(
        "path_enclosed_goal_empty",
        path.is_empty(),
        format!("path length {}", path.len()),
    ));

    // Unwalkable goal is unreachable.
    let mut rocky = Grid::new(6, 6);
    rocky.set_tile_type(Position::new(5, 5), TileType::Rock);
    let path = find_path(&rocky, Position::new(0, 0), Position::new(5, 5));
    results.push(check(
        "path_unwalkable_goal_empty",
        path.is_empty(),
        format!("path length {}", path.len()),
    ));

    // Two adjacency notions stay distinct.
    let open = Grid::new(5, 5);
    let center = Position::new(2, 2);
    let four = neighbors(&open, center).len();
    let eight = adjacent_tiles(&open, center).len();
    results.push(check(
        "adjacency_four_vs_eight",
        four == 4 && eight == 8,
        format!("orthogonal {four}, all-around {eight}"),
    ));

    results
}

// ── 2. Item stacks ──────────────────────────────────────────────────────

fn validate_item_stacks(verbose: bool) -> Vec<TestResult> {
    section("Item Stacks", verbose);
    let mut results = Vec::new();

    let mut merge_ok = true;
    for (a, b) in [(1, 1), (40, 59), (50, 50), (99, 99), (0, 7)] {
        let merged = ItemStack::new(ItemType::Wood, a).merge(&ItemStack::new(ItemType::Wood, b));
        let want = (a + b).min(99);
        if merged.map(|s| s.quantity) != Ok(want) {
            merge_ok = false;
        }
    }
    results.push(check(
        "stack_merge_caps_at_99",
        merge_ok,
        "same-type merges sum and cap",
    ));

    let mismatch = ItemStack::single(ItemType::Stone).merge(&ItemStack::single(ItemType::Meal));
    results.push(check(
        "stack_merge_type_mismatch",
        matches!(mismatch, Err(StackError::TypeMismatch { .. })),
        format!("{mismatch:?}"),
    ));

    let mut split_ok = true;
    for q in [0, 5, 10, 11] {
        let mut stack = ItemStack::new(ItemType::Stone, 10);
        let split = stack.split(q);
        let expect_ok = q > 0 && q < 10;
        match split {
            Some(part) => split_ok &= expect_ok && part.quantity == q && stack.quantity == 10 - q,
            None => split_ok &= !expect_ok && stack.quantity == 10,
        }
    }
    results.push(check(
        "stack_split_strict_sub_quantity",
        split_ok,
        "0, whole and oversize splits refused",
    ));

    results
}

// ── 3. Needs & clock ────────────────────────────────────────────────────

fn validate_needs_and_clock(verbose: bool) -> Vec<TestResult> {
    section("Needs & Clock", verbose);
    let mut results = Vec::new();

    let mut needs = Needs::default();
    needs.decay(Trait::Hardworker, 1_000.0);
    results.push(check(
        "needs_clamp_at_zero",
        needs.hunger == 0.0 && needs.rest == 0.0 && needs.mood >= 0.0,
        format!("hunger {}, rest {}, mood {}", needs.hunger, needs.rest, needs.mood),
    ));

    let mut tough = Needs::default();
    tough.heal(Trait::Tough, 500.0);
    let mut plain = Needs::default();
    plain.heal(Trait::Lazy, 500.0);
    results.push(check(
        "needs_heal_clamps_at_trait_ceiling",
        (tough.health - 125.0).abs() < 1e-4 && (plain.health - 100.0).abs() < 1e-4,
        format!("tough {}, plain {}", tough.health, plain.health),
    ));

    let mut fed = Needs {
        hunger: 90.0,
        ..Needs::default()
    };
    fed.satisfy(NeedKind::Hunger, 50.0);
    results.push(check(
        "needs_satisfy_caps_at_100",
        fed.hunger == 100.0,
        format!("hunger {}", fed.hunger),
    ));

    let exhausted = Needs {
        rest: 0.0,
        ..Needs::default()
    };
    let demoralised = Needs {
        mood: 0.0,
        ..Needs::default()
    };
    let skills = Skills::uniform(10);
    let base = work_speed(&Needs::default(), &skills, Trait::Optimist, TaskType::Mine);
    let slowed = work_speed(&demoralised, &skills, Trait::Optimist, TaskType::Mine);
    results.push(check(
        "speed_penalties",
        movement_speed(&exhausted) == 0.5 && (slowed - base * 0.5).abs() < 1e-4,
        format!("move {} when exhausted, work {base} -> {slowed}", movement_speed(&exhausted)),
    ));

    let mut clock = GameClock {
        day: 1,
        hour: 23,
        minute: 59.0,
    };
    let rolled = clock.advance(2.0);
    results.push(check(
        "clock_day_rollover",
        rolled == 1 && clock.day == 2 && clock.hour == 0 && (clock.minute - 1.0).abs() < 1e-4,
        clock.time_string(),
    ));

    results
}

// ── 4. Construction ledger ──────────────────────────────────────────────

fn validate_construction(verbose: bool) -> Vec<TestResult> {
    section("Construction", verbose);
    let mut results = Vec::new();

    let mut grid = Grid::new(6, 6);
    let tiles = vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)];
    grid.place_item(tiles[0], ItemStack::new(ItemType::Stone, 3));
    grid.place_item(tiles[1], ItemStack::new(ItemType::Stone, 3));
    let stockpiles = vec![Stockpile::new(StockpileId(1), tiles)];
    let total = count_in_stockpiles(&grid, &stockpiles, ItemType::Stone);
    let cost = MaterialCost::of(ItemType::Stone, 5);
    results.push(check(
        "stockpile_aggregation",
        total == 6 && has_materials(&grid, &stockpiles, &cost),
        format!("{total} stone across stockpile"),
    ));

    let site = Position::new(4, 4);
    let refused = !can_build(&grid, site, BuildType::Wall) && !build(&mut grid, site, BuildType::Wall);
    let floored = grid.set_tile_type(site, TileType::Floor);
    let walled = build(&mut grid, site, BuildType::Wall);
    let tile = grid.tile(site).map(|t| t.tile_type);
    results.push(check(
        "build_gating",
        refused && floored && walled && tile == Some(TileType::Wall),
        format!("wall on grass refused: {refused}, final tile {tile:?}"),
    ));

    results
}

// ── 5. Configuration ────────────────────────────────────────────────────

fn validate_configuration(verbose: bool) -> Vec<TestResult> {
    section("Configuration", verbose);
    let mut results = Vec::new();

    let defaults = validate_config(&ColonyConfig::default());
    results.push(check(
        "config_default_valid",
        defaults.is_empty(),
        format!("{} errors", defaults.len()),
    ));

    let broken = ColonyConfig {
        width: 2,
        starting_colonists: 0,
        forage_chance: -1.0,
        ..ColonyConfig::default()
    };
    let errors = validate_config(&broken);
    let all_reported = errors.contains(&ConfigError::InvalidWidth(2))
        && errors.contains(&ConfigError::NoColonists)
        && errors.contains(&ConfigError::InvalidForageChance(-1.0));
    results.push(check(
        "config_reports_every_error",
        all_reported,
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    ));

    results
}

// ── 6. Leaderboard ──────────────────────────────────────────────────────

fn validate_leaderboard(verbose: bool) -> Vec<TestResult> {
    section("Leaderboard", verbose);
    let mut results = Vec::new();

    let mut board = Leaderboard::new();
    for i in 0..14u32 {
        board.add_entry(LeaderboardEntry {
            name: format!("colony-{i}"),
            score: (i % 5) * 100,
            days_lived: i,
            max_colonists: 3,
            tiles_built: 0,
            date: "today".into(),
        });
    }
    let ordered = board.entries().windows(2).all(|w| {
        w[0].score > w[1].score || (w[0].score == w[1].score && w[0].days_lived >= w[1].days_lived)
    });
    results.push(check(
        "leaderboard_ranked_and_capped",
        board.len() == MAX_ENTRIES && ordered,
        format!("{} entries, top score {}", board.len(), board.entries()[0].score),
    ));

    let round_trip = board
        .to_json()
        .and_then(|json| Leaderboard::from_json(&json))
        .map(|loaded| loaded == board);
    results.push(check(
        "leaderboard_json_round_trip",
        matches!(round_trip, Ok(true)),
        match round_trip {
            Ok(same) => format!("identical after reload: {same}"),
            Err(e) => e.to_string(),
        },
    ));

    results
}

// ── 7. Engine scenarios ─────────────────────────────────────────────────

fn validate_engine_scenarios(verbose: bool) -> Vec<TestResult> {
    section("Engine Scenarios", verbose);
    let mut results = Vec::new();

    // Mining end to end.
    let mut engine = SimulationEngine::new(ColonyConfig::default());
    engine.start_game_with(Grid::new(20, 20));
    let rock = Position::new(14, 9);
    engine.grid_mut().set_tile_type(rock, TileType::Rock);
    engine.set_design_mode(DesignMode::Mine);
    engine.designate_area(rock, rock);
    let mut ticks = 0;
    while !engine.tasks().is_empty() && ticks < 1_000 {
        engine.update(0.1);
        ticks += 1;
    }
    let tile = engine.grid().tile(rock).cloned();
    let mined = tile.as_ref().is_some_and(|t| {
        t.tile_type == TileType::Floor
            && t.designation.is_none()
            && t.item == Some(ItemStack::new(ItemType::Stone, 2))
    });
    results.push(check(
        "scenario_mining",
        mined,
        format!("finished in {ticks} ticks"),
    ));

    // Starvation costs exactly one health per second.
    let mut engine = SimulationEngine::new(ColonyConfig::default().with_colonists(1));
    engine.start_game_with(Grid::new(20, 20));
    let id = engine.colonists()[0].id;
    engine.set_needs(
        id,
        Needs {
            health: 30.0,
            hunger: 0.0,
            ..Needs::default()
        },
    );
    let mut healths = Vec::new();
    for _ in 0..4 {
        engine.update(0.25);
        if let Some(c) = engine.colonist(id) {
            healths.push(c.needs.health);
        }
    }
    let steady = healths.len() == 4
        && healths
            .iter()
            .enumerate()
            .all(|(i, h)| (h - (30.0 - 0.25 * (i as f32 + 1.0))).abs() < 1e-4);
    results.push(check(
        "scenario_starvation",
        steady,
        format!("health trace {healths:?}"),
    ));

    results
}

// ── 8. Soak ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SoakReport {
    seed: u64,
    days: u32,
    ticks: u64,
    survivors: usize,
    max_colonists: u32,
    tiles_built: u32,
    items_stockpiled: u32,
    score: u32,
    events: HashMap<&'static str, u32>,
}

fn run_soak(seed: u64, days: u32, verbose: bool) -> (Vec<TestResult>, Option<SoakReport>) {
    section("Seeded Soak", verbose);
    let mut results = Vec::new();

    let config = ColonyConfig::default().with_seed(seed).with_colonists(6);
    let mut engine = match SimulationEngine::try_new(config) {
        Ok(engine) => engine,
        Err(errors) => {
            results.push(check(
                "soak_config",
                false,
                format!("{} config errors", errors.len()),
            ));
            return (results, None);
        }
    };

    let counts = std::rc::Rc::new(std::cell::RefCell::new(HashMap::<&'static str, u32>::new()));
    let sink = std::rc::Rc::clone(&counts);
    engine.set_event_sink(move |event: ColonyEvent| {
        *sink.borrow_mut().entry(event.name()).or_insert(0) += 1;
    });
    engine.start_game();

    // Give the colony something to do: dig, chop, store, build.
    let (w, h) = (engine.grid().width(), engine.grid().height());
    let c = Position::new(w / 2, h / 2);
    engine.set_design_mode(DesignMode::Chop);
    engine.designate_area(Position::new(c.x - 12, c.y - 10), Position::new(c.x + 12, c.y + 10));
    engine.set_design_mode(DesignMode::Mine);
    engine.designate_area(Position::new(0, c.y - 2), Position::new(4, c.y + 2));
    engine.set_design_mode(DesignMode::Stockpile);
    engine.designate_area(Position::new(c.x - 4, c.y + 2), Position::new(c.x - 2, c.y + 4));
    for x in c.x + 2..=c.x + 4 {
        for y in c.y + 2..=c.y + 3 {
            engine.grid_mut().set_tile_type(Position::new(x, y), TileType::Floor);
        }
    }
    engine.set_selected_build(BuildType::Wall);
    engine.designate_area(Position::new(c.x + 2, c.y + 2), Position::new(c.x + 4, c.y + 2));
    engine.set_selected_build(BuildType::Bed);
    engine.designate_area(Position::new(c.x + 2, c.y + 3), Position::new(c.x + 3, c.y + 3));
    engine.set_design_mode(DesignMode::None);

    let dt = 0.5;
    let ticks_per_day = (24.0 * 60.0 / dt) as u64;
    let total_ticks = ticks_per_day * days as u64;
    let mut violations: Vec<String> = Vec::new();

    for tick in 0..total_ticks {
        engine.update(dt);
        if let Some(problem) = check_invariants(&engine) {
            violations.push(format!("tick {tick}: {problem}"));
            if violations.len() >= 5 {
                break;
            }
        }
        if engine.is_game_over() {
            log::warn!("colony died out at {}", engine.time_string());
            break;
        }
    }

    results.push(check(
        "soak_invariants_hold",
        violations.is_empty(),
        if violations.is_empty() {
            format!("{} ticks clean", total_ticks)
        } else {
            violations.join("; ")
        },
    ));

    let stats = engine.stats();
    results.push(check(
        "soak_colony_did_work",
        stats.tiles_built > 0 || stats.items_stockpiled > 0,
        format!(
            "built {}, stockpiled {}, survivors {}",
            stats.tiles_built,
            stats.items_stockpiled,
            engine.colonist_count()
        ),
    ));

    let events = counts.borrow().clone();
    let report = SoakReport {
        seed,
        days,
        ticks: total_ticks,
        survivors: engine.colonist_count(),
        max_colonists: stats.max_colonists,
        tiles_built: stats.tiles_built,
        items_stockpiled: stats.items_stockpiled,
        score: engine.score(),
        events,
    };
    if verbose {
        println!(
            "  soak: {} | survivors {} | score {}",
            engine.time_string(),
            report.survivors,
            report.score
        );
    }
    (results, Some(report))
}

/// Structural checks that must hold after every tick.
fn check_invariants(engine: &SimulationEngine) -> Option<String> {
    let grid = engine.grid();
    let colonists = engine.colonists();
    let mut holders: HashMap<_, _> = HashMap::new();

    for c in &colonists {
        if !grid.contains(c.pos) {
            return Some(format!("{} out of bounds at {:?}", c.name, c.pos));
        }
        if is_dead(&c.needs) {
            return Some(format!("{} is dead but still listed", c.name));
        }
        for (kind, value) in [
            ("hunger", c.needs.hunger),
            ("rest", c.needs.rest),
            ("mood", c.needs.mood),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Some(format!("{} has {kind} {value}", c.name));
            }
        }
        if let Some(task_id) = c.current_task {
            if let Some(other) = holders.insert(task_id, c.name.clone()) {
                return Some(format!("{task_id} held by {other} and {}", c.name));
            }
            match engine.tasks().get(task_id) {
                Some(task) if task.assigned_to == Some(c.id) => {}
                Some(task) => {
                    return Some(format!(
                        "{} points at {task_id} assigned to {:?}",
                        c.name, task.assigned_to
                    ))
                }
                None => {
                    // Tasks finishing this tick clear their holder in the
                    // same pass, so a dangling pointer is a bug.
                    return Some(format!("{} points at missing {task_id}", c.name));
                }
            }
        }
    }

    let cap = engine.config().max_messages;
    if engine.messages().len() > cap {
        return Some(format!("message log holds {} > {cap}", engine.messages().len()));
    }

    None
}
