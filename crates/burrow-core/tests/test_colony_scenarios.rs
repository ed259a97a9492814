//! End-to-end colony scenarios driven through `SimulationEngine`.
//!
//! Every scenario starts on a flat 20x20 grass map so colonist spawn
//! points are known: the map centre is (10, 10) and the first colonist
//! stands at (9, 9), the second at (10, 9), the third at (11, 9).

use burrow_core::prelude::*;
use burrow_core::systems::{claim_task, find_colonist};
use burrow_logic::building::count_in_stockpiles;
use burrow_logic::grid::{Grid, TileType};
use burrow_logic::items::{ItemStack, ItemType};
use burrow_logic::time::GameClock;

// ── Helpers ────────────────────────────────────────────────────────────

const DT: f32 = 0.1;

fn colony_of(colonists: u32) -> SimulationEngine {
    let config = ColonyConfig {
        free_construction: false,
        ..ColonyConfig::default().with_colonists(colonists)
    };
    let mut engine = SimulationEngine::new(config);
    engine.start_game_with(Grid::new(20, 20));
    engine
}

/// Tick until `done` holds, up to `max_ticks`. Returns whether it held.
fn run_until(
    engine: &mut SimulationEngine,
    max_ticks: usize,
    done: impl Fn(&SimulationEngine) -> bool,
) -> bool {
    for _ in 0..max_ticks {
        engine.update(DT);
        if done(engine) {
            return true;
        }
    }
    false
}

fn first_colonist(engine: &SimulationEngine) -> ColonistSnapshot {
    engine.colonists().remove(0)
}

/// Tiles walked away from (9, 9) on an open map.
fn steps_from_spawn(engine: &SimulationEngine) -> u32 {
    first_colonist(engine).pos.manhattan(Position::new(9, 9))
}

// ── Mining ─────────────────────────────────────────────────────────────

#[test]
fn mined_rock_becomes_floor_with_two_stone() {
    let mut engine = colony_of(3);
    let rock = Position::new(14, 9);
    engine.grid_mut().set_tile_type(rock, TileType::Rock);
    engine.set_design_mode(DesignMode::Mine);
    engine.designate_area(rock, rock);
    assert_eq!(engine.tasks().len(), 1);

    assert!(run_until(&mut engine, 600, |e| e.tasks().is_empty()));

    let tile = engine.grid().tile(rock).unwrap();
    assert_eq!(tile.tile_type, TileType::Floor);
    assert_eq!(tile.designation, None);
    assert_eq!(tile.item, Some(ItemStack::new(ItemType::Stone, 2)));
    assert!(engine.messages().iter().any(|m| m.ends_with("finished mining")));
    assert!(engine
        .colonists()
        .iter()
        .all(|c| c.state == ColonistState::Idle && c.current_task.is_none()));
}

#[test]
fn one_task_is_claimed_by_exactly_one_colonist() {
    let mut engine = colony_of(3);
    let tree = Position::new(10, 15);
    engine.grid_mut().set_tile_type(tree, TileType::Tree);
    engine.set_design_mode(DesignMode::Chop);
    engine.designate_area(tree, tree);

    engine.update(DT);

    let task = engine.tasks().iter().next().unwrap().clone();
    let holders: Vec<ColonistSnapshot> = engine
        .colonists()
        .into_iter()
        .filter(|c| c.current_task == Some(task.id))
        .collect();
    assert_eq!(holders.len(), 1);
    assert_eq!(task.assigned_to, Some(holders[0].id));
    assert_eq!(holders[0].state, ColonistState::Working);
}

// ── Needs ──────────────────────────────────────────────────────────────

#[test]
fn starving_colonist_loses_one_health_per_second() {
    let mut engine = colony_of(1);
    let id = first_colonist(&engine).id;
    let starving = Needs {
        health: 50.0,
        hunger: 0.0,
        ..Needs::default()
    };
    assert!(engine.set_needs(id, starving));

    engine.update(0.5);
    let health = engine.colonist(id).unwrap().needs.health;
    assert!((health - 49.5).abs() < 1e-4, "health = {health}");

    engine.update(2.0);
    let health = engine.colonist(id).unwrap().needs.health;
    assert!((health - 47.5).abs() < 1e-4, "health = {health}");
}

#[test]
fn hungry_colonist_eats_reserved_meal() {
    let mut engine = colony_of(1);
    let id = first_colonist(&engine).id;
    let meal = Position::new(12, 9);
    engine
        .grid_mut()
        .place_item(meal, ItemStack::single(ItemType::Meal));
    let hungry = Needs {
        hunger: 40.0,
        ..Needs::default()
    };
    engine.set_needs(id, hungry);

    engine.update(DT);
    let eating = engine.colonist(id).unwrap();
    assert_eq!(eating.state, ColonistState::Eating);
    // The meal is reserved straight away.
    assert_eq!(engine.grid().item_at(meal), None);

    assert!(run_until(&mut engine, 300, |e| {
        e.colonist(id).unwrap().state == ColonistState::Idle
    }));
    let fed = engine.colonist(id).unwrap();
    assert!(fed.needs.hunger > 85.0, "hunger = {}", fed.needs.hunger);
    assert!(engine.messages().iter().any(|m| m.ends_with("ate a meal")));
}

#[test]
fn dead_colonist_leaves_task_unassigned() {
    let mut engine = colony_of(1);
    let id = first_colonist(&engine).id;
    let rock = Position::new(18, 18);
    engine.grid_mut().set_tile_type(rock, TileType::Rock);
    engine.set_design_mode(DesignMode::Mine);
    engine.designate_area(rock, rock);

    engine.update(DT);
    let task_id = engine.tasks().iter().next().unwrap().id;
    assert_eq!(engine.tasks().get(task_id).unwrap().assigned_to, Some(id));

    let dying = Needs {
        health: 0.0,
        ..Needs::default()
    };
    engine.set_needs(id, dying);
    engine.update(DT);

    let task = engine.tasks().get(task_id).unwrap();
    assert_eq!(task.assigned_to, None);
    assert_eq!(engine.colonist_count(), 0);
    assert!(engine.is_game_over());
    assert!(engine.messages().iter().any(|m| m.ends_with("has died")));
}

#[test]
fn tired_colonist_sleeps_then_wakes_rested() {
    let mut engine = colony_of(1);
    let id = first_colonist(&engine).id;
    let tired = Needs {
        rest: 20.0,
        ..Needs::default()
    };
    engine.set_needs(id, tired);

    engine.update(DT);
    assert_eq!(engine.colonist(id).unwrap().state, ColonistState::Sleeping);
    assert!(engine.messages().iter().any(|m| m.ends_with("went to sleep")));

    let entity = find_colonist(&engine.world, id).unwrap();
    *engine.world.get::<&mut Path>(entity).unwrap() =
        Path::new(vec![Position::new(9, 9), Position::new(9, 10)]);

    assert!(run_until(&mut engine, 100, |e| {
        e.colonist(id).unwrap().state == ColonistState::Idle
    }));
    let awake = engine.colonist(id).unwrap();
    assert!(awake.path.is_empty());
    assert!(awake.needs.rest > 99.0, "rest = {}", awake.needs.rest);
    assert!(engine.messages().iter().any(|m| m.ends_with("woke up")));
}

#[test]
fn exhausted_colonist_walks_at_half_speed() {
    let far_tree = Position::new(19, 19);
    let walk = |rest: f32| {
        let mut engine = colony_of(1);
        let id = first_colonist(&engine).id;
        engine.set_needs(id, Needs { rest, ..Needs::default() });
        engine.grid_mut().set_tile_type(far_tree, TileType::Tree);
        engine.set_design_mode(DesignMode::Chop);
        engine.designate_area(far_tree, far_tree);
        assert_eq!(engine.assign_tasks(), 1);
        for _ in 0..10 {
            engine.update(DT);
        }
        steps_from_spawn(&engine)
    };

    let rested = walk(100.0);
    let exhausted = walk(0.0);
    assert_eq!(rested, 10);
    assert!((4..=6).contains(&exhausted), "exhausted walked {exhausted}");
}

// ── Reassignment ───────────────────────────────────────────────────────

fn contested_chop(strict: bool) -> (SimulationEngine, ColonistSnapshot, ColonistSnapshot) {
    let mut engine = colony_of(2);
    let tree = Position::new(15, 9);
    engine.grid_mut().set_tile_type(tree, TileType::Tree);
    engine.set_design_mode(DesignMode::Chop);
    engine.designate_area(tree, tree);
    // (10, 9) is nearer, so the second colonist gets it first.
    assert_eq!(engine.assign_tasks(), 1);

    let task_id = engine.tasks().iter().next().unwrap().id;
    let first = first_colonist(&engine);
    let entity = find_colonist(&engine.world, first.id).unwrap();
    assert!(claim_task(
        &mut engine.world,
        &mut engine.colony.tasks,
        &engine.colony.grid,
        strict,
        entity,
        task_id,
        ColonistState::Working,
    ));

    let colonists = engine.colonists();
    let (taker, previous) = (colonists[0].clone(), colonists[1].clone());
    assert_eq!(engine.tasks().get(task_id).unwrap().assigned_to, Some(taker.id));
    assert_eq!(taker.current_task, Some(task_id));
    (engine, taker, previous)
}

#[test]
fn strict_reassignment_releases_previous_holder() {
    let (_, _, previous) = contested_chop(true);
    assert_eq!(previous.state, ColonistState::Idle);
    assert_eq!(previous.current_task, None);
    assert!(previous.path.is_empty());
}

#[test]
fn lenient_reassignment_leaves_stale_pointer() {
    let (engine, _, previous) = contested_chop(false);
    let task_id = engine.tasks().iter().next().unwrap().id;
    assert_eq!(previous.state, ColonistState::Working);
    assert_eq!(previous.current_task, Some(task_id));
}

// ── Clock ──────────────────────────────────────────────────────────────

#[test]
fn midnight_rolls_into_next_day() {
    let mut engine = colony_of(1);
    engine.clock = GameClock {
        day: 1,
        hour: 23,
        minute: 59.0,
    };

    engine.update(2.0);

    assert_eq!(engine.clock().day, 2);
    assert_eq!(engine.clock().hour, 0);
    assert!((engine.clock().minute - 1.0).abs() < 1e-4);
    assert_eq!(engine.messages().latest(), Some("Day 2 begins"));
}

// ── Hauling and building ───────────────────────────────────────────────

#[test]
fn loose_stone_is_hauled_into_stockpile() {
    let mut engine = colony_of(1);
    engine.set_design_mode(DesignMode::Stockpile);
    engine.designate_area(Position::new(4, 4), Position::new(5, 4));
    let loose = Position::new(13, 10);
    engine
        .grid_mut()
        .place_item(loose, ItemStack::new(ItemType::Stone, 2));

    assert!(run_until(&mut engine, 600, |e| e.stats().items_stockpiled > 0));

    assert_eq!(engine.grid().item_at(loose), None);
    assert_eq!(engine.stats().items_stockpiled, 2);
    assert_eq!(
        count_in_stockpiles(engine.grid(), engine.stockpiles(), ItemType::Stone),
        2
    );
}

#[test]
fn wall_consumes_stockpiled_stone() {
    let mut engine = colony_of(1);
    engine.set_design_mode(DesignMode::Stockpile);
    engine.designate_area(Position::new(4, 4), Position::new(5, 4));
    engine
        .grid_mut()
        .place_item(Position::new(4, 4), ItemStack::new(ItemType::Stone, 1));
    engine
        .grid_mut()
        .place_item(Position::new(5, 4), ItemStack::new(ItemType::Stone, 1));

    let site = Position::new(12, 12);
    engine.grid_mut().set_tile_type(site, TileType::Floor);
    engine.set_selected_build(BuildType::Wall);
    assert!(engine.place_build(site));

    assert!(run_until(&mut engine, 600, |e| e.tasks().is_empty()));

    assert_eq!(engine.grid().tile(site).unwrap().tile_type, TileType::Wall);
    assert_eq!(engine.stats().tiles_built, 1);
    assert_eq!(
        count_in_stockpiles(engine.grid(), engine.stockpiles(), ItemType::Stone),
        0
    );
}

#[test]
fn wall_without_materials_is_dropped() {
    let mut engine = colony_of(1);
    let site = Position::new(12, 12);
    engine.grid_mut().set_tile_type(site, TileType::Floor);
    engine.set_selected_build(BuildType::Wall);
    assert!(engine.place_build(site));

    assert!(run_until(&mut engine, 600, |e| e.tasks().is_empty()));

    assert_eq!(engine.grid().tile(site).unwrap().tile_type, TileType::Floor);
    assert_eq!(engine.stats().tiles_built, 0);
    assert!(engine
        .messages()
        .iter()
        .any(|m| m.ends_with("lacks materials for wall")));
}

#[test]
fn bed_build_registers_bed() {
    let mut engine = colony_of(1);
    let config = engine.config().clone();
    assert!(!config.free_construction);

    engine.set_design_mode(DesignMode::Stockpile);
    engine.designate_area(Position::new(4, 4), Position::new(4, 4));
    engine
        .grid_mut()
        .place_item(Position::new(4, 4), ItemStack::new(ItemType::Wood, 2));
    let site = Position::new(9, 12);
    engine.grid_mut().set_tile_type(site, TileType::Floor);
    engine.set_selected_build(BuildType::Bed);
    assert!(engine.place_build(site));

    assert!(run_until(&mut engine, 600, |e| e.tasks().is_empty()));

    assert_eq!(engine.beds().len(), 1);
    assert_eq!(engine.beds()[0].pos, site);
    assert!(engine.beds()[0].is_available());
}

#[test]
fn loose_items_are_hauled_even_when_stockpiles_are_full() {
    let mut engine = colony_of(1);
    let pile = Position::new(4, 4);
    engine.set_design_mode(DesignMode::Stockpile);
    engine.designate_area(pile, pile);
    engine.grid_mut().place_item(pile, ItemStack::single(ItemType::Wood));
    let loose = Position::new(13, 10);
    engine
        .grid_mut()
        .place_item(loose, ItemStack::new(ItemType::Stone, 2));

    engine.update(DT);
    let haul = engine
        .tasks()
        .iter()
        .find(|t| t.task_type == TaskType::Haul)
        .cloned()
        .unwrap();
    assert_eq!(haul.pos, loose);
    assert_eq!(haul.assigned_to, Some(first_colonist(&engine).id));

    // Nowhere to put it, so each haul drops the stone back where it was.
    for _ in 0..200 {
        engine.update(DT);
    }
    assert_eq!(engine.grid().item_at(loose), Some(&ItemStack::new(ItemType::Stone, 2)));
    assert_eq!(engine.grid().item_at(pile), Some(&ItemStack::single(ItemType::Wood)));
    assert_eq!(engine.stats().items_stockpiled, 0);
}

// ── Cooking ────────────────────────────────────────────────────────────

#[test]
fn stockpiled_raw_food_is_cooked_into_one_meal() {
    let mut engine = colony_of(1);
    let pile = Position::new(4, 4);
    engine.set_design_mode(DesignMode::Stockpile);
    engine.designate_area(pile, pile);
    engine
        .grid_mut()
        .place_item(pile, ItemStack::new(ItemType::RawFood, 5));

    engine.update(DT);
    let cook = engine.tasks().iter().next().cloned().unwrap();
    assert_eq!(cook.task_type, TaskType::Cook);
    assert_eq!(cook.pos, pile);
    assert_eq!(first_colonist(&engine).state, ColonistState::Working);

    assert!(run_until(&mut engine, 300, |e| {
        e.grid()
            .item_at(pile)
            .is_some_and(|item| item.item_type == ItemType::Meal)
    }));
    assert_eq!(engine.grid().item_at(pile), Some(&ItemStack::single(ItemType::Meal)));
    assert!(engine.messages().iter().any(|m| m.ends_with("cooked a meal")));
}
