//! Work system - walks colonists to their tasks, accrues work, applies results
//!
//! A colonist holding a task first walks its path one node at a time,
//! gated by a movement cooldown. Once the path is used up it works on the
//! spot, and the task's effects land on the map when enough work has
//! accumulated.

use hecs::{Entity, World};

use burrow_logic::building::{
    build, can_build, consume_materials, find_nearest_stockpile_space, has_materials,
    is_in_stockpile, BuildType,
};
use burrow_logic::colonist::{movement_speed, work_speed, NeedKind};
use burrow_logic::config::ColonyConfig;
use burrow_logic::constants::economy::{CHOP_YIELD, MINE_YIELD};
use burrow_logic::constants::needs::MEAL_HUNGER_RESTORE;
use burrow_logic::constants::work::{MOVE_COOLDOWN, TICKS_PER_SECOND};
use burrow_logic::grid::TileType;
use burrow_logic::ids::TaskId;
use burrow_logic::items::{ItemStack, ItemType};
use burrow_logic::tasks::{Task, TaskType};

use super::roster::{clear_assignment, colonists_in_order, route_to};
use crate::colony::Colony;
use crate::components::{
    Colonist, ColonistState, CurrentTask, MoveCooldown, Needs, Path, Position, Skills, Trait,
};
use crate::events::{ColonyEvent, EventSink};

pub fn work_system(
    world: &mut World,
    colony: &mut Colony,
    config: &ColonyConfig,
    events: &mut dyn EventSink,
    delta_seconds: f32,
) {
    for entity in colonists_in_order(world) {
        advance(world, colony, config, events, entity, delta_seconds);
    }
}

fn advance(
    world: &mut World,
    colony: &mut Colony,
    config: &ColonyConfig,
    events: &mut dyn EventSink,
    entity: Entity,
    dt: f32,
) {
    let (state, current, needs, skills, trait_) = match world
        .query_one_mut::<(&ColonistState, &CurrentTask, &Needs, &Skills, &Trait)>(entity)
    {
        Ok((state, current, needs, skills, trait_)) => (*state, current.0, *needs, *skills, *trait_),
        Err(_) => return,
    };
    if !state.holds_task() {
        return;
    }
    let Some(task_id) = current else {
        clear_assignment(world, entity);
        return;
    };
    let Some((task_type, task_pos)) = colony.tasks.get(task_id).map(|t| (t.task_type, t.pos))
    else {
        clear_assignment(world, entity);
        return;
    };

    if let Ok((pos, path, cooldown)) =
        world.query_one_mut::<(&mut Position, &mut Path, &mut MoveCooldown)>(entity)
    {
        if let Some(next) = path.next_step() {
            if !colony.grid.is_walkable_at(next) {
                *path = Path::new(route_to(&colony.grid, *pos, task_pos));
                return;
            }
            cooldown.0 -= dt * movement_speed(&needs);
            if cooldown.0 <= 0.0 {
                *pos = next;
                path.advance();
                cooldown.0 = MOVE_COOLDOWN;
            }
            return;
        }
    }

    let amount = work_speed(&needs, &skills, trait_, task_type) * dt * TICKS_PER_SECOND;
    let complete = colony
        .tasks
        .get_mut(task_id)
        .map_or(false, |task| task.progress(amount));
    if complete {
        complete_task(world, colony, config, events, entity, task_id);
    }
}

/// Apply a finished task's effects, drop it from the queue, and free the
/// colonist.
pub fn complete_task(
    world: &mut World,
    colony: &mut Colony,
    config: &ColonyConfig,
    events: &mut dyn EventSink,
    entity: Entity,
    task_id: TaskId,
) {
    let (name, at) = match world.query_one_mut::<(&Colonist, &Position)>(entity) {
        Ok((colonist, pos)) => (colonist.name.clone(), *pos),
        Err(_) => return,
    };
    let Some(task) = colony.tasks.remove(task_id) else {
        return;
    };
    log::debug!("{} completed {} ({})", name, task.id, task.task_type.label());

    match task.task_type {
        TaskType::Mine => {
            colony.grid.set_tile_type(task.pos, TileType::Floor);
            colony.grid.clear_designation(task.pos);
            colony
                .grid
                .place_item(task.pos, ItemStack::new(ItemType::Stone, MINE_YIELD));
            colony.messages.push(format!("{} finished mining", name));
            events.emit(ColonyEvent::Mine);
        }
        TaskType::Chop => {
            colony.grid.set_tile_type(task.pos, TileType::Grass);
            colony.grid.clear_designation(task.pos);
            colony
                .grid
                .place_item(task.pos, ItemStack::new(ItemType::Wood, CHOP_YIELD));
            colony.messages.push(format!("{} finished chopping", name));
            events.emit(ColonyEvent::Chop);
        }
        TaskType::Haul => haul(colony, &task, at, &name),
        TaskType::Cook => cook(colony, &task, &name),
        TaskType::Build => finish_build(colony, config, events, &task, &name),
        TaskType::Eat => {
            if let Ok(mut needs) = world.get::<&mut Needs>(entity) {
                needs.satisfy(NeedKind::Hunger, MEAL_HUNGER_RESTORE);
            }
            colony.messages.push(format!("{} ate a meal", name));
            events.emit(ColonyEvent::Eat);
        }
        TaskType::Sleep => {}
    }

    events.emit(ColonyEvent::TaskComplete);
    clear_assignment(world, entity);
}

fn haul(colony: &mut Colony, task: &Task, from: Position, name: &str) {
    let Some(item) = colony.grid.remove_item(task.pos) else {
        return;
    };
    let stored = find_nearest_stockpile_space(&colony.grid, &colony.stockpiles, from)
        .is_some_and(|dest| colony.grid.place_item(dest, item));
    if stored {
        colony.stats.items_stockpiled = colony.stats.items_stockpiled.saturating_add(item.quantity);
        colony
            .messages
            .push(format!("{} hauled {}", name, item.item_type.label()));
    } else if !colony.grid.place_item(task.pos, item) {
        log::warn!(
            "dropped {} {} at ({}, {}) with nowhere to put it",
            item.quantity,
            item.item_type.label(),
            task.pos.x,
            task.pos.y
        );
    }
}

/// The whole raw-food stack is used up for a single meal.
fn cook(colony: &mut Colony, task: &Task, name: &str) {
    let Some(item) = colony.grid.remove_item(task.pos) else {
        return;
    };
    if item.item_type == ItemType::RawFood {
        colony
            .grid
            .place_item(task.pos, ItemStack::single(ItemType::Meal));
        colony.messages.push(format!("{} cooked a meal", name));
    } else {
        colony.grid.place_item(task.pos, item);
    }
}

fn finish_build(
    colony: &mut Colony,
    config: &ColonyConfig,
    events: &mut dyn EventSink,
    task: &Task,
    name: &str,
) {
    let Some(build_type) = task.build_type else {
        return;
    };
    let label = build_type.label();
    if !can_build(&colony.grid, task.pos, build_type) {
        colony
            .messages
            .push(format!("{} could not build {} here", name, label));
        return;
    }

    if build_type == BuildType::Stockpile && is_in_stockpile(&colony.stockpiles, task.pos) {
        colony
            .messages
            .push(format!("{} found a stockpile already here", name));
        return;
    }

    let cost = build_type.cost();
    if has_materials(&colony.grid, &colony.stockpiles, &cost) {
        consume_materials(&mut colony.grid, &colony.stockpiles, &cost);
    } else if !config.free_construction {
        colony
            .messages
            .push(format!("{} lacks materials for {}", name, label));
        return;
    }

    if !build(&mut colony.grid, task.pos, build_type) {
        return;
    }
    match build_type {
        BuildType::Bed => {
            colony.add_bed(task.pos);
        }
        BuildType::Stockpile => {
            colony.add_stockpile(vec![task.pos]);
        }
        BuildType::Wall | BuildType::Floor | BuildType::Door => {}
    }
    colony.stats.tiles_built = colony.stats.tiles_built.saturating_add(1);
    log::info!("{} finished building {}", name, label);
    colony
        .messages
        .push(format!("{} finished building {}", name, label));
    events.emit(ColonyEvent::Build);
}
