//! Colonist AI - picks what each idle colonist does next
//!
//! Branches are tried in order and the first that applies wins:
//!
//! 1. Hungry: reserve the nearest meal (else raw food) and go eat it.
//! 2. Tired: fall asleep on the spot.
//! 3. An unassigned task exists: claim the nearest, most urgent one.
//! 4. A loose item lies outside every stockpile: haul it in.
//! 5. Raw food sits in a stockpile: cook it.
//!
//! Sleeping colonists recover rest here and wake once fully rested.
//! Working and eating colonists are left to the work system.

use hecs::{Entity, World};

use burrow_logic::building::is_in_stockpile;
use burrow_logic::colonist::{is_hungry, is_tired, NeedKind};
use burrow_logic::config::ColonyConfig;
use burrow_logic::constants::needs::{MAX, SLEEP_REST_PER_TICK};
use burrow_logic::constants::work::{COOK_PRIORITY, EAT_PRIORITY, HAUL_PRIORITY};
use burrow_logic::grid::Position;
use burrow_logic::ids::{ColonistId, TaskId};
use burrow_logic::items::{nearest_item, ItemType};
use burrow_logic::tasks::{Task, TaskType};

use super::roster::{claim_task, colonists_in_order};
use crate::colony::Colony;
use crate::components::{Colonist, ColonistState, Needs, Path};
use crate::events::{ColonyEvent, EventSink};

pub fn ai_system(
    world: &mut World,
    colony: &mut Colony,
    config: &ColonyConfig,
    events: &mut dyn EventSink,
) {
    for entity in colonists_in_order(world) {
        decide(world, colony, config, events, entity);
    }
}

fn decide(
    world: &mut World,
    colony: &mut Colony,
    config: &ColonyConfig,
    events: &mut dyn EventSink,
    entity: Entity,
) {
    let (id, name, pos, needs, state) = match world
        .query_one_mut::<(&Colonist, &Position, &Needs, &ColonistState)>(entity)
    {
        Ok((colonist, pos, needs, state)) => {
            (colonist.id, colonist.name.clone(), *pos, *needs, *state)
        }
        Err(_) => return,
    };

    match state {
        ColonistState::Sleeping => {
            sleep_tick(world, colony, entity, id, &name);
            return;
        }
        ColonistState::Idle => {}
        ColonistState::Working | ColonistState::Eating | ColonistState::Moving => return,
    }

    if is_hungry(&needs) {
        let food = nearest_item(&colony.grid, pos, ItemType::Meal)
            .or_else(|| nearest_item(&colony.grid, pos, ItemType::RawFood));
        if let Some(food_pos) = food {
            let task_id =
                colony
                    .tasks
                    .create(&mut colony.ids, TaskType::Eat, food_pos, Some(EAT_PRIORITY));
            claim_task(
                world,
                &mut colony.tasks,
                &colony.grid,
                config.strict_reassignment,
                entity,
                task_id,
                ColonistState::Eating,
            );
            // Reserved: nobody else can see or take it now.
            colony.grid.remove_item(food_pos);
            log::debug!("{} heads to eat at ({}, {})", name, food_pos.x, food_pos.y);
            return;
        }
    }

    if is_tired(&needs) {
        if let Ok(mut state) = world.get::<&mut ColonistState>(entity) {
            *state = ColonistState::Sleeping;
        }
        if let Some(bed) = colony
            .beds
            .iter_mut()
            .find(|b| b.pos == pos && b.is_available())
        {
            bed.occupy(id);
        }
        colony.messages.push(format!("{} went to sleep", name));
        events.emit(ColonyEvent::Sleep);
        log::debug!("{} went to sleep", name);
        return;
    }

    if let Some(task_id) = pick_designated_task(colony.tasks.unassigned(), pos) {
        claim_task(
            world,
            &mut colony.tasks,
            &colony.grid,
            config.strict_reassignment,
            entity,
            task_id,
            ColonistState::Working,
        );
        log::debug!("{} claimed {}", name, task_id);
        return;
    }

    if !colony.stockpiles.is_empty() {
        if let Some(haul_pos) = find_item_to_haul(colony) {
            let task_id =
                colony
                    .tasks
                    .create(&mut colony.ids, TaskType::Haul, haul_pos, Some(HAUL_PRIORITY));
            claim_task(
                world,
                &mut colony.tasks,
                &colony.grid,
                config.strict_reassignment,
                entity,
                task_id,
                ColonistState::Working,
            );
            log::debug!("{} will haul from ({}, {})", name, haul_pos.x, haul_pos.y);
            return;
        }
    }

    if let Some(cook_pos) = find_raw_food_to_cook(colony) {
        let task_id =
            colony
                .tasks
                .create(&mut colony.ids, TaskType::Cook, cook_pos, Some(COOK_PRIORITY));
        claim_task(
            world,
            &mut colony.tasks,
            &colony.grid,
            config.strict_reassignment,
            entity,
            task_id,
            ColonistState::Working,
        );
        log::debug!("{} will cook at ({}, {})", name, cook_pos.x, cook_pos.y);
    }
}

fn sleep_tick(world: &mut World, colony: &mut Colony, entity: Entity, id: ColonistId, name: &str) {
    let rested = match world.get::<&mut Needs>(entity) {
        Ok(mut needs) => {
            needs.satisfy(NeedKind::Rest, SLEEP_REST_PER_TICK);
            needs.rest >= MAX
        }
        Err(_) => false,
    };
    if !rested {
        return;
    }
    if let Ok((state, path)) = world.query_one_mut::<(&mut ColonistState, &mut Path)>(entity) {
        *state = ColonistState::Idle;
        path.clear();
    }
    for bed in colony.beds.iter_mut().filter(|b| b.occupied_by == Some(id)) {
        bed.vacate();
    }
    colony.messages.push(format!("{} woke up", name));
    log::debug!("{} woke up", name);
}

/// Most urgent first (smallest priority number), then nearest; among
/// equally near candidates the earlier one in that order wins.
fn pick_designated_task<'a>(
    candidates: impl Iterator<Item = &'a Task>,
    from: Position,
) -> Option<TaskId> {
    let mut sorted: Vec<&Task> = candidates.collect();
    sorted.sort_by_key(|t| t.priority);

    let mut nearest: Option<(&Task, u32)> = None;
    for task in sorted {
        let dist = from.manhattan(task.pos);
        if nearest.map_or(true, |(_, best)| dist < best) {
            nearest = Some((task, dist));
        }
    }
    nearest.map(|(task, _)| task.id)
}

/// First loose item in row-major order that sits outside every stockpile
/// and isn't already being hauled.
fn find_item_to_haul(colony: &Colony) -> Option<Position> {
    colony
        .grid
        .iter()
        .filter(|(_, tile)| tile.item.is_some())
        .map(|(pos, _)| pos)
        .find(|&pos| {
            !is_in_stockpile(&colony.stockpiles, pos) && !colony.tasks.any_at(TaskType::Haul, pos)
        })
}

/// First raw-food stack inside a stockpile, in stockpile order, that
/// nobody is cooking yet.
fn find_raw_food_to_cook(colony: &Colony) -> Option<Position> {
    colony
        .stockpiles
        .iter()
        .flat_map(|s| s.tiles.iter().copied())
        .find(|&pos| {
            colony
                .grid
                .item_at(pos)
                .is_some_and(|item| item.item_type == ItemType::RawFood)
                && !colony.tasks.any_at(TaskType::Cook, pos)
        })
}
