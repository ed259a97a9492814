//! Colonist lookup, ordering, and task hand-off helpers shared by systems.

use hecs::{Entity, World};

use burrow_logic::grid::{Grid, Position};
use burrow_logic::ids::{ColonistId, TaskId};
use burrow_logic::pathfinding::{find_path, neighbors};
use burrow_logic::tasks::TaskQueue;

use crate::components::{Colonist, ColonistState, CurrentTask, MoveCooldown, Path};

/// Living colonists in spawn order.
pub fn colonists_in_order(world: &World) -> Vec<Entity> {
    let mut order: Vec<(u32, Entity)> = world
        .query::<&Colonist>()
        .iter()
        .map(|(entity, colonist)| (colonist.seq, entity))
        .collect();
    order.sort_unstable_by_key(|&(seq, _)| seq);
    order.into_iter().map(|(_, entity)| entity).collect()
}

pub fn find_colonist(world: &World, id: ColonistId) -> Option<Entity> {
    world
        .query::<&Colonist>()
        .iter()
        .find(|(_, colonist)| colonist.id == id)
        .map(|(entity, _)| entity)
}

pub fn colonist_count(world: &World) -> usize {
    world.query::<&Colonist>().iter().count()
}

/// Put a colonist back to IDLE with no task and no path.
pub fn clear_assignment(world: &mut World, entity: Entity) {
    if let Ok((state, current, path)) =
        world.query_one_mut::<(&mut ColonistState, &mut CurrentTask, &mut Path)>(entity)
    {
        *state = ColonistState::Idle;
        current.0 = None;
        path.clear();
    }
}

/// Route from `from` to a task at `target`.
///
/// Walkable targets are walked onto. For a blocked target such as rock or
/// a tree, the closest reachable orthogonal neighbour is used instead. An
/// empty route means nothing is reachable and the work happens in place.
pub fn route_to(grid: &Grid, from: Position, target: Position) -> Vec<Position> {
    if grid.is_walkable_at(target) {
        return find_path(grid, from, target);
    }
    let mut best: Vec<Position> = Vec::new();
    for stand in neighbors(grid, target) {
        let path = find_path(grid, from, stand);
        if !path.is_empty() && (best.is_empty() || path.len() < best.len()) {
            best = path;
        }
    }
    best
}

/// Give `task_id` to the colonist at `entity` and send them on their way.
///
/// With `strict` set, a colonist who held the task before is released so
/// it no longer points at a task it doesn't own. Returns false when the
/// task doesn't exist.
pub fn claim_task(
    world: &mut World,
    tasks: &mut TaskQueue,
    grid: &Grid,
    strict: bool,
    entity: Entity,
    task_id: TaskId,
    state: ColonistState,
) -> bool {
    let (id, from) = match world.query_one_mut::<(&Colonist, &Position)>(entity) {
        Ok((colonist, pos)) => (colonist.id, *pos),
        Err(_) => return false,
    };
    let Some(task) = tasks.get_mut(task_id) else {
        return false;
    };
    let previous = task.assign(id);
    let target = task.pos;

    if let Some(prev) = previous.filter(|&prev| prev != id) {
        log::warn!("{} took {} from {}", id, task_id, prev);
        if strict {
            if let Some(prev_entity) = find_colonist(world, prev) {
                let holds = world
                    .get::<&CurrentTask>(prev_entity)
                    .map_or(false, |current| current.0 == Some(task_id));
                if holds {
                    clear_assignment(world, prev_entity);
                }
            }
        }
    }

    let route = route_to(grid, from, target);
    if let Ok((colonist_state, current, path, cooldown)) = world
        .query_one_mut::<(&mut ColonistState, &mut CurrentTask, &mut Path, &mut MoveCooldown)>(
            entity,
        )
    {
        *colonist_state = state;
        current.0 = Some(task_id);
        *path = Path::new(route);
        cooldown.0 = 0.0;
    }
    true
}
