//! Death system - removes colonists whose health ran out
//!
//! A dead colonist's task goes back to the pool unassigned so someone else
//! can pick it up, and any bed they held is freed.

use hecs::{Entity, World};

use burrow_logic::colonist::is_dead;
use burrow_logic::ids::{ColonistId, TaskId};

use super::roster::colonists_in_order;
use crate::colony::Colony;
use crate::components::{Colonist, CurrentTask, Needs};
use crate::events::{ColonyEvent, EventSink};

/// Despawn dead colonists. Returns how many died.
pub fn death_system(world: &mut World, colony: &mut Colony, events: &mut dyn EventSink) -> usize {
    let mut dead: Vec<(Entity, ColonistId, String, Option<TaskId>)> = Vec::new();
    for entity in colonists_in_order(world) {
        let Ok((colonist, needs, current)) =
            world.query_one_mut::<(&Colonist, &Needs, &CurrentTask)>(entity)
        else {
            continue;
        };
        if is_dead(needs) {
            dead.push((entity, colonist.id, colonist.name.clone(), current.0));
        }
    }

    for (entity, id, name, task_id) in &dead {
        log::info!("{} ({}) has died", name, id);
        colony.messages.push(format!("{} has died", name));
        events.emit(ColonyEvent::Alert);

        if let Some(task) = task_id.and_then(|t| colony.tasks.get_mut(t)) {
            if task.assigned_to == Some(*id) {
                task.unassign();
            }
        }
        colony.tasks.release_all(*id);
        for bed in colony.beds.iter_mut().filter(|b| b.occupied_by == Some(*id)) {
            bed.vacate();
        }
        let _ = world.despawn(*entity);
    }

    dead.len()
}
