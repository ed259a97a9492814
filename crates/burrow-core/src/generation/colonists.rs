//! Colonist generation

use hecs::{Entity, World};
use rand::Rng;

use burrow_logic::colonist::SkillKind;
use burrow_logic::constants::skills;
use burrow_logic::ids::{ColonistId, IdSequence};

use super::names::generate_unique_name;
use crate::components::*;

/// Every skill rolled uniformly in the full skill range.
pub fn random_skills(rng: &mut impl Rng) -> Skills {
    let mut roll = || rng.gen_range(skills::MIN..=skills::MAX);
    Skills {
        mining: roll(),
        construction: roll(),
        farming: roll(),
        cooking: roll(),
        combat: roll(),
    }
}

pub fn random_trait(rng: &mut impl Rng) -> Trait {
    Trait::ALL[rng.gen_range(0..Trait::ALL.len())]
}

/// Spawn a colonist entity with the full component set, idle and fed.
pub fn spawn_colonist(
    world: &mut World,
    ids: &mut IdSequence,
    seq: u32,
    name: &str,
    pos: Position,
    skills: Skills,
    trait_: Trait,
) -> (Entity, ColonistId) {
    let id = ids.next_colonist();
    let entity = world.spawn((
        Colonist {
            id,
            name: name.to_string(),
            seq,
        },
        pos,
        Needs::default(),
        skills,
        trait_,
        ColonistState::Idle,
        CurrentTask::default(),
        Path::default(),
        MoveCooldown::default(),
    ));
    log::info!(
        "spawned {} ({}, {}) at ({}, {}), best skill {:?}",
        name,
        id,
        trait_.label(),
        pos.x,
        pos.y,
        best_skill(&skills)
    );
    (entity, id)
}

/// Spawn the starting colony: three to a row, filling downward from just
/// above and left of `center`. Sequence numbers start at `first_seq`.
pub fn generate_colonists(
    world: &mut World,
    ids: &mut IdSequence,
    count: u32,
    center: Position,
    first_seq: u32,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let mut names: Vec<&'static str> = Vec::with_capacity(count as usize);
    let mut entities = Vec::with_capacity(count as usize);

    for i in 0..count {
        let name = generate_unique_name(rng, &names);
        names.push(name);
        let pos = center.offset((i % 3) as i32 - 1, (i / 3) as i32 - 1);
        let skills = random_skills(rng);
        let trait_ = random_trait(rng);
        let (entity, _) = spawn_colonist(world, ids, first_seq + i, name, pos, skills, trait_);
        entities.push(entity);
    }

    entities
}

fn best_skill(skills: &Skills) -> SkillKind {
    let mut best = SkillKind::ALL[0];
    for kind in SkillKind::ALL {
        if skills.get(kind) > skills.get(best) {
            best = kind;
        }
    }
    best
}
