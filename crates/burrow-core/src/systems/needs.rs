//! Needs system - decays every colonist's needs by elapsed seconds

use crate::components::{Needs, Trait};
use hecs::World;

pub fn needs_system(world: &mut World, delta_seconds: f32) {
    for (_, (needs, trait_)) in world.query_mut::<(&mut Needs, &Trait)>() {
        needs.decay(*trait_, delta_seconds);
    }
}
