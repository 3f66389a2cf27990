//! Kinematic integration system.
//!
//! Updates Position from Velocity each tick: position += velocity * dt.

use hecs::World;

use quarantine_core::components::Disabled;
use quarantine_core::types::{Position, Velocity};

/// Integrate every moving entity over `dt` seconds.
pub fn run(world: &mut World, dt: f64) {
    if dt <= 0.0 {
        return;
    }
    for (_entity, (pos, vel)) in world
        .query_mut::<(&mut Position, &Velocity)>()
        .without::<&Disabled>()
    {
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
    }
}
