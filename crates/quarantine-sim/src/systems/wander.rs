//! Random-waypoint locomotion.
//!
//! Each walker heads for its waypoint at a constant speed. Once it has
//! arrived and its repath time is due, it picks a new waypoint inside the
//! wander radius around where it stands.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use quarantine_core::components::{Disabled, Wander};
use quarantine_core::config::WanderConfig;
use quarantine_core::types::{Position, Velocity};

use crate::systems::spawner::random_in_disc;

pub fn run(world: &mut World, rng: &mut ChaCha8Rng, config: &WanderConfig, now: f64) {
    if !config.enabled {
        for (_entity, vel) in world.query_mut::<&mut Velocity>().with::<&Wander>() {
            *vel = Velocity::default();
        }
        return;
    }

    for (_entity, (pos, vel, wander)) in world
        .query_mut::<(&Position, &mut Velocity, &mut Wander)>()
        .without::<&Disabled>()
    {
        let arrived = wander.waypoint.horizontal().distance(pos.horizontal())
            <= config.waypoint_reached_distance;
        if arrived && now >= wander.next_repath_at {
            let offset = random_in_disc(rng) * config.wander_radius;
            wander.waypoint = Position::new(pos.x + offset.x, pos.y + offset.y, pos.z);
            wander.next_repath_at = now + repath_delay(rng, config.repath_interval);
        }

        let to_target = wander.waypoint.horizontal() - pos.horizontal();
        *vel = if to_target.length() <= config.waypoint_reached_distance {
            Velocity::default()
        } else {
            Velocity::toward(to_target, config.speed)
        };
    }
}

/// Seconds until the next repath, uniform in the inclusive interval.
pub fn repath_delay(rng: &mut ChaCha8Rng, [lo, hi]: [f64; 2]) -> f64 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo.max(0.0)
    }
}
