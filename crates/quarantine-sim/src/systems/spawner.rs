//! Population spawner. Places agents one at a time on a fixed delay.

use glam::DVec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use quarantine_core::config::{PopulationConfig, WanderConfig};
use quarantine_core::types::Position;

use quarantine_epidemic::PopulationCounters;

use crate::world_setup::{self, AgentTemplate};

/// Spawner progress for one run.
#[derive(Debug, Clone, Default)]
pub struct SpawnSchedule {
    /// Center of the spawn disc.
    pub origin: Position,
    pub requested: u32,
    pub attempted: u32,
    pub spawned: u32,
    /// Simulation time of the next attempt.
    pub next_attempt_at: f64,
    /// Points already used, for the separation check.
    used: Vec<Position>,
}

impl SpawnSchedule {
    /// A schedule whose first attempt happens at `start`.
    pub fn new(origin: Position, requested: u32, start: f64) -> Self {
        Self {
            origin,
            requested,
            attempted: 0,
            spawned: 0,
            next_attempt_at: start,
            used: Vec::with_capacity(requested as usize),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.attempted >= self.requested
    }
}

/// Make every attempt that is due at `now`.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    schedule: &mut SpawnSchedule,
    population: &PopulationConfig,
    template: &AgentTemplate,
    wander: &WanderConfig,
    next_agent_id: &mut u32,
    counters: &mut PopulationCounters,
    now: f64,
) {
    while !schedule.is_finished() && now >= schedule.next_attempt_at {
        schedule.attempted += 1;
        schedule.next_attempt_at += population.spawn_delay;

        let Some(position) = find_spawn_point(rng, schedule, population) else {
            debug!(attempt = schedule.attempted, "no free spawn point; skipped");
            continue;
        };

        match world_setup::spawn_agent(
            world,
            rng,
            template,
            wander,
            next_agent_id,
            counters,
            position,
            now,
        ) {
            Ok(_) => {
                schedule.used.push(position);
                schedule.spawned += 1;
            }
            Err(err) => warn!(%err, "spawn failed"),
        }

        if schedule.is_finished() {
            debug!(
                spawned = schedule.spawned,
                requested = schedule.requested,
                "spawner finished"
            );
        }
    }
}

/// Sample points in the spawn disc until one keeps its distance from every
/// earlier spawn, or the attempt budget runs out.
fn find_spawn_point(
    rng: &mut ChaCha8Rng,
    schedule: &SpawnSchedule,
    population: &PopulationConfig,
) -> Option<Position> {
    let min_sq = population.min_spawn_separation * population.min_spawn_separation;
    let origin = schedule.origin;

    for _ in 0..population.attempts_per_agent {
        let offset = random_in_disc(rng) * population.spawn_radius;
        let candidate = Position::new(origin.x + offset.x, origin.y + offset.y, origin.z);

        let far_enough = population.min_spawn_separation <= 0.0
            || schedule
                .used
                .iter()
                .all(|p| p.horizontal().distance_squared(candidate.horizontal()) >= min_sq);
        if far_enough {
            return Some(candidate);
        }
    }
    None
}

/// Uniform sample from the unit disc.
pub fn random_in_disc(rng: &mut ChaCha8Rng) -> DVec2 {
    let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let radius: f64 = rng.gen::<f64>().sqrt();
    DVec2::from_angle(angle) * radius
}
