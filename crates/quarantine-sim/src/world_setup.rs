//! Entity factories for populating the simulation world.
//!
//! A walker is a positioned, moving body. Enrolling a walker attaches the
//! infection components and joins it to the population counters.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, warn};

use quarantine_core::components::*;
use quarantine_core::config::{EpidemicConfig, WanderConfig};
use quarantine_core::enums::Category;
use quarantine_core::error::ConfigError;
use quarantine_core::types::{Position, Velocity};

use quarantine_epidemic::{InfectionParams, InfectionState, PopulationCounters};

use crate::systems::{self, lifecycle};

/// Failures local to one agent. The rest of the population is unaffected.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("entity {entity:?} is missing required component {component}")]
    MissingDependency {
        entity: Entity,
        component: &'static str,
    },
    #[error("entity {0:?} is already enrolled")]
    AlreadyEnrolled(Entity),
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
}

/// Everything needed to create agents, derived once from a normalized config.
#[derive(Debug, Clone)]
pub struct AgentTemplate {
    pub params: InfectionParams,
    pub start_randomized: bool,
    pub start_randomized_max: f64,
    pub initial_progress: f64,
    /// Inclusive, ordered, within 1..=10.
    pub spread_power_range: [u32; 2],
    pub spread_tick_interval: f64,
}

impl AgentTemplate {
    /// Build from a config, normalizing a copy of it first. Returns the
    /// issues that had to be repaired.
    pub fn from_config(config: &EpidemicConfig) -> (Self, Vec<ConfigError>) {
        let mut config = config.clone();
        let issues = config.normalize();
        let template = Self {
            params: InfectionParams::from_config(&config.infection),
            start_randomized: config.infection.start_randomized,
            start_randomized_max: config.infection.start_randomized_max,
            initial_progress: config.infection.initial_progress,
            spread_power_range: config.spread.spread_power_range,
            spread_tick_interval: config.spread.spread_tick_interval,
        };
        (template, issues)
    }

    /// Roll the starting state for one agent.
    pub fn roll_state(&self, rng: &mut ChaCha8Rng) -> InfectionState {
        let mut progress = self.initial_progress;
        if self.start_randomized && self.start_randomized_max > 0.0 {
            progress += rng.gen_range(0.0..=self.start_randomized_max);
        }
        let [min, max] = self.spread_power_range;
        let power = rng.gen_range(min.min(max)..=max.max(min));
        InfectionState::new(self.params, progress, power)
    }

    /// Phase-offset the first spread pulse so agents do not pulse in sync.
    pub fn roll_spread_timer(&self, rng: &mut ChaCha8Rng, now: f64) -> SpreadTimer {
        let offset = if self.spread_tick_interval > 0.0 {
            rng.gen_range(0.0..self.spread_tick_interval)
        } else {
            0.0
        };
        SpreadTimer {
            next_spread_at: now + offset,
        }
    }
}

impl Default for AgentTemplate {
    fn default() -> Self {
        Self::from_config(&EpidemicConfig::default()).0
    }
}

/// Spawn a walker standing still at `position`.
pub fn spawn_walker(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    wander: &WanderConfig,
    position: Position,
    now: f64,
) -> Entity {
    let delay = systems::wander::repath_delay(rng, wander.repath_interval);
    world.spawn((
        position,
        Velocity::default(),
        Wander {
            waypoint: position,
            next_repath_at: now + delay,
        },
    ))
}

/// Turn an existing entity into a simulated agent and join it to the
/// population. Entities without a `Position` cannot be found by the
/// spread query; they are tagged `Disabled` instead.
pub fn enroll_agent(
    world: &mut World,
    entity: Entity,
    template: &AgentTemplate,
    rng: &mut ChaCha8Rng,
    next_agent_id: &mut u32,
    counters: &mut PopulationCounters,
    now: f64,
) -> Result<AgentId, SetupError> {
    if !world.contains(entity) {
        return Err(SetupError::NoSuchEntity(entity));
    }
    if world.get::<&InfectionState>(entity).is_ok() {
        return Err(SetupError::AlreadyEnrolled(entity));
    }
    if world.get::<&Position>(entity).is_err() {
        world
            .insert(entity, (Disabled, QueryCategory(Category::Inert)))
            .map_err(|_| SetupError::NoSuchEntity(entity))?;
        warn!(?entity, "agent has no position; excluded from simulation");
        return Err(SetupError::MissingDependency {
            entity,
            component: "Position",
        });
    }

    let agent_id = AgentId(*next_agent_id);
    *next_agent_id += 1;

    let state = template.roll_state(rng);
    let timer = template.roll_spread_timer(rng, now);
    debug!(
        agent = agent_id.0,
        progress = state.progress(),
        spread_power = state.spread_power(),
        "agent enrolled"
    );

    world
        .insert(
            entity,
            (
                agent_id,
                state,
                timer,
                Reveal::default(),
                QueryCategory(Category::Agent),
            ),
        )
        .map_err(|_| SetupError::NoSuchEntity(entity))?;
    lifecycle::join(world, entity, counters);

    Ok(agent_id)
}

/// Spawn a walker and enroll it in one step.
#[allow(clippy::too_many_arguments)]
pub fn spawn_agent(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    template: &AgentTemplate,
    wander: &WanderConfig,
    next_agent_id: &mut u32,
    counters: &mut PopulationCounters,
    position: Position,
    now: f64,
) -> Result<AgentId, SetupError> {
    let entity = spawn_walker(world, rng, wander, position, now);
    enroll_agent(world, entity, template, rng, next_agent_id, counters, now)
}
