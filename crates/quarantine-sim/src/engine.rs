//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world, the population counters and
//! the outcome evaluator, processes player commands, runs all systems, and
//! produces `SimulationSnapshot`s. Completely headless, so runs with a
//! fixed seed are reproducible in tests.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use quarantine_core::commands::PlayerCommand;
use quarantine_core::components::AgentId;
use quarantine_core::config::EpidemicConfig;
use quarantine_core::constants::DT;
use quarantine_core::enums::GamePhase;
use quarantine_core::events::PresentationEvent;
use quarantine_core::state::SimulationSnapshot;
use quarantine_core::types::{Position, SimTime};

use quarantine_epidemic::{
    InfectionState, OutcomeEvaluator, OutcomeRules, PopulationCounters, Resolution,
};

use crate::spatial::{SpatialIndex, UniformGridIndex};
use crate::systems;
use crate::systems::spawner::SpawnSchedule;
use crate::world_setup::{self, AgentTemplate, SetupError};

/// Upper bound for the player-controlled time scale.
pub const MAX_TIME_SCALE: f64 = 4.0;

/// Clamp to `[0, MAX_TIME_SCALE]`. NaN falls back to normal speed.
fn clamp_time_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        1.0
    } else {
        scale.clamp(0.0, MAX_TIME_SCALE)
    }
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub epidemic: EpidemicConfig,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    /// Center of the spawn disc.
    pub spawn_origin: Position,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            epidemic: EpidemicConfig::default(),
            time_scale: 1.0,
            spawn_origin: Position::default(),
        }
    }
}

impl From<EpidemicConfig> for SimConfig {
    fn from(epidemic: EpidemicConfig) -> Self {
        Self {
            epidemic,
            ..Self::default()
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    config: EpidemicConfig,
    spawn_origin: Position,
    template: AgentTemplate,
    counters: PopulationCounters,
    evaluator: OutcomeEvaluator,
    index: Box<dyn SpatialIndex + Send>,
    schedule: SpawnSchedule,
    next_agent_id: u32,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<PresentationEvent>,
}

impl SimulationEngine {
    /// Create a new engine backed by a uniform grid index.
    pub fn new(config: SimConfig) -> Self {
        Self::with_index(config, Box::new(UniformGridIndex::default()))
    }

    /// Create a new engine backed by the given spatial index.
    pub fn with_index(config: SimConfig, index: Box<dyn SpatialIndex + Send>) -> Self {
        let SimConfig {
            mut epidemic,
            time_scale,
            spawn_origin,
        } = config;

        for issue in epidemic.normalize() {
            warn!(%issue, "config value repaired");
        }
        let (template, _) = AgentTemplate::from_config(&epidemic);

        let seed = epidemic.seed.unwrap_or_else(rand::random);
        debug!(seed, "simulation rng seeded");

        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: clamp_time_scale(time_scale),
            rng: ChaCha8Rng::seed_from_u64(seed),
            evaluator: OutcomeEvaluator::new(OutcomeRules::from_config(&epidemic.outcome)),
            config: epidemic,
            spawn_origin,
            template,
            counters: PopulationCounters::new(),
            index,
            schedule: SpawnSchedule::default(),
            next_agent_id: 0,
            command_queue: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one fixed tick and return the resulting
    /// snapshot.
    pub fn tick(&mut self) -> SimulationSnapshot {
        self.tick_with(DT)
    }

    /// Advance the simulation by `dt` real seconds. Simulation systems see
    /// `dt` scaled by the time scale; the end countdown sees it unscaled.
    pub fn tick_with(&mut self, dt: f64) -> SimulationSnapshot {
        let dt = dt.max(0.0);
        self.process_commands();

        if self.phase == GamePhase::Active {
            let scaled = dt * self.time_scale;
            self.run_systems(scaled);
            self.time.advance_by(scaled);
        }

        if let Some(transition) = self.evaluator.advance_end_transition(dt) {
            info!(state = ?transition.state, scene = %transition.scene, "end transition");
            self.events.push(PresentationEvent::EndTransition {
                state: transition.state,
                scene: transition.scene,
            });
        }

        self.snapshot()
    }

    /// Build a snapshot of the current state, draining pending events.
    pub fn snapshot(&mut self) -> SimulationSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.counters,
            &self.evaluator,
            &self.schedule,
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// The normalized configuration in use.
    pub fn config(&self) -> &EpidemicConfig {
        &self.config
    }

    pub fn counters(&self) -> &PopulationCounters {
        &self.counters
    }

    pub fn evaluator(&self) -> &OutcomeEvaluator {
        &self.evaluator
    }

    pub fn schedule(&self) -> &SpawnSchedule {
        &self.schedule
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for collaborators that attach their own
    /// components. Use `enroll` and `remove_entity` to change membership.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Find the entity carrying `agent_id`.
    pub fn agent_entity(&self, agent_id: u32) -> Option<Entity> {
        systems::lifecycle::find_agent(&self.world, agent_id)
    }

    /// Spawn and enroll a walker at `position` right now.
    pub fn spawn_agent_at(&mut self, position: Position) -> Result<AgentId, SetupError> {
        world_setup::spawn_agent(
            &mut self.world,
            &mut self.rng,
            &self.template,
            &self.config.wander,
            &mut self.next_agent_id,
            &mut self.counters,
            position,
            self.time.elapsed_secs,
        )
    }

    /// Enroll an existing entity as an agent.
    pub fn enroll(&mut self, entity: Entity) -> Result<AgentId, SetupError> {
        world_setup::enroll_agent(
            &mut self.world,
            entity,
            &self.template,
            &mut self.rng,
            &mut self.next_agent_id,
            &mut self.counters,
            self.time.elapsed_secs,
        )
    }

    /// Remove an entity, keeping the counters consistent.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        systems::lifecycle::remove(&mut self.world, entity, &mut self.counters)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartSimulation => {
                let over = matches!(self.phase, GamePhase::Idle | GamePhase::Ended)
                    || self.evaluator.state().is_terminal();
                if over {
                    self.start();
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = clamp_time_scale(scale);
            }
            PlayerCommand::Forfeit => {
                if matches!(self.phase, GamePhase::Active | GamePhase::Paused) {
                    if let Some(resolution) = self.evaluator.forfeit(self.counters.snapshot()) {
                        self.on_resolution(resolution);
                    }
                }
            }
            PlayerCommand::Heal { agent_id, amount } => {
                let Some(entity) = self.agent_entity(agent_id) else {
                    debug!(agent_id, "heal: no such agent");
                    return;
                };
                if let Ok(state) = self.world.query_one_mut::<&mut InfectionState>(entity) {
                    let report = state.heal(amount, &mut self.counters);
                    systems::infection::emit_recheck(agent_id, &report, &mut self.events);
                }
            }
            PlayerCommand::Cure { agent_id, seconds } => {
                let Some(entity) = self.agent_entity(agent_id) else {
                    debug!(agent_id, "cure: no such agent");
                    return;
                };
                if let Ok(state) = self.world.query_one_mut::<&mut InfectionState>(entity) {
                    if seconds > 0.0 {
                        state.apply_grace(seconds);
                        self.events.push(PresentationEvent::GraceFraction {
                            agent_id,
                            fraction: state.grace_fraction(),
                        });
                    }
                }
            }
            PlayerCommand::RevealArea { x, y, radius } => {
                systems::spread::rebuild_index(&self.world, self.index.as_mut());
                let center = Position::new(x, y, self.spawn_origin.z);
                let revealed = systems::reveal::reveal_area(
                    &mut self.world,
                    self.index.as_ref(),
                    &center,
                    radius,
                    self.config.infection.reveal_hold_seconds,
                );
                debug!(x, y, radius, revealed, "reveal");
            }
            PlayerCommand::RemoveAgent { agent_id } => {
                if !systems::lifecycle::remove_by_id(&mut self.world, agent_id, &mut self.counters)
                {
                    debug!(agent_id, "remove: no such agent");
                }
            }
        }
    }

    /// Reset all run state and begin spawning.
    fn start(&mut self) {
        // Counters first, so nothing spawned below is counted twice.
        self.counters.reset();
        self.evaluator.reset();
        self.world.clear();
        self.next_agent_id = 0;
        self.time = SimTime::default();
        self.events.clear();
        self.schedule = SpawnSchedule::new(
            self.spawn_origin,
            self.config.population.count,
            self.time.elapsed_secs,
        );
        self.phase = GamePhase::Active;
        info!(
            population = self.config.population.count,
            max_allowed_sick = self.config.outcome.max_allowed_sick,
            "simulation started"
        );
    }

    /// Run all simulation systems in order for one tick.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Spawner
        systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.schedule,
            &self.config.population,
            &self.template,
            &self.config.wander,
            &mut self.next_agent_id,
            &mut self.counters,
            now,
        );

        // 2. Locomotion
        systems::wander::run(&mut self.world, &mut self.rng, &self.config.wander, now);
        systems::movement::run(&mut self.world, dt);

        // 3. Reveal timers
        systems::reveal::run(&mut self.world, dt);

        // 4. Baseline infection
        systems::infection::run(&mut self.world, &mut self.counters, dt, &mut self.events);

        // 5. Contagion
        systems::spread::rebuild_index(&self.world, self.index.as_mut());
        systems::spread::run(
            &mut self.world,
            self.index.as_ref(),
            &mut self.counters,
            &self.config.spread,
            now,
            &mut self.events,
        );

        // 6. Outcome
        if let Some(resolution) = self.evaluator.evaluate(self.counters.snapshot(), dt) {
            self.on_resolution(resolution);
        }
    }

    fn on_resolution(&mut self, resolution: Resolution) {
        let max_allowed_sick = self.evaluator.rules().max_allowed_sick;
        info!(
            state = ?resolution.state,
            total = resolution.counters.total,
            sick = resolution.counters.sick,
            contagious = resolution.counters.contagious,
            max_allowed_sick,
            elapsed = self.evaluator.elapsed(),
            "outcome reached"
        );
        self.events.push(PresentationEvent::OutcomeReached {
            state: resolution.state,
            counters: resolution.counters,
            max_allowed_sick,
        });
        if self.config.outcome.freeze_on_end {
            self.phase = GamePhase::Ended;
        }
    }
}
