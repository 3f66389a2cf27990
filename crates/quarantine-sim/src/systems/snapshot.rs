//! Snapshot system: queries the ECS world and builds a complete
//! SimulationSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use quarantine_core::components::{AgentId, Disabled, Reveal};
use quarantine_core::enums::GamePhase;
use quarantine_core::events::PresentationEvent;
use quarantine_core::state::*;
use quarantine_core::types::{Position, SimTime};

use quarantine_epidemic::{InfectionState, OutcomeEvaluator, PopulationCounters};

use crate::systems::lifecycle;
use crate::systems::spawner::SpawnSchedule;

/// Build a SimulationSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    counters: &PopulationCounters,
    evaluator: &OutcomeEvaluator,
    schedule: &SpawnSchedule,
    events: Vec<PresentationEvent>,
) -> SimulationSnapshot {
    SimulationSnapshot {
        time: *time,
        phase,
        outcome: build_outcome(evaluator),
        counters: counters.snapshot(),
        live: lifecycle::live_scan(world),
        agents: build_agents(world),
        spawner: SpawnerView {
            requested: schedule.requested,
            attempted: schedule.attempted,
            spawned: schedule.spawned,
        },
        events,
    }
}

fn build_outcome(evaluator: &OutcomeEvaluator) -> OutcomeView {
    OutcomeView {
        state: evaluator.state(),
        elapsed_secs: evaluator.elapsed(),
        time_remaining_secs: evaluator.time_remaining(),
        ready: evaluator.is_ready(),
        max_allowed_sick: evaluator.rules().max_allowed_sick,
    }
}

/// One view per enrolled agent, ordered by id.
fn build_agents(world: &World) -> Vec<AgentView> {
    let mut agents: Vec<AgentView> = world
        .query::<(&AgentId, &Position, &InfectionState, Option<&Reveal>)>()
        .without::<&Disabled>()
        .iter()
        .map(|(_, (id, pos, state, reveal))| AgentView {
            agent_id: id.0,
            position: *pos,
            progress: state.progress(),
            sick: state.is_sick(),
            contagious: state.is_contagious(),
            grace_fraction: state.grace_fraction(),
            revealed: reveal.is_some_and(|r| r.revealed),
            spread_power: state.spread_power(),
        })
        .collect();
    agents.sort_by_key(|a| a.agent_id);
    agents
}
