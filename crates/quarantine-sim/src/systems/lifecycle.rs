//! Population lifecycle: keeps the counters consistent as agents are
//! created and destroyed mid-simulation.
//!
//! Removal is synchronous. The counters reflect it before anything else
//! runs, so the outcome check of the same tick sees the new totals.

use hecs::{Entity, World};
use tracing::debug;

use quarantine_core::components::{AgentId, Disabled};
use quarantine_core::events::CounterSnapshot;

use quarantine_epidemic::{InfectionState, PopulationCounters};

/// Join an enrolled entity to the counters. Returns false if it has no
/// infection state or had already joined.
pub fn join(world: &mut World, entity: Entity, counters: &mut PopulationCounters) -> bool {
    match world.get::<&mut InfectionState>(entity) {
        Ok(mut state) => state.join(counters),
        Err(_) => false,
    }
}

/// Remove an entity from the counters (by its last-counted membership)
/// and despawn it. Returns false if the entity did not exist.
pub fn remove(world: &mut World, entity: Entity, counters: &mut PopulationCounters) -> bool {
    if let Ok(mut state) = world.get::<&mut InfectionState>(entity) {
        state.leave(counters);
    }
    let removed = world.despawn(entity).is_ok();
    if removed {
        debug!(?entity, total = counters.total(), "agent removed");
    }
    removed
}

/// Find the entity carrying `agent_id`.
pub fn find_agent(world: &World, agent_id: u32) -> Option<Entity> {
    world
        .query::<&AgentId>()
        .iter()
        .find(|(_, id)| id.0 == agent_id)
        .map(|(entity, _)| entity)
}

/// Remove the agent with the given id. Returns false if none exists.
pub fn remove_by_id(world: &mut World, agent_id: u32, counters: &mut PopulationCounters) -> bool {
    match find_agent(world, agent_id) {
        Some(entity) => remove(world, entity, counters),
        None => false,
    }
}

/// Recount the population by scanning derived agent states.
/// Cross-checks the event-maintained counters.
pub fn live_scan(world: &World) -> CounterSnapshot {
    let mut snap = CounterSnapshot::default();
    let mut query = world.query::<&InfectionState>().without::<&Disabled>();
    for (_entity, state) in query.iter() {
        if !state.is_joined() {
            continue;
        }
        snap.total += 1;
        if state.is_sick() {
            snap.sick += 1;
        }
        if state.is_contagious() {
            snap.contagious += 1;
        }
    }
    snap
}
