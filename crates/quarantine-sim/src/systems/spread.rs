//! Contagion spread system.
//!
//! Each contagious agent pulses on its own timer, pushing infection onto
//! every agent within the spread radius. Pulses are collected against the
//! state at the start of the system and applied afterwards, so an agent
//! made contagious by this tick's exposure does not push back until its
//! own next pulse.

use hecs::{Entity, World};

use quarantine_core::components::{AgentId, Disabled, SpreadTimer};
use quarantine_core::config::SpreadConfig;
use quarantine_core::enums::QueryFilter;
use quarantine_core::events::PresentationEvent;
use quarantine_core::types::Position;

use quarantine_epidemic::{InfectionState, PopulationCounters};

use crate::spatial::{collect_entries, SpatialIndex};
use crate::systems::infection::emit_recheck;

/// A contagious agent due to pulse this tick.
struct Pulse {
    source: Entity,
    position: Position,
    amount: f64,
}

/// Rebuild the spatial index from the current positions.
pub fn rebuild_index(world: &World, index: &mut dyn SpatialIndex) {
    index.rebuild(&collect_entries(world));
}

/// Run one spread pass. Returns the number of exposures applied.
pub fn run(
    world: &mut World,
    index: &dyn SpatialIndex,
    counters: &mut PopulationCounters,
    config: &SpreadConfig,
    now: f64,
    events: &mut Vec<PresentationEvent>,
) -> usize {
    let mut pulses = Vec::new();
    for (entity, (pos, state, timer)) in world
        .query_mut::<(&Position, &InfectionState, &mut SpreadTimer)>()
        .without::<&Disabled>()
    {
        if !state.is_joined() || !state.is_contagious() || now < timer.next_spread_at {
            continue;
        }
        timer.next_spread_at = now + config.spread_tick_interval;
        pulses.push(Pulse {
            source: entity,
            position: *pos,
            amount: config.spread_rate_per_tick * state.spread_power() as f64,
        });
    }

    let mut exposures: Vec<(Entity, f64)> = Vec::new();
    for pulse in &pulses {
        let mut nearby =
            index.query_nearby(&pulse.position, config.spread_radius, QueryFilter::Agents);
        nearby.sort_unstable();
        nearby.dedup();
        exposures.extend(
            nearby
                .into_iter()
                .filter(|&target| target != pulse.source)
                .map(|target| (target, pulse.amount)),
        );
    }

    let mut applied = 0;
    for (target, amount) in exposures {
        // Targets may have been despawned or disabled since the index was built.
        let Ok((id, state)) = world.query_one_mut::<(&AgentId, &mut InfectionState)>(target)
        else {
            continue;
        };
        if !state.is_joined() {
            continue;
        }
        let report = state.add_infection(amount, counters);
        emit_recheck(id.0, &report, events);
        applied += 1;
    }
    applied
}
