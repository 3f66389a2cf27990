//! Infection system: advances every agent's baseline progression.

use hecs::World;

use quarantine_core::components::{AgentId, Disabled};
use quarantine_core::events::PresentationEvent;

use quarantine_epidemic::{Advance, InfectionState, PopulationCounters, Recheck};

/// Advance every enrolled agent by `dt`, reporting crossings to the counters.
pub fn run(
    world: &mut World,
    counters: &mut PopulationCounters,
    dt: f64,
    events: &mut Vec<PresentationEvent>,
) {
    for (_entity, (id, state)) in world
        .query_mut::<(&AgentId, &mut InfectionState)>()
        .without::<&Disabled>()
    {
        match state.advance(dt, counters) {
            Advance::Grace { fraction, ended } => {
                events.push(PresentationEvent::GraceFraction {
                    agent_id: id.0,
                    fraction,
                });
                if ended {
                    events.push(PresentationEvent::GraceEnded { agent_id: id.0 });
                }
            }
            Advance::Progressed(report) => emit_recheck(id.0, &report, events),
        }
    }
}

/// Forward the presentation side of a recheck.
pub fn emit_recheck(agent_id: u32, report: &Recheck, events: &mut Vec<PresentationEvent>) {
    if report.play_sick_effect {
        events.push(PresentationEvent::BecameSick { agent_id });
    }
}
