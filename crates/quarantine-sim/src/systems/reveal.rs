//! Lamp reveal: sick agents inside a lit area become visible for a short
//! hold time, then fade.

use hecs::World;

use quarantine_core::components::Reveal;
use quarantine_core::enums::QueryFilter;
use quarantine_core::types::Position;

use quarantine_epidemic::InfectionState;

use crate::spatial::SpatialIndex;

/// Count down active reveals.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, reveal) in world.query_mut::<&mut Reveal>() {
        if !reveal.revealed {
            continue;
        }
        reveal.remaining_secs -= dt.max(0.0);
        if reveal.remaining_secs <= 0.0 {
            reveal.revealed = false;
            reveal.remaining_secs = 0.0;
        }
    }
}

/// Reveal every sick agent within `radius` of `center` for `hold` seconds,
/// refreshing any reveal already running. Healthy agents are never
/// revealed. Returns the number revealed.
pub fn reveal_area(
    world: &mut World,
    index: &dyn SpatialIndex,
    center: &Position,
    radius: f64,
    hold: f64,
) -> usize {
    let mut revealed = 0;
    for entity in index.query_nearby(center, radius, QueryFilter::Agents) {
        let Ok((state, reveal)) = world.query_one_mut::<(&InfectionState, &mut Reveal)>(entity)
        else {
            continue;
        };
        if !state.is_sick() {
            continue;
        }
        reveal.revealed = true;
        reveal.remaining_secs = hold;
        revealed += 1;
    }
    revealed
}
