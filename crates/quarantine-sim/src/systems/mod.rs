//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` when read-only)
//! plus whatever engine-owned state they need. They own no state themselves.

pub mod infection;
pub mod lifecycle;
pub mod movement;
pub mod reveal;
pub mod snapshot;
pub mod spawner;
pub mod spread;
pub mod wander;
