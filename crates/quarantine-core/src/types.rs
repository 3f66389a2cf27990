//! Fundamental geometric and simulation types.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// 3D position in simulation space (meters, Cartesian).
/// x = East, y = North, z = Up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3D velocity in simulation space (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Range to another position in meters (3D distance).
    pub fn range_to(&self, other: &Position) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    /// Horizontal range (ignoring altitude).
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        self.horizontal().distance(other.horizontal())
    }

    /// Ground-plane projection.
    pub fn horizontal(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        DVec3::new(self.x, self.y, self.z).length()
    }

    /// Horizontal velocity pointing along `direction` at `speed`.
    /// A zero direction yields a zero velocity.
    pub fn toward(direction: DVec2, speed: f64) -> Self {
        let v = direction.normalize_or_zero() * speed;
        Self::new(v.x, v.y, 0.0)
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one fixed tick.
    pub fn advance(&mut self) {
        self.advance_by(self.dt());
    }

    /// Advance by one tick of arbitrary length.
    pub fn advance_by(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt.max(0.0);
    }
}
