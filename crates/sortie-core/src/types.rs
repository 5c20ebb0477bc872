//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry;

/// 2D position in world units.
/// x = right, y = down (screen convention).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking on a monotonic game clock.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed game time in milliseconds.
    pub now_ms: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Euclidean distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        geometry::distance(*self, *other)
    }

    /// Bearing to another position in radians (atan2 of the offset).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        geometry::angle_between(*self, *other)
    }

    /// Position displaced by `distance` along `rotation`.
    pub fn offset(&self, rotation: f64, distance: f64) -> Position {
        Position::from_dvec2(self.as_dvec2() + DVec2::from_angle(rotation) * distance)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Velocity of magnitude `speed` pointing along `rotation`.
    /// A negative speed points backwards.
    pub fn from_rotation(rotation: f64, speed: f64) -> Self {
        let v = DVec2::from_angle(rotation) * speed;
        Self { x: v.x, y: v.y }
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f64 {
        DVec2::new(self.x, self.y).length()
    }

    /// Scale both components.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl SimTime {
    /// Milliseconds per tick at the default tick rate.
    pub fn dt_ms(&self) -> f64 {
        crate::constants::DT_MS
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.now_ms += self.dt_ms();
    }
}
