//! Pure geometry helpers used by targeting and behavior code.
//!
//! Angles are radians measured with `atan2(dy, dx)`, so with y pointing down a
//! positive angle turns clockwise on screen.

use std::f64::consts::{PI, TAU};

use crate::types::Position;

/// Euclidean distance between two positions.
pub fn distance(a: Position, b: Position) -> f64 {
    a.as_dvec2().distance(b.as_dvec2())
}

/// Bearing from `a` to `b`.
pub fn angle_between(a: Position, b: Position) -> f64 {
    let d = b.as_dvec2() - a.as_dvec2();
    d.y.atan2(d.x)
}

/// Normalize an angle difference to the shortest signed rotation in (-π, π].
pub fn wrap_angle(delta: f64) -> f64 {
    let wrapped = (delta + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Turn `current` toward `target` by at most `step` radians along the
/// shortest arc. Snaps to the target once within one step.
pub fn rotate_to(current: f64, target: f64, step: f64) -> f64 {
    let diff = wrap_angle(target - current);
    if diff.abs() <= step {
        return wrap_angle(current + diff);
    }
    wrap_angle(current + step.copysign(diff))
}

/// Linear interpolation from `from` toward `to` by factor `t`.
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Whether `bearing` lies within `half_cone` of `facing`.
pub fn within_cone(facing: f64, bearing: f64, half_cone: f64) -> bool {
    wrap_angle(bearing - facing).abs() <= half_cone
}
