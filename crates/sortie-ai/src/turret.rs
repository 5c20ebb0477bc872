//! Periodic-fire machines for towers, tanks and flak cannons.
//!
//! Two states only: Idle while the player is out of reach, Firing while in
//! range (and, for flak, inside the firing arc). Shots are gated by the
//! per-entity next-fire timestamp.

use glam::DVec2;
use rand::Rng;

use sortie_core::components::TurretBrain;
use sortie_core::constants::{REFERENCE_FRAME_MS, TANK_DRIFT_CHANCE, TURRET_TURN_RATE};
use sortie_core::enums::TurretState;
use sortie_core::geometry::{angle_between, distance, rotate_to};
use sortie_core::types::Position;

use crate::profiles::BehaviorProfile;

/// Barrel length and half spacing of a twin mount.
const BARREL_LENGTH: f64 = 40.0;
const BARREL_SPREAD: f64 = 8.0;

/// Input to the turret FSM for a single mount.
pub struct TurretContext<'a> {
    pub profile: &'a BehaviorProfile,
    pub position: Position,
    /// Player position for this tick, `None` when the player is gone.
    pub player: Option<Position>,
    pub now_ms: f64,
    pub elapsed_ms: f64,
    pub range: f64,
    pub fire_rate_ms: f64,
    /// Allowed bearing window (radians, min..=max) for arc-limited mounts.
    pub arc: Option<(f64, f64)>,
}

/// Output from the turret FSM.
pub struct TurretUpdate {
    pub brain: TurretBrain,
    /// Where the round leaves the gun, when one was fired.
    pub muzzle: Option<Position>,
}

/// Evaluate one mount for one tick.
pub fn evaluate(brain: &TurretBrain, ctx: &TurretContext) -> TurretUpdate {
    let mut next = brain.clone();
    let Some(player) = ctx.player else {
        next.state = TurretState::Idle;
        return TurretUpdate {
            brain: next,
            muzzle: None,
        };
    };

    let bearing = angle_between(ctx.position, player);
    next.aim = if ctx.profile.slewing_turret {
        let frames = ctx.elapsed_ms / REFERENCE_FRAME_MS;
        rotate_to(brain.aim, bearing, TURRET_TURN_RATE * frames)
    } else {
        bearing
    };

    let in_range = distance(ctx.position, player) <= ctx.range;
    let in_arc = match ctx.arc {
        Some((min, max)) => (min..=max).contains(&bearing),
        None => true,
    };
    if !(in_range && in_arc) {
        next.state = TurretState::Idle;
        return TurretUpdate {
            brain: next,
            muzzle: None,
        };
    }

    next.state = TurretState::Firing;
    if ctx.now_ms < brain.next_fire_ms {
        return TurretUpdate {
            brain: next,
            muzzle: None,
        };
    }

    next.next_fire_ms = ctx.now_ms + ctx.fire_rate_ms;
    let muzzle = muzzle_position(ctx.position, next.aim, next.barrel_index, ctx.profile);
    if ctx.profile.twin_barrel {
        next.barrel_index = 1 - next.barrel_index.min(1);
    }
    TurretUpdate {
        brain: next,
        muzzle: Some(muzzle),
    }
}

fn muzzle_position(base: Position, aim: f64, barrel: u8, profile: &BehaviorProfile) -> Position {
    let forward = DVec2::from_angle(aim);
    let mut tip = base.as_dvec2() + forward * BARREL_LENGTH;
    if profile.twin_barrel {
        let side = if barrel == 0 { -1.0 } else { 1.0 };
        tip += forward.perp() * BARREL_SPREAD * side;
    }
    Position::from_dvec2(tip)
}

/// Occasionally pick a new patrol speed in `[-drift_speed, drift_speed]`.
/// Returns the current speed most ticks.
pub fn patrol_speed<R: Rng>(current: f64, drift_speed: f64, rng: &mut R) -> f64 {
    if drift_speed <= 0.0 {
        return 0.0;
    }
    if rng.gen_bool(TANK_DRIFT_CHANCE) {
        rng.gen_range(-drift_speed..=drift_speed)
    } else {
        current
    }
}
