//! Drone state machine: Approach → Skirmish → Kamikaze.
//!
//! Kamikaze is terminal. The drone keeps diving until it rams the player or
//! is shot down; nothing here ever leaves that state.

use sortie_core::components::DroneBrain;
use sortie_core::config::DroneTuning;
use sortie_core::constants::REFERENCE_FRAME_MS;
use sortie_core::enums::DroneState;
use sortie_core::geometry::{angle_between, distance, rotate_to, within_cone};
use sortie_core::types::{Position, Velocity};

/// Distance a drone is knocked back by its own shot.
const RECOIL: f64 = 2.0;

/// Input to the drone FSM for a single entity.
pub struct DroneContext<'a> {
    pub tuning: &'a DroneTuning,
    pub position: Position,
    pub rotation: f64,
    /// Player position for this tick, `None` when the player is gone.
    pub player: Option<Position>,
    pub now_ms: f64,
    pub elapsed_ms: f64,
    pub fire_rate_ms: f64,
}

/// Output from the drone FSM.
pub struct DroneUpdate {
    pub brain: DroneBrain,
    pub rotation: f64,
    pub velocity: Velocity,
    /// Position after recoil (unchanged unless a round left the gun).
    pub position: Position,
    pub fired: bool,
    pub state_changed: bool,
}

/// Evaluate one drone for one tick.
pub fn evaluate(brain: &DroneBrain, current: Velocity, ctx: &DroneContext) -> DroneUpdate {
    let idle = DroneUpdate {
        brain: brain.clone(),
        rotation: ctx.rotation,
        velocity: current,
        position: ctx.position,
        fired: false,
        state_changed: false,
    };
    let Some(player) = ctx.player else {
        return idle;
    };

    let frames = ctx.elapsed_ms / REFERENCE_FRAME_MS;
    let dist = distance(ctx.position, player);
    let bearing = angle_between(ctx.position, player);

    match brain.state {
        DroneState::Approach => approach(brain, ctx, dist, bearing, frames),
        DroneState::Skirmish => skirmish(brain, ctx, dist, bearing, frames),
        DroneState::Kamikaze => kamikaze(brain, ctx, bearing, frames),
    }
}

fn approach(
    brain: &DroneBrain,
    ctx: &DroneContext,
    dist: f64,
    bearing: f64,
    frames: f64,
) -> DroneUpdate {
    let rotation = rotate_to(ctx.rotation, bearing, ctx.tuning.turn_rate * frames);
    let mut velocity = Velocity::from_rotation(rotation, brain.speed);
    let mut next = brain.clone();
    let mut state_changed = false;

    if dist <= ctx.tuning.approach_range {
        next.state = DroneState::Skirmish;
        velocity = velocity.scaled(0.5);
        state_changed = true;
    }

    DroneUpdate {
        brain: next,
        rotation,
        velocity,
        position: ctx.position,
        fired: false,
        state_changed,
    }
}

fn skirmish(
    brain: &DroneBrain,
    ctx: &DroneContext,
    dist: f64,
    bearing: f64,
    frames: f64,
) -> DroneUpdate {
    let t = ctx.tuning;
    let mut next = brain.clone();

    // Spawned or left with no ammo: dive straight away.
    if next.ammo == 0 {
        return enter_kamikaze(next, ctx, ctx.rotation, ctx.position, false);
    }

    next.weave_phase += ctx.elapsed_ms * t.weave_rate;
    let weave = next.weave_phase.sin() * t.weave_amplitude;
    let rotation = rotate_to(ctx.rotation, bearing + weave, t.turn_rate * frames);

    let forward = if dist < t.back_off_distance {
        -t.back_off_speed
    } else if dist > t.catch_up_distance {
        brain.speed * t.catch_up_speed_factor
    } else {
        brain.speed * t.skirmish_speed_factor
    };
    let velocity = Velocity::from_rotation(rotation, forward);

    let facing_player = within_cone(rotation, bearing, t.fire_cone_deg.to_radians());
    if facing_player && ctx.now_ms > next.next_fire_ms {
        next.ammo -= 1;
        next.next_fire_ms = ctx.now_ms + ctx.fire_rate_ms;
        let recoiled = ctx.position.offset(rotation, -RECOIL);
        if next.ammo == 0 {
            return enter_kamikaze(next, ctx, rotation, recoiled, true);
        }
        return DroneUpdate {
            brain: next,
            rotation,
            velocity,
            position: recoiled,
            fired: true,
            state_changed: false,
        };
    }

    DroneUpdate {
        brain: next,
        rotation,
        velocity,
        position: ctx.position,
        fired: false,
        state_changed: false,
    }
}

fn enter_kamikaze(
    mut next: DroneBrain,
    ctx: &DroneContext,
    rotation: f64,
    position: Position,
    fired: bool,
) -> DroneUpdate {
    next.state = DroneState::Kamikaze;
    next.speed = next.base_speed * ctx.tuning.kamikaze_speed_multiplier;
    DroneUpdate {
        velocity: Velocity::from_rotation(rotation, next.speed),
        brain: next,
        rotation,
        position,
        fired,
        state_changed: true,
    }
}

fn kamikaze(brain: &DroneBrain, ctx: &DroneContext, bearing: f64, frames: f64) -> DroneUpdate {
    let rotation = rotate_to(
        ctx.rotation,
        bearing,
        ctx.tuning.kamikaze_turn_rate * frames,
    );
    DroneUpdate {
        brain: brain.clone(),
        rotation,
        velocity: Velocity::from_rotation(rotation, brain.speed),
        position: ctx.position,
        fired: false,
        state_changed: false,
    }
}

/// Damage a drone does to the player when it rams.
pub fn ram_damage(brain: &DroneBrain, tuning: &DroneTuning) -> f64 {
    match brain.state {
        DroneState::Kamikaze => tuning.kamikaze_damage,
        _ => tuning.collision_damage,
    }
}
