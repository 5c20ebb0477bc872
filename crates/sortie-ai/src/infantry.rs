//! Infantry state machine: Idle ⇄ Roam, either → Combat, Combat → Idle.
//!
//! Combat fires fixed-size bursts, then runs sideways through a cooldown
//! before the next burst. Leaving detection range by the leash factor drops
//! the soldier back to Idle.

use rand::Rng;

use sortie_core::components::InfantryBrain;
use sortie_core::config::InfantryTuning;
use sortie_core::enums::InfantryState;
use sortie_core::geometry::{angle_between, distance};
use sortie_core::types::Position;

/// Input to the infantry FSM for a single soldier.
pub struct InfantryContext<'a> {
    pub tuning: &'a InfantryTuning,
    pub detection_range: f64,
    pub position: Position,
    /// Player position for this tick, `None` when the player is gone.
    pub player: Option<Position>,
    pub now_ms: f64,
    /// Current horizontal speed (units/s, signed).
    pub velocity_x: f64,
}

/// Output from the infantry FSM.
pub struct InfantryUpdate {
    pub brain: InfantryBrain,
    pub velocity_x: f64,
    pub fired: bool,
    pub state_changed: bool,
}

/// Evaluate one soldier for one tick.
pub fn evaluate<R: Rng>(
    brain: &InfantryBrain,
    ctx: &InfantryContext,
    rng: &mut R,
) -> InfantryUpdate {
    let mut next = brain.clone();
    let mut velocity_x = ctx.velocity_x;
    let mut fired = false;

    let Some(player) = ctx.player else {
        return InfantryUpdate {
            brain: next,
            velocity_x,
            fired,
            state_changed: false,
        };
    };

    let t = ctx.tuning;
    let now = ctx.now_ms;
    let dist = distance(ctx.position, player);

    match brain.state {
        InfantryState::Idle => {
            velocity_x = 0.0;
            if dist < ctx.detection_range {
                engage(&mut next, t, now);
            } else if now > brain.state_since_ms + t.idle_ms {
                next.state = InfantryState::Roam;
                next.state_since_ms = now;
                velocity_x = random_direction(rng) * brain.base_speed;
            }
        }
        InfantryState::Roam => {
            if dist < ctx.detection_range {
                engage(&mut next, t, now);
            } else if now > brain.state_since_ms + t.roam_ms {
                next.state = InfantryState::Idle;
                next.state_since_ms = now;
            }
        }
        InfantryState::Combat => {
            if dist > ctx.detection_range * t.leash_factor {
                next.state = InfantryState::Idle;
                next.state_since_ms = now;
            } else {
                next.aim = angle_between(ctx.position, player);
                if next.burst_left > 0 {
                    velocity_x = 0.0;
                    if now > next.next_shot_ms {
                        fired = true;
                        next.burst_left -= 1;
                        next.next_shot_ms = now + t.burst_delay_ms;
                        if next.burst_left == 0 {
                            next.last_burst_ms = now;
                            velocity_x = random_direction(rng) * brain.base_speed;
                        }
                    }
                } else if now > next.last_burst_ms + t.cooldown_ms {
                    next.burst_left = t.burst_count;
                    next.next_shot_ms = now;
                } else if velocity_x == 0.0 {
                    velocity_x = random_direction(rng) * brain.base_speed;
                }
            }
        }
    }

    InfantryUpdate {
        state_changed: next.state != brain.state,
        brain: next,
        velocity_x,
        fired,
    }
}

fn engage(brain: &mut InfantryBrain, tuning: &InfantryTuning, now: f64) {
    brain.state = InfantryState::Combat;
    brain.burst_left = tuning.burst_count;
    brain.last_burst_ms = now;
    brain.next_shot_ms = now;
}

fn random_direction<R: Rng>(rng: &mut R) -> f64 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}
