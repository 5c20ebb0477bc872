//! Target selection for auto-aim and multi-missile lock-on.
//!
//! Stateless: callers rebuild the candidate list every decision tick and
//! get back a key (whatever handle type they use), never a reference.

use sortie_core::geometry::{angle_between, distance, lerp, wrap_angle};
use sortie_core::types::Position;

/// One potential target as seen at query time.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<K> {
    pub key: K,
    pub position: Position,
    pub health: f64,
    pub active: bool,
}

/// Where the shooter is and what it can reach.
#[derive(Debug, Clone, Copy)]
pub struct AimQuery {
    pub origin: Position,
    /// Hull facing (radians).
    pub facing: f64,
    pub max_range: f64,
    /// Cone half-angle (radians).
    pub half_cone: f64,
    /// Distances within this of the nearest are treated as equal.
    pub tie_epsilon: f64,
}

/// Pick the best target: the nearest eligible candidate, except that any
/// candidate within `tie_epsilon` of the nearest distance competes on health
/// and the weakest wins. Equal health falls back to distance, then to
/// candidate order.
///
/// Eligible means active, within `max_range` and within `half_cone` of
/// `facing`. Returns `None` when nothing qualifies.
pub fn select_best_target<K: Copy>(query: &AimQuery, candidates: &[Candidate<K>]) -> Option<K> {
    let eligible: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.active)
        .filter_map(|(i, c)| {
            let d = distance(query.origin, c.position);
            if d > query.max_range {
                return None;
            }
            let bearing = angle_between(query.origin, c.position);
            if wrap_angle(bearing - query.facing).abs() > query.half_cone {
                return None;
            }
            Some((i, d))
        })
        .collect();

    let nearest = eligible
        .iter()
        .map(|&(_, d)| d)
        .fold(f64::INFINITY, f64::min);

    eligible
        .iter()
        .filter(|&&(_, d)| d - nearest < query.tie_epsilon)
        .min_by(|&&(ia, da), &&(ib, db)| {
            let ha = candidates[ia].health;
            let hb = candidates[ib].health;
            ha.total_cmp(&hb)
                .then(da.total_cmp(&db))
                .then(ia.cmp(&ib))
        })
        .map(|&(i, _)| candidates[i].key)
}

/// Lock up to `max_locks` active candidates within `range` of `origin`,
/// nearest first. No cone: the radar sweeps all around.
pub fn lock_targets<K: Copy>(
    origin: Position,
    candidates: &[Candidate<K>],
    range: f64,
    max_locks: usize,
) -> Vec<K> {
    let mut in_range: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.active)
        .map(|(i, c)| (i, distance(origin, c.position)))
        .filter(|&(_, d)| d <= range)
        .collect();
    in_range.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    in_range
        .into_iter()
        .take(max_locks)
        .map(|(i, _)| candidates[i].key)
        .collect()
}

/// Pair each missile with a target. The second missile reuses the first
/// lock when only one exists; with no locks both fly dumb.
pub fn assign_missiles<K: Copy>(locks: &[K], missiles: usize) -> Vec<Option<K>> {
    (0..missiles)
        .map(|i| locks.get(i).or_else(|| locks.first()).copied())
        .collect()
}

/// Next gun angle relative to the hull. Lerps toward the wrapped relative
/// bearing of `target`, clamped to the cone, or back to zero with no target.
pub fn track_gun(
    gun_rotation: f64,
    origin: Position,
    facing: f64,
    target: Option<Position>,
    half_cone: f64,
    lerp_factor: f64,
) -> f64 {
    let aim = match target {
        Some(t) => {
            let relative = wrap_angle(angle_between(origin, t) - facing);
            relative.clamp(-half_cone, half_cone)
        }
        None => 0.0,
    };
    lerp(gun_rotation, aim, lerp_factor)
}
