//! Kill-combo aggregation.
//!
//! Kills that share a `SourceId` accumulate into one record. Each
//! contribution pushes the record's deadline out by the debounce window;
//! once the clock passes the deadline the record is finalized into a single
//! [`Award`] and removed. Kills without a source skip aggregation entirely.

use std::collections::BTreeMap;

use sortie_core::config::ScoringConfig;
use sortie_core::events::SourceId;
use sortie_core::types::Position;

/// A reward ready to be applied to the score and wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct Award {
    /// Total score including any multi-kill bonus (not yet floored).
    pub score: f64,
    pub coins: u64,
    /// Where the last contributing kill happened.
    pub position: Position,
    pub kills: u32,
    /// Multi-kill bonus included in `score`; zero below the threshold.
    pub bonus: f64,
}

#[derive(Debug, Clone)]
struct ComboRecord {
    kills: u32,
    score: f64,
    coins: u64,
    position: Position,
    deadline_ms: f64,
}

/// Pending combo records keyed by source.
#[derive(Debug, Default)]
pub struct ComboAggregator {
    records: BTreeMap<SourceId, ComboRecord>,
}

impl ComboAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one kill. Returns the award straight away when there is no
    /// source to correlate on; otherwise the kill joins its source's record.
    pub fn register_kill(
        &mut self,
        source: Option<&SourceId>,
        score: f64,
        coins: u64,
        position: Position,
        now_ms: f64,
        scoring: &ScoringConfig,
    ) -> Option<Award> {
        let Some(source) = source else {
            return Some(Award {
                score,
                coins,
                position,
                kills: 1,
                bonus: 0.0,
            });
        };

        let record = self
            .records
            .entry(source.clone())
            .or_insert_with(|| ComboRecord {
                kills: 0,
                score: 0.0,
                coins: 0,
                position,
                deadline_ms: now_ms,
            });
        record.kills += 1;
        record.score += score;
        record.coins += coins;
        record.position = position;
        record.deadline_ms = now_ms + scoring.combo_debounce_ms;
        None
    }

    /// Finalize every record whose debounce window has closed.
    pub fn expire(&mut self, now_ms: f64, scoring: &ScoringConfig) -> Vec<(SourceId, Award)> {
        let due: Vec<SourceId> = self
            .records
            .iter()
            .filter(|(_, r)| now_ms >= r.deadline_ms)
            .map(|(source, _)| source.clone())
            .collect();

        due.into_iter()
            .filter_map(|source| {
                let record = self.records.remove(&source)?;
                Some((source, finalize(record, scoring)))
            })
            .collect()
    }

    /// Finalize everything still pending, regardless of deadlines.
    /// Used when a level or match ends.
    pub fn flush_all(&mut self, scoring: &ScoringConfig) -> Vec<(SourceId, Award)> {
        std::mem::take(&mut self.records)
            .into_iter()
            .map(|(source, record)| (source, finalize(record, scoring)))
            .collect()
    }

    /// Number of records still waiting on their window.
    pub fn pending(&self) -> usize {
        self.records.len()
    }

    pub fn is_pending(&self, source: &SourceId) -> bool {
        self.records.contains_key(source)
    }
}

fn finalize(record: ComboRecord, scoring: &ScoringConfig) -> Award {
    let bonus = if record.kills >= scoring.multi_kill_threshold {
        record.score * scoring.multi_kill_multiplier
    } else {
        0.0
    };
    Award {
        score: record.score + bonus,
        coins: record.coins,
        position: record.position,
        kills: record.kills,
        bonus,
    }
}
