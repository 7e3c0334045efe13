// Per-session workflow state: the current phase, the move in progress and
// the bookkeeping of completed moves.

use crate::catalog::LocationRecord;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Position of a session in its two-step scan cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Waiting for the operator to scan the location an item currently sits in
    AwaitingSource,
    /// Waiting for the confirming scan of the destination location
    AwaitingDestination,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::AwaitingSource => "AWAITING_SOURCE",
            Phase::AwaitingDestination => "AWAITING_DESTINATION",
        };
        write!(f, "{}", label)
    }
}

/// A move started by a matched source scan and not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveMove {
    /// The normalized code that matched the record
    pub scanned_source: String,
    pub record: LocationRecord,
}

/// One confirmed move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// The source as scanned (normalized), which can differ from the table
    /// spelling when the doubled-prefix rule applied
    pub source_code: String,
    pub destination_code: String,
    pub quantity: u32,
    pub timestamp: DateTime<Local>,
}

/// Mutable state of one scanning session.
///
/// The phase is derived from the active move, so a record is active exactly
/// when the session awaits a destination. `processed_count` only grows and
/// `history` is append-only; neither is touched by [`reset`](super::reset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub(super) active: Option<ActiveMove>,
    pub(super) processed_count: u64,
    pub(super) history: Vec<HistoryEntry>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.active {
            Some(_) => Phase::AwaitingDestination,
            None => Phase::AwaitingSource,
        }
    }

    pub fn active_move(&self) -> Option<&ActiveMove> {
        self.active.as_ref()
    }

    pub fn active_record(&self) -> Option<&LocationRecord> {
        self.active.as_ref().map(|active| &active.record)
    }

    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Up to `limit` history entries, newest first
    pub fn recent_history(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().rev().take(limit)
    }

    pub(super) fn record_completed(&mut self, active: ActiveMove, at: DateTime<Local>) -> &HistoryEntry {
        self.processed_count += 1;
        self.history.push(HistoryEntry {
            source_code: active.scanned_source,
            destination_code: active.record.destination_code,
            quantity: active.record.quantity,
            timestamp: at,
        });
        &self.history[self.history.len() - 1]
    }
}
