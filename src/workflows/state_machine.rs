// Scan-to-match state machine
//
// AWAITING_SOURCE      --matched source-->      AWAITING_DESTINATION
// AWAITING_SOURCE      --unknown source-->      AWAITING_SOURCE
// AWAITING_DESTINATION --expected destination--> AWAITING_SOURCE (move recorded)
// AWAITING_DESTINATION --other destination-->   AWAITING_DESTINATION
//
// Blank input never changes state. Every outcome is a value; nothing here
// fails on operator input.

use super::state::{ActiveMove, WorkflowState};
use crate::catalog::{LocationRecord, LocationTable};
use crate::normalize::{default_normalizer, CodeNormalizer};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of submitting one scanned or typed code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanOutcome {
    /// Source matched; the operator should now carry `quantity` pieces to `destination`
    Found {
        source_code: String,
        destination: String,
        quantity: u32,
    },
    NotFound { code: String },
    /// Destination confirmed and the move recorded
    Success {
        source_code: String,
        destination: String,
        quantity: u32,
    },
    Mismatch { expected: String, scanned: String },
    Ignored,
}

impl ScanOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ScanOutcome::Found { .. } => "FOUND",
            ScanOutcome::NotFound { .. } => "NOT_FOUND",
            ScanOutcome::Success { .. } => "SUCCESS",
            ScanOutcome::Mismatch { .. } => "MISMATCH",
            ScanOutcome::Ignored => "IGNORED",
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOutcome::Found {
                source_code,
                destination,
                quantity,
            } => write!(f, "{source_code}: move {quantity} piece(s) to {destination}"),
            ScanOutcome::NotFound { code } => write!(f, "code not found: {code}"),
            ScanOutcome::Success {
                source_code,
                destination,
                quantity,
            } => write!(f, "{quantity} piece(s) moved from {source_code} to {destination}"),
            ScanOutcome::Mismatch { expected, scanned } => {
                write!(f, "wrong location {scanned}, expected {expected}")
            }
            ScanOutcome::Ignored => write!(f, "ignored empty input"),
        }
    }
}

/// Shared, read-only half of a session: the reference table and the
/// normalization rules. One engine can drive any number of
/// [`WorkflowState`]s.
#[derive(Debug, Clone)]
pub struct ScanEngine {
    table: Arc<LocationTable>,
    normalizer: CodeNormalizer,
}

impl ScanEngine {
    pub fn new(table: Arc<LocationTable>) -> Self {
        Self {
            table,
            normalizer: CodeNormalizer::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: CodeNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn table(&self) -> &LocationTable {
        &self.table
    }

    pub fn shared_table(&self) -> Arc<LocationTable> {
        Arc::clone(&self.table)
    }

    pub fn normalizer(&self) -> &CodeNormalizer {
        &self.normalizer
    }

    /// Record the source code would resolve to, without touching any state
    pub fn lookup(&self, raw: &str) -> Option<&LocationRecord> {
        let code = self.normalizer.normalize(raw);
        if code.is_empty() {
            return None;
        }
        self.table.find_source(&code, &self.normalizer)
    }

    pub fn submit(&self, state: &mut WorkflowState, raw: &str) -> ScanOutcome {
        self.submit_at(state, raw, Local::now())
    }

    /// Same as [`submit`](Self::submit) with an explicit completion timestamp
    pub fn submit_at(&self, state: &mut WorkflowState, raw: &str, at: DateTime<Local>) -> ScanOutcome {
        transition(&self.table, &self.normalizer, state, raw, at)
    }

    pub fn reset(&self, state: &mut WorkflowState) -> Option<ActiveMove> {
        reset(state)
    }
}

/// Submit one code against `table` with the default normalization rules.
pub fn submit_code(raw: &str, table: &LocationTable, state: &mut WorkflowState) -> ScanOutcome {
    transition(table, default_normalizer(), state, raw, Local::now())
}

/// Abandon the move in progress, if any. Counters and history are kept.
pub fn reset(state: &mut WorkflowState) -> Option<ActiveMove> {
    let abandoned = state.active.take();
    if let Some(active) = &abandoned {
        info!(
            source = %active.record.source_code,
            destination = %active.record.destination_code,
            "Move abandoned by reset"
        );
    }
    abandoned
}

fn transition(
    table: &LocationTable,
    normalizer: &CodeNormalizer,
    state: &mut WorkflowState,
    raw: &str,
    at: DateTime<Local>,
) -> ScanOutcome {
    if raw.trim().is_empty() {
        debug!("Ignoring blank scan");
        return ScanOutcome::Ignored;
    }

    let code = normalizer.normalize(raw);

    match state.active.take() {
        None => match table.find_source(&code, normalizer) {
            Some(record) => {
                info!(
                    source = %record.source_code,
                    destination = %record.destination_code,
                    quantity = record.quantity,
                    "Source location matched"
                );
                let outcome = ScanOutcome::Found {
                    source_code: record.source_code.clone(),
                    destination: record.destination_code.clone(),
                    quantity: record.quantity,
                };
                state.active = Some(ActiveMove {
                    scanned_source: code,
                    record: record.clone(),
                });
                outcome
            }
            None => {
                info!(code = %code, "Source location not found");
                ScanOutcome::NotFound { code }
            }
        },
        Some(active) => {
            if code == normalizer.normalize(&active.record.destination_code) {
                let entry = state.record_completed(active, at);
                info!(
                    source = %entry.source_code,
                    destination = %entry.destination_code,
                    quantity = entry.quantity,
                    "Move confirmed"
                );
                ScanOutcome::Success {
                    source_code: entry.source_code.clone(),
                    destination: entry.destination_code.clone(),
                    quantity: entry.quantity,
                }
            } else {
                let expected = active.record.destination_code.clone();
                info!(expected = %expected, scanned = %code, "Destination mismatch");
                state.active = Some(active);
                ScanOutcome::Mismatch {
                    expected,
                    scanned: code,
                }
            }
        }
    }
}
