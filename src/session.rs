use crate::observability::scan_metrics;
use crate::telemetry::generate_session_id;
use crate::workflows::{ActiveMove, HistoryEntry, Phase, ScanEngine, ScanOutcome, WorkflowState};
use serde::Serialize;

/// Progress figures shown to the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub total_records: usize,
    pub processed: u64,
    /// `processed / total_records * 100`; 0 for an empty table. Not capped,
    /// since the same row can be moved more than once.
    pub progress_percent: f64,
}

/// End-of-session report
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub phase: Phase,
    pub stats: SessionStats,
    pub history: Vec<HistoryEntry>,
}

/// One operator's scanning session: a shared engine plus the session's own
/// [`WorkflowState`]. Scans are handled strictly one after another.
#[derive(Debug, Clone)]
pub struct ScanSession {
    id: String,
    engine: ScanEngine,
    state: WorkflowState,
}

impl ScanSession {
    pub fn new(engine: ScanEngine) -> Self {
        Self {
            id: generate_session_id(),
            engine,
            state: WorkflowState::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn engine(&self) -> &ScanEngine {
        &self.engine
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn active_move(&self) -> Option<&ActiveMove> {
        self.state.active_move()
    }

    pub fn submit(&mut self, raw: &str) -> ScanOutcome {
        let outcome = self.engine.submit(&mut self.state, raw);
        scan_metrics().record(&outcome);
        outcome
    }

    /// Abandon the current move; counters and history are kept
    pub fn reset(&mut self) -> Option<ActiveMove> {
        scan_metrics().record_reset();
        self.engine.reset(&mut self.state)
    }

    pub fn stats(&self) -> SessionStats {
        let total_records = self.engine.table().len();
        let processed = self.state.processed_count();
        let progress_percent = if total_records > 0 {
            processed as f64 / total_records as f64 * 100.0
        } else {
            0.0
        };

        SessionStats {
            total_records,
            processed,
            progress_percent,
        }
    }

    /// Up to `limit` completed moves, newest first
    pub fn recent_history(&self, limit: usize) -> Vec<&HistoryEntry> {
        self.state.recent_history(limit).collect()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id.clone(),
            phase: self.phase(),
            stats: self.stats(),
            history: self.state.history().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LocationRecord, LocationTable, TableOrigin};
    use std::sync::Arc;

    fn session() -> ScanSession {
        let table = LocationTable::new(
            vec![
                LocationRecord::new("TEST001", 10, "A-01-01"),
                LocationRecord::new("TEST002", 25, "A-01-02"),
                LocationRecord::new("TEST003", 5, "B-01-01"),
                LocationRecord::new("TEST004", 1, "B-01-02"),
            ],
            TableOrigin::Bytes,
        );
        ScanSession::new(ScanEngine::new(Arc::new(table))).with_id("session-1")
    }

    #[test]
    fn test_stats_track_progress() {
        let mut session = session();
        assert_eq!(session.stats().progress_percent, 0.0);

        session.submit("TEST001");
        session.submit("A-01-01");

        let stats = session.stats();
        assert_eq!(stats.total_records, 4);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.progress_percent, 25.0);
    }

    #[test]
    fn test_recent_history_newest_first() {
        let mut session = session();
        for (source, destination) in [
            ("TEST001", "A-01-01"),
            ("TEST002", "A-01-02"),
            ("TEST003", "B-01-01"),
        ] {
            session.submit(source);
            session.submit(destination);
        }

        let recent: Vec<&str> = session
            .recent_history(2)
            .iter()
            .map(|entry| entry.source_code.as_str())
            .collect();
        assert_eq!(recent, vec!["TEST003", "TEST002"]);
    }

    #[test]
    fn test_reset_keeps_counters() {
        let mut session = session();
        session.submit("TEST001");
        session.submit("A-01-01");
        session.submit("TEST002");

        let abandoned = session.reset().unwrap();

        assert_eq!(abandoned.record.source_code, "TEST002");
        assert_eq!(session.phase(), Phase::AwaitingSource);
        assert_eq!(session.stats().processed, 1);
        assert_eq!(session.state().history().len(), 1);
    }

    #[test]
    fn test_summary_serializes() {
        let mut session = session();
        session.submit("TEST001");

        let json = serde_json::to_value(session.summary()).unwrap();
        assert_eq!(json["session_id"], "session-1");
        assert_eq!(json["phase"], "AWAITING_DESTINATION");
        assert_eq!(json["stats"]["total_records"], 4);
    }
}
