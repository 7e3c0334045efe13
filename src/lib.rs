// scan-relocate library: reference table, code normalization and the
// scan-to-confirm workflow, exposed for the CLI and for integration tests

pub mod capture;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod normalize;
pub mod observability;
pub mod session;
pub mod shutdown;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use capture::{CodeSource, DecoderChain, FrameDecoder, FrameSource, InputKind, LineSource};
pub use catalog::{
    cached_table, load_table, LocationRecord, LocationTable, TableError, TableLoader, TableOrigin,
};
pub use config::ScanRelocateConfig;
pub use normalize::{normalize_code, CodeNormalizer};
pub use observability::{scan_metrics, OperationTimer, ScanMetrics};
pub use session::{ScanSession, SessionStats, SessionSummary};
pub use telemetry::{create_session_span, generate_session_id, init_telemetry, shutdown_telemetry};
pub use workflows::{
    reset, submit_code, ActiveMove, HistoryEntry, Phase, ScanEngine, ScanOutcome, WorkflowState,
};
