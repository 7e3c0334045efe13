// Scan workflow: two-phase source/destination matching over the reference table

pub mod state;
pub mod state_machine;

pub use state::{ActiveMove, HistoryEntry, Phase, WorkflowState};
pub use state_machine::{reset, submit_code, ScanEngine, ScanOutcome};
