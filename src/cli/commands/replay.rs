use super::build_engine;
use super::display::SessionView;
use super::scan::drive_session;
use crate::capture::LineSource;
use crate::config::ScanRelocateConfig;
use crate::session::ScanSession;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Run a recorded scan log (one code or `:command` per line) through a fresh
/// session, exactly as if it had been scanned.
pub struct ReplayCommand {
    pub config: ScanRelocateConfig,
    pub file: PathBuf,
    pub json: bool,
}

impl ReplayCommand {
    pub fn new(config: ScanRelocateConfig, file: PathBuf) -> Self {
        Self {
            config,
            file,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub async fn execute(&self) -> Result<()> {
        let mut source = LineSource::open(&self.file)
            .await
            .with_context(|| format!("Failed to open scan log {}", self.file.display()))?;

        let engine = build_engine(&self.config);
        let mut session = ScanSession::new(engine);
        let view = SessionView::new(self.json, self.config.display.recent_history);

        view.print_banner(&session)?;
        drive_session(&mut session, &mut source, &view).await
    }
}
