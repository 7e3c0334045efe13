use super::build_engine;
use super::display::SessionView;
use crate::capture::{CodeSource, InputKind, LineSource};
use crate::config::ScanRelocateConfig;
use crate::observability::scan_metrics;
use crate::session::ScanSession;
use crate::shutdown::shutdown_signal;
use crate::telemetry::create_session_span;
use anyhow::Result;
use tracing::{info, warn, Instrument};

/// Operator commands typed in place of a code, prefixed with `:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Reset,
    Status,
    History,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    /// `None` when the line is a code rather than a command
    pub fn parse(line: &str) -> Option<Self> {
        let name = line.trim().strip_prefix(':')?;
        let command = match name.to_ascii_lowercase().as_str() {
            "reset" | "r" => SessionCommand::Reset,
            "status" | "s" => SessionCommand::Status,
            "history" | "h" => SessionCommand::History,
            "quit" | "q" | "exit" => SessionCommand::Quit,
            other => SessionCommand::Unknown(other.to_string()),
        };
        Some(command)
    }
}

/// Feed every code from `source` into `session` until the source runs dry,
/// the operator quits, or Ctrl-C arrives; then print the summary. The
/// summary is printed even when reading the source failed.
pub async fn drive_session(
    session: &mut ScanSession,
    source: &mut dyn CodeSource,
    view: &SessionView,
) -> Result<()> {
    let span = create_session_span(session.id(), source.kind().as_str());

    async {
        info!("Scan session started");
        let result = run_loop(session, source, view).await;
        if let Err(e) = &result {
            warn!(error = %e, "Scan input failed, ending session");
        }

        view.print_summary(session)?;
        scan_metrics().log_stats();
        info!(processed = session.stats().processed, "Scan session ended");
        result
    }
    .instrument(span)
    .await
}

async fn run_loop(
    session: &mut ScanSession,
    source: &mut dyn CodeSource,
    view: &SessionView,
) -> Result<()> {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        view.print_prompt()?;

        let next = tokio::select! {
            _ = &mut shutdown => break,
            next = source.next_code() => next?,
        };
        let Some(line) = next else {
            break;
        };

        match SessionCommand::parse(&line) {
            None => {
                let outcome = session.submit(&line);
                view.print_outcome(session, &outcome)?;
            }
            Some(SessionCommand::Quit) => break,
            Some(SessionCommand::Reset) => {
                let abandoned = session.reset().is_some();
                view.print_reset(session, abandoned)?;
            }
            Some(SessionCommand::Status) => view.print_status(session)?,
            Some(SessionCommand::History) => view.print_history(session)?,
            Some(SessionCommand::Unknown(name)) => view.print_unknown_command(&name),
        }
    }
    Ok(())
}

pub struct ScanCommand {
    pub config: ScanRelocateConfig,
    pub input: InputKind,
    pub json: bool,
}

impl ScanCommand {
    pub fn new(config: ScanRelocateConfig) -> Self {
        Self {
            config,
            input: InputKind::Keyboard,
            json: false,
        }
    }

    pub fn with_input(mut self, input: InputKind) -> Self {
        self.input = input;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub async fn execute(&self) -> Result<()> {
        let engine = build_engine(&self.config);
        let mut session = ScanSession::new(engine);
        let view = SessionView::new(self.json, self.config.display.recent_history)
            .with_prompt(self.input == InputKind::Manual);
        let mut source = LineSource::stdin(self.input);

        view.print_banner(&session)?;
        drive_session(&mut session, &mut source, &view).await
    }
}
