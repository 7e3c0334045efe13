// Operator-facing rendering of a scanning session, as text or JSON lines

use crate::session::ScanSession;
use crate::workflows::{HistoryEntry, ScanOutcome};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct SessionView {
    json: bool,
    prompt: bool,
    recent_history: usize,
}

#[derive(Serialize)]
struct JsonLine<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(flatten)]
    body: T,
}

impl SessionView {
    pub fn new(json: bool, recent_history: usize) -> Self {
        Self {
            json,
            prompt: false,
            recent_history,
        }
    }

    /// Print a prompt before every read (manual entry)
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt && !self.json;
        self
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn print_banner(&self, session: &ScanSession) -> Result<()> {
        if self.json {
            return Ok(());
        }

        println!("📦 LOCATION MOVE TRACKING");
        println!("==========================");
        let origin = session.engine().table().origin();
        println!("📋 Reference table: {origin}");
        println!("   Commands: :status  :history  :reset  :quit");
        println!();
        self.print_stats(session);
        self.print_phase(session);
        Ok(())
    }

    pub fn print_prompt(&self) -> Result<()> {
        if self.prompt {
            print!("> ");
            std::io::stdout().flush()?;
        }
        Ok(())
    }

    pub fn print_outcome(&self, session: &ScanSession, outcome: &ScanOutcome) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(outcome)?);
            return Ok(());
        }

        match outcome {
            ScanOutcome::Found { .. } => {
                println!("✅ Found! {outcome}");
                self.print_phase(session);
            }
            ScanOutcome::NotFound { code } => {
                println!("❌ Code not found: {code}");
            }
            ScanOutcome::Success { quantity, .. } => {
                println!("🎉 SUCCESS! {quantity} piece(s) moved");
                println!("   {outcome}");
                self.print_stats(session);
                self.print_phase(session);
            }
            ScanOutcome::Mismatch { expected, scanned } => {
                println!("❌ Wrong location: {scanned}");
                println!("   Expected: {expected}");
            }
            ScanOutcome::Ignored => {}
        }
        Ok(())
    }

    pub fn print_status(&self, session: &ScanSession) -> Result<()> {
        if self.json {
            let line = JsonLine {
                kind: "status",
                body: StatusBody {
                    phase: session.phase().to_string(),
                    active: session.active_move().map(|m| &m.record),
                    stats: session.stats(),
                },
            };
            println!("{}", serde_json::to_string(&line)?);
            return Ok(());
        }

        self.print_stats(session);
        self.print_phase(session);
        Ok(())
    }

    pub fn print_history(&self, session: &ScanSession) -> Result<()> {
        let recent = session.recent_history(self.recent_history);

        if self.json {
            let line = JsonLine {
                kind: "history",
                body: HistoryBody { entries: recent },
            };
            println!("{}", serde_json::to_string(&line)?);
            return Ok(());
        }

        println!("📜 History ({})", session.state().history().len());
        if recent.is_empty() {
            println!("   No moves confirmed yet");
        }
        for entry in recent {
            println!("   {}", format_history_entry(entry));
        }
        Ok(())
    }

    pub fn print_reset(&self, session: &ScanSession, abandoned: bool) -> Result<()> {
        if self.json {
            let line = JsonLine {
                kind: "reset",
                body: ResetBody { abandoned },
            };
            println!("{}", serde_json::to_string(&line)?);
            return Ok(());
        }

        if abandoned {
            println!("🔄 Move abandoned");
        } else {
            println!("🔄 Nothing to reset");
        }
        self.print_phase(session);
        Ok(())
    }

    pub fn print_unknown_command(&self, name: &str) {
        if self.json {
            eprintln!("unknown command :{name}");
        } else {
            println!("❓ Unknown command :{name} (try :status, :history, :reset, :quit)");
        }
    }

    pub fn print_summary(&self, session: &ScanSession) -> Result<()> {
        if self.json {
            let line = JsonLine {
                kind: "summary",
                body: session.summary(),
            };
            println!("{}", serde_json::to_string(&line)?);
            return Ok(());
        }

        println!();
        println!("🏁 SESSION SUMMARY");
        println!("───────────────────");
        self.print_stats(session);
        if let Some(active) = session.active_move() {
            println!(
                "⚠️  Unconfirmed move: {} → {}",
                active.record.source_code, active.record.destination_code
            );
        }
        self.print_history(session)
    }

    fn print_stats(&self, session: &ScanSession) {
        let stats = session.stats();
        println!(
            "📊 Total: {}   Processed: {}   Progress: {:.1}%",
            stats.total_records, stats.processed, stats.progress_percent
        );
    }

    fn print_phase(&self, session: &ScanSession) {
        match session.active_move() {
            None => println!("📦 WAITING: scan the OLD location"),
            Some(active) => {
                println!(
                    "➡️  GO TO {}   Quantity: {} piece(s)",
                    active.record.destination_code, active.record.quantity
                );
                println!("   Scan the NEW location to confirm");
            }
        }
    }
}

pub fn format_history_entry(entry: &HistoryEntry) -> String {
    format!(
        "{} | {} → {} ({})",
        entry.timestamp.format("%H:%M:%S"),
        entry.source_code,
        entry.destination_code,
        entry.quantity
    )
}

#[derive(Serialize)]
struct StatusBody<'a> {
    phase: String,
    active: Option<&'a crate::catalog::LocationRecord>,
    stats: crate::session::SessionStats,
}

#[derive(Serialize)]
struct HistoryBody<'a> {
    entries: Vec<&'a HistoryEntry>,
}

#[derive(Serialize)]
struct ResetBody {
    abandoned: bool,
}
