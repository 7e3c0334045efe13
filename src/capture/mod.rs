//! Capture collaborators.
//!
//! Every input mechanism (keyboard-emulating scanner, manual entry, a replayed
//! scan log, camera frames run through a barcode decoder) is a
//! [`CodeSource`]: it produces one decoded string at a time and hands it to
//! the shared workflow engine. Sources strip trailing control characters;
//! everything else (trimming, case, the doubled-prefix rule) is left to
//! normalization.

pub mod frame;
pub mod line;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub use frame::{DecoderChain, FrameDecoder, FrameSource};
pub use line::LineSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read scan input: {0}")]
    Io(#[from] std::io::Error),
}

/// The capture mechanism behind a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// USB or Bluetooth scanner that types the code followed by Enter
    Keyboard,
    /// Operator types codes by hand
    Manual,
    /// Previously recorded scans read back from a file
    #[value(skip)]
    Replay,
    /// Camera frames decoded by a barcode library
    #[value(skip)]
    Camera,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Keyboard => "keyboard",
            InputKind::Manual => "manual",
            InputKind::Replay => "replay",
            InputKind::Camera => "camera",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that yields decoded codes, one per call
#[async_trait]
pub trait CodeSource: Send {
    /// Next decoded string, or `None` once the source is exhausted
    async fn next_code(&mut self) -> Result<Option<String>, SourceError>;

    fn kind(&self) -> InputKind;
}

/// Drop trailing control characters (CR, LF, TAB, ETX...) some scanners append
pub fn strip_control_chars(raw: &str) -> &str {
    raw.trim_end_matches(|c: char| c.is_control())
}
