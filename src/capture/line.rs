use super::{strip_control_chars, CodeSource, InputKind, SourceError};
use async_trait::async_trait;
use std::borrow::Cow;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::warn;

/// One code per line from any async reader.
///
/// Covers keyboard-emulating scanners and manual entry on stdin, and scan
/// logs replayed from a file. Blank lines are passed through so the engine
/// can report them as ignored. Bytes that are not UTF-8 are replaced rather
/// than ending the session; the garbled code then simply fails to match.
pub struct LineSource<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    kind: InputKind,
}

impl<R> LineSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(reader: R, kind: InputKind) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::new(),
            kind,
        }
    }
}

impl LineSource<tokio::io::Stdin> {
    pub fn stdin(kind: InputKind) -> Self {
        Self::new(tokio::io::stdin(), kind)
    }
}

impl LineSource<tokio::fs::File> {
    /// Open a scan log for replay
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(file, InputKind::Replay))
    }
}

#[async_trait]
impl<R> CodeSource for LineSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn next_code(&mut self) -> Result<Option<String>, SourceError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&self.buf);
        if let Cow::Owned(_) = line {
            warn!(bytes = self.buf.len(), "Scan input was not valid UTF-8");
        }
        Ok(Some(strip_control_chars(&line).to_string()))
    }

    fn kind(&self) -> InputKind {
        self.kind
    }
}
