use super::{strip_control_chars, CodeSource, InputKind, SourceError};
use async_trait::async_trait;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Barcode decoding boundary: one raw image or video frame in, at most one
/// decoded string out. Decoding itself lives in an external library.
#[cfg_attr(test, automock)]
pub trait FrameDecoder: Send + Sync {
    fn decode(&self, frame: &[u8]) -> Option<String>;
}

impl<F> FrameDecoder for F
where
    F: Fn(&[u8]) -> Option<String> + Send + Sync,
{
    fn decode(&self, frame: &[u8]) -> Option<String> {
        self(frame)
    }
}

/// Decoders tried in order until one returns a code.
///
/// This is where a collaborator plugs its enhancement passes (plain decode,
/// grayscale, equalized contrast, thresholding...), each wrapped as its own
/// decoder.
#[derive(Default)]
pub struct DecoderChain {
    decoders: Vec<Box<dyn FrameDecoder>>,
}

impl DecoderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, decoder: impl FrameDecoder + 'static) -> Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl FrameDecoder for DecoderChain {
    fn decode(&self, frame: &[u8]) -> Option<String> {
        self.decoders.iter().enumerate().find_map(|(pass, decoder)| {
            let code = decoder.decode(frame)?;
            debug!(pass, "Frame decoded");
            Some(code)
        })
    }
}

/// Codes from a stream of frames (a live camera feed or a series of photos).
///
/// Frames that decode to nothing are skipped. With repeat suppression on, a
/// code seen in consecutive frames is emitted once; it can be emitted again
/// after a frame that decodes to nothing or to a different code.
pub struct FrameSource<I, D> {
    frames: I,
    decoder: D,
    suppress_repeats: bool,
    last_code: Option<String>,
}

impl<I, D> FrameSource<I, D>
where
    I: Iterator<Item = Vec<u8>> + Send,
    D: FrameDecoder,
{
    pub fn new(frames: I, decoder: D) -> Self {
        Self {
            frames,
            decoder,
            suppress_repeats: false,
            last_code: None,
        }
    }

    pub fn with_repeat_suppression(mut self, enabled: bool) -> Self {
        self.suppress_repeats = enabled;
        self
    }
}

#[async_trait]
impl<I, D> CodeSource for FrameSource<I, D>
where
    I: Iterator<Item = Vec<u8>> + Send,
    D: FrameDecoder,
{
    async fn next_code(&mut self) -> Result<Option<String>, SourceError> {
        for frame in self.frames.by_ref() {
            let decoded = self
                .decoder
                .decode(&frame)
                .map(|code| strip_control_chars(&code).to_string())
                .filter(|code| !code.is_empty());

            let Some(code) = decoded else {
                self.last_code = None;
                continue;
            };

            if self.suppress_repeats && self.last_code.as_deref() == Some(code.as_str()) {
                continue;
            }
            self.last_code = Some(code.clone());
            return Ok(Some(code));
        }
        Ok(None)
    }

    fn kind(&self) -> InputKind {
        InputKind::Camera
    }
}
