//! Wire framing for the streaming relay.
//!
//! Backends emit newline-delimited `data: ` frames; OpenAI-compatible
//! clients expect each frame terminated by a blank line. The relay never
//! parses frame payloads, so the only state here is a split-on-newline
//! buffer for chunks that arrive mid-line.

/// Accumulates raw response chunks and yields complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: String,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
    }

    /// Next complete line, without its terminator. Returns `None` until a
    /// full line has arrived.
    pub fn next_line(&mut self) -> Option<String> {
        let newline = self.buffer.find('\n')?;
        let remaining = self.buffer.split_off(newline + 1);
        let mut line = std::mem::replace(&mut self.buffer, remaining);
        line.truncate(newline);
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    /// Whatever is left once the backend stream ends without a trailing
    /// newline.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.buffer))
    }
}

/// Re-frame one backend line as an SSE unit: `<line>\n\n`.
#[must_use]
pub fn sse_frame(line: &str) -> String {
    format!("{line}\n\n")
}
