//! Output buffering for PTY capture

/// Accumulates process output as sanitized text.
///
/// Bytes are optionally stripped of ANSI escape sequences and decoded
/// permissively (invalid sequences become replacement characters, never an
/// error). A consumed position is tracked so that successive waits only
/// match output that arrived after the previous match.
pub struct CaptureBuffer {
    text: String,
    consumed: usize,
    strip_ansi: bool,
}

impl CaptureBuffer {
    /// Create an empty buffer.
    pub fn new(strip_ansi: bool) -> Self {
        Self {
            text: String::new(),
            consumed: 0,
            strip_ansi,
        }
    }

    /// Append raw bytes read from the PTY.
    ///
    /// A read may split a multi-byte sequence across chunk boundaries; the
    /// resulting replacement characters are acceptable for prompt scraping.
    pub fn push_bytes(&mut self, data: &[u8]) {
        if self.strip_ansi {
            let cleaned = strip_ansi(data);
            self.text.push_str(&String::from_utf8_lossy(&cleaned));
        } else {
            self.text.push_str(&String::from_utf8_lossy(data));
        }
    }

    /// The full transcript captured so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The portion not yet claimed by a previous match.
    pub fn pending(&self) -> &str {
        &self.text[self.consumed..]
    }

    /// Byte offset where the pending portion starts.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Mark everything up to `end` (absolute offset) as consumed.
    pub fn consume_to(&mut self, end: usize) {
        self.consumed = end.min(self.text.len());
    }
}

#[derive(Clone, Copy)]
enum AnsiState {
    Plain,
    Escape,
    Csi,
    Osc,
    OscEscape,
    Charset,
}

/// Strip ANSI escape sequences from a byte slice.
///
/// Handles CSI sequences (colors, cursor movement), OSC sequences terminated
/// by BEL or ST, charset designations, and bare two-byte escapes. State does
/// not carry across calls; a sequence split between reads leaks its tail.
pub fn strip_ansi(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut state = AnsiState::Plain;

    for &byte in data {
        state = match state {
            AnsiState::Plain => {
                if byte == 0x1b {
                    AnsiState::Escape
                } else {
                    out.push(byte);
                    AnsiState::Plain
                }
            }
            AnsiState::Escape => match byte {
                b'[' => AnsiState::Csi,
                b']' => AnsiState::Osc,
                b'(' | b')' => AnsiState::Charset,
                _ => AnsiState::Plain,
            },
            // Parameter and intermediate bytes run until a final byte in
            // 0x40..=0x7e ends the sequence.
            AnsiState::Csi => {
                if (0x40..=0x7e).contains(&byte) {
                    AnsiState::Plain
                } else {
                    AnsiState::Csi
                }
            }
            AnsiState::Osc => match byte {
                0x07 => AnsiState::Plain,
                0x1b => AnsiState::OscEscape,
                _ => AnsiState::Osc,
            },
            AnsiState::OscEscape => {
                if byte == b'\\' {
                    AnsiState::Plain
                } else {
                    AnsiState::Osc
                }
            }
            AnsiState::Charset => AnsiState::Plain,
        };
    }

    out
}
