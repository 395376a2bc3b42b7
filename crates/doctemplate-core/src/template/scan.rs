//! Placeholder scanning
//!
//! Provides O(n) discovery of `!...!` placeholders using a state machine.

/// Marker byte that opens and closes a placeholder
pub const MARKER: u8 = b'!';

/// A single `!...!` occurrence with its position in the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    /// Content between the markers
    pub raw: &'a str,
    /// Absolute byte position of the opening marker
    pub start: usize,
    /// Byte position just past the closing marker
    pub end: usize,
    /// Line number where the occurrence starts (1-based)
    pub line: usize,
}

/// Scanning state machine (explicit for testability)
///
/// # State Transitions
///
/// ```text
/// Normal ──!──> InToken ──!──> [Yield Occurrence] → Normal
///                  │  │
///                  │  └─!─ (empty content) ──> InToken at the new marker
///                  └─< or >──> Normal
/// ```
///
/// A closing marker is consumed together with its token and never opens the
/// next one, so `!a!b!` yields only `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanState {
    /// Scanning regular text
    Normal,

    /// Inside `!...`, scanning until the closing marker
    InToken {
        /// Byte position of the opening marker
        start: usize,
        /// Line of the opening marker
        line: usize,
    },
}

/// Iterator over placeholder occurrences in a text
///
/// Every byte is visited exactly once in a forward-only pass. Content may not
/// contain the marker or angle brackets; a `<` or `>` abandons the pending token.
/// Markers and brackets are ASCII, so every slice boundary is a char boundary.
pub struct Occurrences<'a> {
    text: &'a str,
    pos: usize,
    state: ScanState,
    line: usize,
}

impl<'a> Occurrences<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            state: ScanState::Normal,
            line: 1,
        }
    }

    #[cfg(test)]
    #[inline]
    fn record_test_step() {
        test_counter::inc();
    }

    /// Process one byte; returns a completed occurrence when the closing marker is seen
    fn step(&mut self, byte: u8) -> Option<Occurrence<'a>> {
        let pos = self.pos;
        self.pos += 1;

        if byte == b'\n' {
            self.line += 1;
        }

        match self.state {
            ScanState::Normal => {
                if byte == MARKER {
                    self.state = ScanState::InToken {
                        start: pos,
                        line: self.line,
                    };
                }
                None
            }
            ScanState::InToken { start, line } => match byte {
                MARKER if pos == start + 1 => {
                    // `!!` has no content; the second marker may still open a token
                    self.state = ScanState::InToken {
                        start: pos,
                        line: self.line,
                    };
                    None
                }
                MARKER => {
                    self.state = ScanState::Normal;
                    Some(Occurrence {
                        raw: &self.text[start + 1..pos],
                        start,
                        end: pos + 1,
                        line,
                    })
                }
                b'<' | b'>' => {
                    self.state = ScanState::Normal;
                    None
                }
                _ => None,
            },
        }
    }
}

impl<'a> Iterator for Occurrences<'a> {
    type Item = Occurrence<'a>;

    fn next(&mut self) -> Option<Occurrence<'a>> {
        let bytes = self.text.as_bytes();

        while self.pos < bytes.len() {
            #[cfg(test)]
            Self::record_test_step();

            if let Some(occurrence) = self.step(bytes[self.pos]) {
                return Some(occurrence);
            }
        }

        None
    }
}
