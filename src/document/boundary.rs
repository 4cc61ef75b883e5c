//! Markup/expression boundary detection.
//!
//! Decides whether a cursor offset sits in host markup or inside a
//! brace-delimited expression embedded in a tag, e.g. the `{...}` of
//! `on:click={() => count += 1}`. The check runs on every keystroke against
//! half-typed text, so it looks at no more than [`SCAN_WINDOW`] bytes before
//! the cursor and never fails.

/// How far back to look for the opening `<` of the enclosing tag.
pub const SCAN_WINDOW: usize = 4096;

/// Where a cursor offset sits relative to embedded expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryContext {
    Markup,
    Expression,
}

/// States of the forward scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Text content between tags.
    Markup,
    /// Inside a start tag, outside any attribute value literal or expression.
    InTag,
    /// Inside a quoted attribute value; holds the quote byte.
    InQuotedAttrValue(u8),
    /// Inside a `{...}` expression.
    InExpression {
        depth: u32,
        /// Open string literal inside the expression, if any.
        quote: Option<u8>,
        escaped: bool,
    },
}

impl ScanState {
    /// Advance by one byte. `next` is the byte after `byte`, used to tell a tag
    /// opener (`<div`) apart from a stray `<`.
    pub fn step(self, byte: u8, next: Option<u8>) -> ScanState {
        match self {
            ScanState::Markup => {
                if byte == b'<' && next.is_some_and(|b| b.is_ascii_alphabetic()) {
                    ScanState::InTag
                } else {
                    ScanState::Markup
                }
            }
            ScanState::InTag => match byte {
                b'"' | b'\'' => ScanState::InQuotedAttrValue(byte),
                b'{' => ScanState::InExpression {
                    depth: 1,
                    quote: None,
                    escaped: false,
                },
                b'>' => ScanState::Markup,
                _ => ScanState::InTag,
            },
            ScanState::InQuotedAttrValue(quote) => {
                if byte == quote {
                    ScanState::InTag
                } else {
                    self
                }
            }
            ScanState::InExpression {
                depth,
                quote: Some(quote),
                escaped,
            } => {
                let (quote, escaped) = match byte {
                    _ if escaped => (Some(quote), false),
                    b'\\' => (Some(quote), true),
                    b if b == quote => (None, false),
                    _ => (Some(quote), false),
                };
                ScanState::InExpression {
                    depth,
                    quote,
                    escaped,
                }
            }
            ScanState::InExpression {
                depth, quote: None, ..
            } => match byte {
                b'"' | b'\'' | b'`' => ScanState::InExpression {
                    depth,
                    quote: Some(byte),
                    escaped: false,
                },
                b'{' => ScanState::InExpression {
                    depth: depth + 1,
                    quote: None,
                    escaped: false,
                },
                b'}' if depth <= 1 => ScanState::InTag,
                b'}' => ScanState::InExpression {
                    depth: depth - 1,
                    quote: None,
                    escaped: false,
                },
                _ => self,
            },
        }
    }
}

fn is_tag_opener(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'<' && bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic())
}

/// Where the forward scan starts for a cursor at `offset`.
///
/// Texts no longer than [`SCAN_WINDOW`] are scanned from the beginning, in
/// markup. Otherwise the scan starts at the first tag opener inside the
/// window, so a `<` within an expression or string literal is only ever seen
/// by the state machine, never taken as a starting point.
fn scan_start(bytes: &[u8], offset: usize) -> Option<usize> {
    let floor = offset.saturating_sub(SCAN_WINDOW);
    if floor == 0 {
        return Some(0);
    }
    (floor..offset).find(|&i| is_tag_opener(bytes, i))
}

/// Run the scanner over `bytes[start..end]` beginning in `Markup`.
fn scan(bytes: &[u8], start: usize, end: usize) -> ScanState {
    (start..end).fold(ScanState::Markup, |state, i| {
        state.step(bytes[i], bytes.get(i + 1).copied())
    })
}

/// Classify `offset` in `text` as markup or expression context.
///
/// Offsets past the end of `text` are clamped. When the window holds no tag
/// opener the offset is treated as markup.
pub fn classify(text: &str, offset: usize) -> BoundaryContext {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let bytes = text.as_bytes();
    let Some(start) = scan_start(bytes, offset) else {
        return BoundaryContext::Markup;
    };

    match scan(bytes, start, offset) {
        ScanState::InExpression { .. } => BoundaryContext::Expression,
        _ => BoundaryContext::Markup,
    }
}
