//! Line bookkeeping for position conversion.
//!
//! LSP positions count columns in UTF-16 code units while document text is
//! stored as UTF-8, so every conversion walks the characters of one line.

use tower_lsp::lsp_types::Position;

/// Byte offsets of line starts, computed once per text snapshot.
///
/// The index does not own the text; callers pass the same snapshot it was
/// built from. [`Document`](super::Document) keeps the two together.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of a line's content, excluding its terminator (`\n` or `\r\n`).
    fn line_bounds(&self, text: &str, line: usize) -> (usize, usize) {
        let start = self.line_starts[line];
        let mut end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(text.len());
        if end > start && text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        (start, end)
    }

    /// Convert a byte offset to an LSP position.
    ///
    /// Offsets past the end of the text map to the end of the last line.
    pub fn offset_to_position(&self, text: &str, offset: usize) -> Position {
        let offset = offset.min(text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };

        let (start, end) = self.line_bounds(text, line);
        let character: usize = text[start..end]
            .char_indices()
            .take_while(|(i, _)| start + i < offset)
            .map(|(_, c)| c.len_utf16())
            .sum();

        Position::new(line as u32, character as u32)
    }

    /// Convert an LSP position to a byte offset.
    ///
    /// Returns `None` when the line does not exist. A character past the end
    /// of the line clamps to the end of that line.
    pub fn position_to_offset(&self, text: &str, position: Position) -> Option<usize> {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return None;
        }

        let (start, end) = self.line_bounds(text, line);
        let mut utf16_col = 0u32;
        for (i, c) in text[start..end].char_indices() {
            if utf16_col >= position.character {
                return Some(start + i);
            }
            utf16_col += c.len_utf16() as u32;
        }
        Some(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(text: &str, offset: usize) -> Option<usize> {
        let idx = LineIndex::new(text);
        let pos = idx.offset_to_position(text, offset);
        idx.position_to_offset(text, pos)
    }

    #[test]
    fn single_line() {
        let text = "<h1>Hello</h1>";
        let idx = LineIndex::new(text);
        assert_eq!(idx.offset_to_position(text, 0), Position::new(0, 0));
        assert_eq!(idx.offset_to_position(text, 2), Position::new(0, 2));
        assert_eq!(idx.position_to_offset(text, Position::new(0, 14)), Some(14));
    }

    #[test]
    fn multi_line() {
        let text = "<div>\n  <p>\n</div>";
        let idx = LineIndex::new(text);
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.offset_to_position(text, 6), Position::new(1, 0));
        assert_eq!(idx.offset_to_position(text, 9), Position::new(1, 3));
        assert_eq!(idx.position_to_offset(text, Position::new(2, 1)), Some(13));
    }

    #[test]
    fn crlf_is_not_part_of_the_line() {
        let text = "<a>\r\n<b>";
        let idx = LineIndex::new(text);
        // Character past the end clamps before the `\r`.
        assert_eq!(idx.position_to_offset(text, Position::new(0, 10)), Some(3));
        assert_eq!(idx.position_to_offset(text, Position::new(1, 1)), Some(6));
        assert_eq!(idx.offset_to_position(text, 5), Position::new(1, 0));
    }

    #[test]
    fn utf16_columns() {
        // The emoji is 4 bytes in UTF-8 and 2 code units in UTF-16.
        let text = "<p>😀<b>";
        let idx = LineIndex::new(text);
        assert_eq!(idx.offset_to_position(text, 7), Position::new(0, 5));
        assert_eq!(idx.position_to_offset(text, Position::new(0, 5)), Some(7));
        assert_eq!(round_trip(text, 8), Some(8));
    }

    #[test]
    fn line_out_of_bounds() {
        let text = "<p>";
        let idx = LineIndex::new(text);
        assert_eq!(idx.position_to_offset(text, Position::new(1, 0)), None);
        assert_eq!(idx.offset_to_position(text, 99), Position::new(0, 3));
    }
}
