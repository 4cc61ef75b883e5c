//! Document snapshots and the store of open documents.

use std::ops::Range;
use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::lsp_types::{Position, Url};

use super::text::LineIndex;

/// An immutable text snapshot of an open document.
///
/// Every edit produces a new `Document`; requests hold an `Arc` to the
/// snapshot they started with.
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: Url,
    /// Document version from the client.
    pub version: i32,
    text: String,
    line_index: LineIndex,
}

impl Document {
    pub fn new(uri: Url, text: impl Into<String>, version: i32) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            uri,
            version,
            text,
            line_index,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of an LSP position, or `None` if the line does not exist.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        self.line_index.position_to_offset(&self.text, position)
    }

    pub fn position_at(&self, offset: usize) -> Position {
        self.line_index.offset_to_position(&self.text, offset)
    }

    /// Convert a byte span to an LSP range.
    pub fn span_to_range(&self, span: &Range<usize>) -> tower_lsp::lsp_types::Range {
        tower_lsp::lsp_types::Range::new(self.position_at(span.start), self.position_at(span.end))
    }
}

/// Thread-safe storage for open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Arc<Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Open or replace a document with new text.
    pub fn open(&self, uri: Url, text: String, version: i32) -> Arc<Document> {
        let document = Arc::new(Document::new(uri.clone(), text, version));
        self.documents.insert(uri, Arc::clone(&document));
        document
    }

    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    pub fn get(&self, uri: &Url) -> Option<Arc<Document>> {
        self.documents.get(uri).map(|r| Arc::clone(&r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> Url {
        Url::parse("file:///hello.svelte").unwrap()
    }

    #[test]
    fn span_to_range_uses_utf16_columns() {
        let doc = Document::new(uri(), "<p>é</p>", 1);
        let range = doc.span_to_range(&(5..8));
        assert_eq!(range.start, Position::new(0, 4));
        assert_eq!(range.end, Position::new(0, 7));
    }

    #[test]
    fn store_replaces_snapshots() {
        let store = DocumentStore::new();
        let first = store.open(uri(), "<a>".to_string(), 1);
        store.open(uri(), "<b>".to_string(), 2);

        let current = store.get(&uri()).unwrap();
        assert_eq!(current.text(), "<b>");
        assert_eq!(current.version, 2);
        // Earlier snapshots are untouched.
        assert_eq!(first.text(), "<a>");

        store.close(&uri());
        assert!(store.get(&uri()).is_none());
    }
}
