//! Generic HTML language features.
//!
//! This module provides:
//! - `MarkupEngine`, the interface the dispatch layer talks to
//! - `HtmlEngine`, the default engine backed by a built-in element table
//!
//! Engines work on raw text and byte offsets only and know nothing about
//! `{...}` expressions; callers decide when it is safe to ask them.

mod data;
mod engine;
mod parser;

use std::ops::Range;

use tower_lsp::lsp_types::{CompletionItemKind, InsertTextFormat};

pub use engine::HtmlEngine;
pub(crate) use parser::is_tag_name_byte;

/// Hover contents for a documented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupHover {
    /// Markdown.
    pub contents: String,
    /// Byte span of the documented token.
    pub span: Range<usize>,
}

/// An edit replacing a byte span with new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupEdit {
    pub span: Range<usize>,
    pub new_text: String,
}

/// A completion suggestion with offsets instead of LSP positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupCompletion {
    pub label: String,
    pub kind: CompletionItemKind,
    pub documentation: Option<String>,
    pub edit: Option<MarkupEdit>,
    pub insert_text_format: Option<InsertTextFormat>,
    pub filter_text: Option<String>,
}

impl MarkupCompletion {
    pub fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            kind,
            documentation: None,
            edit: None,
            insert_text_format: None,
            filter_text: None,
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_edit(
        mut self,
        span: Range<usize>,
        new_text: impl Into<String>,
        format: InsertTextFormat,
    ) -> Self {
        self.edit = Some(MarkupEdit {
            span,
            new_text: new_text.into(),
        });
        self.insert_text_format = Some(format);
        self
    }

    pub fn with_filter_text(mut self, filter_text: impl Into<String>) -> Self {
        self.filter_text = Some(filter_text.into());
        self
    }
}

/// A markup intelligence provider.
///
/// Every method is a pure function of `(text, offset)`. `None` means the
/// feature has nothing to offer at that offset.
pub trait MarkupEngine: Send + Sync {
    fn hover(&self, text: &str, offset: usize) -> Option<MarkupHover>;

    fn completions(&self, text: &str, offset: usize) -> Option<Vec<MarkupCompletion>>;

    /// Text to insert after the user typed `>` or `</`; contains a `$0`
    /// final-cursor marker when the cursor should not end up at the end.
    fn tag_complete(&self, text: &str, offset: usize) -> Option<String>;
}
