//! Document state and text utilities.
//!
//! This module provides:
//! - `LineIndex` for byte offset <-> LSP position conversion
//! - `Document` snapshots and the `DocumentStore` of open documents
//! - `classify` for telling markup apart from embedded `{...}` expressions

pub mod boundary;
mod state;
mod text;

pub use boundary::{classify, BoundaryContext};
pub use state::{Document, DocumentStore};
pub use text::LineIndex;
