//! Tag auto-close dispatch.

use tower_lsp::lsp_types::Position;
use tracing::debug;

use crate::document::{classify, BoundaryContext, Document};
use crate::html::MarkupEngine;
use crate::settings::PluginConfig;

/// Snippet closing the tag just typed at `position`, or `None`.
///
/// A `>` typed inside an expression (`() =>`) is not the end of a tag, so
/// nothing is offered there.
pub fn tag_complete_at_position(
    engine: &dyn MarkupEngine,
    document: &Document,
    position: Position,
    config: &PluginConfig,
) -> Option<String> {
    if !config.features.tag_complete {
        return None;
    }
    let offset = document.offset_at(position)?;
    if classify(document.text(), offset) == BoundaryContext::Expression {
        debug!(offset, "cursor inside expression, no tag completion");
        return None;
    }
    engine.tag_complete(document.text(), offset)
}
