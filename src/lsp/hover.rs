//! Hover dispatch.
//!
//! Hover only reacts to documented tokens (element and attribute names), so it
//! is delegated to the engine without checking for expressions.

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};

use crate::document::Document;
use crate::html::MarkupEngine;
use crate::settings::PluginConfig;

/// Get hover information for a position in the document.
pub fn hover_at_position(
    engine: &dyn MarkupEngine,
    document: &Document,
    position: Position,
    config: &PluginConfig,
) -> Option<Hover> {
    if !config.features.hover {
        return None;
    }
    let offset = document.offset_at(position)?;
    let hover = engine.hover(document.text(), offset)?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: hover.contents,
        }),
        range: Some(document.span_to_range(&hover.span)),
    })
}
