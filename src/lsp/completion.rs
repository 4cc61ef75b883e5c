//! Completion dispatch and language-block augmentation.
//!
//! Completions are suppressed inside `{...}` expressions. Elsewhere the
//! engine's items are returned, and at tag-name sites each language-block
//! element (`style`, `script`, ...) is followed by one item per configured
//! alternate language, e.g. `style (lang="less")`.

use std::collections::HashSet;
use std::ops::Range;

use tower_lsp::lsp_types::{
    CompletionItem, CompletionList, CompletionTextEdit, Documentation, InsertTextFormat, Position,
    TextEdit,
};
use tracing::debug;

use crate::document::{classify, BoundaryContext, Document};
use crate::html::{is_tag_name_byte, MarkupCompletion, MarkupEdit, MarkupEngine};
use crate::settings::{LanguageAlternate, LanguageBlocks, PluginConfig};

/// What is being completed at an offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionSite {
    /// A bare `<` followed by a partial element name; `span` covers the partial name.
    TagName { span: Range<usize> },
    /// Attribute names, values, end tags, content.
    Other,
}

/// Classify the completion site by looking back over the partial name.
pub fn completion_site(text: &str, offset: usize) -> CompletionSite {
    let bytes = text.as_bytes();
    let offset = offset.min(bytes.len());
    let start = bytes[..offset]
        .iter()
        .rposition(|b| !is_tag_name_byte(*b))
        .map_or(0, |p| p + 1);

    if start > 0 && bytes[start - 1] == b'<' {
        CompletionSite::TagName {
            span: start..offset,
        }
    } else {
        CompletionSite::Other
    }
}

fn synthetic_item(
    base: &MarkupCompletion,
    alternate: &LanguageAlternate,
    label: String,
    span: &Range<usize>,
) -> MarkupCompletion {
    let span = base
        .edit
        .as_ref()
        .map_or_else(|| span.clone(), |e| e.span.clone());
    MarkupCompletion {
        label,
        kind: base.kind,
        documentation: Some(format!(
            "Use {} as the language of the {} block",
            alternate.lang, base.label
        )),
        edit: Some(MarkupEdit {
            span,
            new_text: format!("{} {}", base.label, alternate.fragment),
        }),
        insert_text_format: base.insert_text_format.or(Some(InsertTextFormat::PLAIN_TEXT)),
        filter_text: base.filter_text.clone(),
    }
}

/// Add language-variant items after their base element at tag-name sites.
///
/// Other sites get `raw` back unchanged. Items whose label is already taken
/// are not added, so no label appears twice.
pub fn augment(
    raw: Vec<MarkupCompletion>,
    text: &str,
    offset: usize,
    blocks: &LanguageBlocks,
) -> Vec<MarkupCompletion> {
    let CompletionSite::TagName { span } = completion_site(text, offset) else {
        return raw;
    };
    if blocks.is_empty() {
        return raw;
    }

    let mut seen: HashSet<String> = raw.iter().map(|item| item.label.clone()).collect();
    let mut items = Vec::with_capacity(raw.len());

    for item in raw {
        let synthetic: Vec<MarkupCompletion> = blocks
            .alternates(&item.label)
            .iter()
            .filter_map(|alternate| {
                let label = format!("{} (lang=\"{}\")", item.label, alternate.lang);
                seen.insert(label.clone())
                    .then(|| synthetic_item(&item, alternate, label, &span))
            })
            .collect();
        items.push(item);
        items.extend(synthetic);
    }

    items
}

fn to_completion_item(document: &Document, item: MarkupCompletion) -> CompletionItem {
    CompletionItem {
        label: item.label,
        kind: Some(item.kind),
        documentation: item.documentation.map(Documentation::String),
        text_edit: item.edit.map(|edit| {
            CompletionTextEdit::Edit(TextEdit {
                range: document.span_to_range(&edit.span),
                new_text: edit.new_text,
            })
        }),
        insert_text_format: item.insert_text_format,
        filter_text: item.filter_text,
        ..Default::default()
    }
}

/// Generate completions at a position in a document.
pub fn completion_at_position(
    engine: &dyn MarkupEngine,
    document: &Document,
    position: Position,
    config: &PluginConfig,
) -> Option<CompletionList> {
    if !config.features.completions {
        return None;
    }
    let offset = document.offset_at(position)?;
    if classify(document.text(), offset) == BoundaryContext::Expression {
        debug!(offset, "cursor inside expression, no completions");
        return None;
    }

    let raw = engine.completions(document.text(), offset)?;
    let items = augment(raw, document.text(), offset, &config.language_blocks);

    Some(CompletionList {
        is_incomplete: false,
        items: items
            .into_iter()
            .map(|item| to_completion_item(document, item))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::HtmlEngine;
    use tower_lsp::lsp_types::{CompletionItemKind, Url};

    fn raw(labels: &[&str]) -> Vec<MarkupCompletion> {
        labels
            .iter()
            .map(|l| MarkupCompletion::new(*l, CompletionItemKind::PROPERTY))
            .collect()
    }

    fn labels(items: &[MarkupCompletion]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    fn document(text: &str) -> Document {
        Document::new(Url::parse("file:///hello.svelte").unwrap(), text, 0)
    }

    #[test]
    fn site_detection() {
        assert_eq!(completion_site("<", 1), CompletionSite::TagName { span: 1..1 });
        assert_eq!(completion_site("<sty", 4), CompletionSite::TagName { span: 1..4 });
        assert_eq!(completion_site("<p><sty", 7), CompletionSite::TagName { span: 4..7 });
        assert_eq!(completion_site("<div sty", 8), CompletionSite::Other);
        assert_eq!(completion_site("</sty", 5), CompletionSite::Other);
        assert_eq!(completion_site("sty", 3), CompletionSite::Other);
        assert_eq!(completion_site("", 0), CompletionSite::Other);
    }

    #[test]
    fn inserts_alternates_after_base_item() {
        let blocks = LanguageBlocks::new().with("style", "less").with("style", "scss");
        let items = augment(raw(&["div", "style", "span"]), "<sty", 4, &blocks);
        assert_eq!(
            labels(&items),
            [
                "div",
                "style",
                "style (lang=\"less\")",
                "style (lang=\"scss\")",
                "span"
            ]
        );

        let less = &items[2];
        assert_eq!(less.kind, CompletionItemKind::PROPERTY);
        let edit = less.edit.as_ref().unwrap();
        assert_eq!(edit.span, 1..4);
        assert_eq!(edit.new_text, "style lang=\"less\"");
    }

    #[test]
    fn synthetic_items_reuse_base_edit_span() {
        let blocks = LanguageBlocks::new().with("script", "ts");
        let base = MarkupCompletion::new("script", CompletionItemKind::PROPERTY).with_edit(
            0..4,
            "script",
            InsertTextFormat::PLAIN_TEXT,
        );
        let items = augment(vec![base], "<scr", 4, &blocks);
        assert_eq!(items[1].edit.as_ref().unwrap().span, 0..4);
        assert_eq!(items[1].insert_text_format, Some(InsertTextFormat::PLAIN_TEXT));
    }

    #[test]
    fn attribute_sites_are_untouched() {
        let blocks = LanguageBlocks::new().with("style", "less");
        let input = raw(&["class", "style"]);
        assert_eq!(augment(input.clone(), "<div sty", 8, &blocks), input);
    }

    #[test]
    fn never_duplicates_labels() {
        let blocks = LanguageBlocks::new().with("style", "less");
        let items = augment(
            raw(&["style", "style (lang=\"less\")"]),
            "<s",
            2,
            &blocks,
        );
        assert_eq!(labels(&items), ["style", "style (lang=\"less\")"]);
    }

    #[test]
    fn count_grows_by_configured_alternates() {
        let blocks = LanguageBlocks::new()
            .with("style", "less")
            .with("style", "scss")
            .with("script", "ts")
            .with("template", "pug");
        let input = raw(&["div", "script", "style"]);
        let items = augment(input.clone(), "<", 1, &blocks);
        // template is configured but absent from the raw list.
        assert_eq!(items.len(), input.len() + 3);
    }

    #[test]
    fn no_completions_inside_expression() {
        let doc = document("<div on:click={() =>");
        let config = PluginConfig::default();
        assert!(completion_at_position(&HtmlEngine, &doc, Position::new(0, 20), &config).is_none());
    }

    #[test]
    fn completions_convert_offsets_to_positions() {
        let doc = document("<p>\n  <sty");
        let config = PluginConfig::default();
        let list = completion_at_position(&HtmlEngine, &doc, Position::new(1, 6), &config).unwrap();
        let less = list
            .items
            .iter()
            .find(|i| i.label == "style (lang=\"less\")")
            .unwrap();
        match &less.text_edit {
            Some(CompletionTextEdit::Edit(edit)) => {
                assert_eq!(edit.range.start, Position::new(1, 3));
                assert_eq!(edit.range.end, Position::new(1, 6));
            }
            other => panic!("Expected text edit, got {:?}", other),
        }
    }

    #[test]
    fn attribute_values_get_empty_lists() {
        let config = PluginConfig::default();
        let quoted = document("<div class=\"ab\">");
        let list = completion_at_position(&HtmlEngine, &quoted, Position::new(0, 12), &config).unwrap();
        assert!(list.items.is_empty());

        let unquoted = document("<div on:click={bla}");
        let list = completion_at_position(&HtmlEngine, &unquoted, Position::new(0, 19), &config).unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn no_completions_after_markup_inside_expression() {
        let config = PluginConfig::default();
        let string = document("<div on:click={() => x = '<b>'");
        assert!(completion_at_position(&HtmlEngine, &string, Position::new(0, 29), &config).is_none());

        let comparison = document("<div class:on={i<n");
        assert!(completion_at_position(&HtmlEngine, &comparison, Position::new(0, 18), &config).is_none());
    }

    #[test]
    fn disabled_completions() {
        let doc = document("<");
        let mut config = PluginConfig::default();
        config.features.completions = false;
        assert!(completion_at_position(&HtmlEngine, &doc, Position::new(0, 1), &config).is_none());
    }

    #[test]
    fn position_outside_document() {
        let doc = document("<");
        let config = PluginConfig::default();
        assert!(completion_at_position(&HtmlEngine, &doc, Position::new(3, 0), &config).is_none());
    }
}
