//! The default `MarkupEngine`, backed by the built-in element table.

use std::ops::Range;

use tower_lsp::lsp_types::{CompletionItemKind, InsertTextFormat};

use super::data::{get_attribute, get_element, ELEMENTS, GLOBAL_ATTRIBUTES};
use super::parser::{HtmlDocument, TokenKind};
use super::{MarkupCompletion, MarkupEngine, MarkupHover};

const DOCTYPE_DOCUMENTATION: &str = "A preamble for an HTML document.";

/// HTML hover, completion and tag auto-close.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlEngine;

impl HtmlEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Suggestions after `<`: the doctype, a close tag for the open parent, then
/// every known element. `lt` is the offset of the `<`, `span` the partial name.
fn tag_name_completions(
    text: &str,
    doc: &HtmlDocument,
    lt: usize,
    span: Range<usize>,
) -> Vec<MarkupCompletion> {
    let mut items = Vec::new();

    if text[..lt].trim().is_empty() {
        items.push(
            MarkupCompletion::new("!DOCTYPE", CompletionItemKind::PROPERTY)
                .with_documentation(DOCTYPE_DOCUMENTATION)
                .with_edit(span.clone(), "!DOCTYPE html>", InsertTextFormat::PLAIN_TEXT),
        );
    }

    if let Some(parent) = doc.innermost_open_at(lt) {
        let label = format!("/{}", parent.name);
        items.push(
            MarkupCompletion::new(label.clone(), CompletionItemKind::PROPERTY)
                .with_filter_text(label.clone())
                .with_edit(span.clone(), format!("{}>", label), InsertTextFormat::PLAIN_TEXT),
        );
    }

    items.extend(ELEMENTS.iter().map(|element| {
        MarkupCompletion::new(element.name, CompletionItemKind::PROPERTY)
            .with_documentation(element.description)
            .with_edit(span.clone(), element.name, InsertTextFormat::PLAIN_TEXT)
    }));

    items
}

/// Suggestions after `</`: the name of the innermost open element.
fn end_tag_completions(doc: &HtmlDocument, lt: usize, span: Range<usize>) -> Vec<MarkupCompletion> {
    doc.innermost_open_at(lt)
        .map(|parent| {
            MarkupCompletion::new(format!("/{}", parent.name), CompletionItemKind::PROPERTY)
                .with_filter_text(parent.name.clone())
                .with_edit(span, format!("{}>", parent.name), InsertTextFormat::PLAIN_TEXT)
        })
        .into_iter()
        .collect()
}

fn attribute_completions(tag: Option<&str>, span: Range<usize>) -> Vec<MarkupCompletion> {
    let specific = tag
        .and_then(get_element)
        .map(|e| e.attributes)
        .unwrap_or_default();

    let mut items: Vec<MarkupCompletion> = Vec::new();
    for attribute in specific.iter().chain(GLOBAL_ATTRIBUTES) {
        if items.iter().any(|i| i.label == attribute.name) {
            continue;
        }
        items.push(
            MarkupCompletion::new(attribute.name, CompletionItemKind::VALUE)
                .with_documentation(attribute.description)
                .with_edit(
                    span.clone(),
                    format!("{}=\"$1\"", attribute.name),
                    InsertTextFormat::SNIPPET,
                ),
        );
    }
    items
}

/// Whether `text[from..offset]` ends in whitespace. False when the cursor is
/// still inside the token that ends at `from`.
fn whitespace_before(text: &str, from: usize, offset: usize) -> bool {
    text.as_bytes()
        .get(from..offset)
        .and_then(<[u8]>::last)
        .is_some_and(u8::is_ascii_whitespace)
}

/// The close tag for an element whose start tag ends exactly at `offset`.
fn auto_close_tag(doc: &HtmlDocument, offset: usize) -> Option<&str> {
    let element = doc.element_with_start_tag_end(offset)?;
    let already_closed = element.end_tag_start.is_some_and(|s| s <= offset);
    if element.self_closing || element.is_void() || already_closed {
        return None;
    }
    Some(&element.name)
}

impl MarkupEngine for HtmlEngine {
    fn hover(&self, text: &str, offset: usize) -> Option<MarkupHover> {
        let offset = offset.min(text.len());
        let doc = HtmlDocument::parse(text);
        let token = doc.name_token_at(offset)?;
        let name = &text[token.span.clone()];

        let contents = match token.kind {
            TokenKind::StartTag | TokenKind::EndTag => {
                let element = get_element(name)?;
                format!(
                    "{}\n\n[MDN Reference]({})",
                    element.description,
                    element.reference_url()
                )
            }
            TokenKind::AttributeName => {
                let tag = doc.start_tag_name_before(text, token.span.start)?;
                get_attribute(&tag, name)?.description.to_string()
            }
            _ => return None,
        };

        Some(MarkupHover {
            contents,
            span: token.span.clone(),
        })
    }

    fn completions(&self, text: &str, offset: usize) -> Option<Vec<MarkupCompletion>> {
        let offset = offset.min(text.len());
        let doc = HtmlDocument::parse(text);
        let Some(token) = doc.token_before(offset) else {
            return Some(Vec::new());
        };
        let span = token.span.clone();
        let touching = offset <= span.end;

        let items = match token.kind {
            TokenKind::StartTagOpen if touching => {
                tag_name_completions(text, &doc, span.start, offset..offset)
            }
            TokenKind::StartTag if touching => {
                tag_name_completions(text, &doc, span.start - 1, span.start..offset)
            }
            TokenKind::EndTagOpen if touching => end_tag_completions(&doc, span.start, offset..offset),
            TokenKind::EndTag if touching => end_tag_completions(&doc, span.start - 2, span.start..offset),
            TokenKind::AttributeName if touching => {
                let tag = doc.start_tag_name_before(text, span.start);
                attribute_completions(tag.as_deref(), span.start..offset)
            }
            TokenKind::StartTag | TokenKind::AttributeName | TokenKind::AttributeValue
                if whitespace_before(text, span.end, offset) =>
            {
                let tag = doc.start_tag_name_before(text, span.start);
                attribute_completions(tag.as_deref(), offset..offset)
            }
            TokenKind::StartTagClose if offset == span.end => auto_close_tag(&doc, offset)
                .map(|name| {
                    let close = format!("</{}>", name);
                    MarkupCompletion::new(close.clone(), CompletionItemKind::PROPERTY)
                        .with_filter_text(close.clone())
                        .with_edit(offset..offset, format!("$0{}", close), InsertTextFormat::SNIPPET)
                })
                .into_iter()
                .collect(),
            _ => Vec::new(),
        };

        Some(items)
    }

    fn tag_complete(&self, text: &str, offset: usize) -> Option<String> {
        let offset = offset.min(text.len());
        let bytes = text.as_bytes();
        match offset.checked_sub(1).map(|i| bytes[i])? {
            b'>' => {
                let doc = HtmlDocument::parse(text);
                auto_close_tag(&doc, offset).map(|name| format!("$0</{}>", name))
            }
            b'/' if offset >= 2 && bytes[offset - 2] == b'<' => {
                let doc = HtmlDocument::parse(text);
                doc.innermost_open_at(offset - 2)
                    .map(|element| format!("{}>", element.name))
            }
            _ => None,
        }
    }
}
