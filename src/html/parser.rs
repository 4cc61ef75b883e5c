//! A forgiving HTML tokenizer and element builder.
//!
//! Tolerates whatever half-typed markup the editor holds: unterminated tags,
//! attributes and comments simply end at the end of the text. It has no
//! knowledge of `{...}` expressions; an unquoted value like `{a}` is just an
//! attribute value.

use std::ops::Range;

use super::data::is_void_element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<` opening a start tag.
    StartTagOpen,
    /// Element name in a start tag.
    StartTag,
    AttributeName,
    /// `=` between an attribute name and its value.
    DelimiterAssign,
    /// Attribute value, quotes included.
    AttributeValue,
    /// `>` ending a start tag.
    StartTagClose,
    /// `/>` ending a start tag.
    StartTagSelfClose,
    /// `</` opening an end tag.
    EndTagOpen,
    /// Element name in an end tag.
    EndTag,
    /// `>` ending an end tag.
    EndTagClose,
    /// `<!DOCTYPE ...>` and other `<!` declarations.
    Doctype,
    Comment,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Content,
    AfterOpeningStartTag,
    WithinTag,
    AfterAttributeName,
    BeforeAttributeValue,
    AfterOpeningEndTag,
    WithinEndTag,
}

pub fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'.' | b'_')
}

fn is_attribute_name_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'<' | b'"' | b'\'')
}

fn take_while(bytes: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
    (from..bytes.len())
        .find(|&j| !pred(bytes[j]))
        .unwrap_or(bytes.len())
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

/// Tokenize `text` from the start. Whitespace inside tags produces no tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut state = State::Content;
    let mut i = 0;

    while i < len {
        let start = i;
        let (kind, end) = match state {
            State::Content => {
                if bytes[i..].starts_with(b"<!--") {
                    let end = find(bytes, i + 4, b"-->").map_or(len, |p| p + 3);
                    (TokenKind::Comment, end)
                } else if bytes[i..].starts_with(b"<!") {
                    let end = find(bytes, i, b">").map_or(len, |p| p + 1);
                    (TokenKind::Doctype, end)
                } else if bytes[i..].starts_with(b"</") {
                    state = State::AfterOpeningEndTag;
                    (TokenKind::EndTagOpen, i + 2)
                } else if bytes[i] == b'<' {
                    state = State::AfterOpeningStartTag;
                    (TokenKind::StartTagOpen, i + 1)
                } else {
                    let end = find(bytes, i, b"<").unwrap_or(len);
                    (TokenKind::Content, end)
                }
            }
            State::AfterOpeningStartTag => {
                let end = take_while(bytes, i, is_tag_name_byte);
                if end == i {
                    state = State::Content;
                    continue;
                }
                state = State::WithinTag;
                (TokenKind::StartTag, end)
            }
            State::WithinTag | State::AfterAttributeName | State::BeforeAttributeValue
                if bytes[i].is_ascii_whitespace() =>
            {
                i += 1;
                continue;
            }
            State::WithinTag => {
                if bytes[i..].starts_with(b"/>") {
                    state = State::Content;
                    (TokenKind::StartTagSelfClose, i + 2)
                } else if bytes[i] == b'>' {
                    state = State::Content;
                    (TokenKind::StartTagClose, i + 1)
                } else if bytes[i] == b'<' {
                    // Unterminated start tag; a new tag begins here.
                    state = State::Content;
                    continue;
                } else if is_attribute_name_byte(bytes[i]) {
                    state = State::AfterAttributeName;
                    (TokenKind::AttributeName, take_while(bytes, i, is_attribute_name_byte))
                } else {
                    i += 1;
                    continue;
                }
            }
            State::AfterAttributeName => {
                if bytes[i] == b'=' {
                    state = State::BeforeAttributeValue;
                    (TokenKind::DelimiterAssign, i + 1)
                } else {
                    state = State::WithinTag;
                    continue;
                }
            }
            State::BeforeAttributeValue => {
                state = State::WithinTag;
                match bytes[i] {
                    quote @ (b'"' | b'\'') => {
                        let end = (i + 1..len).find(|&j| bytes[j] == quote).map_or(len, |j| j + 1);
                        (TokenKind::AttributeValue, end)
                    }
                    b'>' => continue,
                    _ => {
                        let end = take_while(bytes, i, |b| !b.is_ascii_whitespace() && b != b'>');
                        (TokenKind::AttributeValue, end)
                    }
                }
            }
            State::AfterOpeningEndTag => {
                state = State::WithinEndTag;
                let end = take_while(bytes, i, is_tag_name_byte);
                if end == i {
                    continue;
                }
                (TokenKind::EndTag, end)
            }
            State::WithinEndTag => match bytes[i] {
                b'>' => {
                    state = State::Content;
                    (TokenKind::EndTagClose, i + 1)
                }
                b'<' => {
                    state = State::Content;
                    continue;
                }
                _ => {
                    i += 1;
                    continue;
                }
            },
        };
        tokens.push(Token {
            kind,
            span: start..end,
        });
        i = end;
    }

    tokens
}

/// An element as seen in the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Offset of the `<` of the start tag.
    pub start: usize,
    /// Offset just past the start tag's `>` or `/>`, if the start tag ended.
    pub start_tag_end: Option<usize>,
    /// Offset of the `</` of the matching end tag.
    pub end_tag_start: Option<usize>,
    /// Where an element without its own end tag was implicitly closed by an
    /// ancestor's end tag.
    pub implicit_end: Option<usize>,
    pub self_closing: bool,
}

impl Element {
    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    /// Whether children may still be added at `offset`.
    fn is_open_at(&self, offset: usize) -> bool {
        if self.self_closing || self.is_void() {
            return false;
        }
        let Some(start_tag_end) = self.start_tag_end else {
            return false;
        };
        let close = self.end_tag_start.or(self.implicit_end);
        start_tag_end <= offset && close.map_or(true, |c| c >= offset)
    }
}

/// Tokens and elements of one text snapshot.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    pub tokens: Vec<Token>,
    pub elements: Vec<Element>,
}

impl HtmlDocument {
    pub fn parse(text: &str) -> Self {
        let tokens = tokenize(text);
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        // Element whose start tag has been opened but not yet ended.
        let mut pending: Option<usize> = None;
        let mut end_tag_open = 0;

        for token in &tokens {
            match token.kind {
                TokenKind::StartTag => {
                    elements.push(Element {
                        name: text[token.span.clone()].to_string(),
                        start: token.span.start - 1,
                        start_tag_end: None,
                        end_tag_start: None,
                        implicit_end: None,
                        self_closing: false,
                    });
                    pending = Some(elements.len() - 1);
                }
                TokenKind::StartTagClose | TokenKind::StartTagSelfClose => {
                    if let Some(idx) = pending.take() {
                        let element = &mut elements[idx];
                        element.start_tag_end = Some(token.span.end);
                        element.self_closing = token.kind == TokenKind::StartTagSelfClose;
                        if !element.self_closing && !element.is_void() {
                            stack.push(idx);
                        }
                    }
                }
                TokenKind::EndTagOpen => {
                    pending = None;
                    end_tag_open = token.span.start;
                }
                TokenKind::EndTag => {
                    let name = &text[token.span.clone()];
                    let found = stack
                        .iter()
                        .rposition(|&idx| elements[idx].name.eq_ignore_ascii_case(name));
                    if let Some(pos) = found {
                        for &idx in &stack[pos + 1..] {
                            elements[idx].implicit_end = Some(end_tag_open);
                        }
                        elements[stack[pos]].end_tag_start = Some(end_tag_open);
                        stack.truncate(pos);
                    }
                }
                TokenKind::StartTagOpen => {
                    // A new tag starting ends any unterminated start tag.
                    pending = None;
                }
                _ => {}
            }
        }

        Self { tokens, elements }
    }

    /// The last token that starts before `offset`.
    pub fn token_before(&self, offset: usize) -> Option<&Token> {
        let idx = self.tokens.partition_point(|t| t.span.start < offset);
        idx.checked_sub(1).map(|i| &self.tokens[i])
    }

    /// The name token (start tag, end tag or attribute) touching `offset`.
    pub fn name_token_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.iter().find(|t| {
            matches!(
                t.kind,
                TokenKind::StartTag | TokenKind::EndTag | TokenKind::AttributeName
            ) && t.span.start <= offset
                && offset <= t.span.end
        })
    }

    /// Name of the start tag that the token at `offset` belongs to.
    pub fn start_tag_name_before(&self, text: &str, offset: usize) -> Option<String> {
        self.tokens
            .iter()
            .take_while(|t| t.span.start <= offset)
            .filter(|t| t.kind == TokenKind::StartTag)
            .last()
            .map(|t| text[t.span.clone()].to_string())
    }

    /// The innermost element that is open (can receive children) at `offset`.
    pub fn innermost_open_at(&self, offset: usize) -> Option<&Element> {
        self.elements
            .iter()
            .filter(|e| e.is_open_at(offset))
            .max_by_key(|e| e.start)
    }

    /// The element whose start tag ends exactly at `offset`.
    pub fn element_with_start_tag_end(&self, offset: usize) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.start_tag_end == Some(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(TokenKind, &str)> {
        tokenize(text)
            .into_iter()
            .map(|t| (t.kind, &text[t.span]))
            .collect()
    }

    #[test]
    fn tokenizes_start_and_end_tags() {
        assert_eq!(
            kinds("<h1>Hello</h1>"),
            vec![
                (TokenKind::StartTagOpen, "<"),
                (TokenKind::StartTag, "h1"),
                (TokenKind::StartTagClose, ">"),
                (TokenKind::Content, "Hello"),
                (TokenKind::EndTagOpen, "</"),
                (TokenKind::EndTag, "h1"),
                (TokenKind::EndTagClose, ">"),
            ]
        );
    }

    #[test]
    fn tokenizes_attributes() {
        assert_eq!(
            kinds("<a href=\"x\" on:click={go} hidden/>"),
            vec![
                (TokenKind::StartTagOpen, "<"),
                (TokenKind::StartTag, "a"),
                (TokenKind::AttributeName, "href"),
                (TokenKind::DelimiterAssign, "="),
                (TokenKind::AttributeValue, "\"x\""),
                (TokenKind::AttributeName, "on:click"),
                (TokenKind::DelimiterAssign, "="),
                (TokenKind::AttributeValue, "{go}"),
                (TokenKind::AttributeName, "hidden"),
                (TokenKind::StartTagSelfClose, "/>"),
            ]
        );
    }

    #[test]
    fn tolerates_unterminated_input() {
        assert_eq!(kinds("<"), vec![(TokenKind::StartTagOpen, "<")]);
        assert_eq!(
            kinds("<div class=\"a"),
            vec![
                (TokenKind::StartTagOpen, "<"),
                (TokenKind::StartTag, "div"),
                (TokenKind::AttributeName, "class"),
                (TokenKind::DelimiterAssign, "="),
                (TokenKind::AttributeValue, "\"a"),
            ]
        );
        assert_eq!(
            kinds("<!-- open"),
            vec![(TokenKind::Comment, "<!-- open")]
        );
    }

    #[test]
    fn doctype_is_not_an_element() {
        let doc = HtmlDocument::parse("<!DOCTYPE html><p>");
        assert_eq!(doc.tokens[0].kind, TokenKind::Doctype);
        assert_eq!(doc.elements.len(), 1);
        assert_eq!(doc.elements[0].name, "p");
    }

    #[test]
    fn matches_end_tags() {
        let text = "<div><p>a</div>";
        let doc = HtmlDocument::parse(text);
        let div = &doc.elements[0];
        let p = &doc.elements[1];
        assert_eq!(div.start_tag_end, Some(5));
        assert_eq!(div.end_tag_start, Some(9));
        assert_eq!(p.end_tag_start, None);
        assert_eq!(p.implicit_end, Some(9));
    }

    #[test]
    fn open_elements() {
        let text = "<div><br><p></p>x";
        let doc = HtmlDocument::parse(text);
        assert_eq!(doc.innermost_open_at(9).unwrap().name, "div");
        assert_eq!(doc.innermost_open_at(12).unwrap().name, "p");
        assert_eq!(doc.innermost_open_at(16).unwrap().name, "div");
        assert!(doc.innermost_open_at(2).is_none());
    }

    #[test]
    fn token_lookup() {
        let text = "<div sty";
        let doc = HtmlDocument::parse(text);
        assert_eq!(doc.token_before(8).unwrap().kind, TokenKind::AttributeName);
        assert_eq!(doc.token_before(1).unwrap().kind, TokenKind::StartTagOpen);
        assert!(doc.token_before(0).is_none());
        assert_eq!(doc.name_token_at(4).unwrap().kind, TokenKind::StartTag);
        assert_eq!(doc.start_tag_name_before(text, 6).as_deref(), Some("div"));
    }
}
