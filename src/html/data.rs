//! HTML elements and attributes with documentation.

use std::collections::HashMap;
use std::sync::LazyLock;

const MDN_ELEMENT: &str = "https://developer.mozilla.org/docs/Web/HTML/Element/";

/// Documentation for an HTML element.
#[derive(Debug, Clone)]
pub struct ElementDef {
    pub name: &'static str,
    pub description: &'static str,
    /// Page under the MDN element reference, when it differs from `name`.
    pub reference: Option<&'static str>,
    /// Void elements never have an end tag.
    pub void: bool,
    /// Attributes specific to this element, besides the global ones.
    pub attributes: &'static [AttributeDef],
}

impl ElementDef {
    pub fn reference_url(&self) -> String {
        format!("{}{}", MDN_ELEMENT, self.reference.unwrap_or(self.name))
    }
}

/// Documentation for an HTML attribute.
#[derive(Debug, Clone)]
pub struct AttributeDef {
    pub name: &'static str,
    pub description: &'static str,
}

const fn element(name: &'static str, description: &'static str) -> ElementDef {
    ElementDef {
        name,
        description,
        reference: None,
        void: false,
        attributes: &[],
    }
}

const fn attr(name: &'static str, description: &'static str) -> AttributeDef {
    AttributeDef { name, description }
}

const HEADING: &str = "Heading_Elements";

/// Known elements in completion order.
pub static ELEMENTS: &[ElementDef] = &[
    // ==================== Document structure ====================
    element("html", "The html element represents the root of an HTML document."),
    element("head", "The head element represents a collection of metadata for the Document."),
    element("title", "The title element represents the document's title or name. Authors should use titles that identify their documents even when they are used out of context."),
    ElementDef {
        attributes: &[
            attr("href", "The base URL to be used throughout the document for relative URLs."),
            attr("target", "A keyword or author-defined name of the default browsing context."),
        ],
        void: true,
        ..element("base", "The base element allows authors to specify the document base URL for the purposes of resolving relative URLs, and the name of the default browsing context for the purposes of following hyperlinks.")
    },
    ElementDef {
        attributes: &[
            attr("href", "The URL of the linked resource."),
            attr("rel", "The relationship of the linked document to the current document."),
            attr("type", "The MIME type of the linked content."),
            attr("media", "The media that the linked resource applies to."),
        ],
        void: true,
        ..element("link", "The link element allows authors to link their document to other resources.")
    },
    ElementDef {
        attributes: &[
            attr("name", "The name of a piece of document-level metadata."),
            attr("content", "The value of the metadata named by `name` or `http-equiv`."),
            attr("charset", "The character encoding used by the page."),
            attr("http-equiv", "A pragma directive."),
        ],
        void: true,
        ..element("meta", "The meta element represents various kinds of metadata that cannot be expressed using the title, base, link, style, and script elements.")
    },
    ElementDef {
        attributes: &[
            attr("media", "The media that the styles apply to."),
            attr("lang", "The language the block is written in, resolved by a preprocessor."),
        ],
        ..element("style", "The style element allows authors to embed style information in their documents.")
    },
    ElementDef {
        attributes: &[
            attr("src", "The URL of an external script."),
            attr("type", "The type of script represented."),
            attr("async", "Fetch the script in parallel and evaluate it as soon as it is available."),
            attr("defer", "Execute the script after the document has been parsed."),
            attr("context", "Set to `module` to run the script once per module instead of once per component instance."),
            attr("lang", "The language the block is written in, resolved by a preprocessor."),
        ],
        ..element("script", "The script element allows authors to include dynamic script and data blocks in their documents. The element does not represent content for the user.")
    },
    element("noscript", "The noscript element represents nothing if scripting is enabled, and represents its children if scripting is disabled."),
    ElementDef {
        attributes: &[attr("lang", "The language the markup is written in, resolved by a preprocessor.")],
        ..element("template", "The template element is used to declare fragments of HTML that can be cloned and inserted in the document by script.")
    },
    element("body", "The body element represents the content of the document."),
    // ==================== Sections ====================
    element("article", "The article element represents a complete, or self-contained, composition in a document, page, application, or site that is, in principle, independently distributable or reusable."),
    element("section", "The section element represents a generic section of a document or application."),
    element("nav", "The nav element represents a section of a page that links to other pages or to parts within the page."),
    element("aside", "The aside element represents a section of a page that consists of content that is tangentially related to the content around it."),
    ElementDef { reference: Some(HEADING), ..element("h1", "The h1 element represents a section heading.") },
    ElementDef { reference: Some(HEADING), ..element("h2", "The h2 element represents a section heading.") },
    ElementDef { reference: Some(HEADING), ..element("h3", "The h3 element represents a section heading.") },
    ElementDef { reference: Some(HEADING), ..element("h4", "The h4 element represents a section heading.") },
    ElementDef { reference: Some(HEADING), ..element("h5", "The h5 element represents a section heading.") },
    ElementDef { reference: Some(HEADING), ..element("h6", "The h6 element represents a section heading.") },
    element("header", "The header element represents introductory content for its nearest ancestor sectioning content or sectioning root element."),
    element("footer", "The footer element represents a footer for its nearest ancestor sectioning content or sectioning root element."),
    element("address", "The address element represents the contact information for its nearest article or body element ancestor."),
    element("main", "The main element represents the main content of the body of a document or application."),
    // ==================== Grouping content ====================
    element("p", "The p element represents a paragraph."),
    ElementDef { void: true, ..element("hr", "The hr element represents a paragraph-level thematic break.") },
    element("pre", "The pre element represents a block of preformatted text, in which structure is represented by typographic conventions rather than by elements."),
    ElementDef {
        attributes: &[attr("cite", "A URL for the source of the quotation.")],
        ..element("blockquote", "The blockquote element represents content that is quoted from another source, optionally with a citation.")
    },
    ElementDef {
        attributes: &[
            attr("reversed", "Number the list in descending order."),
            attr("start", "The ordinal value of the first list item."),
            attr("type", "The kind of marker to use in the list."),
        ],
        ..element("ol", "The ol element represents a list of items, where the items have been intentionally ordered.")
    },
    element("ul", "The ul element represents a list of items, where the order of the items is not important."),
    ElementDef {
        attributes: &[attr("value", "The ordinal value of the list item.")],
        ..element("li", "The li element represents a list item.")
    },
    element("dl", "The dl element represents an association list consisting of zero or more name-value groups."),
    element("dt", "The dt element represents the term, or name, part of a term-description group in a description list."),
    element("dd", "The dd element represents the description, definition, or value, part of a term-description group in a description list."),
    element("figure", "The figure element represents some flow content, optionally with a caption, that is self-contained and is typically referenced as a single unit from the main flow of the document."),
    element("figcaption", "The figcaption element represents a caption or legend for the rest of the contents of the figcaption element's parent figure element."),
    element("div", "The div element has no special meaning at all. It represents its children."),
    // ==================== Text-level semantics ====================
    ElementDef {
        attributes: &[
            attr("href", "The URL that the hyperlink points to."),
            attr("target", "Where to display the linked URL."),
            attr("download", "Prompts the user to save the linked URL instead of navigating to it."),
            attr("rel", "The relationship of the linked URL."),
        ],
        ..element("a", "If the a element has an href attribute, then it represents a hyperlink. If it does not, it represents a placeholder for where a link might otherwise have been placed.")
    },
    element("em", "The em element represents stress emphasis of its contents."),
    element("strong", "The strong element represents strong importance, seriousness, or urgency for its contents."),
    element("small", "The small element represents side comments such as small print."),
    element("code", "The code element represents a fragment of computer code."),
    element("span", "The span element doesn't mean anything on its own, but can be useful when used together with the global attributes."),
    ElementDef { void: true, ..element("br", "The br element represents a line break.") },
    // ==================== Embedded content ====================
    ElementDef {
        attributes: &[
            attr("src", "The URL of the image."),
            attr("alt", "A textual replacement for the image."),
            attr("width", "The intrinsic width of the image in pixels."),
            attr("height", "The intrinsic height of the image in pixels."),
            attr("loading", "How the browser should load the image: `eager` or `lazy`."),
        ],
        void: true,
        ..element("img", "An img element represents an image.")
    },
    ElementDef {
        attributes: &[
            attr("src", "The URL of the page to embed."),
            attr("title", "A description of the embedded content."),
        ],
        ..element("iframe", "The iframe element represents a nested browsing context.")
    },
    ElementDef {
        attributes: &[
            attr("src", "The URL of the video to embed."),
            attr("controls", "Offer controls to allow the user to control video playback."),
            attr("autoplay", "Start playing as soon as enough data is available."),
            attr("loop", "Seek back to the start upon reaching the end."),
            attr("muted", "Silence the audio by default."),
        ],
        ..element("video", "A video element is used for playing videos or movies, and audio files with captions.")
    },
    ElementDef {
        attributes: &[
            attr("src", "The URL of the audio to embed."),
            attr("controls", "Offer controls to allow the user to control audio playback."),
            attr("autoplay", "Start playing as soon as enough data is available."),
            attr("loop", "Seek back to the start upon reaching the end."),
        ],
        ..element("audio", "An audio element represents a sound or audio stream.")
    },
    ElementDef {
        attributes: &[
            attr("src", "The URL of the media resource."),
            attr("type", "The MIME type of the media resource."),
        ],
        void: true,
        ..element("source", "The source element allows authors to specify multiple alternative media resources for media elements.")
    },
    ElementDef {
        attributes: &[
            attr("width", "The width of the coordinate space in CSS pixels."),
            attr("height", "The height of the coordinate space in CSS pixels."),
        ],
        ..element("canvas", "The canvas element provides scripts with a resolution-dependent bitmap canvas, which can be used for rendering graphs, game graphics, art, or other visual images on the fly.")
    },
    // ==================== Tabular data ====================
    element("table", "The table element represents data with more than one dimension, in the form of a table."),
    element("caption", "The caption element represents the title of the table that is its parent."),
    element("thead", "The thead element represents the block of rows that consist of the column labels (headers) for the parent table element."),
    element("tbody", "The tbody element represents a block of rows that consist of a body of data for the parent table element."),
    element("tr", "The tr element represents a row of cells in a table."),
    ElementDef {
        attributes: &[
            attr("colspan", "The number of columns the cell spans."),
            attr("rowspan", "The number of rows the cell spans."),
        ],
        ..element("td", "The td element represents a data cell in a table.")
    },
    ElementDef {
        attributes: &[
            attr("colspan", "The number of columns the cell spans."),
            attr("rowspan", "The number of rows the cell spans."),
            attr("scope", "The cells the header cell applies to."),
        ],
        ..element("th", "The th element represents a header cell in a table.")
    },
    // ==================== Forms ====================
    ElementDef {
        attributes: &[
            attr("action", "The URL that processes the form submission."),
            attr("method", "The HTTP method to submit the form with."),
            attr("novalidate", "Do not validate the form when submitted."),
        ],
        ..element("form", "The form element represents a collection of form-associated elements, some of which can represent editable values that can be submitted to a server for processing.")
    },
    ElementDef {
        attributes: &[attr("for", "The id of the labelable form control this label is for.")],
        ..element("label", "The label element represents a caption in a user interface. The caption can be associated with a specific form control.")
    },
    ElementDef {
        attributes: &[
            attr("type", "The kind of control to display."),
            attr("name", "The name of the control, submitted with the form data."),
            attr("value", "The value of the control."),
            attr("placeholder", "A hint shown when the control has no value."),
            attr("disabled", "Whether the control is disabled."),
            attr("checked", "Whether the control is checked."),
            attr("required", "A value is required for the form to be submittable."),
        ],
        void: true,
        ..element("input", "The input element represents a typed data field, usually with a form control to allow the user to edit the data.")
    },
    ElementDef {
        attributes: &[
            attr("type", "The default behavior of the button: `submit`, `reset` or `button`."),
            attr("disabled", "Whether the button is disabled."),
        ],
        ..element("button", "The button element represents a button labeled by its contents.")
    },
    ElementDef {
        attributes: &[
            attr("name", "The name of the control, submitted with the form data."),
            attr("multiple", "Allow more than one option to be selected."),
            attr("disabled", "Whether the control is disabled."),
        ],
        ..element("select", "The select element represents a control for selecting amongst a set of options.")
    },
    ElementDef {
        attributes: &[
            attr("value", "The value submitted with the form when this option is selected."),
            attr("selected", "Whether the option is initially selected."),
        ],
        ..element("option", "The option element represents an option in a select element or as part of a list of suggestions in a datalist element.")
    },
    ElementDef {
        attributes: &[
            attr("rows", "The number of visible text lines."),
            attr("cols", "The visible width of the text control, in average character widths."),
            attr("placeholder", "A hint shown when the control has no value."),
        ],
        ..element("textarea", "The textarea element represents a multiline plain text edit control for the element's raw value.")
    },
    ElementDef {
        attributes: &[attr("name", "The name of the slot.")],
        ..element("slot", "The slot element is a placeholder inside a component that can be filled with markup passed in by its parent.")
    },
];

/// Attributes valid on every element.
pub static GLOBAL_ATTRIBUTES: &[AttributeDef] = &[
    attr("accesskey", "Provides a hint for generating a keyboard shortcut for the current element."),
    attr("class", "A space-separated list of the classes of the element."),
    attr("contenteditable", "Indicates whether the element should be editable by the user."),
    attr("dir", "Indicates the directionality of the element's text: `ltr`, `rtl` or `auto`."),
    attr("draggable", "Indicates whether the element can be dragged."),
    attr("hidden", "Indicates that the element is not yet, or is no longer, relevant."),
    attr("id", "Defines a unique identifier which must be unique in the whole document."),
    attr("lang", "Helps define the language of an element."),
    attr("spellcheck", "Defines whether the element may be checked for spelling errors."),
    attr("style", "Contains CSS styling declarations to be applied to the element."),
    attr("tabindex", "Indicates whether the element can take input focus and in which order."),
    attr("title", "Contains a text representing advisory information related to the element."),
    attr("translate", "Specifies whether the element's contents should be translated when the page is localized."),
];

static ELEMENT_INDEX: LazyLock<HashMap<&'static str, &'static ElementDef>> =
    LazyLock::new(|| ELEMENTS.iter().map(|e| (e.name, e)).collect());

/// Look up an element by tag name, ignoring ASCII case.
///
/// Names starting with an uppercase letter are components, not HTML elements.
pub fn get_element(name: &str) -> Option<&'static ElementDef> {
    if name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }
    ELEMENT_INDEX.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Look up an attribute on `tag`, falling back to the global attributes.
pub fn get_attribute(tag: &str, name: &str) -> Option<&'static AttributeDef> {
    let name = name.to_ascii_lowercase();
    get_element(tag)
        .and_then(|e| e.attributes.iter().find(|a| a.name == name))
        .or_else(|| GLOBAL_ATTRIBUTES.iter().find(|a| a.name == name))
}

pub fn is_void_element(name: &str) -> bool {
    get_element(name).is_some_and(|e| e.void)
}
