//! The HTML plugin: a markup engine plus the configuration it runs with.

use tower_lsp::lsp_types::{CompletionList, Hover, Position};

use crate::document::Document;
use crate::html::{HtmlEngine, MarkupEngine};
use crate::lsp;
use crate::settings::PluginConfig;

/// Hover, completion and tag auto-close for the markup parts of a template.
pub struct HtmlPlugin {
    engine: Box<dyn MarkupEngine>,
    config: PluginConfig,
}

impl HtmlPlugin {
    /// A plugin backed by the built-in [`HtmlEngine`].
    pub fn new(config: PluginConfig) -> Self {
        Self::with_engine(Box::new(HtmlEngine::new()), config)
    }

    pub fn with_engine(engine: Box<dyn MarkupEngine>, config: PluginConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn do_hover(&self, document: &Document, position: Position) -> Option<Hover> {
        lsp::hover_at_position(self.engine.as_ref(), document, position, &self.config)
    }

    pub fn get_completions(&self, document: &Document, position: Position) -> Option<CompletionList> {
        lsp::completion_at_position(self.engine.as_ref(), document, position, &self.config)
    }

    pub fn do_tag_complete(&self, document: &Document, position: Position) -> Option<String> {
        lsp::tag_complete_at_position(self.engine.as_ref(), document, position, &self.config)
    }
}

impl Default for HtmlPlugin {
    fn default() -> Self {
        Self::new(PluginConfig::default())
    }
}

impl std::fmt::Debug for HtmlPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlPlugin")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
