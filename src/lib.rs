//! HTML language server for templates with `{...}` expressions.

use std::sync::{Arc, OnceLock};

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};
use tracing::{debug, info, warn};

mod document;
pub mod html;
pub mod lsp;
mod plugin;
pub mod settings;

pub use document::{boundary, classify, BoundaryContext, Document, DocumentStore, LineIndex};
pub use plugin::HtmlPlugin;
pub use settings::{build_config, discover_settings, load_settings, PluginConfig};

/// Custom request asking for the text that closes the tag just typed.
pub const TAG_COMPLETE_METHOD: &str = "html/tag";

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    plugin: OnceLock<HtmlPlugin>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            plugin: OnceLock::new(),
        }
    }

    fn plugin(&self) -> &HtmlPlugin {
        self.plugin.get_or_init(HtmlPlugin::default)
    }

    fn document(&self, uri: &Url) -> Option<Arc<Document>> {
        let document = self.documents.get(uri);
        if document.is_none() {
            debug!(%uri, "no document found");
        }
        document
    }

    /// Handle the `html/tag` request sent after the user types `>` or `</`.
    pub async fn tag_complete(&self, params: TextDocumentPositionParams) -> Result<Option<String>> {
        let Some(doc) = self.document(&params.text_document.uri) else {
            return Ok(None);
        };
        Ok(self.plugin().do_tag_complete(&doc, params.position))
    }
}

/// Store the configured plugin. Returns false, keeping the existing plugin,
/// when a request already forced the default one.
fn install_plugin(slot: &OnceLock<HtmlPlugin>, plugin: HtmlPlugin) -> bool {
    match slot.set(plugin) {
        Ok(()) => true,
        Err(plugin) => {
            warn!(config = ?plugin.config(), "plugin already initialized, ignoring workspace settings");
            false
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        let config = match workspace_root {
            Some(root) => {
                let (settings, settings_dir) = settings::discover_settings(&root);
                debug!(settings_dir = %settings_dir.display(), "resolved settings");
                settings::build_config(&settings)
            }
            None => PluginConfig::default(),
        };
        install_plugin(&self.plugin, HtmlPlugin::new(config));

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(
                        ["<", "/", ":", " "].iter().map(|c| c.to_string()).collect(),
                    ),
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!(features = ?self.plugin().config().features, "server initialized");
        self.client
            .log_message(MessageType::INFO, "HTML template language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.documents.open(
            params.text_document.uri,
            params.text_document.text,
            params.text_document.version,
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        if let Some(change) = params.content_changes.into_iter().next() {
            self.documents.open(
                params.text_document.uri,
                change.text,
                params.text_document.version,
            );
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.close(&params.text_document.uri);
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(doc) = self.document(uri) else {
            return Ok(None);
        };
        Ok(self.plugin().do_hover(&doc, position))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(doc) = self.document(uri) else {
            return Ok(None);
        };
        let list = self.plugin().get_completions(&doc, position);
        debug!(
            ?position,
            items = list.as_ref().map_or(0, |l| l.items.len()),
            "completion"
        );
        Ok(list.map(CompletionResponse::List))
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::build(Backend::new)
        .custom_method(TAG_COMPLETE_METHOD, Backend::tag_complete)
        .finish()
}
