pub mod document_symbol;
pub mod hover;
pub mod workspace_symbol;

use std::sync::OnceLock;

use itertools::Itertools;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing_subscriber::{reload, Registry};

use crate::config::{Config, ConstConfig, PositionEncoding};
use crate::dialect::Dialect;
use crate::interop::EncodedSource;
use crate::logging::LspLayer;
use crate::range_parser::{parse_named_ranges, NamedRange};
use crate::workspace::source::Source;
use crate::workspace::{FsResult, Workspace};

pub struct CssNavServer {
    pub client: Client,
    workspace: RwLock<Workspace>,
    const_config: OnceLock<ConstConfig>,
    config: RwLock<Config>,
    pub lsp_tracing_layer_handle: reload::Handle<Option<LspLayer>, Registry>,
}

impl CssNavServer {
    pub fn new(
        client: Client,
        lsp_tracing_layer_handle: reload::Handle<Option<LspLayer>, Registry>,
    ) -> Self {
        return Self {
            client,
            workspace: RwLock::new(Workspace::new()),
            const_config: Default::default(),
            config: Default::default(),
            lsp_tracing_layer_handle,
        };
    }

    /// UTF-16 until the client has negotiated otherwise.
    pub fn position_encoding(&self) -> PositionEncoding {
        self.const_config
            .get()
            .map_or(PositionEncoding::Utf16, |config| config.position_encoding)
    }

    fn parse(&self, source: &Source) -> Vec<NamedRange> {
        parse_named_ranges(&EncodedSource::new(source, self.position_encoding()))
    }

    #[tracing::instrument(skip(self))]
    pub async fn named_ranges(&self, url: &Url) -> FsResult<(Dialect, Vec<NamedRange>)> {
        let workspace = self.workspace.read().await;
        let source = workspace.get_document_ref(url)?;
        Ok((source.dialect, self.parse(source)))
    }

    async fn pull_config(&self) -> anyhow::Result<()> {
        let values = self.client.configuration(Config::get_items()).await?;
        let update = Config::values_to_map(values);
        self.config.write().await.update_by_map(&update)
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for CssNavServer {
    #[tracing::instrument(skip_all)]
    async fn initialize(&self, params: InitializeParams) -> jsonrpc::Result<InitializeResult> {
        self.tracing_init();

        if self.const_config.set(ConstConfig::from(&params)).is_err() {
            tracing::error!("received a second initialize request");
            return Err(jsonrpc::Error::invalid_request());
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                position_encoding: Some(self.position_encoding().into()),
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::INCREMENTAL),
                        ..Default::default()
                    },
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                workspace_symbol_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_owned(),
                version: Some(env!("CARGO_PKG_VERSION").to_owned()),
            }),
        })
    }

    #[tracing::instrument(skip_all)]
    async fn initialized(&self, _: InitializedParams) {
        if let Err(err) = self.pull_config().await {
            tracing::warn!(%err, "could not pull configuration, keeping defaults");
        }
        tracing::info!(encoding = ?self.position_encoding(), "server initialized");
    }

    #[tracing::instrument(skip_all)]
    async fn shutdown(&self) -> jsonrpc::Result<()> {
        self.workspace.write().await.clear();
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(uri = %params.text_document.uri))]
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let url = doc.uri;
        let src = Source::new(url.clone(), doc.language_id, doc.text, doc.version);

        self.workspace.write().await.open(url, src);
    }

    #[tracing::instrument(skip_all, fields(uri = %params.text_document.uri))]
    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.workspace.write().await.close(&params.text_document.uri);
    }

    #[tracing::instrument(skip_all, fields(uri = %params.text_document.uri))]
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        let changes = params.content_changes;

        let mut workspace = self.workspace.write().await;
        if let Err(err) = workspace.edit(&uri, version, changes, self.position_encoding()) {
            tracing::error!(%err, %uri, "could not apply document change");
        }
    }

    #[tracing::instrument(skip_all)]
    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        if let Err(err) = self.config.write().await.update(&params.settings) {
            tracing::error!(%err, "could not update configuration");
        }
    }

    #[tracing::instrument(skip_all, fields(uri = %params.text_document.uri))]
    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> jsonrpc::Result<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        match self.named_ranges(&uri).await {
            Ok((_, ranges)) => Ok(Some(DocumentSymbolResponse::Nested(
                document_symbol::document_symbols(ranges),
            ))),
            Err(err) => {
                tracing::error!(%err, %uri, "could not build document symbols");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(skip_all, fields(query = %params.query))]
    async fn symbol(
        &self,
        params: WorkspaceSymbolParams,
    ) -> jsonrpc::Result<Option<Vec<SymbolInformation>>> {
        if !self.config.read().await.workspace_symbols.is_enabled() {
            return Ok(None);
        }

        let workspace = self.workspace.read().await;
        let symbols = workspace
            .sources()
            .sorted_by(|a, b| a.url.as_str().cmp(b.url.as_str()))
            .flat_map(|source| {
                workspace_symbol::workspace_symbols(&params.query, &source.url, &self.parse(source))
            })
            .collect();
        Ok(Some(symbols))
    }

    #[tracing::instrument(skip_all, fields(uri = %params.text_document_position_params.text_document.uri))]
    async fn hover(&self, params: HoverParams) -> jsonrpc::Result<Option<Hover>> {
        if !self.config.read().await.hover.is_enabled() {
            return Ok(None);
        }

        let TextDocumentPositionParams {
            text_document,
            position,
        } = params.text_document_position_params;
        match self.named_ranges(&text_document.uri).await {
            Ok((dialect, ranges)) => Ok(hover::hover_at(&ranges, position, dialect)),
            Err(err) => {
                tracing::error!(%err, uri = %text_document.uri, "could not compute hover");
                Ok(None)
            }
        }
    }
}
