use cssnav::logging::tracing_init;
use cssnav::services::CssNavServer;
use tower_lsp::{LspService, Server};

#[tokio::main]
async fn main() {
    let lsp_tracing_layer_handle = tracing_init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(move |client| CssNavServer::new(client, lsp_tracing_layer_handle));
    Server::new(stdin, stdout, socket).serve(service).await;
}
