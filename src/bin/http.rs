#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use esg_tool::http_api::AppState;
    use esg_tool::{Registry, RegistryStore, SqliteRegistryStore};
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_env("ESG_TOOL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("esg_tool=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let addr: SocketAddr = std::env::var("ESG_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let state = match std::env::var("ESG_TOOL_DB") {
        Ok(path) => {
            let store = SqliteRegistryStore::new(&path)?;
            let registry = store.load_registry()?.unwrap_or_default();
            tracing::info!(db = %path, "workspace loaded");
            AppState::with_store(registry, Arc::new(store))
        }
        Err(_) => AppState::new(Registry::new()),
    };

    tracing::info!("esg-tool HTTP API listening on http://{addr}");
    esg_tool::http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
