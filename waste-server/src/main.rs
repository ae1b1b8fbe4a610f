use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use waste_server::catalog::Catalog;
use waste_server::config::ServerConfig;
use waste_server::routes;
use waste_server::store::{MemoryStore, import::import_dir};
use waste_server::web::{AppState, create_router};

const DEFAULT_FILTER: &str = "waste_server=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;

    // Configuration problems abort before anything is served
    let catalog = Catalog::builtin()?;
    info!(
        regions = catalog.regions().len(),
        types = catalog.all_types().len(),
        "catalog loaded"
    );

    let table = routes::generate(&catalog)?;
    for route in table.iter() {
        debug!(method = %route.method, route = %route.template(), "registered");
    }
    info!(routes = table.len(), "routes generated");

    let store = MemoryStore::new();
    let summary = import_dir(&store, &catalog, &config.data_dir).await?;
    info!(
        dir = %config.data_dir.display(),
        stations = summary.stations,
        calendar = summary.calendar,
        skipped = summary.skipped,
        "snapshot imported"
    );

    let state = AppState::new(catalog, table, Arc::new(store));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "waste server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
