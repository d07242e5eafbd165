use std::sync::Arc;

use portal_gate::config::PortalConfig;
use portal_gate::identity::{EnvIdentity, IdentityProvider};
use portal_gate::profile::hint::HintSlot;
use portal_gate::profile::query::ProfileQuery;
use portal_gate::resolution::controller::RoleResolver;
use portal_gate::routing::routes::{AppState, portal_routes};
use portal_gate::store::{LibSqlStore, ProfileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut config = PortalConfig::default();
    config.apply_overrides(
        std::env::var("PORTAL_PORT").ok(),
        std::env::var("PORTAL_DB_PATH").ok(),
    )?;

    eprintln!("Portal Gate v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/resolution", config.port);
    eprintln!("   DB:  {}", config.db_path);

    let db_path = std::path::Path::new(&config.db_path);
    let store: Arc<dyn ProfileStore> =
        Arc::new(LibSqlStore::new_local(db_path).await.unwrap_or_else(|e| {
            eprintln!("Error: Failed to open database at {}: {}", config.db_path, e);
            std::process::exit(1);
        }));

    let provider: Arc<dyn IdentityProvider> = Arc::new(EnvIdentity::from_env());
    let query = Arc::new(ProfileQuery::new(store));
    let hints = Arc::new(HintSlot::new());
    let resolver = Arc::new(RoleResolver::new(Arc::clone(&query), Arc::clone(&hints)));

    let state = AppState::new(provider, query, resolver, hints);
    let app = portal_routes(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Portal listening");
    axum::serve(listener, app).await?;

    Ok(())
}
