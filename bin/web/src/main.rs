#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use leptos::prelude::*;
    use std::sync::Arc;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    use user_portal_identity::{InMemorySessionStore, SessionStore};
    use user_portal_web::{
        auth::{AppState, OidcClient},
        config::ServerConfig,
        server::{ServerState, app_router},
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    if let Err(e) = config.validate() {
        panic!("invalid configuration: {e}");
    }
    let allowed_origins = config
        .allowed_origins()
        .expect("ALLOWED_ORIGINS must be a comma-separated list of origins");
    tracing::info!(
        domain = %config.auth0.domain(),
        allowed_origins = allowed_origins.len(),
        "Loaded configuration"
    );

    let sessions = Arc::new(InMemorySessionStore::new(config.session.max_sessions));

    // Spawn periodic session cleanup task
    let cleanup_store = sessions.clone();
    let cleanup_interval_secs = config.session.cleanup_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
        loop {
            interval.tick().await;
            match cleanup_store.delete_expired().await {
                Ok(count) if count > 0 => {
                    tracing::debug!(deleted_sessions = count, "Periodic session cleanup");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to cleanup expired sessions");
                }
            }
        }
    });

    // Initialize OIDC client
    tracing::info!("Discovering OIDC provider...");
    let oidc_client = OidcClient::discover(config.auth0)
        .await
        .expect("failed to discover OIDC provider");

    let app_state = Arc::new(AppState::new(
        sessions,
        oidc_client,
        config.session,
        allowed_origins,
    ));

    let conf = get_configuration(None).expect("failed to get leptos configuration");
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    let app = app_router(ServerState {
        leptos_options,
        app_state,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // The browser entry point is `start` in lib.rs.
}
