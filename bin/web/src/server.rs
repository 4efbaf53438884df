//! HTTP host for the single-page application.
//!
//! Every path in the route table is answered with the HTML shell holding the
//! `#app` mount point, so deep links and reloads land in the client router.
//! Other paths get the same shell with a 404 status and the client renders
//! its fallback.

use crate::auth::{self, AppState};
use crate::bootstrap::MOUNT_POINT_ID;
use crate::routes::ROUTE_TABLE;
use axum::{
    Extension, Router,
    extract::{FromRef, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse},
    routing::get,
};
use leptos::prelude::LeptosOptions;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Combined state for the application.
#[derive(Clone)]
pub struct ServerState {
    pub leptos_options: LeptosOptions,
    pub app_state: Arc<AppState>,
}

impl FromRef<ServerState> for LeptosOptions {
    fn from_ref(state: &ServerState) -> Self {
        state.leptos_options.clone()
    }
}

impl FromRef<ServerState> for Arc<AppState> {
    fn from_ref(state: &ServerState) -> Self {
        state.app_state.clone()
    }
}

/// Renders the HTML document the application mounts into.
#[must_use]
pub fn render_shell(options: &LeptosOptions) -> String {
    let pkg = format!("/{}/{}", options.site_pkg_dir, options.output_name);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8"/>
        <meta name="viewport" content="width=device-width, initial-scale=1"/>
        <title>User Portal</title>
        <link rel="stylesheet" href="{pkg}.css"/>
        <link rel="modulepreload" href="{pkg}.js"/>
    </head>
    <body>
        <div id="{MOUNT_POINT_ID}"></div>
        <script type="module">
            import init from '{pkg}.js';
            init({{ module_or_path: '{pkg}.wasm' }});
        </script>
    </body>
</html>
"#
    )
}

async fn serve_shell(State(options): State<LeptosOptions>) -> Html<String> {
    Html(render_shell(&options))
}

async fn not_found(State(options): State<LeptosOptions>) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(render_shell(&options)))
}

/// Builds the application router.
pub fn app_router(state: ServerState) -> Router {
    let pkg_dir = format!(
        "{}/{}",
        state.leptos_options.site_root, state.leptos_options.site_pkg_dir
    );
    let app_state = state.app_state.clone();

    let router = ROUTE_TABLE
        .iter()
        .fold(Router::new(), |router, route| {
            router.route(route.path, get(serve_shell))
        });

    router
        // Auth routes
        .route("/auth/login", get(auth::login))
        .route("/auth/logout", get(auth::logout))
        // Server functions
        .route(
            "/api/{*fn_name}",
            get(leptos_axum::handle_server_fns).post(leptos_axum::handle_server_fns),
        )
        .nest_service("/pkg", ServeDir::new(pkg_dir))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::handle_redirect_callback,
        ))
        // Provide application state as a request extension for server functions
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
