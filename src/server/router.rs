use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use crate::api;

/// Build the complete axum Router with all routes.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::pages::home))
        .route("/versions", get(api::pages::versions))
        .route("/versions/:version", get(api::pages::version))
        .route("/download/:platform", get(api::download::latest))
        .route("/download/:platform/:file", get(api::download::file))
        .route("/update/:platform/:version", get(api::update::check))
        .route("/update/:platform/:version/:file", get(api::update::file))
        .route("/api/semver", get(api::meta::semver))
        .route("/api/latest", get(api::meta::latest))
        .route("/robots.txt", get(api::meta::robots))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
