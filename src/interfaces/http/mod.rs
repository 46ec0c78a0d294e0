//! Browser-facing HTTP surface.

pub mod envelope;
pub mod extract;
pub mod handlers;
pub mod views;

use crate::application::checkout::CheckoutService;
use axum::Router;
use axum::handler::Handler;
use axum::routing::{get, post};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use views::Views;

/// State shared by every handler. Read-only; cloning only bumps refcounts.
#[derive(Clone)]
pub struct AppState {
    pub checkout: Arc<CheckoutService>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(checkout: CheckoutService, views: Views) -> Self {
        Self {
            checkout: Arc::new(checkout),
            views: Arc::new(views),
        }
    }
}

/// Builds the application router, serving static assets from `static_dir`
/// under `/public/static`.
///
/// A path that exists but is called with the wrong method is answered like
/// any other unmatched route, and so is a missing static asset.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let assets = ServeDir::new(static_dir.as_ref())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.with_state(state.clone()));

    Router::new()
        .route("/", get(handlers::root).fallback(handlers::not_found))
        .route(
            "/Payment/Card",
            get(handlers::card_page).fallback(handlers::not_found),
        )
        .route(
            "/Payment/3DSecureLookup",
            post(handlers::three_d_secure_lookup).fallback(handlers::not_found),
        )
        .route(
            "/Payment/SecuredCard",
            post(handlers::secured_card).fallback(handlers::not_found),
        )
        .nest_service("/public/static", assets)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
