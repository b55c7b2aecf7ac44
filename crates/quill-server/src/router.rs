use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use quill_core::BlogService;
use quill_protocol::endpoints;

use crate::handler;

/// Build the axum router with every blog service method.
pub fn build_router(service: BlogService) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::CREATE_AUTHOR, post(handler::create_author))
        .route(endpoints::FETCH_AUTHOR, post(handler::fetch_author))
        .route(endpoints::UPDATE_AUTHOR, post(handler::update_author))
        .route(endpoints::DELETE_AUTHOR, post(handler::delete_author))
        .route(endpoints::ALL_AUTHORS, post(handler::all_authors))
        .route(endpoints::CREATE_BLOG, post(handler::create_blog))
        .route(endpoints::FETCH_BLOG, post(handler::fetch_blog))
        .route(endpoints::UPDATE_BLOG, post(handler::update_blog))
        .route(endpoints::DELETE_BLOG, post(handler::delete_blog))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
