use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::quote_handler::{
    create_quote_handler, delete_quote_handler, get_quote_handler, list_quotes_handler,
    update_quote_handler, update_quote_status_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::quote_service::QuoteServiceImpl;

pub fn quote_router(service: Arc<QuoteServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/quotes", post(create_quote_handler))
        .route("/quotes", get(list_quotes_handler))
        .route("/quotes/{id}", get(get_quote_handler))
        .route("/quotes/{id}", put(update_quote_handler))
        .route("/quotes/{id}", delete(delete_quote_handler))
        .route("/quotes/{id}/status", put(update_quote_status_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
