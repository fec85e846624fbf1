use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::document_handler::{
    delete_document_handler, get_document_handler, list_documents_handler, upload_documents_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::document_service::DocumentServiceImpl;

pub fn document_router(service: Arc<DocumentServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/clients/{id}/documents", post(upload_documents_handler))
        .route("/clients/{id}/documents", get(list_documents_handler))
        .route("/documents/{id}", get(get_document_handler))
        .route("/documents/{id}", delete(delete_document_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
