use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::meeting_handler::{
    create_meeting_handler, delete_meeting_handler, get_meeting_handler, list_meetings_handler,
    update_meeting_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::meeting_service::MeetingServiceImpl;

pub fn meeting_router(service: Arc<MeetingServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/meetings", post(create_meeting_handler))
        .route("/meetings", get(list_meetings_handler))
        .route("/meetings/{id}", get(get_meeting_handler))
        .route("/meetings/{id}", put(update_meeting_handler))
        .route("/meetings/{id}", delete(delete_meeting_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
