use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::user_handler::{create_user_handler, login_handler, me_handler, refresh_token_handler};
use crate::middlewares::auth_middleware::{require_admin, require_auth, AuthState};
use crate::service::user_service::UserServiceImpl;

pub fn user_router(service: Arc<UserServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Public auth routes
    let public = Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/refresh", post(refresh_token_handler));

    // Any authenticated user
    let protected = Router::new()
        .route("/users/me", get(me_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), require_auth));

    // Only admins create consultant accounts
    let admin = Router::new()
        .route("/users", post(create_user_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), require_admin));

    public
        .merge(protected)
        .merge(admin)
        .with_state(service)
}
