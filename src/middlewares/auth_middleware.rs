use axum::http::StatusCode;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::warn;

use crate::model::user::ROLE_ADMIN;
use crate::repository::user_repo::UserRepository;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_repo: Arc<dyn UserRepository>,
}

/// Validate the bearer token and confirm the subject still exists. A token
/// can outlive the account it was issued for, so the claims alone are not
/// enough. On success the claims are attached to the request extensions.
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let claims = state
        .jwt_utils
        .validate_access_token(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)?;
    match state.user_repo.find_by_id(&user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("Token presented for a user that no longer exists: {}", claims.sub);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Same as [`require_auth`] but additionally requires the admin role.
pub async fn require_admin(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let claims = state
        .jwt_utils
        .validate_access_token(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    if claims.role != ROLE_ADMIN {
        return Err(StatusCode::FORBIDDEN);
    }

    let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)?;
    match state.user_repo.find_by_id(&user_id).await {
        Ok(Some(user)) if user.role == ROLE_ADMIN => {}
        Ok(Some(_)) | Ok(None) => {
            warn!("Admin token presented for a non-admin or missing user: {}", claims.sub);
            return Err(StatusCode::FORBIDDEN);
        }
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
