use axum::{extract::State, response::IntoResponse, Extension, Json};
use std::sync::Arc;

use crate::service::dashboard_service::{DashboardService, DashboardServiceImpl};
use crate::service::Actor;
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

pub async fn dashboard_summary_handler(
    State(service): State<Arc<DashboardServiceImpl>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let res = service.summary(&actor).await?;
    Ok(Json(res))
}
