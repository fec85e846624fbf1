use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    Extension,
};
use std::sync::Arc;
use validator::Validate;

use crate::dto::meeting_dto::{CreateMeetingRequest, UpdateMeetingRequest};
use crate::dto::Pagination;
use crate::handler::parse_object_id;
use crate::service::meeting_service::{MeetingService, MeetingServiceImpl};
use crate::service::Actor;
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

pub async fn create_meeting_handler(
    State(service): State<Arc<MeetingServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateMeetingRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let actor = Actor::from_claims(&claims)?;
    let res = service.create_meeting(&actor, payload).await?;
    Ok(Json(res))
}

pub async fn get_meeting_handler(
    State(service): State<Arc<MeetingServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    let res = service.get_meeting(&actor, id).await?;
    Ok(Json(res))
}

pub async fn update_meeting_handler(
    State(service): State<Arc<MeetingServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMeetingRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    let res = service.update_meeting(&actor, id, payload).await?;
    Ok(Json(res))
}

pub async fn delete_meeting_handler(
    State(service): State<Arc<MeetingServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    service.delete_meeting(&actor, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn list_meetings_handler(
    State(service): State<Arc<MeetingServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let res = service.list_meetings(&actor, pagination.page, pagination.limit).await?;
    Ok(Json(res))
}
