use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    Extension,
};
use std::sync::Arc;
use validator::Validate;

use crate::dto::client_dto::{CreateClientRequest, UpdateClientRequest};
use crate::dto::Pagination;
use crate::handler::parse_object_id;
use crate::service::client_service::{ClientService, ClientServiceImpl};
use crate::service::Actor;
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

pub async fn create_client_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let actor = Actor::from_claims(&claims)?;
    let res = service.create_client(&actor, payload).await?;
    Ok(Json(res))
}

pub async fn get_client_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    let res = service.get_client(&actor, id).await?;
    Ok(Json(res))
}

pub async fn update_client_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    let res = service.update_client(&actor, id, payload).await?;
    Ok(Json(res))
}

pub async fn delete_client_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    service.delete_client(&actor, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn list_clients_handler(
    State(service): State<Arc<ClientServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let res = service.list_clients(&actor, pagination.page, pagination.limit).await?;
    Ok(Json(res))
}
