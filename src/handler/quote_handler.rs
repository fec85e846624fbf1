use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    Extension,
};
use std::sync::Arc;
use validator::Validate;

use crate::dto::quote_dto::{CreateQuoteRequest, UpdateQuoteRequest, UpdateQuoteStatusRequest};
use crate::dto::Pagination;
use crate::handler::parse_object_id;
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::service::Actor;
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

pub async fn create_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let actor = Actor::from_claims(&claims)?;
    let res = service.create_quote(&actor, payload).await?;
    Ok(Json(res))
}

pub async fn get_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    let res = service.get_quote(&actor, id).await?;
    Ok(Json(res))
}

pub async fn update_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    let res = service.update_quote(&actor, id, payload).await?;
    Ok(Json(res))
}

pub async fn update_quote_status_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuoteStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    let res = service.update_quote_status(&actor, id, payload.status).await?;
    Ok(Json(res))
}

pub async fn delete_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let id = parse_object_id(&id)?;
    service.delete_quote(&actor, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, HandlerError> {
    let actor = Actor::from_claims(&claims)?;
    let res = service.list_quotes(&actor, pagination.page, pagination.limit).await?;
    Ok(Json(res))
}
