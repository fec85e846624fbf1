pub mod user_handler;
pub mod client_handler;
pub mod quote_handler;
pub mod meeting_handler;
pub mod document_handler;
pub mod dashboard_handler;

use bson::oid::ObjectId;

use crate::util::error::HandlerError;

/// Parse a path segment as an ObjectId, rejecting malformed ids before they
/// reach the service layer.
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(id).map_err(|_| HandlerError::bad_request(format!("Invalid id: {}", id)))
}
