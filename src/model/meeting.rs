use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A scheduled meeting with a client. `scheduled_at` is stored as a
/// normalized RFC 3339 UTC timestamp so string comparison is chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub client_id: ObjectId,
    pub title: String,
    pub scheduled_at: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_by: ObjectId,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
