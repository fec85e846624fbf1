use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A client account managed by a consultant. `owner_id` references the
/// consultant (or admin) who created the client and scopes authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub owner_id: ObjectId,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
