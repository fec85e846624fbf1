use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Metadata for an uploaded document. The bytes themselves live in object
/// storage under `file_path`; this record only tracks where they are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub client_id: ObjectId,
    pub original_filename: String,
    pub file_path: String,
    pub content_type: String,
    pub size: usize,
    pub uploaded_by: ObjectId,
    pub created_at: Option<String>,
}
