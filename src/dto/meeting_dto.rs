use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMeetingRequest {
    #[validate(length(equal = 24))] // MongoDB ObjectId hex string
    pub client_id: String,

    #[validate(length(min = 2, max = 200))]
    pub title: String,

    /// RFC 3339 timestamp; parsed and normalized to UTC by the service.
    pub scheduled_at: String,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMeetingRequest {
    #[validate(length(min = 2, max = 200))]
    pub title: Option<String>,

    pub scheduled_at: Option<String>,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
