use crate::model::quote::QuoteStatus;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItemDto {
    #[validate(length(min = 1, max = 500))]
    pub description: String,

    #[validate(range(min = 0.0))]
    pub quantity: f64,

    #[validate(range(min = 0.0))]
    pub rate: f64,

    #[validate(range(min = 0.0))]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    #[validate(length(equal = 24))] // MongoDB ObjectId hex string
    pub client_id: String,

    #[validate(length(min = 2, max = 200))]
    pub title: String,

    pub description: Option<String>,

    #[validate(nested)]
    pub line_items: Vec<LineItemDto>,

    #[validate(range(min = 0.0))]
    pub subtotal: f64,

    #[validate(range(min = 0.0))]
    pub tax: f64,

    #[validate(range(min = 0.0))]
    pub total: f64,

    pub valid_until: Option<String>,
}

/// Partial update; absent fields keep their stored value. The quote number is
/// never editable and never re-allocated on update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuoteRequest {
    #[validate(length(min = 2, max = 200))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(nested)]
    pub line_items: Option<Vec<LineItemDto>>,

    #[validate(range(min = 0.0))]
    pub subtotal: Option<f64>,

    #[validate(range(min = 0.0))]
    pub tax: Option<f64>,

    #[validate(range(min = 0.0))]
    pub total: Option<f64>,

    pub valid_until: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}
