pub mod user_router;
pub mod client_router;
pub mod quote_router;
pub mod meeting_router;
pub mod document_router;
pub mod dashboard_router;
