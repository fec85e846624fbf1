pub mod client_dto;
pub mod quote_dto;
pub mod meeting_dto;
pub mod document_dto;
pub mod dashboard_dto;

use serde::Deserialize;

/// Page/limit query parameters shared by every list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default = "Pagination::default_page")]
    pub page: u32,
    #[serde(default = "Pagination::default_limit")]
    pub limit: u32,
}

impl Pagination {
    fn default_page() -> u32 {
        1
    }

    fn default_limit() -> u32 {
        20
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { page: Self::default_page(), limit: Self::default_limit() }
    }
}
