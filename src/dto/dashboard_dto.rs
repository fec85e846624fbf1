use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteStatusCounts {
    pub draft: u64,
    pub sent: u64,
    pub accepted: u64,
    pub rejected: u64,
}

/// Aggregated figures for the dashboard. Admins see global totals;
/// consultants see only their own records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_clients: u64,
    pub total_quotes: u64,
    pub quotes_by_status: QuoteStatusCounts,
    pub accepted_total_amount: f64,
    pub upcoming_meetings: u64,
    pub total_documents: u64,
}
