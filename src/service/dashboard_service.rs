use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use crate::dto::dashboard_dto::{DashboardSummary, QuoteStatusCounts};
use crate::model::quote::QuoteStatus;
use crate::repository::client_repo::ClientRepository;
use crate::repository::document_repo::DocumentRepository;
use crate::repository::meeting_repo::MeetingRepository;
use crate::repository::quote_repo::QuoteRepository;
use crate::service::Actor;
use crate::util::error::ServiceError;

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn summary(&self, actor: &Actor) -> Result<DashboardSummary, ServiceError>;
}

pub struct DashboardServiceImpl {
    pub client_repo: Arc<dyn ClientRepository>,
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub meeting_repo: Arc<dyn MeetingRepository>,
    pub document_repo: Arc<dyn DocumentRepository>,
}

impl DashboardServiceImpl {
    pub fn new(
        client_repo: Arc<dyn ClientRepository>,
        quote_repo: Arc<dyn QuoteRepository>,
        meeting_repo: Arc<dyn MeetingRepository>,
        document_repo: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self { client_repo, quote_repo, meeting_repo, document_repo }
    }
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    /// Aggregate counts for the landing page. Every figure is scoped by the
    /// actor: admins aggregate over all records, consultants over their own.
    #[instrument(skip(self, actor))]
    async fn summary(&self, actor: &Actor) -> Result<DashboardSummary, ServiceError> {
        info!("Building dashboard summary");
        let scope = actor.scope();

        let total_clients = self.client_repo.count(scope).await.map_err(ServiceError::from)?;

        let draft = self
            .quote_repo
            .count_by_status(QuoteStatus::Draft, scope)
            .await
            .map_err(ServiceError::from)?;
        let sent = self
            .quote_repo
            .count_by_status(QuoteStatus::Sent, scope)
            .await
            .map_err(ServiceError::from)?;
        let accepted = self
            .quote_repo
            .count_by_status(QuoteStatus::Accepted, scope)
            .await
            .map_err(ServiceError::from)?;
        let rejected = self
            .quote_repo
            .count_by_status(QuoteStatus::Rejected, scope)
            .await
            .map_err(ServiceError::from)?;

        let accepted_total_amount: f64 = self
            .quote_repo
            .list_by_status(QuoteStatus::Accepted, scope)
            .await
            .map_err(ServiceError::from)?
            .iter()
            .map(|q| q.total)
            .sum();

        let now = Utc::now().to_rfc3339();
        let upcoming_meetings = self
            .meeting_repo
            .count_upcoming(scope, &now)
            .await
            .map_err(ServiceError::from)?;

        let total_documents = self.document_repo.count(scope).await.map_err(ServiceError::from)?;

        Ok(DashboardSummary {
            total_clients,
            total_quotes: draft + sent + accepted + rejected,
            quotes_by_status: QuoteStatusCounts { draft, sent, accepted, rejected },
            accepted_total_amount,
            upcoming_meetings,
            total_documents,
        })
    }
}
