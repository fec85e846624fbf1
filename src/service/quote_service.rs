use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{Datelike, Utc};
use tracing::{error, info, instrument, warn};

use crate::dto::quote_dto::{CreateQuoteRequest, LineItemDto, UpdateQuoteRequest};
use crate::model::quote::{LineItem, Quote, QuoteStatus};
use crate::repository::client_repo::ClientRepository;
use crate::repository::quote_repo::QuoteRepository;
use crate::service::quote_number::{next_quote_number, quote_number_prefix};
use crate::service::Actor;
use crate::util::error::ServiceError;

/// How many times a create retries after losing the allocation race. Each
/// retry re-reads the current maximum, so a loser picks up the winner's
/// number and moves past it.
const ALLOCATION_MAX_ATTEMPTS: u32 = 3;

/// Tolerance for arithmetic checks on monetary amounts (half a cent).
const AMOUNT_EPSILON: f64 = 0.005;

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn create_quote(&self, actor: &Actor, request: CreateQuoteRequest) -> Result<Quote, ServiceError>;
    async fn get_quote(&self, actor: &Actor, id: ObjectId) -> Result<Quote, ServiceError>;
    async fn update_quote(&self, actor: &Actor, id: ObjectId, request: UpdateQuoteRequest) -> Result<Quote, ServiceError>;
    async fn update_quote_status(&self, actor: &Actor, id: ObjectId, status: QuoteStatus) -> Result<Quote, ServiceError>;
    async fn delete_quote(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_quotes(&self, actor: &Actor, page: u32, limit: u32) -> Result<Vec<Quote>, ServiceError>;
}

pub struct QuoteServiceImpl {
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub client_repo: Arc<dyn ClientRepository>,
}

impl QuoteServiceImpl {
    pub fn new(quote_repo: Arc<dyn QuoteRepository>, client_repo: Arc<dyn ClientRepository>) -> Self {
        Self { quote_repo, client_repo }
    }

    /// Allocate the next number for the current year. Reads every number
    /// under the year prefix and computes the numeric successor; the value is
    /// only reserved once the subsequent insert succeeds.
    async fn allocate_number(&self) -> Result<String, ServiceError> {
        let prefix = quote_number_prefix(Utc::now().year());
        let existing = self
            .quote_repo
            .list_numbers_with_prefix(&prefix)
            .await
            .map_err(|e| {
                error!("Failed to read existing quote numbers: {e}");
                ServiceError::from(e)
            })?;
        next_quote_number(&prefix, &existing).map_err(|e| {
            error!("Quote number allocation failed: {e}");
            ServiceError::InternalError(format!("Quote number allocation failed: {}", e))
        })
    }

    fn build_line_items(items: &[LineItemDto]) -> Vec<LineItem> {
        items
            .iter()
            .map(|item| LineItem {
                description: item.description.clone(),
                quantity: item.quantity,
                rate: item.rate,
                amount: item.amount,
            })
            .collect()
    }

    /// Arithmetic consistency checks: each line's amount is quantity × rate
    /// and the total is subtotal + tax.
    fn validate_amounts(line_items: &[LineItem], subtotal: f64, tax: f64, total: f64) -> Result<(), ServiceError> {
        for item in line_items {
            if (item.quantity * item.rate - item.amount).abs() > AMOUNT_EPSILON {
                return Err(ServiceError::InvalidInput(format!(
                    "Line item '{}' amount {} does not equal quantity {} x rate {}",
                    item.description, item.amount, item.quantity, item.rate
                )));
            }
        }
        if (subtotal + tax - total).abs() > AMOUNT_EPSILON {
            return Err(ServiceError::InvalidInput(format!(
                "Total {} does not equal subtotal {} + tax {}",
                total, subtotal, tax
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, actor, request), fields(client_id = %request.client_id, title = %request.title))]
    async fn create_quote(&self, actor: &Actor, request: CreateQuoteRequest) -> Result<Quote, ServiceError> {
        info!("Creating new quote");

        let client_id = ObjectId::parse_str(&request.client_id)
            .map_err(|_| ServiceError::InvalidInput("Invalid client id".to_string()))?;

        let client = self.client_repo.get_by_id(client_id).await.map_err(ServiceError::from)?;
        actor.authorize(&client.owner_id, "client")?;

        let line_items = Self::build_line_items(&request.line_items);
        Self::validate_amounts(&line_items, request.subtotal, request.tax, request.total)?;

        // Allocation and insert are two separate round trips, so a concurrent
        // create can claim the candidate number first. The unique index makes
        // the loser's insert fail with a duplicate-key error; re-reading the
        // maximum and retrying resolves the race.
        let mut attempts = 0;
        loop {
            attempts += 1;
            let quote_number = self.allocate_number().await?;

            let quote = Quote {
                id: None,
                client_id,
                quote_number: quote_number.clone(),
                title: request.title.clone(),
                description: request.description.clone(),
                line_items: line_items.clone(),
                subtotal: request.subtotal,
                tax: request.tax,
                total: request.total,
                status: QuoteStatus::Draft,
                valid_until: request.valid_until.clone(),
                created_by: actor.user_id,
                created_at: None,
                updated_at: None,
            };

            match self.quote_repo.create(quote).await {
                Ok(created) => {
                    info!(quote_number = %created.quote_number, "Quote created successfully");
                    return Ok(created);
                }
                Err(e) if e.is_duplicate_key() && attempts < ALLOCATION_MAX_ATTEMPTS => {
                    warn!(
                        quote_number = %quote_number,
                        attempt = attempts,
                        "Quote number taken by a concurrent create, retrying allocation"
                    );
                }
                Err(e) if e.is_duplicate_key() => {
                    error!("Quote number allocation lost the race {} times, giving up", attempts);
                    return Err(ServiceError::Conflict(format!(
                        "Could not allocate a unique quote number after {} attempts",
                        attempts
                    )));
                }
                Err(e) => {
                    error!("Failed to create quote: {e}");
                    return Err(ServiceError::from(e));
                }
            }
        }
    }

    #[instrument(skip(self, actor), fields(id = %id))]
    async fn get_quote(&self, actor: &Actor, id: ObjectId) -> Result<Quote, ServiceError> {
        let quote = self.quote_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&quote.created_by, "quote")?;
        Ok(quote)
    }

    #[instrument(skip(self, actor, request), fields(id = %id))]
    async fn update_quote(&self, actor: &Actor, id: ObjectId, request: UpdateQuoteRequest) -> Result<Quote, ServiceError> {
        info!("Updating quote");
        let mut quote = self.quote_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&quote.created_by, "quote")?;

        if let Some(title) = request.title {
            quote.title = title;
        }
        if let Some(description) = request.description {
            quote.description = Some(description);
        }
        if let Some(items) = request.line_items {
            quote.line_items = Self::build_line_items(&items);
        }
        if let Some(subtotal) = request.subtotal {
            quote.subtotal = subtotal;
        }
        if let Some(tax) = request.tax {
            quote.tax = tax;
        }
        if let Some(total) = request.total {
            quote.total = total;
        }
        if let Some(valid_until) = request.valid_until {
            quote.valid_until = Some(valid_until);
        }

        Self::validate_amounts(&quote.line_items, quote.subtotal, quote.tax, quote.total)?;
        quote.updated_at = Some(Utc::now().to_rfc3339());

        let res = self.quote_repo.update(id, quote).await;
        match &res {
            Ok(_) => info!("Quote updated successfully"),
            Err(e) => error!("Failed to update quote: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, actor), fields(id = %id, status = %status.as_str()))]
    async fn update_quote_status(&self, actor: &Actor, id: ObjectId, status: QuoteStatus) -> Result<Quote, ServiceError> {
        info!("Updating quote status");
        let quote = self.quote_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&quote.created_by, "quote")?;

        // Status transitions are unguarded: any status may follow any other.
        let res = self.quote_repo.update_status(id, status).await;
        match &res {
            Ok(_) => info!("Quote status updated successfully"),
            Err(e) => error!("Failed to update quote status: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, actor), fields(id = %id))]
    async fn delete_quote(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting quote");
        let quote = self.quote_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&quote.created_by, "quote")?;

        let res = self.quote_repo.delete(id).await;
        match &res {
            Ok(_) => info!("Quote deleted successfully"),
            Err(e) => error!("Failed to delete quote: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, actor), fields(page, limit))]
    async fn list_quotes(&self, actor: &Actor, page: u32, limit: u32) -> Result<Vec<Quote>, ServiceError> {
        let res = self.quote_repo.list(actor.scope(), page, limit).await;
        match &res {
            Ok(quotes) => info!("Fetched {} quotes", quotes.len()),
            Err(e) => error!("Failed to list quotes: {e}"),
        }
        res.map_err(ServiceError::from)
    }
}
