use crate::config::mongo_conf::MongoConfig;
use crate::model::quote::{Quote, QuoteStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use tracing::{error, info};

/// `owner` filters restrict queries to quotes created by a single consultant;
/// `None` means the caller (an admin) sees everything.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Insert a new quote. Fails with `AlreadyExists` when another quote
    /// carries the same quote number (unique index).
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote>;
    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote>;
    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Quote>>;
    /// All quote numbers starting with the given year prefix, used by the
    /// allocator to compute the next sequence value.
    async fn list_numbers_with_prefix(&self, prefix: &str) -> RepositoryResult<Vec<String>>;
    async fn count_by_status(&self, status: QuoteStatus, owner: Option<ObjectId>) -> RepositoryResult<u64>;
    async fn list_by_status(&self, status: QuoteStatus, owner: Option<ObjectId>) -> RepositoryResult<Vec<Quote>>;
}

pub struct MongoQuoteRepository {
    collection: mongodb::Collection<Quote>,
}

impl MongoQuoteRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = crate::repository::connect_database(config).await?;
        let collection = db.collection::<Quote>("quotes");

        // The allocator depends on this index: concurrent allocations of the
        // same candidate number must fail distinguishably on insert.
        let index = IndexModel::builder()
            .keys(doc! { "quoteNumber": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index, None).await?;

        Ok(MongoQuoteRepository { collection })
    }

    fn scoped_filter(base: Document, owner: Option<ObjectId>) -> Document {
        let mut filter = base;
        if let Some(id) = owner {
            filter.insert("createdBy", id);
        }
        filter
    }

    async fn collect(&self, filter: Option<Document>) -> RepositoryResult<Vec<Quote>> {
        let mut cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(RepositoryError::from)?;

        let mut quotes = Vec::new();
        while let Some(quote) = cursor.next().await {
            match quote {
                Ok(q) => quotes.push(q),
                Err(e) => {
                    error!("Failed to deserialize quote: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize quote: {}",
                        e
                    )));
                }
            }
        }
        Ok(quotes)
    }
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    #[tracing::instrument(skip(self, quote), fields(quote_number = %quote.quote_number))]
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        info!("Creating new quote");
        let mut new_quote = quote;
        new_quote.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_quote.created_at = Some(now.clone());
        new_quote.updated_at = Some(now);

        match self.collection.insert_one(new_quote.clone(), None).await {
            Ok(_) => {
                info!("Quote created successfully");
                Ok(new_quote)
            }
            Err(e) => {
                error!("Failed to create quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => Err(RepositoryError::not_found(format!("Quote not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch quote by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, quote), fields(id = %id))]
    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote> {
        info!("Updating quote with ID: {}", id);
        let filter = doc! { "_id": id };
        let mut doc = bson::to_document(&quote)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize quote: {}", e)))?;
        doc.remove("_id");
        let update = doc! { "$set": doc };
        match self.collection.update_one(filter, update, None).await {
            Ok(update_result) if update_result.matched_count > 0 => Ok(quote),
            Ok(_) => Err(RepositoryError::not_found(format!("No quote found to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id, status = %status.as_str()))]
    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote> {
        info!(quote_id = %id, status = %status.as_str(), "Updating quote status");
        let filter = doc! { "_id": id };
        let update = doc! { "$set": {
            "status": status.as_str(),
            "updatedAt": chrono::Utc::now().to_rfc3339(),
        } };
        match self.collection.update_one(filter, update, None).await {
            Ok(update_result) if update_result.matched_count > 0 => {
                let mut updated_quote = self.get_by_id(id).await?;
                updated_quote.status = status;
                Ok(updated_quote)
            }
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No quote found to update status for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update quote status: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting quote with ID: {}", id);
        let filter = doc! { "_id": id };
        match self.collection.delete_one(filter, None).await {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No quote found to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Quote>> {
        // u64 arithmetic: page and limit come straight from the query string
        let skip = (page.max(1) as u64 - 1) * limit as u64;
        let filter = owner.map(|id| doc! { "createdBy": id });
        let quotes = self.collect(filter).await?;
        Ok(quotes.into_iter().skip(skip as usize).take(limit as usize).collect())
    }

    #[tracing::instrument(skip(self), fields(prefix = %prefix))]
    async fn list_numbers_with_prefix(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        // Prefix matching happens in Rust rather than via $regex so the
        // prefix never needs regex escaping.
        let quotes = self.collect(None).await?;
        Ok(quotes
            .into_iter()
            .map(|q| q.quote_number)
            .filter(|n| n.starts_with(prefix))
            .collect())
    }

    #[tracing::instrument(skip(self), fields(status = %status.as_str()))]
    async fn count_by_status(&self, status: QuoteStatus, owner: Option<ObjectId>) -> RepositoryResult<u64> {
        let filter = Self::scoped_filter(doc! { "status": status.as_str() }, owner);
        self.collection
            .count_documents(filter, None)
            .await
            .map_err(RepositoryError::from)
    }

    #[tracing::instrument(skip(self), fields(status = %status.as_str()))]
    async fn list_by_status(&self, status: QuoteStatus, owner: Option<ObjectId>) -> RepositoryResult<Vec<Quote>> {
        let filter = Self::scoped_filter(doc! { "status": status.as_str() }, owner);
        self.collect(Some(filter)).await
    }
}
