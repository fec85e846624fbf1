use crate::config::mongo_conf::MongoConfig;
use crate::model::client::Client;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use tracing::{error, info};

/// `owner` filters restrict queries to records owned by a single consultant;
/// `None` means the caller (an admin) sees everything.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create(&self, client: Client) -> RepositoryResult<Client>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Client>;
    async fn update(&self, id: ObjectId, client: Client) -> RepositoryResult<Client>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Client>>;
    async fn count(&self, owner: Option<ObjectId>) -> RepositoryResult<u64>;
}

pub struct MongoClientRepository {
    collection: mongodb::Collection<Client>,
}

impl MongoClientRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = crate::repository::connect_database(config).await?;
        let collection = db.collection::<Client>("clients");
        Ok(MongoClientRepository { collection })
    }

    fn owner_filter(owner: Option<ObjectId>) -> Option<Document> {
        owner.map(|id| doc! { "ownerId": id })
    }
}

#[async_trait]
impl ClientRepository for MongoClientRepository {
    #[tracing::instrument(skip(self, client), fields(name = %client.name))]
    async fn create(&self, client: Client) -> RepositoryResult<Client> {
        info!("Creating new client");
        let mut new_client = client;
        new_client.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_client.created_at = Some(now.clone());
        new_client.updated_at = Some(now);

        match self.collection.insert_one(new_client.clone(), None).await {
            Ok(_) => {
                info!("Client created successfully");
                Ok(new_client)
            }
            Err(e) => {
                error!("Failed to create client: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Client> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(client)) => Ok(client),
            Ok(None) => Err(RepositoryError::not_found(format!("Client not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch client by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, client), fields(id = %id))]
    async fn update(&self, id: ObjectId, client: Client) -> RepositoryResult<Client> {
        info!("Updating client with ID: {}", id);
        let filter = doc! { "_id": id };
        let mut doc = bson::to_document(&client)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize client: {}", e)))?;
        doc.remove("_id");
        let update = doc! { "$set": doc };
        match self.collection.update_one(filter, update, None).await {
            Ok(update_result) if update_result.matched_count > 0 => Ok(client),
            Ok(_) => Err(RepositoryError::not_found(format!("No client found to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update client: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting client with ID: {}", id);
        let filter = doc! { "_id": id };
        match self.collection.delete_one(filter, None).await {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No client found to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete client: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Client>> {
        // u64 arithmetic: page and limit come straight from the query string
        let skip = (page.max(1) as u64 - 1) * limit as u64;
        let filter = Self::owner_filter(owner);
        let mut cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(RepositoryError::from)?;

        let mut clients = Vec::new();
        while let Some(client) = cursor.next().await {
            match client {
                Ok(c) => clients.push(c),
                Err(e) => {
                    error!("Failed to deserialize client: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize client: {}",
                        e
                    )));
                }
            }
        }
        Ok(clients.into_iter().skip(skip as usize).take(limit as usize).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self, owner: Option<ObjectId>) -> RepositoryResult<u64> {
        let filter = Self::owner_filter(owner);
        self.collection
            .count_documents(filter, None)
            .await
            .map_err(RepositoryError::from)
    }
}
