use crate::config::mongo_conf::MongoConfig;
use crate::model::document::Document;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use tracing::{error, info};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, document: Document) -> RepositoryResult<Document>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Document>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list_by_client(&self, client_id: ObjectId) -> RepositoryResult<Vec<Document>>;
    async fn count(&self, owner: Option<ObjectId>) -> RepositoryResult<u64>;
}

pub struct MongoDocumentRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoDocumentRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = crate::repository::connect_database(config).await?;
        let collection = db.collection::<Document>("documents");
        Ok(MongoDocumentRepository { collection })
    }
}

#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    #[tracing::instrument(skip(self, document), fields(filename = %document.original_filename))]
    async fn create(&self, document: Document) -> RepositoryResult<Document> {
        info!("Creating document metadata");
        let mut new_document = document;
        new_document.id = Some(ObjectId::new());
        new_document.created_at = Some(chrono::Utc::now().to_rfc3339());

        match self.collection.insert_one(new_document.clone(), None).await {
            Ok(_) => Ok(new_document),
            Err(e) => {
                error!("Failed to create document metadata: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Document> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(document)) => Ok(document),
            Ok(None) => Err(RepositoryError::not_found(format!("Document not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch document by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting document metadata with ID: {}", id);
        let filter = doc! { "_id": id };
        match self.collection.delete_one(filter, None).await {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No document found to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete document metadata: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(client_id = %client_id))]
    async fn list_by_client(&self, client_id: ObjectId) -> RepositoryResult<Vec<Document>> {
        let filter = doc! { "clientId": client_id };
        let mut cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(RepositoryError::from)?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.next().await {
            match document {
                Ok(d) => documents.push(d),
                Err(e) => {
                    error!("Failed to deserialize document: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize document: {}",
                        e
                    )));
                }
            }
        }
        Ok(documents)
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self, owner: Option<ObjectId>) -> RepositoryResult<u64> {
        let filter = owner.map(|id| doc! { "uploadedBy": id });
        self.collection
            .count_documents(filter, None)
            .await
            .map_err(RepositoryError::from)
    }
}
