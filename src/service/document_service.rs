use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::dto::document_dto::{DocumentResponse, UploadedFile};
use crate::model::document::Document;
use crate::repository::client_repo::ClientRepository;
use crate::repository::document_repo::DocumentRepository;
use crate::service::Actor;
use crate::util::error::ServiceError;
use crate::util::minio::MinioService;

#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn upload_documents(
        &self,
        actor: &Actor,
        client_id: ObjectId,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<DocumentResponse>, ServiceError>;
    async fn get_document(&self, actor: &Actor, id: ObjectId) -> Result<DocumentResponse, ServiceError>;
    async fn list_documents(&self, actor: &Actor, client_id: ObjectId) -> Result<Vec<DocumentResponse>, ServiceError>;
    async fn delete_document(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError>;
}

pub struct DocumentServiceImpl {
    pub document_repo: Arc<dyn DocumentRepository>,
    pub client_repo: Arc<dyn ClientRepository>,
    pub minio: Arc<MinioService>,
}

impl DocumentServiceImpl {
    pub fn new(
        document_repo: Arc<dyn DocumentRepository>,
        client_repo: Arc<dyn ClientRepository>,
        minio: Arc<MinioService>,
    ) -> Self {
        Self { document_repo, client_repo, minio }
    }

    /// Build the object path for a new upload. A UUID keeps paths unique even
    /// when the same filename is uploaded twice; the original name only lives
    /// in the metadata record.
    fn object_path(client_id: &ObjectId, filename: &str) -> String {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        format!("documents/{}/{}{}", client_id, Uuid::new_v4(), extension)
    }

    fn to_response(&self, document: Document) -> DocumentResponse {
        let download_url = self.minio.generate_download_link(
            &self.minio.config.links_prefix,
            &self.minio.config.bucket_name,
            &document.file_path,
        );
        DocumentResponse { document, download_url }
    }
}

#[async_trait]
impl DocumentService for DocumentServiceImpl {
    #[instrument(skip(self, actor, files), fields(client_id = %client_id, count = files.len()))]
    async fn upload_documents(
        &self,
        actor: &Actor,
        client_id: ObjectId,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<DocumentResponse>, ServiceError> {
        info!("Uploading documents");

        if files.is_empty() {
            return Err(ServiceError::InvalidInput("No files provided".to_string()));
        }

        let client = self.client_repo.get_by_id(client_id).await.map_err(ServiceError::from)?;
        actor.authorize(&client.owner_id, "client")?;

        let mut responses = Vec::with_capacity(files.len());
        for file in files {
            let file_path = Self::object_path(&client_id, &file.filename);

            self.minio
                .put_object(&file_path, file.content, Some(&file.content_type))
                .await
                .map_err(|e| {
                    error!("Failed to upload object '{}': {e}", file_path);
                    ServiceError::InternalError(format!("Upload failed: {}", e))
                })?;

            let document = Document {
                id: None,
                client_id,
                original_filename: file.filename,
                file_path: file_path.clone(),
                content_type: file.content_type,
                size: file.size,
                uploaded_by: actor.user_id,
                created_at: None,
            };

            let created = match self.document_repo.create(document).await {
                Ok(d) => d,
                Err(e) => {
                    // Avoid stranding the uploaded bytes when the metadata
                    // insert fails.
                    error!("Failed to record document metadata: {e}");
                    if let Err(cleanup) = self.minio.remove_object(&file_path).await {
                        warn!("Failed to clean up object '{}': {cleanup}", file_path);
                    }
                    return Err(ServiceError::from(e));
                }
            };

            responses.push(self.to_response(created));
        }

        info!("Uploaded {} documents", responses.len());
        Ok(responses)
    }

    #[instrument(skip(self, actor), fields(id = %id))]
    async fn get_document(&self, actor: &Actor, id: ObjectId) -> Result<DocumentResponse, ServiceError> {
        let document = self.document_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        // Access follows the owning client, not whoever uploaded the file, so
        // an admin upload stays visible to the client's consultant.
        let client = self.client_repo.get_by_id(document.client_id).await.map_err(ServiceError::from)?;
        actor.authorize(&client.owner_id, "client")?;
        Ok(self.to_response(document))
    }

    #[instrument(skip(self, actor), fields(client_id = %client_id))]
    async fn list_documents(&self, actor: &Actor, client_id: ObjectId) -> Result<Vec<DocumentResponse>, ServiceError> {
        let client = self.client_repo.get_by_id(client_id).await.map_err(ServiceError::from)?;
        actor.authorize(&client.owner_id, "client")?;

        let documents = self
            .document_repo
            .list_by_client(client_id)
            .await
            .map_err(ServiceError::from)?;
        info!("Fetched {} documents", documents.len());
        Ok(documents.into_iter().map(|d| self.to_response(d)).collect())
    }

    #[instrument(skip(self, actor), fields(id = %id))]
    async fn delete_document(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting document");
        let document = self.document_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        let client = self.client_repo.get_by_id(document.client_id).await.map_err(ServiceError::from)?;
        actor.authorize(&client.owner_id, "client")?;

        self.minio.remove_object(&document.file_path).await.map_err(|e| {
            error!("Failed to delete object '{}': {e}", document.file_path);
            ServiceError::InternalError(format!("Delete failed: {}", e))
        })?;

        let res = self.document_repo.delete(id).await;
        match &res {
            Ok(_) => info!("Document deleted successfully"),
            Err(e) => error!("Failed to delete document metadata: {e}"),
        }
        res.map_err(ServiceError::from)
    }
}
