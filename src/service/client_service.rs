use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tracing::{error, info, instrument};

use crate::dto::client_dto::{CreateClientRequest, UpdateClientRequest};
use crate::model::client::Client;
use crate::repository::client_repo::ClientRepository;
use crate::service::Actor;
use crate::util::error::ServiceError;

#[async_trait]
pub trait ClientService: Send + Sync {
    async fn create_client(&self, actor: &Actor, request: CreateClientRequest) -> Result<Client, ServiceError>;
    async fn get_client(&self, actor: &Actor, id: ObjectId) -> Result<Client, ServiceError>;
    async fn update_client(&self, actor: &Actor, id: ObjectId, request: UpdateClientRequest) -> Result<Client, ServiceError>;
    async fn delete_client(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_clients(&self, actor: &Actor, page: u32, limit: u32) -> Result<Vec<Client>, ServiceError>;
}

pub struct ClientServiceImpl {
    pub client_repo: Arc<dyn ClientRepository>,
}

impl ClientServiceImpl {
    pub fn new(client_repo: Arc<dyn ClientRepository>) -> Self {
        Self { client_repo }
    }
}

#[async_trait]
impl ClientService for ClientServiceImpl {
    #[instrument(skip(self, actor, request), fields(name = %request.name))]
    async fn create_client(&self, actor: &Actor, request: CreateClientRequest) -> Result<Client, ServiceError> {
        info!("Creating new client");
        let client = Client {
            id: None,
            name: request.name,
            company: request.company,
            email: request.email,
            phone: request.phone,
            notes: request.notes,
            owner_id: actor.user_id,
            created_at: None,
            updated_at: None,
        };

        let res = self.client_repo.create(client).await;
        match &res {
            Ok(_) => info!("Client created successfully"),
            Err(e) => error!("Failed to create client: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, actor), fields(id = %id))]
    async fn get_client(&self, actor: &Actor, id: ObjectId) -> Result<Client, ServiceError> {
        let client = self.client_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&client.owner_id, "client")?;
        Ok(client)
    }

    #[instrument(skip(self, actor, request), fields(id = %id))]
    async fn update_client(&self, actor: &Actor, id: ObjectId, request: UpdateClientRequest) -> Result<Client, ServiceError> {
        info!("Updating client");
        let mut client = self.client_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&client.owner_id, "client")?;

        if let Some(name) = request.name {
            client.name = name;
        }
        if let Some(company) = request.company {
            client.company = Some(company);
        }
        if let Some(email) = request.email {
            client.email = Some(email);
        }
        if let Some(phone) = request.phone {
            client.phone = Some(phone);
        }
        if let Some(notes) = request.notes {
            client.notes = Some(notes);
        }
        client.updated_at = Some(Utc::now().to_rfc3339());

        let res = self.client_repo.update(id, client).await;
        match &res {
            Ok(_) => info!("Client updated successfully"),
            Err(e) => error!("Failed to update client: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, actor), fields(id = %id))]
    async fn delete_client(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting client");
        let client = self.client_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&client.owner_id, "client")?;

        let res = self.client_repo.delete(id).await;
        match &res {
            Ok(_) => info!("Client deleted successfully"),
            Err(e) => error!("Failed to delete client: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, actor), fields(page, limit))]
    async fn list_clients(&self, actor: &Actor, page: u32, limit: u32) -> Result<Vec<Client>, ServiceError> {
        let res = self.client_repo.list(actor.scope(), page, limit).await;
        match &res {
            Ok(clients) => info!("Fetched {} clients", clients.len()),
            Err(e) => error!("Failed to list clients: {e}"),
        }
        res.map_err(ServiceError::from)
    }
}
