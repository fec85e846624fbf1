use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tracing::{error, info, instrument};

use crate::dto::meeting_dto::{CreateMeetingRequest, UpdateMeetingRequest};
use crate::model::meeting::Meeting;
use crate::repository::client_repo::ClientRepository;
use crate::repository::meeting_repo::MeetingRepository;
use crate::service::Actor;
use crate::util::error::ServiceError;

#[async_trait]
pub trait MeetingService: Send + Sync {
    async fn create_meeting(&self, actor: &Actor, request: CreateMeetingRequest) -> Result<Meeting, ServiceError>;
    async fn get_meeting(&self, actor: &Actor, id: ObjectId) -> Result<Meeting, ServiceError>;
    async fn update_meeting(&self, actor: &Actor, id: ObjectId, request: UpdateMeetingRequest) -> Result<Meeting, ServiceError>;
    async fn delete_meeting(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_meetings(&self, actor: &Actor, page: u32, limit: u32) -> Result<Vec<Meeting>, ServiceError>;
}

pub struct MeetingServiceImpl {
    pub meeting_repo: Arc<dyn MeetingRepository>,
    pub client_repo: Arc<dyn ClientRepository>,
}

impl MeetingServiceImpl {
    pub fn new(meeting_repo: Arc<dyn MeetingRepository>, client_repo: Arc<dyn ClientRepository>) -> Self {
        Self { meeting_repo, client_repo }
    }

    /// Normalize an RFC 3339 timestamp to UTC so stored values compare
    /// chronologically as strings.
    fn normalize_timestamp(value: &str) -> Result<String, ServiceError> {
        let parsed = DateTime::parse_from_rfc3339(value).map_err(|e| {
            ServiceError::InvalidInput(format!("Invalid RFC 3339 timestamp '{}': {}", value, e))
        })?;
        Ok(parsed.with_timezone(&Utc).to_rfc3339())
    }
}

#[async_trait]
impl MeetingService for MeetingServiceImpl {
    #[instrument(skip(self, actor, request), fields(client_id = %request.client_id, title = %request.title))]
    async fn create_meeting(&self, actor: &Actor, request: CreateMeetingRequest) -> Result<Meeting, ServiceError> {
        info!("Creating new meeting");

        let client_id = ObjectId::parse_str(&request.client_id)
            .map_err(|_| ServiceError::InvalidInput("Invalid client id".to_string()))?;
        let client = self.client_repo.get_by_id(client_id).await.map_err(ServiceError::from)?;
        actor.authorize(&client.owner_id, "client")?;

        let scheduled_at = Self::normalize_timestamp(&request.scheduled_at)?;

        let meeting = Meeting {
            id: None,
            client_id,
            title: request.title,
            scheduled_at,
            location: request.location,
            notes: request.notes,
            created_by: actor.user_id,
            created_at: None,
            updated_at: None,
        };

        let res = self.meeting_repo.create(meeting).await;
        match &res {
            Ok(_) => info!("Meeting created successfully"),
            Err(e) => error!("Failed to create meeting: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, actor), fields(id = %id))]
    async fn get_meeting(&self, actor: &Actor, id: ObjectId) -> Result<Meeting, ServiceError> {
        let meeting = self.meeting_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&meeting.created_by, "meeting")?;
        Ok(meeting)
    }

    #[instrument(skip(self, actor, request), fields(id = %id))]
    async fn update_meeting(&self, actor: &Actor, id: ObjectId, request: UpdateMeetingRequest) -> Result<Meeting, ServiceError> {
        info!("Updating meeting");
        let mut meeting = self.meeting_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&meeting.created_by, "meeting")?;

        if let Some(title) = request.title {
            meeting.title = title;
        }
        if let Some(scheduled_at) = request.scheduled_at {
            meeting.scheduled_at = Self::normalize_timestamp(&scheduled_at)?;
        }
        if let Some(location) = request.location {
            meeting.location = Some(location);
        }
        if let Some(notes) = request.notes {
            meeting.notes = Some(notes);
        }
        meeting.updated_at = Some(Utc::now().to_rfc3339());

        let res = self.meeting_repo.update(id, meeting).await;
        match &res {
            Ok(_) => info!("Meeting updated successfully"),
            Err(e) => error!("Failed to update meeting: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, actor), fields(id = %id))]
    async fn delete_meeting(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting meeting");
        let meeting = self.meeting_repo.get_by_id(id).await.map_err(ServiceError::from)?;
        actor.authorize(&meeting.created_by, "meeting")?;

        let res = self.meeting_repo.delete(id).await;
        match &res {
            Ok(_) => info!("Meeting deleted successfully"),
            Err(e) => error!("Failed to delete meeting: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, actor), fields(page, limit))]
    async fn list_meetings(&self, actor: &Actor, page: u32, limit: u32) -> Result<Vec<Meeting>, ServiceError> {
        let res = self.meeting_repo.list(actor.scope(), page, limit).await;
        match &res {
            Ok(meetings) => info!("Fetched {} meetings", meetings.len()),
            Err(e) => error!("Failed to list meetings: {e}"),
        }
        res.map_err(ServiceError::from)
    }
}
