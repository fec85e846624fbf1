use crate::config::mongo_conf::MongoConfig;
use crate::model::meeting::Meeting;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use tracing::{error, info};

#[async_trait]
pub trait MeetingRepository: Send + Sync {
    async fn create(&self, meeting: Meeting) -> RepositoryResult<Meeting>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Meeting>;
    async fn update(&self, id: ObjectId, meeting: Meeting) -> RepositoryResult<Meeting>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Meeting>>;
    /// Meetings scheduled at or after `after` (RFC 3339 UTC). Timestamps are
    /// normalized on write, so string comparison is chronological.
    async fn count_upcoming(&self, owner: Option<ObjectId>, after: &str) -> RepositoryResult<u64>;
}

pub struct MongoMeetingRepository {
    collection: mongodb::Collection<Meeting>,
}

impl MongoMeetingRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = crate::repository::connect_database(config).await?;
        let collection = db.collection::<Meeting>("meetings");
        Ok(MongoMeetingRepository { collection })
    }

    fn scoped_filter(base: Document, owner: Option<ObjectId>) -> Document {
        let mut filter = base;
        if let Some(id) = owner {
            filter.insert("createdBy", id);
        }
        filter
    }
}

#[async_trait]
impl MeetingRepository for MongoMeetingRepository {
    #[tracing::instrument(skip(self, meeting), fields(title = %meeting.title))]
    async fn create(&self, meeting: Meeting) -> RepositoryResult<Meeting> {
        info!("Creating new meeting");
        let mut new_meeting = meeting;
        new_meeting.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_meeting.created_at = Some(now.clone());
        new_meeting.updated_at = Some(now);

        match self.collection.insert_one(new_meeting.clone(), None).await {
            Ok(_) => {
                info!("Meeting created successfully");
                Ok(new_meeting)
            }
            Err(e) => {
                error!("Failed to create meeting: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Meeting> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(meeting)) => Ok(meeting),
            Ok(None) => Err(RepositoryError::not_found(format!("Meeting not found for ID: {}", id))),
            Err(e) => {
                error!("Failed to fetch meeting by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, meeting), fields(id = %id))]
    async fn update(&self, id: ObjectId, meeting: Meeting) -> RepositoryResult<Meeting> {
        info!("Updating meeting with ID: {}", id);
        let filter = doc! { "_id": id };
        let mut doc = bson::to_document(&meeting)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize meeting: {}", e)))?;
        doc.remove("_id");
        let update = doc! { "$set": doc };
        match self.collection.update_one(filter, update, None).await {
            Ok(update_result) if update_result.matched_count > 0 => Ok(meeting),
            Ok(_) => Err(RepositoryError::not_found(format!("No meeting found to update for ID: {}", id))),
            Err(e) => {
                error!("Failed to update meeting: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting meeting with ID: {}", id);
        let filter = doc! { "_id": id };
        match self.collection.delete_one(filter, None).await {
            Ok(delete_result) if delete_result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!("No meeting found to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete meeting: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Meeting>> {
        // u64 arithmetic: page and limit come straight from the query string
        let skip = (page.max(1) as u64 - 1) * limit as u64;
        let filter = owner.map(|id| doc! { "createdBy": id });
        let mut cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(RepositoryError::from)?;

        let mut meetings = Vec::new();
        while let Some(meeting) = cursor.next().await {
            match meeting {
                Ok(m) => meetings.push(m),
                Err(e) => {
                    error!("Failed to deserialize meeting: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize meeting: {}",
                        e
                    )));
                }
            }
        }
        Ok(meetings.into_iter().skip(skip as usize).take(limit as usize).collect())
    }

    #[tracing::instrument(skip(self), fields(after = %after))]
    async fn count_upcoming(&self, owner: Option<ObjectId>, after: &str) -> RepositoryResult<u64> {
        let filter = Self::scoped_filter(doc! { "scheduledAt": { "$gte": after } }, owner);
        self.collection
            .count_documents(filter, None)
            .await
            .map_err(RepositoryError::from)
    }
}
