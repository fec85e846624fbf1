mod common;

use std::sync::Arc;

use bson::oid::ObjectId;

use common::{make_client, InMemoryClientRepository, InMemoryMeetingRepository};
use praxis_backend::dto::meeting_dto::{CreateMeetingRequest, UpdateMeetingRequest};
use praxis_backend::model::user::ROLE_CONSULTANT;
use praxis_backend::service::meeting_service::{MeetingService, MeetingServiceImpl};
use praxis_backend::service::Actor;
use praxis_backend::util::error::ServiceError;

fn consultant(user_id: ObjectId) -> Actor {
    Actor { user_id, role: ROLE_CONSULTANT.to_string() }
}

fn setup() -> (MeetingServiceImpl, ObjectId, ObjectId) {
    let meeting_repo = Arc::new(InMemoryMeetingRepository::new());
    let client_repo = Arc::new(InMemoryClientRepository::new());

    let owner = ObjectId::new();
    let client = make_client(owner);
    let client_id = client.id.unwrap();
    client_repo.seed(client);

    (MeetingServiceImpl::new(meeting_repo, client_repo), owner, client_id)
}

fn create_request(client_id: &ObjectId, scheduled_at: &str) -> CreateMeetingRequest {
    CreateMeetingRequest {
        client_id: client_id.to_hex(),
        title: "Project kickoff".to_string(),
        scheduled_at: scheduled_at.to_string(),
        location: Some("Office".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn test_create_normalizes_timestamp_to_utc() {
    let (service, owner, client_id) = setup();
    let actor = consultant(owner);

    // Offset timestamp is stored in UTC so string comparisons order correctly.
    let meeting = service
        .create_meeting(&actor, create_request(&client_id, "2026-09-15T10:00:00+02:00"))
        .await
        .unwrap();
    assert_eq!(meeting.scheduled_at, "2026-09-15T08:00:00+00:00");
    assert_eq!(meeting.created_by, owner);
}

#[tokio::test]
async fn test_create_rejects_invalid_timestamp() {
    let (service, owner, client_id) = setup();
    let actor = consultant(owner);

    let result = service
        .create_meeting(&actor, create_request(&client_id, "next tuesday"))
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn test_create_requires_existing_client() {
    let (service, owner, _) = setup();
    let actor = consultant(owner);

    let result = service
        .create_meeting(&actor, create_request(&ObjectId::new(), "2026-09-15T10:00:00Z"))
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_consultant_cannot_schedule_for_foreign_client() {
    let (service, _, client_id) = setup();
    let intruder = consultant(ObjectId::new());

    let result = service
        .create_meeting(&intruder, create_request(&client_id, "2026-09-15T10:00:00Z"))
        .await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));
}

#[tokio::test]
async fn test_update_renormalizes_timestamp_and_guards_owner() {
    let (service, owner, client_id) = setup();
    let actor = consultant(owner);

    let meeting = service
        .create_meeting(&actor, create_request(&client_id, "2026-09-15T10:00:00Z"))
        .await
        .unwrap();

    let update = UpdateMeetingRequest {
        title: None,
        scheduled_at: Some("2026-10-01T09:30:00-05:00".to_string()),
        location: None,
        notes: Some("Bring the revised quote".to_string()),
    };
    let updated = service
        .update_meeting(&actor, meeting.id.unwrap(), update.clone())
        .await
        .unwrap();
    assert_eq!(updated.scheduled_at, "2026-10-01T14:30:00+00:00");
    assert_eq!(updated.notes.as_deref(), Some("Bring the revised quote"));

    let intruder = consultant(ObjectId::new());
    let result = service.update_meeting(&intruder, meeting.id.unwrap(), update).await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));
}
