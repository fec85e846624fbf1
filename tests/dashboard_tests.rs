mod common;

use std::sync::Arc;

use bson::oid::ObjectId;
use chrono::{Duration, Utc};

use common::{
    make_client, make_quote, InMemoryClientRepository, InMemoryDocumentRepository,
    InMemoryMeetingRepository, InMemoryQuoteRepository,
};
use praxis_backend::model::document::Document;
use praxis_backend::model::meeting::Meeting;
use praxis_backend::model::quote::QuoteStatus;
use praxis_backend::model::user::{ROLE_ADMIN, ROLE_CONSULTANT};
use praxis_backend::service::dashboard_service::{DashboardService, DashboardServiceImpl};
use praxis_backend::service::Actor;

fn make_meeting(created_by: ObjectId, scheduled_at: String) -> Meeting {
    Meeting {
        id: Some(ObjectId::new()),
        client_id: ObjectId::new(),
        title: "Kickoff".to_string(),
        scheduled_at,
        location: None,
        notes: None,
        created_by,
        created_at: Some(Utc::now().to_rfc3339()),
        updated_at: None,
    }
}

fn make_document(uploaded_by: ObjectId) -> Document {
    Document {
        id: Some(ObjectId::new()),
        client_id: ObjectId::new(),
        original_filename: "contract.pdf".to_string(),
        file_path: format!("documents/{}/file.pdf", ObjectId::new()),
        content_type: "application/pdf".to_string(),
        size: 1024,
        uploaded_by,
        created_at: Some(Utc::now().to_rfc3339()),
    }
}

struct Fixture {
    service: DashboardServiceImpl,
    alice: ObjectId,
    bob: ObjectId,
}

/// Two consultants with disjoint records. Alice owns 2 clients, 3 quotes
/// (one accepted at 500.0), 1 upcoming and 1 past meeting, and 2 documents.
/// Bob owns 1 client, 1 accepted quote at 250.0, and 1 upcoming meeting.
fn fixture() -> Fixture {
    let client_repo = Arc::new(InMemoryClientRepository::new());
    let quote_repo = Arc::new(InMemoryQuoteRepository::new());
    let meeting_repo = Arc::new(InMemoryMeetingRepository::new());
    let document_repo = Arc::new(InMemoryDocumentRepository::new());

    let alice = ObjectId::new();
    let bob = ObjectId::new();

    client_repo.seed(make_client(alice));
    client_repo.seed(make_client(alice));
    client_repo.seed(make_client(bob));

    quote_repo.seed(make_quote("Q2025-001", 100.0, QuoteStatus::Draft, alice));
    quote_repo.seed(make_quote("Q2025-002", 200.0, QuoteStatus::Sent, alice));
    quote_repo.seed(make_quote("Q2025-003", 500.0, QuoteStatus::Accepted, alice));
    quote_repo.seed(make_quote("Q2025-004", 250.0, QuoteStatus::Accepted, bob));

    let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();
    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
    meeting_repo.seed(make_meeting(alice, tomorrow.clone()));
    meeting_repo.seed(make_meeting(alice, yesterday));
    meeting_repo.seed(make_meeting(bob, tomorrow));

    document_repo.seed(make_document(alice));
    document_repo.seed(make_document(alice));

    let service = DashboardServiceImpl::new(client_repo, quote_repo, meeting_repo, document_repo);
    Fixture { service, alice, bob }
}

#[tokio::test]
async fn test_admin_summary_aggregates_everything() {
    let f = fixture();
    let actor = Actor { user_id: ObjectId::new(), role: ROLE_ADMIN.to_string() };

    let summary = f.service.summary(&actor).await.unwrap();
    assert_eq!(summary.total_clients, 3);
    assert_eq!(summary.total_quotes, 4);
    assert_eq!(summary.quotes_by_status.draft, 1);
    assert_eq!(summary.quotes_by_status.sent, 1);
    assert_eq!(summary.quotes_by_status.accepted, 2);
    assert_eq!(summary.quotes_by_status.rejected, 0);
    assert_eq!(summary.accepted_total_amount, 750.0);
    assert_eq!(summary.upcoming_meetings, 2);
    assert_eq!(summary.total_documents, 2);
}

#[tokio::test]
async fn test_consultant_summary_is_scoped_to_own_records() {
    let f = fixture();
    let actor = Actor { user_id: f.alice, role: ROLE_CONSULTANT.to_string() };

    let summary = f.service.summary(&actor).await.unwrap();
    assert_eq!(summary.total_clients, 2);
    assert_eq!(summary.total_quotes, 3);
    assert_eq!(summary.quotes_by_status.accepted, 1);
    assert_eq!(summary.accepted_total_amount, 500.0);
    assert_eq!(summary.upcoming_meetings, 1);
    assert_eq!(summary.total_documents, 2);
}

#[tokio::test]
async fn test_consultant_with_no_records_sees_zeroes() {
    let f = fixture();
    let stranger = Actor { user_id: ObjectId::new(), role: ROLE_CONSULTANT.to_string() };
    // Bob has records but the stranger must not see them.
    assert_ne!(stranger.user_id, f.bob);

    let summary = f.service.summary(&stranger).await.unwrap();
    assert_eq!(summary.total_clients, 0);
    assert_eq!(summary.total_quotes, 0);
    assert_eq!(summary.accepted_total_amount, 0.0);
    assert_eq!(summary.upcoming_meetings, 0);
    assert_eq!(summary.total_documents, 0);
}
