mod common;

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{Datelike, Utc};

use common::{make_client, make_quote, InMemoryClientRepository, InMemoryQuoteRepository};
use praxis_backend::dto::quote_dto::{CreateQuoteRequest, LineItemDto};
use praxis_backend::model::quote::{Quote, QuoteStatus};
use praxis_backend::model::user::{ROLE_ADMIN, ROLE_CONSULTANT};
use praxis_backend::repository::quote_repo::QuoteRepository;
use praxis_backend::repository::repository_error::RepositoryResult;
use praxis_backend::service::quote_service::{QuoteService, QuoteServiceImpl};
use praxis_backend::service::Actor;
use praxis_backend::util::error::ServiceError;

fn consultant(user_id: ObjectId) -> Actor {
    Actor { user_id, role: ROLE_CONSULTANT.to_string() }
}

fn admin() -> Actor {
    Actor { user_id: ObjectId::new(), role: ROLE_ADMIN.to_string() }
}

fn create_request(client_id: &ObjectId) -> CreateQuoteRequest {
    CreateQuoteRequest {
        client_id: client_id.to_hex(),
        title: "Website redesign".to_string(),
        description: Some("Full redesign of the marketing site".to_string()),
        line_items: vec![LineItemDto {
            description: "Design work".to_string(),
            quantity: 10.0,
            rate: 100.0,
            amount: 1000.0,
        }],
        subtotal: 1000.0,
        tax: 200.0,
        total: 1200.0,
        valid_until: None,
    }
}

fn current_prefix() -> String {
    format!("Q{}-", Utc::now().year())
}

fn setup() -> (Arc<InMemoryQuoteRepository>, Arc<InMemoryClientRepository>, QuoteServiceImpl, ObjectId, ObjectId) {
    let quote_repo = Arc::new(InMemoryQuoteRepository::new());
    let client_repo = Arc::new(InMemoryClientRepository::new());

    let owner = ObjectId::new();
    let client = make_client(owner);
    let client_id = client.id.unwrap();
    client_repo.seed(client);

    let service = QuoteServiceImpl::new(quote_repo.clone(), client_repo.clone());
    (quote_repo, client_repo, service, owner, client_id)
}

#[tokio::test]
async fn test_first_quote_of_year_gets_001() {
    let (_, _, service, owner, client_id) = setup();
    let actor = consultant(owner);

    let quote = service.create_quote(&actor, create_request(&client_id)).await.unwrap();
    assert_eq!(quote.quote_number, format!("{}001", current_prefix()));
    assert_eq!(quote.status, QuoteStatus::Draft);
}

#[tokio::test]
async fn test_sequential_creates_get_unique_increasing_numbers() {
    let (_, _, service, owner, client_id) = setup();
    let actor = consultant(owner);

    let mut numbers = Vec::new();
    for _ in 0..5 {
        let quote = service.create_quote(&actor, create_request(&client_id)).await.unwrap();
        assert!(!numbers.contains(&quote.quote_number));
        numbers.push(quote.quote_number);
    }
    assert_eq!(numbers.last().unwrap(), &format!("{}005", current_prefix()));
}

#[tokio::test]
async fn test_pad_grows_past_999() {
    let (quote_repo, _, service, owner, client_id) = setup();
    let actor = consultant(owner);

    let prefix = current_prefix();
    quote_repo.seed(make_quote(&format!("{}999", prefix), 100.0, QuoteStatus::Sent, owner));

    let quote = service.create_quote(&actor, create_request(&client_id)).await.unwrap();
    assert_eq!(quote.quote_number, format!("{}1000", prefix));

    // The next one must not fall back to the lexicographic maximum (999).
    let quote = service.create_quote(&actor, create_request(&client_id)).await.unwrap();
    assert_eq!(quote.quote_number, format!("{}1001", prefix));
}

#[tokio::test]
async fn test_year_rollover_restarts_sequence() {
    let (quote_repo, _, service, owner, client_id) = setup();
    let actor = consultant(owner);

    let last_year = Utc::now().year() - 1;
    quote_repo.seed(make_quote(&format!("Q{}-417", last_year), 100.0, QuoteStatus::Accepted, owner));

    let quote = service.create_quote(&actor, create_request(&client_id)).await.unwrap();
    assert_eq!(quote.quote_number, format!("{}001", current_prefix()));
}

#[tokio::test]
async fn test_malformed_persisted_number_fails_allocation() {
    let (quote_repo, _, service, owner, client_id) = setup();
    let actor = consultant(owner);

    quote_repo.seed(make_quote(&format!("{}00x", current_prefix()), 100.0, QuoteStatus::Draft, owner));

    let result = service.create_quote(&actor, create_request(&client_id)).await;
    assert!(matches!(result, Err(ServiceError::InternalError(_))));
}

#[tokio::test]
async fn test_inconsistent_amounts_are_rejected() {
    let (_, _, service, owner, client_id) = setup();
    let actor = consultant(owner);

    let mut request = create_request(&client_id);
    request.total = 9999.0;
    let result = service.create_quote(&actor, request).await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn test_consultant_cannot_quote_another_consultants_client() {
    let (_, _, service, _, client_id) = setup();
    let intruder = consultant(ObjectId::new());

    let result = service.create_quote(&intruder, create_request(&client_id)).await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));
}

#[tokio::test]
async fn test_admin_can_quote_any_client() {
    let (_, _, service, _, client_id) = setup();

    let quote = service.create_quote(&admin(), create_request(&client_id)).await.unwrap();
    assert_eq!(quote.quote_number, format!("{}001", current_prefix()));
}

#[tokio::test]
async fn test_list_tolerates_extreme_pagination_values() {
    let (_, _, service, owner, client_id) = setup();
    let actor = consultant(owner);
    service.create_quote(&actor, create_request(&client_id)).await.unwrap();

    // Far past the last page: empty result, no arithmetic overflow.
    let quotes = service.list_quotes(&actor, u32::MAX, 20).await.unwrap();
    assert!(quotes.is_empty());

    let quotes = service.list_quotes(&actor, 1, u32::MAX).await.unwrap();
    assert_eq!(quotes.len(), 1);
}

/// Wrapper that serves stale (pre-insert) number listings for a fixed count
/// of reads, so the allocator computes a candidate another create already
/// claimed. Models two requests racing through allocation.
struct StaleReadQuoteRepository {
    inner: Arc<InMemoryQuoteRepository>,
    stale_snapshot: Vec<String>,
    stale_reads_left: Mutex<u32>,
}

impl StaleReadQuoteRepository {
    fn new(inner: Arc<InMemoryQuoteRepository>, stale_snapshot: Vec<String>, stale_reads: u32) -> Self {
        Self { inner, stale_snapshot, stale_reads_left: Mutex::new(stale_reads) }
    }
}

#[async_trait]
impl QuoteRepository for StaleReadQuoteRepository {
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        self.inner.create(quote).await
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        self.inner.get_by_id(id).await
    }

    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote> {
        self.inner.update(id, quote).await
    }

    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote> {
        self.inner.update_status(id, status).await
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        self.inner.delete(id).await
    }

    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Quote>> {
        self.inner.list(owner, page, limit).await
    }

    async fn list_numbers_with_prefix(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        // Guard must not live across the await below.
        {
            let mut left = self.stale_reads_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Ok(self
                    .stale_snapshot
                    .iter()
                    .filter(|n| n.starts_with(prefix))
                    .cloned()
                    .collect());
            }
        }
        self.inner.list_numbers_with_prefix(prefix).await
    }

    async fn count_by_status(&self, status: QuoteStatus, owner: Option<ObjectId>) -> RepositoryResult<u64> {
        self.inner.count_by_status(status, owner).await
    }

    async fn list_by_status(&self, status: QuoteStatus, owner: Option<ObjectId>) -> RepositoryResult<Vec<Quote>> {
        self.inner.list_by_status(status, owner).await
    }
}

#[tokio::test]
async fn test_lost_allocation_race_retries_and_gets_next_number() {
    let inner = Arc::new(InMemoryQuoteRepository::new());
    let client_repo = Arc::new(InMemoryClientRepository::new());

    let owner = ObjectId::new();
    let client = make_client(owner);
    let client_id = client.id.unwrap();
    client_repo.seed(client);

    let prefix = current_prefix();
    // A concurrent create already claimed 001; our first read is stale and
    // does not see it yet.
    inner.seed(make_quote(&format!("{}001", prefix), 100.0, QuoteStatus::Draft, owner));
    let racy = Arc::new(StaleReadQuoteRepository::new(inner.clone(), Vec::new(), 1));

    let service = QuoteServiceImpl::new(racy, client_repo);
    let actor = consultant(owner);

    let quote = service.create_quote(&actor, create_request(&client_id)).await.unwrap();
    assert_eq!(quote.quote_number, format!("{}002", prefix));
    assert_eq!(inner.quotes.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_allocation_gives_up_after_repeated_conflicts() {
    let inner = Arc::new(InMemoryQuoteRepository::new());
    let client_repo = Arc::new(InMemoryClientRepository::new());

    let owner = ObjectId::new();
    let client = make_client(owner);
    let client_id = client.id.unwrap();
    client_repo.seed(client);

    let prefix = current_prefix();
    inner.seed(make_quote(&format!("{}001", prefix), 100.0, QuoteStatus::Draft, owner));
    // Every read is stale, so every attempt recomputes the taken number.
    let racy = Arc::new(StaleReadQuoteRepository::new(inner.clone(), Vec::new(), u32::MAX));

    let service = QuoteServiceImpl::new(racy, client_repo);
    let actor = consultant(owner);

    let result = service.create_quote(&actor, create_request(&client_id)).await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));
    // Nothing beyond the pre-existing quote was inserted.
    assert_eq!(inner.quotes.lock().unwrap().len(), 1);
}
