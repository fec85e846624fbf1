//! In-memory repository doubles used by the service-level tests. They mirror
//! the Mongo implementations' observable behavior, including the unique
//! quote-number constraint that drives allocation retries.

use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Mutex;

use praxis_backend::model::client::Client;
use praxis_backend::model::document::Document;
use praxis_backend::model::meeting::Meeting;
use praxis_backend::model::quote::{Quote, QuoteStatus};
use praxis_backend::repository::client_repo::ClientRepository;
use praxis_backend::repository::document_repo::DocumentRepository;
use praxis_backend::repository::meeting_repo::MeetingRepository;
use praxis_backend::repository::quote_repo::QuoteRepository;
use praxis_backend::repository::repository_error::{RepositoryError, RepositoryResult};

#[derive(Default)]
pub struct InMemoryQuoteRepository {
    pub quotes: Mutex<Vec<Quote>>,
}

impl InMemoryQuoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, quote: Quote) {
        self.quotes.lock().unwrap().push(quote);
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        let mut quotes = self.quotes.lock().unwrap();
        if quotes.iter().any(|q| q.quote_number == quote.quote_number) {
            return Err(RepositoryError::already_exists(format!(
                "Duplicate key: quoteNumber {}",
                quote.quote_number
            )));
        }
        let mut new_quote = quote;
        new_quote.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_quote.created_at = Some(now.clone());
        new_quote.updated_at = Some(now);
        quotes.push(new_quote.clone());
        Ok(new_quote)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        self.quotes
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Quote not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote> {
        let mut quotes = self.quotes.lock().unwrap();
        let slot = quotes
            .iter_mut()
            .find(|q| q.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found(format!("No quote found to update for ID: {}", id)))?;
        let mut updated = quote;
        updated.id = Some(id);
        *slot = updated.clone();
        Ok(updated)
    }

    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote> {
        let mut quotes = self.quotes.lock().unwrap();
        let slot = quotes
            .iter_mut()
            .find(|q| q.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found(format!("No quote found to update status for ID: {}", id)))?;
        slot.status = status;
        slot.updated_at = Some(chrono::Utc::now().to_rfc3339());
        Ok(slot.clone())
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut quotes = self.quotes.lock().unwrap();
        let before = quotes.len();
        quotes.retain(|q| q.id != Some(id));
        if quotes.len() == before {
            return Err(RepositoryError::not_found(format!("No quote found to delete for ID: {}", id)));
        }
        Ok(())
    }

    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Quote>> {
        let skip = ((page.max(1) as u64 - 1) * limit as u64) as usize;
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| owner.map_or(true, |id| q.created_by == id))
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_numbers_with_prefix(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.quote_number.clone())
            .filter(|n| n.starts_with(prefix))
            .collect())
    }

    async fn count_by_status(&self, status: QuoteStatus, owner: Option<ObjectId>) -> RepositoryResult<u64> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.status == status && owner.map_or(true, |id| q.created_by == id))
            .count() as u64)
    }

    async fn list_by_status(&self, status: QuoteStatus, owner: Option<ObjectId>) -> RepositoryResult<Vec<Quote>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.status == status && owner.map_or(true, |id| q.created_by == id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryClientRepository {
    pub clients: Mutex<Vec<Client>>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, client: Client) {
        self.clients.lock().unwrap().push(client);
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn create(&self, client: Client) -> RepositoryResult<Client> {
        let mut new_client = client;
        new_client.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_client.created_at = Some(now.clone());
        new_client.updated_at = Some(now);
        self.clients.lock().unwrap().push(new_client.clone());
        Ok(new_client)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Client> {
        self.clients
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Client not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, client: Client) -> RepositoryResult<Client> {
        let mut clients = self.clients.lock().unwrap();
        let slot = clients
            .iter_mut()
            .find(|c| c.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found(format!("No client found to update for ID: {}", id)))?;
        let mut updated = client;
        updated.id = Some(id);
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut clients = self.clients.lock().unwrap();
        let before = clients.len();
        clients.retain(|c| c.id != Some(id));
        if clients.len() == before {
            return Err(RepositoryError::not_found(format!("No client found to delete for ID: {}", id)));
        }
        Ok(())
    }

    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Client>> {
        let skip = ((page.max(1) as u64 - 1) * limit as u64) as usize;
        Ok(self
            .clients
            .lock()
            .unwrap()
            .iter()
            .filter(|c| owner.map_or(true, |id| c.owner_id == id))
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, owner: Option<ObjectId>) -> RepositoryResult<u64> {
        Ok(self
            .clients
            .lock()
            .unwrap()
            .iter()
            .filter(|c| owner.map_or(true, |id| c.owner_id == id))
            .count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryMeetingRepository {
    pub meetings: Mutex<Vec<Meeting>>,
}

impl InMemoryMeetingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, meeting: Meeting) {
        self.meetings.lock().unwrap().push(meeting);
    }
}

#[async_trait]
impl MeetingRepository for InMemoryMeetingRepository {
    async fn create(&self, meeting: Meeting) -> RepositoryResult<Meeting> {
        let mut new_meeting = meeting;
        new_meeting.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_meeting.created_at = Some(now.clone());
        new_meeting.updated_at = Some(now);
        self.meetings.lock().unwrap().push(new_meeting.clone());
        Ok(new_meeting)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Meeting> {
        self.meetings
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Meeting not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, meeting: Meeting) -> RepositoryResult<Meeting> {
        let mut meetings = self.meetings.lock().unwrap();
        let slot = meetings
            .iter_mut()
            .find(|m| m.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found(format!("No meeting found to update for ID: {}", id)))?;
        let mut updated = meeting;
        updated.id = Some(id);
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut meetings = self.meetings.lock().unwrap();
        let before = meetings.len();
        meetings.retain(|m| m.id != Some(id));
        if meetings.len() == before {
            return Err(RepositoryError::not_found(format!("No meeting found to delete for ID: {}", id)));
        }
        Ok(())
    }

    async fn list(&self, owner: Option<ObjectId>, page: u32, limit: u32) -> RepositoryResult<Vec<Meeting>> {
        let skip = ((page.max(1) as u64 - 1) * limit as u64) as usize;
        Ok(self
            .meetings
            .lock()
            .unwrap()
            .iter()
            .filter(|m| owner.map_or(true, |id| m.created_by == id))
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_upcoming(&self, owner: Option<ObjectId>, after: &str) -> RepositoryResult<u64> {
        Ok(self
            .meetings
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.scheduled_at.as_str() >= after)
            .filter(|m| owner.map_or(true, |id| m.created_by == id))
            .count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryDocumentRepository {
    pub documents: Mutex<Vec<Document>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, document: Document) {
        self.documents.lock().unwrap().push(document);
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, document: Document) -> RepositoryResult<Document> {
        let mut new_document = document;
        new_document.id = Some(ObjectId::new());
        new_document.created_at = Some(chrono::Utc::now().to_rfc3339());
        self.documents.lock().unwrap().push(new_document.clone());
        Ok(new_document)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Document> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Document not found for ID: {}", id)))
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| d.id != Some(id));
        if documents.len() == before {
            return Err(RepositoryError::not_found(format!("No document found to delete for ID: {}", id)));
        }
        Ok(())
    }

    async fn list_by_client(&self, client_id: ObjectId) -> RepositoryResult<Vec<Document>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn count(&self, owner: Option<ObjectId>) -> RepositoryResult<u64> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| owner.map_or(true, |id| d.uploaded_by == id))
            .count() as u64)
    }
}

pub fn make_client(owner_id: ObjectId) -> Client {
    Client {
        id: Some(ObjectId::new()),
        name: "Acme Corp".to_string(),
        company: Some("Acme".to_string()),
        email: Some("contact@acme.example".to_string()),
        phone: None,
        notes: None,
        owner_id,
        created_at: Some(chrono::Utc::now().to_rfc3339()),
        updated_at: None,
    }
}

pub fn make_quote(number: &str, total: f64, status: QuoteStatus, created_by: ObjectId) -> Quote {
    Quote {
        id: Some(ObjectId::new()),
        client_id: ObjectId::new(),
        quote_number: number.to_string(),
        title: "Quote".to_string(),
        description: None,
        line_items: Vec::new(),
        subtotal: total,
        tax: 0.0,
        total,
        status,
        valid_until: None,
        created_by,
        created_at: Some(chrono::Utc::now().to_rfc3339()),
        updated_at: None,
    }
}
