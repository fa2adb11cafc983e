use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::reviews::domain::{ReviewFields, ReviewRequest};
use crate::reviews::factory::{
    FactoryResolver, InvalidReviewType, ReviewFactory, ReviewKind, ReviewRegistry,
};
use crate::reviews::repository::{
    PublishError, RepositoryError, ReviewCreatedEvent, ReviewEventPublisher, ReviewRepository,
};
use crate::reviews::storage::ReviewDocument;
use crate::reviews::{review_router, ReviewService};

pub(super) fn restaurant_request() -> ReviewRequest {
    ReviewRequest {
        review_type: Some("restaurant".to_string()),
        order_id: Some(Uuid::new_v4()),
        customer_username: Some("alice".to_string()),
        star_rating: Some(5),
        comment: Some("Great!".to_string()),
        subject_id: Some(Uuid::new_v4()),
        subject_name: Some("Mario's".to_string()),
    }
}

pub(super) fn delivery_agent_request() -> ReviewRequest {
    ReviewRequest {
        review_type: Some("deliveryAgent".to_string()),
        order_id: Some(Uuid::new_v4()),
        customer_username: Some("bob".to_string()),
        star_rating: Some(3),
        comment: Some("Arrived a little cold.".to_string()),
        subject_id: Some(Uuid::new_v4()),
        subject_name: Some("Dana".to_string()),
    }
}

pub(super) fn fields() -> ReviewFields {
    ReviewFields {
        order_id: Uuid::new_v4(),
        customer_username: "Test User".to_string(),
        star_rating: Some(1),
        comment: Some("Great service!".to_string()),
        subject_id: Uuid::new_v4(),
        subject_name: "Test Restaurant".to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<(Uuid, ReviewKind), ReviewDocument>>>,
    created: Arc<Mutex<Vec<ReviewDocument>>>,
}

impl MemoryRepository {
    /// Every document passed to `create`, including rejected duplicates.
    pub(super) fn create_calls(&self) -> Vec<ReviewDocument> {
        self.created.lock().expect("repository mutex poisoned").clone()
    }

    pub(super) fn insert_raw(&self, document: ReviewDocument) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert((document.order_id, document.review_type), document);
    }
}

#[async_trait]
impl ReviewRepository for MemoryRepository {
    async fn create(&self, record: ReviewDocument) -> Result<ReviewDocument, RepositoryError> {
        self.created
            .lock()
            .expect("repository mutex poisoned")
            .push(record.clone());

        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let key = (record.order_id, record.review_type);
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict {
                order_id: record.order_id,
                review_type: record.review_type,
            });
        }
        let stored = ReviewDocument {
            id: Some(format!("rev-{:06}", guard.len() + 1)),
            ..record
        };
        guard.insert(key, stored.clone());
        Ok(stored)
    }

    async fn find_by_order_and_type(
        &self,
        order_id: Uuid,
        review_type: ReviewKind,
    ) -> Result<ReviewDocument, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .get(&(order_id, review_type))
            .cloned()
            .ok_or(RepositoryError::NotFound {
                order_id,
                review_type,
            })
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl ReviewRepository for UnavailableRepository {
    async fn create(&self, _record: ReviewDocument) -> Result<ReviewDocument, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_by_order_and_type(
        &self,
        _order_id: Uuid,
        _review_type: ReviewKind,
    ) -> Result<ReviewDocument, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Resolver that records every token it is asked for.
#[derive(Default)]
pub(super) struct CountingResolver {
    calls: Mutex<Vec<Option<String>>>,
}

impl CountingResolver {
    pub(super) fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().expect("resolver mutex poisoned").clone()
    }
}

impl FactoryResolver for CountingResolver {
    fn resolve(
        &self,
        review_type: Option<&str>,
    ) -> Result<&'static dyn ReviewFactory, InvalidReviewType> {
        self.calls
            .lock()
            .expect("resolver mutex poisoned")
            .push(review_type.map(str::to_string));
        ReviewRegistry.resolve(review_type)
    }
}

pub(super) struct ChannelPublisher {
    sender: mpsc::UnboundedSender<ReviewCreatedEvent>,
}

impl ChannelPublisher {
    pub(super) fn new() -> (Self, mpsc::UnboundedReceiver<ReviewCreatedEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ReviewEventPublisher for ChannelPublisher {
    async fn publish(&self, event: ReviewCreatedEvent) -> Result<(), PublishError> {
        self.sender
            .send(event)
            .map_err(|err| PublishError::Transport(err.to_string()))
    }
}

/// Publisher that always fails after signalling the attempt.
pub(super) struct FailingPublisher {
    attempts: mpsc::UnboundedSender<Uuid>,
}

impl FailingPublisher {
    pub(super) fn new() -> (Self, mpsc::UnboundedReceiver<Uuid>) {
        let (attempts, receiver) = mpsc::unbounded_channel();
        (Self { attempts }, receiver)
    }
}

#[async_trait]
impl ReviewEventPublisher for FailingPublisher {
    async fn publish(&self, event: ReviewCreatedEvent) -> Result<(), PublishError> {
        let _ = self.attempts.send(event.order_id);
        Err(PublishError::Transport("broker unreachable".to_string()))
    }
}

pub(super) fn build_service() -> (ReviewService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ReviewService::new(repository.clone());
    (service, repository)
}

pub(super) fn router_with_service(service: ReviewService<MemoryRepository>) -> axum::Router {
    review_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
