use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::domain::Review;
use super::factory::ReviewKind;
use super::storage::ReviewDocument;

/// Document store holding at most one review per order and review type.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persist a new document, returning it with the store-assigned id.
    async fn create(&self, record: ReviewDocument) -> Result<ReviewDocument, RepositoryError>;

    async fn find_by_order_and_type(
        &self,
        order_id: Uuid,
        review_type: ReviewKind,
    ) -> Result<ReviewDocument, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Review of type {review_type} with OrderId {order_id} already exists in database.")]
    Conflict {
        order_id: Uuid,
        review_type: ReviewKind,
    },
    #[error("Review of type {review_type} with OrderId {order_id} not found in database.")]
    NotFound {
        order_id: Uuid,
        review_type: ReviewKind,
    },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook notified after a review is stored.
#[async_trait]
pub trait ReviewEventPublisher: Send + Sync {
    async fn publish(&self, event: ReviewCreatedEvent) -> Result<(), PublishError>;
}

/// Message emitted once a review has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreatedEvent {
    pub topic: String,
    /// Partitioning key; reviews of the same order share a partition.
    pub key: String,
    pub review_type: ReviewKind,
    pub order_id: Uuid,
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl ReviewCreatedEvent {
    pub fn new(topic: impl Into<String>, review: &Review) -> Result<Self, PublishError> {
        let payload =
            serde_json::to_value(review).map_err(|err| PublishError::Encode(err.to_string()))?;
        Ok(Self {
            topic: topic.into(),
            key: review.order_id().to_string(),
            review_type: review.kind(),
            order_id: review.order_id(),
            payload,
            occurred_at: Utc::now(),
        })
    }
}

/// Event dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("event payload could not be encoded: {0}")]
    Encode(String),
    #[error("event transport unavailable: {0}")]
    Transport(String),
}
