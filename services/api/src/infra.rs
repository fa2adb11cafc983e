use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use order_reviews::reviews::{
    PublishError, RepositoryError, ReviewCreatedEvent, ReviewDocument, ReviewEventPublisher,
    ReviewKind, ReviewRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type ReviewStore = HashMap<(Uuid, ReviewKind), ReviewDocument>;

/// Process-local document store keyed by order id and review type.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewRepository {
    records: Arc<Mutex<ReviewStore>>,
}

impl InMemoryReviewRepository {
    fn lock(&self) -> Result<MutexGuard<'_, ReviewStore>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("review store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn create(&self, record: ReviewDocument) -> Result<ReviewDocument, RepositoryError> {
        let mut guard = self.lock()?;
        let key = (record.order_id, record.review_type);
        if guard.contains_key(&key) {
            debug!(
                order_id = %record.order_id,
                review_type = %record.review_type,
                "duplicate review rejected"
            );
            return Err(RepositoryError::Conflict {
                order_id: record.order_id,
                review_type: record.review_type,
            });
        }

        let stored = ReviewDocument {
            id: Some(Uuid::new_v4().simple().to_string()),
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
        let guard = self.lock()?;
        guard
            .get(&(order_id, review_type))
            .cloned()
            .ok_or(RepositoryError::NotFound {
                order_id,
                review_type,
            })
    }
}

/// Publisher that records creation events in the service log.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TracingEventPublisher;

#[async_trait]
impl ReviewEventPublisher for TracingEventPublisher {
    async fn publish(&self, event: ReviewCreatedEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(&event.payload)
            .map_err(|err| PublishError::Encode(err.to_string()))?;
        info!(
            topic = %event.topic,
            key = %event.key,
            review_type = %event.review_type,
            occurred_at = %event.occurred_at,
            %payload,
            "review event delivered"
        );
        Ok(())
    }
}
