use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::domain::{Review, ReviewRequest, ReviewValidationError};
use super::factory::{FactoryResolver, InvalidReviewType, ReviewKind, ReviewRegistry};
use super::repository::{
    RepositoryError, ReviewCreatedEvent, ReviewEventPublisher, ReviewRepository,
};
use super::storage::to_storage;

/// Service composing factory resolution, validation, persistence, and the
/// creation event.
pub struct ReviewService<R> {
    resolver: Arc<dyn FactoryResolver>,
    repository: Arc<R>,
    events: Option<EventDispatch>,
}

struct EventDispatch {
    publisher: Arc<dyn ReviewEventPublisher>,
    topic: String,
}

impl<R> ReviewService<R>
where
    R: ReviewRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_resolver(Arc::new(ReviewRegistry), repository)
    }

    pub fn with_resolver(resolver: Arc<dyn FactoryResolver>, repository: Arc<R>) -> Self {
        Self {
            resolver,
            repository,
            events: None,
        }
    }

    /// Notify `publisher` on `topic` after each stored review.
    pub fn with_events(
        mut self,
        publisher: Arc<dyn ReviewEventPublisher>,
        topic: impl Into<String>,
    ) -> Self {
        self.events = Some(EventDispatch {
            publisher,
            topic: topic.into(),
        });
        self
    }

    /// Validate, construct, and persist a review.
    ///
    /// Nothing is stored unless construction succeeds. Failures from the
    /// registry, the constructors, and the repository are returned as raised.
    pub async fn create_review(
        &self,
        request: ReviewRequest,
    ) -> Result<Review, ReviewServiceError> {
        let (review_type, fields) = request.into_parts();

        let factory = self.resolver.resolve(review_type.as_deref())?;
        debug!(review_type = %factory.kind(), "resolved review factory");

        let review = factory.create(fields)?;

        self.repository.create(to_storage(&review)).await?;
        info!(
            order_id = %review.order_id(),
            review_type = %review.kind(),
            star_rating = review.star_rating(),
            "review created"
        );

        self.dispatch_created(&review);
        Ok(review)
    }

    /// Load a stored review and rebuild it through the matching factory.
    pub async fn find_review(
        &self,
        order_id: Uuid,
        review_type: ReviewKind,
    ) -> Result<Review, ReviewServiceError> {
        let document = self
            .repository
            .find_by_order_and_type(order_id, review_type)
            .await?;
        Ok(document.into_review()?)
    }

    fn dispatch_created(&self, review: &Review) {
        let Some(events) = &self.events else {
            return;
        };

        let event = match ReviewCreatedEvent::new(events.topic.as_str(), review) {
            Ok(event) => event,
            Err(err) => {
                warn!(order_id = %review.order_id(), error = %err, "skipping review event");
                return;
            }
        };

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(order_id = %event.order_id, "no async runtime; review event dropped");
                return;
            }
        };

        let publisher = Arc::clone(&events.publisher);
        handle.spawn(async move {
            let order_id = event.order_id;
            let topic = event.topic.clone();
            if let Err(err) = publisher.publish(event).await {
                warn!(%order_id, %topic, error = %err, "review event publish failed");
            }
        });
    }
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    InvalidReviewType(#[from] InvalidReviewType),
    #[error(transparent)]
    Validation(#[from] ReviewValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Coarse classification callers match on when mapping failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewErrorKind {
    MissingField,
    OutOfRange,
    InvalidReviewType,
    Conflict,
    NotFound,
    Unexpected,
}

impl ReviewServiceError {
    pub fn kind(&self) -> ReviewErrorKind {
        match self {
            Self::InvalidReviewType(_) => ReviewErrorKind::InvalidReviewType,
            Self::Validation(ReviewValidationError::MissingField(_)) => {
                ReviewErrorKind::MissingField
            }
            Self::Validation(ReviewValidationError::OutOfRange { .. }) => {
                ReviewErrorKind::OutOfRange
            }
            Self::Repository(RepositoryError::Conflict { .. }) => ReviewErrorKind::Conflict,
            Self::Repository(RepositoryError::NotFound { .. }) => ReviewErrorKind::NotFound,
            Self::Repository(RepositoryError::Unavailable(_)) => ReviewErrorKind::Unexpected,
        }
    }
}
