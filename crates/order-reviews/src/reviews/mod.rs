//! Review intake for orders: validated review variants, the type-keyed
//! factory registry, the storage transcoder, and the orchestration service.

pub mod domain;
pub mod factory;
pub mod repository;
pub mod router;
pub mod service;
pub mod storage;

#[cfg(test)]
mod tests;

pub use domain::{
    DeliveryAgentReview, RestaurantReview, Review, ReviewDetails, ReviewFields, ReviewRequest,
    ReviewValidationError,
};
pub use factory::{
    DeliveryAgentReviewFactory, FactoryResolver, InvalidReviewType, RestaurantReviewFactory,
    ReviewFactory, ReviewKind, ReviewRegistry,
};
pub use repository::{
    PublishError, RepositoryError, ReviewCreatedEvent, ReviewEventPublisher, ReviewRepository,
};
pub use router::review_router;
pub use service::{ReviewErrorKind, ReviewService, ReviewServiceError};
pub use storage::{from_storage, to_storage, ReviewDocument};
