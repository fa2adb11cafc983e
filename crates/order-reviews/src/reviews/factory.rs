use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{
    DeliveryAgentReview, RestaurantReview, Review, ReviewFields, ReviewValidationError,
};

/// Discriminator naming the concrete review variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewKind {
    Restaurant,
    DeliveryAgent,
}

impl ReviewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewKind::Restaurant => "restaurant",
            ReviewKind::DeliveryAgent => "deliveryAgent",
        }
    }

    /// Case-sensitive lookup of a review-type token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "restaurant" => Some(ReviewKind::Restaurant),
            "deliveryAgent" => Some(ReviewKind::DeliveryAgent),
            _ => None,
        }
    }

    pub fn factory(self) -> &'static dyn ReviewFactory {
        match self {
            ReviewKind::Restaurant => &RESTAURANT_FACTORY,
            ReviewKind::DeliveryAgent => &DELIVERY_AGENT_FACTORY,
        }
    }
}

impl fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a review-type token is absent or has no registered factory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid review type: {}", .token.as_deref().unwrap_or("null"))]
pub struct InvalidReviewType {
    token: Option<String>,
}

impl InvalidReviewType {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: token.map(str::to_string),
        }
    }

    /// `None` when the request carried no review type at all.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Constructor capability for one review variant.
pub trait ReviewFactory: Send + Sync {
    fn kind(&self) -> ReviewKind;
    fn create(&self, fields: ReviewFields) -> Result<Review, ReviewValidationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RestaurantReviewFactory;

impl ReviewFactory for RestaurantReviewFactory {
    fn kind(&self) -> ReviewKind {
        ReviewKind::Restaurant
    }

    fn create(&self, fields: ReviewFields) -> Result<Review, ReviewValidationError> {
        RestaurantReview::new(fields).map(Review::from)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryAgentReviewFactory;

impl ReviewFactory for DeliveryAgentReviewFactory {
    fn kind(&self) -> ReviewKind {
        ReviewKind::DeliveryAgent
    }

    fn create(&self, fields: ReviewFields) -> Result<Review, ReviewValidationError> {
        DeliveryAgentReview::new(fields).map(Review::from)
    }
}

static RESTAURANT_FACTORY: RestaurantReviewFactory = RestaurantReviewFactory;
static DELIVERY_AGENT_FACTORY: DeliveryAgentReviewFactory = DeliveryAgentReviewFactory;

/// Lookup seam between the service and the registered factories.
pub trait FactoryResolver: Send + Sync {
    fn resolve(&self, review_type: Option<&str>)
        -> Result<&'static dyn ReviewFactory, InvalidReviewType>;
}

/// Process-wide registry of the review factories. Read-only by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewRegistry;

impl FactoryResolver for ReviewRegistry {
    fn resolve(
        &self,
        review_type: Option<&str>,
    ) -> Result<&'static dyn ReviewFactory, InvalidReviewType> {
        review_type
            .and_then(ReviewKind::from_token)
            .map(ReviewKind::factory)
            .ok_or_else(|| InvalidReviewType::new(review_type))
    }
}
