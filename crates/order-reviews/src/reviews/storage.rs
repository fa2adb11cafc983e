use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{Review, ReviewFields, ReviewValidationError};
use super::factory::{ReviewFactory, ReviewKind};

/// Flat, discriminator-tagged document persisted by the review store.
///
/// Whichever subject a variant reviews is folded into the generic
/// `id_of_reviewed` / `name_of_reviewed` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub review_type: ReviewKind,
    pub order_id: Uuid,
    pub customer_username: String,
    pub star_rating: i32,
    pub comment: String,
    pub id_of_reviewed: Uuid,
    pub name_of_reviewed: String,
}

impl ReviewDocument {
    /// Rebuild the domain review using the factory registered for `review_type`.
    pub fn into_review(self) -> Result<Review, ReviewValidationError> {
        let factory = self.review_type.factory();
        from_storage(self, factory)
    }
}

pub fn to_storage(review: &Review) -> ReviewDocument {
    ReviewDocument {
        id: None,
        review_type: review.kind(),
        order_id: review.order_id(),
        customer_username: review.customer_username().to_string(),
        star_rating: review.star_rating(),
        comment: review.comment().to_string(),
        id_of_reviewed: review.subject_id(),
        name_of_reviewed: review.subject_name().to_string(),
    }
}

/// Validation is delegated to `factory`, so a corrupted document fails the
/// same way an inbound request would.
pub fn from_storage(
    document: ReviewDocument,
    factory: &dyn ReviewFactory,
) -> Result<Review, ReviewValidationError> {
    factory.create(ReviewFields {
        order_id: document.order_id,
        customer_username: document.customer_username,
        star_rating: Some(document.star_rating),
        comment: Some(document.comment),
        subject_id: document.id_of_reviewed,
        subject_name: document.name_of_reviewed,
    })
}
