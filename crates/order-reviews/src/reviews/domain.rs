use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::factory::ReviewKind;

pub const MAX_STAR_RATING: i32 = 5;
pub const MAX_COMMENT_CHARS: usize = 280;

const STAR_RATING_MESSAGE: &str = "Star rating must be between 0 and 5";
const COMMENT_LENGTH_MESSAGE: &str = "Review cannot be more than 280 characters";

/// Raised when review fields break an invariant during construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} out of range: {message}")]
    OutOfRange {
        field: &'static str,
        message: &'static str,
    },
}

impl ReviewValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) => field,
            Self::OutOfRange { field, .. } => field,
        }
    }
}

/// Raw, unvalidated inputs accepted by every review factory.
///
/// Absent identifiers are carried as the nil UUID and absent strings as empty
/// so that validation reports them as missing fields. An absent rating or
/// comment stays `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFields {
    pub order_id: Uuid,
    pub customer_username: String,
    pub star_rating: Option<i32>,
    pub comment: Option<String>,
    pub subject_id: Uuid,
    pub subject_name: String,
}

/// Fields shared by every review variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetails {
    order_id: Uuid,
    customer_username: String,
    star_rating: i32,
    comment: String,
}

impl ReviewDetails {
    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    pub fn customer_username(&self) -> &str {
        &self.customer_username
    }

    pub fn star_rating(&self) -> i32 {
        self.star_rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// Field names reported for the reviewed subject of a variant.
struct SubjectFieldNames {
    id: &'static str,
    name: &'static str,
}

const RESTAURANT_FIELDS: SubjectFieldNames = SubjectFieldNames {
    id: "RestaurantId",
    name: "RestaurantName",
};

const DELIVERY_AGENT_FIELDS: SubjectFieldNames = SubjectFieldNames {
    id: "DeliveryAgentId",
    name: "DeliveryAgentName",
};

/// Checks run in a fixed order: missing fields first, then ranges.
fn validate(
    fields: ReviewFields,
    names: &SubjectFieldNames,
) -> Result<(ReviewDetails, Uuid, String), ReviewValidationError> {
    let ReviewFields {
        order_id,
        customer_username,
        star_rating,
        comment,
        subject_id,
        subject_name,
    } = fields;

    if order_id.is_nil() {
        return Err(ReviewValidationError::MissingField("OrderId"));
    }
    if customer_username.trim().is_empty() {
        return Err(ReviewValidationError::MissingField("CustomerUsername"));
    }
    let comment = comment.ok_or(ReviewValidationError::MissingField("Comment"))?;
    if subject_id.is_nil() {
        return Err(ReviewValidationError::MissingField(names.id));
    }
    if subject_name.trim().is_empty() {
        return Err(ReviewValidationError::MissingField(names.name));
    }
    let star_rating = star_rating.ok_or(ReviewValidationError::MissingField("StarRating"))?;
    if !(0..=MAX_STAR_RATING).contains(&star_rating) {
        return Err(ReviewValidationError::OutOfRange {
            field: "StarRating",
            message: STAR_RATING_MESSAGE,
        });
    }
    if comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(ReviewValidationError::OutOfRange {
            field: "Comment",
            message: COMMENT_LENGTH_MESSAGE,
        });
    }

    let details = ReviewDetails {
        order_id,
        customer_username,
        star_rating,
        comment,
    };
    Ok((details, subject_id, subject_name))
}

/// Review of the restaurant that prepared an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantReview {
    #[serde(flatten)]
    details: ReviewDetails,
    restaurant_id: Uuid,
    restaurant_name: String,
}

impl RestaurantReview {
    pub fn new(fields: ReviewFields) -> Result<Self, ReviewValidationError> {
        let (details, restaurant_id, restaurant_name) = validate(fields, &RESTAURANT_FIELDS)?;
        Ok(Self {
            details,
            restaurant_id,
            restaurant_name,
        })
    }

    pub fn details(&self) -> &ReviewDetails {
        &self.details
    }

    pub fn restaurant_id(&self) -> Uuid {
        self.restaurant_id
    }

    pub fn restaurant_name(&self) -> &str {
        &self.restaurant_name
    }
}

/// Review of the delivery agent that brought an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAgentReview {
    #[serde(flatten)]
    details: ReviewDetails,
    delivery_agent_id: Uuid,
    delivery_agent_name: String,
}

impl DeliveryAgentReview {
    pub fn new(fields: ReviewFields) -> Result<Self, ReviewValidationError> {
        let (details, delivery_agent_id, delivery_agent_name) =
            validate(fields, &DELIVERY_AGENT_FIELDS)?;
        Ok(Self {
            details,
            delivery_agent_id,
            delivery_agent_name,
        })
    }

    pub fn details(&self) -> &ReviewDetails {
        &self.details
    }

    pub fn delivery_agent_id(&self) -> Uuid {
        self.delivery_agent_id
    }

    pub fn delivery_agent_name(&self) -> &str {
        &self.delivery_agent_name
    }
}

/// A validated review. Instances only come out of the variant constructors,
/// so every value upholds the field invariants for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reviewType")]
pub enum Review {
    #[serde(rename = "restaurant")]
    Restaurant(RestaurantReview),
    #[serde(rename = "deliveryAgent")]
    DeliveryAgent(DeliveryAgentReview),
}

impl Review {
    pub fn kind(&self) -> ReviewKind {
        match self {
            Review::Restaurant(_) => ReviewKind::Restaurant,
            Review::DeliveryAgent(_) => ReviewKind::DeliveryAgent,
        }
    }

    pub fn details(&self) -> &ReviewDetails {
        match self {
            Review::Restaurant(review) => review.details(),
            Review::DeliveryAgent(review) => review.details(),
        }
    }

    pub fn order_id(&self) -> Uuid {
        self.details().order_id()
    }

    pub fn customer_username(&self) -> &str {
        self.details().customer_username()
    }

    pub fn star_rating(&self) -> i32 {
        self.details().star_rating()
    }

    pub fn comment(&self) -> &str {
        self.details().comment()
    }

    /// Identifier of the restaurant or delivery agent under review.
    pub fn subject_id(&self) -> Uuid {
        match self {
            Review::Restaurant(review) => review.restaurant_id(),
            Review::DeliveryAgent(review) => review.delivery_agent_id(),
        }
    }

    pub fn subject_name(&self) -> &str {
        match self {
            Review::Restaurant(review) => review.restaurant_name(),
            Review::DeliveryAgent(review) => review.delivery_agent_name(),
        }
    }
}

impl From<RestaurantReview> for Review {
    fn from(review: RestaurantReview) -> Self {
        Review::Restaurant(review)
    }
}

impl From<DeliveryAgentReview> for Review {
    fn from(review: DeliveryAgentReview) -> Self {
        Review::DeliveryAgent(review)
    }
}

/// Inbound review submission. Every field may be absent; absent values are
/// reported by validation rather than by deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub review_type: Option<String>,
    pub order_id: Option<Uuid>,
    pub customer_username: Option<String>,
    pub star_rating: Option<i32>,
    pub comment: Option<String>,
    pub subject_id: Option<Uuid>,
    pub subject_name: Option<String>,
}

impl ReviewRequest {
    /// Split into the review-type token and the constructor inputs.
    pub fn into_parts(self) -> (Option<String>, ReviewFields) {
        let fields = ReviewFields {
            order_id: self.order_id.unwrap_or_else(Uuid::nil),
            customer_username: self.customer_username.unwrap_or_default(),
            star_rating: self.star_rating,
            comment: self.comment,
            subject_id: self.subject_id.unwrap_or_else(Uuid::nil),
            subject_name: self.subject_name.unwrap_or_default(),
        };
        (self.review_type, fields)
    }
}
