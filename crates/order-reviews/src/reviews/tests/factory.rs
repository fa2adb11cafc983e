use super::common::*;
use crate::reviews::domain::{Review, ReviewValidationError};
use crate::reviews::factory::{
    DeliveryAgentReviewFactory, FactoryResolver, RestaurantReviewFactory, ReviewFactory,
    ReviewKind, ReviewRegistry,
};

#[test]
fn registry_resolves_registered_tokens() {
    let restaurant = ReviewRegistry
        .resolve(Some("restaurant"))
        .expect("restaurant registered");
    assert_eq!(restaurant.kind(), ReviewKind::Restaurant);

    let agent = ReviewRegistry
        .resolve(Some("deliveryAgent"))
        .expect("delivery agent registered");
    assert_eq!(agent.kind(), ReviewKind::DeliveryAgent);
}

#[test]
fn registry_rejects_unknown_and_absent_tokens() {
    for token in ["invalid", "Restaurant", "delivery_agent", ""] {
        let err = ReviewRegistry
            .resolve(Some(token))
            .err()
            .expect("unknown token rejected");
        assert_eq!(err.token(), Some(token));
        assert_eq!(err.to_string(), format!("Invalid review type: {token}"));
    }

    let err = ReviewRegistry.resolve(None).err().expect("null rejected");
    assert_eq!(err.token(), None);
    assert_eq!(err.to_string(), "Invalid review type: null");
}

#[test]
fn literal_null_token_is_distinct_from_absent_type() {
    let literal = ReviewRegistry
        .resolve(Some("null"))
        .err()
        .expect("literal null rejected");
    let absent = ReviewRegistry.resolve(None).err().expect("absent rejected");

    assert_eq!(literal.token(), Some("null"));
    assert_eq!(absent.token(), None);
    assert_ne!(literal, absent);
    assert_eq!(literal.to_string(), absent.to_string());
}

#[test]
fn factories_build_their_own_variant() {
    let input = fields();

    let review = RestaurantReviewFactory
        .create(input.clone())
        .expect("restaurant review");
    assert!(matches!(review, Review::Restaurant(_)));
    assert_eq!(review.subject_id(), input.subject_id);

    let review = DeliveryAgentReviewFactory
        .create(input.clone())
        .expect("delivery agent review");
    assert!(matches!(review, Review::DeliveryAgent(_)));
    assert_eq!(review.subject_name(), input.subject_name);
}

#[test]
fn factories_surface_validation_errors_unchanged() {
    let mut input = fields();
    input.star_rating = Some(6);
    let err = ReviewKind::DeliveryAgent
        .factory()
        .create(input)
        .expect_err("out of range");
    assert!(matches!(
        err,
        ReviewValidationError::OutOfRange {
            field: "StarRating",
            ..
        }
    ));
}

#[test]
fn kind_tokens_match_serde_names() {
    for kind in [ReviewKind::Restaurant, ReviewKind::DeliveryAgent] {
        let json = serde_json::to_value(kind).expect("serializes");
        assert_eq!(json, kind.as_str());
        assert_eq!(ReviewKind::from_token(kind.as_str()), Some(kind));
        assert_eq!(kind.factory().kind(), kind);
    }
}
