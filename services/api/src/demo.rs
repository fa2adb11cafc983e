use crate::infra::InMemoryReviewRepository;
use clap::Args;
use order_reviews::error::AppError;
use order_reviews::reviews::{
    Review, ReviewKind, ReviewRequest, ReviewService, ReviewServiceError,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Customer username attached to the sample reviews
    #[arg(long, default_value = "demo-customer")]
    pub(crate) customer: String,
    /// Print created and fetched reviews as JSON payloads
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { customer, json } = args;

    let repository = Arc::new(InMemoryReviewRepository::default());
    let service = ReviewService::new(repository);
    let order_id = Uuid::new_v4();

    println!("Order review demo");
    println!("Order: {order_id}");

    let steps = [
        (
            "Restaurant review",
            sample_request("restaurant", order_id, &customer, 5, "Pasta arrived hot."),
        ),
        (
            "Delivery agent review",
            sample_request("deliveryAgent", order_id, &customer, 4, "Friendly and on time."),
        ),
        (
            "Second restaurant review for the same order",
            sample_request("restaurant", order_id, &customer, 1, "Changed my mind."),
        ),
        (
            "Review with a six star rating",
            sample_request("deliveryAgent", Uuid::new_v4(), &customer, 6, "Above and beyond."),
        ),
        (
            "Review of an unknown subject",
            sample_request("courier", Uuid::new_v4(), &customer, 3, "Who knows."),
        ),
    ];

    for (label, request) in steps {
        println!("\n{label}");
        match service.create_review(request).await {
            Ok(review) => render_review("  Created", &review, json),
            Err(err) => render_failure(&err),
        }
    }

    println!("\nStored reviews");
    for kind in [ReviewKind::Restaurant, ReviewKind::DeliveryAgent] {
        match service.find_review(order_id, kind).await {
            Ok(review) => render_review("  Found", &review, json),
            Err(err) => render_failure(&err),
        }
    }

    Ok(())
}

fn sample_request(
    review_type: &str,
    order_id: Uuid,
    customer: &str,
    star_rating: i32,
    comment: &str,
) -> ReviewRequest {
    let subject_name = match review_type {
        "deliveryAgent" => "Sam Rider",
        _ => "Trattoria Roma",
    };

    ReviewRequest {
        review_type: Some(review_type.to_string()),
        order_id: Some(order_id),
        customer_username: Some(customer.to_string()),
        star_rating: Some(star_rating),
        comment: Some(comment.to_string()),
        subject_id: Some(Uuid::new_v4()),
        subject_name: Some(subject_name.to_string()),
    }
}

fn render_review(prefix: &str, review: &Review, json: bool) {
    println!(
        "{prefix} {} review of {} by {}: {}/5 \"{}\"",
        review.kind(),
        review.subject_name(),
        review.customer_username(),
        review.star_rating(),
        review.comment()
    );

    if json {
        match serde_json::to_string_pretty(review) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("  Payload unavailable: {err}"),
        }
    }
}

fn render_failure(err: &ReviewServiceError) {
    println!("  Rejected ({:?}): {err}", err.kind());
}
