use chrono::Utc;
use uuid::Uuid;

use crate::models::review::{CommunityReview, NewReview};

/// Append-only community review feed. Reviews are never reconciled
/// against the itinerary and never expire.
#[derive(Debug, Default)]
pub struct ReviewStore {
    reviews: Vec<CommunityReview>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[CommunityReview] {
        &self.reviews
    }

    pub fn add(&mut self, new_review: NewReview) -> &CommunityReview {
        let review = CommunityReview {
            id: Uuid::new_v4(),
            author: new_review.author,
            location_name: new_review.location_name,
            category: new_review.category,
            rating: new_review.rating.clamp(1, 5),
            text: new_review.text,
            likes: 0,
            tags: new_review.tags,
            image_url: new_review.image_url,
            created_at: Utc::now(),
        };
        self.reviews.push(review);
        self.reviews.last().expect("review was just pushed")
    }

    /// Bumps a review's like count, returning the new count.
    pub fn like(&mut self, id: Uuid) -> Option<u32> {
        let review = self.reviews.iter_mut().find(|review| review.id == id)?;
        review.likes += 1;
        Some(review.likes)
    }
}
