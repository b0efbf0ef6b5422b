use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::Category;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CommunityReview {
    pub id: Uuid,
    pub author: String,
    #[serde(rename = "locationName")]
    pub location_name: String,
    pub category: Category,
    pub rating: u8,
    pub text: String,
    pub likes: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NewReview {
    pub author: String,
    #[serde(rename = "locationName")]
    pub location_name: String,
    #[serde(default)]
    pub category: Category,
    pub rating: u8,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
