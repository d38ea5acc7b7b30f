//! Normalized content records.
//!
//! These are the only shapes the rest of the crate sees; raw CMS payloads
//! stop at the mapper.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// An image with a fully-qualified URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Option<u64>,
    pub url: String,
    pub name: Option<String>,
    pub alternative_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub extension: Option<String>,
    pub hash: Option<String>,
    /// Responsive variants keyed by format name (thumbnail, small, ...)
    pub formats: BTreeMap<String, ImageFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFormat {
    pub url: String,
    pub mime: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPage {
    pub id: u64,
    pub document_id: Option<String>,
    pub title: Option<String>,
    pub title_image: Option<Image>,
    pub locale: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A blog post as shown in lists and search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostSummary {
    pub id: u64,
    pub document_id: Option<String>,
    pub title: String,
    pub country: Option<String>,
    /// First uploaded image of the post
    pub featured_image: Option<Image>,
    pub locale: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostDetail {
    pub id: u64,
    pub document_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub country: Option<String>,
    /// All images in upload order
    pub images: Vec<Image>,
    pub locale: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutPage {
    pub id: u64,
    pub document_id: Option<String>,
    pub description: Option<String>,
    pub title_image: Option<Image>,
    pub profile_image: Option<Image>,
    pub locale: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelMap {
    pub id: u64,
    pub document_id: Option<String>,
    /// Name of the map image, empty when no image is attached
    pub name: String,
    pub description: Option<String>,
    pub image: Option<Image>,
    pub locale: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPolicy {
    pub id: u64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub locale: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
