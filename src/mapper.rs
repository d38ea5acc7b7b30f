//! Raw CMS payload → content records.
//!
//! Every entry and every media object is decoded on its own. A malformed
//! entry is logged and dropped; it never fails the batch it came in.

use crate::model::{
    AboutPage, BlogPostDetail, BlogPostSummary, Image, ImageFormat, LandingPage, PrivacyPolicy,
    TravelMap,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

// ==================== Raw Shapes ====================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMedia {
    id: Option<u64>,
    url: Option<String>,
    name: Option<String>,
    #[serde(rename = "alternativeText")]
    alternative_text: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
    ext: Option<String>,
    hash: Option<String>,
    formats: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFormat {
    url: Option<String>,
    mime: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
}

/// Fields shared by every CMS entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMeta {
    id: Option<u64>,
    #[serde(rename = "documentId")]
    document_id: Option<String>,
    locale: Option<String>,
    #[serde(rename = "publishedAt", deserialize_with = "lenient_timestamp")]
    published_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt", deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", deserialize_with = "lenient_timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLandingPage {
    #[serde(flatten)]
    meta: RawMeta,
    #[serde(rename = "TitleText")]
    title_text: Option<String>,
    #[serde(rename = "TitleImage")]
    title_image: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBlogPost {
    #[serde(flatten)]
    meta: RawMeta,
    #[serde(rename = "Titel")]
    title: Option<String>,
    #[serde(rename = "Land")]
    country: Option<String>,
    #[serde(rename = "Beschreibung")]
    description: Option<String>,
    #[serde(rename = "Medien")]
    media: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAboutPage {
    #[serde(flatten)]
    meta: RawMeta,
    #[serde(rename = "AboutDescription")]
    description: Option<String>,
    #[serde(rename = "TitleImage")]
    title_image: Option<Value>,
    #[serde(rename = "ProfileImage")]
    profile_image: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTravelMap {
    #[serde(flatten)]
    meta: RawMeta,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "TravelMap")]
    map: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPrivacyPolicy {
    #[serde(flatten)]
    meta: RawMeta,
    #[serde(rename = "Titel")]
    title: Option<String>,
    #[serde(rename = "Content")]
    content: Option<String>,
}

/// Timestamps that fail to parse become `None` instead of failing the entry.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Entries of a CMS response: `data` may be a list, one object or absent.
pub fn entries(body: &Value) -> Vec<&Value> {
    match body.get("data") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    }
}

fn decode<T: DeserializeOwned>(kind: &str, entry: &Value) -> Option<T> {
    match T::deserialize(entry) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!("Malformed {} entry skipped: {}", kind, e);
            None
        }
    }
}

fn require_id(kind: &str, meta: &RawMeta) -> Option<u64> {
    if meta.id.is_none() {
        warn!("{} entry without id skipped", kind);
    }
    meta.id
}

fn dimension(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

// ==================== Mapper ====================

/// Maps raw CMS responses; knows the CMS base URL for media links.
#[derive(Debug, Clone)]
pub struct ResponseMapper {
    base_url: String,
}

impl ResponseMapper {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// Map one media object. Missing or empty URLs yield `None`.
    pub fn map_image(&self, raw: &Value) -> Option<Image> {
        if raw.is_null() {
            return None;
        }
        let media: RawMedia = decode("media", raw)?;
        let Some(url) = media.url.filter(|url| !url.is_empty()) else {
            warn!("Media object without url skipped (id {:?})", media.id);
            return None;
        };

        let formats = media
            .formats
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, value)| {
                let format: RawFormat = decode("image format", &value)?;
                let url = format.url.filter(|url| !url.is_empty())?;
                Some((
                    name,
                    ImageFormat {
                        url: self.absolute_url(&url),
                        mime: format.mime,
                        width: dimension(format.width),
                        height: dimension(format.height),
                    },
                ))
            })
            .collect();

        Some(Image {
            id: media.id,
            url: self.absolute_url(&url),
            name: media.name,
            alternative_text: media.alternative_text,
            width: dimension(media.width),
            height: dimension(media.height),
            extension: media.ext,
            hash: media.hash,
            formats,
        })
    }

    fn map_optional_image(&self, raw: Option<&Value>) -> Option<Image> {
        raw.and_then(|value| self.map_image(value))
    }

    pub fn map_landing_page(&self, body: &Value) -> Option<LandingPage> {
        let entry = *entries(body).first()?;
        let raw: RawLandingPage = decode("landing page", entry)?;
        let id = require_id("Landing page", &raw.meta)?;

        Some(LandingPage {
            id,
            document_id: raw.meta.document_id,
            title: raw.title_text,
            title_image: self.map_optional_image(raw.title_image.as_ref()),
            locale: raw.meta.locale,
            published_at: raw.meta.published_at,
            created_at: raw.meta.created_at,
            updated_at: raw.meta.updated_at,
        })
    }

    fn map_blog_summary(&self, entry: &Value) -> Option<BlogPostSummary> {
        let raw: RawBlogPost = decode("blog post", entry)?;
        let id = require_id("Blog post", &raw.meta)?;
        let Some(title) = raw.title else {
            warn!("Blog post {} without title skipped", id);
            return None;
        };

        Some(BlogPostSummary {
            id,
            document_id: raw.meta.document_id,
            title,
            country: raw.country,
            featured_image: self.map_optional_image(raw.media.as_deref().and_then(<[Value]>::first)),
            locale: raw.meta.locale,
            published_at: raw.meta.published_at,
        })
    }

    /// Map a blog list.
    ///
    /// `None` means the CMS returned no entries at all; `Some(vec![])` means
    /// entries were returned but none could be mapped.
    pub fn map_blog_posts(&self, body: &Value) -> Option<Vec<BlogPostSummary>> {
        let raw_entries = entries(body);
        if raw_entries.is_empty() {
            return None;
        }
        Some(
            raw_entries
                .into_iter()
                .filter_map(|entry| self.map_blog_summary(entry))
                .collect(),
        )
    }

    fn map_blog_detail(&self, entry: &Value) -> Option<BlogPostDetail> {
        let raw: RawBlogPost = decode("blog post", entry)?;
        let id = require_id("Blog post", &raw.meta)?;
        let Some(title) = raw.title else {
            warn!("Blog post {} without title skipped", id);
            return None;
        };

        let images = raw
            .media
            .unwrap_or_default()
            .iter()
            .filter_map(|media| self.map_image(media))
            .collect();

        Some(BlogPostDetail {
            id,
            document_id: raw.meta.document_id,
            title,
            description: raw.description,
            country: raw.country,
            images,
            locale: raw.meta.locale,
            published_at: raw.meta.published_at,
        })
    }

    /// Map a title-filtered blog response to the post matching `requested_title`.
    ///
    /// The CMS filter is a loose "contains"; the result is re-checked here,
    /// preferring an exact (case-insensitive) title over a substring match.
    pub fn map_blog_post(&self, body: &Value, requested_title: &str) -> Option<BlogPostDetail> {
        let wanted = requested_title.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        let candidates: Vec<BlogPostDetail> = entries(body)
            .into_iter()
            .filter_map(|entry| self.map_blog_detail(entry))
            .collect();

        let exact = candidates
            .iter()
            .position(|post| post.title.trim().to_lowercase() == wanted);
        let partial = || {
            candidates
                .iter()
                .position(|post| post.title.to_lowercase().contains(&wanted))
        };

        match exact.or_else(partial) {
            Some(index) => candidates.into_iter().nth(index),
            None => {
                warn!(
                    "No blog post matches title '{}' among {} candidates",
                    requested_title,
                    candidates.len()
                );
                None
            }
        }
    }

    pub fn map_about_page(&self, body: &Value) -> Option<AboutPage> {
        let entry = *entries(body).first()?;
        let raw: RawAboutPage = decode("about page", entry)?;
        let id = require_id("About page", &raw.meta)?;

        Some(AboutPage {
            id,
            document_id: raw.meta.document_id,
            description: raw.description,
            title_image: self.map_optional_image(raw.title_image.as_ref()),
            profile_image: self.map_optional_image(raw.profile_image.as_ref()),
            locale: raw.meta.locale,
            published_at: raw.meta.published_at,
            created_at: raw.meta.created_at,
            updated_at: raw.meta.updated_at,
        })
    }

    pub fn map_travel_map(&self, body: &Value) -> Option<TravelMap> {
        let entry = *entries(body).first()?;
        let raw: RawTravelMap = decode("travel map", entry)?;
        let id = require_id("Travel map", &raw.meta)?;

        let name = raw
            .map
            .as_ref()
            .and_then(|map| map.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(TravelMap {
            id,
            document_id: raw.meta.document_id,
            name,
            description: raw.description,
            image: self.map_optional_image(raw.map.as_ref()),
            locale: raw.meta.locale,
            updated_at: raw.meta.updated_at,
        })
    }

    pub fn map_privacy_policy(&self, body: &Value) -> Option<PrivacyPolicy> {
        let entry = *entries(body).first()?;
        let raw: RawPrivacyPolicy = decode("privacy policy", entry)?;
        let id = require_id("Privacy policy", &raw.meta)?;

        Some(PrivacyPolicy {
            id,
            title: raw.title,
            content: raw.content,
            locale: raw.meta.locale,
            created_at: raw.meta.created_at,
            updated_at: raw.meta.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const BASE: &str = "https://cms.example.com";

    fn mapper() -> ResponseMapper {
        ResponseMapper::new(format!("{}/", BASE))
    }

    fn media(id: u64, url: &str) -> Value {
        json!({
            "id": id,
            "url": url,
            "alternativeText": format!("image {}", id),
            "width": 1200,
            "height": 800,
            "ext": ".jpg",
            "hash": format!("hash_{}", id),
        })
    }

    fn blog_entry(id: u64, title: &str, country: &str, media: Value) -> Value {
        json!({
            "id": id,
            "documentId": format!("doc{}", id),
            "Titel": title,
            "Land": country,
            "Beschreibung": format!("Beschreibung {}", title),
            "locale": "de",
            "publishedAt": "2024-05-01T08:30:00.000Z",
            "Medien": media,
        })
    }

    // ==================== Image Tests ====================

    #[test]
    fn test_image_url_is_fully_qualified() {
        let image = mapper().map_image(&media(1, "/uploads/kanada.jpg")).unwrap();
        assert_eq!(image.url, "https://cms.example.com/uploads/kanada.jpg");
        assert_eq!(image.width, Some(1200));
        assert_eq!(image.height, Some(800));
        assert_eq!(image.extension.as_deref(), Some(".jpg"));
    }

    #[test]
    fn test_absolute_image_url_is_kept() {
        let image = mapper()
            .map_image(&media(1, "https://cdn.example.com/a.jpg"))
            .unwrap();
        assert_eq!(image.url, "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn test_image_without_url_is_none() {
        assert!(mapper().map_image(&json!({ "id": 3, "width": 10 })).is_none());
        assert!(mapper().map_image(&json!({ "id": 3, "url": "" })).is_none());
        assert!(mapper().map_image(&Value::Null).is_none());
    }

    #[test]
    fn test_negative_or_missing_dimensions_are_none() {
        let image = mapper()
            .map_image(&json!({ "url": "/a.png", "width": -5 }))
            .unwrap();
        assert_eq!(image.width, None);
        assert_eq!(image.height, None);
    }

    #[test]
    fn test_image_formats_are_prefixed() {
        let raw = json!({
            "url": "/uploads/a.jpg",
            "formats": {
                "thumbnail": { "url": "/uploads/thumbnail_a.jpg", "mime": "image/jpeg", "width": 156, "height": 104 },
                "broken": { "width": 1 }
            }
        });
        let image = mapper().map_image(&raw).unwrap();
        assert_eq!(image.formats.len(), 1);
        let thumbnail = &image.formats["thumbnail"];
        assert_eq!(thumbnail.url, "https://cms.example.com/uploads/thumbnail_a.jpg");
        assert_eq!(thumbnail.width, Some(156));
    }

    // ==================== Entries Tests ====================

    #[test]
    fn test_entries_accepts_list_object_and_null() {
        assert_eq!(entries(&json!({ "data": [{}, {}] })).len(), 2);
        assert_eq!(entries(&json!({ "data": { "id": 1 } })).len(), 1);
        assert!(entries(&json!({ "data": null })).is_empty());
        assert!(entries(&json!({})).is_empty());
    }

    // ==================== Landing Page Tests ====================

    #[test]
    fn test_landing_page_roundtrip_fields() {
        let body = json!({
            "data": [{
                "id": 4,
                "TitleText": "Willkommen",
                "locale": "de",
                "publishedAt": "2024-03-10T12:00:00.000Z",
                "TitleImage": media(9, "/uploads/title.jpg"),
            }],
            "meta": {}
        });

        let page = mapper().map_landing_page(&body).unwrap();
        assert_eq!(page.id, 4);
        assert_eq!(page.title.as_deref(), Some("Willkommen"));
        assert_eq!(page.locale.as_deref(), Some("de"));
        assert_eq!(
            page.published_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap())
        );
        assert_eq!(page.title_image.unwrap().id, Some(9));
    }

    #[test]
    fn test_landing_page_empty_is_none() {
        assert!(mapper().map_landing_page(&json!({ "data": [] })).is_none());
    }

    #[test]
    fn test_landing_page_without_id_is_none() {
        let body = json!({ "data": [{ "TitleText": "Willkommen" }] });
        assert!(mapper().map_landing_page(&body).is_none());
    }

    #[test]
    fn test_invalid_timestamp_does_not_fail_entry() {
        let body = json!({ "data": [{ "id": 1, "publishedAt": "yesterday" }] });
        let page = mapper().map_landing_page(&body).unwrap();
        assert!(page.published_at.is_none());
    }

    // ==================== Blog List Tests ====================

    #[test]
    fn test_blog_posts_first_image_is_featured() {
        let body = json!({
            "data": [blog_entry(1, "Reise in Kanada", "Kanada", json!([
                media(10, "/uploads/first.jpg"),
                media(11, "/uploads/second.jpg"),
            ]))]
        });

        let posts = mapper().map_blog_posts(&body).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].featured_image.as_ref().unwrap().url,
            "https://cms.example.com/uploads/first.jpg"
        );
        assert_eq!(posts[0].country.as_deref(), Some("Kanada"));
    }

    #[test]
    fn test_blog_post_without_media_has_no_featured_image() {
        let mut entry = blog_entry(2, "Reise in Italien", "Italien", Value::Null);
        entry.as_object_mut().unwrap().remove("Medien");
        let posts = mapper().map_blog_posts(&json!({ "data": [entry] })).unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].featured_image.is_none());
    }

    #[test]
    fn test_malformed_blog_entry_is_skipped() {
        let body = json!({
            "data": [
                blog_entry(1, "Reise in Kanada", "Kanada", json!([])),
                { "id": "not-a-number", "Titel": "Kaputt" },
                { "id": 3 },
                blog_entry(4, "Reise in Peru", "Peru", json!([])),
            ]
        });

        let posts = mapper().map_blog_posts(&body).unwrap();
        let ids: Vec<u64> = posts.iter().map(|post| post.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_blog_posts_empty_is_none() {
        assert!(mapper().map_blog_posts(&json!({ "data": [] })).is_none());
    }

    // ==================== Blog Detail Tests ====================

    #[test]
    fn test_blog_post_prefers_exact_title() {
        let body = json!({
            "data": [
                blog_entry(1, "Reise in Kanada und Alaska", "Kanada", json!([])),
                blog_entry(2, "Reise in Kanada", "Kanada", json!([])),
            ]
        });

        let post = mapper().map_blog_post(&body, "reise in kanada").unwrap();
        assert_eq!(post.id, 2);
    }

    #[test]
    fn test_blog_post_substring_match() {
        let body = json!({
            "data": [blog_entry(1, "Reise in Kanada und Alaska", "Kanada", json!([
                media(1, "/a.jpg"),
                { "id": 2 },
                media(3, "/c.jpg"),
            ]))]
        });

        let post = mapper().map_blog_post(&body, "Kanada").unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.images.len(), 2);
        assert_eq!(post.description.as_deref(), Some("Beschreibung Reise in Kanada und Alaska"));
    }

    #[test]
    fn test_blog_post_filter_false_positive_is_rejected() {
        let body = json!({ "data": [blog_entry(1, "Reise in Italien", "Italien", json!([]))] });
        assert!(mapper().map_blog_post(&body, "Kanada").is_none());
    }

    #[test]
    fn test_blog_post_no_entries_is_none() {
        assert!(mapper().map_blog_post(&json!({ "data": [] }), "Kanada").is_none());
    }

    // ==================== Other Singletons ====================

    #[test]
    fn test_about_page_images() {
        let body = json!({
            "data": [{
                "id": 7,
                "AboutDescription": "Über uns",
                "TitleImage": media(1, "/title.jpg"),
                "ProfileImage": { "id": 2 },
            }]
        });
        let page = mapper().map_about_page(&body).unwrap();
        assert_eq!(page.description.as_deref(), Some("Über uns"));
        assert!(page.title_image.is_some());
        assert!(page.profile_image.is_none());
    }

    #[test]
    fn test_travel_map_name_and_image() {
        let body = json!({
            "data": [{
                "id": 3,
                "Description": "Wo wir waren",
                "updatedAt": "2024-06-01T00:00:00Z",
                "TravelMap": { "name": "weltkarte.svg", "url": "/uploads/weltkarte.svg" },
            }]
        });
        let map = mapper().map_travel_map(&body).unwrap();
        assert_eq!(map.name, "weltkarte.svg");
        assert_eq!(map.image.unwrap().url, "https://cms.example.com/uploads/weltkarte.svg");
    }

    #[test]
    fn test_travel_map_without_image_has_empty_name() {
        let body = json!({ "data": [{ "id": 3 }] });
        let map = mapper().map_travel_map(&body).unwrap();
        assert_eq!(map.name, "");
        assert!(map.image.is_none());
    }

    #[test]
    fn test_privacy_policy() {
        let body = json!({
            "data": [{ "id": 1, "Titel": "Datenschutz", "Content": "# Text", "locale": "de" }]
        });
        let policy = mapper().map_privacy_policy(&body).unwrap();
        assert_eq!(policy.title.as_deref(), Some("Datenschutz"));
        assert_eq!(policy.content.as_deref(), Some("# Text"));
    }
}
