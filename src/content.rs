//! Content fetch functions.
//!
//! Every function takes the locale explicitly. `Err` means the CMS could not
//! be reached or answered with an error; `Ok(None)` means it answered but had
//! no matching content.

use crate::cms::{CmsClient, CmsError};
use crate::config::Config;
use crate::i18n::Locale;
use crate::mapper::{entries, ResponseMapper};
use crate::model::{AboutPage, BlogPostDetail, BlogPostSummary, LandingPage, PrivacyPolicy, TravelMap};
use crate::query::{ContentType, QueryBuilder};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ContentService {
    client: CmsClient,
    queries: QueryBuilder,
    mapper: ResponseMapper,
}

impl ContentService {
    pub fn new(client: CmsClient, queries: QueryBuilder) -> Self {
        let mapper = ResponseMapper::new(client.base_url());
        Self {
            client,
            queries,
            mapper,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CmsClient::from_config(config),
            QueryBuilder::new(config.max_page_size),
        )
    }

    /// Fetch raw entries; `None` when the CMS returned zero rows.
    async fn fetch_rows(
        &self,
        content_type: ContentType,
        locale: Locale,
        title: Option<&str>,
    ) -> Result<Option<Value>, CmsError> {
        let descriptor = match self.queries.build(content_type, locale, title) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                // Only reachable for a blog detail lookup with an empty title.
                warn!("@{}: {}", content_type.slug(), e);
                return Ok(None);
            }
        };

        let body = self.client.fetch(&descriptor).await?;
        if entries(&body).is_empty() {
            warn!("@{} ({}): No data found.", content_type.slug(), locale);
            return Ok(None);
        }
        Ok(Some(body))
    }

    pub async fn landing_page(&self, locale: Locale) -> Result<Option<LandingPage>, CmsError> {
        let body = self.fetch_rows(ContentType::LandingPage, locale, None).await?;
        Ok(body.and_then(|body| self.mapper.map_landing_page(&body)))
    }

    /// Blog summaries, newest first. `Ok(None)` when the CMS has no posts.
    pub async fn blog_posts(&self, locale: Locale) -> Result<Option<Vec<BlogPostSummary>>, CmsError> {
        let body = self.fetch_rows(ContentType::BlogList, locale, None).await?;
        let posts = body.and_then(|body| self.mapper.map_blog_posts(&body));
        if let Some(posts) = &posts {
            info!("Loaded {} blog posts for {}", posts.len(), locale);
        }
        Ok(posts)
    }

    /// Look up a blog post by title.
    ///
    /// The CMS is queried with a case-insensitive "contains" filter and the
    /// result is re-matched against `title` before it is accepted.
    pub async fn blog_post(
        &self,
        locale: Locale,
        title: &str,
    ) -> Result<Option<BlogPostDetail>, CmsError> {
        let body = self
            .fetch_rows(ContentType::BlogDetail, locale, Some(title))
            .await?;
        Ok(body.and_then(|body| self.mapper.map_blog_post(&body, title)))
    }

    pub async fn about_page(&self, locale: Locale) -> Result<Option<AboutPage>, CmsError> {
        let body = self.fetch_rows(ContentType::AboutPage, locale, None).await?;
        Ok(body.and_then(|body| self.mapper.map_about_page(&body)))
    }

    pub async fn travel_map(&self, locale: Locale) -> Result<Option<TravelMap>, CmsError> {
        let body = self.fetch_rows(ContentType::TravelMap, locale, None).await?;
        Ok(body.and_then(|body| self.mapper.map_travel_map(&body)))
    }

    pub async fn privacy_policy(&self, locale: Locale) -> Result<Option<PrivacyPolicy>, CmsError> {
        let body = self
            .fetch_rows(ContentType::PrivacyPolicy, locale, None)
            .await?;
        Ok(body.and_then(|body| self.mapper.map_privacy_policy(&body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Helper Functions ====================

    fn service(server: &MockServer) -> ContentService {
        ContentService::new(
            CmsClient::new(server.uri(), Some("test-token".to_string())),
            QueryBuilder::new(25),
        )
    }

    fn german_post(id: u64, title: &str, country: &str, with_media: bool) -> Value {
        let mut entry = json!({
            "id": id,
            "Titel": title,
            "Land": country,
            "locale": "de",
            "publishedAt": "2024-05-01T08:30:00.000Z",
        });
        if with_media {
            entry["Medien"] = json!([{ "id": id * 10, "url": format!("/uploads/{}.jpg", id) }]);
        }
        entry
    }

    // ==================== Blog List Tests ====================

    #[tokio::test]
    async fn test_blog_posts_one_without_media() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/blog-posts"))
            .and(query_param("locale", "de"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    german_post(1, "Reise in Kanada", "Kanada", true),
                    german_post(2, "Reise in Italien", "Italien", true),
                    german_post(3, "Reise in Peru", "Peru", false),
                    german_post(4, "Reise in Japan", "Japan", true),
                ],
                "meta": { "pagination": { "page": 1, "pageSize": 25, "pageCount": 1, "total": 4 } }
            })))
            .mount(&mock_server)
            .await;

        let posts = service(&mock_server)
            .blog_posts(Locale::GERMAN)
            .await
            .expect("Should succeed")
            .expect("Should have posts");

        assert_eq!(posts.len(), 4);
        assert!(posts.iter().all(|post| post.locale.as_deref() == Some("de")));
        assert!(posts[2].featured_image.is_none());
        assert_eq!(
            posts[0].featured_image.as_ref().unwrap().url,
            format!("{}/uploads/1.jpg", mock_server.uri())
        );
    }

    #[tokio::test]
    async fn test_blog_posts_zero_rows_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/blog-posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [], "meta": {} })))
            .mount(&mock_server)
            .await;

        let result = service(&mock_server).blog_posts(Locale::ENGLISH).await;
        assert!(matches!(result, Ok(None)));
    }

    // ==================== Blog Detail Tests ====================

    #[tokio::test]
    async fn test_blog_post_sends_title_filter() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/blog-posts"))
            .and(query_param("filters[Titel][$containsi]", "Reise in Kanada"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [german_post(1, "Reise in Kanada", "Kanada", true)]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let post = service(&mock_server)
            .blog_post(Locale::GERMAN, "Reise in Kanada")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.images.len(), 1);
    }

    #[tokio::test]
    async fn test_blog_post_zero_matches_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/blog-posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&mock_server)
            .await;

        let result = service(&mock_server)
            .blog_post(Locale::GERMAN, "Atlantis")
            .await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_blog_post_empty_title_skips_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let result = service(&mock_server).blog_post(Locale::GERMAN, " ").await;
        assert!(matches!(result, Ok(None)));
    }

    // ==================== Singleton Tests ====================

    #[tokio::test]
    async fn test_landing_page_uses_cms_locale() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/landing-pages"))
            .and(query_param("locale", "ru-RU"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": 1, "TitleText": "Добро пожаловать", "locale": "ru-RU" }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let page = service(&mock_server)
            .landing_page(Locale::RUSSIAN)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.title.as_deref(), Some("Добро пожаловать"));
    }

    #[tokio::test]
    async fn test_server_error_is_distinct_from_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/about-pages"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let result = service(&mock_server).about_page(Locale::GERMAN).await;
        assert!(matches!(result, Err(CmsError::Status { .. })));
    }

    #[tokio::test]
    async fn test_privacy_policy_and_travel_map() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/privacy-policies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": 1, "Titel": "Privacy", "Content": "text" }]
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/travel-maps"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&mock_server)
            .await;

        let service = service(&mock_server);
        let policy = service.privacy_policy(Locale::ENGLISH).await.unwrap();
        assert_eq!(policy.unwrap().title.as_deref(), Some("Privacy"));
        assert!(service.travel_map(Locale::ENGLISH).await.unwrap().is_none());
    }
}
