//! Page models.
//!
//! A page is localized metadata plus one [`Section`] per content block.
//! CMS failures never fail a page; they turn into an `unavailable` section.

use crate::cms::CmsError;
use crate::content::ContentService;
use crate::i18n::{Locale, LocaleRegistry};
use crate::model::{AboutPage, BlogPostDetail, BlogPostSummary, LandingPage, PrivacyPolicy, TravelMap};
use crate::search::search_blog_posts;
use serde::Serialize;
use tracing::error;

/// Render state of one content block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    NotFound { message: String },
    Unavailable { message: String },
}

impl<T> Section<T> {
    pub fn from_result(result: Result<Option<T>, CmsError>, locale: Locale) -> Self {
        let strings = locale.strings();
        match result {
            Ok(Some(value)) => Section::Ready(value),
            Ok(None) => Section::NotFound {
                message: strings.content_not_found.to_string(),
            },
            Err(e) => {
                error!("Content unavailable ({}): {}", locale, e);
                Section::Unavailable {
                    message: strings.content_unavailable.to_string(),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }
}

/// Link to the same page in another locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternate {
    pub locale: &'static str,
    pub label: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub locale: Locale,
    pub title: String,
    pub description: &'static str,
    pub keywords: &'static str,
    /// Path of this page without the locale segment
    pub path: String,
    pub alternates: Vec<Alternate>,
}

impl PageMeta {
    pub fn new(locale: Locale, path: &str) -> Self {
        let strings = locale.strings();
        let alternates = LocaleRegistry::get()
            .list()
            .into_iter()
            .map(|config| Alternate {
                locale: config.code,
                label: config.long_name,
                href: format!("/{}{}", config.code, path),
            })
            .collect();

        Self {
            locale,
            title: strings.meta_title.to_string(),
            description: strings.meta_description,
            keywords: strings.meta_keywords,
            path: path.to_string(),
            alternates,
        }
    }

    fn with_title(mut self, title: &str) -> Self {
        self.title = format!("{} | {}", title, self.title);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub meta: PageMeta,
    pub landing_page: Section<LandingPage>,
    pub travel_map: Section<TravelMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelCardsView {
    pub meta: PageMeta,
    pub posts: Section<Vec<BlogPostSummary>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostView {
    pub meta: PageMeta,
    pub post: Section<BlogPostDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutView {
    pub meta: PageMeta,
    pub about: Section<AboutPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPolicyView {
    pub meta: PageMeta,
    pub policy: Section<PrivacyPolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub meta: PageMeta,
    pub query: String,
    pub heading: String,
    pub results: Section<Vec<BlogPostSummary>>,
}

// ==================== Page Loaders ====================

/// Landing page and travel map, fetched concurrently.
pub async fn home(content: &ContentService, locale: Locale) -> HomeView {
    let (landing_page, travel_map) =
        tokio::join!(content.landing_page(locale), content.travel_map(locale));

    HomeView {
        meta: PageMeta::new(locale, ""),
        landing_page: Section::from_result(landing_page, locale),
        travel_map: Section::from_result(travel_map, locale),
    }
}

pub async fn travel_cards(content: &ContentService, locale: Locale) -> TravelCardsView {
    TravelCardsView {
        meta: PageMeta::new(locale, "/travel-cards"),
        posts: Section::from_result(content.blog_posts(locale).await, locale),
    }
}

/// `title` is the decoded path segment.
pub async fn blog_post(content: &ContentService, locale: Locale, title: &str) -> BlogPostView {
    let post = Section::from_result(content.blog_post(locale, title).await, locale);
    let path = format!(
        "/blogs/{}",
        url::form_urlencoded::byte_serialize(title.as_bytes())
            .collect::<String>()
            .replace('+', "%20")
    );

    let meta = match &post {
        Section::Ready(post) => PageMeta::new(locale, &path).with_title(&post.title),
        _ => PageMeta::new(locale, &path),
    };

    BlogPostView { meta, post }
}

pub async fn about(content: &ContentService, locale: Locale) -> AboutView {
    AboutView {
        meta: PageMeta::new(locale, "/about"),
        about: Section::from_result(content.about_page(locale).await, locale),
    }
}

pub async fn privacy_policy(content: &ContentService, locale: Locale) -> PrivacyPolicyView {
    PrivacyPolicyView {
        meta: PageMeta::new(locale, "/privacy-policy"),
        policy: Section::from_result(content.privacy_policy(locale).await, locale),
    }
}

/// Search the locale's blog list. An empty query or no hits is `not_found`.
pub async fn search(content: &ContentService, locale: Locale, query: &str) -> SearchView {
    let strings = locale.strings();
    let query = query.trim().to_string();

    let results = match content.blog_posts(locale).await {
        Ok(posts) => {
            let hits = posts
                .as_deref()
                .and_then(|posts| search_blog_posts(posts, &query, Some(locale)));
            match hits {
                Some(hits) => Section::Ready(hits),
                None => Section::NotFound {
                    message: strings.search_no_results.to_string(),
                },
            }
        }
        Err(e) => Section::from_result(Err(e), locale),
    };

    SearchView {
        meta: PageMeta::new(locale, "/search"),
        heading: strings.search_heading.replace("{query}", &query),
        query,
        results,
    }
}
