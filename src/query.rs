//! CMS query construction.
//!
//! Each content type has a fixed field allow-list and population rules.
//! Query strings follow the bracketed `qs` convention the CMS parses, with
//! only the values percent-encoded:
//!
//! ```text
//! locale=de&fields[0]=Titel&populate[Medien][sort][0]=createdAt%3Aasc
//! ```

use crate::i18n::Locale;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Revalidation hints per content type, in seconds.
pub const REVALIDATION_TIME_BLOG_POSTS: u64 = 30;
pub const REVALIDATION_TIME_ABOUT_PAGE: u64 = 60 * 60;
pub const REVALIDATION_TIME_LANDING_PAGE: u64 = 60;
pub const REVALIDATION_TIME_GENERIC: u64 = 30;

/// Media fields requested for every image relation.
const IMAGE_FIELDS: [&str; 4] = ["url", "alternativeText", "width", "height"];

/// Oldest upload first, so the first image of a relation is stable.
const IMAGE_SORT: &str = "createdAt:asc";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown content type: '{0}'")]
    UnknownContentType(String),

    #[error("A blog detail query needs a non-empty title filter")]
    MissingTitleFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    LandingPage,
    BlogList,
    BlogDetail,
    AboutPage,
    TravelMap,
    PrivacyPolicy,
}

impl ContentType {
    /// CMS endpoint below `/api`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ContentType::LandingPage => "/landing-pages",
            ContentType::BlogList | ContentType::BlogDetail => "/blog-posts",
            ContentType::AboutPage => "/about-pages",
            ContentType::TravelMap => "/travel-maps",
            ContentType::PrivacyPolicy => "/privacy-policies",
        }
    }

    /// Soft TTL after which cached content should be refetched.
    pub fn revalidate(&self) -> Duration {
        let secs = match self {
            ContentType::BlogList | ContentType::BlogDetail => REVALIDATION_TIME_BLOG_POSTS,
            ContentType::AboutPage => REVALIDATION_TIME_ABOUT_PAGE,
            ContentType::LandingPage => REVALIDATION_TIME_LANDING_PAGE,
            ContentType::TravelMap | ContentType::PrivacyPolicy => REVALIDATION_TIME_GENERIC,
        };
        Duration::from_secs(secs)
    }

    /// Slug used in the content API routes.
    pub fn slug(&self) -> &'static str {
        match self {
            ContentType::LandingPage => "landing-page",
            ContentType::BlogList => "blog-posts",
            ContentType::BlogDetail => "blog-post",
            ContentType::AboutPage => "about-page",
            ContentType::TravelMap => "travel-map",
            ContentType::PrivacyPolicy => "privacy-policy",
        }
    }
}

impl FromStr for ContentType {
    type Err = QueryError;

    fn from_str(slug: &str) -> Result<Self, Self::Err> {
        match slug {
            "landing-page" => Ok(ContentType::LandingPage),
            "blog-posts" => Ok(ContentType::BlogList),
            "blog-post" => Ok(ContentType::BlogDetail),
            "about-page" => Ok(ContentType::AboutPage),
            "travel-map" => Ok(ContentType::TravelMap),
            "privacy-policy" => Ok(ContentType::PrivacyPolicy),
            other => Err(QueryError::UnknownContentType(other.to_string())),
        }
    }
}

/// Population rule for one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    pub relation: &'static str,
    pub fields: Vec<&'static str>,
    pub sort: Vec<&'static str>,
}

impl Population {
    fn image(relation: &'static str) -> Self {
        Self {
            relation,
            fields: IMAGE_FIELDS.to_vec(),
            sort: Vec::new(),
        }
    }

    fn sorted_images(relation: &'static str) -> Self {
        Self {
            sort: vec![IMAGE_SORT],
            ..Self::image(relation)
        }
    }
}

/// A `filters[field][operator]=value` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: &'static str,
    pub operator: &'static str,
    pub value: String,
}

/// Everything needed to build one CMS request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub content_type: ContentType,
    pub locale: Locale,
    pub filters: Vec<Filter>,
    pub fields: Vec<&'static str>,
    pub populate: Vec<Population>,
    pub pagination_limit: Option<u32>,
    pub sort: Vec<&'static str>,
}

impl QueryDescriptor {
    pub fn endpoint(&self) -> &'static str {
        self.content_type.endpoint()
    }

    pub fn revalidate(&self) -> Duration {
        self.content_type.revalidate()
    }

    /// Render the query string. Deterministic for equal descriptors.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(String, String)> =
            vec![("locale".to_string(), self.locale.cms_code().to_string())];

        for filter in &self.filters {
            pairs.push((
                format!("filters[{}][{}]", filter.field, filter.operator),
                filter.value.clone(),
            ));
        }

        push_indexed(&mut pairs, "fields", &self.fields);

        for population in &self.populate {
            let prefix = format!("populate[{}]", population.relation);
            push_indexed(&mut pairs, &format!("{}[fields]", prefix), &population.fields);
            push_indexed(&mut pairs, &format!("{}[sort]", prefix), &population.sort);
        }

        if let Some(limit) = self.pagination_limit {
            pairs.push(("pagination[limit]".to_string(), limit.to_string()));
        }

        push_indexed(&mut pairs, "sort", &self.sort);

        pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, encode_value(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn push_indexed(pairs: &mut Vec<(String, String)>, key: &str, values: &[&str]) {
    for (index, value) in values.iter().enumerate() {
        pairs.push((format!("{}[{}]", key, index), (*value).to_string()));
    }
}

fn encode_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Builds query descriptors; carries the configured page size.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    page_size: u32,
}

impl QueryBuilder {
    pub fn new(page_size: u32) -> Self {
        Self { page_size }
    }

    /// Build the descriptor for a content type.
    ///
    /// `title` is required for [`ContentType::BlogDetail`] and ignored otherwise.
    pub fn build(
        &self,
        content_type: ContentType,
        locale: Locale,
        title: Option<&str>,
    ) -> Result<QueryDescriptor, QueryError> {
        let base = QueryDescriptor {
            content_type,
            locale,
            filters: Vec::new(),
            fields: Vec::new(),
            populate: Vec::new(),
            pagination_limit: None,
            sort: Vec::new(),
        };

        let descriptor = match content_type {
            ContentType::LandingPage => QueryDescriptor {
                fields: vec!["TitleText", "locale", "publishedAt", "createdAt", "updatedAt"],
                populate: vec![Population::image("TitleImage")],
                ..base
            },
            ContentType::BlogList => QueryDescriptor {
                fields: vec!["Titel", "Land", "locale", "publishedAt", "documentId"],
                populate: vec![Population::sorted_images("Medien")],
                pagination_limit: Some(self.page_size),
                sort: vec!["publishedAt:desc"],
                ..base
            },
            ContentType::BlogDetail => {
                let title = title
                    .map(str::trim)
                    .filter(|title| !title.is_empty())
                    .ok_or(QueryError::MissingTitleFilter)?;
                QueryDescriptor {
                    filters: vec![Filter {
                        field: "Titel",
                        operator: "$containsi",
                        value: title.to_string(),
                    }],
                    fields: vec!["Titel", "Beschreibung", "Land", "locale", "publishedAt", "documentId"],
                    populate: vec![Population::sorted_images("Medien")],
                    ..base
                }
            }
            ContentType::AboutPage => QueryDescriptor {
                fields: vec![
                    "AboutDescription",
                    "locale",
                    "publishedAt",
                    "documentId",
                    "createdAt",
                    "updatedAt",
                ],
                populate: vec![Population::image("TitleImage"), Population::image("ProfileImage")],
                ..base
            },
            ContentType::TravelMap => QueryDescriptor {
                fields: vec!["Description", "locale", "updatedAt", "documentId"],
                populate: vec![Population {
                    relation: "TravelMap",
                    fields: vec!["name", "url", "alternativeText", "width", "height"],
                    sort: Vec::new(),
                }],
                ..base
            },
            ContentType::PrivacyPolicy => QueryDescriptor {
                fields: vec!["Titel", "Content", "locale", "createdAt", "updatedAt"],
                ..base
            },
        };

        Ok(descriptor)
    }

    /// Resolve a content-type slug and build its descriptor.
    pub fn build_for_slug(
        &self,
        slug: &str,
        locale: Locale,
        title: Option<&str>,
    ) -> Result<QueryDescriptor, QueryError> {
        self.build(slug.parse()?, locale, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(25)
    }

    // ==================== ContentType Tests ====================

    #[test]
    fn test_slug_roundtrip() {
        for content_type in [
            ContentType::LandingPage,
            ContentType::BlogList,
            ContentType::BlogDetail,
            ContentType::AboutPage,
            ContentType::TravelMap,
            ContentType::PrivacyPolicy,
        ] {
            assert_eq!(content_type.slug().parse::<ContentType>(), Ok(content_type));
        }
    }

    #[test]
    fn test_unknown_slug_fails_loudly() {
        assert_eq!(
            "recipes".parse::<ContentType>(),
            Err(QueryError::UnknownContentType("recipes".to_string()))
        );
        let err = builder().build_for_slug("", Locale::GERMAN, None).unwrap_err();
        assert!(err.to_string().contains("Unknown content type"));
    }

    #[test]
    fn test_revalidation_hints_differ() {
        assert_eq!(ContentType::BlogList.revalidate(), Duration::from_secs(30));
        assert_eq!(ContentType::LandingPage.revalidate(), Duration::from_secs(60));
        assert_eq!(ContentType::AboutPage.revalidate(), Duration::from_secs(3600));
        assert!(ContentType::BlogList.revalidate() < ContentType::AboutPage.revalidate());
    }

    // ==================== Query String Tests ====================

    #[test]
    fn test_landing_page_query() {
        let query = builder()
            .build(ContentType::LandingPage, Locale::GERMAN, None)
            .unwrap()
            .to_query_string();

        assert_eq!(
            query,
            "locale=de&fields[0]=TitleText&fields[1]=locale&fields[2]=publishedAt\
             &fields[3]=createdAt&fields[4]=updatedAt\
             &populate[TitleImage][fields][0]=url&populate[TitleImage][fields][1]=alternativeText\
             &populate[TitleImage][fields][2]=width&populate[TitleImage][fields][3]=height"
        );
    }

    #[test]
    fn test_blog_list_query_has_limit_sort_and_image_order() {
        let query = QueryBuilder::new(12)
            .build(ContentType::BlogList, Locale::ENGLISH, None)
            .unwrap()
            .to_query_string();

        assert!(query.starts_with("locale=en&fields[0]=Titel&fields[1]=Land"));
        assert!(query.contains("populate[Medien][sort][0]=createdAt%3Aasc"));
        assert!(query.contains("pagination[limit]=12"));
        assert!(query.ends_with("sort[0]=publishedAt%3Adesc"));
        assert!(!query.contains('*'));
    }

    #[test]
    fn test_russian_uses_cms_locale_code() {
        let query = builder()
            .build(ContentType::AboutPage, Locale::RUSSIAN, None)
            .unwrap()
            .to_query_string();
        assert!(query.starts_with("locale=ru-RU&"));
        assert!(query.contains("populate[ProfileImage][fields][0]=url"));
    }

    #[test]
    fn test_blog_detail_filter_is_encoded() {
        let query = builder()
            .build(ContentType::BlogDetail, Locale::GERMAN, Some("Reise in Kanada & USA"))
            .unwrap()
            .to_query_string();

        assert!(query.starts_with(
            "locale=de&filters[Titel][$containsi]=Reise+in+Kanada+%26+USA&fields[0]=Titel"
        ));
        assert!(!query.contains("pagination"));
    }

    #[test]
    fn test_blog_detail_without_title_fails() {
        assert_eq!(
            builder().build(ContentType::BlogDetail, Locale::GERMAN, None),
            Err(QueryError::MissingTitleFilter)
        );
        assert_eq!(
            builder().build(ContentType::BlogDetail, Locale::GERMAN, Some("   ")),
            Err(QueryError::MissingTitleFilter)
        );
    }

    #[test]
    fn test_privacy_policy_has_no_population() {
        let descriptor = builder()
            .build(ContentType::PrivacyPolicy, Locale::ENGLISH, None)
            .unwrap();
        assert!(descriptor.populate.is_empty());
        assert_eq!(descriptor.endpoint(), "/privacy-policies");
    }

    #[test]
    fn test_building_twice_is_byte_identical() {
        let first = builder()
            .build(ContentType::BlogDetail, Locale::RUSSIAN, Some("Путешествие"))
            .unwrap();
        let second = builder()
            .build(ContentType::BlogDetail, Locale::RUSSIAN, Some("Путешествие"))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_query_string(), second.to_query_string());
    }

    #[test]
    fn test_title_ignored_for_non_detail_types() {
        let with_title = builder()
            .build(ContentType::TravelMap, Locale::GERMAN, Some("ignored"))
            .unwrap();
        assert!(with_title.filters.is_empty());
    }
}
