//! Hosted content store client.
//!
//! Queries are GROQ documents sent to the store's HTTP query endpoint;
//! parameters travel as JSON-encoded `$name` query-string values.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::model::{Faq, FaqPage, Project, ProjectSummary, ServiceTier};
use super::store::ContentStore;
use crate::config::ContentConfig;
use crate::error::{FolioError, Result};

const IMAGE_PROJECTION: &str = r#"asset->{ _id, url, metadata { dimensions { width, height } } }, hotspot, alt"#;

fn project_query() -> String {
    format!(
        r#"*[_type == "portfolioProject" && slug.current == $slug][0] {{
  _id, title, slug, category, excerpt, description, challenge, approach,
  client, year, location, tags, isFeatured, order,
  featuredImage {{ {IMAGE_PROJECTION} }},
  gallery[] {{ _key, {IMAGE_PROJECTION}, caption, verticalPosition }}
}}"#
    )
}

const SUMMARY_FIELDS: &str = "_id, title, slug, category, excerpt, year, order";

fn related_query(limit: usize) -> String {
    format!(
        r#"*[_type == "portfolioProject" && category == $category && slug.current != $slug] | order(order asc) [0...{limit}] {{
  {SUMMARY_FIELDS},
  featuredImage {{ {IMAGE_PROJECTION} }}
}}"#
    )
}

fn featured_query() -> String {
    format!(
        r#"*[_type == "portfolioProject" && isFeatured == true] | order(order asc) {{
  {SUMMARY_FIELDS},
  featuredImage {{ {IMAGE_PROJECTION} }}
}}"#
    )
}

fn projects_query() -> String {
    format!(
        r#"*[_type == "portfolioProject"] | order(order asc) {{
  {SUMMARY_FIELDS},
  featuredImage {{ {IMAGE_PROJECTION} }}
}}"#
    )
}

const SERVICE_TIERS_QUERY: &str = r#"*[_type == "serviceTier"] | order(order asc) {
  name, tagline, description, price, features,
  "cta": coalesce(ctaText, "Get Started"),
  "featured": coalesce(isFeatured, false),
  badge, order
}"#;

fn faqs_query(by_page: bool) -> String {
    let filter = if by_page {
        r#" && (page == $page || page == "both")"#
    } else {
        ""
    };
    format!(
        r#"*[_type == "faq"{filter}] | order(order asc) {{ question, answer, category, page, order }}"#
    )
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Client for the hosted content store's query API.
pub struct SanityClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SanityClient {
    /// Create a client from configuration; a project id is required.
    pub fn new(config: &ContentConfig) -> Result<Self> {
        let project_id = config
            .project_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| FolioError::Config("content.project_id is required".to_string()))?;

        let host = if config.use_cdn { "apicdn" } else { "api" };
        let endpoint = format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            project_id, host, config.api_version, config.dataset
        );

        Self::with_endpoint(endpoint, Duration::from_secs(config.request_timeout_secs))
    }

    /// Create a client against an explicit query endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, query: &str, params: &[(&str, Value)]) -> Result<reqwest::Request> {
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            pairs.push((format!("${name}"), value.to_string()));
        }

        Ok(self.http.get(&self.endpoint).query(&pairs).build()?)
    }

    async fn fetch<T: DeserializeOwned>(&self, query: &str, params: &[(&str, Value)]) -> Result<T> {
        let request = self.request(query, params)?;
        debug!(url = %request.url().path(), "Querying content store");

        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Content store query failed");
            return Err(FolioError::Content(format!(
                "query failed with status {}",
                status
            )));
        }

        let body: QueryResponse<T> = response
            .json()
            .await
            .map_err(|e| FolioError::Content(format!("invalid query response: {}", e)))?;
        Ok(body.result)
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    #[instrument(skip(self))]
    async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        self.fetch(&project_query(), &[("slug", Value::from(slug))])
            .await
    }

    #[instrument(skip(self))]
    async fn related_projects(
        &self,
        category: &str,
        exclude_slug: &str,
        limit: usize,
    ) -> Result<Vec<ProjectSummary>> {
        let related: Option<Vec<ProjectSummary>> = self
            .fetch(
                &related_query(limit),
                &[
                    ("category", Value::from(category)),
                    ("slug", Value::from(exclude_slug)),
                ],
            )
            .await?;
        Ok(related.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn featured_projects(&self) -> Result<Vec<ProjectSummary>> {
        let featured: Option<Vec<ProjectSummary>> = self.fetch(&featured_query(), &[]).await?;
        Ok(featured.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn projects(&self) -> Result<Vec<ProjectSummary>> {
        let projects: Option<Vec<ProjectSummary>> = self.fetch(&projects_query(), &[]).await?;
        Ok(projects.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn service_tiers(&self) -> Result<Vec<ServiceTier>> {
        let tiers: Option<Vec<ServiceTier>> = self.fetch(SERVICE_TIERS_QUERY, &[]).await?;
        Ok(tiers.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn faqs(&self, page: Option<FaqPage>) -> Result<Vec<Faq>> {
        let faqs: Option<Vec<Faq>> = match page {
            Some(page) => {
                self.fetch(&faqs_query(true), &[("page", Value::from(page.as_str()))])
                    .await?
            }
            None => self.fetch(&faqs_query(false), &[]).await?,
        };
        Ok(faqs.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(project_id: Option<&str>, use_cdn: bool) -> ContentConfig {
        ContentConfig {
            project_id: project_id.map(str::to_string),
            use_cdn,
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_from_config() {
        let client = SanityClient::new(&config(Some("abc123"), true)).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/production"
        );

        let live = SanityClient::new(&config(Some("abc123"), false)).unwrap();
        assert!(live.endpoint().starts_with("https://abc123.api.sanity.io/"));
    }

    #[test]
    fn test_project_id_required() {
        assert!(matches!(
            SanityClient::new(&config(None, true)),
            Err(FolioError::Config(_))
        ));
        assert!(SanityClient::new(&config(Some("  "), true)).is_err());
    }

    #[test]
    fn test_params_are_json_encoded() {
        let client = SanityClient::new(&config(Some("abc123"), true)).unwrap();
        let request = client
            .request("*[slug.current == $slug][0]", &[("slug", Value::from("night & day"))])
            .unwrap();

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("query".to_string(), "*[slug.current == $slug][0]".to_string()),
                ("$slug".to_string(), "\"night & day\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_related_query_embeds_limit() {
        assert!(related_query(3).contains("[0...3]"));
        assert!(project_query().contains("verticalPosition"));
        assert!(featured_query().contains("isFeatured == true"));
        assert!(projects_query().contains("excerpt"));
    }

    #[test]
    fn test_faq_query_page_filter() {
        assert_eq!(
            faqs_query(true),
            r#"*[_type == "faq" && (page == $page || page == "both")] | order(order asc) { question, answer, category, page, order }"#
        );
        assert!(!faqs_query(false).contains("$page"));
    }

    #[test]
    fn test_decode_service_tiers() {
        let body = r#"{ "result": [
            { "name": "Essentials", "price": "From €450", "features": null,
              "cta": "Get Started", "featured": false, "badge": null, "order": 1 },
            { "name": "Full Day", "tagline": null, "features": ["Ten hours"],
              "cta": "Book now", "featured": true, "badge": "Most popular" }
        ] }"#;
        let response: QueryResponse<Option<Vec<ServiceTier>>> = serde_json::from_str(body).unwrap();
        let tiers = response.result.unwrap();
        assert!(tiers[0].features.is_empty());
        assert_eq!(tiers[1].cta, "Book now");
        assert!(tiers[1].featured);
        assert!(SERVICE_TIERS_QUERY.contains(r#"coalesce(ctaText, "Get Started")"#));
    }

    #[test]
    fn test_decode_query_envelope() {
        let body = r#"{
            "ms": 4,
            "query": "...",
            "result": {
                "_id": "p1",
                "title": "Electric Dreams",
                "slug": { "current": "electric-dreams" },
                "category": "Music",
                "gallery": [
                    { "_key": "g1", "asset": null, "alt": null },
                    {
                        "_key": "g2",
                        "asset": {
                            "_id": "image-2",
                            "url": "https://cdn.example.com/2.jpg",
                            "metadata": { "dimensions": { "width": 1000, "height": 1500 } }
                        },
                        "verticalPosition": "right"
                    }
                ]
            }
        }"#;
        let response: QueryResponse<Option<Project>> = serde_json::from_str(body).unwrap();
        let project = response.result.unwrap();
        assert_eq!(project.gallery.len(), 2);
        assert!(project.gallery[0].asset.is_none());

        let missing: QueryResponse<Option<Project>> =
            serde_json::from_str(r#"{ "result": null }"#).unwrap();
        assert!(missing.result.is_none());
    }
}
