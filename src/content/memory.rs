//! Fixture-backed content store.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use super::model::{Faq, FaqPage, Project, ProjectSummary, ServiceTier};
use super::store::{by_display_order, ContentStore};
use crate::error::{FolioError, Result};

#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    service_tiers: Vec<ServiceTier>,
    #[serde(default)]
    faqs: Vec<Faq>,
}

/// Content store holding documents in memory.
///
/// Loaded from a YAML (or JSON) fixture with top-level `projects`,
/// `service_tiers` and `faqs` lists.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    projects: Vec<Project>,
    service_tiers: Vec<ServiceTier>,
    faqs: Vec<Faq>,
}

impl InMemoryContentStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            ..Default::default()
        }
    }

    pub fn with_service_tiers(mut self, tiers: Vec<ServiceTier>) -> Self {
        self.service_tiers = tiers;
        self
    }

    pub fn with_faqs(mut self, faqs: Vec<Faq>) -> Self {
        self.faqs = faqs;
        self
    }

    /// Load a fixture file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading content fixture");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a fixture from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let fixture: Fixture = serde_yaml::from_str(yaml)
            .map_err(|e| FolioError::Content(format!("Failed to parse content fixture: {}", e)))?;
        Ok(Self::new(fixture.projects)
            .with_service_tiers(fixture.service_tiers)
            .with_faqs(fixture.faqs))
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    fn summaries<F>(&self, keep: F) -> Vec<ProjectSummary>
    where
        F: Fn(&Project) -> bool,
    {
        let mut summaries: Vec<ProjectSummary> = self
            .projects
            .iter()
            .filter(|p| keep(p))
            .map(Project::summary)
            .collect();
        summaries.sort_by(|a, b| by_display_order(a.order, b.order));
        summaries
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        Ok(self
            .projects
            .iter()
            .find(|p| p.slug.current == slug)
            .cloned())
    }

    async fn related_projects(
        &self,
        category: &str,
        exclude_slug: &str,
        limit: usize,
    ) -> Result<Vec<ProjectSummary>> {
        let mut related =
            self.summaries(|p| p.category == category && p.slug.current != exclude_slug);
        related.truncate(limit);
        Ok(related)
    }

    async fn featured_projects(&self) -> Result<Vec<ProjectSummary>> {
        Ok(self.summaries(|p| p.is_featured))
    }

    async fn projects(&self) -> Result<Vec<ProjectSummary>> {
        Ok(self.summaries(|_| true))
    }

    async fn service_tiers(&self) -> Result<Vec<ServiceTier>> {
        let mut tiers = self.service_tiers.clone();
        tiers.sort_by(|a, b| by_display_order(a.order, b.order));
        Ok(tiers)
    }

    async fn faqs(&self, page: Option<FaqPage>) -> Result<Vec<Faq>> {
        let mut faqs: Vec<Faq> = self
            .faqs
            .iter()
            .filter(|faq| page.map_or(true, |page| faq.page.shows_on(page)))
            .cloned()
            .collect();
        faqs.sort_by(|a, b| by_display_order(a.order, b.order));
        Ok(faqs)
    }
}
