//! Read-only content store interface.

use async_trait::async_trait;
use std::cmp::Ordering;

use super::model::{Faq, FaqPage, Project, ProjectSummary, ServiceTier};
use crate::error::Result;

/// Trait for content store implementations.
///
/// This abstracts over the hosted content store and the local fixture store
/// so the HTTP layer can work with either.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up a project by its slug.
    async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>>;

    /// Other projects in the same category, by ascending display order.
    async fn related_projects(
        &self,
        category: &str,
        exclude_slug: &str,
        limit: usize,
    ) -> Result<Vec<ProjectSummary>>;

    /// Projects flagged for the home page, by ascending display order.
    async fn featured_projects(&self) -> Result<Vec<ProjectSummary>>;

    /// Every project, by ascending display order.
    async fn projects(&self) -> Result<Vec<ProjectSummary>>;

    /// Service packages, by ascending display order.
    async fn service_tiers(&self) -> Result<Vec<ServiceTier>>;

    /// FAQ entries shown on `page`, or all of them, by ascending display order.
    async fn faqs(&self, page: Option<FaqPage>) -> Result<Vec<Faq>>;
}

/// Ascending display order; projects without one sort last.
pub(crate) fn by_display_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
