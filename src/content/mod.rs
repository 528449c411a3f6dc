//! Content store access.
//!
//! Projects and their galleries live in a headless content store. The
//! service only reads from it, either over HTTP or from a local fixture.
//! Besides projects it serves the service tiers and FAQ entries shown on
//! the services and contact pages.

mod category;
mod memory;
mod model;
mod sanity;
mod store;

use std::sync::Arc;

pub use category::{filter_projects, CategoryFilter, DEFAULT_MAIN_CATEGORIES};
pub use memory::InMemoryContentStore;
pub use model::{
    Faq, FaqPage, FeaturedImage, Project, ProjectSummary, ServiceTier, Slug, DEFAULT_CTA,
};
pub use sanity::SanityClient;
pub use store::ContentStore;

use crate::config::ContentConfig;
use crate::error::{FolioError, Result};

/// Build the content store described by configuration.
///
/// A fixture path takes precedence over the hosted store.
pub fn from_config(config: &ContentConfig) -> Result<Arc<dyn ContentStore>> {
    if let Some(path) = &config.fixture_path {
        return Ok(Arc::new(InMemoryContentStore::from_file(path)?));
    }

    if config.project_id.is_some() {
        return Ok(Arc::new(SanityClient::new(config)?));
    }

    Err(FolioError::Config(
        "either content.fixture_path or content.project_id must be set".to_string(),
    ))
}
