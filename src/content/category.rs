//! Portfolio index filtering by category.

use super::model::ProjectSummary;

/// Categories with their own tab on the portfolio index.
pub const DEFAULT_MAIN_CATEGORIES: [&str; 3] = ["Music", "Portrait", "Travel"];

/// Which projects the portfolio index shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    /// Projects outside every main category
    Other,
    Named(String),
}

impl CategoryFilter {
    /// Parse the `category` query value; absent, blank or `all` means every project.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(v) if v.eq_ignore_ascii_case("all") => CategoryFilter::All,
            Some(v) if v.eq_ignore_ascii_case("other") => CategoryFilter::Other,
            Some(v) => CategoryFilter::Named(v.to_string()),
        }
    }

    pub fn matches(&self, category: &str, main_categories: &[String]) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Other => !main_categories.iter().any(|main| main == category),
            CategoryFilter::Named(name) => name == category,
        }
    }
}

/// Keep the projects selected by `filter`, preserving their order.
pub fn filter_projects(
    projects: Vec<ProjectSummary>,
    filter: &CategoryFilter,
    main_categories: &[String],
) -> Vec<ProjectSummary> {
    projects
        .into_iter()
        .filter(|p| filter.matches(&p.category, main_categories))
        .collect()
}
