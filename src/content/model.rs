//! Content documents as returned by the content store.

use serde::{Deserialize, Deserializer, Serialize};

use crate::gallery::{GalleryEntry, Hotspot, ImageAsset};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

/// Cover image of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturedImage {
    #[serde(default)]
    pub asset: Option<ImageAsset>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub hotspot: Option<Hotspot>,
}

/// A portfolio project with its gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Slug,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Rich-text body, passed through untouched
    #[serde(default)]
    pub description: Option<serde_json::Value>,
    #[serde(default)]
    pub challenge: Option<serde_json::Value>,
    #[serde(default)]
    pub approach: Option<serde_json::Value>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gallery: Vec<GalleryEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(default)]
    pub order: Option<f64>,
}

impl Project {
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            category: self.category.clone(),
            excerpt: self.excerpt.clone(),
            year: self.year.clone(),
            featured_image: self.featured_image.clone(),
            order: self.order,
        }
    }
}

/// The fields of a project shown on cards and in listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Slug,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default)]
    pub order: Option<f64>,
}

/// Label used when a tier does not set its own button text.
pub const DEFAULT_CTA: &str = "Get Started";

/// A priced service package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTier {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tagline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Display price, e.g. "From €500"
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    /// Call-to-action button text
    #[serde(default = "default_cta", alias = "ctaText", deserialize_with = "cta_or_default")]
    pub cta: String,
    /// Highlighted as the most popular tier
    #[serde(default, alias = "isFeatured", deserialize_with = "null_as_default")]
    pub featured: bool,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub order: Option<f64>,
}

/// Page an FAQ entry is shown on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqPage {
    Services,
    Contact,
    #[default]
    Both,
}

impl FaqPage {
    pub fn as_str(self) -> &'static str {
        match self {
            FaqPage::Services => "services",
            FaqPage::Contact => "contact",
            FaqPage::Both => "both",
        }
    }

    /// Whether an entry tagged `self` appears on `page`.
    pub fn shows_on(self, page: FaqPage) -> bool {
        self == page || self == FaqPage::Both
    }
}

/// A frequently asked question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: FaqPage,
    #[serde(default)]
    pub order: Option<f64>,
}

fn default_cta() -> String {
    DEFAULT_CTA.to_string()
}

fn cta_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|cta| !cta.trim().is_empty())
        .unwrap_or_else(default_cta))
}

/// The store returns `null` for unset fields; treat those like absent ones.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
