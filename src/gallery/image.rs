//! Gallery image records and the descriptors derived from them.

use serde::{Deserialize, Serialize};

/// Pixel dimensions reported by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

/// An uploaded image asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "_id")]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub metadata: Option<AssetMetadata>,
}

impl ImageAsset {
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.metadata.as_ref().and_then(|m| m.dimensions)
    }
}

/// Editor-chosen focal point, as fractions of width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
}

/// One item of a project gallery as stored in the content store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub asset: Option<ImageAsset>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub vertical_position: Option<String>,
    #[serde(default)]
    pub hotspot: Option<Hotspot>,
}

impl GalleryEntry {
    /// Alt text, treating an empty string as absent.
    pub fn alt_text(&self) -> Option<&str> {
        self.alt.as_deref().map(str::trim).filter(|alt| !alt.is_empty())
    }
}

/// Portrait or landscape classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide
    Vertical,
    /// Wider than tall, or square
    Horizontal,
}

/// Side a vertical image takes when paired with a horizontal one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPosition {
    #[default]
    Left,
    Right,
}

impl VerticalPosition {
    /// Parse the editor hint; anything but `right` means left.
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint.map(str::trim) {
            Some(h) if h.eq_ignore_ascii_case("right") => VerticalPosition::Right,
            _ => VerticalPosition::Left,
        }
    }
}

/// An image ready for row composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    /// Stable id, unique within the gallery
    pub id: String,
    /// Source URL on the image CDN
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Alt text, falling back to "{title} - Image {n}"
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub vertical_position: VerticalPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotspot: Option<Hotspot>,
    /// Position in the unfiltered gallery
    pub source_position: usize,
    /// Both dimensions were reported and non-zero
    pub measured: bool,
}

impl ImageDescriptor {
    /// Build a descriptor from a gallery entry.
    ///
    /// Returns `None` for entries without an asset. Unless both dimensions
    /// are known and non-zero the image is treated as 1×1.
    pub fn from_entry(title: &str, position: usize, entry: &GalleryEntry) -> Option<Self> {
        let asset = entry.asset.as_ref()?;
        let measured = asset
            .dimensions()
            .filter(|d| d.width > 0 && d.height > 0);

        let alt = match entry.alt_text() {
            Some(alt) => alt.to_string(),
            None => format!("{} - Image {}", title, position + 1),
        };

        Some(Self {
            id: entry.key.clone().unwrap_or_else(|| asset.id.clone()),
            url: asset.url.clone(),
            width: measured.map_or(1, |d| d.width),
            height: measured.map_or(1, |d| d.height),
            alt,
            caption: entry.caption.clone(),
            vertical_position: VerticalPosition::from_hint(entry.vertical_position.as_deref()),
            hotspot: entry.hotspot,
            source_position: position,
            measured: measured.is_some(),
        })
    }

    pub fn orientation(&self) -> Orientation {
        if self.height > self.width {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation() == Orientation::Vertical
    }

    /// Images with unknown dimensions always get a row of their own.
    pub fn is_pairable(&self) -> bool {
        self.measured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(width: Option<u32>, height: Option<u32>) -> GalleryEntry {
        let metadata = match (width, height) {
            (Some(width), Some(height)) => Some(AssetMetadata {
                dimensions: Some(Dimensions { width, height }),
            }),
            _ => None,
        };
        GalleryEntry {
            key: Some("k1".to_string()),
            asset: Some(ImageAsset {
                id: "image-abc".to_string(),
                url: "https://cdn.example.com/abc.jpg".to_string(),
                metadata,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_entry_without_asset_is_skipped() {
        let entry = GalleryEntry::default();
        assert!(ImageDescriptor::from_entry("Show", 0, &entry).is_none());
    }

    #[test]
    fn test_orientation_from_dimensions() {
        let portrait = ImageDescriptor::from_entry("Show", 0, &entry(Some(800), Some(1200))).unwrap();
        assert_eq!(portrait.orientation(), Orientation::Vertical);

        let landscape = ImageDescriptor::from_entry("Show", 0, &entry(Some(1200), Some(800))).unwrap();
        assert_eq!(landscape.orientation(), Orientation::Horizontal);

        let square = ImageDescriptor::from_entry("Show", 0, &entry(Some(900), Some(900))).unwrap();
        assert_eq!(square.orientation(), Orientation::Horizontal);
    }

    #[test]
    fn test_missing_or_zero_dimensions_make_a_square() {
        let missing = ImageDescriptor::from_entry("Show", 0, &entry(None, None)).unwrap();
        assert_eq!((missing.width, missing.height), (1, 1));
        assert!(!missing.is_vertical());
        assert!(!missing.is_pairable());

        let zero = ImageDescriptor::from_entry("Show", 0, &entry(Some(0), Some(0))).unwrap();
        assert_eq!((zero.width, zero.height), (1, 1));
        assert!(!zero.is_vertical());
        assert!(!zero.is_pairable());

        let half = ImageDescriptor::from_entry("Show", 0, &entry(Some(0), Some(900))).unwrap();
        assert_eq!((half.width, half.height), (1, 1));
        assert!(!half.is_vertical());
        assert!(!half.is_pairable());

        let measured = ImageDescriptor::from_entry("Show", 0, &entry(Some(10), Some(20))).unwrap();
        assert!(measured.is_pairable());
    }

    #[test]
    fn test_alt_fallback_uses_source_position() {
        let descriptor = ImageDescriptor::from_entry("Night Show", 4, &entry(None, None)).unwrap();
        assert_eq!(descriptor.alt, "Night Show - Image 5");

        let mut with_alt = entry(None, None);
        with_alt.alt = Some("Crowd surfing".to_string());
        let descriptor = ImageDescriptor::from_entry("Night Show", 4, &with_alt).unwrap();
        assert_eq!(descriptor.alt, "Crowd surfing");
    }

    #[test]
    fn test_id_prefers_entry_key() {
        let mut e = entry(None, None);
        assert_eq!(ImageDescriptor::from_entry("t", 0, &e).unwrap().id, "k1");
        e.key = None;
        assert_eq!(ImageDescriptor::from_entry("t", 0, &e).unwrap().id, "image-abc");
    }

    #[test]
    fn test_vertical_position_hint() {
        assert_eq!(VerticalPosition::from_hint(None), VerticalPosition::Left);
        assert_eq!(VerticalPosition::from_hint(Some("right")), VerticalPosition::Right);
        assert_eq!(VerticalPosition::from_hint(Some(" Right ")), VerticalPosition::Right);
        assert_eq!(VerticalPosition::from_hint(Some("center")), VerticalPosition::Left);
    }

    #[test]
    fn test_entry_deserializes_from_store_shape() {
        let json = r#"{
            "_key": "a1",
            "asset": {
                "_id": "image-1",
                "url": "https://cdn.example.com/1.jpg",
                "metadata": { "dimensions": { "width": 2000, "height": 3000 } }
            },
            "alt": "Stage left",
            "verticalPosition": "right",
            "hotspot": { "x": 0.5, "y": 0.3, "width": 0.2, "height": 0.2 }
        }"#;
        let entry: GalleryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.vertical_position.as_deref(), Some("right"));
        assert_eq!(
            entry.asset.as_ref().and_then(|a| a.dimensions()),
            Some(Dimensions { width: 2000, height: 3000 })
        );
        assert_eq!(entry.hotspot, Some(Hotspot { x: 0.5, y: 0.3 }));
    }
}
