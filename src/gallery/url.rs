//! Image CDN transformation URLs.

use super::image::Hotspot;

/// Builder for an image CDN URL with transformation parameters.
///
/// Parameters are appended in the order they are set.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUrl {
    base: String,
    params: Vec<(&'static str, String)>,
}

impl ImageUrl {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            params: Vec::new(),
        }
    }

    pub fn width(self, width: u32) -> Self {
        self.param("w", width.to_string())
    }

    pub fn height(self, height: u32) -> Self {
        self.param("h", height.to_string())
    }

    /// Crop to exactly the requested box instead of fitting inside it.
    pub fn fit_crop(self) -> Self {
        self.param("fit", "crop".to_string())
    }

    /// Center crops on an editor-chosen point (fractions of width and height).
    pub fn focal_point(self, hotspot: Hotspot) -> Self {
        self.param("crop", "focalpoint".to_string())
            .param("fp-x", format_fraction(hotspot.x))
            .param("fp-y", format_fraction(hotspot.y))
    }

    /// Let the CDN negotiate the output format with the client.
    pub fn auto_format(self) -> Self {
        self.param("auto", "format".to_string())
    }

    pub fn quality(self, quality: u8) -> Self {
        self.param("q", quality.min(100).to_string())
    }

    pub fn build(&self) -> String {
        if self.params.is_empty() {
            return self.base.clone();
        }

        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.base, separator, query)
    }

    fn param(mut self, key: &'static str, value: String) -> Self {
        self.params.retain(|(k, _)| *k != key);
        self.params.push((key, value));
        self
    }
}

impl std::fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.build())
    }
}

fn format_fraction(value: f64) -> String {
    let clamped = value.clamp(0.0, 1.0);
    let rounded = (clamped * 1000.0).round() / 1000.0;
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cdn.example.com/images/p/production/abc-1400x1000.jpg";

    #[test]
    fn test_plain_url_has_no_query() {
        assert_eq!(ImageUrl::new(BASE).build(), BASE);
    }

    #[test]
    fn test_params_in_insertion_order() {
        let url = ImageUrl::new(BASE)
            .width(700)
            .height(700)
            .fit_crop()
            .auto_format()
            .quality(90)
            .build();
        assert_eq!(url, format!("{BASE}?w=700&h=700&fit=crop&auto=format&q=90"));
    }

    #[test]
    fn test_existing_query_is_extended() {
        let url = ImageUrl::new("https://cdn.example.com/a.jpg?dl=1").width(10).build();
        assert_eq!(url, "https://cdn.example.com/a.jpg?dl=1&w=10");
    }

    #[test]
    fn test_repeated_param_replaces_previous() {
        let url = ImageUrl::new(BASE).width(100).width(200).build();
        assert_eq!(url, format!("{BASE}?w=200"));
    }

    #[test]
    fn test_focal_point_is_clamped() {
        let url = ImageUrl::new(BASE)
            .focal_point(Hotspot { x: 0.25, y: 1.7 })
            .build();
        assert_eq!(url, format!("{BASE}?crop=focalpoint&fp-x=0.25&fp-y=1"));
    }
}
