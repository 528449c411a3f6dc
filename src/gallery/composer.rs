//! Gallery row composition.
//!
//! Images are laid out in a single greedy left-to-right pass. A vertical image
//! looks one image ahead and pairs with it; a horizontal image always gets a
//! full-width row of its own, and so does any image whose dimensions are
//! unknown. Consumed images are never revisited, so the output is
//! deterministic but not an optimal packing.

use serde::Serialize;

use super::image::{GalleryEntry, ImageDescriptor, Orientation, VerticalPosition};
use super::url::ImageUrl;

/// Quality used for in-page gallery images.
const ROW_QUALITY: u8 = 90;
/// Width and quality used for full-screen viewer slides.
const SLIDE_WIDTH: u32 = 2000;
const SLIDE_QUALITY: u8 = 95;

/// Render box for one image slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Crop to the box rather than fit inside it
    pub crop: bool,
    /// Share of the row width taken by this slot
    pub column_percent: u8,
}

impl Frame {
    /// Lone vertical image.
    pub const SINGLE_TALL: Frame = Frame::new(1400, 2000, false, 100);
    /// Lone horizontal image.
    pub const SINGLE_WIDE: Frame = Frame::new(1400, 1000, false, 100);
    /// Each half of a vertical pair; the row is 700 px tall.
    pub const PAIR_SQUARE: Frame = Frame::new(700, 700, true, 50);
    /// Narrow column of a mixed pair.
    pub const MIXED_VERTICAL: Frame = Frame::new(700, 1050, false, 35);
    /// Wide column of a mixed pair.
    pub const MIXED_HORIZONTAL: Frame = Frame::new(1300, 867, false, 65);

    const fn new(width: u32, height: u32, crop: bool, column_percent: u8) -> Self {
        Self {
            width,
            height,
            crop,
            column_percent,
        }
    }

    /// CDN URL for `image` sized to this frame.
    pub fn src(&self, image: &ImageDescriptor) -> String {
        let mut url = ImageUrl::new(&image.url).width(self.width);
        if self.crop {
            url = url.height(self.height).fit_crop();
            if let Some(hotspot) = image.hotspot {
                url = url.focal_point(hotspot);
            }
        }
        url.auto_format().quality(ROW_QUALITY).build()
    }
}

/// An image placed in a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowMember {
    /// Flat display index, matching the viewer slide order
    pub index: usize,
    pub frame: Frame,
    pub src: String,
    pub image: ImageDescriptor,
}

impl RowMember {
    fn place(index: usize, image: &ImageDescriptor, frame: Frame) -> Self {
        Self {
            index,
            frame,
            src: frame.src(image),
            image: image.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    Single,
    VerticalPair,
    MixedPair,
}

/// One horizontal band of the gallery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Row {
    /// One image across the full width
    Single { member: RowMember },
    /// Two vertical images at equal width
    VerticalPair {
        first: RowMember,
        second: RowMember,
    },
    /// A vertical image beside a horizontal one
    MixedPair {
        vertical: RowMember,
        horizontal: RowMember,
        #[serde(rename = "verticalSide")]
        vertical_side: VerticalPosition,
    },
}

impl Row {
    pub fn kind(&self) -> RowKind {
        match self {
            Row::Single { .. } => RowKind::Single,
            Row::VerticalPair { .. } => RowKind::VerticalPair,
            Row::MixedPair { .. } => RowKind::MixedPair,
        }
    }

    /// Members in the order they were consumed from the input.
    pub fn members(&self) -> Vec<&RowMember> {
        match self {
            Row::Single { member } => vec![member],
            Row::VerticalPair { first, second } => vec![first, second],
            Row::MixedPair {
                vertical,
                horizontal,
                ..
            } => vec![vertical, horizontal],
        }
    }

    /// Members in on-screen order, left to right.
    pub fn render_order(&self) -> Vec<&RowMember> {
        match self {
            Row::MixedPair {
                vertical,
                horizontal,
                vertical_side: VerticalPosition::Right,
            } => vec![horizontal, vertical],
            _ => self.members(),
        }
    }
}

/// Compose rows from images that all have an asset.
///
/// Display indices are positions in `images`.
pub fn compose_rows(images: &[ImageDescriptor]) -> Vec<Row> {
    let mut rows = Vec::with_capacity(images.len());
    let mut i = 0;

    while i < images.len() {
        let current = &images[i];
        let partner = images
            .get(i + 1)
            .filter(|next| current.is_pairable() && next.is_pairable());

        match (current.orientation(), partner) {
            (Orientation::Vertical, Some(next)) if next.is_vertical() => {
                rows.push(Row::VerticalPair {
                    first: RowMember::place(i, current, Frame::PAIR_SQUARE),
                    second: RowMember::place(i + 1, next, Frame::PAIR_SQUARE),
                });
                i += 2;
            }
            (Orientation::Vertical, Some(next)) => {
                rows.push(Row::MixedPair {
                    vertical: RowMember::place(i, current, Frame::MIXED_VERTICAL),
                    horizontal: RowMember::place(i + 1, next, Frame::MIXED_HORIZONTAL),
                    vertical_side: current.vertical_position,
                });
                i += 2;
            }
            (Orientation::Vertical, None) => {
                rows.push(Row::Single {
                    member: RowMember::place(i, current, Frame::SINGLE_TALL),
                });
                i += 1;
            }
            (Orientation::Horizontal, _) => {
                rows.push(Row::Single {
                    member: RowMember::place(i, current, Frame::SINGLE_WIDE),
                });
                i += 1;
            }
        }
    }

    rows
}

/// A full-screen viewer slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub index: usize,
    pub src: String,
    pub alt: String,
}

/// Rows plus the viewer slides they index into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryLayout {
    pub rows: Vec<Row>,
    pub slides: Vec<Slide>,
}

impl GalleryLayout {
    /// Number of displayed images.
    pub fn image_count(&self) -> usize {
        self.slides.len()
    }
}

/// Lay out a project gallery.
///
/// Entries without an asset are dropped before indexing and never consume a
/// display index.
pub fn layout_gallery(title: &str, entries: &[GalleryEntry]) -> GalleryLayout {
    let images: Vec<ImageDescriptor> = entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| ImageDescriptor::from_entry(title, position, entry))
        .collect();

    let slides = images
        .iter()
        .enumerate()
        .map(|(index, image)| Slide {
            index,
            src: ImageUrl::new(&image.url)
                .width(SLIDE_WIDTH)
                .auto_format()
                .quality(SLIDE_QUALITY)
                .build(),
            alt: entries[image.source_position]
                .alt_text()
                .unwrap_or(title)
                .to_string(),
        })
        .collect();

    GalleryLayout {
        rows: compose_rows(&images),
        slides,
    }
}
