//! Gallery layout: image classification, row composition and CDN URLs.

mod composer;
mod image;
mod url;

pub use composer::{compose_rows, layout_gallery, Frame, GalleryLayout, Row, RowKind, RowMember, Slide};
pub use image::{
    AssetMetadata, Dimensions, GalleryEntry, Hotspot, ImageAsset, ImageDescriptor, Orientation,
    VerticalPosition,
};
pub use url::ImageUrl;
