//! Bitmap-font text rendering for the HeatStroke engine.
//!
//! A [`FontCatalog`] parses a line-oriented bitmap font descriptor into
//! glyph metrics and a texture-page registry. [`fit_to_box`] wraps a
//! message into a bounded box, shrinking the text scale until it fits,
//! and [`build_batches`] turns the wrapped lines into one quad batch per
//! texture page. [`TextBoxView`] composes the three: it owns a message
//! and its batches, re-layouts on mutation and draws one call per batch.

pub mod camera;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod pipeline;
pub mod text_box;
pub mod utils;

pub use camera::Camera;
pub use font::{FontCatalog, FontError, GlyphMetric};
pub use geometry::{build_batches, HorizontalAlignment, TexturePageBatch, VerticalAlignment};
pub use layout::{fit_to_box, LaidOutLine, LayoutError, TextLayout, MIN_SCALE, SCALE_STEP};
pub use pipeline::{PageTexture, RenderContext, TextPipeline};
pub use text_box::{TextBoxError, TextBoxView, DEFAULT_REFERENCE_HEIGHT};
pub use utils::{Color, Position, Size, Vertex};
