use crate::font::FontCatalog;
use crate::layout::TextLayout;
use crate::utils::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,   // Text starts from left edge
    Center, // Text is centered horizontally
    Right,  // Text ends at right edge
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,    // Text starts from top edge
    Middle, // Text is centered vertically
    Bottom, // Text ends at bottom edge
}

/// Quad geometry for every glyph of the current message that lives on one
/// texture page: one draw call's worth of vertices and indices.
///
/// Rebuilt in full whenever text, size or alignment changes; batch count
/// always equals the number of distinct pages the visible characters
/// actually touch, not the font's total page count.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePageBatch {
    pub page: u32,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl TexturePageBatch {
    fn new(page: u32) -> Self {
        Self {
            page,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Converts laid-out lines into per-page quad batches.
///
/// Geometry is emitted in box-local coordinates: the box's top-left corner
/// is the origin and y grows upward, so glyphs extend into negative y.
/// Each visible glyph becomes four vertices (TL, BL, BR, TR) and six
/// indices (TL,BL,BR / TL,BR,TR, both CCW). Spaces advance the cursor by
/// the scaled space width without emitting geometry; zero-width glyphs
/// (unmapped characters) emit nothing and advance nothing.
///
/// Indices are `u16`, so a batch holds at most 16 384 glyphs; glyphs past
/// that still advance the cursor but emit no geometry.
///
/// The center and right horizontal offsets intentionally use different
/// scale factors; see DESIGN.md.
pub fn build_batches(
    layout: &TextLayout,
    box_width: f32,
    box_height: f32,
    h_align: HorizontalAlignment,
    v_align: VerticalAlignment,
    font: &FontCatalog,
) -> Vec<TexturePageBatch> {
    let scale = layout.scale;
    let space_width = font.char_width(' ') * scale;
    let total_height = layout.total_height();

    // One vertical offset for the whole block.
    let v_offset = match v_align {
        VerticalAlignment::Top => 0.0,
        VerticalAlignment::Middle => -(scale / 2.0) * (box_height - total_height),
        VerticalAlignment::Bottom => -scale * (box_height - total_height),
    };

    let mut batches: Vec<TexturePageBatch> = Vec::new();
    let mut cursor_y = 0.0f32;

    for line in &layout.lines {
        let x_offset = match h_align {
            HorizontalAlignment::Left => 0.0,
            HorizontalAlignment::Center => (scale / 2.0) * (box_width - line.width),
            HorizontalAlignment::Right => scale * (box_width - line.width),
        };

        let mut cursor_x = x_offset;
        let top = cursor_y + v_offset;

        for c in line.text.chars() {
            if c == ' ' {
                cursor_x += space_width;
                continue;
            }

            let glyph = font.mapping(c);
            if glyph.width <= 0.0 {
                continue;
            }

            let width = glyph.width * scale;
            let height = glyph.height * scale;

            // Linear search keyed by page id: deterministic, and page
            // counts are tiny. Batch order is first-encounter order.
            let batch = match batches.iter_mut().position(|b| b.page == glyph.page) {
                Some(index) => &mut batches[index],
                None => {
                    batches.push(TexturePageBatch::new(glyph.page));
                    batches.last_mut().unwrap()
                }
            };

            // u16 index space caps a batch at 16 384 glyphs.
            if batch.vertices.len() + 4 > usize::from(u16::MAX) + 1 {
                cursor_x += width;
                continue;
            }

            let base = batch.vertices.len() as u16;
            batch.vertices.extend_from_slice(&[
                Vertex {
                    position: [cursor_x, top, 0.0],
                    tex_coords: [glyph.uv_left, glyph.uv_top],
                },
                Vertex {
                    position: [cursor_x, top - height, 0.0],
                    tex_coords: [glyph.uv_left, glyph.uv_bottom],
                },
                Vertex {
                    position: [cursor_x + width, top - height, 0.0],
                    tex_coords: [glyph.uv_right, glyph.uv_bottom],
                },
                Vertex {
                    position: [cursor_x + width, top, 0.0],
                    tex_coords: [glyph.uv_right, glyph.uv_top],
                },
            ]);
            batch
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

            cursor_x += width;
        }

        cursor_y -= line.height;
    }

    batches
}
