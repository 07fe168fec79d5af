use crate::font::FontCatalog;

/// Multiplicative step between scale attempts.
pub const SCALE_STEP: f32 = 0.05;
/// Smallest scale the fitter will try before giving up.
pub const MIN_SCALE: f32 = 0.1;

/// A run of the original message that fits the box width at the chosen
/// scale, with its measured size (already scaled).
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutLine {
    pub text: String,
    pub width: f32,
    pub height: f32,
}

/// Result of a successful fit: the wrapped lines and the scale they were
/// measured at.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<LaidOutLine>,
    pub scale: f32,
}

impl TextLayout {
    /// Total stacked height of all lines, already scaled.
    pub fn total_height(&self) -> f32 {
        self.lines.iter().map(|line| line.height).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("message does not fit the box at any scale down to {MIN_SCALE}")]
    NoFit,
}

/// Fits `message` into a `box_width` x `box_height` region.
///
/// Greedy first-fit word wrap with linear scale back-off: scales from 1.0
/// down to [`MIN_SCALE`] in [`SCALE_STEP`] decrements are tried in order,
/// and the first (largest) scale at which every word fits the width and
/// the stacked lines fit the height wins. Deliberately not a binary
/// search; messages are short UI strings and the linear decrement is the
/// defined behavior.
///
/// The same inputs always produce the same lines and scale.
pub fn fit_to_box(
    message: &str,
    box_width: f32,
    box_height: f32,
    font: &FontCatalog,
) -> Result<TextLayout, LayoutError> {
    let steps = ((1.0 - MIN_SCALE) / SCALE_STEP).round() as u32;
    for step in 0..=steps {
        // Derive each candidate from the step index; repeated f32
        // subtraction would drift past the floor.
        let scale = 1.0 - SCALE_STEP * step as f32;
        if let Some(lines) = try_scale(message, box_width, box_height, font, scale) {
            return Ok(TextLayout { lines, scale });
        }
    }
    Err(LayoutError::NoFit)
}

/// Attempts a single scale. `None` when a word alone is wider than the
/// box or the stacked lines grow taller than it.
fn try_scale(
    message: &str,
    box_width: f32,
    box_height: f32,
    font: &FontCatalog,
    scale: f32,
) -> Option<Vec<LaidOutLine>> {
    let space_width = font.char_width(' ') * scale;

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0.0f32;
    let mut line_height = 0.0f32;
    let mut total_height = 0.0f32;

    for word in message.split(' ') {
        let word_width = font.string_width(word) * scale;
        let word_height = font.string_height(word) * scale;

        if word_width > box_width {
            return None;
        }

        if line.is_empty() {
            line.push_str(word);
            line_width = word_width;
            line_height = word_height;
        } else if line_width + space_width + word_width <= box_width {
            line.push(' ');
            line.push_str(word);
            line_width += space_width + word_width;
            line_height = line_height.max(word_height);
        } else {
            total_height += line_height;
            if total_height > box_height {
                return None;
            }
            lines.push(LaidOutLine {
                text: std::mem::take(&mut line),
                width: line_width,
                height: line_height,
            });
            line.push_str(word);
            line_width = word_width;
            line_height = word_height;
        }
    }

    if !line.is_empty() {
        total_height += line_height;
        if total_height > box_height {
            return None;
        }
        lines.push(LaidOutLine {
            text: line,
            width: line_width,
            height: line_height,
        });
    }

    Some(lines)
}
