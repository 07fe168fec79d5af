use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

use crate::pipeline::{PageTexture, RenderContext};

/// One bitmap-font character entry: pixel size, owning texture page and
/// the normalized UV rectangle inside that page.
///
/// The UV rectangle is derived once at parse time from the page dimensions
/// declared by the `common` record. The descriptor's Y axis grows downward
/// while UV space grows upward, so `uv_top >= uv_bottom` for every glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetric {
    pub page: u32,
    pub width: f32,
    pub height: f32,
    pub uv_left: f32,
    pub uv_right: f32,
    pub uv_top: f32,
    pub uv_bottom: f32,
}

impl GlyphMetric {
    /// Sentinel returned for unmapped characters. Zero size, so layout and
    /// geometry treat the character as invisible rather than failing.
    pub const ZERO: GlyphMetric = GlyphMetric {
        page: 0,
        width: 0.0,
        height: 0.0,
        uv_left: 0.0,
        uv_right: 0.0,
        uv_top: 0.0,
        uv_bottom: 0.0,
    };
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font descriptor {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font descriptor is empty")]
    Empty,
    #[error("line {line}: `char` record before `common`, page dimensions unknown")]
    MissingCommon { line: usize },
    #[error("line {line}: missing field `{field}`")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: field `{field}` is not a valid number")]
    InvalidValue { line: usize, field: &'static str },
    #[error("no `page` record for page id {0}")]
    UnknownPage(u32),
    #[error("failed to load page texture {path}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Parsed bitmap font: character metrics plus the registry of texture
/// pages the glyphs are packed into.
///
/// A catalog is loaded once and then shared by reference (`Rc`) across any
/// number of text boxes; it must outlive all of them. Page textures are
/// created lazily, one per distinct page id, the first time a renderer
/// asks for them, and are dropped with the catalog.
#[derive(Debug)]
pub struct FontCatalog {
    name: String,
    point_size: i32,
    glyphs: HashMap<char, GlyphMetric>,
    pages: HashMap<u32, PathBuf>,
    textures: RefCell<HashMap<u32, Rc<PageTexture>>>,
}

impl FontCatalog {
    /// Loads a font descriptor from disk. Page texture paths are resolved
    /// relative to `texture_dir`.
    pub fn load(
        descriptor_path: impl AsRef<Path>,
        texture_dir: impl AsRef<Path>,
    ) -> Result<Self, FontError> {
        let path = descriptor_path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source, texture_dir)
    }

    /// Parses a line-oriented bitmap font descriptor.
    ///
    /// Four record kinds are understood, each identified by its leading
    /// keyword: `info` (font name and point size), `common` (page pixel
    /// dimensions used to normalize UVs), `page` (page id to texture file)
    /// and `char` (one glyph). Everything else (`chars`, `kerning`, ...)
    /// is ignored. `key=value` fields tolerate variable spacing and quoted
    /// values.
    ///
    /// The `common` record must appear before the first `char` record.
    /// Conventional bitmap-font exporters always emit it first; a file
    /// that does not is rejected with [`FontError::MissingCommon`].
    pub fn parse(source: &str, texture_dir: impl AsRef<Path>) -> Result<Self, FontError> {
        if source.trim().is_empty() {
            return Err(FontError::Empty);
        }

        let texture_dir = texture_dir.as_ref();
        let mut name = String::new();
        let mut point_size = 0i32;
        let mut page_size: Option<(f32, f32)> = None;
        let mut glyphs = HashMap::new();
        let mut pages = HashMap::new();

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            let keyword = match line.split_whitespace().next() {
                Some(keyword) => keyword,
                None => continue,
            };

            match keyword {
                "info" => {
                    name = require(line, "face", line_no)?.to_string();
                    point_size = num_field(line, "size", line_no)?;
                }
                "common" => {
                    let scale_w: f32 = num_field(line, "scaleW", line_no)?;
                    let scale_h: f32 = num_field(line, "scaleH", line_no)?;
                    page_size = Some((scale_w, scale_h));
                }
                "page" => {
                    let id: u32 = num_field(line, "id", line_no)?;
                    let file = require(line, "file", line_no)?;
                    pages.insert(id, texture_dir.join(file));
                }
                "char" => {
                    let (scale_w, scale_h) =
                        page_size.ok_or(FontError::MissingCommon { line: line_no })?;
                    let id: i64 = num_field(line, "id", line_no)?;
                    let x: f32 = num_field(line, "x", line_no)?;
                    let y: f32 = num_field(line, "y", line_no)?;
                    let width: f32 = num_field(line, "width", line_no)?;
                    let height: f32 = num_field(line, "height", line_no)?;
                    let page: u32 = num_field(line, "page", line_no)?;
                    // xoffset/yoffset/xadvance/chnl are present in the
                    // format but not used by the box layout.

                    // Exporters use id=-1 for the invalid-glyph slot.
                    let ch = match u32::try_from(id).ok().and_then(char::from_u32) {
                        Some(ch) => ch,
                        None => continue,
                    };

                    glyphs.insert(
                        ch,
                        GlyphMetric {
                            page,
                            width,
                            height,
                            uv_left: x / scale_w,
                            uv_right: (x + width) / scale_w,
                            uv_top: (scale_h - y) / scale_h,
                            uv_bottom: (scale_h - (y + height)) / scale_h,
                        },
                    );
                }
                _ => {}
            }
        }

        Ok(Self {
            name,
            point_size,
            glyphs,
            pages,
            textures: RefCell::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn point_size(&self) -> i32 {
        self.point_size
    }

    /// Metric for `c`, or [`GlyphMetric::ZERO`] when the font has no entry
    /// for it. Callers treat zero width as "invisible glyph".
    pub fn mapping(&self, c: char) -> GlyphMetric {
        self.glyphs.get(&c).copied().unwrap_or(GlyphMetric::ZERO)
    }

    pub fn char_width(&self, c: char) -> f32 {
        self.mapping(c).width
    }

    pub fn char_height(&self, c: char) -> f32 {
        self.mapping(c).height
    }

    /// Texture page holding `c`, or `None` for unmapped characters.
    pub fn page_for_char(&self, c: char) -> Option<u32> {
        self.glyphs.get(&c).map(|glyph| glyph.page)
    }

    /// Unscaled pixel width of `text`: the sum of its character widths.
    pub fn string_width(&self, text: &str) -> f32 {
        text.chars().map(|c| self.char_width(c)).sum()
    }

    /// Unscaled height of `text`: the tallest of its character heights.
    pub fn string_height(&self, text: &str) -> f32 {
        text.chars().map(|c| self.char_height(c)).fold(0.0, f32::max)
    }

    pub fn page_path(&self, page: u32) -> Option<&Path> {
        self.pages.get(&page).map(PathBuf::as_path)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// GPU texture for a page, created on first use and cached for the
    /// lifetime of the catalog. Batches hold `Rc` clones, so a page
    /// texture is released exactly once: when the catalog and every batch
    /// referencing it are gone.
    pub fn page_texture(
        &self,
        page: u32,
        ctx: &RenderContext,
    ) -> Result<Rc<PageTexture>, FontError> {
        if let Some(texture) = self.textures.borrow().get(&page) {
            return Ok(texture.clone());
        }
        let path = self.pages.get(&page).ok_or(FontError::UnknownPage(page))?;
        let texture = Rc::new(PageTexture::from_file(ctx, path)?);
        self.textures.borrow_mut().insert(page, texture.clone());
        Ok(texture)
    }
}

/// Finds `key=value` in a record line, returning the raw value with any
/// surrounding quotes stripped. Quoted values may contain spaces.
fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let mut search = 0;
    while let Some(offset) = line[search..].find(key) {
        let at = search + offset;
        let rest = &line[at + key.len()..];
        let boundary = at == 0 || line[..at].ends_with(char::is_whitespace);
        if boundary && rest.starts_with('=') {
            let value = &rest[1..];
            return Some(match value.strip_prefix('"') {
                Some(quoted) => &quoted[..quoted.find('"').unwrap_or(quoted.len())],
                None => value.split_whitespace().next().unwrap_or(""),
            });
        }
        search = at + key.len();
    }
    None
}

fn require<'a>(line: &'a str, key: &'static str, line_no: usize) -> Result<&'a str, FontError> {
    field(line, key).ok_or(FontError::MissingField {
        line: line_no,
        field: key,
    })
}

fn num_field<T: FromStr>(line: &str, key: &'static str, line_no: usize) -> Result<T, FontError> {
    require(line, key, line_no)?
        .parse()
        .map_err(|_| FontError::InvalidValue {
            line: line_no,
            field: key,
        })
}
