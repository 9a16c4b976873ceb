//! Font discovery and text shaping.
//!
//! [`FontBook`] indexes font files found on disk, [`TextLayoutEngine`] shapes strings with Parley
//! and [`TextKit`] bundles both for the renderers. When no usable font exists the kit still works;
//! every layout request simply yields `None` and callers omit the text.

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use crate::{
    assets::color::Rgba8,
    foundation::error::{RenderError, RenderResult},
};

/// Well-known install locations searched after the configured directories.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Families tried, in order, when the branding font is missing.
const FALLBACK_FAMILIES: &[&str] = &[
    "dejavusans",
    "liberationsans",
    "notosans",
    "opensans",
    "roboto",
    "arial",
    "helvetica",
];

const MAX_SCAN_DEPTH: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Clone, Debug)]
struct FontFile {
    path: PathBuf,
    /// Lowercase alphanumeric file stem, e.g. `opensansbold`.
    key: String,
}

/// Index of font files by normalized file name.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    files: Vec<FontFile>,
}

impl FontBook {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan `dirs` and then the platform font directories.
    pub fn discover(dirs: &[PathBuf]) -> Self {
        let mut all: Vec<PathBuf> = dirs.to_vec();
        all.extend(SYSTEM_FONT_DIRS.iter().map(PathBuf::from));
        if let Some(home) = std::env::var_os("HOME") {
            all.push(Path::new(&home).join(".fonts"));
            all.push(Path::new(&home).join(".local/share/fonts"));
        }
        Self::scan(&all)
    }

    /// Scan only `dirs` (recursively).
    pub fn scan(dirs: &[PathBuf]) -> Self {
        let mut files = Vec::new();
        for dir in dirs {
            collect_font_files(dir, 0, &mut files);
        }
        tracing::debug!(count = files.len(), "indexed font files");
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Font files ordered by how well they match `family` and `weight`.
    ///
    /// Files of the requested family come first, then the fallback families, then everything else.
    pub fn candidates(&self, family: &str, weight: FontWeight) -> Vec<&Path> {
        let wanted = normalize_family(family);
        let mut scored: Vec<((usize, u8, usize), &FontFile)> = self
            .files
            .iter()
            .map(|f| {
                let family_rank = if !wanted.is_empty() && f.key.starts_with(&wanted) {
                    0
                } else {
                    FALLBACK_FAMILIES
                        .iter()
                        .position(|fb| f.key.starts_with(fb))
                        .map_or(FALLBACK_FAMILIES.len() + 1, |i| i + 1)
                };
                ((family_rank, style_penalty(&f.key, weight), f.key.len()), f)
            })
            .collect();
        scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.path.cmp(&b.1.path)));
        scored.into_iter().map(|(_, f)| f.path.as_path()).collect()
    }

    /// Bytes of the best readable match, if any.
    pub fn load(&self, family: &str, weight: FontWeight) -> Option<(PathBuf, Vec<u8>)> {
        for path in self.candidates(family, weight) {
            match std::fs::read(path) {
                Ok(bytes) => return Some((path.to_path_buf(), bytes)),
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping unreadable font"),
            }
        }
        None
    }
}

fn collect_font_files(dir: &Path, depth: usize, out: &mut Vec<FontFile>) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = rd.flatten().map(|e| e.path()).collect();
    paths.sort();
    for path in paths {
        if path.is_dir() {
            collect_font_files(&path, depth + 1, out);
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let key = normalize_family(stem);
        out.push(FontFile { path, key });
    }
}

fn normalize_family(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn style_penalty(key: &str, weight: FontWeight) -> u8 {
    const ODD_STYLES: &[&str] = &[
        "italic", "oblique", "light", "thin", "black", "condensed", "mono", "extra", "semi",
        "medium",
    ];
    let odd = ODD_STYLES.iter().filter(|s| key.contains(*s)).count() as u8;
    let bold = key.contains("bold");
    match weight {
        FontWeight::Regular => odd * 2 + u8::from(bold) * 4,
        FontWeight::Bold => odd * 2 + u8::from(!bold) * 4,
    }
}

/// A font registered with a [`TextLayoutEngine`], ready for shaping and drawing.
#[derive(Clone)]
pub struct Typeface {
    /// Family name as reported by the font's name table.
    pub family: String,
    /// Glyph source for the rasterizer.
    pub font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

/// Shaped text plus the font needed to draw it.
pub struct TextBlock {
    pub layout: parley::Layout<Rgba8>,
    pub font: vello_cpu::peniko::FontData,
}

impl TextBlock {
    pub fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    pub fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }
}

/// Stateful helper for building Parley text layouts.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register raw font bytes and resolve their family name.
    pub fn register(&mut self, font_bytes: Vec<u8>) -> RenderResult<Typeface> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| RenderError::resource("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RenderError::resource("registered font family has no name"))?
            .to_string();

        Ok(Typeface {
            family,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
        })
    }

    /// Shape and lay out plain text, wrapping at `max_width_px` when given.
    pub fn layout(
        &mut self,
        face: &Typeface,
        text: &str,
        size_px: f32,
        brush: Rgba8,
        max_width_px: Option<f32>,
    ) -> RenderResult<TextBlock> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(RenderError::validation("text size_px must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(max_width_px);
        layout.align(
            max_width_px,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        Ok(TextBlock {
            layout,
            font: face.font.clone(),
        })
    }
}

/// Requested look of one text element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub color: Rgba8,
    pub weight: FontWeight,
    pub max_width_px: Option<f32>,
}

impl TextStyle {
    pub fn new(size_px: f64, color: Rgba8) -> Self {
        Self {
            size_px: size_px as f32,
            color,
            weight: FontWeight::Regular,
            max_width_px: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn wrap_at(mut self, max_width_px: f64) -> Self {
        self.max_width_px = Some(max_width_px.max(1.0) as f32);
        self
    }
}

/// A resolved face with its own layout engine.
///
/// Faces of one family share a family name, so each face is shaped in a font context that holds
/// only that face. The glyphs Parley picks then always come from the font that draws them.
struct Face {
    engine: TextLayoutEngine,
    typeface: Typeface,
}

/// Per-render text toolkit: the resolved regular and bold faces.
pub struct TextKit {
    regular: Option<Face>,
    bold: Option<Face>,
}

impl TextKit {
    /// Resolve the branding `family` (or a fallback) from `book`.
    ///
    /// Logs a single warning when no font can be used at all.
    pub fn load(book: &FontBook, family: &str) -> Self {
        let resolve = |weight: FontWeight| -> Option<Face> {
            let (path, bytes) = book.load(family, weight)?;
            let mut engine = TextLayoutEngine::new();
            match engine.register(bytes) {
                Ok(typeface) => {
                    tracing::debug!(path = %path.display(), family = %typeface.family, ?weight, "resolved font");
                    Some(Face { engine, typeface })
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "font registration failed");
                    None
                }
            }
        };
        let regular = resolve(FontWeight::Regular);
        let bold = resolve(FontWeight::Bold);
        if regular.is_none() && bold.is_none() {
            tracing::warn!(
                requested = family,
                "no usable font found, text will be omitted from this render"
            );
        }
        Self { regular, bold }
    }

    /// Kit that never produces text.
    pub fn without_fonts() -> Self {
        Self {
            regular: None,
            bold: None,
        }
    }

    pub fn has_fonts(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    /// Lay out `text`; `None` when the text is blank or no font is available.
    pub fn layout(&mut self, text: &str, style: TextStyle) -> RenderResult<Option<TextBlock>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let face = match style.weight {
            FontWeight::Regular => self.regular.as_mut().or(self.bold.as_mut()),
            FontWeight::Bold => self.bold.as_mut().or(self.regular.as_mut()),
        };
        let Some(face) = face else {
            return Ok(None);
        };
        face.engine
            .layout(&face.typeface, text, style.size_px, style.color, style.max_width_px)
            .map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
