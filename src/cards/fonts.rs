//! Font resolution and text painting for transition cards.
//!
//! Fonts are looked up through an ordered list of [`FontSource`]s; the first
//! one that loads wins. The list always ends in the built-in 8x8 bitmap face,
//! so resolution itself never fails.

use std::path::{Path, PathBuf};

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use fontdue::{Font, FontSettings};
use tracing::debug;

use crate::cards::canvas::Canvas;

/// One place a face can come from
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    /// A TrueType/OpenType file (collections use their first face)
    File(PathBuf),
    /// The built-in bitmap face
    Builtin,
}

impl FontSource {
    /// File candidates in order, followed by the built-in face
    pub fn chain(paths: &[PathBuf]) -> Vec<FontSource> {
        paths
            .iter()
            .cloned()
            .map(FontSource::File)
            .chain(std::iter::once(FontSource::Builtin))
            .collect()
    }

    fn load(&self) -> Option<Face> {
        match self {
            Self::File(path) => load_truetype(path),
            Self::Builtin => Some(Face::Builtin),
        }
    }
}

fn load_truetype(path: &Path) -> Option<Face> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => {
            debug!("Font not found: {}", path.display());
            return None;
        }
    };

    match Font::from_bytes(bytes, FontSettings::default()) {
        Ok(font) => Some(Face::TrueType {
            font: Box::new(font),
            origin: path.to_path_buf(),
        }),
        Err(reason) => {
            debug!("Font {} could not be parsed: {}", path.display(), reason);
            None
        }
    }
}

/// Vertical metrics of a line, both measured as positive distances from the baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// Ink bounds of a string relative to its origin (line top-left, baseline at `ascent`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

struct Glyph {
    width: usize,
    height: usize,
    /// Horizontal offset of the bitmap from the pen position
    xmin: i32,
    /// Offset of the bitmap's bottom edge above the baseline
    ymin: i32,
    advance: f32,
    coverage: Vec<u8>,
}

/// A resolved face
pub enum Face {
    TrueType { font: Box<Font>, origin: PathBuf },
    Builtin,
}

impl Face {
    /// Try `sources` in order and return the first face that loads
    pub fn resolve(sources: &[FontSource]) -> Face {
        for source in sources {
            if let Some(face) = source.load() {
                debug!("Using font {}", face.name());
                return face;
            }
        }
        Face::Builtin
    }

    /// Resolve from file candidates, falling back to the built-in face
    pub fn from_candidates(paths: &[PathBuf]) -> Face {
        Self::resolve(&FontSource::chain(paths))
    }

    pub fn name(&self) -> String {
        match self {
            Self::TrueType { origin, .. } => origin.display().to_string(),
            Self::Builtin => "built-in 8x8".to_string(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }

    fn bitmap_scale(px: f32) -> usize {
        ((px / 8.0).round() as usize).max(1)
    }

    pub fn line_metrics(&self, px: f32) -> LineMetrics {
        match self {
            Self::TrueType { font, .. } => font
                .horizontal_line_metrics(px)
                .map(|m| LineMetrics {
                    ascent: m.ascent,
                    descent: -m.descent,
                })
                .unwrap_or(LineMetrics {
                    ascent: px * 0.8,
                    descent: px * 0.2,
                }),
            Self::Builtin => {
                let scale = Self::bitmap_scale(px) as f32;
                LineMetrics {
                    ascent: 7.0 * scale,
                    descent: scale,
                }
            }
        }
    }

    fn glyph(&self, ch: char, px: f32) -> Glyph {
        match self {
            Self::TrueType { font, .. } => {
                if font.lookup_glyph_index(ch) == 0 && !ch.is_whitespace() {
                    return Glyph::blank(px * 0.5);
                }
                let (metrics, coverage) = font.rasterize(ch, px);
                Glyph {
                    width: metrics.width,
                    height: metrics.height,
                    xmin: metrics.xmin,
                    ymin: metrics.ymin,
                    advance: metrics.advance_width,
                    coverage,
                }
            }
            Self::Builtin => {
                let scale = Self::bitmap_scale(px);
                let rows = BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch));
                match rows {
                    Some(rows) => Glyph::from_bitmap(&rows, scale),
                    None => Glyph::blank((8 * scale) as f32),
                }
            }
        }
    }

    /// Ink bounds of `text` at `px`, measured from the line's top-left corner
    pub fn measure(&self, text: &str, px: f32) -> TextBox {
        let baseline = self.line_metrics(px).ascent.round() as i32;
        let mut pen = 0.0f32;
        let mut bounds: Option<TextBox> = None;

        for ch in text.chars() {
            let glyph = self.glyph(ch, px);
            if glyph.width > 0 && glyph.height > 0 {
                let left = pen.round() as i32 + glyph.xmin;
                let top = baseline - (glyph.ymin + glyph.height as i32);
                let ink = TextBox {
                    left,
                    top,
                    right: left + glyph.width as i32,
                    bottom: top + glyph.height as i32,
                };
                bounds = Some(match bounds {
                    Some(b) => TextBox {
                        left: b.left.min(ink.left),
                        top: b.top.min(ink.top),
                        right: b.right.max(ink.right),
                        bottom: b.bottom.max(ink.bottom),
                    },
                    None => ink,
                });
            }
            pen += glyph.advance;
        }

        bounds.unwrap_or_default()
    }

    /// Paint `text` with its line's top-left corner at (`x`, `y`)
    pub fn draw(&self, canvas: &mut Canvas, text: &str, px: f32, x: i64, y: i64, color: [u8; 3]) {
        let baseline = y + self.line_metrics(px).ascent.round() as i64;
        let mut pen = x as f32;

        for ch in text.chars() {
            let glyph = self.glyph(ch, px);
            let left = pen.round() as i64 + glyph.xmin as i64;
            let top = baseline - (glyph.ymin as i64 + glyph.height as i64);

            for row in 0..glyph.height {
                for col in 0..glyph.width {
                    let coverage = glyph.coverage[row * glyph.width + col];
                    canvas.blend(left + col as i64, top + row as i64, color, coverage);
                }
            }
            pen += glyph.advance;
        }
    }
}

impl Glyph {
    fn blank(advance: f32) -> Self {
        Self {
            width: 0,
            height: 0,
            xmin: 0,
            ymin: 0,
            advance,
            coverage: Vec::new(),
        }
    }

    /// Scale an 8x8 bitmap (row 7 sits below the baseline, bit 0 is the leftmost column)
    fn from_bitmap(rows: &[u8; 8], scale: usize) -> Self {
        let advance = (8 * scale) as f32;
        let lit_rows: Vec<usize> = (0..8).filter(|&r| rows[r] != 0).collect();
        let (Some(&first_row), Some(&last_row)) = (lit_rows.first(), lit_rows.last()) else {
            return Self::blank(advance);
        };

        let mask = rows.iter().fold(0u8, |acc, row| acc | row);
        let first_col = mask.trailing_zeros() as usize;
        let last_col = 7 - mask.leading_zeros() as usize;

        let width = (last_col - first_col + 1) * scale;
        let height = (last_row - first_row + 1) * scale;
        let mut coverage = vec![0u8; width * height];
        for y in 0..height {
            let bits = rows[first_row + y / scale];
            for x in 0..width {
                if bits >> (first_col + x / scale) & 1 == 1 {
                    coverage[y * width + x] = 255;
                }
            }
        }

        Self {
            width,
            height,
            xmin: (first_col * scale) as i32,
            ymin: (6 - last_row as i32) * scale as i32,
            advance,
            coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_fall_back_to_builtin() {
        let face = Face::from_candidates(&[
            PathBuf::from("/definitely/not/here.ttf"),
            PathBuf::from("also-missing.ttc"),
        ]);
        assert!(face.is_builtin());
    }

    #[test]
    fn test_unparseable_font_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();

        let face = Face::resolve(&[FontSource::File(bogus), FontSource::Builtin]);
        assert!(face.is_builtin());
    }

    #[test]
    fn test_builtin_measure_scales_with_size() {
        let face = Face::Builtin;
        let small = face.measure("1", 8.0);
        let large = face.measure("1", 80.0);

        assert!(small.width() > 0 && small.height() > 0);
        assert_eq!(large.width(), small.width() * 10);
        assert_eq!(large.height(), small.height() * 10);
    }

    #[test]
    fn test_builtin_glyphs_sit_on_the_baseline() {
        let face = Face::Builtin;
        let metrics = face.line_metrics(80.0);
        let digit = face.measure("8", 80.0);

        assert_eq!(metrics.ascent, 70.0);
        assert!(digit.bottom <= metrics.ascent as i32);
        assert!(digit.top >= 0);
    }

    #[test]
    fn test_whitespace_has_no_ink() {
        let face = Face::Builtin;
        assert_eq!(face.measure("   ", 40.0), TextBox::default());
        let spaced = face.measure("1 1", 40.0);
        assert!(spaced.width() > face.measure("11", 40.0).width());
    }

    #[test]
    fn test_draw_marks_pixels() {
        let mut canvas = Canvas::new_filled(100, 40, [0, 0, 0]);
        Face::Builtin.draw(&mut canvas, "Hi", 16.0, 2, 2, [255, 255, 255]);

        let lit = (0..100)
            .flat_map(|x| (0..40).map(move |y| (x, y)))
            .filter(|&(x, y)| canvas.get_pixel(x, y) == [255, 255, 255])
            .count();
        assert!(lit > 0);
    }
}
