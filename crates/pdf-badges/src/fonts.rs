//! Font metrics used for text fitting
//!
//! All metrics are expressed in em units (1.0 = the font size), with y
//! pointing up from the baseline as in the font's own coordinate system.

use crate::constants::{
    DEFAULT_FONT_FAMILY, HELVETICA_ASCENT, HELVETICA_CAP_HEIGHT, HELVETICA_DEFAULT_WIDTH,
    HELVETICA_DESCENT, HELVETICA_WIDTHS, HELVETICA_X_HEIGHT,
};
use crate::types::{BadgeError, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Tight box around the inked part of a glyph, in em
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    pub advance: f32,
    /// `None` for glyphs that draw nothing, such as spaces
    pub ink: Option<InkBox>,
}

/// Per-glyph measurements a text shaper needs
pub trait FontMetrics {
    /// Distance from the baseline to the top of the line box
    fn ascent(&self) -> f32;

    /// Distance from the baseline to the bottom of the line box (positive)
    fn descent(&self) -> f32;

    fn glyph(&self, ch: char) -> GlyphMetrics;

    fn line_height(&self) -> f32 {
        self.ascent() + self.descent()
    }
}

// =============================================================================
// TrueType faces
// =============================================================================

/// A TrueType/OpenType face with its metrics decoded up front.
///
/// The raw bytes are kept so the same face can be embedded in the PDF.
#[derive(Debug, Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    index: u32,
    ascent: f32,
    descent: f32,
    glyphs: HashMap<char, GlyphMetrics>,
    missing: GlyphMetrics,
}

impl FontFace {
    /// Parse face `index` of a font file (0 unless the file is a collection)
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, index)
            .map_err(|e| BadgeError::Font(format!("Failed to parse font: {}", e)))?;

        let units = f32::from(face.units_per_em());
        let glyph_metrics = |id: ttf_parser::GlyphId| GlyphMetrics {
            advance: face.glyph_hor_advance(id).map_or(0.0, |a| f32::from(a) / units),
            ink: face.glyph_bounding_box(id).map(|rect| InkBox {
                x_min: f32::from(rect.x_min) / units,
                y_min: f32::from(rect.y_min) / units,
                x_max: f32::from(rect.x_max) / units,
                y_max: f32::from(rect.y_max) / units,
            }),
        };

        let mut glyphs = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|codepoint| {
                    let Some(ch) = char::from_u32(codepoint) else {
                        return;
                    };
                    if let Some(id) = subtable.glyph_index(codepoint) {
                        glyphs.entry(ch).or_insert_with(|| glyph_metrics(id));
                    }
                });
            }
        }

        if glyphs.is_empty() {
            return Err(BadgeError::Font(
                "Font has no Unicode character map".to_string(),
            ));
        }

        let missing = glyph_metrics(ttf_parser::GlyphId(0));
        let ascent = f32::from(face.ascender()) / units;
        let descent = -f32::from(face.descender()) / units;

        Ok(Self {
            data: Arc::new(data),
            index,
            ascent,
            descent,
            glyphs,
            missing,
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let bytes = tokio::fs::read(&path).await?;
        tokio::task::spawn_blocking(move || Self::from_bytes(bytes, 0))
            .await?
            .map_err(|e| match e {
                BadgeError::Font(msg) => BadgeError::Font(format!("{}: {}", path.display(), msg)),
                other => other,
            })
    }

    /// Look up a regular face of `family` in a font database.
    ///
    /// `None` when the family is not installed.
    pub fn find(db: &fontdb::Database, family: &str) -> Option<Result<Self>> {
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family)],
            ..fontdb::Query::default()
        };
        let id = db.query(&query)?;
        if let Some(info) = db.face(id) {
            log::debug!("Found {} as {}", family, info.post_script_name);
        }
        db.with_face_data(id, |data, index| Self::from_bytes(data.to_vec(), index))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl FontMetrics for FontFace {
    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn glyph(&self, ch: char) -> GlyphMetrics {
        self.glyphs.get(&ch).copied().unwrap_or(self.missing)
    }
}

// =============================================================================
// Builtin Helvetica
// =============================================================================

/// Metrics of the PDF builtin Helvetica.
///
/// Advances come from the standard width table; ink boxes span the advance
/// and reach x-height, cap height or below the baseline depending on the
/// letter shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    fn advance(ch: char) -> f32 {
        let units = match ch {
            ' '..='~' => HELVETICA_WIDTHS[ch as usize - ' ' as usize],
            _ => HELVETICA_DEFAULT_WIDTH,
        };
        f32::from(units) / 1000.0
    }
}

impl FontMetrics for HelveticaMetrics {
    fn ascent(&self) -> f32 {
        HELVETICA_ASCENT
    }

    fn descent(&self) -> f32 {
        HELVETICA_DESCENT
    }

    fn glyph(&self, ch: char) -> GlyphMetrics {
        let advance = Self::advance(ch);
        if ch.is_whitespace() || ch.is_control() {
            return GlyphMetrics { advance, ink: None };
        }

        let y_max = if "acegmnopqrsuvwxyz".contains(ch) {
            HELVETICA_X_HEIGHT
        } else {
            HELVETICA_CAP_HEIGHT
        };
        let y_min = if "gjpqy,;()[]{}|".contains(ch) {
            -HELVETICA_DESCENT
        } else {
            0.0
        };

        GlyphMetrics {
            advance,
            ink: Some(InkBox {
                x_min: 0.0,
                y_min,
                x_max: advance,
                y_max,
            }),
        }
    }
}

// =============================================================================
// Badge font
// =============================================================================

/// The typeface every badge field is set in
#[derive(Debug, Clone)]
pub enum BadgeFont {
    /// Embedded TrueType face
    Face(FontFace),
    /// PDF builtin Helvetica
    Builtin,
}

impl BadgeFont {
    /// Load `path` if given, otherwise look up DejaVu Sans among the system
    /// fonts, otherwise fall back to builtin Helvetica.
    pub async fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Ok(BadgeFont::Face(FontFace::load(path).await?));
        }

        let found = tokio::task::spawn_blocking(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("Loaded {} system font faces", db.len());
            FontFace::find(&db, DEFAULT_FONT_FAMILY)
        })
        .await?;

        match found {
            Some(Ok(face)) => return Ok(BadgeFont::Face(face)),
            Some(Err(e)) => log::warn!("Cannot use {}: {}", DEFAULT_FONT_FAMILY, e),
            None => log::warn!("{} is not installed", DEFAULT_FONT_FAMILY),
        }

        log::warn!("Falling back to builtin Helvetica");
        Ok(BadgeFont::Builtin)
    }
}

impl FontMetrics for BadgeFont {
    fn ascent(&self) -> f32 {
        match self {
            BadgeFont::Face(face) => face.ascent(),
            BadgeFont::Builtin => HelveticaMetrics.ascent(),
        }
    }

    fn descent(&self) -> f32 {
        match self {
            BadgeFont::Face(face) => face.descent(),
            BadgeFont::Builtin => HelveticaMetrics.descent(),
        }
    }

    fn glyph(&self, ch: char) -> GlyphMetrics {
        match self {
            BadgeFont::Face(face) => face.glyph(ch),
            BadgeFont::Builtin => HelveticaMetrics.glyph(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_advances() {
        assert!((HelveticaMetrics.glyph('W').advance - 0.944).abs() < 1e-6);
        assert!((HelveticaMetrics.glyph('i').advance - 0.222).abs() < 1e-6);
        assert!((HelveticaMetrics.glyph('é').advance - 0.556).abs() < 1e-6);
    }

    #[test]
    fn test_helvetica_ink_shapes() {
        let space = HelveticaMetrics.glyph(' ');
        assert!((space.advance - 0.278).abs() < 1e-6);
        assert!(space.ink.is_none());

        let cap = HelveticaMetrics.glyph('A').ink.unwrap();
        assert_eq!(cap.y_max, HELVETICA_CAP_HEIGHT);
        assert_eq!(cap.y_min, 0.0);

        let x = HelveticaMetrics.glyph('x').ink.unwrap();
        assert_eq!(x.y_max, HELVETICA_X_HEIGHT);

        let g = HelveticaMetrics.glyph('g').ink.unwrap();
        assert!(g.y_min < 0.0);
        assert_eq!(g.x_max, HelveticaMetrics.glyph('g').advance);
    }

    #[test]
    fn test_line_height() {
        let height = HelveticaMetrics.line_height();
        assert!((height - (HELVETICA_ASCENT + HELVETICA_DESCENT)).abs() < 1e-6);
        assert_eq!(BadgeFont::Builtin.line_height(), height);
    }

    #[test]
    fn test_garbage_font_is_rejected() {
        let result = FontFace::from_bytes(b"definitely not a font".to_vec(), 0);
        assert!(matches!(result, Err(BadgeError::Font(_))));
    }

    #[test]
    fn test_find_unknown_family() {
        let db = fontdb::Database::new();
        assert!(FontFace::find(&db, "No Such Family").is_none());
    }

    #[tokio::test]
    async fn test_resolve_missing_font_file() {
        let result = BadgeFont::resolve(Some(Path::new("/nonexistent/font.ttf"))).await;
        assert!(matches!(result, Err(BadgeError::Io(_))));
    }
}
