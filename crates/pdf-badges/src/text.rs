//! Text shaping and fitting
//!
//! Lines break greedily at Unicode line break opportunities (UAX #14) when a
//! wrap width is given, so spaces and hyphens both allow a break. Each line
//! is centered within the block. Coordinates are in points with y pointing
//! down, relative to the top-left corner of the layout box.

use crate::constants::{FONT_SIZE_STEP, mm_to_pt};
use crate::fonts::FontMetrics;

/// An axis-aligned rectangle, y pointing down
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extents {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Extents {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    fn from_corners(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapedLine {
    pub text: String,
    /// Left edge of the line's advance box
    pub x: f32,
    /// Distance from the block top to this line's baseline
    pub baseline: f32,
    /// Sum of glyph advances
    pub width: f32,
}

/// A run of text laid out at one font size
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedBlock {
    pub font_size: f32,
    pub lines: Vec<ShapedLine>,
    /// Advance boxes of all lines
    pub logical: Extents,
    /// Union of the glyphs' ink boxes; zero-sized when nothing is inked
    pub ink: Extents,
}

/// Shape `text` at `font_size` points, wrapping to `wrap_width` points when
/// one is given. Explicit newlines always start a new line.
pub fn shape(
    metrics: &dyn FontMetrics,
    text: &str,
    font_size: f32,
    wrap_width: Option<f32>,
) -> ShapedBlock {
    let advance_of = |s: &str| -> f32 {
        s.chars().map(|ch| metrics.glyph(ch).advance).sum::<f32>() * font_size
    };

    let mut raw_lines = Vec::new();
    for paragraph in text.split('\n') {
        match wrap_width {
            Some(limit) => wrap_paragraph(paragraph, limit, &advance_of, &mut raw_lines),
            None => raw_lines.push(paragraph.to_string()),
        }
    }

    let widths: Vec<f32> = raw_lines.iter().map(|line| advance_of(line)).collect();
    let widest = widths.iter().copied().fold(0.0, f32::max);
    let layout_width = wrap_width.unwrap_or(widest);

    let ascent = metrics.ascent() * font_size;
    let line_height = metrics.line_height() * font_size;

    let mut lines = Vec::with_capacity(raw_lines.len());
    let mut ink: Option<(f32, f32, f32, f32)> = None;
    let mut logical_left = f32::MAX;

    for (index, (text, width)) in raw_lines.into_iter().zip(widths).enumerate() {
        let x = (layout_width - width) / 2.0;
        let baseline = index as f32 * line_height + ascent;
        logical_left = logical_left.min(x);

        let mut pen = x;
        for ch in text.chars() {
            let glyph = metrics.glyph(ch);
            if let Some(bbox) = glyph.ink {
                let left = pen + bbox.x_min * font_size;
                let right = pen + bbox.x_max * font_size;
                let top = baseline - bbox.y_max * font_size;
                let bottom = baseline - bbox.y_min * font_size;
                ink = Some(match ink {
                    None => (left, top, right, bottom),
                    Some((l, t, r, b)) => (l.min(left), t.min(top), r.max(right), b.max(bottom)),
                });
            }
            pen += glyph.advance * font_size;
        }

        lines.push(ShapedLine {
            text,
            x,
            baseline,
            width,
        });
    }

    let logical = Extents {
        x: if lines.is_empty() { 0.0 } else { logical_left },
        y: 0.0,
        width: widest,
        height: lines.len() as f32 * line_height,
    };
    let ink = ink
        .map(|(l, t, r, b)| Extents::from_corners(l, t, r, b))
        .unwrap_or_default();

    ShapedBlock {
        font_size,
        lines,
        logical,
        ink,
    }
}

/// Greedy wrap at break opportunities; a segment wider than `limit` gets a
/// line of its own.
fn wrap_paragraph(
    paragraph: &str,
    limit: f32,
    advance_of: &dyn Fn(&str) -> f32,
    out: &mut Vec<String>,
) {
    let mut line_start = 0;
    let mut last_break = 0;
    for (pos, _hard) in xi_unicode::LineBreakIterator::new(paragraph) {
        let candidate = paragraph[line_start..pos].trim();
        if advance_of(candidate) > limit && last_break > line_start {
            out.push(paragraph[line_start..last_break].trim().to_string());
            line_start = last_break;
        }
        last_break = pos;
    }
    out.push(paragraph[line_start..].trim().to_string());
}

// =============================================================================
// Fitting
// =============================================================================

/// Where a text block should be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRequest {
    pub max_font_size: f32,
    /// Sizes at or below this are never tried
    pub min_font_size: f32,
    pub region_width_mm: f32,
    pub region_height_mm: f32,
    /// Width of the area the text is centered across
    pub area_width_mm: f32,
    /// Top of the region band
    pub y_mm: f32,
    pub multiline: bool,
}

/// A shaped block positioned on the badge
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub block: ShapedBlock,
    /// Top-left of the layout box, in points from the badge's top-left
    pub x: f32,
    pub y: f32,
}

impl PlacedText {
    pub fn font_size(&self) -> f32 {
        self.block.font_size
    }

    /// Ink extents in badge coordinates
    pub fn ink_on_badge(&self) -> Extents {
        Extents {
            x: self.x + self.block.ink.x,
            y: self.y + self.block.ink.y,
            ..self.block.ink
        }
    }
}

/// Find the largest font size at which `text` fits the region and center its
/// ink within the band.
///
/// Returns `None` when the text is blank or does not fit at any size above
/// the floor.
pub fn fit_and_place(
    metrics: &dyn FontMetrics,
    text: &str,
    request: &FitRequest,
) -> Option<PlacedText> {
    if text.trim().is_empty() {
        return None;
    }

    let region_width = mm_to_pt(request.region_width_mm);
    let region_height = mm_to_pt(request.region_height_mm);
    let wrap_width = request.multiline.then_some(region_width);

    let mut font_size = request.max_font_size;
    while font_size > request.min_font_size {
        let block = shape(metrics, text, font_size, wrap_width);
        if block.ink.width > region_width || block.ink.height > region_height {
            font_size -= FONT_SIZE_STEP;
            continue;
        }

        let x = mm_to_pt(request.area_width_mm) / 2.0 - block.ink.width / 2.0 - block.ink.x;
        let y = mm_to_pt(request.y_mm) + region_height / 2.0
            - block.ink.height / 2.0
            - block.ink.y;
        return Some(PlacedText { block, x, y });
    }

    log::debug!(
        "{:?} does not fit {}x{}mm above {}pt, skipping",
        text,
        request.region_width_mm,
        request.region_height_mm,
        request.min_font_size
    );
    None
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{GlyphMetrics, HelveticaMetrics, InkBox};

    const EPSILON: f32 = 1e-3;

    fn request(max_font_size: f32, multiline: bool) -> FitRequest {
        FitRequest {
            max_font_size,
            min_font_size: 6.0,
            region_width_mm: 90.0,
            region_height_mm: 76.0 / 3.0,
            area_width_mm: 100.0,
            y_mm: 30.0,
            multiline,
        }
    }

    /// Every glyph half an em wide with a small bearing on each side
    struct FixedPitch;

    impl FontMetrics for FixedPitch {
        fn ascent(&self) -> f32 {
            0.718
        }

        fn descent(&self) -> f32 {
            0.207
        }

        fn glyph(&self, ch: char) -> GlyphMetrics {
            GlyphMetrics {
                advance: 0.5,
                ink: (!ch.is_whitespace()).then_some(InkBox {
                    x_min: 0.05,
                    y_min: 0.0,
                    x_max: 0.45,
                    y_max: 0.7,
                }),
            }
        }
    }

    /// Glyphs with a large left bearing, to check centering ignores it
    struct OffsetInk;

    impl FontMetrics for OffsetInk {
        fn ascent(&self) -> f32 {
            0.8
        }

        fn descent(&self) -> f32 {
            0.2
        }

        fn glyph(&self, ch: char) -> GlyphMetrics {
            GlyphMetrics {
                advance: 0.6,
                ink: (ch != ' ').then_some(InkBox {
                    x_min: 0.3,
                    y_min: -0.1,
                    x_max: 0.55,
                    y_max: 0.4,
                }),
            }
        }
    }

    #[test]
    fn test_shape_single_line() {
        let block = shape(&FixedPitch, "Bob", 10.0, None);
        assert_eq!(block.lines.len(), 1);
        assert!((block.logical.width - 15.0).abs() < EPSILON);
        assert!((block.ink.x - 0.5).abs() < EPSILON);
        assert!((block.ink.width - 14.0).abs() < EPSILON);
        assert!((block.ink.height - 7.0).abs() < EPSILON);
        // Ink sits on the baseline
        assert!((block.ink.y + block.ink.height - block.lines[0].baseline).abs() < EPSILON);
    }

    #[test]
    fn test_shape_wraps_at_words() {
        // Each char is 5pt at 10pt size: "aaaa bbbb" = 45pt
        let block = shape(&FixedPitch, "aaaa bbbb cccc", 10.0, Some(45.0));
        let texts: Vec<_> = block.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["aaaa bbbb", "cccc"]);
        // Second line is centered within the wrap width
        assert!((block.lines[1].x - 12.5).abs() < EPSILON);
        assert!(block.lines[1].baseline > block.lines[0].baseline);
    }

    #[test]
    fn test_shape_long_word_overflows_its_own_line() {
        let block = shape(&FixedPitch, "a verylongword", 10.0, Some(30.0));
        assert_eq!(block.lines.len(), 2);
        assert!(block.ink.width > 30.0);
    }

    #[test]
    fn test_fits_without_shrinking() {
        let placed = fit_and_place(&FixedPitch, "Bob", &request(18.0, true)).unwrap();
        assert_eq!(placed.font_size(), 18.0);
    }

    #[test]
    fn test_chooses_largest_fitting_size() {
        // 29 chars: ink width = 14.4 * size; region is 90mm ≈ 255.1pt
        let text = "Bartholomew-Featherstonehaugh";
        let placed = fit_and_place(&FixedPitch, text, &request(18.0, false)).unwrap();
        assert_eq!(placed.font_size(), 17.0);

        let region = mm_to_pt(90.0);
        assert!(placed.block.ink.width <= region);
        let larger = shape(&FixedPitch, text, 18.0, None);
        assert!(larger.ink.width > region);
    }

    #[test]
    fn test_hyphenated_name_wraps_instead_of_shrinking() {
        let text = "Bartholomew-Featherstonehaugh";
        let placed = fit_and_place(&FixedPitch, text, &request(18.0, true)).unwrap();
        assert_eq!(placed.font_size(), 18.0);

        let texts: Vec<_> = placed.block.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Bartholomew-", "Featherstonehaugh"]);
        assert!(placed.block.ink.width <= mm_to_pt(90.0));
    }

    #[test]
    fn test_unbreakable_name_shrinks() {
        let text = "Bartholomew_Featherstonehaugh";
        let placed = fit_and_place(&FixedPitch, text, &request(18.0, true)).unwrap();
        assert_eq!(placed.font_size(), 17.0);
        assert_eq!(placed.block.lines.len(), 1);
    }

    #[test]
    fn test_helvetica_widths_drive_fitting() {
        // 28 W's are 26.432 em: 264.3pt at 10pt, 237.9pt at 9pt
        let text = "W".repeat(28);
        let mut req = request(16.0, false);
        req.region_height_mm = 76.0 / 7.0;
        let placed = fit_and_place(&HelveticaMetrics, &text, &req).unwrap();
        assert_eq!(placed.font_size(), 9.0);

        // The same count of narrow letters needs no shrinking
        let narrow = fit_and_place(&HelveticaMetrics, &"i".repeat(28), &req).unwrap();
        assert_eq!(narrow.font_size(), 16.0);
    }

    #[test]
    fn test_too_long_is_dropped() {
        let text = "x".repeat(200);
        assert!(fit_and_place(&FixedPitch, &text, &request(16.0, false)).is_none());
    }

    #[test]
    fn test_floor_is_exclusive() {
        let mut req = request(6.0, false);
        assert!(fit_and_place(&FixedPitch, "Bob", &req).is_none());
        req.max_font_size = 7.0;
        assert_eq!(
            fit_and_place(&FixedPitch, "Bob", &req).unwrap().font_size(),
            7.0
        );
    }

    #[test]
    fn test_blank_text_is_not_shaped() {
        assert!(fit_and_place(&FixedPitch, "   ", &request(18.0, true)).is_none());
    }

    #[test]
    fn test_centering_uses_ink_extents() {
        let req = request(14.0, false);
        let placed = fit_and_place(&OffsetInk, "Speaker", &req).unwrap();
        let ink = placed.ink_on_badge();

        assert!((ink.center_x() - mm_to_pt(100.0) / 2.0).abs() < EPSILON);
        let band_center = mm_to_pt(req.y_mm) + mm_to_pt(req.region_height_mm) / 2.0;
        assert!((ink.center_y() - band_center).abs() < EPSILON);

        // The advance box is not centered when bearings are lopsided
        let logical_center = placed.x + placed.block.logical.center_x();
        assert!((logical_center - mm_to_pt(50.0)).abs() > 1.0);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let req = request(18.0, true);
        let a = fit_and_place(&FixedPitch, "Alice Doe", &req);
        let b = fit_and_place(&FixedPitch, "Alice Doe", &req);
        assert_eq!(a, b);
    }
}
