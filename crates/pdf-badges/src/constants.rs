//! Shared constants for badge layout
//!
//! This module centralizes the fixed dimensions and magic numbers used
//! throughout badge rendering. Most of them seed `BadgeOptions::default()`.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Page and Badge Dimensions
// =============================================================================

/// A4 page width
pub const PAGE_WIDTH_MM: f32 = 210.0;

/// A4 page height
pub const PAGE_HEIGHT_MM: f32 = 297.0;

pub const BADGE_WIDTH_MM: f32 = 100.0;

pub const BADGE_HEIGHT_MM: f32 = 76.0;

/// Gap between neighbouring badges, both horizontally and vertically
pub const INNER_MARGIN_MM: f32 = 5.0;

// =============================================================================
// Border
// =============================================================================

/// Border stroke width (points)
pub const BORDER_LINE_WIDTH: f32 = 2.0;

/// Border gray level
pub const BORDER_GRAY: f32 = 0.9;

// =============================================================================
// Text
// =============================================================================

/// Font sizes at or below this are never tried (points)
pub const MIN_FONT_SIZE: f32 = 6.0;

/// Step used when shrinking text that does not fit (points)
pub const FONT_SIZE_STEP: f32 = 1.0;

/// Fraction of the badge width available to each text field
pub const TEXT_WIDTH_RATIO: f32 = 0.9;

/// Helvetica ascender, in em
pub const HELVETICA_ASCENT: f32 = 0.718;

/// Helvetica descender depth, in em
pub const HELVETICA_DESCENT: f32 = 0.207;

/// Helvetica cap height, in em
pub const HELVETICA_CAP_HEIGHT: f32 = 0.718;

/// Helvetica x-height, in em
pub const HELVETICA_X_HEIGHT: f32 = 0.523;

/// Advance widths of Helvetica for U+0020..=U+007E, in 1/1000 em (from the
/// Adobe core font metrics)
pub const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Width assumed for characters outside the table
pub const HELVETICA_DEFAULT_WIDTH: u16 = 556;

// =============================================================================
// Fonts
// =============================================================================

/// Family looked up in the system font database when no font is given
pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans";

// =============================================================================
// Database
// =============================================================================

pub const DEFAULT_MYSQL_PORT: u16 = 3306;
