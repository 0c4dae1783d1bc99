//! Printable conference badges: fits attendee text onto a background image
//! and tiles the badges onto A4 pages.

pub mod badge;
pub mod canvas;
mod compose;
pub mod constants;
pub mod fonts;
pub mod grid;
mod options;
pub mod pdf;
pub mod source;
pub mod text;
mod types;

pub use badge::{layout_badge, render_badge};
pub use canvas::{Canvas, CanvasScope, RecordingCanvas};
pub use compose::{compose, generate_pdf, generate_pdf_bytes};
pub use fonts::{BadgeFont, FontFace, FontMetrics, HelveticaMetrics};
pub use options::*;
pub use pdf::PdfCanvas;
pub use source::{CsvSource, RecordSource};
#[cfg(feature = "mysql")]
pub use source::MysqlSource;
pub use types::*;
