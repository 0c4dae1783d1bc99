//! Drawing surface abstraction
//!
//! Coordinates are in points with the origin at the top-left of the page and
//! y pointing down. `translate` moves the origin; `save`/`restore` bracket
//! changes to it so they never leak from one badge into the next.

use crate::text::PlacedText;
use crate::types::{BadgeError, Result, RgbColor};
use std::ops::{Deref, DerefMut};

pub trait Canvas {
    /// Decoded image registered with the surface
    type Image;

    fn load_image(&mut self, bytes: &[u8]) -> Result<Self::Image>;

    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    /// Draw `image` stretched to `width` × `height` at the origin
    fn draw_image(&mut self, image: &Self::Image, width: f32, height: f32) -> Result<()>;

    fn stroke_rect(&mut self, width: f32, height: f32, color: RgbColor, line_width: f32);

    fn draw_text(&mut self, text: &PlacedText, color: RgbColor);

    /// Finish the current page and start a new one
    fn show_page(&mut self);
}

/// Saves the canvas state on creation and restores it when dropped.
pub struct CanvasScope<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
}

impl<'a, C: Canvas + ?Sized> CanvasScope<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        canvas.save();
        Self { canvas }
    }
}

impl<C: Canvas + ?Sized> Deref for CanvasScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for CanvasScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for CanvasScope<'_, C> {
    fn drop(&mut self) {
        self.canvas.restore();
    }
}

// =============================================================================
// Recording canvas
// =============================================================================

/// One call made against a `RecordingCanvas`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    /// Image drawn with the origin at (x, y)
    Image { x: f32, y: f32, width: f32, height: f32 },
    Rect { x: f32, y: f32, width: f32, height: f32 },
    /// Text with its layout box at (x, y)
    Text {
        x: f32,
        y: f32,
        font_size: f32,
        lines: Vec<String>,
    },
    ShowPage,
}

/// A canvas that records what was drawn, in absolute coordinates.
///
/// Useful for checking layout without producing a PDF.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
    origin: (f32, f32),
    stack: Vec<(f32, f32)>,
    reject_images: bool,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas whose `load_image` always fails
    pub fn rejecting_images() -> Self {
        Self {
            reject_images: true,
            ..Self::default()
        }
    }

    /// Depth of unmatched `save` calls
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Calls grouped by page; a trailing group with nothing drawn is dropped
    pub fn pages(&self) -> Vec<&[DrawCall]> {
        let mut pages: Vec<&[DrawCall]> = self
            .calls
            .split(|call| *call == DrawCall::ShowPage)
            .collect();
        if pages.last().is_some_and(|page| page.is_empty()) {
            pages.pop();
        }
        pages
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Text { .. }))
    }
}

impl Canvas for RecordingCanvas {
    type Image = ();

    fn load_image(&mut self, _bytes: &[u8]) -> Result<()> {
        if self.reject_images {
            return Err(BadgeError::Image("image rejected".to_string()));
        }
        Ok(())
    }

    fn save(&mut self) {
        self.stack.push(self.origin);
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        if let Some(origin) = self.stack.pop() {
            self.origin = origin;
        }
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.origin.0 += dx;
        self.origin.1 += dy;
    }

    fn draw_image(&mut self, _image: &(), width: f32, height: f32) -> Result<()> {
        self.calls.push(DrawCall::Image {
            x: self.origin.0,
            y: self.origin.1,
            width,
            height,
        });
        Ok(())
    }

    fn stroke_rect(&mut self, width: f32, height: f32, _color: RgbColor, _line_width: f32) {
        self.calls.push(DrawCall::Rect {
            x: self.origin.0,
            y: self.origin.1,
            width,
            height,
        });
    }

    fn draw_text(&mut self, text: &PlacedText, _color: RgbColor) {
        self.calls.push(DrawCall::Text {
            x: self.origin.0 + text.x,
            y: self.origin.1 + text.y,
            font_size: text.font_size(),
            lines: text.block.lines.iter().map(|l| l.text.clone()).collect(),
        });
    }

    fn show_page(&mut self) {
        self.calls.push(DrawCall::ShowPage);
    }
}
