use crate::canvas::Canvas;
use crate::constants::mm_to_pt;
use crate::fonts::BadgeFont;
use crate::options::BadgeOptions;
use crate::text::PlacedText;
use crate::types::{BadgeError, Result, RgbColor};
use printpdf::*;

/// Background image registered with the document
#[derive(Debug, Clone)]
pub struct PdfImage {
    id: XObjectId,
    width_px: usize,
    height_px: usize,
}

/// Font used for every text operation on the page
#[derive(Debug, Clone)]
enum PdfFont {
    Embedded(FontId),
    Builtin(BuiltinFont),
}

/// `Canvas` backed by a printpdf document.
///
/// Operations are collected per page and turned into `PdfPage`s on
/// `show_page`. Translations are tracked here and folded into the absolute
/// coordinates of each operation, converting from the canvas' top-down y to
/// PDF's bottom-up y.
pub struct PdfCanvas {
    doc: PdfDocument,
    font: PdfFont,
    page_width_mm: f32,
    page_height_mm: f32,
    ops: Vec<Op>,
    origin: (f32, f32),
    stack: Vec<(f32, f32)>,
}

impl PdfCanvas {
    pub fn new(title: &str, options: &BadgeOptions, font: &BadgeFont) -> Result<Self> {
        let mut doc = PdfDocument::new(title);

        let font = match font {
            BadgeFont::Face(face) => {
                let mut font_warnings = Vec::new();
                let index = face.index() as usize;
                let parsed = ParsedFont::from_bytes(face.bytes(), index, &mut font_warnings)
                    .ok_or_else(|| BadgeError::Pdf("Failed to parse font".to_string()))?;
                PdfFont::Embedded(doc.add_font(&parsed))
            }
            BadgeFont::Builtin => PdfFont::Builtin(BuiltinFont::Helvetica),
        };

        Ok(Self {
            doc,
            font,
            page_width_mm: options.page_width_mm,
            page_height_mm: options.page_height_mm,
            ops: Vec::new(),
            origin: (0.0, 0.0),
            stack: Vec::new(),
        })
    }

    /// Number of pages emitted so far
    pub fn page_count(&self) -> usize {
        self.doc.pages.len()
    }

    /// Serialize the document. Operations drawn since the last `show_page`
    /// are discarded.
    pub fn finish(self) -> Vec<u8> {
        let mut warnings = Vec::new();
        self.doc.save(&PdfSaveOptions::default(), &mut warnings)
    }

    /// Absolute PDF point for a canvas-relative point
    fn point(&self, x: f32, y: f32) -> Point {
        Point {
            x: Pt(self.origin.0 + x),
            y: Pt(mm_to_pt(self.page_height_mm) - (self.origin.1 + y)),
        }
    }
}

fn color(c: RgbColor) -> Color {
    Color::Rgb(Rgb::new(c.r, c.g, c.b, None))
}

impl Canvas for PdfCanvas {
    type Image = PdfImage;

    fn load_image(&mut self, bytes: &[u8]) -> Result<PdfImage> {
        let mut warnings = Vec::new();
        let image = RawImage::decode_from_bytes(bytes, &mut warnings).map_err(BadgeError::Image)?;
        if image.width == 0 || image.height == 0 {
            return Err(BadgeError::Image("Image has no pixels".to_string()));
        }
        let (width_px, height_px) = (image.width, image.height);
        let id = self.doc.add_image(&image);
        Ok(PdfImage {
            id,
            width_px,
            height_px,
        })
    }

    fn save(&mut self) {
        self.stack.push(self.origin);
        self.ops.push(Op::SaveGraphicsState);
    }

    fn restore(&mut self) {
        if let Some(origin) = self.stack.pop() {
            self.origin = origin;
        }
        self.ops.push(Op::RestoreGraphicsState);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.origin.0 += dx;
        self.origin.1 += dy;
    }

    fn draw_image(&mut self, image: &PdfImage, width: f32, height: f32) -> Result<()> {
        // At 72 dpi one pixel is one point
        let bottom_left = self.point(0.0, height);
        self.ops.push(Op::UseXobject {
            id: image.id.clone(),
            transform: XObjectTransform {
                translate_x: Some(bottom_left.x),
                translate_y: Some(bottom_left.y),
                scale_x: Some(width / image.width_px as f32),
                scale_y: Some(height / image.height_px as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        });
        Ok(())
    }

    fn stroke_rect(&mut self, width: f32, height: f32, c: RgbColor, line_width: f32) {
        let corners = [(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)];
        let points = corners
            .iter()
            .map(|&(x, y)| LinePoint {
                p: self.point(x, y),
                bezier: false,
            })
            .collect();

        self.ops.push(Op::SetOutlineColor { col: color(c) });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(line_width) });
        self.ops.push(Op::DrawLine {
            line: Line {
                points,
                is_closed: true,
            },
        });
    }

    fn draw_text(&mut self, text: &PlacedText, c: RgbColor) {
        let size = Pt(text.font_size());
        let font = self.font.clone();
        self.ops.push(Op::SetFillColor { col: color(c) });

        for line in &text.block.lines {
            let baseline = self.point(text.x + line.x, text.y + line.baseline);
            self.ops.push(Op::StartTextSection);
            match &font {
                PdfFont::Embedded(font_id) => {
                    self.ops.push(Op::SetFontSize {
                        font: font_id.clone(),
                        size,
                    });
                    self.ops.push(Op::SetTextMatrix {
                        matrix: TextMatrix::Translate(baseline.x, baseline.y),
                    });
                    self.ops.push(Op::WriteText {
                        items: vec![TextItem::Text(line.text.clone())],
                        font: font_id.clone(),
                    });
                }
                PdfFont::Builtin(font) => {
                    self.ops.push(Op::SetFontSizeBuiltinFont {
                        font: font.clone(),
                        size,
                    });
                    self.ops.push(Op::SetTextMatrix {
                        matrix: TextMatrix::Translate(baseline.x, baseline.y),
                    });
                    self.ops.push(Op::WriteTextBuiltinFont {
                        items: vec![TextItem::Text(line.text.clone())],
                        font: font.clone(),
                    });
                }
            }
            self.ops.push(Op::EndTextSection);
        }
    }

    fn show_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.doc.pages.push(PdfPage::new(
            Mm(self.page_width_mm),
            Mm(self.page_height_mm),
            ops,
        ));
        log::debug!("Emitted page {}", self.doc.pages.len());
    }
}
