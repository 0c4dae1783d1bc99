//! Page composition: tiling badges onto pages

use crate::badge::render_badge;
use crate::canvas::{Canvas, CanvasScope};
use crate::constants::mm_to_pt;
use crate::fonts::{BadgeFont, FontMetrics};
use crate::grid::{GridCursor, PageGrid};
use crate::options::BadgeOptions;
use crate::pdf::PdfCanvas;
use crate::source::RecordSource;
use crate::types::{BadgeError, BadgeRecord, DocumentStats, Result};
use std::path::Path;

/// Draw every record onto `canvas`, one grid cell each, emitting a page
/// whenever the grid fills and once more for a partially filled last page.
/// With no records at all a single blank page is emitted.
///
/// `background` holds the encoded image; it is decoded on the first badge
/// and reused for the rest.
pub fn compose<C, I>(
    canvas: &mut C,
    records: I,
    metrics: &dyn FontMetrics,
    background: &[u8],
    options: &BadgeOptions,
) -> Result<DocumentStats>
where
    C: Canvas,
    I: IntoIterator<Item = Result<BadgeRecord>>,
{
    options.validate()?;

    let grid = PageGrid::new(options);
    let mut cursor = GridCursor::new(&grid);
    let mut cached_image: Option<C::Image> = None;
    let mut stats = DocumentStats::default();

    for record in records {
        let record = record?;

        let image = match cached_image.take() {
            Some(image) => image,
            None => canvas.load_image(background)?,
        };

        let (x_mm, y_mm) = grid.cell_origin_mm(cursor.position());
        {
            let mut scope = CanvasScope::new(canvas);
            scope.translate(mm_to_pt(x_mm), mm_to_pt(y_mm));
            render_badge(&mut *scope, metrics, options, &record, &image)?;
        }
        cached_image = Some(image);
        stats.badges += 1;

        if cursor.advance() {
            canvas.show_page();
            stats.pages += 1;
        }
    }

    if cursor.placed_on_page() > 0 || stats.pages == 0 {
        if stats.badges == 0 {
            log::warn!("No records to render, the document has one blank page");
        }
        canvas.show_page();
        stats.pages += 1;
    }

    log::info!(
        "Composed {} badges on {} pages ({}x{} per page)",
        stats.badges,
        stats.pages,
        grid.cols,
        grid.rows
    );

    Ok(stats)
}

/// Render `records` to PDF bytes.
pub fn generate_pdf_bytes<I>(
    records: I,
    font: &BadgeFont,
    background: &[u8],
    options: &BadgeOptions,
) -> Result<(Vec<u8>, DocumentStats)>
where
    I: IntoIterator<Item = Result<BadgeRecord>>,
{
    let mut canvas = PdfCanvas::new("Badges", options, font)?;
    let stats = compose(&mut canvas, records, font, background, options)?;
    Ok((canvas.finish(), stats))
}

/// Read the background, pull every record from `source` and write the
/// finished PDF to `output_path`.
pub async fn generate_pdf<S>(
    source: S,
    font: &BadgeFont,
    background_path: impl AsRef<Path>,
    options: &BadgeOptions,
    output_path: impl AsRef<Path>,
) -> Result<DocumentStats>
where
    S: RecordSource + Send + 'static,
{
    let background_path = background_path.as_ref().to_owned();
    let output_path = output_path.as_ref().to_owned();
    options.validate()?;

    let background =
        tokio::fs::read(&background_path)
            .await
            .map_err(|e| BadgeError::Background {
                path: background_path.clone(),
                reason: e.to_string(),
            })?;

    let font = font.clone();
    let options = options.clone();

    // Composition is CPU-bound and the source may block on I/O
    let (bytes, stats) = tokio::task::spawn_blocking(move || {
        source.with_records(|records| generate_pdf_bytes(records, &font, &background, &options))
    })
    .await?
    .map_err(|e| match e {
        BadgeError::Image(reason) => BadgeError::Background {
            path: background_path,
            reason,
        },
        other => other,
    })?;

    tokio::fs::write(&output_path, bytes).await?;

    Ok(stats)
}

// =============================================================================
// Tests
// =============================================================================
