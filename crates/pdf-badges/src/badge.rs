//! Single badge rendering

use crate::canvas::{Canvas, CanvasScope};
use crate::constants::mm_to_pt;
use crate::fonts::FontMetrics;
use crate::options::BadgeOptions;
use crate::text::{FitRequest, PlacedText, fit_and_place};
use crate::types::{BadgeRecord, Field, Result};

/// Fit and position every present field of `record`.
///
/// Fields that cannot be shrunk enough are left out.
pub fn layout_badge(
    metrics: &dyn FontMetrics,
    options: &BadgeOptions,
    record: &BadgeRecord,
) -> Vec<(Field, PlacedText)> {
    let offsets = options.layout.offsets(record.presence());

    Field::ALL
        .into_iter()
        .filter_map(|field| {
            let y_mm = offsets.get(field)?;
            let style = options.style(field);
            let text = match field {
                Field::Name => record.name(),
                Field::Company => record.company(),
                Field::Role => record.role(),
            };
            let request = FitRequest {
                max_font_size: style.max_font_size_pt,
                min_font_size: options.min_font_size_pt,
                region_width_mm: style.region_width_mm(options.badge_width_mm),
                region_height_mm: style.region_height_mm(options.badge_height_mm),
                area_width_mm: options.badge_width_mm,
                y_mm,
                multiline: style.multiline,
            };
            fit_and_place(metrics, text, &request).map(|placed| (field, placed))
        })
        .collect()
}

/// Draw one badge with its top-left corner at the canvas origin.
pub fn render_badge<C: Canvas + ?Sized>(
    canvas: &mut C,
    metrics: &dyn FontMetrics,
    options: &BadgeOptions,
    record: &BadgeRecord,
    background: &C::Image,
) -> Result<()> {
    let width = mm_to_pt(options.badge_width_mm);
    let height = mm_to_pt(options.badge_height_mm);

    {
        let mut scope = CanvasScope::new(canvas);
        scope.draw_image(background, width, height)?;
    }

    canvas.stroke_rect(width, height, options.border_color, options.border_width_pt);

    if !record.presence().any() {
        return Ok(());
    }

    for (_, placed) in layout_badge(metrics, options, record) {
        canvas.draw_text(&placed, options.text_color);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCall, RecordingCanvas};
    use crate::fonts::HelveticaMetrics;

    const EPSILON: f32 = 1e-3;

    fn band_center_pt(y_mm: f32, divisor: f32) -> f32 {
        mm_to_pt(y_mm) + mm_to_pt(76.0 / divisor) / 2.0
    }

    fn ink_center_y(placed: &PlacedText) -> f32 {
        placed.ink_on_badge().center_y()
    }

    #[test]
    fn test_all_three_fields() {
        let options = BadgeOptions::default();
        let record = BadgeRecord::new(["Alice Doe", "Acme Corp", "Speaker"]);
        let placed = layout_badge(&HelveticaMetrics, &options, &record);

        let fields: Vec<Field> = placed.iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, vec![Field::Name, Field::Company, Field::Role]);

        assert!((ink_center_y(&placed[0].1) - band_center_pt(5.0, 3.0)).abs() < EPSILON);
        assert!((ink_center_y(&placed[1].1) - band_center_pt(60.0, 7.0)).abs() < EPSILON);
        assert!((ink_center_y(&placed[2].1) - band_center_pt(80.0, 7.0)).abs() < EPSILON);

        assert_eq!(placed[0].1.font_size(), 18.0);
        assert_eq!(placed[1].1.font_size(), 16.0);
        assert_eq!(placed[2].1.font_size(), 14.0);
    }

    #[test]
    fn test_name_only() {
        let options = BadgeOptions::default();
        let record = BadgeRecord::new(["Bob", "", ""]);
        let placed = layout_badge(&HelveticaMetrics, &options, &record);

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].0, Field::Name);
        assert!((ink_center_y(&placed[0].1) - band_center_pt(30.0, 3.0)).abs() < EPSILON);
    }

    #[test]
    fn test_company_without_name() {
        let options = BadgeOptions::default();
        let record = BadgeRecord::new(["", "Acme Corp"]);
        let placed = layout_badge(&HelveticaMetrics, &options, &record);

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].0, Field::Company);
        assert!((ink_center_y(&placed[0].1) - band_center_pt(70.0, 7.0)).abs() < EPSILON);
    }

    #[test]
    fn test_hyphenated_name_wraps_at_full_size() {
        let options = BadgeOptions::default();
        let record = BadgeRecord::new(["Bartholomew-Featherstonehaugh", "Acme Corp", ""]);
        let placed = layout_badge(&HelveticaMetrics, &options, &record);

        let (field, name) = &placed[0];
        assert_eq!(*field, Field::Name);
        assert_eq!(name.font_size(), 18.0);
        assert_eq!(name.block.lines.len(), 2);
        assert_eq!(name.block.lines[0].text, "Bartholomew-");
        assert!((ink_center_y(name) - band_center_pt(10.0, 3.0)).abs() < EPSILON);
    }

    #[test]
    fn test_unfittable_field_is_omitted() {
        let options = BadgeOptions::default();
        let long_company = "W".repeat(300);
        let record = BadgeRecord::new(["Alice", long_company.as_str(), "Speaker"]);
        let placed = layout_badge(&HelveticaMetrics, &options, &record);

        let fields: Vec<Field> = placed.iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, vec![Field::Name, Field::Role]);
    }

    #[test]
    fn test_render_empty_record() {
        let mut canvas = RecordingCanvas::new();
        let options = BadgeOptions::default();
        render_badge(
            &mut canvas,
            &HelveticaMetrics,
            &options,
            &BadgeRecord::default(),
            &(),
        )
        .unwrap();

        assert_eq!(canvas.calls.len(), 4);
        assert!(matches!(canvas.calls[1], DrawCall::Image { .. }));
        assert!(matches!(canvas.calls[3], DrawCall::Rect { .. }));
        assert_eq!(canvas.texts().count(), 0);
        assert_eq!(canvas.depth(), 0);
    }

    #[test]
    fn test_render_blank_fields_draws_no_text() {
        let mut canvas = RecordingCanvas::new();
        let options = BadgeOptions::default();
        let record = BadgeRecord::new(["", "", ""]);
        render_badge(&mut canvas, &HelveticaMetrics, &options, &record, &()).unwrap();

        assert_eq!(canvas.calls.len(), 4);
        assert_eq!(canvas.texts().count(), 0);
    }

    #[test]
    fn test_render_draws_background_to_badge_size() {
        let mut canvas = RecordingCanvas::new();
        let options = BadgeOptions::default();
        let record = BadgeRecord::new(["Alice Doe", "Acme Corp", "Speaker"]);
        render_badge(&mut canvas, &HelveticaMetrics, &options, &record, &()).unwrap();

        match &canvas.calls[1] {
            DrawCall::Image { width, height, .. } => {
                assert!((width - mm_to_pt(100.0)).abs() < EPSILON);
                assert!((height - mm_to_pt(76.0)).abs() < EPSILON);
            }
            other => panic!("expected image, got {:?}", other),
        }
        assert_eq!(canvas.texts().count(), 3);
    }
}
