//! Confusion-matrix heat-map rendering.
//!
//! Renders a row-normalized confusion matrix as a PNG heat-map: sequential
//! blue color scale, class names on both axes, and each cell overlaid with
//! its value to two decimals (white on the diagonal for contrast). Every
//! call builds and tears down its own drawing area, so successive renders
//! share no canvas state.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::error::{FerEvalError, Result};
use super::metrics::ConfusionMatrix;

/// Base figure size in inches; multiplied by `dpi` for pixel dimensions
const FIG_WIDTH_IN: f64 = 6.4;
const FIG_HEIGHT_IN: f64 = 4.8;

/// Sequential blue scale from near-white (0.0) to dark blue (1.0)
fn blues(value: f64) -> RGBColor {
    let v = value.clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64| (a + (b - a) * v) as u8;
    RGBColor(lerp(247.0, 8.0), lerp(251.0, 48.0), lerp(255.0, 107.0))
}

/// Render a confusion-matrix heat-map for two parallel label sequences.
///
/// `class_names` must be index-aligned with the label integers. The image
/// is written to `output` at `dpi`-scaled pixel dimensions.
pub fn render_confusion_matrix(
    y_true: &[usize],
    y_pred: &[usize],
    class_names: &[&str],
    title: &str,
    output: &Path,
    dpi: u32,
) -> Result<()> {
    let k = class_names.len();
    let cm = ConfusionMatrix::from_sequences(y_true, y_pred, k);
    let norm = cm.normalize_rows();

    let width = (FIG_WIDTH_IN * dpi as f64) as u32;
    let height = (FIG_HEIGHT_IN * dpi as f64) as u32;
    let font_px = (dpi as f64 * 0.05) as u32;

    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", font_px * 2))
        .margin((dpi / 10) as i32)
        .set_label_area_size(LabelAreaPosition::Left, (dpi as f64 * 0.45) as u32)
        .set_label_area_size(LabelAreaPosition::Bottom, (dpi as f64 * 0.45) as u32)
        .build_cartesian_2d(
            (0..k as i32).into_segmented(),
            (0..k as i32).into_segmented(),
        )
        .map_err(render_err)?;

    let name_of = |seg: &SegmentValue<i32>, flip: bool| -> String {
        let idx = match seg {
            SegmentValue::Exact(v) | SegmentValue::CenterOf(v) => *v,
            SegmentValue::Last => return String::new(),
        };
        let idx = if flip { k as i32 - 1 - idx } else { idx };
        class_names
            .get(idx as usize)
            .map(|n| n.to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Predicted label")
        .y_desc("True label")
        .x_labels(k)
        .y_labels(k)
        .x_label_style(
            TextStyle::from(("sans-serif", font_px))
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Center, VPos::Top)),
        )
        .y_label_style(("sans-serif", font_px))
        .x_label_formatter(&|seg| name_of(seg, false))
        .y_label_formatter(&|seg| name_of(seg, true))
        .draw()
        .map_err(render_err)?;

    // Row 0 is drawn at the top, matching the axis label order
    for (i, row) in norm.iter().enumerate() {
        let y = k as i32 - 1 - i as i32;
        for (j, &value) in row.iter().enumerate() {
            let x = j as i32;
            let cell = Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                blues(value).filled(),
            );
            chart.draw_series(std::iter::once(cell)).map_err(render_err)?;

            let text_color = if i == j { WHITE } else { BLACK };
            let style = TextStyle::from(("sans-serif", font_px))
                .color(&text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            let label = Text::new(
                format!("{:.2}", value),
                (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                style,
            );
            chart.draw_series(std::iter::once(label)).map_err(render_err)?;
        }
    }

    root.present().map_err(render_err)?;
    Ok(())
}

fn render_err<E: std::fmt::Display>(err: E) -> FerEvalError {
    FerEvalError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blues_endpoints() {
        assert_eq!(blues(0.0), RGBColor(247, 251, 255));
        assert_eq!(blues(1.0), RGBColor(8, 48, 107));
        // Out-of-range values clamp instead of wrapping
        assert_eq!(blues(2.0), blues(1.0));
        assert_eq!(blues(-1.0), blues(0.0));
    }

    #[test]
    fn test_render_writes_png() {
        let path = std::env::temp_dir().join(format!("fer_eval_cm_{}.png", std::process::id()));
        let y_true = vec![0, 0, 1, 1, 2, 3];
        let y_pred = vec![0, 1, 1, 1, 2, 3];

        render_confusion_matrix(
            &y_true,
            &y_pred,
            &["Angry", "Happy", "Sad", "Neutral"],
            "Confusion Matrix",
            &path,
            100,
        )
        .unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_render_with_absent_class() {
        // Class 3 never appears; its row is zero-filled, not NaN
        let path = std::env::temp_dir().join(format!("fer_eval_cm_abs_{}.png", std::process::id()));
        render_confusion_matrix(
            &[0, 1, 2],
            &[0, 1, 2],
            &["Angry", "Happy", "Sad", "Neutral"],
            "Confusion Matrix",
            &path,
            100,
        )
        .unwrap();
        assert!(path.exists());
        std::fs::remove_file(path).ok();
    }
}
