//! Polyline drawing for gamma curves.

use crate::canvas::{Canvas, CanvasError, Color};
use crate::command::{Curve, PlotOptions};
use crate::geom::Point;

/// Draw each curve as a connected polyline through `(x * scale_x, y)`.
///
/// The canvas is flushed every `draw_speed` points so long curves render
/// progressively; the cursor glyph is visible while a curve is traced.
/// Identical curves collapse to a single draw, which cannot change the
/// visual output.
pub(crate) fn draw_curves<C: Canvas>(
    canvas: &mut C,
    options: &PlotOptions,
    curves: &[Curve],
) -> Result<(), CanvasError> {
    let curves = collapse_identical(curves);
    let batch = options.draw_speed.max(1);
    for (index, curve) in curves.iter().enumerate() {
        let color = curve_color(options, curves.len(), index);
        let mut previous: Option<Point> = None;
        for (x, y) in curve.iter().enumerate() {
            let point = Point::new(x as f64 * options.scale_x, *y);
            match previous {
                None => canvas.set_cursor_visible(true)?,
                Some(previous) => canvas.draw_segment(previous, point, color)?,
            }
            if x > 0 && x % batch == 0 {
                canvas.flush()?;
            }
            previous = Some(point);
        }
        canvas.set_cursor_visible(false)?;
        canvas.flush()?;
    }
    Ok(())
}

fn curve_color(options: &PlotOptions, curve_count: usize, index: usize) -> Color {
    if curve_count == options.colors.len() {
        options.colors[index]
    } else if options.colors.len() == 1 {
        options.colors[0]
    } else {
        Color::BLACK
    }
}

fn collapse_identical(curves: &[Curve]) -> &[Curve] {
    if curves.len() > 1 && curves.iter().all(|curve| *curve == curves[0]) {
        &curves[..1]
    } else {
        curves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasOp, RecordingCanvas};

    fn segment_colors(canvas: &RecordingCanvas) -> Vec<Color> {
        canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Segment { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn matching_color_count_assigns_per_index() {
        let mut canvas = RecordingCanvas::new();
        let curves = vec![vec![0.0, 1.0], vec![0.0, 2.0], vec![0.0, 3.0]];
        draw_curves(&mut canvas, &PlotOptions::default(), &curves).expect("draw succeeds");
        assert_eq!(
            segment_colors(&canvas),
            vec![Color::RED, Color::GREEN, Color::BLUE]
        );
    }

    #[test]
    fn single_color_is_shared_and_mismatch_falls_back_to_black() {
        let mut canvas = RecordingCanvas::new();
        let curves = vec![vec![0.0, 1.0], vec![0.0, 2.0]];
        let options = PlotOptions::default().with_colors(vec![Color::GREEN]);
        draw_curves(&mut canvas, &options, &curves).expect("draw succeeds");
        assert_eq!(segment_colors(&canvas), vec![Color::GREEN, Color::GREEN]);

        let mut canvas = RecordingCanvas::new();
        draw_curves(&mut canvas, &PlotOptions::default(), &curves).expect("draw succeeds");
        assert_eq!(segment_colors(&canvas), vec![Color::BLACK, Color::BLACK]);
    }

    #[test]
    fn identical_curves_collapse_to_one_draw() {
        let mut canvas = RecordingCanvas::new();
        let curve = vec![512.0; 16];
        let curves = vec![curve.clone(), curve.clone(), curve];
        draw_curves(&mut canvas, &PlotOptions::default(), &curves).expect("draw succeeds");
        assert_eq!(segment_colors(&canvas).len(), 15);
    }

    #[test]
    fn scale_x_stretches_the_x_positions() {
        let mut canvas = RecordingCanvas::new();
        let options = PlotOptions::default().with_scale_x(4.0);
        draw_curves(&mut canvas, &options, &[vec![0.0, 10.0]]).expect("draw succeeds");
        let Some(CanvasOp::Segment { to, .. }) = canvas
            .ops()
            .iter()
            .find(|op| matches!(op, CanvasOp::Segment { .. }))
        else {
            panic!("expected a segment");
        };
        assert_eq!(to.x, 4.0);
    }

    #[test]
    fn draw_speed_batches_intermediate_flushes() {
        let mut canvas = RecordingCanvas::new();
        let options = PlotOptions::default().with_draw_speed(4);
        draw_curves(&mut canvas, &options, &[(0..10).map(f64::from).collect()])
            .expect("draw succeeds");
        let flushes = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, CanvasOp::Flush))
            .count();
        // Two intermediate flushes (x = 4 and 8) plus the final one.
        assert_eq!(flushes, 3);
    }
}
