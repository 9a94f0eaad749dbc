//! Gridline and label layout.
//!
//! Margins are accumulated in a single pass per redraw: the label size in
//! data units depends on the screen scale, which depends on the margin, and
//! the layout accepts that one-pass approximation instead of iterating to a
//! fixed point.

use crate::canvas::{Canvas, CanvasError, Color, TextAlign, TextMeasurer};
use crate::command::GridLine;
use crate::geom::Point;
use crate::mapper::{Mapper, Margin};

/// Pixel padding folded into every margin side.
const MARGIN_PAD_PX: f64 = 4.0;
/// Ticks start this many pixels outside the plot origin.
const TICK_START_PX: f64 = 4.0;
/// Gridlines start this many pixels inside the plot origin.
const LINE_INSET_PX: f64 = 1.0;
/// Gap between a horizontal line's label and the left axis.
const LABEL_GAP_X_PX: f64 = 8.0;
/// Gap between a vertical line's label and the bottom axis.
const LABEL_GAP_Y_PX: f64 = 6.0;
/// Fraction of a label's extent reserved against its neighbors.
const OVERLAP_PAD_FACTOR: f64 = 0.6;

struct Placed<'a> {
    line: &'a GridLine,
    labeled: bool,
    /// Label extent in data units.
    size: (f64, f64),
    /// Anchor handed to the canvas.
    anchor: Point,
}

/// Lay out and draw the plot border, gridlines, and surviving labels.
///
/// Updates the mapper's margin (and pushes the new world rectangle to the
/// canvas) when the label set requires different insets than the stored
/// ones.
pub(crate) fn draw_grid<C>(
    canvas: &mut C,
    mapper: &mut Mapper,
    lines: &[GridLine],
) -> Result<(), CanvasError>
where
    C: Canvas + TextMeasurer,
{
    canvas.set_cursor_visible(false)?;
    draw_border(canvas, mapper)?;

    let mut placed: Vec<Placed> = lines
        .iter()
        .map(|line| Placed {
            line,
            labeled: line.label.is_some(),
            size: (0.0, 0.0),
            anchor: Point::new(0.0, 0.0),
        })
        .collect();
    placed.sort_by(|a, b| a.line.pos.total_cmp(&b.line.pos));

    let window = canvas.window_size()?;
    let (sx, sy) = mapper.screen_scale(window);
    let pad = (MARGIN_PAD_PX / sx, MARGIN_PAD_PX / sy);
    let inv_scale = 1.0 / mapper.scale();
    let mut margin = Margin {
        left: -pad.0 * inv_scale,
        bottom: -pad.1 * inv_scale,
        right: pad.0 * inv_scale,
        top: pad.1 * inv_scale,
    };

    let plot = mapper.plot_area();
    for entry in &mut placed {
        let Some(label) = entry.line.label.as_deref() else {
            continue;
        };
        let axis = entry.line.axis();
        if !mapper.zoom_area().axis(axis).contains(entry.line.pos) {
            // Outside the visible range: no label, no margin contribution.
            entry.labeled = false;
            continue;
        }
        let (width_px, height_px) = canvas.measure_block(label);
        let size = (width_px as f64 / sx, height_px as f64 / sy);
        let anchor = label_anchor(entry.line, size, sx, sy);
        entry.size = size;
        entry.anchor = anchor;

        // Occupied extent starts at the aligned edge of the text block.
        let start = if entry.line.horizontal {
            (anchor.x - size.0, anchor.y)
        } else {
            (anchor.x - size.0 / 2.0, anchor.y)
        };

        let low_x = (start.0 - pad.0) * inv_scale;
        if low_x < margin.left {
            margin.left = low_x;
        }
        let high_x = (start.0 + size.0 - plot.x.max + pad.0) * inv_scale;
        if high_x > margin.right {
            margin.right = high_x;
        }
        let low_y = (start.1 - pad.1) * inv_scale;
        if low_y < margin.bottom {
            margin.bottom = low_y;
        }
        let high_y = (start.1 + size.1 - plot.y.max + pad.1) * inv_scale;
        if high_y > margin.top {
            margin.top = high_y;
        }
    }

    if margin != mapper.margin() {
        mapper.set_margin(margin);
        canvas.set_world(mapper.world_rect())?;
    }

    suppress_overlaps(&mut placed);

    for entry in &placed {
        draw_line(canvas, mapper, entry, sx, sy)?;
    }
    canvas.flush()
}

/// Walk labels in position order per axis and drop the lower-priority side
/// of every overlapping pair. Ties go to the later label.
fn suppress_overlaps(placed: &mut [Placed<'_>]) {
    let mut last_index: [Option<usize>; 2] = [None, None];
    let mut last_end: [f64; 2] = [f64::NEG_INFINITY; 2];
    for index in 0..placed.len() {
        if !placed[index].labeled {
            continue;
        }
        let horizontal = placed[index].line.horizontal as usize;
        let extent = if placed[index].line.horizontal {
            placed[index].size.1
        } else {
            placed[index].size.0
        };
        let pad = extent * OVERLAP_PAD_FACTOR;
        let pos = placed[index].line.pos;
        if pos - pad < last_end[horizontal]
            && let Some(previous) = last_index[horizontal]
        {
            if placed[index].line.priority < placed[previous].line.priority {
                placed[index].labeled = false;
                continue;
            }
            placed[previous].labeled = false;
        }
        last_index[horizontal] = Some(index);
        last_end[horizontal] = pos + pad;
    }
}

fn label_anchor(line: &GridLine, size: (f64, f64), sx: f64, sy: f64) -> Point {
    if line.horizontal {
        Point::new(-LABEL_GAP_X_PX / sx, line.pos - 0.5 * size.1)
    } else {
        Point::new(line.pos, -size.1 - LABEL_GAP_Y_PX / sy)
    }
}

fn draw_border<C: Canvas>(canvas: &mut C, mapper: &Mapper) -> Result<(), CanvasError> {
    let plot = mapper.plot_area();
    let corners = [
        Point::new(plot.x.min, plot.y.min),
        Point::new(plot.x.max, plot.y.min),
        Point::new(plot.x.max, plot.y.max),
        Point::new(plot.x.min, plot.y.max),
    ];
    for index in 0..corners.len() {
        let next = corners[(index + 1) % corners.len()];
        canvas.draw_segment(corners[index], next, Color::BORDER)?;
    }
    Ok(())
}

fn draw_line<C: Canvas>(
    canvas: &mut C,
    mapper: &Mapper,
    entry: &Placed<'_>,
    sx: f64,
    sy: f64,
) -> Result<(), CanvasError> {
    let line = entry.line;
    if !mapper.zoom_area().axis(line.axis()).contains(line.pos) {
        return Ok(());
    }
    let plot = mapper.plot_area();
    if entry.labeled
        && let Some(label) = line.label.as_deref()
    {
        let align = if line.horizontal {
            TextAlign::Right
        } else {
            TextAlign::Center
        };
        canvas.write_text(entry.anchor, label, align, line.label_color)?;
        let (tick_from, tick_to) = if line.horizontal {
            (
                Point::new(-TICK_START_PX / sx, line.pos),
                Point::new(LINE_INSET_PX / sx, line.pos),
            )
        } else {
            (
                Point::new(line.pos, -TICK_START_PX / sy),
                Point::new(line.pos, LINE_INSET_PX / sy),
            )
        };
        canvas.draw_segment(tick_from, tick_to, line.label_color)?;
    }
    let (from, to) = if line.horizontal {
        (
            Point::new(LINE_INSET_PX / sx, line.pos),
            Point::new(plot.x.max, line.pos),
        )
    } else {
        (
            Point::new(line.pos, LINE_INSET_PX / sy),
            Point::new(line.pos, plot.y.max),
        )
    };
    canvas.draw_segment(from, to, line.color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasOp, RecordingCanvas};

    fn texts(canvas: &RecordingCanvas) -> Vec<String> {
        canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn segment_count(canvas: &RecordingCanvas) -> usize {
        canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, CanvasOp::Segment { .. }))
            .count()
    }

    #[test]
    fn empty_grid_reserves_the_baseline_margin() {
        let mut canvas = RecordingCanvas::new();
        let mut mapper = Mapper::default();
        draw_grid(&mut canvas, &mut mapper, &[]).expect("layout succeeds");
        let margin = mapper.margin();
        assert!(margin.left < 0.0 && margin.bottom < 0.0);
        assert!(margin.right > 0.0 && margin.top > 0.0);
        assert_eq!(margin.right, -margin.left);
        // Border only.
        assert_eq!(segment_count(&canvas), 4);
    }

    #[test]
    fn baseline_margin_is_stable_across_redraws() {
        let mut canvas = RecordingCanvas::new();
        let mut mapper = Mapper::default();
        draw_grid(&mut canvas, &mut mapper, &[]).expect("layout succeeds");
        let first = mapper.margin();
        draw_grid(&mut canvas, &mut mapper, &[]).expect("layout succeeds");
        assert_eq!(mapper.margin(), first);
        // The second pass must not push a new world rectangle.
        let world_updates = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, CanvasOp::SetWorld(_)))
            .count();
        assert_eq!(world_updates, 1);
    }

    #[test]
    fn label_outside_zoom_is_dropped_and_ignored_for_margins() {
        let mut canvas = RecordingCanvas::new();
        let mut mapper = Mapper::default();
        draw_grid(&mut canvas, &mut mapper, &[]).expect("layout succeeds");
        let baseline = mapper.margin();

        mapper.zoom(Some(4.0), (-1.0, -1.0));
        let mut canvas = RecordingCanvas::new();
        let lines = [GridLine::vertical(900.0).with_label("900")];
        draw_grid(&mut canvas, &mut mapper, &lines).expect("layout succeeds");
        assert!(texts(&canvas).is_empty());
        // Out-of-zoom line is not drawn either: only the border remains.
        assert_eq!(segment_count(&canvas), 4);
        let margin = mapper.margin();
        assert_eq!(margin.right, baseline.right);
        assert_eq!(margin.top, baseline.top);
    }

    #[test]
    fn right_margin_grows_for_a_label_at_the_far_edge() {
        let mut canvas = RecordingCanvas::new();
        let mut mapper = Mapper::default();
        draw_grid(&mut canvas, &mut mapper, &[]).expect("layout succeeds");
        let baseline = mapper.margin();

        let lines = [GridLine::vertical(1023.0).with_label("1023")];
        draw_grid(&mut canvas, &mut mapper, &lines).expect("layout succeeds");
        let margin = mapper.margin();
        assert!(margin.right > baseline.right);
        assert!(margin.bottom < baseline.bottom);
        assert_eq!(margin.left, baseline.left);
    }

    #[test]
    fn overlapping_equal_priority_labels_keep_the_later_one() {
        let mut canvas = RecordingCanvas::new();
        let mut mapper = Mapper::default();
        let lines = [
            GridLine::vertical(127.0).with_label("127"),
            GridLine::vertical(128.0).with_label("128"),
        ];
        draw_grid(&mut canvas, &mut mapper, &lines).expect("layout succeeds");
        assert_eq!(texts(&canvas), vec!["128".to_string()]);
        // Both gridlines are still drawn: border + tick + two lines.
        assert_eq!(segment_count(&canvas), 4 + 1 + 2);
    }

    #[test]
    fn higher_priority_label_wins_regardless_of_order() {
        let mut mapper = Mapper::default();
        let mut canvas = RecordingCanvas::new();
        let lines = [
            GridLine::vertical(127.0).with_label("a").with_priority(1),
            GridLine::vertical(128.0).with_label("b"),
        ];
        draw_grid(&mut canvas, &mut mapper, &lines).expect("layout succeeds");
        assert_eq!(texts(&canvas), vec!["a".to_string()]);

        let mut canvas = RecordingCanvas::new();
        let lines = [
            GridLine::vertical(127.0).with_label("a"),
            GridLine::vertical(128.0).with_label("b").with_priority(1),
        ];
        draw_grid(&mut canvas, &mut mapper, &lines).expect("layout succeeds");
        assert_eq!(texts(&canvas), vec!["b".to_string()]);
    }

    #[test]
    fn axes_do_not_collide_with_each_other() {
        let mut canvas = RecordingCanvas::new();
        let mut mapper = Mapper::default();
        let lines = [
            GridLine::vertical(128.0).with_label("x"),
            GridLine::horizontal(128.0).with_label("y"),
        ];
        draw_grid(&mut canvas, &mut mapper, &lines).expect("layout succeeds");
        let mut drawn = texts(&canvas);
        drawn.sort();
        assert_eq!(drawn, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn distant_labels_all_survive() {
        let mut canvas = RecordingCanvas::new();
        let mut mapper = Mapper::default();
        let lines: Vec<GridLine> = (1..=4)
            .map(|i| GridLine::vertical(i as f64 * 200.0).with_label(format!("{}", i * 200)))
            .collect();
        draw_grid(&mut canvas, &mut mapper, &lines).expect("layout succeeds");
        assert_eq!(texts(&canvas).len(), 4);
    }
}
