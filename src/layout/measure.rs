//! Measurement boundary between the pagination core and text layout

use crate::document::{image_height_for_width, RichText};
use crate::layout::font::FontMetrics;
use crate::layout::line_break::{LineBreaker, LineMetrics};
use crate::layout::materialize::RowModel;
use smallvec::{smallvec, SmallVec};

/// Offsets within a row at which it may be cut
pub type BreakPoints = SmallVec<[f32; 16]>;

/// Supplies rendered heights and legal cut offsets for rows.
///
/// Offsets are measured from the top of the row's box, margins included.
/// Break points are increasing, may start at 0 and end at the row's height.
pub trait Measure {
    /// Rendered height of `row` laid out at `width`
    fn height(&self, row: &RowModel, width: f32) -> f32;

    /// Legal cut offsets of `row`. Rows without internal cuts are atomic.
    fn break_points(&self, row: &RowModel, width: f32) -> BreakPoints {
        smallvec![0.0, self.height(row, width)]
    }
}

impl<M: Measure + ?Sized> Measure for &M {
    fn height(&self, row: &RowModel, width: f32) -> f32 {
        (**self).height(row, width)
    }

    fn break_points(&self, row: &RowModel, width: f32) -> BreakPoints {
        (**self).break_points(row, width)
    }
}

/// Deterministic measurer driven by font metrics
#[derive(Debug, Default)]
pub struct MetricsMeasurer {
    metrics: FontMetrics,
    line_breaker: LineBreaker,
    max_image_height: Option<f32>,
}

impl MetricsMeasurer {
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            metrics,
            line_breaker: LineBreaker::new(),
            max_image_height: None,
        }
    }

    /// Cap image rows at `max` (e.g. the viewport height)
    pub fn with_max_image_height(mut self, max: Option<f32>) -> Self {
        self.max_image_height = max;
        self
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn set_metrics(&mut self, metrics: FontMetrics) {
        self.metrics = metrics;
    }

    /// Lines of `content` at `width`
    pub fn lines(&self, content: &RichText, width: f32) -> Vec<LineMetrics> {
        self.line_breaker.layout(content, width, &self.metrics)
    }

    fn image_height(&self, row: &RowModel, width: f32) -> f32 {
        let height = match row {
            RowModel::Image { size, .. } => image_height_for_width(*size, width),
            RowModel::Text { .. } => 0.0,
        };
        match self.max_image_height {
            Some(max) => height.min(max),
            None => height,
        }
    }
}

impl Measure for MetricsMeasurer {
    fn height(&self, row: &RowModel, width: f32) -> f32 {
        match row {
            RowModel::Text {
                content,
                top_margin,
                bottom_margin,
                ..
            } => {
                let text_height: f32 = self.lines(content, width).iter().map(|l| l.height).sum();
                text_height.ceil() + top_margin + bottom_margin
            }
            RowModel::Image { .. } => self.image_height(row, width),
        }
    }

    fn break_points(&self, row: &RowModel, width: f32) -> BreakPoints {
        match row {
            RowModel::Text {
                content,
                top_margin,
                bottom_margin,
                ..
            } => {
                let lines = self.lines(content, width);
                let mut points: BreakPoints = smallvec![0.0];
                let mut y = *top_margin;
                let last = lines.len().saturating_sub(1);
                for line in &lines[..last] {
                    y += line.height;
                    points.push(y);
                }
                let text_height: f32 = lines.iter().map(|l| l.height).sum();
                points.push(text_height.ceil() + top_margin + bottom_margin);
                points
            }
            RowModel::Image { .. } => smallvec![0.0, self.image_height(row, width)],
        }
    }
}
