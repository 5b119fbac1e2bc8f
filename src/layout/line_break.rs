//! Line breaking algorithm

use crate::document::RichText;
use crate::layout::font::FontMetrics;
use std::ops::Range;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Layout result for a single line
#[derive(Debug, Clone, PartialEq)]
pub struct LineMetrics {
    /// Byte range within the text this line covers
    pub byte_range: Range<usize>,
    /// Line height
    pub height: f32,
    /// Advance width of the line, trailing whitespace included
    pub width: f32,
}

/// Width and height of a byte range
#[derive(Debug, Clone, Copy, Default)]
struct Extent {
    width: f32,
    /// Width without trailing whitespace
    trimmed_width: f32,
    height: f32,
}

/// Greedy line breaker over UAX #14 break opportunities
#[derive(Debug, Default)]
pub struct LineBreaker;

impl LineBreaker {
    pub fn new() -> Self {
        Self
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Words wider than `max_width` are broken between grapheme clusters.
    pub fn layout(&self, text: &RichText, max_width: f32, metrics: &FontMetrics) -> Vec<LineMetrics> {
        let mut lines = Vec::new();
        if text.is_empty() {
            return lines;
        }

        let mut line = LineMetrics {
            byte_range: 0..0,
            height: 0.0,
            width: 0.0,
        };
        let mut prev = 0;

        for (pos, opportunity) in linebreaks(text.text()) {
            let word = extent(text, prev..pos, metrics);

            if line.width + word.trimmed_width > max_width && line.byte_range.end > line.byte_range.start {
                lines.push(finish_line(&mut line, prev));
            }

            if word.trimmed_width > max_width {
                // Emergency break inside the word
                for (offset, grapheme) in text.text()[prev..pos].grapheme_indices(true) {
                    let start = prev + offset;
                    let end = start + grapheme.len();
                    let cluster = extent(text, start..end, metrics);
                    if line.width + cluster.trimmed_width > max_width && line.byte_range.end > line.byte_range.start {
                        lines.push(finish_line(&mut line, start));
                    }
                    line.width += cluster.width;
                    line.height = line.height.max(cluster.height);
                    line.byte_range.end = end;
                }
            } else {
                line.width += word.width;
                line.height = line.height.max(word.height);
                line.byte_range.end = pos;
            }

            if opportunity == BreakOpportunity::Mandatory {
                lines.push(finish_line(&mut line, pos));
            }
            prev = pos;
        }

        lines
    }
}

/// Take the current line and start a new one at `next_start`
fn finish_line(line: &mut LineMetrics, next_start: usize) -> LineMetrics {
    std::mem::replace(
        line,
        LineMetrics {
            byte_range: next_start..next_start,
            height: 0.0,
            width: 0.0,
        },
    )
}

fn extent(text: &RichText, range: Range<usize>, metrics: &FontMetrics) -> Extent {
    let runs = text.runs();
    let first = runs.partition_point(|run| run.range.end <= range.start);
    let mut result = Extent::default();
    let mut trailing_ws = 0.0;

    for run in &runs[first..] {
        if run.range.start >= range.end {
            break;
        }
        let start = run.range.start.max(range.start);
        let end = run.range.end.min(range.end);

        result.height = result.height.max(metrics.styled_line_height(&run.style));
        for c in text.text()[start..end].chars() {
            let w = metrics.styled_width(c, &run.style);
            result.width += w;
            if c.is_whitespace() {
                trailing_ws += w;
            } else {
                trailing_ws = 0.0;
            }
        }
    }

    result.trimmed_width = result.width - trailing_ws;
    result
}
