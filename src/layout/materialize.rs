//! Row materialization: segments into bounded, measurable rows

use crate::document::{ImageSize, RichText, Segment, SegmentId};
use crate::PagerConfig;
use std::rc::Rc;

/// Identity of one materialized row sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContentVersion(pub u64);

/// A layout-ready unit derived from one segment
#[derive(Debug, Clone, PartialEq)]
pub enum RowModel {
    Text {
        content: RichText,
        top_margin: f32,
        bottom_margin: f32,
        source: SegmentId,
    },
    Image {
        source: SegmentId,
        size: Option<ImageSize>,
    },
}

impl RowModel {
    /// Segment this row was cut from
    pub fn source(&self) -> SegmentId {
        match self {
            RowModel::Text { source, .. } | RowModel::Image { source, .. } => *source,
        }
    }

    /// Top margin, zero for images
    pub fn top_margin(&self) -> f32 {
        match self {
            RowModel::Text { top_margin, .. } => *top_margin,
            RowModel::Image { .. } => 0.0,
        }
    }

    /// Bottom margin, zero for images
    pub fn bottom_margin(&self) -> f32 {
        match self {
            RowModel::Text { bottom_margin, .. } => *bottom_margin,
            RowModel::Image { .. } => 0.0,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, RowModel::Text { .. })
    }
}

/// Materialized rows tagged with the content version they came from
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    version: ContentVersion,
    rows: Rc<[RowModel]>,
}

impl Default for RowSet {
    fn default() -> Self {
        Self::new(ContentVersion::default(), Vec::new())
    }
}

impl RowSet {
    pub fn new(version: ContentVersion, rows: Vec<RowModel>) -> Self {
        Self {
            version,
            rows: rows.into(),
        }
    }

    pub fn version(&self) -> ContentVersion {
        self.version
    }

    pub fn rows(&self) -> &[RowModel] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&RowModel> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Convert segments into rows.
///
/// Text segments are cut into chunks of at most `config.max_chunk_chars`
/// characters. Only the first chunk of a paragraph can carry a top margin, and
/// only when the previous row was not text; only the last chunk carries the
/// bottom margin.
pub fn materialize(segments: &[Segment], config: &PagerConfig) -> Vec<RowModel> {
    let mut rows = Vec::with_capacity(segments.len());
    let mut trailing_margin = false;

    for (idx, segment) in segments.iter().enumerate() {
        let source = SegmentId(idx);
        match segment {
            Segment::Image(image) => {
                rows.push(RowModel::Image {
                    source,
                    size: image.size,
                });
                trailing_margin = false;
            }
            Segment::Text(text) => {
                let chunks: Vec<RichText> = text
                    .span
                    .chunk_ranges(config.max_chunk_chars)
                    .into_iter()
                    .map(|range| text.span.slice(range).trimmed())
                    .filter(|chunk| !chunk.is_empty())
                    .collect();

                let last = chunks.len().saturating_sub(1);
                for (chunk_idx, content) in chunks.into_iter().enumerate() {
                    let starts_paragraph = chunk_idx == 0;
                    let ends_paragraph = chunk_idx == last;

                    let top_margin = if starts_paragraph && !trailing_margin {
                        config.base_margin + text.extra_top_padding
                    } else {
                        0.0
                    };
                    let bottom_margin = if ends_paragraph {
                        config.base_margin + text.extra_bottom_padding
                    } else {
                        0.0
                    };

                    rows.push(RowModel::Text {
                        content,
                        top_margin,
                        bottom_margin,
                        source,
                    });
                    trailing_margin = true;
                }
            }
        }
    }

    rows
}
