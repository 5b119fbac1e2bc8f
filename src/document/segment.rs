//! Article content segments

use crate::document::rich_text::{RichText, Span};
use serde::{Deserialize, Serialize};

/// Height/width ratio assumed for images without a known size
pub const DEFAULT_ASPECT_RATIO: f32 = 9.0 / 16.0;

/// Index of a segment within its article content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SegmentId(pub usize);

/// Intrinsic pixel size of an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

impl ImageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Height/width ratio, if the size is usable
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width > 0.0 && self.height >= 0.0 && self.width.is_finite() && self.height.is_finite() {
            Some(self.height / self.width)
        } else {
            None
        }
    }
}

/// A paragraph of styled text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextSegment {
    pub span: RichText,
    pub extra_top_padding: f32,
    pub extra_bottom_padding: f32,
}

impl TextSegment {
    pub fn new(span: impl Into<RichText>) -> Self {
        Self {
            span: span.into(),
            extra_top_padding: 0.0,
            extra_bottom_padding: 0.0,
        }
    }

    pub fn with_padding(mut self, top: f32, bottom: f32) -> Self {
        self.extra_top_padding = top;
        self.extra_bottom_padding = bottom;
        self
    }
}

/// An inline image
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageSegment {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub size: Option<ImageSize>,
}

impl ImageSegment {
    pub fn new(src: impl Into<String>, size: Option<ImageSize>) -> Self {
        Self {
            src: src.into(),
            size,
        }
    }

    /// Rendered height when drawn at `width`
    pub fn height_for_width(&self, width: f32) -> f32 {
        image_height_for_width(self.size, width)
    }
}

/// Height of an image of optional intrinsic `size` drawn at `width`
pub fn image_height_for_width(size: Option<ImageSize>, width: f32) -> f32 {
    let ratio = size
        .and_then(|size| size.aspect_ratio())
        .unwrap_or(DEFAULT_ASPECT_RATIO);
    width.max(0.0) * ratio
}

/// One piece of article content
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(TextSegment),
    Image(ImageSegment),
}

impl Segment {
    pub fn is_text(&self) -> bool {
        matches!(self, Segment::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Segment::Image(_))
    }
}

impl From<TextSegment> for Segment {
    fn from(text: TextSegment) -> Self {
        Segment::Text(text)
    }
}

impl From<ImageSegment> for Segment {
    fn from(image: ImageSegment) -> Self {
        Segment::Image(image)
    }
}

/// Wire form of a segment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum SegmentRepr {
    Text {
        span: Span,
        #[serde(default)]
        extra_top_padding: f32,
        #[serde(default)]
        extra_bottom_padding: f32,
    },
    Image(ImageSegment),
}

impl From<SegmentRepr> for Segment {
    fn from(repr: SegmentRepr) -> Self {
        match repr {
            SegmentRepr::Text {
                span,
                extra_top_padding,
                extra_bottom_padding,
            } => Segment::Text(TextSegment {
                span: span.to_rich_text(),
                extra_top_padding,
                extra_bottom_padding,
            }),
            SegmentRepr::Image(image) => Segment::Image(image),
        }
    }
}
