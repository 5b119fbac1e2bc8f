//! Article content model: an ordered, immutable sequence of segments

mod rich_text;
mod segment;

pub use rich_text::{RichText, Span, StyleRun, TextStyle};
pub use segment::{
    image_height_for_width, ImageSegment, ImageSize, Segment, SegmentId, TextSegment,
    DEFAULT_ASPECT_RATIO,
};

use crate::PagerError;
use segment::SegmentRepr;
use serde::Deserialize;

/// Parsed content of one article
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArticleContent {
    segments: Vec<Segment>,
}

#[derive(Deserialize)]
struct ArticleContentRepr {
    #[serde(default)]
    segments: Vec<SegmentRepr>,
}

impl ArticleContent {
    /// Create empty content
    pub fn new() -> Self {
        Self::default()
    }

    /// Create content from segments
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Decode content JSON as produced by the article parser:
    /// `{"segments": [{"type": "text", "span": {...}}, {"type": "image", "src": "..."}]}`
    pub fn from_json(json: &str) -> Result<Self, PagerError> {
        let repr: ArticleContentRepr = serde_json::from_str(json)?;
        Ok(Self {
            segments: repr.segments.into_iter().map(Segment::from).collect(),
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get a segment by id
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    /// Iterate segments with their ids
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .map(|(idx, seg)| (SegmentId(idx), seg))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Plain text of all text segments, one paragraph per line
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|seg| match seg {
                Segment::Text(text) => Some(text.span.text()),
                Segment::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_content() {
        let content = ArticleContent::new();
        assert!(content.is_empty());
        assert_eq!(content.text(), "");
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "segments": [
                {"type": "text", "span": {"text": "Title", "heading": 1}, "extra_bottom_padding": 6},
                {"type": "image", "src": "https://example.com/a.jpg", "size": {"width": 640, "height": 480}},
                {"type": "text", "span": {"children": [{"text": "Body "}, {"text": "bold", "bold": true}]}}
            ]
        }"#;

        let content = ArticleContent::from_json(json).unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content.text(), "Title\nBody bold");

        match content.segment(SegmentId(0)) {
            Some(Segment::Text(text)) => {
                assert_eq!(text.extra_bottom_padding, 6.0);
                assert_eq!(text.span.runs()[0].style.heading, Some(1));
            }
            other => panic!("expected text segment, got {:?}", other),
        }

        match content.segment(SegmentId(1)) {
            Some(Segment::Image(image)) => {
                assert_eq!(image.size, Some(ImageSize::new(640.0, 480.0)));
            }
            other => panic!("expected image segment, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_missing_segments() {
        let content = ArticleContent::from_json("{}").unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_from_json_malformed() {
        let err = ArticleContent::from_json("{\"segments\": [{\"type\": \"video\"}]}").unwrap_err();
        assert!(matches!(err, PagerError::Decode(_)));
    }
}
