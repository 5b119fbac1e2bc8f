//! Styled text storage with attribute-preserving slicing

use serde::{Deserialize, Serialize};
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Character-level styling attached to a run of text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
    pub blockquote: bool,
    /// Heading level (1-6), if the run belongs to a heading
    pub heading: Option<u8>,
    /// Link target for click handling
    pub link: Option<String>,
}

impl TextStyle {
    /// Style of a child span nested inside `self`
    pub fn inherit(&self, child: &TextStyle) -> TextStyle {
        TextStyle {
            bold: self.bold || child.bold,
            italic: self.italic || child.italic,
            monospace: self.monospace || child.monospace,
            blockquote: self.blockquote || child.blockquote,
            heading: child.heading.or(self.heading).map(|l| l.clamp(1, 6)),
            link: child.link.clone().or_else(|| self.link.clone()),
        }
    }

    /// Line height multiplier used when measuring this run
    pub fn line_height_multiplier(&self) -> f32 {
        match self.heading {
            Some(1) => 1.5,
            Some(2) => 1.4,
            Some(3) => 1.3,
            Some(_) => 1.2,
            None => 1.0,
        }
    }
}

/// A run of `text` sharing one style, addressed by byte range
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRun {
    pub range: Range<usize>,
    pub style: TextStyle,
}

/// Text plus the style runs covering it.
///
/// Runs are sorted, contiguous, non-empty and cover the whole text, so every
/// byte has exactly one style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichText {
    text: String,
    runs: Vec<StyleRun>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unstyled text
    pub fn plain(text: &str) -> Self {
        let mut rich = Self::new();
        rich.push(text, TextStyle::default());
        rich
    }

    /// Append text with a style, merging with the previous run when equal
    pub fn push(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(text);
        let end = self.text.len();

        match self.runs.last_mut() {
            Some(last) if last.style == style => last.range.end = end,
            _ => self.runs.push(StyleRun {
                range: start..end,
                style,
            }),
        }
    }

    /// Append another rich text
    pub fn append(&mut self, other: &RichText) {
        for run in &other.runs {
            self.push(&other.text[run.range.clone()], run.style.clone());
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in characters (the unit of the chunk bound)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Style at a byte offset
    pub fn style_at(&self, byte_offset: usize) -> Option<&TextStyle> {
        self.runs
            .iter()
            .find(|run| run.range.contains(&byte_offset))
            .map(|run| &run.style)
    }

    /// Copy a byte range, clipping style runs to the cut.
    ///
    /// `range` must lie on char boundaries.
    pub fn slice(&self, range: Range<usize>) -> RichText {
        let start = range.start.min(self.text.len());
        let end = range.end.min(self.text.len()).max(start);

        let runs = self
            .runs
            .iter()
            .filter(|run| run.range.start < end && run.range.end > start)
            .map(|run| StyleRun {
                range: run.range.start.max(start) - start..run.range.end.min(end) - start,
                style: run.style.clone(),
            })
            .collect();

        RichText {
            text: self.text[start..end].to_string(),
            runs,
        }
    }

    /// Copy without leading or trailing whitespace
    pub fn trimmed(&self) -> RichText {
        let start = self.text.len() - self.text.trim_start().len();
        let end = self.text.trim_end().len().max(start);
        self.slice(start..end)
    }

    /// Byte ranges of consecutive chunks holding at most `max_chars` characters.
    ///
    /// Cuts fall on grapheme cluster boundaries; a single cluster longer than
    /// the bound is cut on char boundaries instead.
    pub fn chunk_ranges(&self, max_chars: usize) -> Vec<Range<usize>> {
        let max_chars = max_chars.max(1);
        let mut ranges = Vec::new();
        let mut chunk_start = 0;
        let mut chunk_chars = 0;

        for (idx, grapheme) in self.text.grapheme_indices(true) {
            let grapheme_chars = grapheme.chars().count();

            if chunk_chars + grapheme_chars > max_chars && chunk_chars > 0 {
                ranges.push(chunk_start..idx);
                chunk_start = idx;
                chunk_chars = 0;
            }

            if grapheme_chars > max_chars {
                for (offset, _) in grapheme.char_indices().skip(max_chars).step_by(max_chars) {
                    ranges.push(chunk_start..idx + offset);
                    chunk_start = idx + offset;
                }
                chunk_chars = self.text[chunk_start..idx + grapheme.len()].chars().count();
                continue;
            }

            chunk_chars += grapheme_chars;
        }

        if chunk_start < self.text.len() {
            ranges.push(chunk_start..self.text.len());
        }

        ranges
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        RichText::plain(text)
    }
}

/// Nested span tree as produced by the article parser
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, flatten)]
    pub style: TextStyle,
    #[serde(default)]
    pub children: Vec<Span>,
}

impl Span {
    /// Flatten the tree into a rich text, children inheriting parent style
    pub fn to_rich_text(&self) -> RichText {
        let mut rich = RichText::new();
        self.append_to(&mut rich, &TextStyle::default());
        rich
    }

    fn append_to(&self, rich: &mut RichText, parent: &TextStyle) {
        let style = parent.inherit(&self.style);
        if let Some(text) = &self.text {
            rich.push(text, style.clone());
        }
        for child in &self.children {
            child.append_to(rich, &style);
        }
    }
}
