//! Article Pager: swipeable pagination for article content
//!
//! This crate provides the pagination core of a news reader:
//! - Row materialization (bounded text chunks and atomic images)
//! - Greedy page breaking at measured line boundaries with seam margins
//! - A layout cache keyed by content version and viewport
//! - Page views and a sliding preload window for the rendering layer

pub mod document;
pub mod layout;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPager;

// Re-export primary types
pub use document::{ArticleContent, ImageSegment, ImageSize, RichText, Segment, SegmentId, TextSegment, TextStyle};
pub use layout::{
    ContentVersion, FontMetrics, LayoutCache, LayoutInfo, Measure, MetricsMeasurer, PageEntry,
    PageModel, RowModel, RowSet, Viewport,
};
pub use render::{page_view, PageView, PreloadSource, Preloader, RenderedRow, VisibleRange};

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;

/// Errors reported by the pager
#[derive(Debug, Error)]
pub enum PagerError {
    #[error("page index {index} is out of bounds (page count {page_count})")]
    PageOutOfBounds { index: usize, page_count: usize },
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("no viewport has been observed yet")]
    NoViewport,
    #[error("failed to decode JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PagerError>;

/// Pager tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Margin around paragraphs and at page seams, in points
    pub base_margin: f32,
    /// Upper bound on characters per text row
    pub max_chunk_chars: usize,
    /// Items preloaded on each side of the visible range
    pub preload_window: usize,
    /// Cap applied to image rows by the reference measurer
    pub max_image_height: Option<f32>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            base_margin: 18.0,
            max_chunk_chars: 5000,
            preload_window: render::DEFAULT_PRELOAD_WINDOW,
            max_image_height: None,
        }
    }
}

impl PagerConfig {
    /// Decode a (possibly partial) JSON config; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What the article view should show.
///
/// `Error` only follows a failed fetch with no content installed. Malformed
/// content JSON still installs (empty) content, so it reports `Content` with
/// zero pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Nothing,
    Content,
    Error,
}

/// Pagination state for one presented article
pub struct ArticlePager<M: Measure> {
    config: PagerConfig,
    measurer: M,
    content: Option<ArticleContent>,
    rows: RowSet,
    next_version: u64,
    fetch_failed: bool,
    viewport: Option<Viewport>,
    cache: LayoutCache,
}

impl<M: Measure> ArticlePager<M> {
    /// Create a pager with no content and no viewport
    pub fn new(config: PagerConfig, measurer: M) -> Self {
        Self {
            config,
            measurer,
            content: None,
            rows: RowSet::default(),
            next_version: 1,
            fetch_failed: false,
            viewport: None,
            cache: LayoutCache::new(config.base_margin),
        }
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Replace the article content; rows are rematerialized under a new version
    pub fn set_content(&mut self, content: ArticleContent) {
        let version = ContentVersion(self.next_version);
        self.next_version += 1;

        let rows = layout::materialize(content.segments(), &self.config);
        log::debug!(
            "materialized {} segments into {} rows ({:?})",
            content.len(),
            rows.len(),
            version
        );

        self.rows = RowSet::new(version, rows);
        self.content = Some(content);
        self.fetch_failed = false;
    }

    /// Decode and install content JSON.
    ///
    /// Malformed JSON installs empty content (zero pages) and reports the
    /// decode error.
    pub fn set_content_json(&mut self, json: &str) -> Result<()> {
        match ArticleContent::from_json(json) {
            Ok(content) => {
                self.set_content(content);
                Ok(())
            }
            Err(err) => {
                log::warn!("discarding malformed article content: {}", err);
                self.set_content(ArticleContent::new());
                Err(err)
            }
        }
    }

    /// Record whether fetching the article failed
    pub fn set_fetch_failed(&mut self, failed: bool) {
        self.fetch_failed = failed;
    }

    pub fn content(&self) -> Option<&ArticleContent> {
        self.content.as_ref()
    }

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    /// Segment a row was cut from (for click handling)
    pub fn segment_for_row(&self, row: usize) -> Option<&Segment> {
        let source = self.rows.get(row)?.source();
        self.content.as_ref()?.segment(source)
    }

    /// `Content` once any content is installed, including the empty content
    /// left behind by malformed JSON
    pub fn view_state(&self) -> ViewState {
        if self.content.is_some() {
            ViewState::Content
        } else if self.fetch_failed {
            ViewState::Error
        } else {
            ViewState::Nothing
        }
    }

    /// Record the viewport after the owning view's layout pass.
    ///
    /// Layout is not computed here; bursts of size changes collapse into one
    /// recomputation on the next read.
    pub fn observe_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Current layout, computed on first read after a change
    pub fn layout(&mut self) -> Result<Rc<LayoutInfo>> {
        let viewport = self.viewport.ok_or(PagerError::NoViewport)?;
        Ok(self.cache.get_layout(&self.rows, viewport, &self.measurer))
    }

    /// Get total page count
    pub fn page_count(&mut self) -> Result<usize> {
        Ok(self.layout()?.page_count())
    }

    /// Render rows of page `index`
    pub fn page_view(&mut self, index: usize) -> Result<PageView> {
        let layout = self.layout()?;
        page_view(&layout, index)
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Mutable access to the measurer; drops the cached layout
    pub fn measurer_mut(&mut self) -> &mut M {
        self.cache.invalidate();
        &mut self.measurer
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }
}

impl ArticlePager<MetricsMeasurer> {
    /// Pager backed by the font-metrics measurer
    pub fn with_metrics(config: PagerConfig, metrics: FontMetrics) -> Self {
        let measurer = MetricsMeasurer::new(metrics).with_max_image_height(config.max_image_height);
        Self::new(config, measurer)
    }
}
