//! Memoized page layout keyed by content version and viewport

use crate::layout::materialize::{ContentVersion, RowSet};
use crate::layout::measure::Measure;
use crate::layout::pagination::{plan, PageModel};
use crate::PagerError;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Size of the area pages are laid out for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Validated viewport: both sides finite and positive
    pub fn new(width: f32, height: f32) -> Result<Self, PagerError> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(PagerError::InvalidViewport { width, height })
        }
    }
}

/// A computed page plan for one content version and viewport.
///
/// Never mutated after creation; a recompute produces a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInfo {
    pages: Vec<PageModel>,
    viewport: Viewport,
    content_version: ContentVersion,
}

impl LayoutInfo {
    pub fn new(pages: Vec<PageModel>, viewport: Viewport, content_version: ContentVersion) -> Self {
        Self {
            pages,
            viewport,
            content_version,
        }
    }

    pub fn pages(&self) -> &[PageModel] {
        &self.pages
    }

    /// Get a page, failing loudly on an out-of-range index
    pub fn page(&self, index: usize) -> Result<&PageModel, PagerError> {
        self.pages.get(index).ok_or(PagerError::PageOutOfBounds {
            index,
            page_count: self.pages.len(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn content_version(&self) -> ContentVersion {
        self.content_version
    }

    /// Index of the page after `index`, if any
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        (next < self.pages.len()).then_some(next)
    }

    /// Index of the page before `index`, if any
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        if index == 0 || index > self.pages.len() {
            None
        } else {
            Some(index - 1)
        }
    }

    /// First page showing part of `row`
    pub fn page_for_row(&self, row: usize) -> Option<usize> {
        self.pages.iter().position(|page| page.contains_row(row))
    }
}

/// Cache key
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutKey {
    content_version: ContentVersion,
    viewport: Viewport,
}

/// Lazily computed layout, owned by one presenting view
#[derive(Debug)]
pub struct LayoutCache {
    base_margin: f32,
    cached: Option<(LayoutKey, Rc<LayoutInfo>)>,
    /// Number of times the planner ran
    computations: u64,
}

impl LayoutCache {
    pub fn new(base_margin: f32) -> Self {
        Self {
            base_margin,
            cached: None,
            computations: 0,
        }
    }

    /// Layout for `rows` at `viewport`, planning only when either changed
    /// since the last call.
    pub fn get_layout<M: Measure + ?Sized>(
        &mut self,
        rows: &RowSet,
        viewport: Viewport,
        measurer: &M,
    ) -> Rc<LayoutInfo> {
        let key = LayoutKey {
            content_version: rows.version(),
            viewport,
        };

        if let Some((cached_key, layout)) = &self.cached {
            if *cached_key == key {
                log::trace!("layout cache hit for {:?}", key);
                return Rc::clone(layout);
            }
        }

        let pages = plan(rows.rows(), viewport, self.base_margin, measurer);
        self.computations += 1;
        log::debug!(
            "laid out {} rows into {} pages (content {:?}, viewport {}x{})",
            rows.len(),
            pages.len(),
            rows.version(),
            viewport.width,
            viewport.height
        );

        let layout = Rc::new(LayoutInfo::new(pages, viewport, rows.version()));
        self.cached = Some((key, Rc::clone(&layout)));
        layout
    }

    /// Last computed layout, without recomputing
    pub fn peek(&self) -> Option<&Rc<LayoutInfo>> {
        self.cached.as_ref().map(|(_, layout)| layout)
    }

    /// Drop the cached layout (e.g. after measurement metrics changed)
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn computations(&self) -> u64 {
        self.computations
    }

    pub fn base_margin(&self) -> f32 {
        self.base_margin
    }
}
