//! Page materialization: render-ready rows for one page

use crate::layout::{LayoutInfo, PageModel};
use crate::PagerError;

/// One row slice positioned on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedRow {
    /// Index into the row sequence
    pub row: usize,
    /// Offset recorded by the planner
    pub offset: f32,
    /// Where the row's top is drawn, seam margin applied
    pub y: f32,
    /// Visible extent from `y` to the next row (or the page end)
    pub height: f32,
}

impl RenderedRow {
    /// Part of the row already shown on earlier pages
    pub fn consumed(&self) -> f32 {
        (-self.offset).max(0.0)
    }

    pub fn is_continuation(&self) -> bool {
        self.offset < 0.0
    }
}

/// Render-ready page
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub index: usize,
    pub rows: Vec<RenderedRow>,
    pub height: f32,
    pub top_margin: f32,
}

/// Build the render rows for page `index`.
///
/// Row heights come from adjacent origins. The seam margin is already part of
/// the offsets recorded after the first entry, so only the first entry is
/// shifted by `top_margin`.
pub fn page_view(layout: &LayoutInfo, index: usize) -> Result<PageView, PagerError> {
    let page = layout.page(index)?;
    Ok(PageView {
        index,
        rows: rendered_rows(page),
        height: page.height,
        top_margin: page.top_margin,
    })
}

fn rendered_rows(page: &PageModel) -> Vec<RenderedRow> {
    let origins: Vec<f32> = page
        .rows
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            if idx == 0 {
                entry.offset + page.top_margin
            } else {
                entry.offset
            }
        })
        .collect();

    page.rows
        .iter()
        .zip(&origins)
        .enumerate()
        .map(|(idx, (entry, &y))| {
            let end = origins.get(idx + 1).copied().unwrap_or(page.height);
            RenderedRow {
                row: entry.row,
                offset: entry.offset,
                y,
                height: end - y,
            }
        })
        .collect()
}
