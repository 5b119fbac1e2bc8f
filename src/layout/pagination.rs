//! Page-break planning: greedy packing of row slices into fixed-height pages

use crate::layout::cache::Viewport;
use crate::layout::materialize::RowModel;
use crate::layout::measure::{BreakPoints, Measure};
use smallvec::smallvec;

/// Placement of one row slice on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageEntry {
    /// Index into the row sequence
    pub row: usize,
    /// Offset of the row's top within the page. Negative when the row started
    /// on an earlier page and is drawn shifted upward.
    pub offset: f32,
}

/// One page of the paginated article
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageModel {
    pub rows: Vec<PageEntry>,
    /// Total height of the page, seam margin included
    pub height: f32,
    /// Margin synthesized at the top when the page resumes a paragraph
    pub top_margin: f32,
}

impl PageModel {
    /// Height of the content placed on the page
    pub fn content_height(&self) -> f32 {
        self.height - self.top_margin
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if this page shows part of a given row
    pub fn contains_row(&self, row: usize) -> bool {
        self.rows.iter().any(|entry| entry.row == row)
    }

    /// Whether the first entry continues a row from the previous page
    pub fn starts_mid_row(&self) -> bool {
        self.rows.first().map(|entry| entry.offset < 0.0).unwrap_or(false)
    }
}

/// Split `rows` into pages no taller than the viewport.
///
/// A slice that does not fit on the current page opens a new one. When the
/// slice resumes a paragraph, the new page gets a `base_margin` seam at the
/// top. Slices taller than the viewport overflow their page; nothing is
/// dropped and row order is kept.
pub fn plan<M: Measure + ?Sized>(
    rows: &[RowModel],
    viewport: Viewport,
    base_margin: f32,
    measurer: &M,
) -> Vec<PageModel> {
    let mut pages = Vec::new();
    if rows.is_empty() {
        return pages;
    }

    let mut current = PageModel::default();

    for (row_idx, row) in rows.iter().enumerate() {
        let points = normalize_break_points(row_idx, row, viewport.width, measurer);

        if points.is_empty() {
            // Zero-height row keeps its place in the sequence
            current.rows.push(PageEntry {
                row: row_idx,
                offset: current.height,
            });
            continue;
        }

        let mut prev = 0.0;
        let mut added_yet = false;

        for point in points {
            let slice = point - prev;

            if slice + current.height > viewport.height && !current.is_empty() {
                let mut next = PageModel {
                    rows: vec![PageEntry {
                        row: row_idx,
                        offset: if prev > 0.0 { -prev } else { 0.0 },
                    }],
                    height: 0.0,
                    top_margin: 0.0,
                };

                let resumes_paragraph =
                    matches!(row, RowModel::Text { top_margin, .. } if *top_margin == 0.0);
                if resumes_paragraph || added_yet {
                    next.height += base_margin;
                    next.top_margin = base_margin;
                }

                pages.push(std::mem::replace(&mut current, next));
            } else if !added_yet {
                current.rows.push(PageEntry {
                    row: row_idx,
                    offset: current.height,
                });
            }

            current.height += slice;
            prev = point;
            added_yet = true;
        }
    }

    pages.push(current);
    pages
}

/// Rounded, strictly increasing, positive break points of a row.
///
/// The final point is rounded up and intermediate points to the nearest
/// unit. Points that do not advance past the previous one are dropped, so no
/// zero-height slices are produced. A row without usable points is treated as
/// one atomic slice of its measured height.
fn normalize_break_points<M: Measure + ?Sized>(
    row_idx: usize,
    row: &RowModel,
    width: f32,
    measurer: &M,
) -> BreakPoints {
    let mut raw = measurer.break_points(row, width);
    raw.retain(|p| p.is_finite());

    if raw.is_empty() {
        let height = measurer.height(row, width);
        log::debug!(
            "row {} has no break points; treating it as atomic ({}pt)",
            row_idx,
            height
        );
        if !(height.is_finite() && height > 0.0) {
            return BreakPoints::new();
        }
        raw = smallvec![height];
    }

    let last = raw.len() - 1;
    let mut points = BreakPoints::new();
    let mut prev = 0.0;
    let mut out_of_order = false;

    for (idx, value) in raw.into_iter().enumerate() {
        let rounded = if idx == last { value.ceil() } else { value.round() };
        if rounded > prev {
            points.push(rounded);
            prev = rounded;
        } else if value > 0.0 && rounded < prev {
            out_of_order = true;
        }
    }

    if out_of_order {
        log::warn!(
            "row {} reported decreasing break points; dropped the out-of-order cuts",
            row_idx
        );
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ImageSize, RichText, SegmentId};

    /// Measurer returning canned break points per row
    struct Canned(Vec<Vec<f32>>);

    impl Measure for Canned {
        fn height(&self, row: &RowModel, _width: f32) -> f32 {
            self.0[row.source().0].last().copied().unwrap_or(0.0)
        }

        fn break_points(&self, row: &RowModel, _width: f32) -> BreakPoints {
            self.0[row.source().0].iter().copied().collect()
        }
    }

    fn text(source: usize, top_margin: f32) -> RowModel {
        RowModel::Text {
            content: RichText::plain("text"),
            top_margin,
            bottom_margin: 18.0,
            source: SegmentId(source),
        }
    }

    fn image(source: usize) -> RowModel {
        RowModel::Image {
            source: SegmentId(source),
            size: Some(ImageSize::new(100.0, 250.0)),
        }
    }

    fn viewport(height: f32) -> Viewport {
        Viewport {
            width: 320.0,
            height,
        }
    }

    #[test]
    fn test_empty_rows_give_no_pages() {
        let pages = plan(&[], viewport(100.0), 18.0, &Canned(vec![]));
        assert!(pages.is_empty());
    }

    #[test]
    fn test_paragraph_split_across_pages() {
        let rows = vec![text(0, 0.0)];
        let measurer = Canned(vec![vec![0.0, 40.0, 90.0, 130.0]]);
        let pages = plan(&rows, viewport(100.0), 18.0, &measurer);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].rows, vec![PageEntry { row: 0, offset: 0.0 }]);
        assert_eq!(pages[0].height, 90.0);
        assert_eq!(pages[0].top_margin, 0.0);

        assert_eq!(pages[1].rows, vec![PageEntry { row: 0, offset: -90.0 }]);
        assert_eq!(pages[1].content_height(), 40.0);
        assert_eq!(pages[1].top_margin, 18.0);
        assert_eq!(pages[1].height, 58.0);
        assert!(pages[1].starts_mid_row());
    }

    #[test]
    fn test_oversized_image_overflows() {
        let rows = vec![image(0)];
        let measurer = Canned(vec![vec![0.0, 250.0]]);
        let pages = plan(&rows, viewport(100.0), 18.0, &measurer);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].rows.len(), 1);
        assert_eq!(pages[0].height, 250.0);
        assert_eq!(pages[0].top_margin, 0.0);
    }

    #[test]
    fn test_image_after_text_moves_to_next_page_without_seam() {
        let rows = vec![text(0, 18.0), image(1)];
        let measurer = Canned(vec![vec![0.0, 60.0], vec![0.0, 80.0]]);
        let pages = plan(&rows, viewport(100.0), 18.0, &measurer);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].rows, vec![PageEntry { row: 1, offset: 0.0 }]);
        assert_eq!(pages[1].top_margin, 0.0);
        assert_eq!(pages[1].height, 80.0);
    }

    #[test]
    fn test_following_paragraph_starting_page_gets_seam() {
        // Second paragraph has no top margin because it follows text
        let rows = vec![text(0, 18.0), text(1, 0.0)];
        let measurer = Canned(vec![vec![0.0, 90.0], vec![0.0, 30.0]]);
        let pages = plan(&rows, viewport(100.0), 18.0, &measurer);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].rows, vec![PageEntry { row: 1, offset: 0.0 }]);
        assert_eq!(pages[1].top_margin, 18.0);
        assert_eq!(pages[1].height, 48.0);
    }

    #[test]
    fn test_rows_share_a_page() {
        let rows = vec![text(0, 18.0), image(1), text(2, 18.0)];
        let measurer = Canned(vec![vec![0.0, 30.0], vec![0.0, 20.0], vec![0.0, 25.0]]);
        let pages = plan(&rows, viewport(100.0), 18.0, &measurer);

        assert_eq!(pages.len(), 1);
        let offsets: Vec<_> = pages[0].rows.iter().map(|e| (e.row, e.offset)).collect();
        assert_eq!(offsets, vec![(0, 0.0), (1, 30.0), (2, 50.0)]);
        assert_eq!(pages[0].height, 75.0);
    }

    #[test]
    fn test_rounding_of_break_points() {
        let rows = vec![text(0, 18.0)];
        let measurer = Canned(vec![vec![0.0, 40.4, 80.6, 120.2]]);
        let pages = plan(&rows, viewport(100.0), 18.0, &measurer);

        assert_eq!(pages[0].height, 81.0);
        assert_eq!(pages[1].rows[0].offset, -81.0);
        // ceil(120.2) - 81 = 40, plus seam
        assert_eq!(pages[1].content_height(), 40.0);
    }

    #[test]
    fn test_rounding_collapses_duplicate_points() {
        let rows = vec![text(0, 18.0)];
        let measurer = Canned(vec![vec![0.0, 50.2, 50.4, 70.0]]);
        let pages = plan(&rows, viewport(100.0), 18.0, &measurer);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].rows.len(), 1);
        assert_eq!(pages[0].height, 70.0);
    }

    #[test]
    fn test_missing_break_points_make_row_atomic() {
        struct NoPoints;
        impl Measure for NoPoints {
            fn height(&self, _row: &RowModel, _width: f32) -> f32 {
                150.0
            }
            fn break_points(&self, _row: &RowModel, _width: f32) -> BreakPoints {
                BreakPoints::new()
            }
        }

        let rows = vec![text(0, 18.0), text(1, 0.0)];
        let pages = plan(&rows, viewport(100.0), 18.0, &NoPoints);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].height, 150.0);
        assert_eq!(pages[1].rows, vec![PageEntry { row: 1, offset: 0.0 }]);
        assert_eq!(pages[1].height, 168.0);
    }

    #[test]
    fn test_zero_height_row_is_kept() {
        let rows = vec![text(0, 18.0), image(1), text(2, 18.0)];
        let measurer = Canned(vec![vec![0.0, 30.0], vec![0.0], vec![0.0, 25.0]]);
        let pages = plan(&rows, viewport(100.0), 18.0, &measurer);

        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains_row(1));
        assert_eq!(pages[0].rows[1].offset, 30.0);
        assert_eq!(pages[0].rows[2].offset, 30.0);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let rows = vec![text(0, 18.0), image(1), text(2, 0.0)];
        let measurer = Canned(vec![
            vec![0.0, 33.0, 66.0, 99.0],
            vec![0.0, 120.0],
            vec![0.0, 45.0, 90.0],
        ]);
        let first = plan(&rows, viewport(100.0), 18.0, &measurer);
        let second = plan(&rows, viewport(100.0), 18.0, &measurer);
        assert_eq!(first, second);
    }
}
