//! Layout: row materialization, measurement, page breaking and caching

mod cache;
pub mod font;
mod line_break;
mod materialize;
mod measure;
mod pagination;

pub use cache::{LayoutCache, LayoutInfo, Viewport};
pub use font::FontMetrics;
pub use line_break::{LineBreaker, LineMetrics};
pub use materialize::{materialize, ContentVersion, RowModel, RowSet};
pub use measure::{BreakPoints, Measure, MetricsMeasurer};
pub use pagination::{plan, PageEntry, PageModel};
