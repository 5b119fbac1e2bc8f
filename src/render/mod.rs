//! Render output: page views and the preload window

mod page;
mod preload;

pub use page::{page_view, PageView, RenderedRow};
pub use preload::{PreloadSource, Preloader, VisibleRange, DEFAULT_PRELOAD_WINDOW};
