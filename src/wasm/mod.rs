//! WASM bindings for the pager

pub mod flat_buffer;

use crate::document::Segment;
use crate::layout::{FontMetrics, LayoutInfo, MetricsMeasurer, Viewport};
use crate::render::{PreloadSource, Preloader, VisibleRange};
use crate::{ArticlePager, PagerConfig, PagerError, ViewState};
use flat_buffer::PageBuffer;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js(err: PagerError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Image sources shown on each page of a layout
struct PageImages<'a> {
    layout: &'a LayoutInfo,
    pager: &'a ArticlePager<MetricsMeasurer>,
}

impl PreloadSource for PageImages<'_> {
    type Resource = Vec<String>;

    fn item_count(&self) -> usize {
        self.layout.page_count()
    }

    fn preload_resource(&self, index: usize) -> Option<Vec<String>> {
        let page = self.layout.page(index).ok()?;
        let content = self.pager.content()?;
        let srcs: Vec<String> = page
            .rows
            .iter()
            .filter_map(|entry| {
                let source = self.pager.rows().get(entry.row)?.source();
                match content.segment(source)? {
                    Segment::Image(image) => Some(image.src.clone()),
                    Segment::Text(_) => None,
                }
            })
            .collect();
        (!srcs.is_empty()).then_some(srcs)
    }
}

/// WASM-exposed pager wrapper
#[wasm_bindgen]
pub struct WasmPager {
    pager: ArticlePager<MetricsMeasurer>,
    buffer: PageBuffer,
    preloader: Preloader<Vec<String>>,
    /// Layout the preloader's page indices refer to
    preloaded_layout: Option<Rc<LayoutInfo>>,
}

#[wasm_bindgen]
impl WasmPager {
    /// Create a pager for a viewport with default config and metrics
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WasmPager, JsValue> {
        Self::build(PagerConfig::default(), width, height).map_err(to_js)
    }

    /// Create a pager from a JSON config
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str, width: f32, height: f32) -> Result<WasmPager, JsValue> {
        let config = PagerConfig::from_json(config_json).map_err(to_js)?;
        Self::build(config, width, height).map_err(to_js)
    }

    /// Replace the article content (JSON segment list)
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&mut self, json: &str) -> Result<(), JsValue> {
        self.apply_content(json).map_err(to_js)
    }

    /// Mark the article fetch as failed
    #[wasm_bindgen(js_name = setFetchFailed)]
    pub fn set_fetch_failed(&mut self, failed: bool) {
        self.pager.set_fetch_failed(failed);
    }

    /// Record a new viewport; layout is recomputed lazily
    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        let viewport = Viewport::new(width, height).map_err(to_js)?;
        self.pager.observe_viewport(viewport);
        Ok(())
    }

    /// Replace measurement metrics with a monospace approximation
    #[wasm_bindgen(js_name = setFontMetrics)]
    pub fn set_font_metrics(&mut self, line_height: f32, char_width: f32) {
        self.pager
            .measurer_mut()
            .set_metrics(FontMetrics::monospace(line_height, char_width));
    }

    /// 0 = nothing, 1 = content, 2 = error
    #[wasm_bindgen(js_name = getViewState)]
    pub fn get_view_state(&self) -> u8 {
        match self.pager.view_state() {
            ViewState::Nothing => 0,
            ViewState::Content => 1,
            ViewState::Error => 2,
        }
    }

    /// Get page count
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&mut self) -> Result<usize, JsValue> {
        self.pager.page_count().map_err(to_js)
    }

    /// Encode page `index` into the flat buffer
    #[wasm_bindgen(js_name = renderPage)]
    pub fn render_page(&mut self, index: usize) -> Result<(), JsValue> {
        let layout = self.pager.layout().map_err(to_js)?;
        let view = self.pager.page_view(index).map_err(to_js)?;
        self.buffer.write_page(
            &view,
            self.pager.rows().rows(),
            layout.content_version(),
            layout.page_count(),
            layout.viewport(),
        );
        Ok(())
    }

    /// Page geometry as `[y, height]` pairs, one per row
    #[wasm_bindgen(js_name = getPageGeometry)]
    pub fn get_page_geometry(&mut self, index: usize) -> Result<js_sys::Float32Array, JsValue> {
        let view = self.pager.page_view(index).map_err(to_js)?;
        let geometry: Vec<f32> = view.rows.iter().flat_map(|row| [row.y, row.height]).collect();
        Ok(js_sys::Float32Array::from(geometry.as_slice()))
    }

    /// Update the visible pages and return image sources now held for preloading
    #[wasm_bindgen(js_name = updateVisiblePages)]
    pub fn update_visible_pages(&mut self, first: usize, last: usize) -> Result<js_sys::Array, JsValue> {
        let srcs = js_sys::Array::new();
        for src in self.refresh_preload(first, last).map_err(to_js)? {
            srcs.push(&JsValue::from_str(&src));
        }
        Ok(srcs)
    }

    #[wasm_bindgen(js_name = getU32Ptr)]
    pub fn get_u32_ptr(&self) -> u32 {
        self.buffer.u32_ptr()
    }

    #[wasm_bindgen(js_name = getU32Len)]
    pub fn get_u32_len(&self) -> u32 {
        self.buffer.u32_len()
    }

    #[wasm_bindgen(js_name = getF32Ptr)]
    pub fn get_f32_ptr(&self) -> u32 {
        self.buffer.f32_ptr()
    }

    #[wasm_bindgen(js_name = getF32Len)]
    pub fn get_f32_len(&self) -> u32 {
        self.buffer.f32_len()
    }
}

impl WasmPager {
    fn build(config: PagerConfig, width: f32, height: f32) -> Result<WasmPager, PagerError> {
        let viewport = Viewport::new(width, height)?;
        let mut pager = ArticlePager::with_metrics(config, FontMetrics::default());
        pager.observe_viewport(viewport);

        Ok(Self {
            pager,
            buffer: PageBuffer::new(),
            preloader: Preloader::new(config.preload_window),
            preloaded_layout: None,
        })
    }

    /// Install content JSON. Held preloads are released even when decoding
    /// fails, since the pager then holds empty content.
    fn apply_content(&mut self, json: &str) -> Result<(), PagerError> {
        let result = self.pager.set_content_json(json);
        self.reset_preload();
        result
    }

    fn reset_preload(&mut self) {
        self.preloader.clear();
        self.preloaded_layout = None;
    }

    /// Slide the preload window to `first..=last` and list the held image sources.
    ///
    /// Held entries are keyed by page index, so they are dropped whenever the
    /// layout they were acquired against has been replaced.
    fn refresh_preload(&mut self, first: usize, last: usize) -> Result<Vec<String>, PagerError> {
        let layout = self.pager.layout()?;
        let current = self
            .preloaded_layout
            .as_ref()
            .map(|held| Rc::ptr_eq(held, &layout))
            .unwrap_or(false);
        if !current {
            log::debug!(
                "layout changed ({:?}, {}x{}); resetting preload window",
                layout.content_version(),
                layout.viewport().width,
                layout.viewport().height
            );
            self.reset_preload();
            self.preloaded_layout = Some(Rc::clone(&layout));
        }

        let source = PageImages {
            layout: &layout,
            pager: &self.pager,
        };
        self.preloader
            .update_visible_range(VisibleRange::from_indices([first, last]), &source);

        Ok(self
            .preloader
            .loaded_indices()
            .into_iter()
            .filter_map(|page| self.preloader.get(page))
            .flatten()
            .cloned()
            .collect())
    }
}
