//! Flat buffer protocol for the zero-copy WASM bridge
//!
//! One page of render data per buffer.
//!
//! ## u32 Buffer Layout:
//! ```text
//! [0]     MAGIC (0x41504752 = "APGR" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     version_lo (content version)
//! [3]     version_hi (content version)
//! [4]     page_index
//! [5]     page_count
//! [6]     row_count
//! [7..]   per-row: [row_index, source_segment, kind, flags]
//!           kind: 0 = text, 1 = image
//!           flags: bit0 = continuation of a row split on an earlier page
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! [0..4]  viewport_width, viewport_height, page_height, top_margin
//! [4..]   per-row: [offset, y, height]
//! ```

use crate::layout::{ContentVersion, RowModel, Viewport};
use crate::render::PageView;

/// Magic number for format validation: "APGR" (Article PaGeR)
pub const MAGIC: u32 = 0x41504752;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 7;

/// Header size in f32 elements
pub const F32_HEADER_SIZE: usize = 4;

pub const KIND_TEXT: u32 = 0;
pub const KIND_IMAGE: u32 = 1;

pub const FLAG_CONTINUATION: u32 = 0b0001;

/// [row_index, source_segment, kind, flags]
pub const U32_PER_ROW: usize = 4;

/// [offset, y, height]
pub const F32_PER_ROW: usize = 3;

/// Page buffer for zero-copy WASM transfer
#[derive(Debug)]
pub struct PageBuffer {
    /// Integer data (header, indices, opcodes)
    pub u32_data: Vec<u32>,
    /// Float data (viewport and row geometry)
    pub f32_data: Vec<f32>,
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(256),
            f32_data: Vec::with_capacity(256),
        }
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
    }

    /// Reserve room for `rows` rows up front.
    /// JS holds pointers into these buffers, so they must not reallocate mid-write.
    pub fn prepare(&mut self, rows: usize) {
        let u32_target = HEADER_SIZE + rows * U32_PER_ROW;
        let f32_target = F32_HEADER_SIZE + rows * F32_PER_ROW;

        if self.u32_data.capacity() < u32_target {
            self.u32_data = Vec::with_capacity(u32_target);
        } else {
            self.u32_data.clear();
        }

        if self.f32_data.capacity() < f32_target {
            self.f32_data = Vec::with_capacity(f32_target);
        } else {
            self.f32_data.clear();
        }
    }

    /// Write both headers; row_count is synchronized in `finalize()`
    pub fn write_header(
        &mut self,
        version: ContentVersion,
        page_index: usize,
        page_count: usize,
        viewport: Viewport,
        page_height: f32,
        top_margin: f32,
    ) {
        self.u32_data.push(MAGIC); // [0] magic number
        self.u32_data.push(SCHEMA_VERSION); // [1] schema version
        self.u32_data.push((version.0 & 0xFFFFFFFF) as u32); // [2] version_lo
        self.u32_data.push((version.0 >> 32) as u32); // [3] version_hi
        self.u32_data.push(page_index as u32); // [4] page_index
        self.u32_data.push(page_count as u32); // [5] page_count
        self.u32_data.push(0); // [6] row_count (placeholder)

        self.f32_data.push(viewport.width);
        self.f32_data.push(viewport.height);
        self.f32_data.push(page_height);
        self.f32_data.push(top_margin);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn write_row(
        &mut self,
        row_index: usize,
        source_segment: usize,
        kind: u32,
        flags: u32,
        offset: f32,
        y: f32,
        height: f32,
    ) {
        self.u32_data.push(row_index as u32);
        self.u32_data.push(source_segment as u32);
        self.u32_data.push(kind);
        self.u32_data.push(flags);

        self.f32_data.push(offset);
        self.f32_data.push(y);
        self.f32_data.push(height);
    }

    /// Synchronize row_count with the rows actually written
    pub fn finalize(&mut self) {
        if self.u32_data.len() < HEADER_SIZE {
            return;
        }
        let rows = (self.u32_data.len() - HEADER_SIZE) / U32_PER_ROW;
        self.u32_data[6] = rows as u32;

        debug_assert_eq!(
            self.f32_data.len(),
            F32_HEADER_SIZE + rows * F32_PER_ROW,
            "u32 and f32 row sections out of sync"
        );
    }

    /// Encode a page view, resolving row kinds against `rows`
    pub fn write_page(
        &mut self,
        view: &PageView,
        rows: &[RowModel],
        version: ContentVersion,
        page_count: usize,
        viewport: Viewport,
    ) {
        self.prepare(view.rows.len());
        self.write_header(version, view.index, page_count, viewport, view.height, view.top_margin);

        for rendered in &view.rows {
            let (kind, source) = match rows.get(rendered.row) {
                Some(RowModel::Text { source, .. }) => (KIND_TEXT, source.0),
                Some(RowModel::Image { source, .. }) => (KIND_IMAGE, source.0),
                None => {
                    log::warn!("page {} references unknown row {}", view.index, rendered.row);
                    continue;
                }
            };
            let flags = if rendered.is_continuation() {
                FLAG_CONTINUATION
            } else {
                0
            };
            self.write_row(rendered.row, source, kind, flags, rendered.offset, rendered.y, rendered.height);
        }

        self.finalize();
    }

    // Accessors for WASM
    // wasm32 linear memory uses u32 offsets

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn f32_ptr(&self) -> u32 {
        self.f32_data.as_ptr() as u32
    }

    pub fn f32_len(&self) -> u32 {
        self.f32_data.len() as u32
    }
}
