//! sticky-rows - sticky header rows for HTML tables
//!
//! Rows marked `data-sticky` stay pinned to the top of the window while the
//! rest of their table scrolls underneath:
//! - Two tiers: a heading row and a sub-heading row stacked beneath it
//! - Overlay clones keep the table's class and column widths
//! - One redraw at a time; overlapping scroll/resize events are dropped
//!
//! The logic is written against the [`host`] capability traits. The browser
//! adapter in `web` (wasm32 only) implements them on `web_sys` types and
//! exports the JavaScript API.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { stickyRowTable } from 'sticky-rows';
//! await init();
//! stickyRowTable(document.querySelector('#report'));
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod guard;
pub mod host;
pub mod registry;
pub mod rows;
pub mod selection;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use config::StickyConfig;
pub use controller::{Geometry, ScrollDirection, StickyRowTable, StickyStatus};
pub use error::{Result, StickyError};
pub use guard::ReentrancyGuard;
pub use host::{HostElement, Offset, ScrollPosition, ViewportEvent, ViewportGeometry};
pub use registry::StickyRows;
pub use rows::{RowSetIndex, RowSetKind, StickyRow};
pub use selection::{RowMetrics, StickySelection, StuckRow};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
