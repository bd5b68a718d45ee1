//! Browser adapter and the JavaScript entry points.
//!
//! All tables on the page share one registry bound to `window`. Attaching is
//! idempotent; detaching removes the overlay and the window listeners.
//!
//! ```javascript
//! import init, { stickyRowTable } from 'sticky-rows';
//! await init();
//! document.querySelectorAll('table.sticky').forEach(t => stickyRowTable(t));
//! ```

mod element;
mod window;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::config::StickyConfig;
use crate::error::{Result, StickyError};
use crate::registry::StickyRows;

pub use window::{BrowserWindow, WindowListener};

type Registry = StickyRows<HtmlElement, BrowserWindow>;

thread_local! {
    static REGISTRY: RefCell<Option<Registry>> = const { RefCell::new(None) };
}

fn with_registry<T>(f: impl FnOnce(&mut Registry) -> Result<T>) -> Result<T> {
    REGISTRY.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| StickyError::Busy)?;
        if slot.is_none() {
            *slot = Some(StickyRows::new(BrowserWindow::new()?));
        }
        match slot.as_mut() {
            Some(registry) => f(registry),
            None => Err(StickyError::Host("sticky registry unavailable".into())),
        }
    })
}

fn parse_config(config: JsValue) -> Result<Option<StickyConfig>> {
    if config.is_undefined() || config.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(config)
        .map(Some)
        .map_err(|e| StickyError::Config(e.to_string()))
}

/// Attach sticky rows to `table`. Re-attaching is a no-op.
///
/// `config` is an optional object such as `{ zIndex: 10, background: "#eee" }`.
///
/// # Errors
/// Returns an error for an invalid config or a DOM failure.
#[wasm_bindgen(js_name = stickyRowTable)]
pub fn sticky_row_table(table: HtmlElement, config: JsValue) -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let config = parse_config(config)?;
    with_registry(|registry| {
        match config {
            Some(config) => registry.attach_with(&table, config)?,
            None => registry.attach(&table)?,
        };
        Ok(())
    })?;
    Ok(())
}

/// Detach sticky rows from `table`. Returns `false` if it was not attached.
///
/// # Errors
/// Returns an error on DOM failure.
#[wasm_bindgen(js_name = detachStickyRowTable)]
pub fn detach_sticky_row_table(table: HtmlElement) -> std::result::Result<bool, JsValue> {
    Ok(with_registry(|registry| registry.detach(&table))?)
}

/// Re-scan `table` for sticky rows after its structure changed.
///
/// # Errors
/// Returns an error on DOM failure or when called during a redraw.
#[wasm_bindgen(js_name = rebuildStickyRows)]
pub fn rebuild_sticky_rows(table: HtmlElement) -> std::result::Result<bool, JsValue> {
    Ok(with_registry(|registry| registry.rebuild(&table))?)
}

/// Current sticky status of `table`, or `null` if it is not attached.
///
/// # Errors
/// Returns an error on DOM failure or serialization failure.
#[wasm_bindgen(js_name = stickyRowStatus)]
pub fn sticky_row_status(table: HtmlElement) -> std::result::Result<JsValue, JsValue> {
    let status = with_registry(|registry| {
        registry
            .get(&table)
            .map(|sticky| sticky.status())
            .transpose()
    })?;
    serde_wasm_bindgen::to_value(&status)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}
