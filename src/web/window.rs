//! The browser window as the scroll container.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::{Result, StickyError};
use crate::host::{ScrollPosition, ViewportEvent, ViewportGeometry};

/// [`ViewportGeometry`] backed by `window`.
#[derive(Clone)]
pub struct BrowserWindow {
    window: Window,
}

impl BrowserWindow {
    /// # Errors
    /// Fails outside a browsing context.
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| StickyError::Host("no window".into()))?;
        Ok(Self { window })
    }
}

/// Event listener on the window; removed when dropped.
pub struct WindowListener {
    window: Window,
    event: ViewportEvent,
    closure: Closure<dyn FnMut()>,
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        let _ = self.window.remove_event_listener_with_callback(
            self.event.as_str(),
            self.closure.as_ref().unchecked_ref(),
        );
    }
}

impl ViewportGeometry for BrowserWindow {
    type Listener = WindowListener;

    fn scroll(&self) -> Result<ScrollPosition> {
        Ok(ScrollPosition::new(
            self.window.scroll_y()?,
            self.window.scroll_x()?,
        ))
    }

    fn outer_width(&self) -> Result<f64> {
        self.window
            .inner_width()?
            .as_f64()
            .ok_or_else(|| StickyError::Host("window.innerWidth is not a number".into()))
    }

    fn listen(&self, event: ViewportEvent, handler: Box<dyn FnMut()>) -> Result<WindowListener> {
        let closure = Closure::wrap(handler);
        self.window
            .add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref())?;
        Ok(WindowListener {
            window: self.window.clone(),
            event,
            closure,
        })
    }
}
