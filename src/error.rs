//! Structured error types for sticky-rows.
//!
//! Host collaborator failures are carried through unchanged; the crate itself
//! only adds the lifecycle and configuration variants.

/// All errors that can occur while tracking and rendering sticky rows.
#[derive(Debug, thiserror::Error)]
pub enum StickyError {
    /// A host read or DOM mutation failed.
    #[error("Host error: {0}")]
    Host(String),

    /// `redraw` ran before `calculate_dimensions` established the geometry cache.
    #[error("Geometry has not been calculated yet; call calculate_dimensions first")]
    GeometryNotCalculated,

    /// A guarded routine is already running on this table.
    #[error("Sticky table is busy with another redraw or resize")]
    Busy,

    /// Invalid configuration payload.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StickyError>;

impl From<serde_json::Error> for StickyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<StickyError> for wasm_bindgen::JsValue {
    fn from(e: StickyError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for StickyError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Host(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}
