//! Attachment configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options accepted when attaching to a table.
///
/// Every field has a default, so `{}` (or no config at all) reproduces the
/// stock behaviour: rows opt in with `data-sticky`, headings with
/// `data-heading`, and the overlay sits on a white background at `z-index: 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StickyConfig {
    /// Dataset key marking a row as sticky-eligible (`data-sticky`).
    pub sticky_key: String,
    /// Dataset key forcing a row into the primary set (`data-heading`).
    pub heading_key: String,
    /// Dataset key holding the instance marker on an attached table.
    pub marker_key: String,
    /// `z-index` of the overlay table.
    pub z_index: i32,
    /// CSS background of the overlay table.
    pub background: String,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            sticky_key: "sticky".to_string(),
            heading_key: "heading".to_string(),
            marker_key: "stickyRowTable".to_string(),
            z_index: 1,
            background: "#fff".to_string(),
        }
    }
}

impl StickyConfig {
    /// Parse a configuration from a JSON object. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns [`StickyError::Config`](crate::error::StickyError::Config) if the
    /// JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
