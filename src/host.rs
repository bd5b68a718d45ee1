//! Capabilities consumed from the host environment.
//!
//! The sticky-row logic never touches the DOM directly. A host supplies one
//! implementation of [`HostElement`] for its element handles and one of
//! [`ViewportGeometry`] for the scrollable surface. The browser adapter lives
//! in [`crate::web`]; tests use an in-memory fake.

use serde::Serialize;

use crate::error::Result;

/// Document-relative position of an element or surface, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
}

impl Offset {
    pub const ZERO: Self = Self { top: 0.0, left: 0.0 };

    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Scroll position of a surface, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScrollPosition {
    pub top: f64,
    pub left: f64,
}

impl ScrollPosition {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// True when both axes match within floating point noise.
    pub fn same_as(&self, other: &Self) -> bool {
        (self.top - other.top).abs() <= f64::EPSILON
            && (self.left - other.left).abs() <= f64::EPSILON
    }
}

/// Notifications delivered by the ambient viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportEvent {
    Scroll,
    Resize,
}

impl ViewportEvent {
    /// DOM event type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Resize => "resize",
        }
    }
}

/// Handle to a structural element (table, row, cell or overlay).
///
/// Handles are cheap to clone and refer to the same underlying node, the way
/// `web_sys` element handles do.
pub trait HostElement: Clone {
    /// Descendant `tr` elements in document order.
    fn rows(&self) -> Result<Vec<Self>>;

    /// Direct element children.
    fn children(&self) -> Result<Vec<Self>>;

    /// Value of a `data-*` attribute, addressed by its dataset key.
    fn data(&self, key: &str) -> Option<String>;

    fn has_data(&self, key: &str) -> bool {
        self.data(key).is_some()
    }

    fn set_data(&self, key: &str, value: &str) -> Result<()>;

    fn remove_data(&self, key: &str) -> Result<()>;

    /// Raw `class` attribute.
    fn class_name(&self) -> Option<String>;

    fn set_class_name(&self, class: &str) -> Result<()>;

    /// Set an inline style property.
    fn set_style(&self, property: &str, value: &str) -> Result<()>;

    /// Width including padding and border.
    fn outer_width(&self) -> Result<f64>;

    /// Height including padding and border.
    fn outer_height(&self) -> Result<f64>;

    /// Width including padding, excluding border.
    fn inner_width(&self) -> Result<f64>;

    /// Content-box width.
    fn width(&self) -> Result<f64>;

    /// Content-box height.
    fn height(&self) -> Result<f64>;

    /// Position relative to the document origin.
    fn offset(&self) -> Result<Offset>;

    /// Deep copy of this node, detached from the document.
    fn deep_clone(&self) -> Result<Self>;

    /// Create a new element owned by the same document.
    fn create_element(&self, tag: &str) -> Result<Self>;

    /// Insert `node` as the previous sibling of `self`.
    fn insert_before(&self, node: &Self) -> Result<()>;

    fn append_child(&self, child: &Self) -> Result<()>;

    /// Remove every child node.
    fn clear_children(&self) -> Result<()>;

    /// Detach this node from its parent.
    fn remove(&self) -> Result<()>;

    fn show(&self) -> Result<()>;

    fn hide(&self) -> Result<()>;

    fn is_visible(&self) -> Result<bool>;

    /// Node identity, not structural equality.
    fn same_node(&self, other: &Self) -> bool;
}

/// The scrollable surface that contains the table.
///
/// Only the window is supported as a container; its offset is always zero.
pub trait ViewportGeometry {
    /// Unsubscribes from the event when dropped.
    type Listener;

    fn offset(&self) -> Offset {
        Offset::ZERO
    }

    /// Current scroll position. Read fresh on every call.
    fn scroll(&self) -> Result<ScrollPosition>;

    /// Rendered width including scrollbars.
    fn outer_width(&self) -> Result<f64>;

    /// Subscribe `handler` to `event`.
    fn listen(&self, event: ViewportEvent, handler: Box<dyn FnMut()>) -> Result<Self::Listener>;
}
