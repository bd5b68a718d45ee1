//! In-memory DOM and window used to drive the sticky-row logic in tests.
//!
//! `FakeNode` implements `HostElement` over a small node tree with fixed
//! bounds per node; `FakeWindow` implements `ViewportGeometry` with a settable
//! scroll position and synchronous event dispatch. Both count the DOM work they
//! are asked to do so tests can assert on its absence.
//!
//! # Example
//!
//! ```rust,ignore
//! let page = Page::new();
//! let table = page.table(500.0, &[heading("head", 40.0), plain(30.0), sticky("sub", 30.0)]);
//! let sticky = StickyRowTable::new(table, page.window.clone(), StickyConfig::default())?;
//! page.window.scroll_to(520.0, 0.0);
//! sticky.redraw(false)?;
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use sticky_rows::{
    HostElement, Offset, Result, ScrollPosition, StickyError, ViewportEvent, ViewportGeometry,
};

// ============================================================================
// Counters shared by every node of one page
// ============================================================================

#[derive(Debug, Default)]
pub struct DomStats {
    /// Style writes, insertions, removals, show/hide and attribute changes.
    pub mutations: Cell<usize>,
    /// Deep clones requested through `HostElement::deep_clone`.
    pub clones: Cell<usize>,
    /// When set, every geometry read fails.
    pub fail_measure: Cell<bool>,
}

impl DomStats {
    fn bump(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }

    pub fn mutations(&self) -> usize {
        self.mutations.get()
    }

    pub fn clones(&self) -> usize {
        self.clones.get()
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Layout box of a node, all in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub left: f64,
    /// Content-box size.
    pub width: f64,
    pub height: f64,
    pub inner_width: f64,
    pub outer_width: f64,
    pub outer_height: f64,
}

impl Bounds {
    pub fn at(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
            inner_width: width,
            outer_width: width,
            outer_height: height,
        }
    }
}

struct NodeData {
    tag: String,
    stats: Rc<DomStats>,
    data: RefCell<HashMap<String, String>>,
    class: RefCell<Option<String>>,
    style: RefCell<BTreeMap<String, String>>,
    children: RefCell<Vec<FakeNode>>,
    parent: RefCell<Weak<NodeData>>,
    bounds: Cell<Bounds>,
}

#[derive(Clone)]
pub struct FakeNode(Rc<NodeData>);

impl std::fmt::Debug for FakeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeNode")
            .field("tag", &self.0.tag)
            .field("name", &self.name())
            .finish()
    }
}

impl FakeNode {
    pub fn new(stats: &Rc<DomStats>, tag: &str) -> Self {
        Self(Rc::new(NodeData {
            tag: tag.to_string(),
            stats: Rc::clone(stats),
            data: RefCell::new(HashMap::new()),
            class: RefCell::new(None),
            style: RefCell::new(BTreeMap::new()),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            bounds: Cell::new(Bounds::default()),
        }))
    }

    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    /// Value of the `name` data key, used to tell rows apart.
    pub fn name(&self) -> Option<String> {
        self.0.data.borrow().get("name").cloned()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.style.borrow().get(property).cloned()
    }

    pub fn child_nodes(&self) -> Vec<FakeNode> {
        self.0.children.borrow().clone()
    }

    pub fn parent(&self) -> Option<FakeNode> {
        self.0.parent.borrow().upgrade().map(FakeNode)
    }

    pub fn bounds(&self) -> Bounds {
        self.0.bounds.get()
    }

    pub fn set_bounds(&self, bounds: Bounds) {
        self.0.bounds.set(bounds);
    }

    pub fn stats(&self) -> Rc<DomStats> {
        Rc::clone(&self.0.stats)
    }

    /// Set a data key without counting it as a mutation.
    pub fn with_data(self, key: &str, value: &str) -> Self {
        self.0.data.borrow_mut().insert(key.to_string(), value.to_string());
        self
    }

    /// Append without counting it as a mutation (page construction).
    pub fn push(&self, child: &FakeNode) {
        child.detach_from_parent();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
    }

    fn detach_from_parent(&self) {
        if let Some(parent) = self.parent() {
            parent
                .0
                .children
                .borrow_mut()
                .retain(|c| !Rc::ptr_eq(&c.0, &self.0));
        }
        *self.0.parent.borrow_mut() = Weak::new();
    }

    fn copy_tree(&self) -> FakeNode {
        let copy = FakeNode::new(&self.0.stats, &self.0.tag);
        copy.0.data.replace(self.0.data.borrow().clone());
        copy.0.class.replace(self.0.class.borrow().clone());
        copy.0.style.replace(self.0.style.borrow().clone());
        copy.0.bounds.set(self.0.bounds.get());
        for child in self.0.children.borrow().iter() {
            copy.push(&child.copy_tree());
        }
        copy
    }

    fn measure<T>(&self, read: impl FnOnce(Bounds) -> T) -> Result<T> {
        if self.0.stats.fail_measure.get() {
            return Err(StickyError::Host(format!("cannot measure <{}>", self.0.tag)));
        }
        Ok(read(self.0.bounds.get()))
    }

    fn collect_rows(&self, out: &mut Vec<FakeNode>) {
        for child in self.0.children.borrow().iter() {
            if child.tag() == "tr" {
                out.push(child.clone());
            }
            child.collect_rows(out);
        }
    }
}

impl HostElement for FakeNode {
    fn rows(&self) -> Result<Vec<Self>> {
        let mut rows = Vec::new();
        self.collect_rows(&mut rows);
        Ok(rows)
    }

    fn children(&self) -> Result<Vec<Self>> {
        Ok(self.child_nodes())
    }

    fn data(&self, key: &str) -> Option<String> {
        self.0.data.borrow().get(key).cloned()
    }

    fn set_data(&self, key: &str, value: &str) -> Result<()> {
        self.0.stats.bump();
        self.0.data.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_data(&self, key: &str) -> Result<()> {
        self.0.stats.bump();
        self.0.data.borrow_mut().remove(key);
        Ok(())
    }

    fn class_name(&self) -> Option<String> {
        self.0.class.borrow().clone()
    }

    fn set_class_name(&self, class: &str) -> Result<()> {
        self.0.stats.bump();
        *self.0.class.borrow_mut() = Some(class.to_string());
        Ok(())
    }

    fn set_style(&self, property: &str, value: &str) -> Result<()> {
        self.0.stats.bump();
        self.0
            .style
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn outer_width(&self) -> Result<f64> {
        self.measure(|b| b.outer_width)
    }

    fn outer_height(&self) -> Result<f64> {
        self.measure(|b| b.outer_height)
    }

    fn inner_width(&self) -> Result<f64> {
        self.measure(|b| b.inner_width)
    }

    fn width(&self) -> Result<f64> {
        self.measure(|b| b.width)
    }

    fn height(&self) -> Result<f64> {
        self.measure(|b| b.height)
    }

    fn offset(&self) -> Result<Offset> {
        self.measure(|b| Offset::new(b.top, b.left))
    }

    fn deep_clone(&self) -> Result<Self> {
        self.0.stats.clones.set(self.0.stats.clones.get() + 1);
        Ok(self.copy_tree())
    }

    fn create_element(&self, tag: &str) -> Result<Self> {
        Ok(FakeNode::new(&self.0.stats, tag))
    }

    fn insert_before(&self, node: &Self) -> Result<()> {
        let parent = self
            .parent()
            .ok_or_else(|| StickyError::Host("insert_before on a detached node".into()))?;
        self.0.stats.bump();
        node.detach_from_parent();
        let mut children = parent.0.children.borrow_mut();
        let index = children
            .iter()
            .position(|c| Rc::ptr_eq(&c.0, &self.0))
            .unwrap_or(children.len());
        *node.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
        children.insert(index, node.clone());
        Ok(())
    }

    fn append_child(&self, child: &Self) -> Result<()> {
        self.0.stats.bump();
        self.push(child);
        Ok(())
    }

    fn clear_children(&self) -> Result<()> {
        self.0.stats.bump();
        for child in self.0.children.take() {
            *child.0.parent.borrow_mut() = Weak::new();
        }
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.0.stats.bump();
        self.detach_from_parent();
        Ok(())
    }

    fn show(&self) -> Result<()> {
        self.0.stats.bump();
        self.0.style.borrow_mut().remove("display");
        Ok(())
    }

    fn hide(&self) -> Result<()> {
        self.set_style("display", "none")
    }

    fn is_visible(&self) -> Result<bool> {
        Ok(self.style("display").as_deref() != Some("none"))
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// Window
// ============================================================================

type Handler = Rc<RefCell<Box<dyn FnMut()>>>;

struct WindowData {
    scroll: Cell<ScrollPosition>,
    width: Cell<f64>,
    next_listener: Cell<u64>,
    listeners: RefCell<Vec<(u64, ViewportEvent, Handler)>>,
    on_scroll_read: RefCell<Option<Box<dyn Fn()>>>,
}

#[derive(Clone)]
pub struct FakeWindow(Rc<WindowData>);

/// Subscription handle; unsubscribes when dropped.
pub struct FakeListener {
    window: Weak<WindowData>,
    id: u64,
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        if let Some(window) = self.window.upgrade() {
            window.listeners.borrow_mut().retain(|(id, _, _)| *id != self.id);
        }
    }
}

impl FakeWindow {
    pub fn new(width: f64) -> Self {
        Self(Rc::new(WindowData {
            scroll: Cell::new(ScrollPosition::default()),
            width: Cell::new(width),
            next_listener: Cell::new(1),
            listeners: RefCell::new(Vec::new()),
            on_scroll_read: RefCell::new(None),
        }))
    }

    /// Move the scroll position without dispatching an event.
    pub fn scroll_to(&self, top: f64, left: f64) {
        self.0.scroll.set(ScrollPosition::new(top, left));
    }

    pub fn set_width(&self, width: f64) {
        self.0.width.set(width);
    }

    /// Dispatch `event` to every subscribed handler, synchronously.
    pub fn fire(&self, event: ViewportEvent) {
        let handlers: Vec<Handler> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, h)| Rc::clone(h))
            .collect();
        for handler in handlers {
            (handler.borrow_mut())();
        }
    }

    /// Scroll and dispatch a scroll event.
    pub fn scroll_and_fire(&self, top: f64) {
        let left = self.0.scroll.get().left;
        self.scroll_to(top, left);
        self.fire(ViewportEvent::Scroll);
    }

    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    /// Run `hook` whenever the scroll position is read, simulating a host
    /// that dispatches nested events while a handler is running.
    pub fn on_scroll_read(&self, hook: impl Fn() + 'static) {
        *self.0.on_scroll_read.borrow_mut() = Some(Box::new(hook));
    }
}

impl ViewportGeometry for FakeWindow {
    type Listener = FakeListener;

    fn scroll(&self) -> Result<ScrollPosition> {
        let hook = self.0.on_scroll_read.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
            *self.0.on_scroll_read.borrow_mut() = Some(hook);
        }
        Ok(self.0.scroll.get())
    }

    fn outer_width(&self) -> Result<f64> {
        Ok(self.0.width.get())
    }

    fn listen(&self, event: ViewportEvent, handler: Box<dyn FnMut()>) -> Result<FakeListener> {
        let id = self.0.next_listener.get();
        self.0.next_listener.set(id + 1);
        self.0
            .listeners
            .borrow_mut()
            .push((id, event, Rc::new(RefCell::new(handler))));
        Ok(FakeListener {
            window: Rc::downgrade(&self.0),
            id,
        })
    }
}

// ============================================================================
// Page builder
// ============================================================================

pub const TABLE_LEFT: f64 = 20.0;
pub const TABLE_WIDTH: f64 = 300.0;
pub const CELL_WIDTHS: [f64; 3] = [100.0, 120.0, 80.0];

/// How a row is marked and how tall it is.
#[derive(Debug, Clone)]
pub struct RowSpec {
    pub name: Option<String>,
    pub sticky: bool,
    pub heading: bool,
    pub height: f64,
}

/// Unmarked row.
pub fn plain(height: f64) -> RowSpec {
    RowSpec {
        name: None,
        sticky: false,
        heading: false,
        height,
    }
}

/// Row marked `data-sticky`.
pub fn sticky(name: &str, height: f64) -> RowSpec {
    RowSpec {
        name: Some(name.to_string()),
        sticky: true,
        heading: false,
        height,
    }
}

/// Row marked `data-sticky data-heading`.
pub fn heading(name: &str, height: f64) -> RowSpec {
    RowSpec {
        name: Some(name.to_string()),
        sticky: true,
        heading: true,
        height,
    }
}

/// A document body plus the window that scrolls it.
pub struct Page {
    pub stats: Rc<DomStats>,
    pub body: FakeNode,
    pub window: FakeWindow,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        let stats = Rc::new(DomStats::default());
        let body = FakeNode::new(&stats, "body");
        body.set_bounds(Bounds::at(0.0, 0.0, 1024.0, 5000.0));
        Self {
            stats,
            body,
            window: FakeWindow::new(1024.0),
        }
    }

    /// Build `<table class="data-table"><tbody>..rows..</tbody></table>` with its
    /// top edge at `top`, rows stacked in order, and append it to the body.
    pub fn table(&self, top: f64, rows: &[RowSpec]) -> FakeNode {
        let table = FakeNode::new(&self.stats, "table");
        *table.0.class.borrow_mut() = Some("data-table striped".to_string());
        let tbody = FakeNode::new(&self.stats, "tbody");
        table.push(&tbody);

        let mut y = top;
        for spec in rows {
            let row = self.row(spec, y);
            tbody.push(&row);
            y += spec.height;
        }

        let height = y - top;
        table.set_bounds(Bounds {
            outer_width: TABLE_WIDTH + 2.0,
            ..Bounds::at(top, TABLE_LEFT, TABLE_WIDTH, height)
        });
        tbody.set_bounds(Bounds::at(top, TABLE_LEFT, TABLE_WIDTH, height));
        self.body.push(&table);
        table
    }

    /// Build a detached row whose top edge is at `top`.
    pub fn row(&self, spec: &RowSpec, top: f64) -> FakeNode {
        let mut row = FakeNode::new(&self.stats, "tr");
        if let Some(name) = &spec.name {
            row = row.with_data("name", name);
        }
        if spec.sticky {
            row = row.with_data("sticky", "");
        }
        if spec.heading {
            row = row.with_data("heading", "");
        }
        row.set_bounds(Bounds::at(top, TABLE_LEFT, TABLE_WIDTH, spec.height));

        let mut x = TABLE_LEFT;
        for width in CELL_WIDTHS {
            let cell = FakeNode::new(&self.stats, "td");
            cell.set_bounds(Bounds {
                inner_width: width,
                outer_width: width + 1.0,
                ..Bounds::at(top, x, width - 8.0, spec.height)
            });
            row.push(&cell);
            x += width + 1.0;
        }
        row
    }
}
