//! The sticky overlay controller for one table.
//!
//! `StickyRowTable` owns a synthetic `<table>` inserted right before the
//! source table and positioned `fixed` at the top of the viewport. On every
//! scroll it decides which sticky rows have crossed the pin line and renders
//! clones of them into that overlay; on every resize it refreshes the cached
//! geometry the scroll path reads.
//!
//! Methods take `&self` so event handlers can share the controller through an
//! `Rc`. Mutable state lives behind a `RefCell` that is only borrowed while the
//! reentrancy gate is held, so a nested event dispatched by the host during a
//! redraw is dropped before it can touch the state.

use std::cell::RefCell;

use serde::Serialize;

use crate::config::StickyConfig;
use crate::error::{Result, StickyError};
use crate::guard::ReentrancyGuard;
use crate::host::{HostElement, Offset, ScrollPosition, ViewportGeometry};
use crate::rows::{px, RowSetIndex, RowSetKind};
use crate::selection::{select_rows, StickySelection, StuckRow};

/// Vertical direction of the last scroll that triggered a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Geometry cached on resize and read on every scroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub container_offset: Offset,
    /// Last scroll position seen by `calculate_dimensions` or `redraw`.
    pub container_scroll: ScrollPosition,
    pub container_width: f64,
    /// Outer width of the source table.
    pub table_width: f64,
    /// Content-box width of the source table; the overlay uses this width.
    pub table_content_width: f64,
    pub table_height: f64,
    pub table_offset: Offset,
}

impl Geometry {
    /// Table top relative to the container top.
    pub fn table_top(&self) -> f64 {
        self.table_offset.top - self.container_offset.top
    }

    /// True when the table has not been reached yet or has scrolled past.
    pub fn is_out_of_view(&self, scroll_top: f64) -> bool {
        let top = self.table_top();
        top > scroll_top || top + self.table_height < scroll_top
    }

    fn overlay_left(&self) -> f64 {
        self.table_offset.left - self.container_scroll.left
    }
}

/// Serializable snapshot of a controller, for hosts and debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyStatus {
    pub scroll: ScrollPosition,
    pub vertical: Option<ScrollDirection>,
    pub horizontal: bool,
    pub overlay_visible: bool,
    pub stuck: Vec<StuckRow>,
    pub primary_rows: usize,
    pub secondary_rows: usize,
}

struct Overlay<E> {
    element: E,
    selection: StickySelection,
}

#[derive(Default)]
struct ScrollState {
    vertical: Option<ScrollDirection>,
    horizontal: bool,
}

struct TableState<E> {
    rows: RowSetIndex<E>,
    geometry: Option<Geometry>,
    overlay: Option<Overlay<E>>,
    scroll: ScrollState,
}

/// Sticky-row controller attached to one table.
pub struct StickyRowTable<E, V> {
    table: E,
    viewport: V,
    config: StickyConfig,
    guard: ReentrancyGuard,
    state: RefCell<TableState<E>>,
}

impl<E: HostElement, V: ViewportGeometry> StickyRowTable<E, V> {
    /// Index the table's sticky rows, build the overlay and draw once.
    ///
    /// # Errors
    /// Propagates any host failure while scanning, measuring or rendering.
    pub fn new(table: E, viewport: V, config: StickyConfig) -> Result<Self> {
        let sticky = Self::without_geometry(table, viewport, config)?;
        sticky.calculate_dimensions()?;
        sticky.redraw(true)?;
        Ok(sticky)
    }

    /// Index the table's sticky rows without measuring anything.
    ///
    /// No overlay exists until [`calculate_dimensions`](Self::calculate_dimensions)
    /// runs; calling [`redraw`](Self::redraw) first fails with
    /// [`StickyError::GeometryNotCalculated`].
    pub fn without_geometry(table: E, viewport: V, config: StickyConfig) -> Result<Self> {
        let rows = RowSetIndex::build(&table, &config)?;
        Ok(Self {
            table,
            viewport,
            config,
            guard: ReentrancyGuard::new(),
            state: RefCell::new(TableState {
                rows,
                geometry: None,
                overlay: None,
                scroll: ScrollState::default(),
            }),
        })
    }

    pub fn table(&self) -> &E {
        &self.table
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn config(&self) -> &StickyConfig {
        &self.config
    }

    /// Refresh the geometry cache, creating the overlay on the first call.
    ///
    /// Returns `Ok(false)` when skipped because another guarded routine is
    /// running.
    ///
    /// # Errors
    /// Propagates host measurement and DOM mutation failures.
    pub fn calculate_dimensions(&self) -> Result<bool> {
        match self.guard.run(|| self.measure()) {
            Some(result) => result.map(|()| true),
            None => Ok(false),
        }
    }

    /// Recompute the stuck rows for the current scroll position and render them.
    ///
    /// Without `force`, an unchanged scroll position is a no-op. Returns
    /// `Ok(false)` when the call was dropped because another guarded routine
    /// is running.
    ///
    /// # Errors
    /// [`StickyError::GeometryNotCalculated`] before the first
    /// [`calculate_dimensions`](Self::calculate_dimensions); otherwise host
    /// failures.
    pub fn redraw(&self, force: bool) -> Result<bool> {
        match self.guard.run(|| self.redraw_admitted(force)) {
            Some(result) => result.map(|()| true),
            None => Ok(false),
        }
    }

    /// Re-scan the table for sticky rows after a structural change.
    ///
    /// Existing clones are discarded and the overlay is emptied, then redrawn
    /// if geometry is available.
    ///
    /// # Errors
    /// [`StickyError::Busy`] when called from inside a redraw or resize;
    /// otherwise host failures.
    pub fn rebuild_rows(&self) -> Result<()> {
        let measured = self
            .guard
            .run(|| -> Result<bool> {
                let mut state = self.state.borrow_mut();
                state.rows.rebuild(&self.table, &self.config)?;
                if let Some(overlay) = state.overlay.as_mut() {
                    overlay.selection = StickySelection::default();
                    overlay.element.clear_children()?;
                    overlay.element.hide()?;
                }
                Ok(state.geometry.is_some())
            })
            .ok_or(StickyError::Busy)??;

        if measured {
            self.redraw(true)?;
        }
        Ok(())
    }

    /// Remove the overlay from the document.
    ///
    /// # Errors
    /// [`StickyError::Busy`] when called from inside a guarded routine.
    pub fn remove_overlay(&self) -> Result<()> {
        self.guard
            .run(|| {
                let mut state = self.state.borrow_mut();
                if let Some(overlay) = state.overlay.take() {
                    overlay.element.remove()?;
                }
                state.geometry = None;
                Ok(())
            })
            .ok_or(StickyError::Busy)?
    }

    /// The overlay element, once created.
    pub fn overlay(&self) -> Option<E> {
        let state = self.state.try_borrow().ok()?;
        state.overlay.as_ref().map(|o| o.element.clone())
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.state.try_borrow().ok()?.geometry
    }

    /// Rows rendered by the last redraw.
    pub fn selection(&self) -> StickySelection {
        self.state
            .try_borrow()
            .ok()
            .and_then(|s| s.overlay.as_ref().map(|o| o.selection))
            .unwrap_or_default()
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.state.try_borrow().ok()?.scroll.vertical
    }

    /// Cached overlay clone of a row, if it has been rendered before.
    pub fn cached_clone(&self, set: RowSetKind, index: usize) -> Option<E> {
        let state = self.state.try_borrow().ok()?;
        let rows = match set {
            RowSetKind::Primary => state.rows.primary(),
            RowSetKind::Secondary => state.rows.secondary(),
        };
        rows.get(index)?.cached_clone().cloned()
    }

    /// Snapshot of the scroll cache, stuck rows and overlay visibility.
    ///
    /// # Errors
    /// [`StickyError::Busy`] while a guarded routine holds the state;
    /// [`StickyError::GeometryNotCalculated`] before the first measurement.
    pub fn status(&self) -> Result<StickyStatus> {
        let state = self.state.try_borrow().map_err(|_| StickyError::Busy)?;
        let (Some(geometry), Some(overlay)) = (state.geometry, state.overlay.as_ref()) else {
            return Err(StickyError::GeometryNotCalculated);
        };
        Ok(StickyStatus {
            scroll: geometry.container_scroll,
            vertical: state.scroll.vertical,
            horizontal: state.scroll.horizontal,
            overlay_visible: overlay.element.is_visible()?,
            stuck: overlay.selection.rows().collect(),
            primary_rows: state.rows.primary().len(),
            secondary_rows: state.rows.secondary().len(),
        })
    }

    fn measure(&self) -> Result<()> {
        let geometry = Geometry {
            container_offset: self.viewport.offset(),
            container_scroll: self.viewport.scroll()?,
            container_width: self.viewport.outer_width()?,
            table_width: self.table.outer_width()?,
            table_content_width: self.table.width()?,
            table_height: self.table.height()?,
            table_offset: self.table.offset()?,
        };

        let mut state = self.state.borrow_mut();
        match state.overlay.as_ref() {
            Some(overlay) => position(&overlay.element, &geometry)?,
            None => {
                let element = self.create_overlay(&geometry)?;
                state.overlay = Some(Overlay {
                    element,
                    selection: StickySelection::default(),
                });
            }
        }
        state.geometry = Some(geometry);
        Ok(())
    }

    fn create_overlay(&self, geometry: &Geometry) -> Result<E> {
        let overlay = self.table.create_element("table")?;
        if let Some(class) = self.table.class_name() {
            overlay.set_class_name(&class)?;
        }
        overlay.set_style("position", "fixed")?;
        overlay.set_style("z-index", &self.config.z_index.to_string())?;
        overlay.set_style("overflow", "hidden")?;
        overlay.set_style("background", &self.config.background)?;
        overlay.hide()?;
        position(&overlay, geometry)?;
        self.table.insert_before(&overlay)?;
        log::debug!(
            "[sticky] overlay created at top={} left={} width={}",
            geometry.container_offset.top,
            geometry.overlay_left(),
            geometry.table_content_width
        );
        Ok(overlay)
    }

    fn redraw_admitted(&self, force: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let TableState {
            rows,
            geometry,
            overlay,
            scroll: scroll_state,
        } = &mut *state;
        let (Some(geometry), Some(overlay)) = (geometry.as_mut(), overlay.as_mut()) else {
            return Err(StickyError::GeometryNotCalculated);
        };

        let scroll = self.viewport.scroll()?;
        let cached = geometry.container_scroll;
        if !force && scroll.same_as(&cached) {
            return Ok(());
        }

        scroll_state.vertical = Some(if scroll.top > cached.top {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        });
        scroll_state.horizontal = (scroll.left - cached.left).abs() > f64::EPSILON;
        geometry.container_scroll = scroll;

        if geometry.is_out_of_view(scroll.top) {
            log::trace!("[sticky] table out of view at scroll top {}", scroll.top);
            if overlay.element.is_visible()? {
                overlay.selection = StickySelection::default();
                overlay.element.hide()?;
                overlay.element.clear_children()?;
            }
            return Ok(());
        }

        let selection = select_rows(rows, scroll.top)?;
        log::trace!(
            "[sticky] {} row(s) stuck at scroll top {}",
            selection.len(),
            scroll.top
        );

        overlay.element.clear_children()?;
        overlay.selection = selection;
        if selection.is_empty() {
            overlay.element.hide()?;
            return Ok(());
        }

        for stuck in selection.rows() {
            let Some(row) = rows.row_mut(stuck.set, stuck.index) else {
                continue;
            };
            let clone = row.clone_for_overlay()?;
            overlay.element.append_child(&clone)?;
        }

        position(&overlay.element, geometry)?;
        if !overlay.element.is_visible()? {
            overlay.element.show()?;
        }
        Ok(())
    }
}

fn position<E: HostElement>(overlay: &E, geometry: &Geometry) -> Result<()> {
    overlay.set_style("top", &px(geometry.container_offset.top))?;
    overlay.set_style("left", &px(geometry.overlay_left()))?;
    overlay.set_style("width", &px(geometry.table_content_width))?;
    Ok(())
}
