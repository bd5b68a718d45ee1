//! Classification of sticky-eligible rows.

use crate::config::StickyConfig;
use crate::error::Result;
use crate::host::HostElement;

/// One sticky-eligible row and its lazily created overlay clone.
#[derive(Debug, Clone)]
pub struct StickyRow<E> {
    row: E,
    clone: Option<E>,
}

impl<E: HostElement> StickyRow<E> {
    pub fn new(row: E) -> Self {
        Self { row, clone: None }
    }

    pub fn element(&self) -> &E {
        &self.row
    }

    /// Clone used in the overlay, if one has been made.
    pub fn cached_clone(&self) -> Option<&E> {
        self.clone.as_ref()
    }

    /// Return the overlay clone, creating it on first use.
    ///
    /// Each cell of a new clone gets its `width` pinned to the live cell's
    /// inner width so the overlay columns line up with the table. Existing
    /// clones are returned as they are.
    pub fn clone_for_overlay(&mut self) -> Result<E> {
        if let Some(clone) = &self.clone {
            return Ok(clone.clone());
        }

        let clone = self.row.deep_clone()?;
        let clone_cells = clone.children()?;
        for (cell, clone_cell) in self.row.children()?.iter().zip(&clone_cells) {
            clone_cell.set_style("width", &px(cell.inner_width()?))?;
        }

        self.clone = Some(clone.clone());
        Ok(clone)
    }
}

/// Sticky rows of one table split into the two tiers.
///
/// Both tiers are stored in reverse document order: the row nearest the end
/// of the table comes first, so a scan finds the row that most recently
/// crossed the pin line before any earlier one.
#[derive(Debug, Clone)]
pub struct RowSetIndex<E> {
    primary: Vec<StickyRow<E>>,
    secondary: Vec<StickyRow<E>>,
}

impl<E> Default for RowSetIndex<E> {
    fn default() -> Self {
        Self {
            primary: Vec::new(),
            secondary: Vec::new(),
        }
    }
}

impl<E: HostElement> RowSetIndex<E> {
    /// Scan `table` for rows carrying the sticky key.
    ///
    /// A row joins the primary tier when it carries the heading key or when the
    /// primary tier is still empty; every other eligible row is secondary.
    pub fn build(table: &E, config: &StickyConfig) -> Result<Self> {
        let mut index = Self::default();

        for row in table.rows()? {
            if !row.has_data(&config.sticky_key) {
                continue;
            }
            if row.has_data(&config.heading_key) || index.primary.is_empty() {
                index.primary.push(StickyRow::new(row));
            } else {
                index.secondary.push(StickyRow::new(row));
            }
        }

        index.primary.reverse();
        index.secondary.reverse();
        log::debug!(
            "[rows] indexed {} primary and {} secondary sticky rows",
            index.primary.len(),
            index.secondary.len()
        );
        Ok(index)
    }

    /// Replace every descriptor with a fresh scan. Cached clones are dropped.
    pub fn rebuild(&mut self, table: &E, config: &StickyConfig) -> Result<()> {
        *self = Self::build(table, config)?;
        Ok(())
    }

    pub fn primary(&self) -> &[StickyRow<E>] {
        &self.primary
    }

    pub fn secondary(&self) -> &[StickyRow<E>] {
        &self.secondary
    }

    pub fn row_mut(&mut self, set: RowSetKind, index: usize) -> Option<&mut StickyRow<E>> {
        match set {
            RowSetKind::Primary => self.primary.get_mut(index),
            RowSetKind::Secondary => self.secondary.get_mut(index),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}

/// Which tier a sticky row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSetKind {
    Primary,
    Secondary,
}

pub(crate) fn px(value: f64) -> String {
    format!("{value}px")
}
