//! Choosing which rows are stuck for a given scroll position.
//!
//! The scan is written against a measuring closure so the geometry can come
//! from a live DOM, a fake, or precomputed numbers in benchmarks.

use serde::Serialize;

use crate::error::Result;
use crate::host::HostElement;
use crate::rows::{RowSetIndex, RowSetKind, StickyRow};

/// Measurements of one row, read on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RowMetrics {
    /// Document-relative top edge.
    pub top: f64,
    /// Outer height.
    pub height: f64,
}

impl RowMetrics {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn of<E: HostElement>(row: &StickyRow<E>) -> Result<Self> {
        let element = row.element();
        Ok(Self {
            top: element.offset()?.top,
            height: element.outer_height()?,
        })
    }
}

/// A row currently pinned to the top of the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StuckRow {
    pub set: RowSetKind,
    /// Position within its tier (reverse document order).
    pub index: usize,
    pub height: f64,
    /// Distance from the pin line; `<= 0` once the row has reached it.
    pub top_offset: f64,
}

/// Zero, one or two stuck rows. A secondary row is only ever present together
/// with a primary one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StickySelection {
    pub primary: Option<StuckRow>,
    pub secondary: Option<StuckRow>,
}

impl StickySelection {
    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }

    pub fn len(&self) -> usize {
        self.rows().count()
    }

    /// Stuck rows in render order, primary first.
    pub fn rows(&self) -> impl Iterator<Item = StuckRow> {
        self.primary.into_iter().chain(self.secondary)
    }
}

/// Scan one tier for the row that should be stuck.
///
/// Rows are visited in stored order and the first one whose top has reached
/// `upper_bound` wins. With a `header`, candidates that would not sit below it
/// (`header.top_offset >= candidate.top_offset`) are skipped.
pub fn find_sticky_row<F>(
    set: RowSetKind,
    count: usize,
    upper_bound: f64,
    header: Option<&StuckRow>,
    mut measure: F,
) -> Result<Option<StuckRow>>
where
    F: FnMut(usize) -> Result<RowMetrics>,
{
    for index in 0..count {
        let metrics = measure(index)?;
        let top_offset = metrics.top - upper_bound;

        if top_offset > 0.0 {
            continue;
        }
        if header.is_some_and(|h| h.top_offset >= top_offset) {
            continue;
        }

        return Ok(Some(StuckRow {
            set,
            index,
            height: metrics.height,
            top_offset,
        }));
    }
    Ok(None)
}

/// Pick the primary row, then the secondary row stacked directly beneath it.
pub fn select<P, S>(
    primary_len: usize,
    secondary_len: usize,
    scroll_top: f64,
    measure_primary: P,
    measure_secondary: S,
) -> Result<StickySelection>
where
    P: FnMut(usize) -> Result<RowMetrics>,
    S: FnMut(usize) -> Result<RowMetrics>,
{
    let Some(primary) = find_sticky_row(
        RowSetKind::Primary,
        primary_len,
        scroll_top,
        None,
        measure_primary,
    )?
    else {
        return Ok(StickySelection::default());
    };

    let secondary = find_sticky_row(
        RowSetKind::Secondary,
        secondary_len,
        scroll_top + primary.height,
        Some(&primary),
        measure_secondary,
    )?;

    Ok(StickySelection {
        primary: Some(primary),
        secondary,
    })
}

/// [`select`] over a live row index.
pub fn select_rows<E: HostElement>(
    rows: &RowSetIndex<E>,
    scroll_top: f64,
) -> Result<StickySelection> {
    let primary = rows.primary();
    let secondary = rows.secondary();
    select(
        primary.len(),
        secondary.len(),
        scroll_top,
        |i| measure_at(primary, i),
        |i| measure_at(secondary, i),
    )
}

fn measure_at<E: HostElement>(rows: &[StickyRow<E>], index: usize) -> Result<RowMetrics> {
    match rows.get(index) {
        Some(row) => RowMetrics::of(row),
        None => Ok(RowMetrics::default()),
    }
}
