//! Converts polygon vertex streams into edge records.
//!
//! Walks each contour's consecutive vertex pairs, drops horizontal
//! segments, orients every remaining segment top-down, and inserts it at
//! the head of its edge-table bucket. Also tracks the polygon's overall
//! integer y-range, which the scan driver uses as its `top..bottom` loop
//! bounds.

use crate::basics::{iround, FPoint};
use crate::edge::{Edge, EdgePool};
use crate::edge_table::EdgeTable;
use crate::error::{RasterError, RasterResult};
use crate::fixed::FX;
use crate::polygon::{Bounds, Polygon};

/// Result of a successful edge-build pass: the polygon's integer y-range.
/// `top == bottom` (or `top > bottom`) means no non-horizontal edges were
/// found — a degenerate polygon that should emit no spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YRange {
    pub top: i32,
    pub bottom: i32,
}

impl YRange {
    pub fn is_degenerate(&self) -> bool {
        self.top >= self.bottom
    }
}

/// Builds edges for `polygon` into `pool`/`table`, which are reset and
/// sized from `bounds` first.
///
/// Returns `Ok(None)` for an empty/degenerate input (no error, no spans).
pub fn build(
    pool: &mut EdgePool,
    table: &mut EdgeTable,
    polygon: &Polygon,
    bounds: &Bounds,
) -> RasterResult<Option<YRange>> {
    if bounds.is_empty() || polygon.is_empty() {
        return Ok(None);
    }

    pool.reset();
    let y_base = iround(bounds.y);
    let height = iceil_height(bounds);
    table.reset(y_base, height)?;

    let mut top = i32::MAX;
    let mut bottom = i32::MIN;

    for contour in polygon.contours() {
        if contour.len() < 2 {
            continue;
        }
        for i in 0..contour.len() {
            let pb = contour[i];
            let pe = contour[(i + 1) % contour.len()];
            if let Some(range) = add_segment(pool, table, pb, pe)? {
                top = top.min(range.0);
                bottom = bottom.max(range.1);
            }
        }
    }

    if top > bottom {
        // Every segment was horizontal (or the polygon had < 2 edges).
        return Ok(None);
    }

    Ok(Some(YRange { top, bottom }))
}

/// Scanline height implied by the bounds, used only to size the edge
/// table; the authoritative y-range comes from the edges actually built.
fn iceil_height(bounds: &Bounds) -> usize {
    let top = iround(bounds.y);
    let bottom = iround(bounds.y + bounds.h);
    (bottom - top).max(0) as usize
}

/// Builds and inserts the edge for one polygon segment `pb -> pe`, unless
/// it is horizontal. Returns the edge's `(y_top, y_bottom)` on insertion.
fn add_segment(
    pool: &mut EdgePool,
    table: &mut EdgeTable,
    pb: FPoint,
    pe: FPoint,
) -> RasterResult<Option<(i32, i32)>> {
    let mut iyb = iround(pb.y);
    let mut iye = iround(pe.y);
    if iyb == iye {
        return Ok(None);
    }

    let mut xb = FX::from_f64(pb.x);
    let mut yb = FX::from_f64(pb.y);
    let mut xe = FX::from_f64(pe.x);
    let mut ye = FX::from_f64(pe.y);

    let winding: i8 = if yb > ye {
        core::mem::swap(&mut xb, &mut xe);
        core::mem::swap(&mut yb, &mut ye);
        core::mem::swap(&mut iyb, &mut iye);
        -1
    } else {
        1
    };

    let slope = (xe - xb) / (ye - yb);
    let dy_top = yb - FX::from_i32(iyb);
    let dy_bottom = ye - FX::from_i32(iye);

    // Position `x` at the intersection with the *center* of scanline
    // `iyb`, not its top edge (see crate-level design notes on `dy_top`).
    let x = xb - dy_top.mul(slope);

    let y_top = iyb;
    let y_bottom = iye - 1;

    let next = table.bucket(y_top);
    let edge = Edge {
        winding,
        y_top,
        y_bottom,
        x,
        slope,
        x_top: xb,
        x_bottom: xe,
        dy_top,
        dy_bottom,
        is_top: true,
        next,
    };

    let idx = pool.alloc(edge)?;
    table.set_bucket(y_top, idx);

    Ok(Some((y_top, y_bottom + 1)))
}
