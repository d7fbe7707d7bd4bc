//! Fill-rule evaluators and span emission: the convex fast path and the
//! general concave path (odd-even / non-zero) with conjoint-span
//! coalescing.

use crate::edge::{Edge, EdgePool};
use crate::edge_table::EdgeTable;
use crate::fixed::FX_NEAR0;
use crate::polygon::FillRule;

/// The callback a scan pass feeds spans into. `y_end > y_start` always; it
/// equals `y + 1` except for the convex rectangular fast path, which can
/// cover many scanlines in one call.
pub type SpanEmit<'a> = dyn FnMut(i32, i32, &Edge, &Edge) + 'a;

#[inline]
fn rule_active(rule: FillRule, winding: i32) -> bool {
    match rule {
        FillRule::Odd => winding & 1 != 0,
        FillRule::NonZero => winding != 0,
    }
}

/// Walks the active list pairwise, accumulating a running winding number
/// and emitting a span for every adjacent pair whose crossed winding
/// satisfies `rule`. Conjoint spans — where one pair's left edge meets the
/// previous pair's right edge at the same rounded x (a shared vertex) —
/// are coalesced into a single wider span before being flushed.
pub fn sweep_concave(pool: &EdgePool, head: u16, y: i32, rule: FillRule, emit: &mut SpanEmit<'_>) {
    if head == 0 {
        return;
    }

    let mut winding = 0i32;
    let mut cache: Option<(u16, u16)> = None;

    let mut left = head;
    let mut right = pool.get(left).next;
    while right != 0 {
        winding += pool.get(left).winding as i32;
        if rule_active(rule, winding) {
            let conjoint = match cache {
                Some((_, cached_right)) => {
                    pool.get(left).x.round() == pool.get(cached_right).x.round()
                }
                None => false,
            };
            if conjoint {
                let (cached_left, _) = cache.unwrap();
                cache = Some((cached_left, right));
            } else {
                flush(pool, &mut cache, y, emit);
                cache = Some((left, right));
            }
        }
        left = right;
        right = pool.get(left).next;
    }
    flush(pool, &mut cache, y, emit);
}

fn flush(pool: &EdgePool, cache: &mut Option<(u16, u16)>, y: i32, emit: &mut SpanEmit<'_>) {
    if let Some((l, r)) = cache.take() {
        emit(y, y + 1, pool.get(l), pool.get(r));
    }
}

/// Outcome of one convex-path evaluation at scanline `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvexOutcome {
    /// No active edges; nothing to do.
    None,
    /// Ordinary single-scanline span was emitted.
    Span,
    /// Both active edges were near-vertical: a multi-scanline rectangular
    /// span covering `[y, y_resume)` was emitted in one call, the active
    /// list was cleared, and the driver should jump straight to
    /// `y_resume`.
    Rect { y_resume: i32 },
}

/// Convex fast path: on any interior scanline a convex contour has exactly
/// two active edges, so the span is just `[edges[0].x, edges[1].x)`. When
/// both edges are near-vertical the region down to whichever ends first is
/// a plain rectangle; that whole run is emitted as one span, and the
/// longer-lived edge is re-queued into `table` so the driver picks it back
/// up when it resumes normal per-scanline processing.
pub fn sweep_convex(
    pool: &mut EdgePool,
    table: &mut EdgeTable,
    head: u16,
    y: i32,
    emit: &mut SpanEmit<'_>,
) -> ConvexOutcome {
    if head == 0 {
        return ConvexOutcome::None;
    }
    let e0 = head;
    let e1 = pool.get(e0).next;
    if e1 == 0 {
        return ConvexOutcome::None;
    }
    debug_assert_eq!(
        pool.get(e1).next,
        0,
        "convex fast path requires exactly two active edges"
    );

    let slope0 = pool.get(e0).slope;
    let slope1 = pool.get(e1).slope;

    if slope0.near_zero(FX_NEAR0) && slope1.near_zero(FX_NEAR0) {
        let yb0 = pool.get(e0).y_bottom;
        let yb1 = pool.get(e1).y_bottom;
        let y_resume = yb0.min(yb1) + 1;

        emit(y, y_resume, pool.get(e0), pool.get(e1));

        if yb0 != yb1 {
            let longer = if yb0 > yb1 { e0 } else { e1 };
            if y_resume <= pool.get(longer).y_bottom {
                let existing = table.bucket(y_resume);
                pool.get_mut(longer).next = existing;
                table.set_bucket(y_resume, longer);
            }
        }

        ConvexOutcome::Rect { y_resume }
    } else {
        emit(y, y + 1, pool.get(e0), pool.get(e1));
        ConvexOutcome::Span
    }
}
