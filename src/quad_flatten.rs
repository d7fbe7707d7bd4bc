//! Quadratic Bezier flattening by recursive midpoint subdivision.
//!
//! Distilled from the adaptive de Casteljau approach in `Curve3Div`
//! (`agg_curves.h`/`.cpp`), but trades AGG's angle/collinearity adaptive
//! termination for a fixed subdivision count chosen up front from an
//! L-infinity bulge estimate — cheaper per curve and easier to bound (see
//! `DIVIDED_MAX`), at the cost of being less adaptive to locally flat
//! stretches of a bulgy curve.

use crate::basics::FPoint;
use crate::fixed::FX;

/// Upper bound on recursion depth; caps output at `2^DIVIDED_MAX` segments.
pub const DIVIDED_MAX: u32 = 5;

#[inline]
fn lerp(a: FPoint, b: FPoint, t: f64) -> FPoint {
    FPoint::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

#[inline]
fn midpoint(a: FPoint, b: FPoint) -> FPoint {
    FPoint::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// L-infinity approximation of the distance from the control point `p1` to
/// the chord `p0-p2`, computed from the offset of `p1` from the chord's
/// midpoint. Monotone in curve "bulge"; used solely as a subdivision
/// heuristic, never as an exact geometric distance.
pub fn near_distance(p0: FPoint, p1: FPoint, p2: FPoint) -> FX {
    let mid = midpoint(p0, p2);
    let dx = (mid.x - p1.x).abs();
    let dy = (mid.y - p1.y).abs();
    let (hi, lo) = if dx > dy { (dx, dy) } else { (dy, dx) };
    FX::from_f64(hi + 0.5 * lo)
}

/// Number of recursive midpoint-halvings to apply before treating the
/// result as flat enough, derived from `near_distance`.
///
/// `min(ceil(log2(ceil(distance))) / 2 + 1, DIVIDED_MAX)`. A dead-straight
/// curve (`distance == 0`) still gets depth 1 so `make_line` always emits
/// at least two points.
pub fn divide_line_count(p0: FPoint, p1: FPoint, p2: FPoint) -> u32 {
    let dist = near_distance(p0, p1, p2).to_f64().max(0.0);
    let ceil_dist = dist.ceil().max(1.0);
    let log2 = ceil_dist.log2().ceil().max(0.0);
    let n = (log2 as u32) / 2 + 1;
    n.min(DIVIDED_MAX)
}

/// De Casteljau split of the quadratic `[p0, p1, p2]` at parameter `t`,
/// returning `[P0, L, M, R, P2]` where `L = lerp(P0,P1,t)`, `R =
/// lerp(P1,P2,t)`, `M = lerp(L,R,t)`.
pub fn chop_at(points: [FPoint; 3], t: f64) -> [FPoint; 5] {
    let [p0, p1, p2] = points;
    let l = lerp(p0, p1, t);
    let r = lerp(p1, p2, t);
    let m = lerp(l, r, t);
    [p0, l, m, r, p2]
}

/// `chop_at(points, 0.5)`, specialized to use plain averages — faster and
/// exact (no multiply by `0.5` twice through an intermediate lerp).
pub fn chop_at_half(points: [FPoint; 3]) -> [FPoint; 5] {
    let [p0, p1, p2] = points;
    let l = midpoint(p0, p1);
    let r = midpoint(p1, p2);
    let m = midpoint(l, r);
    [p0, l, m, r, p2]
}

/// Splits the quadratic at its point of maximum curvature, if that point
/// lies strictly inside the curve's parameter range and isn't numerically
/// degenerate. Returns `([sub0, sub1], 2)` on a successful split, or
/// `([points, _], 1)` with the second slot unused otherwise.
pub fn chop_at_max_curvature(points: [FPoint; 3]) -> ([[FPoint; 3]; 2], usize) {
    let [p0, p1, p2] = points;
    let x0 = p1.x - p0.x;
    let y0 = p1.y - p0.y;
    let x1 = p0.x - 2.0 * p1.x + p2.x;
    let y1 = p0.y - 2.0 * p1.y + p2.y;

    let mut numerator = -(x0 * x1 + y0 * y1);
    let mut denominator = x1 * x1 + y1 * y1;

    if numerator < 0.0 {
        numerator = -numerator;
        denominator = -denominator;
    }

    let degenerate = denominator == 0.0 || numerator == 0.0;
    if !degenerate {
        let t = numerator / denominator;
        if t.is_finite() && t > 0.0 && t < 1.0 {
            let out = chop_at(points, t);
            return ([[out[0], out[1], out[2]], [out[2], out[3], out[4]]], 2);
        }
    }

    ([points, points], 1)
}

/// Flattens the quadratic `[p0, p1, p2]` into a polyline, passing each
/// output point (excluding the curve's own start point, which the caller
/// already holds as its current point) to `emit` in increasing-parameter
/// order. Always emits at least one point, the last of which is exactly
/// `p2`.
pub fn make_line(points: [FPoint; 3], emit: &mut dyn FnMut(FPoint)) {
    let depth = divide_line_count(points[0], points[1], points[2]);
    subdivide(points, depth, emit);
}

fn subdivide(points: [FPoint; 3], depth: u32, emit: &mut dyn FnMut(FPoint)) {
    if depth == 0 {
        emit(points[2]);
        return;
    }
    let out = chop_at_half(points);
    subdivide([out[0], out[1], out[2]], depth - 1, emit);
    subdivide([out[2], out[3], out[4]], depth - 1, emit);
}
