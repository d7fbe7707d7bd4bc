//! The scan driver and public `Raster` instance: ties the edge builder,
//! active-edge maintenance, and fill-rule evaluators together into the
//! `init` / `done` / `done_high` / `exit` surface described for the core.

use crate::active_edges::{edges_append, edges_sort, edges_sorted_append, scanning_next};
use crate::edge::{Edge, EdgePool};
use crate::edge_builder::{self, YRange};
use crate::edge_table::EdgeTable;
use crate::error::{RasterError, RasterResult};
use crate::fill_rule::{sweep_concave, sweep_convex, ConvexOutcome, SpanEmit};
use crate::fixed::FX;
use crate::polygon::{Bounds, FillRule, Polygon};

/// A single-threaded, non-reentrant rasterizer instance. All operations on
/// a given instance must be serialized by the caller; distinct instances
/// share no state and may run in parallel.
///
/// The edge pool and edge table are grown lazily and retained across
/// calls to `done`/`done_high` — they're reset, not freed, at the start of
/// each run. Call `exit` to release the backing allocations.
pub struct Raster {
    pool: EdgePool,
    table: EdgeTable,
}

impl Raster {
    /// `init()`.
    pub fn new() -> Self {
        Self {
            pool: EdgePool::new(),
            table: EdgeTable::new(),
        }
    }

    /// Standard raster: rasterizes `polygon` within `bounds` under `rule`,
    /// calling `emit` for every output span.
    ///
    /// Returns `Ok(())` for a degenerate input (empty bounds/polygon — no
    /// spans, not an error) as well as for a normal successful run. Errors
    /// abort the run cleanly; `self` remains valid for a subsequent call.
    pub fn done(
        &mut self,
        polygon: &Polygon,
        bounds: &Bounds,
        rule: FillRule,
        emit: &mut SpanEmit<'_>,
    ) -> RasterResult<()> {
        polygon.validate()?;
        let range = match edge_builder::build(&mut self.pool, &mut self.table, polygon, bounds)? {
            Some(r) => r,
            None => return Ok(()),
        };
        self.scan(polygon.convex, rule, range, emit);
        Ok(())
    }

    /// High-precision variant: y coordinates are reported to the callback
    /// as `FX` rather than integers. Only concave polygons are supported —
    /// the convex rectangular fast path has no sub-scanline counterpart.
    pub fn done_high(
        &mut self,
        polygon: &Polygon,
        bounds: &Bounds,
        rule: FillRule,
        emit: &mut dyn FnMut(FX, FX, &Edge, &Edge),
    ) -> RasterResult<()> {
        if polygon.convex {
            return Err(RasterError::InvalidArgument);
        }
        polygon.validate()?;
        let range = match edge_builder::build(&mut self.pool, &mut self.table, polygon, bounds)? {
            Some(r) => r,
            None => return Ok(()),
        };

        let mut y = range.top;
        let bottom = range.bottom;
        let last_scanline = bottom - 1;
        let mut active_head: u16 = 0;
        let mut order = true;

        while y < bottom {
            active_head = self.splice_bucket(y, active_head, &mut order);

            sweep_concave(&self.pool, active_head, y, rule, &mut |ys, ye, l, r| {
                emit(FX::from_i32(ys), FX::from_i32(ye), l, r);
            });

            let (new_head, new_order) = scanning_next(&mut self.pool, active_head, y, last_scanline);
            active_head = new_head;
            order = new_order;
            y += 1;
        }

        Ok(())
    }

    /// Releases the edge pool and edge table allocations. `self` is
    /// consumed; there is nothing left to reuse afterward.
    pub fn exit(self) {
        drop(self);
    }

    fn scan(&mut self, convex: bool, rule: FillRule, range: YRange, emit: &mut SpanEmit<'_>) {
        let mut y = range.top;
        let bottom = range.bottom;
        let last_scanline = bottom - 1;
        let mut active_head: u16 = 0;
        let mut order = true;

        while y < bottom {
            active_head = self.splice_bucket(y, active_head, &mut order);

            if convex {
                match sweep_convex(&mut self.pool, &mut self.table, active_head, y, emit) {
                    ConvexOutcome::None => {
                        y += 1;
                    }
                    ConvexOutcome::Span => {
                        let (new_head, new_order) =
                            scanning_next(&mut self.pool, active_head, y, last_scanline);
                        active_head = new_head;
                        order = new_order;
                        y += 1;
                    }
                    ConvexOutcome::Rect { y_resume } => {
                        active_head = 0;
                        order = true;
                        y = y_resume;
                    }
                }
            } else {
                sweep_concave(&self.pool, active_head, y, rule, emit);
                let (new_head, new_order) =
                    scanning_next(&mut self.pool, active_head, y, last_scanline);
                active_head = new_head;
                order = new_order;
                y += 1;
            }
        }
    }

    /// Splices scanline `y`'s edge-table bucket into the active list,
    /// taking the cheap sorted-insert path when the previous `scanning_next`
    /// reported the list was still ordered, and falling back to
    /// append-then-bubble-sort otherwise.
    fn splice_bucket(&mut self, y: i32, active_head: u16, order: &mut bool) -> u16 {
        let bucket = self.table.take_bucket(y);
        if *order {
            edges_sorted_append(&mut self.pool, active_head, bucket)
        } else {
            let head = edges_append(&mut self.pool, active_head, bucket);
            let head = edges_sort(&mut self.pool, head);
            *order = true;
            head
        }
    }
}

impl Default for Raster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::FPoint;

    fn pt(x: f64, y: f64) -> FPoint {
        FPoint::new(x, y)
    }

    fn collect_spans(
        raster: &mut Raster,
        poly: &Polygon,
        bounds: &Bounds,
        rule: FillRule,
    ) -> Vec<(i32, i32, f64, f64)> {
        let mut spans = Vec::new();
        raster
            .done(poly, bounds, rule, &mut |ys, ye, l, r| {
                spans.push((ys, ye, l.x.to_f64(), r.x.to_f64()));
            })
            .unwrap();
        spans
    }

    #[test]
    fn rectangle_concave_odd_emits_five_unit_spans() {
        let poly = Polygon::single_contour(
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0), pt(0.0, 5.0)],
            false,
        );
        let bounds = Bounds::new(0.0, 0.0, 10.0, 5.0);
        let mut raster = Raster::new();
        let spans = collect_spans(&mut raster, &poly, &bounds, FillRule::Odd);
        assert_eq!(spans.len(), 5);
        for (i, s) in spans.iter().enumerate() {
            assert_eq!(*s, (i as i32, i as i32 + 1, 0.0, 10.0));
        }
    }

    #[test]
    fn rectangle_convex_emits_one_rectangular_span() {
        let poly = Polygon::single_contour(
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0), pt(0.0, 5.0)],
            true,
        );
        let bounds = Bounds::new(0.0, 0.0, 10.0, 5.0);
        let mut raster = Raster::new();
        let spans = collect_spans(&mut raster, &poly, &bounds, FillRule::Odd);
        assert_eq!(spans, vec![(0, 5, 0.0, 10.0)]);
    }

    #[test]
    fn unit_triangle_left_edge_vertical_right_edge_steps() {
        let poly = Polygon::single_contour(vec![pt(0.0, 0.0), pt(4.0, 4.0), pt(0.0, 4.0)], true);
        let bounds = Bounds::new(0.0, 0.0, 4.0, 4.0);
        let mut raster = Raster::new();
        let spans = collect_spans(&mut raster, &poly, &bounds, FillRule::Odd);
        assert_eq!(spans, vec![(0, 1, 0.0, 0.0), (1, 2, 0.0, 1.0), (2, 3, 0.0, 2.0), (3, 4, 0.0, 3.0)]);
    }

    #[test]
    fn convex_and_concave_agree_under_nonzero_rule() {
        let pts = vec![pt(0.0, 0.0), pt(4.0, 4.0), pt(0.0, 4.0)];
        let bounds = Bounds::new(0.0, 0.0, 4.0, 4.0);

        let convex_poly = Polygon::single_contour(pts.clone(), true);
        let concave_poly = Polygon::single_contour(pts, false);

        let mut raster = Raster::new();
        let convex_spans = collect_spans(&mut raster, &convex_poly, &bounds, FillRule::NonZero);
        let concave_spans = collect_spans(&mut raster, &concave_poly, &bounds, FillRule::NonZero);
        assert_eq!(convex_spans, concave_spans);
    }

    #[test]
    fn bowtie_pairwise_winding_pinches_at_the_crossing_vertices() {
        // Self-intersecting "bowtie": (0,0)-(4,4)-(4,0)-(0,4). The two
        // diagonals cross with opposite orientation, so the running winding
        // at every scanline only ever takes values in {-1, 0, 1} — odd-even
        // and non-zero agree here (this shape never reaches winding 2; see
        // `overlapping_same_orientation_squares_diverge_between_odd_and_nonzero`
        // below for a shape where the two rules do diverge). What this test
        // pins down is the pairwise-winding walk and conjoint coalescing:
        // the tip of each lobe collapses to a zero-width span, and at y=2
        // the two lobes meet exactly at x=2 and must coalesce into one span.
        let poly = Polygon::single_contour(
            vec![pt(0.0, 0.0), pt(4.0, 4.0), pt(4.0, 0.0), pt(0.0, 4.0)],
            false,
        );
        let bounds = Bounds::new(0.0, 0.0, 4.0, 4.0);
        let mut raster = Raster::new();
        let odd = collect_spans(&mut raster, &poly, &bounds, FillRule::Odd);
        let nonzero = collect_spans(&mut raster, &poly, &bounds, FillRule::NonZero);

        let expected = vec![
            (0, 1, 0.0, 0.0),
            (0, 1, 4.0, 4.0),
            (1, 2, 0.0, 1.0),
            (1, 2, 3.0, 4.0),
            (2, 3, 0.0, 4.0),
            (3, 4, 0.0, 1.0),
            (3, 4, 3.0, 4.0),
        ];
        assert_eq!(odd, expected);
        assert_eq!(nonzero, expected);
    }

    #[test]
    fn overlapping_same_orientation_squares_diverge_between_odd_and_nonzero() {
        // Two same-orientation squares overlapping in x in [3,6): at the
        // overlap the running winding reaches -2, which is even (odd-even:
        // outside) but non-zero (non-zero: inside) — the inversion spec.md
        // describes for self-overlapping geometry, made unambiguous by
        // construction instead of relying on the bowtie's cancelling case.
        let square_a = vec![pt(0.0, 0.0), pt(6.0, 0.0), pt(6.0, 6.0), pt(0.0, 6.0)];
        let square_b = vec![pt(3.0, 0.0), pt(9.0, 0.0), pt(9.0, 6.0), pt(3.0, 6.0)];
        let mut points = square_a;
        points.extend(square_b);
        let poly = Polygon::new(points, vec![4, 4], false);
        let bounds = Bounds::new(0.0, 0.0, 9.0, 6.0);
        let mut raster = Raster::new();

        let odd = collect_spans(&mut raster, &poly, &bounds, FillRule::Odd);
        let nonzero = collect_spans(&mut raster, &poly, &bounds, FillRule::NonZero);

        let odd_at_2: Vec<_> = odd.iter().filter(|s| s.0 == 2).cloned().collect();
        let nonzero_at_2: Vec<_> = nonzero.iter().filter(|s| s.0 == 2).cloned().collect();

        // Odd-even treats the doubly-covered middle as outside: two spans.
        assert_eq!(odd_at_2, vec![(2, 3, 0.0, 3.0), (2, 3, 6.0, 9.0)]);
        // Non-zero treats it as inside: one span spanning the whole width,
        // coalesced across the shared boundary at x=3 and x=6.
        assert_eq!(nonzero_at_2, vec![(2, 3, 0.0, 9.0)]);
    }

    #[test]
    fn annulus_nonzero_has_two_spans_through_the_hole() {
        let outer = vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)];
        let inner = vec![pt(2.0, 2.0), pt(2.0, 8.0), pt(8.0, 8.0), pt(8.0, 2.0)];
        let mut points = outer;
        points.extend(inner);
        let poly = Polygon::new(points, vec![4, 4], false);
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let mut raster = Raster::new();
        let spans = collect_spans(&mut raster, &poly, &bounds, FillRule::NonZero);

        // Through the hole (inner contour active on scanlines 2..7): the
        // span splits into the strip left of the hole and the strip right
        // of it, matching the inner square's [2,8) extent exactly.
        let mid: Vec<_> = spans.iter().filter(|s| s.0 == 4).cloned().collect();
        assert_eq!(mid, vec![(4, 5, 0.0, 2.0), (4, 5, 8.0, 10.0)]);

        // Above/below the hole (inner contour not yet/no longer active):
        // one unbroken span across the full outer width.
        let above: Vec<_> = spans.iter().filter(|s| s.0 == 1).cloned().collect();
        assert_eq!(above, vec![(1, 2, 0.0, 10.0)]);
        let below: Vec<_> = spans.iter().filter(|s| s.0 == 8).cloned().collect();
        assert_eq!(below, vec![(8, 9, 0.0, 10.0)]);
    }

    #[test]
    fn degenerate_zero_height_bounds_emits_nothing() {
        let poly = Polygon::single_contour(vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)], false);
        let bounds = Bounds::new(0.0, 0.0, 1.0, 0.0);
        let mut raster = Raster::new();
        let spans = collect_spans(&mut raster, &poly, &bounds, FillRule::Odd);
        assert!(spans.is_empty());
    }

    #[test]
    fn reentry_after_error_leaves_instance_usable() {
        let n = 70_000;
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            points.push(pt(i as f64, (i % 2) as f64));
        }
        let bad_poly = Polygon::single_contour(points, false);
        let bad_bounds = Bounds::new(0.0, 0.0, n as f64, 2.0);

        let mut raster = Raster::new();
        let err = raster
            .done(&bad_poly, &bad_bounds, FillRule::Odd, &mut |_, _, _, _| {})
            .unwrap_err();
        assert_eq!(err, RasterError::TooManyEdges);

        let good_poly = Polygon::single_contour(
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0), pt(0.0, 5.0)],
            false,
        );
        let good_bounds = Bounds::new(0.0, 0.0, 10.0, 5.0);
        let spans = collect_spans(&mut raster, &good_poly, &good_bounds, FillRule::Odd);
        assert_eq!(spans.len(), 5);
    }

    #[test]
    fn done_high_reports_fx_scanline_bounds() {
        let poly = Polygon::single_contour(
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0), pt(0.0, 5.0)],
            false,
        );
        let bounds = Bounds::new(0.0, 0.0, 10.0, 5.0);
        let mut raster = Raster::new();
        let mut spans = Vec::new();
        raster
            .done_high(&poly, &bounds, FillRule::Odd, &mut |ys, ye, l, r| {
                spans.push((ys, ye, l.x.to_f64(), r.x.to_f64()));
            })
            .unwrap();
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].0, FX::from_i32(0));
        assert_eq!(spans[0].1, FX::from_i32(1));
    }

    #[test]
    fn done_high_rejects_convex_polygons() {
        let poly = Polygon::single_contour(vec![pt(0.0, 0.0), pt(4.0, 4.0), pt(0.0, 4.0)], true);
        let bounds = Bounds::new(0.0, 0.0, 4.0, 4.0);
        let mut raster = Raster::new();
        let err = raster
            .done_high(&poly, &bounds, FillRule::Odd, &mut |_, _, _, _| {})
            .unwrap_err();
        assert_eq!(err, RasterError::InvalidArgument);
    }
}
