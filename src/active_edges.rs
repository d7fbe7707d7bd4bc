//! Active-edge list maintenance: per-scanline append, sort, and eviction.
//!
//! The active list is a singly-linked chain through `Edge::next`, sorted
//! by `(x, slope)` ascending whenever the driver can assume it's already
//! sorted. Two insertion strategies are offered because keeping the list
//! sorted incrementally (`edges_sorted_append`) is cheaper than a full
//! re-sort, but only valid when the previous scanline's advance
//! (`scanning_next`) reported the order was preserved.

use crate::edge::EdgePool;

#[inline]
fn less(pool: &EdgePool, a: u16, b: u16) -> bool {
    let ea = pool.get(a);
    let eb = pool.get(b);
    if ea.x != eb.x {
        ea.x < eb.x
    } else {
        ea.slope < eb.slope
    }
}

/// Splice the edges threaded from `bucket_head` into the already-sorted
/// active list headed by `active_head`, preserving `(x, slope)` order.
/// Each bucket edge is inserted independently via an insertion-sort step,
/// since the bucket itself is unsorted (edges are prepended to it in
/// reverse build order).
pub fn edges_sorted_append(pool: &mut EdgePool, active_head: u16, bucket_head: u16) -> u16 {
    let mut head = active_head;
    let mut cur = bucket_head;
    while cur != 0 {
        let next_in_bucket = pool.get(cur).next;
        head = insert_sorted(pool, head, cur);
        cur = next_in_bucket;
    }
    head
}

fn insert_sorted(pool: &mut EdgePool, head: u16, edge_idx: u16) -> u16 {
    if head == 0 || less(pool, edge_idx, head) {
        pool.get_mut(edge_idx).next = head;
        return edge_idx;
    }
    let mut prev = head;
    loop {
        let next = pool.get(prev).next;
        if next == 0 || less(pool, edge_idx, next) {
            pool.get_mut(edge_idx).next = next;
            pool.get_mut(prev).next = edge_idx;
            return head;
        }
        prev = next;
    }
}

/// Prepend the bucket's edges onto the active list without regard for
/// order; a subsequent `edges_sort` call is required to restore it. Used
/// when the previous scanline's advance left the list unsorted.
pub fn edges_append(pool: &mut EdgePool, active_head: u16, bucket_head: u16) -> u16 {
    if bucket_head == 0 {
        return active_head;
    }
    let mut tail = bucket_head;
    loop {
        let next = pool.get(tail).next;
        if next == 0 {
            break;
        }
        tail = next;
    }
    pool.get_mut(tail).next = active_head;
    bucket_head
}

/// Bubble-sorts the active list by `(x, slope)` ascending. The list is
/// usually short, so the `O(k^2)` cost of repeated adjacent-swap passes
/// over the linked list is preferred over collecting into a heap-allocated
/// buffer just to sort it.
pub fn edges_sort(pool: &mut EdgePool, head: u16) -> u16 {
    if head == 0 {
        return head;
    }
    let mut head = head;
    let mut swapped = true;
    while swapped {
        swapped = false;
        let mut prev: u16 = 0;
        let mut cur = head;
        while pool.get(cur).next != 0 {
            let nxt = pool.get(cur).next;
            if less(pool, nxt, cur) {
                let after = pool.get(nxt).next;
                pool.get_mut(cur).next = after;
                pool.get_mut(nxt).next = cur;
                if prev == 0 {
                    head = nxt;
                } else {
                    pool.get_mut(prev).next = nxt;
                }
                prev = nxt;
                swapped = true;
            } else {
                prev = cur;
                cur = nxt;
            }
        }
    }
    head
}

/// Advances every active edge past scanline `y`: evicts edges whose
/// `y_bottom` has been passed, and steps the rest's `x` by `slope`,
/// clearing `is_top`. Skips the eviction check entirely when `y` is the
/// raster's last scanline, since the active list is discarded right after
/// — a pure optimization, never required for correctness.
///
/// Returns the new active head and whether the x-sequence is still
/// monotone non-decreasing (letting the caller skip a resort next time).
pub fn scanning_next(pool: &mut EdgePool, head: u16, y: i32, last_scanline: i32) -> (u16, bool) {
    let is_last = y >= last_scanline;
    let mut new_head: u16 = 0;
    let mut tail: u16 = 0;
    let mut order = true;
    let mut prev_x = None;

    let mut cur = head;
    while cur != 0 {
        let next = pool.get(cur).next;
        let evict = !is_last && y >= pool.get(cur).y_bottom + 1;
        if !evict {
            {
                let e = pool.get_mut(cur);
                e.x += e.slope;
                e.is_top = false;
            }
            let x = pool.get(cur).x;
            if let Some(px) = prev_x {
                if x < px {
                    order = false;
                }
            }
            prev_x = Some(x);

            pool.get_mut(cur).next = 0;
            if new_head == 0 {
                new_head = cur;
            } else {
                pool.get_mut(tail).next = cur;
            }
            tail = cur;
        }
        cur = next;
    }

    (new_head, order)
}
