//! Binary min-heap operations over a plain vector, ordered by a
//! comparator.

use std::cmp::Ordering;

/// Establishes the heap invariant over the whole slice in O(n).
pub(crate) fn init_by<T, F>(heap: &mut [T], compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    let n = heap.len();

    for i in (0..n / 2).rev() {
        sift_down(heap, i, n, compare);
    }
}

/// Removes and returns the minimum of the heap in O(log n).
pub(crate) fn pop_by<T, F>(heap: &mut Vec<T>, compare: &F) -> Option<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let last = heap.len().checked_sub(1)?;
    heap.swap(0, last);
    sift_down(heap, 0, last, compare);
    heap.pop()
}

/// Moves the element at `i` down the first `n` elements until both
/// its children are greater or equal. Ties pick the left child.
fn sift_down<T, F>(heap: &mut [T], mut i: usize, n: usize, compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    loop {
        let left = 2 * i + 1;
        if left >= n {
            break;
        }

        let mut child = left;
        let right = left + 1;
        if right < n && compare(&heap[right], &heap[left]).is_lt() {
            child = right;
        }

        if compare(&heap[child], &heap[i]).is_ge() {
            break;
        }

        heap.swap(i, child);
        i = child;
    }
}
