//! Ordered two-way merge.

use std::{cmp::Ordering, ops::ControlFlow, thread};

use log::trace;

use crate::{coroutines::Pull, Seq};

/// See [`Seq::merge`] and [`Seq::merge_by`].
///
/// Both sequences must already be sorted by the comparator: the
/// merge only interleaves them. Values comparing equal are yielded
/// first from the first sequence, then from the second one.
#[derive(Clone, Debug)]
pub struct Merge<A, B, F> {
    first: A,
    second: B,
    compare: F,
}

impl<A, B, F> Merge<A, B, F> {
    pub fn new(first: A, second: B, compare: F) -> Self {
        Self {
            first,
            second,
            compare,
        }
    }
}

impl<A, B, F> Seq for Merge<A, B, F>
where
    A: Seq + Sync,
    B: Seq<Item = A::Item> + Sync,
    A::Item: Send,
    F: Fn(&A::Item, &A::Item) -> Ordering,
{
    type Item = A::Item;

    fn each<G>(&self, mut f: G) -> ControlFlow<()>
    where
        G: FnMut(A::Item) -> ControlFlow<()>,
    {
        thread::scope(|scope| -> ControlFlow<()> {
            let mut first = Pull::scoped(scope, &self.first);
            let mut second = Pull::scoped(scope, &self.second);

            let mut a = first.next();
            let mut b = second.next();

            loop {
                match (a.take(), b.take()) {
                    (None, None) => break ControlFlow::Continue(()),
                    (Some(x), None) => {
                        trace!("second sequence exhausted, drain the first one");
                        f(x)?;
                        break drain(first, f);
                    }
                    (None, Some(y)) => {
                        trace!("first sequence exhausted, drain the second one");
                        f(y)?;
                        break drain(second, f);
                    }
                    (Some(x), Some(y)) => match (self.compare)(&x, &y) {
                        Ordering::Less => {
                            f(x)?;
                            a = first.next();
                            b = Some(y);
                        }
                        Ordering::Greater => {
                            f(y)?;
                            a = Some(x);
                            b = second.next();
                        }
                        Ordering::Equal => {
                            f(x)?;
                            f(y)?;
                            a = first.next();
                            b = second.next();
                        }
                    },
                }
            }
        })
    }
}

fn drain<T, G>(pull: Pull<'_, T>, mut f: G) -> ControlFlow<()>
where
    G: FnMut(T) -> ControlFlow<()>,
{
    for value in pull {
        f(value)?;
    }

    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{empty, iter, Seq};

    #[test]
    fn merge() {
        let _ = env_logger::try_init();

        let values = iter([2, 3, 5]).merge(iter([1, 2, 3, 4, 5])).collect();
        assert_eq!(values, vec![1, 2, 2, 3, 3, 4, 5, 5]);
    }

    #[test]
    fn merge_with_empty() {
        let _ = env_logger::try_init();

        assert_eq!(empty().merge(iter([1, 2])).collect(), vec![1, 2]);
        assert_eq!(iter([1, 2]).merge(empty()).collect(), vec![1, 2]);
        assert_eq!(empty::<u8>().merge(empty()).collect(), Vec::<u8>::new());
    }

    #[test]
    fn merge_equal_keys_first_side_first() {
        let _ = env_logger::try_init();

        let first = iter([(1, 'a'), (2, 'a')]);
        let second = iter([(1, 'b'), (2, 'b')]);

        let values = first.merge_by(second, |x, y| x.0.cmp(&y.0)).collect();
        assert_eq!(values, vec![(1, 'a'), (1, 'b'), (2, 'a'), (2, 'b')]);
    }

    #[test]
    fn merge_infinite_stops_early() {
        let _ = env_logger::try_init();

        let evens = iter((0..).step_by(2));
        let odds = iter((1..).step_by(2));

        assert_eq!(evens.merge(odds).limit(5).collect(), vec![0, 1, 2, 3, 4]);
    }

    /// Sorts by splitting in halves and merging them back.
    fn merge_sort(values: &[u8]) -> Vec<u8> {
        if values.len() <= 1 {
            return values.to_vec();
        }

        let (left, right) = values.split_at(values.len() / 2);
        iter(merge_sort(left)).merge(iter(merge_sort(right))).collect()
    }

    #[test]
    fn merge_sort_bytes() {
        let _ = env_logger::try_init();

        let sorted = merge_sort(b"The quick brown fox jumped over the lazy dog.");

        let mut expected = b"The quick brown fox jumped over the lazy dog.".to_vec();
        expected.sort();

        assert_eq!(sorted, expected);
    }

    proptest! {
        #[test]
        fn merge_is_sorted_union(
            a in prop::collection::vec(any::<i32>(), 0..32),
            b in prop::collection::vec(any::<i32>(), 0..32),
        ) {
            let (mut a, mut b) = (a, b);
            a.sort();
            b.sort();

            let mut expected = [a.clone(), b.clone()].concat();
            expected.sort();

            let merged = iter(a).merge(iter(b));

            prop_assert!(merged.is_sorted());
            prop_assert_eq!(merged.collect(), expected);
        }
    }
}
