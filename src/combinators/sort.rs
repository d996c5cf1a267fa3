//! Lazy heap sort.

use std::{cmp::Ordering, ops::ControlFlow};

use log::debug;

use crate::Seq;

use super::heap;

/// See [`Seq::sorted`] and [`Seq::sorted_by`].
///
/// Each traversal materializes the whole underlying sequence and
/// heapifies it, then pops the minimum on every step. A consumer
/// stopping after k values pays O(n + k log n) instead of a full
/// sort.
#[derive(Clone, Debug)]
pub struct Sorted<S, F> {
    seq: S,
    compare: F,
}

impl<S, F> Sorted<S, F> {
    pub fn new(seq: S, compare: F) -> Self {
        Self { seq, compare }
    }
}

impl<S, F> Seq for Sorted<S, F>
where
    S: Seq,
    F: Fn(&S::Item, &S::Item) -> Ordering,
{
    type Item = S::Item;

    fn each<G>(&self, mut f: G) -> ControlFlow<()>
    where
        G: FnMut(S::Item) -> ControlFlow<()>,
    {
        let mut values = self.seq.collect();

        debug!("heapify {} values to sort", values.len());
        heap::init_by(&mut values, &self.compare);

        while let Some(value) = heap::pop_by(&mut values, &self.compare) {
            f(value)?;
        }

        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{iter, Seq};

    #[test]
    fn sorted() {
        let _ = env_logger::try_init();

        let values = iter([3, 2, 5, 1, 7, 7, 8, 2]).sorted().collect();
        assert_eq!(values, vec![1, 2, 2, 3, 5, 7, 7, 8]);
    }

    #[test]
    fn sorted_by() {
        let _ = env_logger::try_init();

        let values = iter([3, 2, 5, 1, 7, 7, 8, 2])
            .sorted_by(|a: &i32, b: &i32| b.cmp(a))
            .collect();
        assert_eq!(values, vec![8, 7, 7, 5, 3, 2, 2, 1]);
    }

    #[test]
    fn sorted_prefix() {
        let _ = env_logger::try_init();

        let values = iter(["pear", "fig", "apple", "kiwi"]).sorted().limit(2).collect();
        assert_eq!(values, vec!["apple", "fig"]);
    }

    proptest! {
        #[test]
        fn sorted_is_ordered_permutation(values in prop::collection::vec(any::<i16>(), 0..64)) {
            let mut expected = values.clone();
            expected.sort();

            let sorted = iter(values).sorted();

            prop_assert!(sorted.is_sorted());
            prop_assert_eq!(sorted.collect(), expected);
        }
    }
}
