//! The sequence contract shared by every producer, transformer and
//! consumer of this crate.
//!
//! A [`Seq`] pushes its values into a callback, one at a time, until
//! it runs out of values or until the callback asks it to stop by
//! returning [`ControlFlow::Break`].

use std::{
    cmp::Ordering,
    fmt,
    hash::Hash,
    marker::PhantomData,
    ops::{Add, ControlFlow},
    thread,
};

use crate::{
    combinators::{
        merge::Merge,
        memo::{Cache, Dedup, Uniq},
        sort::Sorted,
        split::Split,
        transform::{Chain, Enumerate, Filter, FilterMap, Limit, Map, Or, Pairs, Skip, Tuples},
        windows::{Chunks, ChunksBy, ChunksError, Windows, WindowsError},
        zip::{Zip, ZipThreaded},
    },
    coroutines::pull::Pull,
    pair::Pair,
};

/// Comparator used by the ordering combinators when the items are
/// compared with their [`Ord`] implementation.
pub type CmpFn<T> = fn(&T, &T) -> Ordering;

/// Equality used by [`Seq::uniq`].
pub type EqFn<T> = fn(&T, &T) -> bool;

/// A lazy, push-style producer of values.
///
/// Calling [`Seq::each`] runs the producer: the callback is invoked
/// once per value, in production order. As soon as the callback
/// returns [`ControlFlow::Break`], the producer stops without calling
/// it again and `each` returns `Break` as well. When the producer
/// runs out of values, `each` returns [`ControlFlow::Continue`].
///
/// Sequences take `&self`: invoking `each` again replays the
/// sequence from the start, unless the sequence documents otherwise
/// (see [`Seq::cache`]).
pub trait Seq {
    /// The type of the produced values.
    type Item;

    /// Pushes every value of the sequence into `f`, until `f` breaks.
    fn each<F>(&self, f: F) -> ControlFlow<()>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>;

    /// Transforms every value with `f`.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> U,
    {
        Map::new(self, f)
    }

    /// Keeps only the values matching the predicate `f`.
    fn filter<F>(self, f: F) -> Filter<Self, F>
    where
        Self: Sized,
        F: Fn(&Self::Item) -> bool,
    {
        Filter::new(self, f)
    }

    /// Transforms every value with `f`, dropping the `None` results.
    fn filter_map<U, F>(self, f: F) -> FilterMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> Option<U>,
    {
        FilterMap::new(self, f)
    }

    /// Yields at most `n` values.
    fn limit(self, n: usize) -> Limit<Self>
    where
        Self: Sized,
    {
        Limit::new(self, n)
    }

    /// Skips the first `n` values.
    fn skip(self, n: usize) -> Skip<Self>
    where
        Self: Sized,
    {
        Skip::new(self, n)
    }

    /// Yields the values of `self`, then the values of `other`.
    fn chain<S>(self, other: S) -> Chain<Self, S>
    where
        Self: Sized,
        S: Seq<Item = Self::Item>,
    {
        Chain::new(self, other)
    }

    /// Yields the values of `self` if it produces at least one,
    /// otherwise the values of `other`.
    fn or<S>(self, other: S) -> Or<Self, S>
    where
        Self: Sized,
        S: Seq<Item = Self::Item>,
    {
        Or::new(self, other)
    }

    /// Pairs every value with its index.
    fn enumerate(self) -> Enumerate<Self>
    where
        Self: Sized,
    {
        Enumerate::new(self)
    }

    /// Turns a two-value sequence into a sequence of [`Pair`]s.
    fn pairs<A, B>(self) -> Pairs<Self>
    where
        Self: Sized + Seq<Item = (A, B)>,
    {
        Pairs::new(self)
    }

    /// Turns a sequence of [`Pair`]s back into a two-value sequence.
    fn tuples<A, B>(self) -> Tuples<Self>
    where
        Self: Sized + Seq<Item = Pair<A, B>>,
    {
        Tuples::new(self)
    }

    /// Routes every value either left (predicate matches) or right.
    fn split<F>(self, f: F) -> Split<Self, F>
    where
        Self: Sized,
        F: Fn(&Self::Item) -> bool,
    {
        Split::new(self, f)
    }

    /// Interleaves two sequences already sorted by their natural
    /// order into one sorted sequence.
    fn merge<S>(self, other: S) -> Merge<Self, S, CmpFn<Self::Item>>
    where
        Self: Sized,
        S: Seq<Item = Self::Item>,
        Self::Item: Ord,
    {
        Merge::new(self, other, <Self::Item as Ord>::cmp as CmpFn<Self::Item>)
    }

    /// Interleaves two sequences already sorted by `compare` into one
    /// sorted sequence.
    fn merge_by<S, F>(self, other: S, compare: F) -> Merge<Self, S, F>
    where
        Self: Sized,
        S: Seq<Item = Self::Item>,
        F: Fn(&Self::Item, &Self::Item) -> Ordering,
    {
        Merge::new(self, other, compare)
    }

    /// Yields the values in their natural order.
    fn sorted(self) -> Sorted<Self, CmpFn<Self::Item>>
    where
        Self: Sized,
        Self::Item: Ord,
    {
        Sorted::new(self, <Self::Item as Ord>::cmp as CmpFn<Self::Item>)
    }

    /// Yields the values ordered by `compare`.
    fn sorted_by<F>(self, compare: F) -> Sorted<Self, F>
    where
        Self: Sized,
        F: Fn(&Self::Item, &Self::Item) -> Ordering,
    {
        Sorted::new(self, compare)
    }

    /// Slides a window of `size` values over the sequence.
    fn windows(self, size: usize) -> Result<Windows<Self>, WindowsError>
    where
        Self: Sized,
    {
        Windows::new(self, size)
    }

    /// Groups the values into disjoint chunks of `size` values.
    fn chunks(self, size: usize) -> Result<Chunks<Self>, ChunksError>
    where
        Self: Sized,
    {
        Chunks::new(self, size)
    }

    /// Groups consecutive values sharing the same key.
    fn chunks_by<K, F>(self, key: F) -> ChunksBy<Self, F>
    where
        Self: Sized,
        K: PartialEq,
        F: Fn(&Self::Item) -> K,
    {
        ChunksBy::new(self, key)
    }

    /// Walks `self` and `other` in lockstep, until both are
    /// exhausted.
    fn zip<S>(self, other: S) -> Zip<Self, S>
    where
        Self: Sized,
        S: Seq,
    {
        Zip::new(self, other)
    }

    /// Same as [`Seq::zip`], but each side is driven by its own
    /// worker thread.
    fn zip_threaded<S>(self, other: S) -> ZipThreaded<Self, S>
    where
        Self: Sized + Send + Sync + 'static,
        Self::Item: Send + 'static,
        S: Seq + Send + Sync + 'static,
        S::Item: Send + 'static,
    {
        ZipThreaded::new(self, other)
    }

    /// Records the values on first demand and replays them
    /// afterwards, so the underlying sequence runs at most once.
    fn cache(self) -> Cache<Self>
    where
        Self: Sized + Send + 'static,
        Self::Item: Clone + Send + 'static,
    {
        Cache::new(self)
    }

    /// Yields only the first occurrence of every value.
    fn dedup(self) -> Dedup<Self>
    where
        Self: Sized,
        Self::Item: Eq + Hash + Clone,
    {
        Dedup::new(self)
    }

    /// Collapses runs of consecutive equal values into one value.
    fn uniq(self) -> Uniq<Self, EqFn<Self::Item>>
    where
        Self: Sized,
        Self::Item: PartialEq,
    {
        Uniq::new(self, <Self::Item as PartialEq>::eq as EqFn<Self::Item>)
    }

    /// Collapses runs of consecutive values considered equal by `eq`.
    fn uniq_by<F>(self, eq: F) -> Uniq<Self, F>
    where
        Self: Sized,
        F: Fn(&Self::Item, &Self::Item) -> bool,
    {
        Uniq::new(self, eq)
    }

    /// Converts the sequence into an on-demand [`Pull`] iterator
    /// driven by a worker thread.
    fn pull(self) -> Pull<'static, Self::Item>
    where
        Self: Sized + Send + 'static,
        Self::Item: Send + 'static,
    {
        Pull::new(self)
    }

    /// Calls `f` with every value.
    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Self::Item),
    {
        let _ = self.each(|value| {
            f(value);
            ControlFlow::Continue(())
        });
    }

    /// Calls `f` with every value, stopping at the first error.
    fn try_for_each<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(Self::Item) -> Result<(), E>,
    {
        let mut result = Ok(());

        let _ = self.each(|value| match f(value) {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => {
                result = Err(err);
                ControlFlow::Break(())
            }
        });

        result
    }

    /// Appends every value to `out`.
    fn append_to(&self, out: &mut Vec<Self::Item>) {
        self.for_each(|value| out.push(value));
    }

    /// Collects every value into a vector.
    fn collect(&self) -> Vec<Self::Item> {
        self.collect_with_capacity(0)
    }

    /// Collects every value into a vector pre-allocated for
    /// `capacity` values.
    fn collect_with_capacity(&self, capacity: usize) -> Vec<Self::Item> {
        let mut out = Vec::with_capacity(capacity);
        self.append_to(&mut out);
        out
    }

    /// Reduces the sequence into an accumulator, starting from
    /// `init`.
    fn fold<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        let mut acc = Some(init);
        self.for_each(|value| acc = acc.take().map(|acc| f(acc, value)));
        acc.unwrap_or_else(|| unreachable!("accumulator restored after every step"))
    }

    /// Reduces the sequence using its first value as accumulator.
    ///
    /// Returns `None` for an empty sequence.
    fn reduce<F>(&self, mut f: F) -> Option<Self::Item>
    where
        F: FnMut(Self::Item, Self::Item) -> Self::Item,
    {
        let mut acc = None;

        self.for_each(|value| {
            acc = Some(match acc.take() {
                Some(acc) => f(acc, value),
                None => value,
            })
        });

        acc
    }

    /// Adds every value together, starting from the default value.
    fn sum(&self) -> Self::Item
    where
        Self::Item: Default + Add<Output = Self::Item>,
    {
        self.fold(Self::Item::default(), |acc, value| acc + value)
    }

    /// Counts the values.
    fn count(&self) -> usize {
        self.fold(0, |n, _| n + 1)
    }

    /// Runs the sequence to completion, discarding its values.
    fn drain(&self) {
        self.for_each(drop)
    }

    /// Returns the first value matching `f`.
    fn find<F>(&self, f: F) -> Option<Self::Item>
    where
        F: Fn(&Self::Item) -> bool,
    {
        let mut found = None;

        let _ = self.each(|value| {
            if !f(&value) {
                return ControlFlow::Continue(());
            }

            found = Some(value);
            ControlFlow::Break(())
        });

        found
    }

    /// Returns `true` if at least one value matches `f`.
    fn any<F>(&self, f: F) -> bool
    where
        F: Fn(&Self::Item) -> bool,
    {
        self.find(f).is_some()
    }

    /// Returns `true` if every value matches `f`.
    fn all<F>(&self, f: F) -> bool
    where
        F: Fn(&Self::Item) -> bool,
    {
        self.find(|value| !f(value)).is_none()
    }

    /// Returns `true` if the values are in their natural order.
    fn is_sorted(&self) -> bool
    where
        Self::Item: Ord,
    {
        self.is_sorted_by(Ord::cmp)
    }

    /// Returns `true` if the values are ordered by `compare`.
    fn is_sorted_by<F>(&self, compare: F) -> bool
    where
        F: Fn(&Self::Item, &Self::Item) -> Ordering,
    {
        let mut prev: Option<Self::Item> = None;

        let flow = self.each(|value| {
            if let Some(prev) = &prev {
                if compare(prev, &value) == Ordering::Greater {
                    return ControlFlow::Break(());
                }
            }

            prev = Some(value);
            ControlFlow::Continue(())
        });

        flow.is_continue()
    }

    /// Splits the values into the ones matching `f` and the others.
    fn partition<F>(&self, f: F) -> (Vec<Self::Item>, Vec<Self::Item>)
    where
        F: Fn(&Self::Item) -> bool,
    {
        let mut matching = Vec::new();
        let mut others = Vec::new();

        self.for_each(|value| {
            if f(&value) {
                matching.push(value)
            } else {
                others.push(value)
            }
        });

        (matching, others)
    }

    /// Returns `true` if both sequences yield equal values in the
    /// same order.
    ///
    /// `other` is pulled one value at a time while `self` pushes, so
    /// the comparison stops at the first difference.
    fn eq_seq<S>(&self, other: &S) -> bool
    where
        S: Seq<Item = Self::Item> + Sync,
        Self::Item: PartialEq + Send,
    {
        thread::scope(|scope| {
            let mut other = Pull::scoped(scope, other);

            let flow = self.each(|value| match other.next() {
                Some(theirs) if theirs == value => ControlFlow::Continue(()),
                _ => ControlFlow::Break(()),
            });

            flow.is_continue() && other.next().is_none()
        })
    }
}

impl<S: Seq + ?Sized> Seq for &S {
    type Item = S::Item;

    fn each<F>(&self, f: F) -> ControlFlow<()>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        (**self).each(f)
    }
}

/// Sequence built from a closure, see [`from_fn`].
pub struct FromFn<T, F> {
    f: F,
    item: PhantomData<fn() -> T>,
}

/// Builds a sequence from a closure receiving the yield callback.
///
/// The closure is expected to honour the contract of [`Seq::each`]:
/// stop as soon as the callback breaks, which the `?` operator does
/// naturally.
///
/// ```
/// use std::ops::ControlFlow;
///
/// use coseq::{from_fn, Seq};
///
/// let seq = from_fn(|yield_| {
///     yield_(1)?;
///     yield_(2)?;
///     ControlFlow::Continue(())
/// });
///
/// assert_eq!(seq.collect(), vec![1, 2]);
/// ```
pub fn from_fn<T, F>(f: F) -> FromFn<T, F>
where
    F: Fn(&mut dyn FnMut(T) -> ControlFlow<()>) -> ControlFlow<()>,
{
    FromFn {
        f,
        item: PhantomData,
    }
}

impl<T, F> Seq for FromFn<T, F>
where
    F: Fn(&mut dyn FnMut(T) -> ControlFlow<()>) -> ControlFlow<()>,
{
    type Item = T;

    fn each<G>(&self, mut f: G) -> ControlFlow<()>
    where
        G: FnMut(T) -> ControlFlow<()>,
    {
        (self.f)(&mut f)
    }
}

impl<T, F> fmt::Debug for FromFn<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Sequence over a cloneable iterable, see [`iter`].
#[derive(Clone, Debug)]
pub struct Iter<I> {
    iter: I,
}

/// Builds a sequence from anything that can be iterated more than
/// once: vectors, arrays, ranges, iterators over borrowed slices…
///
/// Unbounded ranges produce infinite sequences, to be combined with
/// [`Seq::limit`] or an early-stopping consumer.
pub fn iter<I>(iter: I) -> Iter<I>
where
    I: IntoIterator + Clone,
{
    Iter { iter }
}

impl<I> Seq for Iter<I>
where
    I: IntoIterator + Clone,
{
    type Item = I::Item;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        for value in self.iter.clone() {
            f(value)?;
        }

        ControlFlow::Continue(())
    }
}

/// Sequence yielding nothing, see [`empty`].
#[derive(Debug)]
pub struct Empty<T> {
    item: PhantomData<fn() -> T>,
}

/// Builds a sequence yielding nothing.
pub fn empty<T>() -> Empty<T> {
    Empty { item: PhantomData }
}

impl<T> Seq for Empty<T> {
    type Item = T;

    fn each<F>(&self, _f: F) -> ControlFlow<()>
    where
        F: FnMut(T) -> ControlFlow<()>,
    {
        ControlFlow::Continue(())
    }
}

/// Sequence yielding a single value, see [`once`].
#[derive(Clone, Debug)]
pub struct Once<T> {
    value: T,
}

/// Builds a sequence yielding a clone of `value`, once.
pub fn once<T: Clone>(value: T) -> Once<T> {
    Once { value }
}

impl<T: Clone> Seq for Once<T> {
    type Item = T;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(T) -> ControlFlow<()>,
    {
        f(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        ops::ControlFlow,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use crate::combinators::windows::SliceSeq;

    use super::{empty, from_fn, iter, once, Seq};

    #[test]
    fn from_fn_stops_at_break() {
        let _ = env_logger::try_init();

        let calls = Cell::new(0);
        let seq = from_fn(|yield_| {
            for n in 0.. {
                calls.set(calls.get() + 1);
                yield_(n)?;
            }

            ControlFlow::Continue(())
        });

        assert_eq!(seq.find(|n| *n == 3), Some(3));
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn each_reports_break_only_when_stopped() {
        let _ = env_logger::try_init();

        let seq = iter(vec![1, 2, 3]);

        assert!(seq.each(|_| ControlFlow::Continue(())).is_continue());
        assert!(seq.each(|_| ControlFlow::Break(())).is_break());
        assert!(empty::<i32>().each(|_| ControlFlow::Break(())).is_continue());
    }

    #[test]
    fn seq_replays_from_start() {
        let _ = env_logger::try_init();

        let seq = iter(1..=3);

        assert_eq!(seq.collect(), vec![1, 2, 3]);
        assert_eq!(seq.collect(), vec![1, 2, 3]);
        assert_eq!((&seq).map(|n| n * 10).collect(), vec![10, 20, 30]);
    }

    #[test]
    fn sinks() {
        let _ = env_logger::try_init();

        let seq = iter(vec![3, 1, 4, 1, 5]);

        assert_eq!(seq.sum(), 14);
        assert_eq!(seq.count(), 5);
        assert_eq!(seq.fold(String::new(), |s, n| s + &n.to_string()), "31415");
        assert_eq!(seq.reduce(i32::max), Some(5));
        assert_eq!(empty::<i32>().reduce(i32::max), None);
        assert_eq!(seq.find(|n| *n > 3), Some(4));
        assert!(seq.any(|n| *n == 5));
        assert!(!seq.all(|n| *n > 1));
        assert_eq!(seq.partition(|n| n % 2 == 0), (vec![4], vec![3, 1, 1, 5]));

        let mut out = vec![0];
        seq.append_to(&mut out);
        assert_eq!(out, vec![0, 3, 1, 4, 1, 5]);
        assert_eq!(once(7).collect_with_capacity(4), vec![7]);
    }

    #[test]
    fn try_for_each_propagates_first_error() {
        let _ = env_logger::try_init();

        let seen = AtomicUsize::new(0);
        let result = iter(1..10).try_for_each(|n| {
            seen.fetch_add(1, Ordering::SeqCst);
            if n == 4 {
                Err(format!("bad value {n}"))
            } else {
                Ok(())
            }
        });

        assert_eq!(result, Err(String::from("bad value 4")));
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn is_sorted() {
        let _ = env_logger::try_init();

        assert!(!iter([1, 2, 3, 2]).is_sorted());
        assert!(iter([1, 2, 3, 4, 5]).is_sorted());
        assert!(iter([48, 48]).is_sorted());
        assert!(iter([3, 2, 1]).is_sorted_by(|a: &i32, b| b.cmp(a)));
    }

    #[test]
    fn eq_seq() {
        let _ = env_logger::try_init();

        assert!(iter(0..5).eq_seq(&iter(vec![0, 1, 2, 3, 4])));
        assert!(!iter(0..5).eq_seq(&iter(0..4)));
        assert!(!iter(0..4).eq_seq(&iter(0..5)));
        assert!(!iter(0..5).eq_seq(&iter(1..6)));
        assert!(empty::<u8>().eq_seq(&empty()));
    }

    #[test]
    fn find_on_infinite_windows() {
        let _ = env_logger::try_init();

        let window = iter(0..)
            .windows(3)
            .unwrap()
            .to_vecs()
            .find(|win| win.iter().sum::<i32>() >= 100);

        assert_eq!(window, Some(vec![33, 34, 35]));
    }
}
