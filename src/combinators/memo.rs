//! Stateful wrappers remembering what a sequence produced.

use std::{collections::HashSet, fmt, hash::Hash, mem, ops::ControlFlow, thread};

use log::{debug, trace};
use parking_lot::Mutex;

use crate::{coroutines::Pull, Seq};

/// See [`Seq::cache`].
///
/// The underlying sequence is driven through a [`Pull`] handle, on
/// demand of the first traversal reaching past the recorded values.
/// Every traversal replays the recorded values, then resumes the
/// suspended sequence where the previous traversals left it. The
/// underlying sequence thus runs at most once and its side effects
/// happen exactly once per produced value, whether traversals stop
/// early or overlap.
pub struct Cache<S: Seq> {
    state: Mutex<CacheState<S>>,
}

struct CacheState<S: Seq> {
    /// The underlying sequence, until it starts running.
    source: Option<S>,

    /// The running underlying sequence.
    pull: Option<Pull<'static, S::Item>>,

    /// The values produced so far.
    values: Vec<S::Item>,

    /// Whether the underlying sequence ran to its end.
    complete: bool,
}

impl<S: Seq> Cache<S> {
    pub fn new(source: S) -> Self {
        let state = CacheState {
            source: Some(source),
            pull: None,
            values: Vec::new(),
            complete: false,
        };

        Self {
            state: Mutex::new(state),
        }
    }

    /// Returns `true` once the underlying sequence ran to its end.
    pub fn is_complete(&self) -> bool {
        self.state.lock().complete
    }
}

impl<S> CacheState<S>
where
    S: Seq + Send + 'static,
    S::Item: Clone + Send + 'static,
{
    /// Returns the value at the given position, producing it if
    /// needed.
    fn get(&mut self, index: usize) -> Option<S::Item> {
        if let Some(value) = self.values.get(index) {
            return Some(value.clone());
        }

        if self.complete {
            return None;
        }

        if self.pull.is_none() {
            debug!("start caching sequence");
            self.pull = self.source.take().map(Pull::new);
        }

        trace!("cache miss at {index}, resume sequence");

        let next = self.pull.as_mut()?.next();

        match next {
            Some(value) => {
                self.values.push(value.clone());
                Some(value)
            }
            None => {
                debug!("cached {} values", self.values.len());
                self.complete = true;
                self.pull = None;
                None
            }
        }
    }
}

impl<S> Seq for Cache<S>
where
    S: Seq + Send + 'static,
    S::Item: Clone + Send + 'static,
{
    type Item = S::Item;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(S::Item) -> ControlFlow<()>,
    {
        for index in 0.. {
            // released before calling f, so that f can traverse the
            // cache again
            let value = self.state.lock().get(index);

            match value {
                Some(value) => f(value)?,
                None => break,
            }
        }

        ControlFlow::Continue(())
    }
}

impl<S: Seq> fmt::Debug for Cache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();

        f.debug_struct("Cache")
            .field("cached", &state.values.len())
            .field("complete", &state.complete)
            .finish_non_exhaustive()
    }
}

/// See [`Seq::dedup`].
///
/// Remembers every distinct value produced during a traversal.
#[derive(Clone, Debug)]
pub struct Dedup<S> {
    seq: S,
}

impl<S> Dedup<S> {
    pub fn new(seq: S) -> Self {
        Self { seq }
    }
}

impl<S> Seq for Dedup<S>
where
    S: Seq,
    S::Item: Eq + Hash + Clone,
{
    type Item = S::Item;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(S::Item) -> ControlFlow<()>,
    {
        let mut seen = HashSet::new();

        self.seq.each(|value| {
            if seen.insert(value.clone()) {
                f(value)
            } else {
                ControlFlow::Continue(())
            }
        })
    }
}

/// See [`Seq::uniq`] and [`Seq::uniq_by`].
///
/// The underlying sequence is pulled one value ahead: a value is
/// only yielded once the next different one, or the end of the
/// sequence, has been seen.
#[derive(Clone, Debug)]
pub struct Uniq<S, F> {
    seq: S,
    eq: F,
}

impl<S, F> Uniq<S, F> {
    pub fn new(seq: S, eq: F) -> Self {
        Self { seq, eq }
    }
}

impl<S, F> Seq for Uniq<S, F>
where
    S: Seq + Sync,
    S::Item: Send,
    F: Fn(&S::Item, &S::Item) -> bool,
{
    type Item = S::Item;

    fn each<G>(&self, mut f: G) -> ControlFlow<()>
    where
        G: FnMut(S::Item) -> ControlFlow<()>,
    {
        thread::scope(|scope| -> ControlFlow<()> {
            let mut pull = Pull::scoped(scope, &self.seq);

            let Some(mut current) = pull.next() else {
                return ControlFlow::Continue(());
            };

            for value in &mut pull {
                if !(self.eq)(&current, &value) {
                    f(mem::replace(&mut current, value))?;
                }
            }

            f(current)
        })
    }
}
