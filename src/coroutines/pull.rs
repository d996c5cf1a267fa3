//! On-demand iteration over a push-style sequence.

use std::{fmt, iter::FusedIterator, ops::ControlFlow, thread};

use log::trace;

use crate::Seq;

use super::coroutine::{Coroutine, Suspend};

/// Pull handle over a [`Seq`].
///
/// The sequence runs on a worker thread, suspended at each value
/// until the next call to [`Iterator::next`]. Once the sequence is
/// exhausted or the handle stopped, `next` keeps returning `None`.
///
/// [`Pull::stop`] (or dropping the handle) terminates the worker
/// before returning, whatever the amount of values consumed.
///
/// ```
/// use coseq::{iter, Seq};
///
/// let mut pull = iter(0..).pull();
///
/// assert_eq!(pull.next(), Some(0));
/// assert_eq!(pull.next(), Some(1));
///
/// pull.stop();
/// assert_eq!(pull.next(), None);
/// ```
pub struct Pull<'scope, T> {
    coroutine: Coroutine<'scope, (), T, ()>,
}

impl<T: Send + 'static> Pull<'static, T> {
    /// Creates a pull handle owning the given sequence.
    pub fn new<S>(seq: S) -> Self
    where
        S: Seq<Item = T> + Send + 'static,
    {
        let coroutine = Coroutine::new(move |(), suspend| drive(&seq, suspend));
        Self { coroutine }
    }
}

impl<'scope, T: Send + 'scope> Pull<'scope, T> {
    /// Creates a pull handle over a borrowed sequence, driven by a
    /// thread of the given scope.
    ///
    /// The handle must be stopped or dropped before the scope ends.
    pub fn scoped<'env, S>(scope: &'scope thread::Scope<'scope, 'env>, seq: &'scope S) -> Self
    where
        S: Seq<Item = T> + Sync,
    {
        let coroutine = Coroutine::scoped(scope, move |(), suspend| drive(seq, suspend));
        Self { coroutine }
    }
}

impl<T> Pull<'_, T> {
    /// Stops the underlying sequence and waits for its worker thread
    /// to exit.
    ///
    /// Calling this function more than once is harmless.
    pub fn stop(&mut self) {
        self.coroutine.stop();
    }

    /// Returns `true` once the sequence is exhausted or the handle
    /// stopped.
    pub fn is_done(&self) -> bool {
        self.coroutine.is_done()
    }
}

impl<T> Iterator for Pull<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.coroutine.resume(())
    }
}

impl<T> FusedIterator for Pull<'_, T> {}

impl<T> fmt::Debug for Pull<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pull")
            .field("done", &self.is_done())
            .finish_non_exhaustive()
    }
}

/// Runs the sequence, suspending the worker at each value.
fn drive<S: Seq + ?Sized>(seq: &S, suspend: &Suspend<(), S::Item>) {
    let flow = seq.each(|value| match suspend.suspend(value) {
        Some(()) => ControlFlow::Continue(()),
        None => ControlFlow::Break(()),
    });

    if flow.is_break() {
        trace!("pulled sequence stopped early");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        ops::ControlFlow,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        thread,
    };

    use crate::{from_fn, iter, Seq};

    use super::Pull;

    /// Decrements the counter of live producers once dropped, either
    /// because the producer returned or because it unwound.
    struct Alive(Arc<AtomicUsize>);

    impl Drop for Alive {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn pull_in_order() {
        let _ = env_logger::try_init();

        let mut pull = iter(vec![1, 2, 3]).pull();

        assert_eq!(pull.next(), Some(1));
        assert_eq!(pull.next(), Some(2));
        assert_eq!(pull.next(), Some(3));
        assert_eq!(pull.next(), None);
        assert_eq!(pull.next(), None);
        assert!(pull.is_done());
    }

    #[test]
    fn stop_is_idempotent() {
        let _ = env_logger::try_init();

        let mut pull = iter(0..).pull();

        assert_eq!(pull.next(), Some(0));
        pull.stop();
        pull.stop();
        assert_eq!(pull.next(), None);
    }

    #[test]
    fn no_live_producer_after_stop() {
        let _ = env_logger::try_init();

        let alive = Arc::new(AtomicUsize::new(0));

        for consumed in 0..5 {
            let counter = alive.clone();
            let seq = from_fn(move |yield_| {
                counter.fetch_add(1, Ordering::SeqCst);
                let _alive = Alive(counter.clone());
                for n in 0..3 {
                    yield_(n)?;
                }
                ControlFlow::Continue(())
            });

            let mut pull = Pull::new(seq);
            for _ in 0..consumed {
                pull.next();
            }
            pull.stop();

            assert_eq!(alive.load(Ordering::SeqCst), 0, "consumed {consumed} values");
        }
    }

    #[test]
    fn scoped_pull_borrows() {
        let _ = env_logger::try_init();

        let values = vec![String::from("a"), String::from("b")];
        let seq = iter(&values);

        let pulled: Vec<&String> = thread::scope(|scope| Pull::scoped(scope, &seq).collect());

        assert_eq!(pulled, vec!["a", "b"]);
    }

    #[test]
    fn pull_as_iterator() {
        let _ = env_logger::try_init();

        let evens: Vec<u32> = iter(0..).filter(|n| n % 2 == 0).pull().take(3).collect();

        assert_eq!(evens, vec![0, 2, 4]);
    }
}
