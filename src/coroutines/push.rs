//! Push adapter, for feeding a sequence consumer one value at a time
//! from code that cannot hand it a [`Seq`].

use std::{cell::Cell, fmt, ops::ControlFlow};

use log::trace;

use crate::Seq;

use super::coroutine::{Coroutine, Suspend};

/// Push handle around a sequence consumer.
///
/// The consumer runs on a coroutine and receives a [`Pushed`]
/// sequence, whose values are the ones given to [`Push::push`]. The
/// sequence ends when the handle is stopped, and the value returned
/// by the consumer is then handed back by [`Push::stop`].
///
/// ```
/// use std::ops::ControlFlow;
///
/// use coseq::{coroutines::Push, Seq};
///
/// let mut push = Push::new(|seq| seq.sum());
///
/// for n in 0..10 {
///     assert_eq!(push.push(n), ControlFlow::Continue(()));
/// }
///
/// assert_eq!(push.stop(), Some(45));
/// ```
pub struct Push<T, R> {
    coroutine: Coroutine<'static, Option<T>, (), R>,
}

impl<T, R> Push<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    /// Starts the given consumer on a coroutine.
    ///
    /// The consumer runs until it iterates the sequence it received
    /// for the first time, so it is ready for the first push when
    /// this function returns.
    pub fn new<F>(consumer: F) -> Self
    where
        F: FnOnce(Pushed<'_, T>) -> R + Send + 'static,
    {
        let mut coroutine = Coroutine::new(move |_, suspend: &Suspend<Option<T>, ()>| {
            consumer(Pushed {
                suspend,
                done: Cell::new(false),
            })
        });

        if coroutine.resume(None).is_none() {
            trace!("consumer returned without iterating");
        }

        Self { coroutine }
    }

    /// Pushes the given value to the consumer.
    ///
    /// Returns [`ControlFlow::Break`] once the consumer stopped
    /// iterating, after which pushing is pointless.
    pub fn push(&mut self, value: T) -> ControlFlow<()> {
        match self.coroutine.resume(Some(value)) {
            Some(()) => ControlFlow::Continue(()),
            None => ControlFlow::Break(()),
        }
    }

    /// Ends the pushed sequence and returns what the consumer
    /// returned.
    ///
    /// The result is only available once: further calls return
    /// `None`.
    pub fn stop(&mut self) -> Option<R> {
        self.coroutine.stop()
    }
}

impl<T, R> fmt::Debug for Push<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Push")
            .field("done", &self.coroutine.is_done())
            .finish_non_exhaustive()
    }
}

/// Sequence of the values given to [`Push::push`].
///
/// The sequence is a live stream: iterating it again after a break
/// resumes with the next pushed value, and once the push handle is
/// stopped it stays empty.
pub struct Pushed<'a, T> {
    suspend: &'a Suspend<Option<T>, ()>,
    done: Cell<bool>,
}

impl<T> Seq for Pushed<'_, T> {
    type Item = T;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(T) -> ControlFlow<()>,
    {
        if self.done.get() {
            return ControlFlow::Continue(());
        }

        while let Some(Some(value)) = self.suspend.suspend(()) {
            f(value)?;
        }

        self.done.set(true);
        ControlFlow::Continue(())
    }
}

impl<T> fmt::Debug for Pushed<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pushed")
            .field("done", &self.done.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use crate::Seq;

    use super::Push;

    /// A callback-based interface, standing for an external API that
    /// cannot consume a sequence directly.
    trait Aggregate {
        fn step(&mut self, value: i32);
        fn result(&mut self) -> Option<i32>;
    }

    struct Sum {
        push: Push<i32, i32>,
        open: bool,
    }

    impl Aggregate for Sum {
        fn step(&mut self, value: i32) {
            if self.open {
                self.open = self.push.push(value).is_continue();
            }
        }

        fn result(&mut self) -> Option<i32> {
            self.push.stop()
        }
    }

    #[test]
    fn aggregate_through_push() {
        let _ = env_logger::try_init();

        let mut sum = Sum {
            push: Push::new(|seq| seq.sum()),
            open: true,
        };

        for n in 0..10 {
            sum.step(n);
        }

        assert_eq!(sum.result(), Some(45));
        assert_eq!(sum.result(), None);
    }

    #[test]
    fn consumer_stopping_early() {
        let _ = env_logger::try_init();

        let mut push = Push::new(|seq| seq.limit(2).collect());

        assert_eq!(push.push("a"), ControlFlow::Continue(()));
        assert_eq!(push.push("b"), ControlFlow::Break(()));
        assert_eq!(push.push("c"), ControlFlow::Break(()));
        assert_eq!(push.stop(), Some(vec!["a", "b"]));
    }

    #[test]
    fn stop_without_push() {
        let _ = env_logger::try_init();

        let mut push = Push::<u8, usize>::new(|seq| seq.count());

        assert_eq!(push.stop(), Some(0));
    }
}
