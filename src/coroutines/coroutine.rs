//! Two-way coroutine emulated with a worker thread and two rendezvous
//! channels.
//!
//! The consumer sends an input on the resume channel, then blocks
//! until the body either suspends with an output on the yielded
//! channel, or returns (which closes the yielded channel). The body
//! blocks at each suspension point until the next resume. At most
//! one value is ever in flight.

use std::{fmt, panic, thread};

use crossbeam::channel::{bounded, Receiver, Sender};
use log::{debug, trace};

/// Handle given to the coroutine body to suspend itself.
pub struct Suspend<In, Out> {
    resume: Receiver<In>,
    yielded: Sender<Out>,
}

impl<In, Out> Suspend<In, Out> {
    /// Hands `output` over to the consumer, then waits for the next
    /// input.
    ///
    /// Returns `None` once the consumer stopped the coroutine: the
    /// body should then return as soon as possible.
    pub fn suspend(&self, output: Out) -> Option<In> {
        trace!("suspend coroutine");
        self.yielded.send(output).ok()?;
        self.resume.recv().ok()
    }
}

impl<In, Out> fmt::Debug for Suspend<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suspend").finish_non_exhaustive()
    }
}

/// The thread running the coroutine body.
///
/// The result is `None` when the coroutine got stopped before its
/// first resume, in which case the body never ran.
enum Worker<'scope, R> {
    Owned(thread::JoinHandle<Option<R>>),
    Scoped(thread::ScopedJoinHandle<'scope, Option<R>>),
}

impl<R> Worker<'_, R> {
    fn join(self) -> thread::Result<Option<R>> {
        match self {
            Worker::Owned(handle) => handle.join(),
            Worker::Scoped(handle) => handle.join(),
        }
    }
}

/// Two-way coroutine exchanging `In` and `Out` values with its body,
/// and finally returning `R`.
///
/// The first call to [`Coroutine::resume`] starts the body with the
/// given input. Every [`Suspend::suspend`] inside the body hands an
/// output back to the consumer, and receives the input of the next
/// resume in exchange.
///
/// Dropping the coroutine stops it.
///
/// ```
/// use coseq::coroutines::Coroutine;
///
/// let mut co = Coroutine::new(|mut total: u32, suspend| {
///     while let Some(n) = suspend.suspend(total) {
///         total += n;
///     }
///     total * 10
/// });
///
/// assert_eq!(co.resume(1), Some(1));
/// assert_eq!(co.resume(2), Some(3));
/// assert_eq!(co.resume(3), Some(6));
/// assert_eq!(co.stop(), Some(60));
/// assert_eq!(co.stop(), None);
/// ```
pub struct Coroutine<'scope, In, Out, R> {
    resume: Option<Sender<In>>,
    yielded: Receiver<Out>,
    worker: Option<Worker<'scope, R>>,
    result: Option<R>,
}

impl<In, Out, R> Coroutine<'static, In, Out, R>
where
    In: Send + 'static,
    Out: Send + 'static,
    R: Send + 'static,
{
    /// Creates a coroutine running `body` on a dedicated thread.
    ///
    /// The thread is spawned right away, but the body only starts at
    /// the first resume.
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce(In, &Suspend<In, Out>) -> R + Send + 'static,
    {
        let (resume_tx, resume_rx) = bounded(0);
        let (yielded_tx, yielded_rx) = bounded(0);

        trace!("spawn coroutine thread");
        let handle = thread::spawn(move || run(body, resume_rx, yielded_tx));

        Self::with_worker(resume_tx, yielded_rx, Worker::Owned(handle))
    }
}

impl<'scope, In, Out, R> Coroutine<'scope, In, Out, R>
where
    In: Send + 'scope,
    Out: Send + 'scope,
    R: Send + 'scope,
{
    /// Creates a coroutine running `body` on a thread of the given
    /// scope, which lets the body borrow from the environment.
    ///
    /// The coroutine must be stopped or dropped before the scope
    /// ends, otherwise the scope waits forever for the suspended
    /// body.
    pub fn scoped<'env, F>(scope: &'scope thread::Scope<'scope, 'env>, body: F) -> Self
    where
        F: FnOnce(In, &Suspend<In, Out>) -> R + Send + 'scope,
    {
        let (resume_tx, resume_rx) = bounded(0);
        let (yielded_tx, yielded_rx) = bounded(0);

        trace!("spawn scoped coroutine thread");
        let handle = scope.spawn(move || run(body, resume_rx, yielded_tx));

        Self::with_worker(resume_tx, yielded_rx, Worker::Scoped(handle))
    }
}

impl<'scope, In, Out, R> Coroutine<'scope, In, Out, R> {
    fn with_worker(resume: Sender<In>, yielded: Receiver<Out>, worker: Worker<'scope, R>) -> Self {
        Self {
            resume: Some(resume),
            yielded,
            worker: Some(worker),
            result: None,
        }
    }

    /// Makes the coroutine progress.
    ///
    /// Sends `input` to the body (as its first argument on the first
    /// call, as the result of its pending suspension afterwards),
    /// then waits for its next output. Returns `None` once the body
    /// returned or once the coroutine got stopped.
    ///
    /// A panic in the body is propagated to the caller.
    pub fn resume(&mut self, input: In) -> Option<Out> {
        let resume = self.resume.as_ref()?;

        trace!("resume coroutine");

        if resume.send(input).is_err() {
            self.finish();
            return None;
        }

        match self.yielded.recv() {
            Ok(output) => Some(output),
            Err(_) => {
                trace!("coroutine body returned");
                self.finish();
                None
            }
        }
    }

    /// Stops the coroutine and returns the result of its body.
    ///
    /// A body suspended at that point sees its suspension return
    /// `None`. This function blocks until the body returned and its
    /// thread exited.
    ///
    /// The result is only available once: further calls return
    /// `None`, as well as a coroutine stopped before being resumed at
    /// all.
    pub fn stop(&mut self) -> Option<R> {
        if self.worker.is_some() {
            debug!("stop coroutine");
            self.finish();
        }

        self.result.take()
    }

    /// Returns `true` once the body returned or the coroutine got
    /// stopped.
    pub fn is_done(&self) -> bool {
        self.worker.is_none()
    }

    fn finish(&mut self) {
        if let Err(payload) = self.shutdown() {
            panic::resume_unwind(payload)
        }
    }

    /// Closes the resume channel, waits for the yielded channel to be
    /// closed, then joins the worker thread.
    fn shutdown(&mut self) -> thread::Result<()> {
        self.resume = None;

        // a body ignoring the stop may still suspend, its outputs are
        // discarded until it returns
        while self.yielded.recv().is_ok() {
            trace!("discard output of stopped coroutine");
        }

        if let Some(worker) = self.worker.take() {
            self.result = worker.join()?;
        }

        Ok(())
    }
}

impl<In, Out, R> Drop for Coroutine<'_, In, Out, R> {
    fn drop(&mut self) {
        if self.shutdown().is_err() {
            debug!("coroutine body panicked before being dropped");
        }
    }
}

impl<In, Out, R> fmt::Debug for Coroutine<'_, In, Out, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coroutine")
            .field("done", &self.is_done())
            .finish_non_exhaustive()
    }
}

/// Body of the worker thread.
fn run<In, Out, R, F>(body: F, resume: Receiver<In>, yielded: Sender<Out>) -> Option<R>
where
    F: FnOnce(In, &Suspend<In, Out>) -> R,
{
    let Ok(input) = resume.recv() else {
        trace!("coroutine stopped before its first resume");
        return None;
    };

    let suspend = Suspend { resume, yielded };
    Some(body(input, &suspend))
}

#[cfg(test)]
mod tests {
    use std::{
        panic::{self, AssertUnwindSafe},
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        thread,
    };

    use super::Coroutine;

    #[test]
    fn exchange_values() {
        let _ = env_logger::try_init();

        let mut co = Coroutine::new(|first: i32, suspend| {
            assert_eq!(first, 0);

            let mut prev = first;
            loop {
                match suspend.suspend(prev + 1) {
                    Some(n) => {
                        assert_eq!(n, prev + 2);
                        prev = n;
                    }
                    None => {
                        assert_eq!(prev, 10);
                        break -1;
                    }
                }
            }
        });

        let mut prev = co.resume(0).unwrap();
        while prev < 10 {
            let n = co.resume(prev + 1).unwrap();
            assert_eq!(n, prev + 2);
            prev = n;
        }

        assert_eq!(co.stop(), Some(-1));
        assert!(co.is_done());
    }

    #[test]
    fn result_after_body_returned() {
        let _ = env_logger::try_init();

        let mut co = Coroutine::new(|n: u8, suspend| {
            suspend.suspend(n);
            "done"
        });

        assert_eq!(co.resume(1), Some(1));
        assert_eq!(co.resume(2), None);
        assert!(co.is_done());
        assert_eq!(co.resume(3), None);
        assert_eq!(co.stop(), Some("done"));
        assert_eq!(co.stop(), None);
    }

    #[test]
    fn stop_before_first_resume() {
        let _ = env_logger::try_init();

        let started = Arc::new(AtomicBool::new(false));
        let body_started = started.clone();

        let mut co = Coroutine::<(), (), ()>::new(move |(), _| {
            body_started.store(true, Ordering::SeqCst);
        });

        assert_eq!(co.stop(), None);
        assert_eq!(co.stop(), None);
        assert_eq!(co.resume(()), None);
        assert!(!started.load(Ordering::SeqCst));
    }

    #[test]
    fn drop_stops_body() {
        let _ = env_logger::try_init();

        let stopped = Arc::new(AtomicBool::new(false));
        let body_stopped = stopped.clone();

        let mut co = Coroutine::new(move |(), suspend| {
            while suspend.suspend(()).is_some() {}
            body_stopped.store(true, Ordering::SeqCst);
        });

        assert_eq!(co.resume(()), Some(()));
        drop(co);

        assert!(stopped.load(Ordering::SeqCst));
    }

    #[test]
    fn body_panic_propagates() {
        let _ = env_logger::try_init();

        let mut co = Coroutine::new(|n: i32, suspend| {
            let n = suspend.suspend(n).unwrap_or_default();
            if n > 1 {
                panic!("too big");
            }
        });

        assert_eq!(co.resume(1), Some(1));

        let result = panic::catch_unwind(AssertUnwindSafe(|| co.resume(2)));
        assert!(result.is_err());
        assert!(co.is_done());
        assert_eq!(co.stop(), None);
    }

    #[test]
    fn scoped_body_borrows() {
        let _ = env_logger::try_init();

        let words = vec!["a", "b", "c"];

        let joined = thread::scope(|scope| {
            let mut co = Coroutine::scoped(scope, |(), suspend| {
                for word in &words {
                    if suspend.suspend(*word).is_none() {
                        break;
                    }
                }
                words.len()
            });

            let mut joined = String::new();
            while let Some(word) = co.resume(()) {
                joined.push_str(word);
            }

            assert_eq!(co.stop(), Some(3));
            joined
        });

        assert_eq!(joined, "abc");
    }
}
