//! Lockstep iteration over two independent sequences.

use std::{
    ops::ControlFlow,
    panic,
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam::channel::{bounded, never, select, Receiver, Sender};
use log::{debug, trace};

use crate::{channels::crossbeam::send, coroutines::Pull, pair::Zipped, Seq};

/// See [`Seq::zip`].
///
/// Both sides are pulled one value at a time, alternately. Once a
/// side is exhausted, the records hold `None` for it until the other
/// side is exhausted too.
#[derive(Clone, Debug)]
pub struct Zip<A, B> {
    first: A,
    second: B,
}

impl<A, B> Zip<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> Seq for Zip<A, B>
where
    A: Seq + Sync,
    B: Seq + Sync,
    A::Item: Send,
    B::Item: Send,
{
    type Item = Zipped<A::Item, B::Item>;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        thread::scope(|scope| -> ControlFlow<()> {
            let mut first = Pull::scoped(scope, &self.first);
            let mut second = Pull::scoped(scope, &self.second);

            loop {
                let zipped = Zipped::new(first.next(), second.next());

                if zipped.is_empty() {
                    break ControlFlow::Continue(());
                }

                f(zipped)?;
            }
        })
    }
}

/// See [`Seq::zip_threaded`].
///
/// Each side runs on its own worker thread and sends its values over
/// a rendezvous channel, so both sides make progress concurrently.
/// Values are received in whatever order the sides produce them and
/// paired by position.
///
/// Stopping the zipped sequence closes a shared done channel and
/// returns right away: each worker stops at its next value, even if
/// its side keeps working a long time before producing it. When both
/// sides run to their end, `each` joins both workers and propagates
/// their panics.
#[derive(Debug)]
pub struct ZipThreaded<A, B> {
    first: Arc<A>,
    second: Arc<B>,
}

impl<A, B> ZipThreaded<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first: Arc::new(first),
            second: Arc::new(second),
        }
    }
}

impl<A, B> Clone for ZipThreaded<A, B> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
        }
    }
}

impl<A, B> Seq for ZipThreaded<A, B>
where
    A: Seq + Send + Sync + 'static,
    B: Seq + Send + Sync + 'static,
    A::Item: Send + 'static,
    B::Item: Send + 'static,
{
    type Item = Zipped<A::Item, B::Item>;

    fn each<F>(&self, f: F) -> ControlFlow<()>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        // never written to, closed when dropped
        let (done_tx, done_rx) = bounded::<()>(0);
        let (first_tx, first_rx) = bounded(0);
        let (second_tx, second_rx) = bounded(0);

        let first = spawn_side(self.first.clone(), first_tx, done_rx.clone());
        let second = spawn_side(self.second.clone(), second_tx, done_rx);

        let flow = pair_up(&first_rx, &second_rx, f);
        drop(done_tx);

        if flow.is_break() {
            debug!("zipped sequence stopped, workers exit at their next value");
            return flow;
        }

        // both channels are closed, so both workers already returned
        for worker in [first, second] {
            if let Err(payload) = worker.join() {
                panic::resume_unwind(payload)
            }
        }

        flow
    }
}

/// Spawns a worker sending the values of `seq` until it ends or until
/// the `done` channel fires.
fn spawn_side<S>(seq: Arc<S>, tx: Sender<S::Item>, done: Receiver<()>) -> JoinHandle<()>
where
    S: Seq + Send + Sync + 'static,
    S::Item: Send + 'static,
{
    thread::spawn(move || {
        let _ = send(&*seq, &tx, &done);
        trace!("zipped worker exited");
    })
}

/// Receives one value per open side for each record, in whatever
/// order they arrive.
fn pair_up<A, B, F>(first: &Receiver<A>, second: &Receiver<B>, mut f: F) -> ControlFlow<()>
where
    F: FnMut(Zipped<A, B>) -> ControlFlow<()>,
{
    let closed_first = never();
    let closed_second = never();

    let mut first_open = true;
    let mut second_open = true;

    loop {
        let mut zipped = Zipped::new(None, None);
        let mut want_first = first_open;
        let mut want_second = second_open;

        while want_first || want_second {
            let first = if want_first { first } else { &closed_first };
            let second = if want_second { second } else { &closed_second };

            select! {
                recv(first) -> msg => {
                    want_first = false;
                    match msg {
                        Ok(value) => zipped.v1 = Some(value),
                        Err(_) => first_open = false,
                    }
                }
                recv(second) -> msg => {
                    want_second = false;
                    match msg {
                        Ok(value) => zipped.v2 = Some(value),
                        Err(_) => second_open = false,
                    }
                }
            }
        }

        if zipped.is_empty() {
            break ControlFlow::Continue(());
        }

        f(zipped)?;
    }
}
