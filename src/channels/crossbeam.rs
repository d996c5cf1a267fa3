//! Sequences over [`crossbeam::channel`] channels.

use std::ops::ControlFlow;

use crossbeam::channel::{select, Receiver, Sender};
use log::trace;

use crate::Seq;

/// See [`recv`].
///
/// Values are consumed from the channel: a second traversal goes on
/// where the first one stopped, it does not replay the values.
#[derive(Clone, Debug)]
pub struct Recv<T> {
    rx: Receiver<T>,
}

/// Builds a sequence receiving values from the given channel, until
/// all its senders are dropped.
pub fn recv<T>(rx: Receiver<T>) -> Recv<T> {
    Recv { rx }
}

impl<T> Seq for Recv<T> {
    type Item = T;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(T) -> ControlFlow<()>,
    {
        for value in self.rx.iter() {
            f(value)?;
        }

        trace!("channel disconnected");
        ControlFlow::Continue(())
    }
}

/// See [`recv_until`].
#[derive(Clone, Debug)]
pub struct RecvUntil<T> {
    rx: Receiver<T>,
    done: Receiver<()>,
}

/// Builds a sequence receiving values from the given channel, until
/// all its senders are dropped or until the `done` channel fires.
///
/// The `done` channel fires when it receives a message or when all
/// its senders are dropped.
pub fn recv_until<T>(rx: Receiver<T>, done: Receiver<()>) -> RecvUntil<T> {
    RecvUntil { rx, done }
}

impl<T> Seq for RecvUntil<T> {
    type Item = T;

    fn each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(T) -> ControlFlow<()>,
    {
        loop {
            let value = select! {
                recv(self.done) -> _ => None,
                recv(self.rx) -> msg => msg.ok(),
            };

            match value {
                Some(value) => f(value)?,
                None => {
                    trace!("channel disconnected or done");
                    break ControlFlow::Continue(());
                }
            }
        }
    }
}

/// Sends every value of the sequence into the given channel.
///
/// Sending stops as soon as the `done` channel fires or as soon as
/// the channel disconnects, in which case [`ControlFlow::Break`] is
/// returned. The value being sent at that time is dropped.
pub fn send<S>(seq: &S, tx: &Sender<S::Item>, done: &Receiver<()>) -> ControlFlow<()>
where
    S: Seq + ?Sized,
{
    seq.each(|value| {
        select! {
            send(tx, value) -> res => match res {
                Ok(()) => ControlFlow::Continue(()),
                Err(_) => {
                    trace!("channel disconnected, stop sending");
                    ControlFlow::Break(())
                }
            },
            recv(done) -> _ => {
                trace!("done channel fired, stop sending");
                ControlFlow::Break(())
            }
        }
    })
}
