// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bridge from the push-based [`Observable`] contract to a pull-based
//! [`futures::Stream`].
//!
//! The bridge buffers notifications in an unbounded channel, so a fully
//! synchronous flush can run first and the buffered items be consumed
//! afterwards with ordinary async tooling
//! (`futures::executor::block_on(stream.collect())` in tests).

use crate::observable::{Observable, Observer, Subscription};
use crate::test_event::TestEvent;
use futures::Stream;
use std::pin::Pin;

/// A boxed stream of the notifications an observable delivered.
pub type EventStream<T> = Pin<Box<dyn Stream<Item = TestEvent<T>> + Send>>;

/// Extension trait turning any [`Observable`] into a [`futures::Stream`] of
/// [`TestEvent`]s.
pub trait SubscribeStream<T>: Observable<T> {
    /// Subscribes and exposes the delivered notifications as a stream.
    ///
    /// The stream ends after the terminal notification. If the observable
    /// never terminates, the stream ends once the producer releases its
    /// observer (for a cold marble source, when the clock has drained all of
    /// its scheduled deliveries).
    fn subscribe_stream(&self) -> (EventStream<T>, Subscription);
}

impl<T, O> SubscribeStream<T> for O
where
    T: Send + 'static,
    O: Observable<T>,
{
    fn subscribe_stream(&self) -> (EventStream<T>, Subscription) {
        let (tx, rx) = async_channel::unbounded();
        let tx_error = tx.clone();
        let tx_complete = tx.clone();

        let observer = Observer::new(
            move |value| {
                let _ = tx.try_send(TestEvent::Value(value));
            },
            move |error| {
                let _ = tx_error.try_send(TestEvent::Error(error));
                tx_error.close();
            },
            move || {
                let _ = tx_complete.try_send(TestEvent::Complete);
                tx_complete.close();
            },
        );

        let subscription = self.subscribe(observer);
        (Box::pin(rx), subscription)
    }
}
