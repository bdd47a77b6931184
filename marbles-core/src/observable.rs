// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The push-based stream contract consumed by the test harness.
//!
//! An [`Observable`] is anything that accepts an [`Observer`] (three
//! callbacks: value, error, completion) and hands back a [`Subscription`]
//! through which the consumer can cancel. This is the minimal surface the
//! harness needs; the full operator algebra of a reactive library is out of
//! scope here.

use crate::stream_error::StreamError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A push-based event source.
///
/// Implementations must uphold the terminal contract: after delivering an
/// error or a completion to an observer, no further notifications reach that
/// observer, and its subscription reports closed.
pub trait Observable<T> {
    /// Attaches `observer` to this source and returns a cancellation handle.
    fn subscribe(&self, observer: Observer<T>) -> Subscription;
}

/// The three-callback consumer side of an [`Observable`].
pub struct Observer<T> {
    on_value: Box<dyn FnMut(T) + Send>,
    on_error: Box<dyn FnMut(StreamError) + Send>,
    on_complete: Box<dyn FnMut() + Send>,
}

impl<T> Observer<T> {
    /// Creates an observer from all three callbacks.
    pub fn new(
        on_value: impl FnMut(T) + Send + 'static,
        on_error: impl FnMut(StreamError) + Send + 'static,
        on_complete: impl FnMut() + Send + 'static,
    ) -> Self {
        Self {
            on_value: Box::new(on_value),
            on_error: Box::new(on_error),
            on_complete: Box::new(on_complete),
        }
    }

    /// Creates an observer that only cares about values.
    ///
    /// Errors and completion are silently ignored, as in test code that
    /// collects emissions and asserts on them afterwards.
    pub fn values(on_value: impl FnMut(T) + Send + 'static) -> Self {
        Self::new(on_value, |_| {}, || {})
    }

    /// Creates an observer that ignores every notification.
    pub fn noop() -> Self {
        Self::values(|_| {})
    }

    /// Delivers a value notification.
    pub fn next(&mut self, value: T) {
        (self.on_value)(value);
    }

    /// Delivers an error notification.
    pub fn error(&mut self, error: StreamError) {
        (self.on_error)(error);
    }

    /// Delivers a completion notification.
    pub fn complete(&mut self) {
        (self.on_complete)();
    }
}

impl<T> std::fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer").finish_non_exhaustive()
    }
}

/// A cancellation handle for one `subscribe` call.
///
/// The `closed` flag is shared with the producing observable: it flips to
/// `true` either when the consumer unsubscribes or when a terminal event is
/// delivered. Already-scheduled deliveries check the flag and become no-ops
/// once it is set.
///
/// Dropping a `Subscription` does *not* unsubscribe; cancellation is always
/// explicit, so a test can discard the handle and still observe the full
/// timeline.
pub struct Subscription {
    closed: Arc<AtomicBool>,
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Creates a subscription whose only cancellation effect is flipping the
    /// shared `closed` flag.
    pub fn new(closed: Arc<AtomicBool>) -> Self {
        Self {
            closed,
            teardown: None,
        }
    }

    /// Creates a subscription that additionally runs `teardown` on the first
    /// `unsubscribe` call.
    pub fn with_teardown(closed: Arc<AtomicBool>, teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            closed,
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Returns `true` once the subscription has terminated or has been
    /// explicitly unsubscribed.
    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Cancels the subscription.
    ///
    /// Idempotent: the teardown runs at most once, and the `closed` flag
    /// stays set.
    pub fn unsubscribe(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.closed())
            .finish_non_exhaustive()
    }
}
