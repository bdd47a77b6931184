// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Deferred expectations: subscribe, record, compare at flush.

use crate::scheduler::{MarbleScheduler, PendingComparison};
use crate::sink::ExpectationSink;
use marbles_clock::VirtualClock;
use marbles_core::{
    Observable, Observer, Result, StreamError, Subscription, SubscriptionLog, SubscriptionWindow,
    TimedEvent,
};
use marbles_parser::{parse_events, parse_subscription};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// A pending assertion on a stream under test.
///
/// Created by [`MarbleScheduler::expect_observable`]. Calling
/// [`to_be`](Self::to_be) does not compare anything yet: it schedules the
/// subscription (at frame 0, or per [`subscribed_as`](Self::subscribed_as)),
/// records every delivered notification with the frame at which it arrived,
/// and defers the structural comparison to flush time.
#[must_use = "an expectation does nothing until `to_be` is called"]
pub struct ObservableExpectation<'a, T, S: ExpectationSink<T>, O> {
    scheduler: &'a MarbleScheduler<T, S>,
    source: O,
    subscription: Option<String>,
}

impl<'a, T, S, O> ObservableExpectation<'a, T, S, O>
where
    T: Clone + Send + PartialEq + Debug + 'static,
    S: ExpectationSink<T>,
    O: Observable<T> + Send + 'static,
{
    pub(crate) fn new(scheduler: &'a MarbleScheduler<T, S>, source: O) -> Self {
        Self {
            scheduler,
            source,
            subscription: None,
        }
    }

    /// Subscribes per the given subscription diagram instead of at frame 0.
    ///
    /// The diagram's `^` sets the subscribe frame; a `!` additionally
    /// schedules an unsubscribe.
    pub fn subscribed_as(mut self, diagram: impl Into<String>) -> Self {
        self.subscription = Some(diagram.into());
        self
    }

    /// Registers the expected diagram for comparison at flush time.
    ///
    /// # Errors
    ///
    /// Diagram syntax errors surface here, before anything is scheduled.
    pub fn to_be(self, diagram: &str, values: &HashMap<char, T>) -> Result<()> {
        self.register(diagram, values, None)
    }

    /// Like [`to_be`](Self::to_be), with an explicit error payload for `#`.
    pub fn to_be_with_error(
        self,
        diagram: &str,
        values: &HashMap<char, T>,
        error: StreamError,
    ) -> Result<()> {
        self.register(diagram, values, Some(error))
    }

    fn register(
        self,
        diagram: &str,
        values: &HashMap<char, T>,
        error: Option<StreamError>,
    ) -> Result<()> {
        let parser_config = self.scheduler.expected_parser_config();
        let expected = parse_events(diagram, values, error, &parser_config)?;
        let window = match &self.subscription {
            Some(subscription) => parse_subscription(subscription, &parser_config)?,
            None => SubscriptionWindow::open(0),
        };

        let actual: Arc<Mutex<Vec<TimedEvent<T>>>> = Arc::new(Mutex::new(Vec::new()));

        let clock = self.scheduler.clock.clone();
        let source = self.source;
        let recorded = actual.clone();
        let recording_clock = clock.clone();

        // Both actions go on the queue now: the unsubscribe has to run ahead
        // of any delivery the subscribe call enqueues for the same frame.
        let handle: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let subscribe_handle = handle.clone();
        clock.schedule(window.subscribed, move || {
            let observer = recording_observer(recording_clock, recorded);
            *subscribe_handle.lock() = Some(source.subscribe(observer));
        })?;
        if let Some(end) = window.unsubscribed {
            clock.schedule(end, move || {
                if let Some(mut subscription) = handle.lock().take() {
                    subscription.unsubscribe();
                }
            })?;
        }

        self.scheduler
            .pending
            .lock()
            .push(PendingComparison::Events { actual, expected });
        Ok(())
    }
}

/// An observer that frame-stamps everything it sees.
fn recording_observer<T: Send + 'static>(
    clock: VirtualClock,
    into: Arc<Mutex<Vec<TimedEvent<T>>>>,
) -> Observer<T> {
    let value_clock = clock.clone();
    let value_into = into.clone();
    let error_clock = clock.clone();
    let error_into = into.clone();

    Observer::new(
        move |value| {
            value_into
                .lock()
                .push(TimedEvent::value(value_clock.now(), value));
        },
        move |error| {
            error_into
                .lock()
                .push(TimedEvent::error(error_clock.now(), error));
        },
        move || {
            into.lock().push(TimedEvent::complete(clock.now()));
        },
    )
}

/// A pending assertion on a hot source's subscription log.
#[must_use = "an expectation does nothing until `to_be` is called"]
pub struct SubscriptionExpectation<'a, T, S: ExpectationSink<T>> {
    scheduler: &'a MarbleScheduler<T, S>,
    log: SubscriptionLog,
}

impl<'a, T, S> SubscriptionExpectation<'a, T, S>
where
    T: Clone + Send + 'static,
    S: ExpectationSink<T>,
{
    pub(crate) fn new(scheduler: &'a MarbleScheduler<T, S>, log: SubscriptionLog) -> Self {
        Self { scheduler, log }
    }

    /// Registers the expected subscription diagrams, one per window, in
    /// subscription order.
    ///
    /// The log is snapshotted at flush time, so windows opened or closed
    /// during the flush are included.
    ///
    /// # Errors
    ///
    /// Diagram syntax errors surface here, before the comparison is queued.
    pub fn to_be(self, diagrams: &[&str]) -> Result<()> {
        let parser_config = self.scheduler.expected_parser_config();
        let expected = diagrams
            .iter()
            .map(|diagram| parse_subscription(diagram, &parser_config))
            .collect::<Result<Vec<_>>>()?;

        self.scheduler
            .pending
            .lock()
            .push(PendingComparison::Subscriptions {
                log: self.log,
                expected,
            });
        Ok(())
    }
}
