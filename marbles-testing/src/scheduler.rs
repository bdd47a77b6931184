// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The per-test run harness.

use crate::cold::ColdObservable;
use crate::expectation::{ObservableExpectation, SubscriptionExpectation};
use crate::hot::HotObservable;
use crate::sink::ExpectationSink;
use marbles_clock::VirtualClock;
use marbles_core::{
    Frame, MarbleError, Observable, Result, StreamError, SubscriptionLog, SubscriptionWindow,
    TimedEvent,
};
use marbles_parser::{parse_events, ParserConfig};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Calibration of a [`MarbleScheduler`].
///
/// The two calibrations in the wild differ only here: inside a dedicated run
/// scope one character is 1 virtual-time unit and the harness flushes by
/// itself when the body returns; standalone, one character is 10 units and
/// the caller flushes explicitly. Same engine either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Virtual-time units represented by one diagram character.
    pub frame_time_factor: u64,
    /// Whether the harness flushes automatically at the end of a run body.
    pub auto_flush: bool,
}

impl SchedulerConfig {
    /// Run-scope calibration: factor 1, automatic flush.
    pub fn run_scope() -> Self {
        Self {
            frame_time_factor: 1,
            auto_flush: true,
        }
    }

    /// Standalone calibration: factor 10, explicit flush.
    pub fn standalone() -> Self {
        Self {
            frame_time_factor: 10,
            auto_flush: false,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::standalone()
    }
}

pub(crate) enum PendingComparison<T> {
    Events {
        actual: Arc<Mutex<Vec<TimedEvent<T>>>>,
        expected: Vec<TimedEvent<T>>,
    },
    Subscriptions {
        log: SubscriptionLog,
        expected: Vec<SubscriptionWindow>,
    },
}

/// A virtual-time test harness for one test run.
///
/// The scheduler owns a freshly constructed [`VirtualClock`], builds cold and
/// hot sources whose emissions are clock-scheduled, and registers deferred
/// expectations that are compared when the clock flushes. Nothing is global:
/// discard the scheduler and every trace of the run goes with it.
pub struct MarbleScheduler<T, S: ExpectationSink<T>> {
    pub(crate) clock: VirtualClock,
    config: SchedulerConfig,
    pub(crate) sink: Arc<S>,
    pub(crate) pending: Arc<Mutex<Vec<PendingComparison<T>>>>,
    timelines: Arc<Mutex<Vec<HotObservable<T>>>>,
}

impl<T, S> MarbleScheduler<T, S>
where
    T: Clone + Send + 'static,
    S: ExpectationSink<T>,
{
    /// Creates a standalone scheduler (factor 10, explicit flush).
    pub fn new(sink: S) -> Self {
        Self::with_config(SchedulerConfig::default(), sink)
    }

    /// Creates a scheduler with an explicit calibration.
    pub fn with_config(config: SchedulerConfig, sink: S) -> Self {
        Self {
            clock: VirtualClock::new(),
            config,
            sink: Arc::new(sink),
            pending: Arc::new(Mutex::new(Vec::new())),
            timelines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Runs `body` against a fresh run-scope scheduler and flushes afterwards.
    ///
    /// Inside the body one diagram character equals one virtual-time unit and
    /// expected diagrams may use time-progression syntax (`<n>ms`, spaces).
    /// All expectations registered by the body are evaluated before `run`
    /// returns.
    pub fn run<R>(sink: S, body: impl FnOnce(&Self) -> R) -> R {
        let scheduler = Self::with_config(SchedulerConfig::run_scope(), sink);
        let result = body(&scheduler);
        if scheduler.config.auto_flush {
            scheduler.flush();
        }
        result
    }

    /// The clock owned by this scheduler.
    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    /// Current virtual frame of the owned clock.
    pub fn now(&self) -> Frame {
        self.clock.now()
    }

    /// The calibration this scheduler was built with.
    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Parser calibration for source (cold/hot) diagrams: plain notation.
    pub(crate) fn source_parser_config(&self) -> ParserConfig {
        ParserConfig::new(self.config.frame_time_factor, false)
    }

    /// Parser calibration for expected diagrams: time progression allowed.
    pub(crate) fn expected_parser_config(&self) -> ParserConfig {
        ParserConfig::new(self.config.frame_time_factor, true)
    }

    /// Builds a cold source from a marble diagram.
    ///
    /// # Errors
    ///
    /// Fails fast on diagram syntax errors; additionally rejects `^`, which
    /// has no meaning on a subscriber-relative timeline.
    pub fn cold(&self, diagram: &str, values: &HashMap<char, T>) -> Result<ColdObservable<T>> {
        self.cold_inner(diagram, values, None)
    }

    /// Builds a cold source whose `#` token carries `error`.
    pub fn cold_with_error(
        &self,
        diagram: &str,
        values: &HashMap<char, T>,
        error: StreamError,
    ) -> Result<ColdObservable<T>> {
        self.cold_inner(diagram, values, Some(error))
    }

    fn cold_inner(
        &self,
        diagram: &str,
        values: &HashMap<char, T>,
        error: Option<StreamError>,
    ) -> Result<ColdObservable<T>> {
        if let Some(position) = diagram.chars().position(|c| c == '^') {
            return Err(MarbleError::malformed(
                position,
                "subscription anchor in a cold diagram",
            ));
        }
        let events = parse_events(diagram, values, error, &self.source_parser_config())?;
        Ok(ColdObservable::new(self.clock.clone(), events))
    }

    /// Builds a hot source from a marble diagram.
    ///
    /// The timeline is anchored at the diagram's `^` (or at frame 0 when no
    /// anchor is present) and lands on the clock when the next flush begins,
    /// after the test body has registered its expectations.
    pub fn hot(&self, diagram: &str, values: &HashMap<char, T>) -> Result<HotObservable<T>> {
        self.hot_inner(diagram, values, None)
    }

    /// Builds a hot source whose `#` token carries `error`.
    pub fn hot_with_error(
        &self,
        diagram: &str,
        values: &HashMap<char, T>,
        error: StreamError,
    ) -> Result<HotObservable<T>> {
        self.hot_inner(diagram, values, Some(error))
    }

    fn hot_inner(
        &self,
        diagram: &str,
        values: &HashMap<char, T>,
        error: Option<StreamError>,
    ) -> Result<HotObservable<T>> {
        let events = parse_events(diagram, values, error, &self.source_parser_config())?;
        let hot = HotObservable::new(self.clock.clone(), events);
        self.timelines.lock().push(hot.clone());
        Ok(hot)
    }

    /// Registers an expectation on a stream under test.
    ///
    /// Nothing happens until `to_be` is called and the clock flushes.
    pub fn expect_observable<O>(&self, source: O) -> ObservableExpectation<'_, T, S, O>
    where
        O: Observable<T> + Send + 'static,
        T: PartialEq + Debug,
    {
        ObservableExpectation::new(self, source)
    }

    /// Registers an expectation on a hot source's subscription log.
    pub fn expect_subscriptions(&self, log: &SubscriptionLog) -> SubscriptionExpectation<'_, T, S> {
        SubscriptionExpectation::new(self, log.clone())
    }

    /// Schedules the hot timelines created since the last flush, drains the
    /// clock, then evaluates every registered expectation.
    ///
    /// Hot timelines land on the queue only now, so the subscribe and
    /// unsubscribe actions registered by the test body run ahead of timeline
    /// events sharing their frame. Comparisons are handed to the
    /// [`ExpectationSink`] in registration order. Expectations are consumed:
    /// a second flush on an empty queue performs no further comparisons.
    pub fn flush(&self) {
        let timelines: Vec<HotObservable<T>> = self.timelines.lock().drain(..).collect();
        for timeline in timelines {
            timeline.schedule_timeline();
        }
        self.clock.flush();
        let pending: Vec<PendingComparison<T>> =
            self.pending.lock().drain(..).collect();
        for comparison in pending {
            match comparison {
                PendingComparison::Events { actual, expected } => {
                    self.sink.assert_events(&actual.lock(), &expected);
                }
                PendingComparison::Subscriptions { log, expected } => {
                    self.sink.assert_subscriptions(&log.snapshot(), &expected);
                }
            }
        }
    }
}

impl<T, S: ExpectationSink<T>> std::fmt::Debug for MarbleScheduler<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarbleScheduler")
            .field("clock", &self.clock)
            .field("config", &self.config)
            .field("pending", &self.pending.lock().len())
            .finish_non_exhaustive()
    }
}
