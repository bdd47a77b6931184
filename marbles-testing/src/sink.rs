// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Assertion sinks: where flush-time comparisons are reported.
//!
//! The harness never decides how a mismatch should surface; it hands both
//! sequences, as structured data, to an [`ExpectationSink`] supplied by the
//! surrounding test framework. The default [`AssertEqSink`] panics through
//! `assert_eq!`; the [`CollectingSink`] records outcomes instead, which is
//! how the harness tests itself.

use marbles_core::{SubscriptionWindow, TimedEvent};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;

/// Receives deferred comparisons at flush time and decides pass/fail.
pub trait ExpectationSink<T>: Send + Sync + 'static {
    /// Compares an observed event sequence against the expected one.
    fn assert_events(&self, actual: &[TimedEvent<T>], expected: &[TimedEvent<T>]);

    /// Compares recorded subscription windows against the expected ones.
    fn assert_subscriptions(&self, actual: &[SubscriptionWindow], expected: &[SubscriptionWindow]);
}

/// The default sink: structural equality via `assert_eq!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertEqSink;

impl<T> ExpectationSink<T> for AssertEqSink
where
    T: PartialEq + Debug + 'static,
{
    fn assert_events(&self, actual: &[TimedEvent<T>], expected: &[TimedEvent<T>]) {
        assert_eq!(actual, expected, "observed events differ from the diagram");
    }

    fn assert_subscriptions(&self, actual: &[SubscriptionWindow], expected: &[SubscriptionWindow]) {
        assert_eq!(
            actual, expected,
            "observed subscription windows differ from the diagrams"
        );
    }
}

/// The result of one deferred comparison, rendered for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonOutcome {
    /// Whether the two structures were equal.
    pub matched: bool,
    /// Debug rendering of the observed structure.
    pub actual: String,
    /// Debug rendering of the expected structure.
    pub expected: String,
}

/// A sink that records comparisons instead of panicking.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    outcomes: Arc<Mutex<Vec<ComparisonOutcome>>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The comparisons observed so far, in registration order.
    pub fn outcomes(&self) -> Vec<ComparisonOutcome> {
        self.outcomes.lock().clone()
    }

    /// Returns `true` if every recorded comparison matched.
    pub fn all_matched(&self) -> bool {
        self.outcomes.lock().iter().all(|outcome| outcome.matched)
    }

    fn record<A: PartialEq + Debug>(&self, actual: &A, expected: &A) {
        self.outcomes.lock().push(ComparisonOutcome {
            matched: actual == expected,
            actual: format!("{actual:?}"),
            expected: format!("{expected:?}"),
        });
    }
}

impl<T> ExpectationSink<T> for CollectingSink
where
    T: PartialEq + Debug + 'static,
{
    fn assert_events(&self, actual: &[TimedEvent<T>], expected: &[TimedEvent<T>]) {
        self.record(&actual, &expected);
    }

    fn assert_subscriptions(&self, actual: &[SubscriptionWindow], expected: &[SubscriptionWindow]) {
        self.record(&actual, &expected);
    }
}
