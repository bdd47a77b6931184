// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Marbles
//!
//! Deterministic, virtual-time testing for push-based event streams using
//! marble diagrams.
//!
//! ## Overview
//!
//! A marble diagram describes, frame for frame, the values, completion and
//! errors a stream produces. The harness parses the diagram, replays it on a
//! virtual clock and asserts that a stream under test matches it exactly. No
//! wall-clock time is involved: a test over "seconds" of stream activity runs
//! in microseconds and never flakes.
//!
//! ## Quick start
//!
//! ```rust
//! use marbles_rx::run;
//! use std::collections::HashMap;
//!
//! run(|scheduler| {
//!     let values = HashMap::from([('a', 10), ('b', 20)]);
//!     let source = scheduler.cold("-a-b-|", &values).unwrap();
//!
//!     scheduler
//!         .expect_observable(source)
//!         .to_be("-a-b-|", &values)
//!         .unwrap();
//! });
//! ```

// Re-export core types
pub use marbles_core::{
    Frame, MarbleError, Observable, Observer, Result, StreamError, SubscribeStream, Subscription,
    SubscriptionLog, SubscriptionWindow, TestEvent, TimedEvent,
};

// Re-export the parser and clock
pub use marbles_clock::VirtualClock;
pub use marbles_parser::{parse_events, parse_subscription, ParserConfig};

// Re-export the harness
pub use marbles_testing::{
    AssertEqSink, CollectingSink, ColdObservable, ComparisonOutcome, ExpectationSink,
    HotObservable, MarbleScheduler, SchedulerConfig,
};

/// Runs `body` against a fresh run-scope scheduler with the default
/// `assert_eq!`-based sink.
///
/// Shorthand for `MarbleScheduler::run(AssertEqSink, body)`.
pub fn run<T, R>(body: impl FnOnce(&MarbleScheduler<T, AssertEqSink>) -> R) -> R
where
    T: Clone + Send + PartialEq + std::fmt::Debug + 'static,
{
    MarbleScheduler::run(AssertEqSink, body)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::run;
    pub use marbles_core::{
        Observable, Observer, StreamError, SubscribeStream, Subscription, TestEvent, TimedEvent,
    };
    pub use marbles_testing::{AssertEqSink, ExpectationSink, MarbleScheduler, SchedulerConfig};
}
