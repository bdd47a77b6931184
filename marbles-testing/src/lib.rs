// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Deterministic marble testing for push-based streams.
//!
//! This crate assembles the pieces defined in `marbles-core`,
//! `marbles-parser` and `marbles-clock` into the harness a test actually
//! touches: a [`MarbleScheduler`] owning one [`VirtualClock`](marbles_clock::VirtualClock)
//! per test, factories for [`ColdObservable`] and [`HotObservable`] sources,
//! and deferred expectations compared at flush time through an
//! [`ExpectationSink`].
//!
//! # Example
//!
//! ```
//! use marbles_testing::{AssertEqSink, MarbleScheduler};
//! use std::collections::HashMap;
//!
//! MarbleScheduler::run(AssertEqSink, |scheduler| {
//!     let values = HashMap::from([('a', 1), ('b', 2), ('c', 3)]);
//!     let source = scheduler.cold("-a-b-(c|)", &values).unwrap();
//!
//!     scheduler
//!         .expect_observable(source)
//!         .to_be("-a-b-(c|)", &values)
//!         .unwrap();
//! });
//! ```

pub mod cold;
pub mod expectation;
pub mod hot;
pub mod scheduler;
pub mod sink;

pub use self::cold::ColdObservable;
pub use self::expectation::{ObservableExpectation, SubscriptionExpectation};
pub use self::hot::HotObservable;
pub use self::scheduler::{MarbleScheduler, SchedulerConfig};
pub use self::sink::{AssertEqSink, CollectingSink, ComparisonOutcome, ExpectationSink};
