// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A virtual-time clock for deterministic stream testing.
//!
//! Time here is an integer frame counter that only moves when the owner
//! drains the action queue. There is no wall-clock involvement, no real
//! parallelism and no blocking: "concurrency" is the simulated interleaving
//! of logically-overlapping producers multiplexed onto one thread through the
//! queue.
//!
//! # Example
//!
//! ```
//! use marbles_clock::VirtualClock;
//!
//! let clock = VirtualClock::new();
//! let probe = std::sync::Arc::new(std::sync::atomic::AtomicI64::new(0));
//!
//! let p = probe.clone();
//! let at_fired = clock.clone();
//! clock.schedule(5, move || {
//!     p.store(at_fired.now(), std::sync::atomic::Ordering::SeqCst);
//! }).unwrap();
//!
//! clock.flush();
//! assert_eq!(probe.load(std::sync::atomic::Ordering::SeqCst), 5);
//! assert_eq!(clock.now(), 5);
//! ```

pub mod action;
pub mod virtual_clock;

pub use self::action::ScheduledAction;
pub use self::virtual_clock::VirtualClock;
