// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core vocabulary for marble-diagram stream testing.
//!
//! This crate defines the shared types every other `marbles-*` crate builds
//! on: virtual-time [`Frame`]s, the [`TestEvent`] notification variants, the
//! frame-stamped [`TimedEvent`], [`SubscriptionWindow`]s and their shared
//! [`SubscriptionLog`], the push-based [`Observable`] contract, and the root
//! [`MarbleError`] type.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub mod error;
pub mod into_stream;
pub mod logging;
pub mod observable;
pub mod stream_error;
pub mod subscription_window;
pub mod test_event;
pub mod timed_event;

pub use self::error::{MarbleError, Result};
pub use self::into_stream::SubscribeStream;
pub use self::observable::{Observable, Observer, Subscription};
pub use self::stream_error::StreamError;
pub use self::subscription_window::{SubscriptionLog, SubscriptionWindow};
pub use self::test_event::TestEvent;
pub use self::timed_event::{Frame, TimedEvent};
