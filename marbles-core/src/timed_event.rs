// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::stream_error::StreamError;
use crate::test_event::TestEvent;

/// One unit of virtual time.
///
/// Frames are signed: events of a hot diagram declared before the `^`
/// subscription anchor occupy negative frames. The virtual clock itself never
/// runs backwards, so negative frames are never executed, only declared.
pub type Frame = i64;

/// A [`TestEvent`] paired with the virtual-time frame at which it occurs.
///
/// Sequences of timed events are ordered by non-decreasing frame; events
/// sharing a frame keep their declaration order. A sequence contains at most
/// one terminal event ([`TestEvent::Complete`] or [`TestEvent::Error`]) and,
/// if present, it is the last element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent<T> {
    /// The virtual frame at which the event fires.
    pub frame: Frame,
    /// The notification itself.
    pub event: TestEvent<T>,
}

impl<T> TimedEvent<T> {
    /// Creates a timed event from its parts.
    pub fn new(frame: Frame, event: TestEvent<T>) -> Self {
        Self { frame, event }
    }

    /// Shorthand for a `Value` event.
    pub fn value(frame: Frame, value: T) -> Self {
        Self::new(frame, TestEvent::Value(value))
    }

    /// Shorthand for an `Error` event.
    pub fn error(frame: Frame, error: StreamError) -> Self {
        Self::new(frame, TestEvent::Error(error))
    }

    /// Shorthand for a `Complete` event.
    pub fn complete(frame: Frame) -> Self {
        Self::new(frame, TestEvent::Complete)
    }

    /// Returns `true` if this event ends the sequence.
    pub fn is_terminal(&self) -> bool {
        self.event.is_terminal()
    }
}
