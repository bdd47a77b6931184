// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::stream_error::StreamError;

/// A notification delivered over a stream's push channel.
///
/// This enum follows Rx-style semantics: a stream delivers any number of
/// `Value` notifications followed by at most one terminal notification,
/// either `Complete` or `Error`. Unlike a plain `Result`, errors here are
/// *data*: a declared error event is the expected outcome of an error test
/// scenario and compares structurally like any other event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestEvent<T> {
    /// A successful value emission.
    Value(T),
    /// An error that terminates the stream.
    Error(StreamError),
    /// Successful completion of the stream.
    Complete,
}

impl<T> TestEvent<T> {
    /// Returns `true` if this is a `Value`.
    pub const fn is_value(&self) -> bool {
        matches!(self, TestEvent::Value(_))
    }

    /// Returns `true` if this is an `Error`.
    pub const fn is_error(&self) -> bool {
        matches!(self, TestEvent::Error(_))
    }

    /// Returns `true` if this is a `Complete`.
    pub const fn is_complete(&self) -> bool {
        matches!(self, TestEvent::Complete)
    }

    /// Returns `true` if this notification ends the sequence.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, TestEvent::Error(_) | TestEvent::Complete)
    }

    /// Converts from `TestEvent<T>` to `Option<T>`, discarding everything
    /// that is not a value.
    pub fn ok(self) -> Option<T> {
        match self {
            TestEvent::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Converts from `TestEvent<T>` to `Option<StreamError>`, discarding
    /// everything that is not an error.
    pub fn err(self) -> Option<StreamError> {
        match self {
            TestEvent::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Maps a `TestEvent<T>` to `TestEvent<U>` by applying a function to the
    /// contained value.
    ///
    /// Terminal notifications are propagated unchanged.
    pub fn map<U, F>(self, f: F) -> TestEvent<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            TestEvent::Value(v) => TestEvent::Value(f(v)),
            TestEvent::Error(e) => TestEvent::Error(e),
            TestEvent::Complete => TestEvent::Complete,
        }
    }

    /// Maps a `TestEvent<T>` to `TestEvent<U>` by applying a function that
    /// can itself produce any notification.
    ///
    /// Terminal notifications are propagated unchanged.
    pub fn and_then<U, F>(self, f: F) -> TestEvent<U>
    where
        F: FnOnce(T) -> TestEvent<U>,
    {
        match self {
            TestEvent::Value(v) => f(v),
            TestEvent::Error(e) => TestEvent::Error(e),
            TestEvent::Complete => TestEvent::Complete,
        }
    }
}

impl<T> From<Result<T, StreamError>> for TestEvent<T> {
    fn from(result: Result<T, StreamError>) -> Self {
        match result {
            Ok(v) => TestEvent::Value(v),
            Err(e) => TestEvent::Error(e),
        }
    }
}
