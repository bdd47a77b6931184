// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// The payload carried on a stream's error channel.
///
/// A `StreamError` models the *declared* failure of a stream under test: it
/// is delivered to observers through the normal error callback and asserted
/// by structural equality like any other event. It is deliberately distinct
/// from [`MarbleError`](crate::MarbleError), which reports faults in the test
/// author's own input and is never delivered through a stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("stream error: {message}")]
pub struct StreamError {
    message: String,
}

impl StreamError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for StreamError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for StreamError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
