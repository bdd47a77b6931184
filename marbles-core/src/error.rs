// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::timed_event::Frame;

/// Root error type for all marble-harness operations.
///
/// Every variant reports a fault in the *test author's input* and fails fast:
/// diagram syntax errors surface at parse time, scheduling errors at schedule
/// time, never at flush time. Modeled stream failures are not represented
/// here; they travel as [`StreamError`](crate::StreamError) data through the
/// normal error channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarbleError {
    /// The diagram violates the marble grammar.
    ///
    /// Raised for an unmatched group delimiter, an event following a terminal
    /// token inside a synchronous group, a duplicate `^` anchor, an
    /// unsubscribe marker in a value diagram, or a value token in a
    /// subscription diagram.
    #[error("malformed diagram at position {position}: {reason}")]
    MalformedDiagram {
        /// Character offset of the offending token.
        position: usize,
        /// What the parser expected instead.
        reason: String,
    },

    /// A bare character has no entry in the supplied value map.
    #[error("unknown token '{token}' at position {position}: no entry in the value map")]
    UnknownToken {
        /// The unrecognized character.
        token: char,
        /// Character offset of the token.
        position: usize,
    },

    /// An action was scheduled at a frame the clock has already passed.
    #[error("cannot schedule at frame {requested}: clock has already advanced to frame {current}")]
    NegativeFrame {
        /// The frame the caller asked for.
        requested: Frame,
        /// Where the clock currently stands.
        current: Frame,
    },
}

impl MarbleError {
    /// Creates a `MalformedDiagram` error.
    pub fn malformed(position: usize, reason: impl Into<String>) -> Self {
        Self::MalformedDiagram {
            position,
            reason: reason.into(),
        }
    }

    /// Creates an `UnknownToken` error.
    pub fn unknown_token(token: char, position: usize) -> Self {
        Self::UnknownToken { token, position }
    }

    /// Creates a `NegativeFrame` error.
    pub fn negative_frame(requested: Frame, current: Frame) -> Self {
        Self::NegativeFrame { requested, current }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = core::result::Result<T, MarbleError>;
