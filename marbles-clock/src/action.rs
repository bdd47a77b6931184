// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use marbles_core::Frame;

/// A unit of work queued on the [`VirtualClock`](crate::VirtualClock).
///
/// Actions order by `(frame, sequence)`. The sequence number is assigned
/// monotonically at scheduling time, so actions sharing a frame run in the
/// order they were scheduled (FIFO).
pub struct ScheduledAction {
    frame: Frame,
    sequence: u64,
    work: Box<dyn FnOnce() + Send>,
}

impl ScheduledAction {
    /// Creates an action to run at `frame`.
    pub fn new(frame: Frame, sequence: u64, work: impl FnOnce() + Send + 'static) -> Self {
        Self {
            frame,
            sequence,
            work: Box::new(work),
        }
    }

    /// The frame at which the action is due.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// The FIFO tiebreaker among actions sharing a frame.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Consumes the action and runs its work.
    pub fn run(self) {
        (self.work)();
    }
}

impl PartialEq for ScheduledAction {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.sequence == other.sequence
    }
}

impl Eq for ScheduledAction {}

impl PartialOrd for ScheduledAction {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledAction {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.frame, self.sequence).cmp(&(other.frame, other.sequence))
    }
}

impl std::fmt::Debug for ScheduledAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledAction")
            .field("frame", &self.frame)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}
