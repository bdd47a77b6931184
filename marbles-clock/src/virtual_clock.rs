// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::action::ScheduledAction;
use marbles_core::{Frame, MarbleError, Result};
use parking_lot::Mutex;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

struct ClockState {
    now: Frame,
    next_sequence: u64,
    queue: BinaryHeap<Reverse<ScheduledAction>>,
}

/// An integer-frame virtual clock with an ordered action queue.
///
/// The clock is a cheap-clone handle; all clones share the same queue. It is
/// created fresh for each test run and discarded after the final flush, so no
/// state survives across tests. The queue lock is released around every
/// action, which lets a running action schedule further work, including work
/// at the frame currently executing.
#[derive(Clone, Default)]
pub struct VirtualClock {
    state: Arc<Mutex<ClockState>>,
}

impl Default for ClockState {
    fn default() -> Self {
        Self {
            now: 0,
            next_sequence: 0,
            queue: BinaryHeap::new(),
        }
    }
}

impl VirtualClock {
    /// Creates a clock at frame 0 with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current virtual frame.
    pub fn now(&self) -> Frame {
        self.state.lock().now
    }

    /// Number of actions still queued.
    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Enqueues `work` to run at `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`MarbleError::NegativeFrame`] if the clock has already
    /// advanced past `frame`.
    pub fn schedule(&self, frame: Frame, work: impl FnOnce() + Send + 'static) -> Result<()> {
        let mut state = self.state.lock();
        if frame < state.now {
            return Err(MarbleError::negative_frame(frame, state.now));
        }
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state
            .queue
            .push(Reverse(ScheduledAction::new(frame, sequence, work)));
        Ok(())
    }

    /// Drains the queue to exhaustion, advancing `now` to each action's frame
    /// before running it.
    ///
    /// Actions scheduled by a running action are picked up within the same
    /// flush, including actions at the currently executing frame. Once the
    /// queue is empty the call is a no-op, so flushing twice is harmless.
    pub fn flush(&self) {
        self.drain(None);
    }

    /// Drains the queue like [`flush`](Self::flush) but stops after `frame`.
    ///
    /// Actions due later than `frame` stay queued for a subsequent drain.
    /// `now` ends up at `frame` even when the queue ran dry earlier.
    pub fn advance_to(&self, frame: Frame) {
        self.drain(Some(frame));
        let mut state = self.state.lock();
        if state.now < frame {
            state.now = frame;
        }
    }

    fn drain(&self, limit: Option<Frame>) {
        loop {
            let action = {
                let mut state = self.state.lock();
                let due = match state.queue.peek() {
                    Some(Reverse(head)) => limit.map_or(true, |l| head.frame() <= l),
                    None => false,
                };
                if !due {
                    break;
                }
                match state.queue.pop() {
                    Some(Reverse(action)) => {
                        state.now = action.frame();
                        action
                    }
                    None => break,
                }
            };
            // Lock released: the action may reschedule onto this clock.
            action.run();
        }
    }
}

impl std::fmt::Debug for VirtualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("VirtualClock")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}
