// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::timed_event::Frame;
use parking_lot::Mutex;
use std::sync::Arc;

/// One subscriber's lifetime on a stream, in virtual frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionWindow {
    /// The frame at which the consumer subscribed.
    pub subscribed: Frame,
    /// The frame at which the consumer unsubscribed, or `None` if it was
    /// still attached at flush time.
    pub unsubscribed: Option<Frame>,
}

impl SubscriptionWindow {
    /// A window that is still open.
    pub fn open(subscribed: Frame) -> Self {
        Self {
            subscribed,
            unsubscribed: None,
        }
    }

    /// A window closed at `unsubscribed`.
    pub fn closed(subscribed: Frame, unsubscribed: Frame) -> Self {
        Self {
            subscribed,
            unsubscribed: Some(unsubscribed),
        }
    }

    /// Returns `true` if the consumer never unsubscribed.
    pub fn is_open(&self) -> bool {
        self.unsubscribed.is_none()
    }
}

/// Append-only log of the subscription windows observed on a hot stream.
///
/// The log is a cheap-clone handle; all clones share the same underlying
/// list. A hot observable appends an open window on every subscribe and
/// closes it on unsubscribe or on a global terminal event, so the expectation
/// engine can snapshot the log at flush time.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionLog {
    windows: Arc<Mutex<Vec<SubscriptionWindow>>>,
}

impl SubscriptionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an open window and returns its index for later closing.
    pub fn open(&self, subscribed: Frame) -> usize {
        let mut windows = self.windows.lock();
        windows.push(SubscriptionWindow::open(subscribed));
        windows.len() - 1
    }

    /// Closes the window at `index`, if it is still open.
    ///
    /// Closing an already-closed window is a no-op: a terminal event and a
    /// later explicit unsubscribe both target the same window, and the first
    /// one wins.
    pub fn close(&self, index: usize, unsubscribed: Frame) {
        let mut windows = self.windows.lock();
        if let Some(window) = windows.get_mut(index) {
            if window.unsubscribed.is_none() {
                window.unsubscribed = Some(unsubscribed);
            }
        }
    }

    /// A point-in-time copy of the recorded windows.
    pub fn snapshot(&self) -> Vec<SubscriptionWindow> {
        self.windows.lock().clone()
    }

    /// Number of windows recorded so far.
    pub fn len(&self) -> usize {
        self.windows.lock().len()
    }

    /// Returns `true` if nothing has subscribed yet.
    pub fn is_empty(&self) -> bool {
        self.windows.lock().is_empty()
    }
}
