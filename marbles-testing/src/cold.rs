// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cold marble sources: the timeline restarts for every subscriber.

use marbles_clock::VirtualClock;
use marbles_core::{log_error, Observable, Observer, Subscription, TestEvent, TimedEvent};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cold observable built from a parsed marble diagram.
///
/// Every `subscribe` call schedules the whole diagram on the owning clock
/// relative to the frame at which that call happens: frame 0 of the diagram
/// is the subscriber's own subscribe frame. Re-subscribing replays the
/// timeline from scratch, the defining property of a cold source.
#[derive(Debug, Clone)]
pub struct ColdObservable<T> {
    clock: VirtualClock,
    events: Arc<Vec<TimedEvent<T>>>,
}

impl<T> ColdObservable<T> {
    /// Creates a cold source over `events`, scheduling on `clock`.
    ///
    /// The event sequence must honor the usual invariants (non-decreasing
    /// non-negative frames, at most one terminal event, terminal last); the
    /// parser guarantees them for diagram-derived sequences.
    pub fn new(clock: VirtualClock, events: Vec<TimedEvent<T>>) -> Self {
        Self {
            clock,
            events: Arc::new(events),
        }
    }

    /// The parsed timeline this source replays.
    pub fn events(&self) -> &[TimedEvent<T>] {
        &self.events
    }
}

impl<T> Observable<T> for ColdObservable<T>
where
    T: Clone + Send + 'static,
{
    fn subscribe(&self, observer: Observer<T>) -> Subscription {
        let base = self.clock.now();
        let closed = Arc::new(AtomicBool::new(false));
        let observer = Arc::new(Mutex::new(observer));

        for event in self.events.iter() {
            let event = event.clone();
            let closed = closed.clone();
            let observer = observer.clone();
            let scheduled = self.clock.schedule(base + event.frame, move || {
                if closed.load(Ordering::SeqCst) {
                    return;
                }
                let mut observer = observer.lock();
                match event.event {
                    TestEvent::Value(value) => observer.next(value),
                    TestEvent::Error(error) => {
                        closed.store(true, Ordering::SeqCst);
                        observer.error(error);
                    }
                    TestEvent::Complete => {
                        closed.store(true, Ordering::SeqCst);
                        observer.complete();
                    }
                }
            });
            if let Err(e) = scheduled {
                // Unreachable for a parser-produced sequence; surfaced for
                // hand-built ones.
                log_error!("cold observable could not schedule emission: {e}");
            }
        }

        Subscription::new(closed)
    }
}
