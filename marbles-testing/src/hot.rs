// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot marble sources: one shared timeline, observed partially by each
//! subscriber.

use marbles_clock::VirtualClock;
use marbles_core::{
    log_error, Observable, Observer, Subscription, SubscriptionLog, TestEvent, TimedEvent,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct HotSubscriber<T> {
    observer: Observer<T>,
    closed: Arc<AtomicBool>,
    window: usize,
}

struct HotState<T> {
    subscribers: Vec<HotSubscriber<T>>,
    terminated: bool,
}

/// A hot observable built from a parsed marble diagram.
///
/// The timeline is scheduled exactly once, by
/// [`schedule_timeline`](Self::schedule_timeline), anchored at the diagram's
/// `^` (or its first character when no anchor is present). Events parsed to
/// negative frames lie
/// before the anchor and are never scheduled. Subscribers attached at
/// different frames each see the part of the broadcast occurring at or after
/// their own subscribe frame, including events at the subscribe frame itself.
///
/// Terminal events are global: one `Complete` or `Error` on the timeline
/// closes every active subscriber at once. A consumer subscribing after the
/// terminal frame is immediately inert: it receives nothing and its
/// subscription reports closed from the start.
///
/// Every subscribe/unsubscribe pair is recorded in the companion
/// [`SubscriptionLog`], which the expectation engine snapshots at flush time.
#[derive(Clone)]
pub struct HotObservable<T> {
    clock: VirtualClock,
    state: Arc<Mutex<HotState<T>>>,
    log: SubscriptionLog,
    events: Arc<Vec<TimedEvent<T>>>,
}

impl<T> HotObservable<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a hot source over `events`.
    ///
    /// The timeline is not queued yet; call
    /// [`schedule_timeline`](Self::schedule_timeline) to put it on the clock.
    pub fn new(clock: VirtualClock, events: Vec<TimedEvent<T>>) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(HotState {
                subscribers: Vec::new(),
                terminated: false,
            })),
            log: SubscriptionLog::new(),
            events: Arc::new(events),
        }
    }

    /// The parsed timeline this source broadcasts.
    pub fn events(&self) -> &[TimedEvent<T>] {
        &self.events
    }

    /// Handle to the subscription log; all clones share the same entries.
    pub fn subscriptions(&self) -> SubscriptionLog {
        self.log.clone()
    }

    /// Schedules every event at a non-negative frame on the clock.
    ///
    /// The owning scheduler calls this once, at the start of a flush: by then
    /// the test body has queued its subscribe and unsubscribe actions, so
    /// those run ahead of timeline events sharing their frame.
    pub fn schedule_timeline(&self) {
        for event in self.events.iter() {
            if event.frame < 0 {
                // Declared before the anchor; already in the past at frame 0.
                continue;
            }
            let event = event.clone();
            let state = self.state.clone();
            let log = self.log.clone();
            let scheduled = self.clock.schedule(event.frame, move || {
                broadcast(&state, &log, &event);
            });
            if let Err(e) = scheduled {
                log_error!("hot observable could not schedule emission: {e}");
            }
        }
    }
}

fn broadcast<T: Clone>(
    state: &Mutex<HotState<T>>,
    log: &SubscriptionLog,
    event: &TimedEvent<T>,
) {
    let mut state = state.lock();
    if state.terminated {
        return;
    }

    for subscriber in &mut state.subscribers {
        if subscriber.closed.load(Ordering::SeqCst) {
            continue;
        }
        match &event.event {
            TestEvent::Value(value) => subscriber.observer.next(value.clone()),
            TestEvent::Error(error) => subscriber.observer.error(error.clone()),
            TestEvent::Complete => subscriber.observer.complete(),
        }
    }

    if event.is_terminal() {
        state.terminated = true;
        for subscriber in &state.subscribers {
            subscriber.closed.store(true, Ordering::SeqCst);
            log.close(subscriber.window, event.frame);
        }
        state.subscribers.clear();
    }
}

impl<T> Observable<T> for HotObservable<T>
where
    T: Clone + Send + 'static,
{
    fn subscribe(&self, observer: Observer<T>) -> Subscription {
        let frame = self.clock.now();
        let window = self.log.open(frame);
        let mut state = self.state.lock();

        if state.terminated {
            // The broadcast is over; the consumer is inert from the start.
            return Subscription::new(Arc::new(AtomicBool::new(true)));
        }

        let closed = Arc::new(AtomicBool::new(false));
        state.subscribers.push(HotSubscriber {
            observer,
            closed: closed.clone(),
            window,
        });
        drop(state);

        let state = self.state.clone();
        let log = self.log.clone();
        let clock = self.clock.clone();
        let flag = closed.clone();
        Subscription::with_teardown(closed, move || {
            let mut state = state.lock();
            state
                .subscribers
                .retain(|subscriber| !Arc::ptr_eq(&subscriber.closed, &flag));
            log.close(window, clock.now());
        })
    }
}

impl<T> std::fmt::Debug for HotObservable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HotObservable")
            .field("events", &self.events.len())
            .field("subscribers", &state.subscribers.len())
            .field("terminated", &state.terminated)
            .finish()
    }
}
