// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use marbles_clock::VirtualClock;
use marbles_core::{Observable, Observer, StreamError, SubscriptionWindow, TestEvent};
use marbles_testing::{AssertEqSink, MarbleScheduler, SchedulerConfig};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

fn values() -> HashMap<char, i32> {
    HashMap::from([
        ('a', 1),
        ('b', 2),
        ('c', 3),
        ('d', 4),
        ('e', 5),
        ('f', 6),
        ('g', 7),
    ])
}

fn scheduler() -> MarbleScheduler<i32, AssertEqSink> {
    MarbleScheduler::with_config(
        SchedulerConfig {
            frame_time_factor: 1,
            auto_flush: false,
        },
        AssertEqSink,
    )
}

fn stamping_observer(
    clock: VirtualClock,
) -> (Arc<Mutex<Vec<(i64, TestEvent<i32>)>>>, Observer<i32>) {
    let seen: Arc<Mutex<Vec<(i64, TestEvent<i32>)>>> = Arc::new(Mutex::new(Vec::new()));
    let on_value = seen.clone();
    let on_error = seen.clone();
    let on_complete = seen.clone();
    let value_clock = clock.clone();
    let error_clock = clock.clone();
    let observer = Observer::new(
        move |v| {
            on_value
                .lock()
                .push((value_clock.now(), TestEvent::Value(v)));
        },
        move |e| {
            on_error
                .lock()
                .push((error_clock.now(), TestEvent::Error(e)));
        },
        move || {
            on_complete.lock().push((clock.now(), TestEvent::Complete));
        },
    );
    (seen, observer)
}

#[test]
fn test_late_subscriber_misses_earlier_events() {
    // Hot timeline "-a-b-c-d-e-f-g-" observed through window "--^-----!".
    let scheduler = scheduler();
    let source = scheduler.hot("-a-b-c-d-e-f-g-", &values()).unwrap();
    let clock = scheduler.clock().clone();

    let (seen, observer) = stamping_observer(clock.clone());
    let subscribe_source = source.clone();
    clock
        .schedule(2, move || {
            let _ = subscribe_source.subscribe(observer);
        })
        .unwrap();

    let windows = source.subscriptions();
    scheduler
        .expect_subscriptions(&windows)
        .to_be(&["--^"])
        .unwrap();

    scheduler.flush();

    // a at frame 1 was missed; the subscriber joins the broadcast at b.
    assert_eq!(
        seen.lock()[..3].to_vec(),
        vec![
            (3, TestEvent::Value(2)),
            (5, TestEvent::Value(3)),
            (7, TestEvent::Value(4)),
        ]
    );
}

#[test]
fn test_unsubscribed_consumer_receives_nothing_further() {
    let scheduler = scheduler();
    let source = scheduler.hot("-a-b-c-d-|", &values()).unwrap();
    let clock = scheduler.clock().clone();

    let (seen, observer) = stamping_observer(clock.clone());
    let subscription = Arc::new(Mutex::new(Some(source.subscribe(observer))));

    let to_cancel = subscription.clone();
    clock
        .schedule(4, move || {
            if let Some(mut subscription) = to_cancel.lock().take() {
                subscription.unsubscribe();
            }
        })
        .unwrap();

    scheduler.flush();

    // a at 1, b at 3; c at 5 and everything after is cut off.
    assert_eq!(
        *seen.lock(),
        vec![(1, TestEvent::Value(1)), (3, TestEvent::Value(2))]
    );
}

#[test]
fn test_multiple_subscribers_share_one_timeline() {
    let scheduler = scheduler();
    let source = scheduler.hot("-a-b-c|", &values()).unwrap();
    let clock = scheduler.clock().clone();

    let (first, first_observer) = stamping_observer(clock.clone());
    let _ = source.subscribe(first_observer);

    let (second, second_observer) = stamping_observer(clock.clone());
    let late = source.clone();
    clock
        .schedule(2, move || {
            let _ = late.subscribe(second_observer);
        })
        .unwrap();

    scheduler.flush();

    assert_eq!(
        *first.lock(),
        vec![
            (1, TestEvent::Value(1)),
            (3, TestEvent::Value(2)),
            (5, TestEvent::Value(3)),
            (6, TestEvent::Complete),
        ]
    );
    // The late subscriber shares the same absolute timeline.
    assert_eq!(
        *second.lock(),
        vec![
            (3, TestEvent::Value(2)),
            (5, TestEvent::Value(3)),
            (6, TestEvent::Complete),
        ]
    );
}

#[test]
fn test_terminal_event_closes_all_subscribers() {
    let scheduler = scheduler();
    let source = scheduler
        .hot_with_error("-a-#", &values(), StreamError::new("boom"))
        .unwrap();
    let clock = scheduler.clock().clone();

    let (first, first_observer) = stamping_observer(clock.clone());
    let first_subscription = source.subscribe(first_observer);
    let (second, second_observer) = stamping_observer(clock.clone());
    let second_subscription = source.subscribe(second_observer);

    scheduler.flush();

    let expected = vec![
        (1, TestEvent::Value(1)),
        (3, TestEvent::Error(StreamError::new("boom"))),
    ];
    assert_eq!(*first.lock(), expected);
    assert_eq!(*second.lock(), expected);
    assert!(first_subscription.closed());
    assert!(second_subscription.closed());
}

#[test]
fn test_subscriber_after_terminal_is_inert() {
    let scheduler = scheduler();
    let source = scheduler.hot("a|", &values()).unwrap();
    scheduler.flush();

    let clock = scheduler.clock().clone();
    let (seen, observer) = stamping_observer(clock);
    let subscription = source.subscribe(observer);

    assert!(subscription.closed());
    scheduler.flush();
    assert!(seen.lock().is_empty());
}

#[test]
fn test_events_before_anchor_are_never_delivered() {
    let scheduler = scheduler();
    // a and b precede the anchor; only c and the completion are scheduled.
    let source = scheduler.hot("-a-b-^-c-|", &values()).unwrap();
    let clock = scheduler.clock().clone();

    let (seen, observer) = stamping_observer(clock);
    let _ = source.subscribe(observer);

    scheduler.flush();

    assert_eq!(
        *seen.lock(),
        vec![(2, TestEvent::Value(3)), (4, TestEvent::Complete)]
    );
}

#[test]
fn test_subscription_log_records_windows() {
    let scheduler = scheduler();
    let source = scheduler.hot("-a-b-c-d|", &values()).unwrap();
    let clock = scheduler.clock().clone();

    let first = source.clone();
    clock
        .schedule(1, move || {
            let subscription = first.subscribe(Observer::noop());
            let _ = subscription;
        })
        .unwrap();

    let second = source.clone();
    clock
        .schedule(3, move || {
            let subscription = second.subscribe(Observer::noop());
            let _ = subscription;
        })
        .unwrap();

    scheduler.flush();

    // Both windows close at the completion frame (8), a global terminal.
    assert_eq!(
        source.subscriptions().snapshot(),
        vec![
            SubscriptionWindow::closed(1, 8),
            SubscriptionWindow::closed(3, 8),
        ]
    );
}

#[test]
fn test_explicit_unsubscribe_updates_the_log() {
    let scheduler = scheduler();
    let source = scheduler.hot("-a-b-c-d-e-|", &values()).unwrap();
    let clock = scheduler.clock().clone();

    let subscription = Arc::new(Mutex::new(Some(source.subscribe(Observer::noop()))));
    let to_cancel = subscription.clone();
    clock
        .schedule(6, move || {
            if let Some(mut subscription) = to_cancel.lock().take() {
                subscription.unsubscribe();
            }
        })
        .unwrap();

    scheduler.flush();

    assert_eq!(
        source.subscriptions().snapshot(),
        vec![SubscriptionWindow::closed(0, 6)]
    );
}
