// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use marbles_core::{MarbleError, StreamError, SubscriptionWindow, TimedEvent};
use marbles_parser::{parse_events, parse_subscription, ParserConfig};
use std::collections::HashMap;

fn abc() -> HashMap<char, i32> {
    HashMap::from([('a', 1), ('b', 2), ('c', 3)])
}

#[test]
fn test_empty_diagram_yields_empty_sequence() {
    let events = parse_events("", &abc(), None, &ParserConfig::standalone()).unwrap();
    assert!(events.is_empty());
}

#[test]
fn test_dashes_only_never_completes() {
    let events = parse_events("----", &abc(), None, &ParserConfig::standalone()).unwrap();
    assert!(events.is_empty());
}

#[test]
fn test_values_and_completion_at_factor_ten() {
    // Scenario: "-a-b-(c|)" with factor 10.
    let events = parse_events("-a-b-(c|)", &abc(), None, &ParserConfig::standalone()).unwrap();
    assert_eq!(
        events,
        vec![
            TimedEvent::value(10, 1),
            TimedEvent::value(30, 2),
            TimedEvent::value(50, 3),
            TimedEvent::complete(50),
        ]
    );
}

#[test]
fn test_values_and_completion_at_factor_one() {
    let events = parse_events("-a-b-|", &abc(), None, &ParserConfig::run_scope()).unwrap();
    assert_eq!(
        events,
        vec![
            TimedEvent::value(1, 1),
            TimedEvent::value(3, 2),
            TimedEvent::complete(5),
        ]
    );
}

#[test]
fn test_synchronous_group_shares_one_frame() {
    // Scenario: "(abc|)" parses to three values and a completion, all at 0.
    let events = parse_events("(abc|)", &abc(), None, &ParserConfig::standalone()).unwrap();
    assert_eq!(
        events,
        vec![
            TimedEvent::value(0, 1),
            TimedEvent::value(0, 2),
            TimedEvent::value(0, 3),
            TimedEvent::complete(0),
        ]
    );
}

#[test]
fn test_group_advances_one_frame_after_closing() {
    let events = parse_events("(ab)c|", &abc(), None, &ParserConfig::run_scope()).unwrap();
    assert_eq!(
        events,
        vec![
            TimedEvent::value(0, 1),
            TimedEvent::value(0, 2),
            TimedEvent::value(1, 3),
            TimedEvent::complete(2),
        ]
    );
}

#[test]
fn test_error_token_carries_payload() {
    let events = parse_events(
        "-a-#",
        &abc(),
        Some(StreamError::new("exploded")),
        &ParserConfig::standalone(),
    )
    .unwrap();
    assert_eq!(
        events,
        vec![
            TimedEvent::value(10, 1),
            TimedEvent::error(30, StreamError::new("exploded")),
        ]
    );
}

#[test]
fn test_error_token_defaults_to_generic_payload() {
    let events = parse_events("#", &abc(), None, &ParserConfig::standalone()).unwrap();
    assert_eq!(events, vec![TimedEvent::error(0, StreamError::new("error"))]);
}

#[test]
fn test_scan_stops_at_terminal_token() {
    // Scenario: "-a-#-b-c" parses to two events; b and c are never parsed.
    let events = parse_events(
        "-a-#-b-c",
        &abc(),
        Some(StreamError::new("E")),
        &ParserConfig::standalone(),
    )
    .unwrap();
    assert_eq!(
        events,
        vec![
            TimedEvent::value(10, 1),
            TimedEvent::error(30, StreamError::new("E")),
        ]
    );
}

#[test]
fn test_tokens_after_completion_are_ignored() {
    let events = parse_events("a|bz", &abc(), None, &ParserConfig::standalone()).unwrap();
    assert_eq!(
        events,
        vec![TimedEvent::value(0, 1), TimedEvent::complete(10)]
    );
}

#[test]
fn test_event_after_terminal_inside_group_is_malformed() {
    let result = parse_events("(|a)", &abc(), None, &ParserConfig::standalone());
    assert!(matches!(
        result,
        Err(MarbleError::MalformedDiagram { position: 2, .. })
    ));
}

#[test]
fn test_unknown_token_fails_fast() {
    let result = parse_events("-z-|", &abc(), None, &ParserConfig::standalone());
    assert_eq!(result, Err(MarbleError::unknown_token('z', 1)));
}

#[test]
fn test_unmatched_open_group_is_malformed() {
    let result = parse_events("-(ab", &abc(), None, &ParserConfig::standalone());
    assert!(matches!(
        result,
        Err(MarbleError::MalformedDiagram { position: 1, .. })
    ));
}

#[test]
fn test_unmatched_close_group_is_malformed() {
    let result = parse_events("ab)", &abc(), None, &ParserConfig::standalone());
    assert!(matches!(
        result,
        Err(MarbleError::MalformedDiagram { position: 2, .. })
    ));
}

#[test]
fn test_unsubscribe_marker_is_rejected_in_value_diagrams() {
    let result = parse_events("-a-!", &abc(), None, &ParserConfig::standalone());
    assert!(matches!(result, Err(MarbleError::MalformedDiagram { .. })));
}

#[test]
fn test_hot_anchor_shifts_frames() {
    // Events before ^ occupy negative frames.
    let events = parse_events("-a-^-b-|", &abc(), None, &ParserConfig::run_scope()).unwrap();
    assert_eq!(
        events,
        vec![
            TimedEvent::value(-2, 1),
            TimedEvent::value(2, 2),
            TimedEvent::complete(4),
        ]
    );
}

#[test]
fn test_duplicate_anchor_is_malformed() {
    let result = parse_events("^a^", &abc(), None, &ParserConfig::run_scope());
    assert!(matches!(
        result,
        Err(MarbleError::MalformedDiagram { position: 2, .. })
    ));
}

#[test]
fn test_time_progression_advances_raw_units() {
    // "a 9ms b" : a at 0, one character-advance after 'a', then 9 raw units.
    let events = parse_events("a 9ms b|", &abc(), None, &ParserConfig::run_scope()).unwrap();
    assert_eq!(
        events,
        vec![
            TimedEvent::value(0, 1),
            TimedEvent::value(10, 2),
            TimedEvent::complete(11),
        ]
    );
}

#[test]
fn test_time_progression_is_independent_of_factor() {
    // At factor 10 a "5ms" segment is still 5 raw units, not 50.
    let config = ParserConfig::new(10, true);
    let events = parse_events("a 5ms b|", &abc(), None, &config).unwrap();
    assert_eq!(
        events,
        vec![
            TimedEvent::value(0, 1),
            TimedEvent::value(15, 2),
            TimedEvent::complete(25),
        ]
    );
}

#[test]
fn test_time_segment_overflow_is_malformed() {
    // One past i64::MAX.
    let result = parse_events(
        "a 9223372036854775808ms b|",
        &abc(),
        None,
        &ParserConfig::run_scope(),
    );
    assert!(matches!(
        result,
        Err(MarbleError::MalformedDiagram { position: 2, .. })
    ));
}

#[test]
fn test_digit_value_keys_still_work_with_time_progression() {
    let values = HashMap::from([('1', 100)]);
    let events = parse_events("-1-|", &values, None, &ParserConfig::run_scope()).unwrap();
    assert_eq!(
        events,
        vec![TimedEvent::value(1, 100), TimedEvent::complete(3)]
    );
}

#[test]
fn test_whitespace_requires_time_progression() {
    let result = parse_events("a b|", &abc(), None, &ParserConfig::standalone());
    assert!(matches!(
        result,
        Err(MarbleError::MalformedDiagram { position: 1, .. })
    ));
}

#[test]
fn test_terminal_event_is_always_last() {
    for diagram in ["(abc|)", "-a-b-(c|)", "-a-#", "a|"] {
        let events = parse_events(diagram, &abc(), None, &ParserConfig::standalone()).unwrap();
        let terminals = events.iter().filter(|e| e.is_terminal()).count();
        assert_eq!(terminals, 1, "diagram {diagram}");
        assert!(events.last().unwrap().is_terminal(), "diagram {diagram}");
    }
}

#[test]
fn test_frames_are_non_decreasing() {
    let events = parse_events("-a(bc)-a-|", &abc(), None, &ParserConfig::standalone()).unwrap();
    let frames: Vec<_> = events.iter().map(|e| e.frame).collect();
    let mut sorted = frames.clone();
    sorted.sort_unstable();
    assert_eq!(frames, sorted);
}

#[test]
fn test_subscription_window_with_unsubscribe() {
    let window = parse_subscription("--^-----!", &ParserConfig::run_scope()).unwrap();
    assert_eq!(window, SubscriptionWindow::closed(2, 8));
}

#[test]
fn test_subscription_window_without_unsubscribe() {
    let window = parse_subscription("---^--", &ParserConfig::run_scope()).unwrap();
    assert_eq!(window, SubscriptionWindow::open(3));
}

#[test]
fn test_subscription_window_factor_scales_frames() {
    let window = parse_subscription("--^--!", &ParserConfig::standalone()).unwrap();
    assert_eq!(window, SubscriptionWindow::closed(20, 50));
}

#[test]
fn test_subscription_group_shares_frame() {
    let window = parse_subscription("--(^!)", &ParserConfig::run_scope()).unwrap();
    assert_eq!(window, SubscriptionWindow::closed(2, 2));
}

#[test]
fn test_subscription_diagram_rejects_value_tokens() {
    let result = parse_subscription("--^-a!", &ParserConfig::run_scope());
    assert!(matches!(
        result,
        Err(MarbleError::MalformedDiagram { position: 4, .. })
    ));
}

#[test]
fn test_subscription_diagram_requires_anchor() {
    let result = parse_subscription("----", &ParserConfig::run_scope());
    assert!(matches!(result, Err(MarbleError::MalformedDiagram { .. })));
}

#[test]
fn test_unsubscribe_before_anchor_is_malformed() {
    let result = parse_subscription("-!-^", &ParserConfig::run_scope());
    assert!(matches!(
        result,
        Err(MarbleError::MalformedDiagram { position: 1, .. })
    ));
}

#[test]
fn test_round_trip_of_decoded_frames() {
    // Decode, re-render through the same calibration, decode again: equal.
    let config = ParserConfig::standalone();
    let first = parse_events("a-b--c-|", &abc(), None, &config).unwrap();
    let second = parse_events("a-b--c-|", &abc(), None, &config).unwrap();
    assert_eq!(first, second);
}
