// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::ParserConfig;
use marbles_core::{Frame, MarbleError, Result, StreamError, SubscriptionWindow, TimedEvent};
use std::collections::HashMap;

/// Parses a value diagram into a frame-stamped event sequence.
///
/// Bare characters are looked up in `values`; `#` carries `error`, or a
/// generic `"error"` payload when none is supplied. If the diagram contains a
/// `^` anchor, all frames are shifted so the anchor is frame zero (events
/// declared before it come out negative).
///
/// The scan stops at the first top-level terminal token: characters after a
/// `|` or `#` are ignored, never parsed. Inside a synchronous group, however,
/// an event following a terminal is unambiguous author error and is rejected.
///
/// # Errors
///
/// [`MarbleError::MalformedDiagram`] on grammar violations,
/// [`MarbleError::UnknownToken`] for a bare character missing from `values`.
pub fn parse_events<T: Clone>(
    diagram: &str,
    values: &HashMap<char, T>,
    error: Option<StreamError>,
    config: &ParserConfig,
) -> Result<Vec<TimedEvent<T>>> {
    let factor = config.frame_time_factor as Frame;
    let chars: Vec<char> = diagram.chars().collect();

    let mut events: Vec<TimedEvent<T>> = Vec::new();
    let mut frame: Frame = 0;
    let mut anchor: Option<Frame> = None;
    let mut group: Option<Frame> = None;
    let mut group_open_at: usize = 0;
    let mut terminal = false;

    let mut i = 0;
    while i < chars.len() {
        if terminal && group.is_none() {
            break;
        }
        let c = chars[i];

        if c.is_whitespace() {
            if !config.time_progression {
                return Err(MarbleError::malformed(
                    i,
                    "whitespace requires time-progression syntax",
                ));
            }
            i += 1;
            continue;
        }

        if config.time_progression && c.is_ascii_digit() {
            if let Some((units, next)) = time_segment(&chars, i) {
                if group.is_some() {
                    return Err(MarbleError::malformed(
                        i,
                        "time progression inside a synchronous group",
                    ));
                }
                frame += frame_units(units, i)?;
                i = next;
                continue;
            }
        }

        match c {
            '-' => {
                // Inside a group every token shares the group's frame.
                if group.is_none() {
                    frame += factor;
                }
            }
            '(' => {
                if group.is_some() {
                    return Err(MarbleError::malformed(i, "nested synchronous group"));
                }
                group = Some(frame);
                group_open_at = i;
            }
            ')' => {
                if group.is_none() {
                    return Err(MarbleError::malformed(i, "unmatched ')'"));
                }
                group = None;
                frame += factor;
            }
            '|' => {
                if terminal {
                    return Err(MarbleError::malformed(i, "event after terminal token"));
                }
                events.push(TimedEvent::complete(group.unwrap_or(frame)));
                terminal = true;
            }
            '#' => {
                if terminal {
                    return Err(MarbleError::malformed(i, "event after terminal token"));
                }
                let payload = error.clone().unwrap_or_else(|| StreamError::new("error"));
                events.push(TimedEvent::error(group.unwrap_or(frame), payload));
                terminal = true;
            }
            '^' => {
                if group.is_some() {
                    return Err(MarbleError::malformed(
                        i,
                        "subscription anchor inside a synchronous group",
                    ));
                }
                if anchor.is_some() {
                    return Err(MarbleError::malformed(i, "duplicate subscription anchor"));
                }
                anchor = Some(frame);
                frame += factor;
            }
            '!' => {
                return Err(MarbleError::malformed(
                    i,
                    "unsubscribe marker in a value diagram",
                ));
            }
            _ => {
                if terminal {
                    return Err(MarbleError::malformed(i, "event after terminal token"));
                }
                let value = values
                    .get(&c)
                    .cloned()
                    .ok_or_else(|| MarbleError::unknown_token(c, i))?;
                events.push(TimedEvent::value(group.unwrap_or(frame), value));
                if group.is_none() {
                    frame += factor;
                }
            }
        }
        i += 1;
    }

    if group.is_some() {
        return Err(MarbleError::malformed(group_open_at, "unmatched '('"));
    }

    if let Some(zero) = anchor {
        for event in &mut events {
            event.frame -= zero;
        }
    }

    Ok(events)
}

/// Parses a subscription diagram into a [`SubscriptionWindow`].
///
/// Only `-`, `^`, `!`, groups, and (when enabled) time-progression segments
/// are legal; value and terminal tokens are rejected. The window's frames are
/// absolute positions on the flush axis, counted from the start of the
/// diagram.
///
/// # Errors
///
/// [`MarbleError::MalformedDiagram`] on any grammar violation, including a
/// missing `^` anchor.
pub fn parse_subscription(diagram: &str, config: &ParserConfig) -> Result<SubscriptionWindow> {
    let factor = config.frame_time_factor as Frame;
    let chars: Vec<char> = diagram.chars().collect();

    let mut frame: Frame = 0;
    let mut group: Option<Frame> = None;
    let mut group_open_at: usize = 0;
    let mut subscribed: Option<Frame> = None;
    let mut unsubscribed: Option<Frame> = None;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            if !config.time_progression {
                return Err(MarbleError::malformed(
                    i,
                    "whitespace requires time-progression syntax",
                ));
            }
            i += 1;
            continue;
        }

        if config.time_progression && c.is_ascii_digit() {
            if let Some((units, next)) = time_segment(&chars, i) {
                if group.is_some() {
                    return Err(MarbleError::malformed(
                        i,
                        "time progression inside a synchronous group",
                    ));
                }
                frame += frame_units(units, i)?;
                i = next;
                continue;
            }
        }

        match c {
            '-' => {
                if group.is_none() {
                    frame += factor;
                }
            }
            '(' => {
                if group.is_some() {
                    return Err(MarbleError::malformed(i, "nested synchronous group"));
                }
                group = Some(frame);
                group_open_at = i;
            }
            ')' => {
                if group.is_none() {
                    return Err(MarbleError::malformed(i, "unmatched ')'"));
                }
                group = None;
                frame += factor;
            }
            '^' => {
                if subscribed.is_some() {
                    return Err(MarbleError::malformed(i, "duplicate subscription anchor"));
                }
                subscribed = Some(group.unwrap_or(frame));
                if group.is_none() {
                    frame += factor;
                }
            }
            '!' => {
                if subscribed.is_none() {
                    return Err(MarbleError::malformed(
                        i,
                        "unsubscribe marker before subscription anchor",
                    ));
                }
                if unsubscribed.is_some() {
                    return Err(MarbleError::malformed(i, "duplicate unsubscribe marker"));
                }
                unsubscribed = Some(group.unwrap_or(frame));
                if group.is_none() {
                    frame += factor;
                }
            }
            _ => {
                return Err(MarbleError::malformed(
                    i,
                    format!("'{c}' is not valid in a subscription diagram"),
                ));
            }
        }
        i += 1;
    }

    if group.is_some() {
        return Err(MarbleError::malformed(group_open_at, "unmatched '('"));
    }

    let subscribed = subscribed.ok_or_else(|| {
        MarbleError::malformed(diagram.chars().count(), "missing subscription anchor '^'")
    })?;

    Ok(SubscriptionWindow {
        subscribed,
        unsubscribed,
    })
}

fn frame_units(units: u64, position: usize) -> Result<Frame> {
    Frame::try_from(units)
        .map_err(|_| MarbleError::malformed(position, "time segment overflows the frame range"))
}

/// Recognizes a `<digits>ms` segment starting at `start`.
///
/// Returns the raw unit count and the index just past the segment, or `None`
/// if the digits are not followed by `ms` (in which case the digit is an
/// ordinary value token).
fn time_segment(chars: &[char], start: usize) -> Option<(u64, usize)> {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    if chars.get(end) == Some(&'m') && chars.get(end + 1) == Some(&'s') {
        let units: u64 = chars[start..end].iter().collect::<String>().parse().ok()?;
        Some((units, end + 2))
    } else {
        None
    }
}
