// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Parser for marble diagrams.
//!
//! A marble diagram is a one-line textual timeline:
//!
//! - `-` advances virtual time by one character-advance and emits nothing.
//! - Any other bare character emits the value mapped to it and then advances.
//! - `|` marks successful completion; `#` marks an error. Both are terminal.
//! - `(...)` groups tokens that all fire at the frame of the opening `(`.
//! - `^` anchors frame zero for a hot diagram; earlier events get negative
//!   frames.
//! - `!` marks the unsubscribe point (subscription diagrams only).
//! - `<n>ms` advances by `n` raw time units when time-progression syntax is
//!   enabled; whitespace is then insignificant.
//!
//! How many time units one character-advance represents is a
//! [`ParserConfig`] parameter, not a constant: the run-scope calibration uses
//! 1 unit per character, the standalone calibration 10.
//!
//! # Example
//!
//! ```
//! use marbles_parser::{parse_events, ParserConfig};
//! use marbles_core::TimedEvent;
//! use std::collections::HashMap;
//!
//! let values = HashMap::from([('a', 1), ('b', 2)]);
//! let events = parse_events("-a-b-|", &values, None, &ParserConfig::standalone()).unwrap();
//!
//! assert_eq!(
//!     events,
//!     vec![
//!         TimedEvent::value(10, 1),
//!         TimedEvent::value(30, 2),
//!         TimedEvent::complete(50),
//!     ]
//! );
//! ```

pub mod config;
pub mod diagram;

pub use self::config::ParserConfig;
pub use self::diagram::{parse_events, parse_subscription};
