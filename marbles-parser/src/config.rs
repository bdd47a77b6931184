// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Calibration of the parser.
///
/// Both knobs exist because the same notation is read in two contexts: inside
/// a dedicated run scope (1 time unit per character, time-progression syntax
/// available in expected diagrams) and standalone (10 units per character,
/// plain notation only). There is one parsing algorithm; only the calibration
/// differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// How many virtual-time units one character-advance represents.
    pub frame_time_factor: u64,
    /// Whether `<n>ms` segments are recognized and whitespace is ignored.
    pub time_progression: bool,
}

impl ParserConfig {
    /// Creates a config from its parts.
    pub fn new(frame_time_factor: u64, time_progression: bool) -> Self {
        Self {
            frame_time_factor,
            time_progression,
        }
    }

    /// Run-scope calibration: 1 unit per character, time progression on.
    pub fn run_scope() -> Self {
        Self::new(1, true)
    }

    /// Standalone calibration: 10 units per character, plain notation.
    pub fn standalone() -> Self {
        Self::new(10, false)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::standalone()
    }
}
