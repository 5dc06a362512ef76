//! # Note Equivalence
//!
//! Translates S-1 tab numbers into the X-1 key that sounds the same pitch.
//!
//! The S-1 is assumed to sit with its octave switch in position 2. The X-1
//! has more keys but a different layout, so some S-1 notes only exist on the
//! X-1 through one of its octave-down modifiers. Two tables describe the two
//! ways the X-1 can be set up against the S-1:
//!
//! - [`EquivalenceMode::Mode1`]: no octave modifier on the X-1. The S-1
//!   central octave lines up with the first X-1 octave; S-1 `1`–`2` need the
//!   X-1 "-1" modifier.
//! - [`EquivalenceMode::Mode2`]: the X-1 "-1 octave" switch is held. The S-1
//!   central octave lines up with the second X-1 octave; S-1 `10`–`12` need
//!   the X-1 "-2" modifier.
//!
//! ## Encoding
//! A translated note is written bare when its octave offset is zero and as
//! `(offset:label)` otherwise, e.g. `(-1:8)`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::token::encode_offset;

/// Which equivalence table to translate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquivalenceMode {
    #[default]
    Mode1,
    Mode2,
}

/// Global octave modifier selected on the X-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OctaveModifier {
    /// `"0"`: the stored base offset is used unchanged.
    #[default]
    Zero,
    /// `"-1"`: the offset is recombined as `base - modifier - 1`.
    Down,
}

impl OctaveModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            OctaveModifier::Zero => "0",
            OctaveModifier::Down => "-1",
        }
    }

    fn value(self) -> i8 {
        match self {
            OctaveModifier::Zero => 0,
            OctaveModifier::Down => -1,
        }
    }
}

impl FromStr for OctaveModifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(OctaveModifier::Zero),
            "-1" => Ok(OctaveModifier::Down),
            other => Err(format!("unknown octave modifier '{}'", other)),
        }
    }
}

/// S-1 label → (X-1 label, base octave modifier).
type Entry = (&'static str, (&'static str, i8));

const MODE1: &[Entry] = &[
    // 3rd octave: not on the X-1 without the modifier
    ("1", ("8", -1)),
    ("1.5", ("8.5", -1)),
    ("2", ("9", -1)),
    // 4th octave
    ("3", ("3", 0)),
    ("3.5", ("3.5", 0)),
    ("4", ("4", 0)),
    ("4.5", ("4.5", 0)),
    ("5", ("5", 0)),
    ("6", ("6", 0)),
    ("6.5", ("6.5", 0)),
    ("7", ("7", 0)),
    ("7.5", ("7.5", 0)),
    ("8", ("8", 0)),
    ("8.5", ("8.5", 0)),
    ("9", ("9", 0)),
    // 5th octave
    ("10", ("10", 0)),
    ("10.5", ("10.5", 0)),
    ("11", ("11", 0)),
    ("11.5", ("11.5", 0)),
    ("12", ("12", 0)),
    // 5th octave, X-1 only
    ("13", ("13", 0)),
    ("13.5", ("13.5", 0)),
    ("14", ("14", 0)),
    ("14.5", ("14.5", 0)),
    ("15", ("15", 0)),
    ("15.5", ("15.5", 0)),
    ("16", ("16", 0)),
];

const MODE2: &[Entry] = &[
    ("1", ("1", 0)),
    ("1.5", ("1.5", 0)),
    ("2", ("2", 0)),
    ("3", ("3", 0)),
    ("3.5", ("3.5", 0)),
    ("4", ("4", 0)),
    ("4.5", ("4.5", 0)),
    ("5", ("5", 0)),
    ("6", ("6", 0)),
    ("6.5", ("6.5", 0)),
    ("7", ("7", 0)),
    ("7.5", ("7.5", 0)),
    ("8", ("8", 0)),
    ("8.5", ("8.5", 0)),
    ("9", ("9", 0)),
    // 5th octave, not reachable in this X-1 setup
    ("10", ("3", -2)),
    ("10.5", ("3.5", -2)),
    ("11", ("4", -2)),
    ("11.5", ("4.5", -2)),
    ("12", ("5", -2)),
];

impl EquivalenceMode {
    /// Table for this mode, in S-1 key order.
    pub fn entries(self) -> &'static [Entry] {
        match self {
            EquivalenceMode::Mode1 => MODE1,
            EquivalenceMode::Mode2 => MODE2,
        }
    }

    /// Look up an S-1 label.
    pub fn lookup(self, label: &str) -> Option<(&'static str, i8)> {
        self.entries()
            .iter()
            .find(|(key, _)| *key == label)
            .map(|(_, target)| *target)
    }
}

/// Final octave offset for a table entry under `modifier`.
///
/// Only the `"-1"` modifier recombines the offset, as
/// `base - modifier - 1`; asset names downstream depend on this exact value.
pub fn resolve_offset(base: i8, modifier: OctaveModifier) -> i8 {
    match modifier {
        OctaveModifier::Down => base - modifier.value() - 1,
        OctaveModifier::Zero => base,
    }
}

/// Translate one S-1 token. Tokens outside the table pass through unchanged.
pub fn translate_token(token: &str, mode: EquivalenceMode, modifier: OctaveModifier) -> String {
    match mode.lookup(token) {
        Some((label, base)) => encode_offset(label, resolve_offset(base, modifier)),
        None => token.to_string(),
    }
}

/// Translate a normalized S-1 buffer into X-1 tabs.
///
/// Line breaks are not kept: the whole buffer is read as one run of
/// whitespace-separated tokens and written back joined by single spaces.
///
/// # Example
/// ```
/// use stylotab::{translate, EquivalenceMode, OctaveModifier};
///
/// assert_eq!(translate("1 3\n10", EquivalenceMode::Mode1, OctaveModifier::Zero), "(-1:8) 3 10");
/// assert_eq!(translate("10 x", EquivalenceMode::Mode2, OctaveModifier::Down), "(-2:3) x");
/// ```
pub fn translate(normalized: &str, mode: EquivalenceMode, modifier: OctaveModifier) -> String {
    normalized
        .split_whitespace()
        .map(|token| translate_token(token, mode, modifier))
        .collect::<Vec<_>>()
        .join(" ")
}
