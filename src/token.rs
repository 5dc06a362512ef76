//! # Tab Tokens
//!
//! Typed view of the whitespace-separated words that make up a tab sequence.
//!
//! ## Token Forms
//! ```text
//! 8          bare label, octave 0
//! (-1:8)     label with octave offset, as written by the translator
//! -1:8 +1:3  label with octave offset, as written by the transposer
//! E:17       label flagged as an error by the transposer
//! ( ) x4     structural markers, only seen before normalization
//! anything   literal, passed through untouched
//! ```
//!
//! Decoding an encoded offset gives back the `(label, octave)` pair that
//! produced it, so the player can recover which key and which octave
//! indicator to light.

use std::fmt;

use crate::playback::Track;

/// Element id of the X-1 "-1 octave" indicator.
pub const INDICATOR_OCTAVE_DOWN: &str = "tab_xm1";
/// Element id of the X-1 "-2 octave" indicator.
pub const INDICATOR_TWO_OCTAVES_DOWN: &str = "tab_xm2";
/// Element id of the S-1 octave switch shown in position 2.
pub const INDICATOR_S1_SWITCH: &str = "tab_sm2";

/// A note on one of the keyboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub label: String,
    pub octave: i8,
    pub error: bool,
}

impl Note {
    pub fn new(label: impl Into<String>, octave: i8) -> Self {
        Note {
            label: label.into(),
            octave,
            error: false,
        }
    }

    /// Encode the way the translator writes notes: bare when the offset is
    /// zero, `(offset:label)` otherwise.
    pub fn encode(&self) -> String {
        encode_offset(&self.label, self.octave)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    OpenParen,
    CloseParen,
    Repeat(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Note(Note),
    Marker(Marker),
    Literal(String),
}

impl Token {
    /// Decode a single word of tab text.
    pub fn parse(word: &str) -> Token {
        match word {
            "(" => return Token::Marker(Marker::OpenParen),
            ")" => return Token::Marker(Marker::CloseParen),
            _ => {}
        }

        if let Some(count) = word.strip_prefix('x') {
            if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(n) = count.parse() {
                    return Token::Marker(Marker::Repeat(n));
                }
            }
        }

        if let Some(rest) = word.strip_prefix("E:") {
            if is_numeric_label(rest) {
                return Token::Note(Note {
                    label: rest.to_string(),
                    octave: 0,
                    error: true,
                });
            }
            return Token::Literal(word.to_string());
        }

        match decode_offset(word) {
            Some((label, octave)) => Token::Note(Note::new(label, octave)),
            None => Token::Literal(word.to_string()),
        }
    }

    /// The note this token plays on `track`, if any.
    ///
    /// The S-1 only reads bare labels. The X-1 also reads labels carrying a
    /// -1 or -2 octave offset, which it plays through its octave indicators.
    pub fn playable_on(&self, track: Track) -> Option<&Note> {
        let Token::Note(note) = self else {
            return None;
        };
        if note.error {
            return None;
        }
        match (track, note.octave) {
            (_, 0) => Some(note),
            (Track::X1, -1 | -2) => Some(note),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Note(note) if note.error => write!(f, "E:{}", note.label),
            Token::Note(note) => f.write_str(&note.encode()),
            Token::Marker(Marker::OpenParen) => f.write_str("("),
            Token::Marker(Marker::CloseParen) => f.write_str(")"),
            Token::Marker(Marker::Repeat(n)) => write!(f, "x{}", n),
            Token::Literal(text) => f.write_str(text),
        }
    }
}

/// Digits with at most one decimal point, e.g. `7`, `10.5`.
pub fn is_numeric_label(text: &str) -> bool {
    let mut digits = 0;
    let mut dots = 0;
    for c in text.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// `label` when `octave` is zero, `(octave:label)` otherwise.
pub fn encode_offset(label: &str, octave: i8) -> String {
    if octave == 0 {
        label.to_string()
    } else {
        format!("({}:{})", octave, label)
    }
}

/// Inverse of [`encode_offset`], also accepting the unbracketed
/// `offset:label` form and a leading `+` on the offset.
///
/// # Example
/// ```
/// use stylotab::token::decode_offset;
///
/// assert_eq!(decode_offset("(-1:8)"), Some(("8".to_string(), -1)));
/// assert_eq!(decode_offset("+1:3"), Some(("3".to_string(), 1)));
/// assert_eq!(decode_offset("4.5"), Some(("4.5".to_string(), 0)));
/// assert_eq!(decode_offset("x4"), None);
/// ```
pub fn decode_offset(word: &str) -> Option<(String, i8)> {
    let inner = match word.strip_prefix('(') {
        Some(rest) => rest.strip_suffix(')')?,
        None => word,
    };

    match inner.split_once(':') {
        Some((offset, label)) => {
            let digits = offset
                .strip_prefix(|c| c == '+' || c == '-')
                .unwrap_or(offset);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let octave: i8 = offset.parse().ok()?;
            is_numeric_label(label).then(|| (label.to_string(), octave))
        }
        None => is_numeric_label(inner).then(|| (inner.to_string(), 0)),
    }
}

/// Diagram element id for `label` on `track`: `tab_s10_5`, `tab_x8`, ...
pub fn element_id(track: Track, label: &str) -> String {
    let prefix = match track {
        Track::S1 => "tab_s",
        Track::X1 => "tab_x",
    };
    format!("{}{}", prefix, label.replace('.', "_"))
}
