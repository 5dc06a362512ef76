//! # Transposer
//!
//! Shifts S-1 tabs by a number of semitones along a fixed ordered scale:
//! the 20 S-1 keys, or those followed by the 7 keys only the X-1 has when the
//! extended range is on.
//!
//! A shift that runs off either end wraps once and is tagged with the octave
//! it moved to: `-1:` past the top, `+1:` past the bottom. Tokens that are not
//! on the scale, or that would need more than one wrap, come out as `E:<token>`.
//! Line breaks are kept.

use crate::normalize::normalize;

/// S-1 keys in pitch order, a semitone apart.
pub const STANDARD_SCALE: [&str; 20] = [
    "1", "1.5", "2", "3", "3.5", "4", "4.5", "5", "6", "6.5", "7", "7.5", "8", "8.5", "9", "10",
    "10.5", "11", "11.5", "12",
];

/// Standard scale followed by the keys only the X-1 has.
pub const EXTENDED_SCALE: [&str; 27] = [
    "1", "1.5", "2", "3", "3.5", "4", "4.5", "5", "6", "6.5", "7", "7.5", "8", "8.5", "9", "10",
    "10.5", "11", "11.5", "12", "13", "13.5", "14", "14.5", "15", "15.5", "16",
];

/// Scale used for transposition, standard or extended range.
pub fn scale(extended: bool) -> &'static [&'static str] {
    if extended {
        &EXTENDED_SCALE
    } else {
        &STANDARD_SCALE
    }
}

/// Shift a single token by `semitones` along `scale`.
///
/// Returns the token unchanged when it is empty, the shifted key when it
/// stays on the scale, `+1:` / `-1:` tagged keys when it wraps once past
/// either end, and `E:` tagged input for everything else.
pub fn transpose_token(token: &str, semitones: i32, scale: &[&str]) -> String {
    if token.is_empty() {
        return String::new();
    }
    let Some(index) = scale.iter().position(|key| *key == token) else {
        return format!("E:{}", token);
    };

    let len = scale.len() as i64;
    let idx = index as i64 + semitones as i64;

    let (prefix, wrapped) = if idx < 0 {
        ("+1:", idx + len)
    } else if idx >= len {
        ("-1:", idx - len)
    } else {
        ("", idx)
    };

    match usize::try_from(wrapped).ok().and_then(|i| scale.get(i)) {
        Some(key) => format!("{}{}", prefix, key),
        // More than one octave away from the scale
        None => format!("E:{}", token),
    }
}

/// Transpose a normalized tab buffer, keeping its line structure.
///
/// # Example
/// ```
/// use stylotab::transpose;
///
/// assert_eq!(transpose("12", 1, false), "-1:1");
/// assert_eq!(transpose("1 2\n3", 2, false), "2 3.5\n4");
/// assert_eq!(transpose("1 x", -1, false), "+1:12 E:x");
/// ```
pub fn transpose(normalized: &str, semitones: i32, extended: bool) -> String {
    let scale = scale(extended);

    let lines: Vec<String> = normalized
        .split('\n')
        .map(|line| {
            line.split(' ')
                .map(|token| transpose_token(token, semitones, scale))
                .filter(|token| !token.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    lines.join("\n").trim_matches('\n').to_string()
}

/// Normalize raw text, then transpose it.
pub fn transpose_raw(raw: &str, semitones: i32, extended: bool) -> String {
    transpose(&normalize(raw), semitones, extended)
}
