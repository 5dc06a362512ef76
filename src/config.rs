//! # Settings
//!
//! The selections a host UI forwards to the core: which keyboard to animate,
//! which diagram style to show, the X-1 octave switch, transposition, and
//! the delay between notes.
//!
//! Settings can be read from YAML. Keys are kebab-case and all optional:
//!
//! ```yaml
//! generation: both        # s1 | x1 | both
//! style: tabs             # tabs | solfege | kids
//! x1-octave-down: false   # X-1 "-1 octave" switch
//! transpose: 0            # -12..=12 semitones, 0 disables
//! extended-range: true    # transpose over the X-1 keys too
//! delay: 500              # 100..=5000 ms, multiples of 100
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::equivalence::{EquivalenceMode, OctaveModifier};
use crate::error::StyloError;

pub const MIN_DELAY_MS: u32 = 100;
pub const MAX_DELAY_MS: u32 = 5000;
pub const DELAY_STEP_MS: u32 = 100;
pub const DEFAULT_DELAY_MS: u32 = 500;
pub const MAX_TRANSPOSE: i32 = 12;

/// Which keyboard(s) to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    S1,
    #[default]
    X1,
    Both,
}

impl Generation {
    pub fn as_str(self) -> &'static str {
        match self {
            Generation::S1 => "s1",
            Generation::X1 => "x1",
            Generation::Both => "both",
        }
    }
}

impl FromStr for Generation {
    type Err = StyloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s1" | "s-1" => Ok(Generation::S1),
            "x1" | "x-1" => Ok(Generation::X1),
            "both" => Ok(Generation::Both),
            other => Err(StyloError::InvalidSetting {
                name: "generation".to_string(),
                message: format!("unknown generation '{}', expected s1, x1 or both", other),
            }),
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagram labelling style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Tabs,
    Solfege,
    /// American note names
    Kids,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Tabs => "tabs",
            Style::Solfege => "solfege",
            Style::Kids => "kids",
        }
    }
}

impl FromStr for Style {
    type Err = StyloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tabs" => Ok(Style::Tabs),
            "solfege" | "solfège" => Ok(Style::Solfege),
            "kids" | "american" => Ok(Style::Kids),
            other => Err(StyloError::InvalidSetting {
                name: "style".to_string(),
                message: format!("unknown style '{}', expected tabs, solfege or kids", other),
            }),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host selections that shape the derived sequences and the animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub generation: Generation,
    pub style: Style,
    /// X-1 "-1 octave" switch. Selects the second equivalence table and keeps
    /// the `tab_xm1` indicator lit during playback.
    pub x1_octave_down: bool,
    pub transpose_enabled: bool,
    pub transpose_amount: i32,
    pub extended_range: bool,
    pub delay_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            generation: Generation::X1,
            style: Style::Tabs,
            x1_octave_down: false,
            transpose_enabled: false,
            transpose_amount: 0,
            extended_range: true,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

/// Raw settings for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct RawSettings {
    generation: Option<String>,
    style: Option<String>,
    x1_octave_down: Option<bool>,
    transpose: Option<i32>,
    extended_range: Option<bool>,
    delay: Option<u32>,
}

impl Settings {
    /// Read settings from YAML, falling back to defaults for missing keys.
    ///
    /// A non-zero `transpose` enables transposition.
    pub fn from_yaml(content: &str) -> Result<Settings, StyloError> {
        let raw: RawSettings = if content.trim().is_empty() {
            RawSettings::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| StyloError::ConfigError(e.to_string()))?
        };

        let defaults = Settings::default();
        let transpose_amount = raw.transpose.unwrap_or(0);

        let settings = Settings {
            generation: match &raw.generation {
                Some(g) => g.parse()?,
                None => defaults.generation,
            },
            style: match &raw.style {
                Some(s) => s.parse()?,
                None => defaults.style,
            },
            x1_octave_down: raw.x1_octave_down.unwrap_or(defaults.x1_octave_down),
            transpose_enabled: transpose_amount != 0,
            transpose_amount,
            extended_range: raw.extended_range.unwrap_or(defaults.extended_range),
            delay_ms: raw.delay.unwrap_or(defaults.delay_ms),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check every value against the ranges the host controls allow.
    pub fn validate(&self) -> Result<(), StyloError> {
        validate_transpose(self.transpose_amount)?;
        validate_delay(self.delay_ms)
    }

    /// Equivalence table selected by the octave switch.
    pub fn equivalence_mode(&self) -> EquivalenceMode {
        if self.x1_octave_down {
            EquivalenceMode::Mode2
        } else {
            EquivalenceMode::Mode1
        }
    }

    /// Octave modifier selected by the octave switch.
    pub fn octave_modifier(&self) -> OctaveModifier {
        if self.x1_octave_down {
            OctaveModifier::Down
        } else {
            OctaveModifier::Zero
        }
    }
}

pub fn validate_transpose(amount: i32) -> Result<(), StyloError> {
    if (-MAX_TRANSPOSE..=MAX_TRANSPOSE).contains(&amount) {
        Ok(())
    } else {
        Err(StyloError::InvalidSetting {
            name: "transpose".to_string(),
            message: format!("{} is outside -{}..={}", amount, MAX_TRANSPOSE, MAX_TRANSPOSE),
        })
    }
}

pub fn validate_delay(delay_ms: u32) -> Result<(), StyloError> {
    if !(MIN_DELAY_MS..=MAX_DELAY_MS).contains(&delay_ms) {
        return Err(StyloError::InvalidSetting {
            name: "delay".to_string(),
            message: format!(
                "{} ms is outside {}..={} ms",
                delay_ms, MIN_DELAY_MS, MAX_DELAY_MS
            ),
        });
    }
    if delay_ms % DELAY_STEP_MS != 0 {
        return Err(StyloError::InvalidSetting {
            name: "delay".to_string(),
            message: format!("{} ms is not a multiple of {} ms", delay_ms, DELAY_STEP_MS),
        });
    }
    Ok(())
}
