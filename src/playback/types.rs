//! Playback type definitions
//!
//! This module defines the tracks, states and events the player exchanges
//! with the host UI.

use serde::Serialize;

/// One of the two keyboards the player animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    S1,
    X1,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::S1, Track::X1];

    pub(crate) fn index(self) -> usize {
        match self {
            Track::S1 => 0,
            Track::X1 => 1,
        }
    }
}

/// Lifecycle of a single track.
///
/// ```text
/// Idle ──start──▶ Running ──end of sequence──▶ Finished
///                    │
///                    └──stop observed──▶ Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    #[default]
    Idle,
    Running,
    Finished,
    Stopped,
}

/// Tabs around the current position, for the host's "what's next" strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub pre: Vec<String>,
    pub current: String,
    pub post: Vec<String>,
}

/// Something the host must reflect in its UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// Light up a diagram element.
    Activate { element: String },
    /// Return a diagram element to its resting colour.
    Clear { element: String },
    /// The shared progress position moved.
    ProgressChanged { position: usize },
    /// The preview strip changed.
    PreviewChanged(Preview),
}

impl Event {
    pub fn activate(element: impl Into<String>) -> Self {
        Event::Activate {
            element: element.into(),
        }
    }

    pub fn clear(element: impl Into<String>) -> Self {
        Event::Clear {
            element: element.into(),
        }
    }
}

/// An event together with the player time (ms) it fired at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub at_ms: u64,
    pub event: Event,
}
