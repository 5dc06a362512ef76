//! Tabs for the Stylophone S-1 and X-1.
//!
//! Raw tab text goes through four stages:
//! [`normalize`] cleans it up, [`transpose`] optionally shifts it along the
//! chromatic scale, [`translate`] turns S-1 tabs into X-1 tabs, and the
//! [`Player`] animates both sequences on the key diagrams. [`Session`] wires
//! the stages together for a host UI.

pub mod config;
pub mod equivalence;
pub mod error;
pub mod normalize;
pub mod playback;
pub mod presets;
pub mod session;
pub mod token;
pub mod transpose;

pub use config::{Generation, Settings, Style};
pub use equivalence::{translate, EquivalenceMode, OctaveModifier};
pub use error::StyloError;
pub use normalize::normalize;
pub use playback::{Cue, Event, Player, Preview, Track, TrackState};
pub use session::Session;
pub use transpose::transpose;
