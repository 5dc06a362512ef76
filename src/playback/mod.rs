//! # Playback Module
//!
//! Animate tab sequences on the S-1 and X-1 key diagrams.
//!
//! ## Purpose
//! The player turns the derived S-1 and X-1 sequences into timed events the
//! host UI applies to its diagram:
//! 1. **Activate / Clear** - light a key, then release it
//! 2. **ProgressChanged** - move the progress slider
//! 3. **PreviewChanged** - refresh the "previous / current / next" strip
//!
//! ## Sub-modules
//! - `types` - Track, TrackState, Event, Cue, Preview
//! - `timeline` - Virtual-time task queue
//! - `engine` - The player state machine
//!
//! ## Timing
//! For a delay `d`, every played tab produces:
//! - `Activate` at `t`
//! - `Clear` of the same key at `t + 0.7d`
//! - on the X-1, `Clear` of the octave indicators at `t + d`
//! - the next step at `t + d`
//!
//! Time is virtual. The host moves it forward with [`Player::advance`] or
//! [`Player::tick`], so tests run without a wall clock.
//!
//! ## Example
//! ```rust
//! use stylotab::config::Generation;
//! use stylotab::playback::{Event, Player, Track, TrackState};
//!
//! let tabs: Vec<String> = vec!["3".into(), "x2".into(), "4".into()];
//! let mut player = Player::new(Generation::S1, 200);
//! player.load(tabs.clone(), tabs);
//!
//! let mut cues = player.start(0);
//! while player.is_playing() {
//!     cues.extend(player.tick());
//! }
//!
//! let pressed: Vec<_> = cues
//!     .iter()
//!     .filter(|c| matches!(c.event, Event::Activate { .. }))
//!     .map(|c| c.at_ms)
//!     .collect();
//! assert_eq!(pressed, vec![0, 200]);
//! assert_eq!(player.state(Track::S1), TrackState::Finished);
//! ```

mod engine;
mod timeline;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{Player, PREVIEW_SPAN};
pub use timeline::Timeline;
pub use types::{Cue, Event, Preview, Track, TrackState};
