//! # Session
//!
//! Host-facing façade over the four stages. The host forwards every edit
//! and every control change; the session rebuilds the S-1 and X-1 sequences
//! from the raw text each time and keeps the player in sync.
//!
//! ## Rebuild Pipeline
//! ```text
//! raw text ─normalize─▶ normalized ─(transpose if enabled)─▶ S-1 tabs
//!                                                              │
//!                                        translate(mode, modifier)
//!                                                              ▼
//!                                                           X-1 tabs
//! ```
//!
//! ## Example
//! ```rust
//! use stylotab::{Session, Settings};
//! use stylotab::config::Generation;
//!
//! let mut session = Session::new(Settings {
//!     generation: Generation::Both,
//!     ..Settings::default()
//! });
//! session.set_text("(1 2) x2 # intro\n3");
//!
//! assert_eq!(session.normalized(), "1 2 1 2\n3");
//! assert_eq!(session.s1_tabs().join(" "), "1 2 1 2 3");
//! assert_eq!(session.x1_tabs().join(" "), "(-1:8) (-1:9) (-1:8) (-1:9) 3");
//! assert_eq!(session.asset_key(), "stylophone_both_tabs");
//! ```

use tracing::debug;

use crate::config::{validate_delay, validate_transpose, Generation, Settings, Style};
use crate::equivalence::translate;
use crate::error::StyloError;
use crate::normalize::normalize;
use crate::playback::{Cue, Event, Player, Preview, Track};
use crate::token::{INDICATOR_OCTAVE_DOWN, INDICATOR_S1_SWITCH};
use crate::transpose::transpose;

/// Text shown in a fresh editor.
pub const DEFAULT_TABS: &str = "# Write tabs here\n\n";

#[derive(Debug)]
pub struct Session {
    raw: String,
    settings: Settings,
    normalized: String,
    transposed: Option<String>,
    player: Player,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let mut player = Player::new(settings.generation, settings.delay_ms);
        player.set_hold_octave_indicator(settings.x1_octave_down);
        let mut session = Session {
            raw: DEFAULT_TABS.to_string(),
            settings,
            normalized: String::new(),
            transposed: None,
            player,
        };
        session.rebuild();
        session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn text(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Transposed text when transposition is enabled.
    pub fn transposed(&self) -> Option<&str> {
        self.transposed.as_deref()
    }

    pub fn s1_tabs(&self) -> &[String] {
        self.player.sequence(Track::S1)
    }

    pub fn x1_tabs(&self) -> &[String] {
        self.player.sequence(Track::X1)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Replace the tab text. Rewinds playback to the first tab.
    pub fn set_text(&mut self, raw: &str) -> Vec<Cue> {
        self.raw = raw.to_string();
        self.rebuild()
    }

    /// Apply a whole new set of settings.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<Vec<Cue>, StyloError> {
        settings.validate()?;
        self.settings = settings;
        self.player.set_generation(self.settings.generation);
        self.player.set_delay(self.settings.delay_ms);
        self.player
            .set_hold_octave_indicator(self.settings.x1_octave_down);
        Ok(self.rebuild())
    }

    pub fn set_generation(&mut self, generation: Generation) -> Vec<Cue> {
        self.settings.generation = generation;
        self.player.set_generation(generation);
        self.rebuild()
    }

    pub fn set_style(&mut self, style: Style) {
        self.settings.style = style;
    }

    /// Toggle the X-1 "-1 octave" switch: equivalence table, modifier and
    /// indicator hold all follow it.
    pub fn set_x1_octave_down(&mut self, on: bool) -> Vec<Cue> {
        self.settings.x1_octave_down = on;
        self.player.set_hold_octave_indicator(on);
        self.rebuild()
    }

    pub fn set_transpose_enabled(&mut self, enabled: bool) -> Vec<Cue> {
        self.settings.transpose_enabled = enabled;
        self.rebuild()
    }

    pub fn set_transpose_amount(&mut self, semitones: i32) -> Result<Vec<Cue>, StyloError> {
        validate_transpose(semitones)?;
        self.settings.transpose_amount = semitones;
        Ok(self.rebuild())
    }

    pub fn set_extended_range(&mut self, extended: bool) -> Vec<Cue> {
        self.settings.extended_range = extended;
        self.rebuild()
    }

    pub fn set_delay(&mut self, delay_ms: u32) -> Result<(), StyloError> {
        validate_delay(delay_ms)?;
        self.settings.delay_ms = delay_ms;
        self.player.set_delay(delay_ms);
        Ok(())
    }

    /// Largest position the progress control may take.
    pub fn progress_max(&self) -> usize {
        self.s1_tabs().len().saturating_sub(1)
    }

    /// Diagram asset for the current selections, e.g.
    /// `stylophone_x1_solfege-1`.
    pub fn asset_key(&self) -> String {
        let generation = self.settings.generation;
        let modifier = if self.settings.x1_octave_down && generation != Generation::S1 {
            "-1"
        } else {
            ""
        };
        format!("stylophone_{}_{}{}", generation, self.settings.style, modifier)
    }

    /// Elements to light as soon as a freshly loaded diagram is shown.
    pub fn asset_highlights(&self) -> Vec<Event> {
        let mut events = vec![Event::activate(INDICATOR_S1_SWITCH)];
        if self.settings.x1_octave_down {
            events.push(Event::activate(INDICATOR_OCTAVE_DOWN));
        }
        events
    }

    pub fn preview(&self) -> Option<Preview> {
        self.player.preview()
    }

    /// Start playback from the current progress position.
    pub fn play(&mut self) -> Vec<Cue> {
        let from = self.player.progress();
        self.player.start(from)
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// Scrub to `position`.
    pub fn seek(&mut self, position: usize) -> Vec<Cue> {
        self.player.seek(position)
    }

    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<Cue> {
        self.player.advance(elapsed_ms)
    }

    pub fn advance_to(&mut self, time_ms: u64) -> Vec<Cue> {
        self.player.advance_to(time_ms)
    }

    pub fn tick(&mut self) -> Vec<Cue> {
        self.player.tick()
    }

    /// Recompute every derived sequence from the raw text and refresh the
    /// preview.
    fn rebuild(&mut self) -> Vec<Cue> {
        let settings = &self.settings;
        self.normalized = normalize(&self.raw);
        self.transposed = settings.transpose_enabled.then(|| {
            transpose(
                &self.normalized,
                settings.transpose_amount,
                settings.extended_range,
            )
        });

        let s1_text = self.transposed.as_deref().unwrap_or(&self.normalized);
        let x1_text = translate(
            s1_text,
            settings.equivalence_mode(),
            settings.octave_modifier(),
        );
        let s1: Vec<String> = s1_text.split_whitespace().map(str::to_string).collect();
        let x1: Vec<String> = x1_text.split_whitespace().map(str::to_string).collect();

        debug!(normalized = %self.normalized, "normalized tabs");
        debug!(tabs = %s1.join(" "), "S-1 tabs");
        debug!(tabs = %x1.join(" "), "X-1 tabs");

        self.player.load(s1, x1);
        self.player.seek(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_is_empty() {
        let session = Session::default();
        assert_eq!(session.text(), DEFAULT_TABS);
        assert_eq!(session.normalized(), "");
        assert!(session.s1_tabs().is_empty());
        assert_eq!(session.progress_max(), 0);
        assert!(session.preview().is_none());
    }

    #[test]
    fn test_edit_rebuilds_and_previews() {
        let mut session = Session::default();
        let cues = session.set_text("3 4 5");
        assert_eq!(session.s1_tabs(), ["3", "4", "5"]);
        assert_eq!(session.progress_max(), 2);
        assert_eq!(
            cues.last().map(|c| &c.event),
            Some(&Event::PreviewChanged(Preview {
                pre: vec![],
                current: "3".to_string(),
                post: vec!["4".to_string(), "5".to_string()],
            }))
        );
    }

    #[test]
    fn test_octave_switch_changes_table() {
        let mut session = Session::default();
        session.set_text("1 10 12");
        assert_eq!(session.x1_tabs(), ["(-1:8)", "10", "12"]);

        session.set_x1_octave_down(true);
        assert_eq!(session.x1_tabs(), ["1", "(-2:3)", "(-2:5)"]);
        assert_eq!(session.s1_tabs(), ["1", "10", "12"]);
    }

    #[test]
    fn test_transposition_feeds_both_tracks() {
        let mut session = Session::default();
        session.set_text("1 2\n12");
        session.set_transpose_amount(1).unwrap();
        assert!(session.transposed().is_none());

        session.set_transpose_enabled(true);
        assert_eq!(session.transposed(), Some("1.5 3\n13"));
        assert_eq!(session.s1_tabs(), ["1.5", "3", "13"]);
        assert_eq!(session.x1_tabs(), ["(-1:8.5)", "3", "13"]);

        session.set_extended_range(false);
        assert_eq!(session.transposed(), Some("1.5 3\n-1:1"));
        assert_eq!(session.x1_tabs(), ["(-1:8.5)", "3", "-1:1"]);
    }

    #[test]
    fn test_rejects_out_of_range_controls() {
        let mut session = Session::default();
        assert!(session.set_transpose_amount(-13).is_err());
        assert!(session.set_delay(50).is_err());
        assert!(session.set_delay(800).is_ok());
        assert_eq!(session.player().delay_ms(), 800);

        let bad = Settings {
            delay_ms: 10_000,
            ..Settings::default()
        };
        assert!(session.apply_settings(bad).is_err());
        assert_eq!(session.settings().delay_ms, 800);
    }

    #[test]
    fn test_asset_key() {
        let mut session = Session::default();
        assert_eq!(session.asset_key(), "stylophone_x1_tabs");

        session.set_style(Style::Solfege);
        session.set_x1_octave_down(true);
        assert_eq!(session.asset_key(), "stylophone_x1_solfege-1");

        session.set_generation(Generation::S1);
        assert_eq!(session.asset_key(), "stylophone_s1_solfege");

        session.set_generation(Generation::Both);
        session.set_style(Style::Kids);
        assert_eq!(session.asset_key(), "stylophone_both_kids-1");
    }

    #[test]
    fn test_asset_highlights() {
        let mut session = Session::default();
        assert_eq!(session.asset_highlights(), vec![Event::activate("tab_sm2")]);
        session.set_x1_octave_down(true);
        assert_eq!(
            session.asset_highlights(),
            vec![Event::activate("tab_sm2"), Event::activate("tab_xm1")]
        );
    }

    #[test]
    fn test_play_from_scrub_position() {
        let mut session = Session::new(Settings {
            generation: Generation::S1,
            ..Settings::default()
        });
        session.set_text("3 4 5 6");
        session.seek(2);
        let cues = session.play();
        assert!(cues.iter().any(|c| c.event == Event::activate("tab_s5")));
        assert!(session.player().is_playing());

        session.stop();
        let cues = session.advance(session.settings().delay_ms as u64);
        assert!(cues.iter().any(|c| c.event == Event::activate("tab_s6")));
        assert!(!session.player().is_playing());
        assert_eq!(session.player().progress(), 0);
    }
}
