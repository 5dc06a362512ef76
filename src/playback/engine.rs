//! Sequence player
//!
//! Steps through the S-1 and X-1 tab sequences on a virtual clock, lighting
//! each playable key and releasing it before the next one.
//!
//! Each running track is a chain of steps: a step plays one note and
//! schedules the next step one delay later. Releases are scheduled at 70% of
//! the delay so consecutive presses of the same key stay visible. Stopping
//! only sets a flag; the next scheduled step still plays its note, then sees
//! the flag and ends the chain instead of rescheduling. Releases already
//! scheduled still fire.

use tracing::{debug, trace};

use super::timeline::Timeline;
use super::types::{Cue, Event, Preview, Track, TrackState};
use crate::config::{Generation, DEFAULT_DELAY_MS};
use crate::token::{
    element_id, Note, Token, INDICATOR_OCTAVE_DOWN, INDICATOR_TWO_OCTAVES_DOWN,
};

/// Tabs shown on each side of the current one in the preview.
pub const PREVIEW_SPAN: usize = 5;

/// Share of the delay a key stays lit, in tenths.
const DUTY_TENTHS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Task {
    Step(Track),
    Clear(String),
}

#[derive(Debug, Default)]
struct TrackCursor {
    tabs: Vec<String>,
    cursor: usize,
    state: TrackState,
}

/// Timed stepper over the two keyboard tracks.
///
/// # Example
/// ```
/// use stylotab::config::Generation;
/// use stylotab::playback::{Event, Player};
///
/// let mut player = Player::new(Generation::S1, 500);
/// player.load(vec!["3".into(), "4".into()], vec!["3".into(), "4".into()]);
///
/// let cues = player.start(0);
/// assert!(cues.iter().any(|c| c.event == Event::activate("tab_s3")));
///
/// let cues = player.tick();
/// assert_eq!(cues[0].at_ms, 350);
/// assert_eq!(cues[0].event, Event::clear("tab_s3"));
/// ```
#[derive(Debug)]
pub struct Player {
    tracks: [TrackCursor; 2],
    generation: Generation,
    delay_ms: u32,
    hold_octave_indicator: bool,
    stop_requested: bool,
    progress: usize,
    timeline: Timeline<Task>,
}

impl Default for Player {
    fn default() -> Self {
        Player::new(Generation::default(), DEFAULT_DELAY_MS)
    }
}

impl Player {
    pub fn new(generation: Generation, delay_ms: u32) -> Self {
        Player {
            tracks: Default::default(),
            generation,
            delay_ms,
            hold_octave_indicator: false,
            stop_requested: false,
            progress: 0,
            timeline: Timeline::new(),
        }
    }

    /// Replace both sequences and rewind every cursor.
    pub fn load(&mut self, s1: Vec<String>, x1: Vec<String>) {
        self.tracks[Track::S1.index()].tabs = s1;
        self.tracks[Track::X1.index()].tabs = x1;
        for track in &mut self.tracks {
            track.cursor = 0;
        }
        self.progress = 0;
    }

    pub fn set_generation(&mut self, generation: Generation) {
        self.generation = generation;
    }

    /// Delay between notes. Applies from the next scheduled step.
    pub fn set_delay(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }

    /// Keep `tab_xm1` lit instead of releasing it after each X-1 note.
    pub fn set_hold_octave_indicator(&mut self, hold: bool) {
        self.hold_octave_indicator = hold;
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn sequence(&self, track: Track) -> &[String] {
        &self.tracks[track.index()].tabs
    }

    pub fn cursor(&self, track: Track) -> usize {
        self.tracks[track.index()].cursor
    }

    pub fn state(&self, track: Track) -> TrackState {
        self.tracks[track.index()].state
    }

    /// Shared progress position.
    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Current player time in milliseconds.
    pub fn now(&self) -> u64 {
        self.timeline.now()
    }

    /// Time of the next scheduled task, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.timeline.next_due()
    }

    /// Whether any track is still running.
    pub fn is_playing(&self) -> bool {
        self.tracks.iter().any(|t| t.state == TrackState::Running)
    }

    /// Tracks animated for the current generation, S-1 first.
    pub fn active_tracks(&self) -> &'static [Track] {
        match self.generation {
            Generation::S1 => &[Track::S1],
            Generation::X1 => &[Track::X1],
            Generation::Both => &[Track::S1, Track::X1],
        }
    }

    /// Track whose cursor drives the shared progress position.
    pub fn lead_track(&self) -> Track {
        match self.generation {
            Generation::X1 => Track::X1,
            Generation::S1 | Generation::Both => Track::S1,
        }
    }

    /// Track whose tabs the preview shows.
    pub fn display_track(&self) -> Track {
        match self.generation {
            Generation::S1 => Track::S1,
            Generation::X1 | Generation::Both => Track::X1,
        }
    }

    /// Start every active track at `from` and play its first note now.
    ///
    /// Steps left over from an earlier run are dropped; their pending
    /// releases still fire.
    pub fn start(&mut self, from: usize) -> Vec<Cue> {
        self.timeline.retain(|task| !matches!(task, Task::Step(_)));
        self.stop_requested = false;
        self.progress = from;

        let tracks = self.active_tracks();
        for &track in tracks {
            let t = &mut self.tracks[track.index()];
            t.cursor = from;
            t.state = TrackState::Running;
        }
        debug!(generation = %self.generation, from, delay_ms = self.delay_ms, "playback started");

        let mut cues = Vec::new();
        for &track in tracks {
            self.step(track, &mut cues);
        }
        cues
    }

    /// Ask running tracks to stop after playing their next note.
    pub fn stop(&mut self) {
        if self.is_playing() {
            debug!("playback stop requested");
        }
        self.stop_requested = true;
    }

    /// Move every cursor to `position` (clamped to the last tab) without
    /// starting playback, and refresh the preview.
    pub fn seek(&mut self, position: usize) -> Vec<Cue> {
        let len = self.sequence(self.lead_track()).len();
        let position = position.min(len.saturating_sub(1));
        for track in &mut self.tracks {
            track.cursor = position;
        }
        self.progress = position;

        self.preview_at(position)
            .map(|preview| self.cue(Event::PreviewChanged(preview)))
            .into_iter()
            .collect()
    }

    /// Preview around the display track's cursor.
    pub fn preview(&self) -> Option<Preview> {
        self.preview_at(self.cursor(self.display_track()))
    }

    /// Preview around `position` in the display track.
    pub fn preview_at(&self, position: usize) -> Option<Preview> {
        let tabs = self.sequence(self.display_track());
        let current = tabs.get(position)?;
        let end = tabs.len().min(position + PREVIEW_SPAN);
        Some(Preview {
            pre: tabs[position.saturating_sub(PREVIEW_SPAN)..position].to_vec(),
            current: current.trim_matches(|c| c == '(' || c == ')').to_string(),
            post: tabs.get(position + 1..end).unwrap_or_default().to_vec(),
        })
    }

    /// Advance the clock by `elapsed_ms`, running every task that falls due.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<Cue> {
        let target = self.now().saturating_add(elapsed_ms);
        self.advance_to(target)
    }

    /// Advance the clock to `time`, running every task due at or before it.
    pub fn advance_to(&mut self, time: u64) -> Vec<Cue> {
        let mut cues = Vec::new();
        while let Some((_, task)) = self.timeline.pop_due(time) {
            match task {
                Task::Clear(element) => cues.push(self.cue(Event::Clear { element })),
                Task::Step(track) => self.scheduled_step(track, &mut cues),
            }
        }
        self.timeline.set_now(time);
        cues
    }

    /// Jump to the next due time and run everything scheduled for it.
    pub fn tick(&mut self) -> Vec<Cue> {
        match self.timeline.next_due() {
            Some(due) => self.advance_to(due),
            None => Vec::new(),
        }
    }

    fn cue(&self, event: Event) -> Cue {
        Cue {
            at_ms: self.timeline.now(),
            event,
        }
    }

    fn scheduled_step(&mut self, track: Track, cues: &mut Vec<Cue>) {
        if self.state(track) == TrackState::Running {
            self.step(track, cues);
        }
    }

    /// Play the next playable tab of `track`, skipping anything else.
    fn step(&mut self, track: Track, cues: &mut Vec<Cue>) {
        let is_lead = track == self.lead_track();

        let (position, note) = loop {
            let t = &mut self.tracks[track.index()];
            let position = t.cursor;
            let Some(word) = t.tabs.get(position) else {
                t.state = TrackState::Finished;
                if is_lead && self.progress != position {
                    self.progress = position;
                    cues.push(self.cue(Event::ProgressChanged { position }));
                }
                debug!(?track, position, "sequence finished");
                return;
            };
            t.cursor += 1;

            let token = Token::parse(word);
            match token.playable_on(track) {
                Some(note) => break (position, note.clone()),
                None => trace!(?track, position, word = %word, "skipping unplayable tab"),
            }
        };

        if is_lead {
            if let Some(preview) = self.preview_at(position) {
                cues.push(self.cue(Event::PreviewChanged(preview)));
            }
            self.progress = position + 1;
            cues.push(self.cue(Event::ProgressChanged {
                position: self.progress,
            }));
        }

        self.press(track, &note, cues);

        if self.stop_requested {
            self.tracks[track.index()].state = TrackState::Stopped;
            self.progress = 0;
            cues.push(self.cue(Event::ProgressChanged { position: 0 }));
            debug!(?track, "playback stopped");
        } else {
            self.timeline
                .schedule(u64::from(self.delay_ms), Task::Step(track));
        }
    }

    /// Light the key for `note` and schedule its release.
    fn press(&mut self, track: Track, note: &Note, cues: &mut Vec<Cue>) {
        let delay = u64::from(self.delay_ms);
        let element = element_id(track, &note.label);
        trace!(?track, element = %element, octave = note.octave, "press");

        if track == Track::X1 {
            match note.octave {
                -1 => {
                    cues.push(self.cue(Event::activate(INDICATOR_OCTAVE_DOWN)));
                    cues.push(self.cue(Event::clear(INDICATOR_TWO_OCTAVES_DOWN)));
                }
                -2 => {
                    cues.push(self.cue(Event::activate(INDICATOR_TWO_OCTAVES_DOWN)));
                    cues.push(self.cue(Event::clear(INDICATOR_OCTAVE_DOWN)));
                }
                _ => {}
            }
        }

        cues.push(self.cue(Event::Activate {
            element: element.clone(),
        }));
        self.timeline
            .schedule(delay * DUTY_TENTHS / 10, Task::Clear(element));

        if track == Track::X1 {
            if !self.hold_octave_indicator {
                self.timeline
                    .schedule(delay, Task::Clear(INDICATOR_OCTAVE_DOWN.to_string()));
            }
            self.timeline
                .schedule(delay, Task::Clear(INDICATOR_TWO_OCTAVES_DOWN.to_string()));
        }
    }
}
