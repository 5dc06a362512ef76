use super::*;
use crate::config::Generation;
use crate::equivalence::{translate, EquivalenceMode, OctaveModifier};

fn tabs(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn player_for(generation: Generation, s1: &str, delay_ms: u32) -> Player {
    let x1 = translate(s1, EquivalenceMode::Mode1, OctaveModifier::Zero);
    let mut player = Player::new(generation, delay_ms);
    player.load(tabs(s1), tabs(&x1));
    player
}

fn run_to_end(player: &mut Player, mut cues: Vec<Cue>) -> Vec<Cue> {
    let mut guard = 0;
    while player.next_due().is_some() {
        cues.extend(player.tick());
        guard += 1;
        assert!(guard < 1000, "player never settled");
    }
    cues
}

fn activations(cues: &[Cue]) -> Vec<(u64, String)> {
    cues.iter()
        .filter_map(|c| match &c.event {
            Event::Activate { element } => Some((c.at_ms, element.clone())),
            _ => None,
        })
        .collect()
}

fn clears(cues: &[Cue]) -> Vec<(u64, String)> {
    cues.iter()
        .filter_map(|c| match &c.event {
            Event::Clear { element } => Some((c.at_ms, element.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_s1_timing() {
    let mut player = player_for(Generation::S1, "3 4.5 10", 500);
    let cues = player.start(0);
    let cues = run_to_end(&mut player, cues);

    assert_eq!(
        activations(&cues),
        vec![
            (0, "tab_s3".to_string()),
            (500, "tab_s4_5".to_string()),
            (1000, "tab_s10".to_string()),
        ]
    );
    assert_eq!(
        clears(&cues),
        vec![
            (350, "tab_s3".to_string()),
            (850, "tab_s4_5".to_string()),
            (1350, "tab_s10".to_string()),
        ]
    );
    assert_eq!(player.state(Track::S1), TrackState::Finished);
    assert_eq!(player.state(Track::X1), TrackState::Idle);
}

#[test]
fn test_first_step_is_immediate() {
    let mut player = player_for(Generation::S1, "5 6", 300);
    let cues = player.start(0);
    assert_eq!(activations(&cues), vec![(0, "tab_s5".to_string())]);
    assert_eq!(player.cursor(Track::S1), 1);
    assert_eq!(player.progress(), 1);
    assert_eq!(player.next_due(), Some(210));
}

#[test]
fn test_unplayable_tabs_are_skipped_without_delay() {
    let mut player = player_for(Generation::S1, "3 x2 E:4 ~ 5", 400);
    let cues = player.start(0);
    let cues = run_to_end(&mut player, cues);
    assert_eq!(
        activations(&cues),
        vec![(0, "tab_s3".to_string()), (400, "tab_s5".to_string())]
    );
}

#[test]
fn test_s1_skips_offset_tabs() {
    let mut player = Player::new(Generation::S1, 100);
    player.load(tabs("-1:1 3 +1:12"), tabs("-1:1 3 +1:12"));
    let cues = player.start(0);
    let cues = run_to_end(&mut player, cues);
    assert_eq!(activations(&cues), vec![(0, "tab_s3".to_string())]);
}

#[test]
fn test_x1_octave_indicators() {
    // Mode 1: S-1 "1" is X-1 "8" one octave down
    let mut player = player_for(Generation::X1, "1 3", 1000);
    let cues = player.start(0);

    let events: Vec<_> = cues.iter().map(|c| c.event.clone()).collect();
    let press_order: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::Activate { .. } | Event::Clear { .. }))
        .cloned()
        .collect();
    assert_eq!(
        press_order,
        vec![
            Event::activate("tab_xm1"),
            Event::clear("tab_xm2"),
            Event::activate("tab_x8"),
        ]
    );

    let cues = run_to_end(&mut player, Vec::new());
    assert_eq!(
        clears(&cues),
        vec![
            (700, "tab_x8".to_string()),
            (1000, "tab_xm1".to_string()),
            (1000, "tab_xm2".to_string()),
            (1700, "tab_x3".to_string()),
            (2000, "tab_xm1".to_string()),
            (2000, "tab_xm2".to_string()),
        ]
    );
    assert_eq!(activations(&cues), vec![(1000, "tab_x3".to_string())]);
}

#[test]
fn test_x1_two_octaves_down() {
    let x1 = translate("12", EquivalenceMode::Mode2, OctaveModifier::Down);
    assert_eq!(x1, "(-2:5)");

    let mut player = Player::new(Generation::X1, 500);
    player.set_hold_octave_indicator(true);
    player.load(tabs("12"), tabs(&x1));
    let cues = player.start(0);
    let presses: Vec<_> = cues
        .iter()
        .map(|c| &c.event)
        .filter(|e| matches!(e, Event::Activate { .. } | Event::Clear { .. }))
        .cloned()
        .collect();
    assert_eq!(
        presses,
        vec![
            Event::activate("tab_xm2"),
            Event::clear("tab_xm1"),
            Event::activate("tab_x5"),
        ]
    );

    // The held "-1" indicator is never released
    let cues = run_to_end(&mut player, Vec::new());
    assert_eq!(
        clears(&cues),
        vec![(350, "tab_x5".to_string()), (500, "tab_xm2".to_string())]
    );
}

#[test]
fn test_both_tracks_run_independently() {
    let mut player = player_for(Generation::Both, "1 3", 200);
    let cues = player.start(0);
    let cues = run_to_end(&mut player, cues);

    assert_eq!(
        activations(&cues),
        vec![
            (0, "tab_s1".to_string()),
            (0, "tab_xm1".to_string()),
            (0, "tab_x8".to_string()),
            (200, "tab_s3".to_string()),
            (200, "tab_x3".to_string()),
        ]
    );
    assert_eq!(player.state(Track::S1), TrackState::Finished);
    assert_eq!(player.state(Track::X1), TrackState::Finished);
}

#[test]
fn test_progress_follows_lead_track() {
    let mut player = player_for(Generation::Both, "3 4 5", 100);
    let cues = player.start(0);
    let progress: Vec<_> = cues
        .iter()
        .filter_map(|c| match c.event {
            Event::ProgressChanged { position } => Some(position),
            _ => None,
        })
        .collect();
    // Only the S-1 track reports progress in "both" mode
    assert_eq!(progress, vec![1]);

    let mut player = player_for(Generation::X1, "3 4 5", 100);
    player.start(1);
    assert_eq!(player.progress(), 2);
    assert_eq!(player.cursor(Track::X1), 2);
}

#[test]
fn test_preview_shows_display_track() {
    let mut player = player_for(Generation::X1, "1 3 4 5 6 7 8 9 10", 100);
    let cues = player.seek(6);
    assert_eq!(
        cues.last().map(|c| &c.event),
        Some(&Event::PreviewChanged(Preview {
            pre: tabs("3 4 5 6 7"),
            current: "8".to_string(),
            post: tabs("9 10"),
        }))
    );

    let preview = player.preview_at(0).unwrap();
    assert!(preview.pre.is_empty());
    assert_eq!(preview.current, "-1:8");
    assert_eq!(preview.post, tabs("3 4 5 6"));
}

#[test]
fn test_seek_does_not_start_playback() {
    let mut player = player_for(Generation::S1, "3 4 5", 100);
    let cues = player.seek(2);
    assert!(activations(&cues).is_empty());
    assert!(!player.is_playing());
    assert_eq!(player.cursor(Track::S1), 2);
    assert_eq!(player.cursor(Track::X1), 2);
    assert_eq!(player.progress(), 2);
    assert_eq!(player.next_due(), None);

    // Scrubbing past the end lands on the last tab
    player.seek(99);
    assert_eq!(player.progress(), 2);
}

#[test]
fn test_resume_from_scrub_position() {
    let mut player = player_for(Generation::S1, "3 4 5", 100);
    player.seek(2);
    let cues = player.start(player.progress());
    assert_eq!(activations(&cues), vec![(0, "tab_s5".to_string())]);
}

#[test]
fn test_terminates_within_sequence_length() {
    let sequence = "3 x2 4 5 ~ 6 7 E:1 8";
    let len = sequence.split_whitespace().count();
    let mut player = player_for(Generation::S1, sequence, 100);
    player.start(0);

    let mut steps = 1;
    while player.is_playing() {
        let due = player.next_due().expect("running track has a pending step");
        player.advance_to(due);
        if due % 100 == 0 {
            steps += 1;
        }
    }
    assert!(steps <= len + 1);
    assert_eq!(player.state(Track::S1), TrackState::Finished);
}

#[test]
fn test_stop_ends_chain_after_next_note() {
    let mut player = player_for(Generation::Both, "3 4 5 6", 500);
    player.start(0);
    player.advance(100);
    player.stop();

    let cues = run_to_end(&mut player, Vec::new());
    // The pending step still plays its note, then the chain ends
    assert_eq!(
        activations(&cues),
        vec![(500, "tab_s4".to_string()), (500, "tab_x4".to_string())]
    );
    assert_eq!(
        clears(&cues),
        vec![
            (350, "tab_s3".to_string()),
            (350, "tab_x3".to_string()),
            (500, "tab_xm1".to_string()),
            (500, "tab_xm2".to_string()),
            (850, "tab_s4".to_string()),
            (850, "tab_x4".to_string()),
            (1000, "tab_xm1".to_string()),
            (1000, "tab_xm2".to_string()),
        ]
    );
    assert_eq!(player.state(Track::S1), TrackState::Stopped);
    assert_eq!(player.state(Track::X1), TrackState::Stopped);
    assert_eq!(player.cursor(Track::S1), 2);
    assert_eq!(player.progress(), 0);
    assert_eq!(
        cues.iter().rev().find_map(|c| match c.event {
            Event::ProgressChanged { position } => Some(position),
            _ => None,
        }),
        Some(0)
    );
}

#[test]
fn test_stop_at_end_of_sequence_finishes() {
    let mut player = player_for(Generation::S1, "3", 500);
    player.start(0);
    player.stop();

    let cues = run_to_end(&mut player, Vec::new());
    assert!(activations(&cues).is_empty());
    assert_eq!(player.state(Track::S1), TrackState::Finished);
    assert_eq!(player.progress(), 1);
    assert!(!cues
        .iter()
        .any(|c| matches!(c.event, Event::ProgressChanged { .. })));
}

#[test]
fn test_restart_drops_stale_steps() {
    let mut player = player_for(Generation::S1, "3 4 5 6", 500);
    player.start(0);
    player.advance(100);
    player.stop();
    let cues = player.start(2);
    assert_eq!(activations(&cues), vec![(100, "tab_s5".to_string())]);

    let cues = run_to_end(&mut player, Vec::new());
    assert_eq!(activations(&cues), vec![(600, "tab_s6".to_string())]);
}

#[test]
fn test_delay_change_applies_to_next_step() {
    let mut player = player_for(Generation::S1, "3 4 5", 500);
    player.start(0);
    player.set_delay(1000);
    let cues = run_to_end(&mut player, Vec::new());
    assert_eq!(
        activations(&cues),
        vec![(500, "tab_s4".to_string()), (1500, "tab_s5".to_string())]
    );
}

#[test]
fn test_empty_sequence_finishes_immediately() {
    let mut player = Player::new(Generation::Both, 500);
    let cues = player.start(0);
    assert!(activations(&cues).is_empty());
    assert!(!player.is_playing());
    assert_eq!(player.next_due(), None);
    assert!(player.seek(3).is_empty());
}

#[test]
fn test_event_json_shape() {
    let json = serde_json::to_string(&Event::activate("tab_x8")).unwrap();
    assert_eq!(json, r#"{"type":"activate","element":"tab_x8"}"#);

    let json = serde_json::to_string(&Event::ProgressChanged { position: 3 }).unwrap();
    assert_eq!(json, r#"{"type":"progressChanged","position":3}"#);

    let cue = Cue {
        at_ms: 350,
        event: Event::clear("tab_s3"),
    };
    let json = serde_json::to_string(&cue).unwrap();
    assert_eq!(json, r#"{"atMs":350,"event":{"type":"clear","element":"tab_s3"}}"#);
}
