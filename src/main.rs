//! stylotab - Stylophone tab tool
//!
//! Normalizes, transposes and translates S-1 tabs, and plays them back as a
//! stream of key events.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stylotab::config::{Generation, Settings};
use stylotab::{presets, Cue, EquivalenceMode, OctaveModifier, Session};

#[derive(Parser)]
#[command(name = "stylotab")]
#[command(about = "Stylophone S-1 / X-1 tab tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand repeats, strip comments and clean up tab text
    Normalize {
        /// Tab file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Output file (writes stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate S-1 tabs into X-1 tabs
    Translate {
        /// Tab file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Use the table for an X-1 with its "-1 octave" switch on
        #[arg(long)]
        octave_down: bool,

        /// Output file (writes stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Shift S-1 tabs by a number of semitones
    Transpose {
        /// Semitones, -12 to 12
        #[arg(allow_hyphen_values = true)]
        semitones: i32,

        /// Tab file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Limit the scale to the keys of the S-1
        #[arg(long)]
        standard_range: bool,

        /// Output file (writes stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Play tabs in real time, printing one JSON event per line
    Play {
        /// Tab file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Settings YAML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keyboard to animate: s1, x1 or both (overrides the settings file)
        #[arg(short, long)]
        generation: Option<Generation>,

        /// Delay between notes in milliseconds (overrides the settings file)
        #[arg(short, long)]
        delay: Option<u32>,

        /// Tab position to start from
        #[arg(long, default_value_t = 0)]
        from: usize,
    },

    /// Bundle a directory of .txt presets into JSON
    Presets {
        /// Directory holding the .txt files
        #[arg(default_value = "tabs")]
        dir: PathBuf,

        /// Output file (defaults to <dir>/tabs.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { input, output } => {
            let raw = read_input(input.as_deref())?;
            write_output(output.as_deref(), &stylotab::normalize(&raw))
        }
        Commands::Translate {
            input,
            octave_down,
            output,
        } => {
            let raw = read_input(input.as_deref())?;
            let (mode, modifier) = if octave_down {
                (EquivalenceMode::Mode2, OctaveModifier::Down)
            } else {
                (EquivalenceMode::Mode1, OctaveModifier::Zero)
            };
            let x1 = stylotab::translate(&stylotab::normalize(&raw), mode, modifier);
            write_output(output.as_deref(), &x1)
        }
        Commands::Transpose {
            semitones,
            input,
            standard_range,
            output,
        } => {
            stylotab::config::validate_transpose(semitones)?;
            let raw = read_input(input.as_deref())?;
            let shifted = stylotab::transpose::transpose_raw(&raw, semitones, !standard_range);
            write_output(output.as_deref(), &shifted)
        }
        Commands::Play {
            input,
            config,
            generation,
            delay,
            from,
        } => {
            let mut settings = match &config {
                Some(path) => {
                    let yaml = fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    Settings::from_yaml(&yaml)
                        .with_context(|| format!("Failed to load settings from {}", path.display()))?
                }
                None => Settings::default(),
            };
            if let Some(generation) = generation {
                settings.generation = generation;
            }
            if let Some(delay) = delay {
                settings.delay_ms = delay;
            }
            settings.validate()?;

            let raw = read_input(input.as_deref())?;
            play(settings, &raw, from)
        }
        Commands::Presets { dir, output } => {
            let bundle = presets::load_dir(&dir)?;
            let json = presets::to_json(&bundle)?;
            let output = output.unwrap_or_else(|| dir.join("tabs.json"));
            fs::write(&output, json)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(output = %output.display(), count = bundle.len(), "wrote preset bundle");
            Ok(())
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

/// Drive the player on the wall clock until every track has settled.
fn play(settings: Settings, raw: &str, from: usize) -> Result<()> {
    let mut session = Session::new(settings);
    session.set_text(raw);
    info!(
        asset = %session.asset_key(),
        tabs = session.s1_tabs().len(),
        "playing"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let highlights: Vec<Cue> = session
        .asset_highlights()
        .into_iter()
        .map(|event| Cue { at_ms: 0, event })
        .collect();
    print_cues(&mut out, &highlights)?;
    session.seek(from);
    let started = Instant::now();
    print_cues(&mut out, &session.play())?;

    while let Some(due) = session.player().next_due() {
        let target = started + Duration::from_millis(due);
        if let Some(wait) = target.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
        print_cues(&mut out, &session.advance_to(due))?;
    }
    Ok(())
}

fn print_cues(out: &mut impl Write, cues: &[Cue]) -> Result<()> {
    for cue in cues {
        serde_json::to_writer(&mut *out, cue)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
