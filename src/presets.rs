//! Preset tab files.
//!
//! A preset directory holds one `.txt` file per song. [`load_dir`] reads them
//! into a map keyed by file name, and [`to_json`] writes that map as the
//! bundle the browser host fetches.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::StyloError;

/// File extension of preset files.
pub const PRESET_EXTENSION: &str = "txt";

/// Preset bundle: file name → tab text, sorted by file name.
pub type Presets = BTreeMap<String, String>;

/// Read every `.txt` file directly inside `dir`. Subdirectories are not
/// searched.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Presets, StyloError> {
    let dir = dir.as_ref();
    let mut presets = Presets::new();

    for entry in WalkDir::new(dir).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if !entry.file_type().is_file()
            || entry.path().extension().map_or(true, |ext| ext != PRESET_EXTENSION)
        {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let text = fs::read_to_string(entry.path()).map_err(|source| StyloError::PresetError {
            path: entry.path().display().to_string(),
            source,
        })?;
        debug!(preset = %file_name, bytes = text.len(), "loaded preset");
        presets.insert(file_name, text);
    }

    info!(dir = %dir.display(), count = presets.len(), "loaded presets");
    Ok(presets)
}

/// Serialize presets as a pretty-printed JSON object.
pub fn to_json(presets: &Presets) -> Result<String, StyloError> {
    Ok(serde_json::to_string_pretty(presets)?)
}

/// Display name for a preset file: the file name without `.txt`.
///
/// # Example
/// ```
/// use stylotab::presets::preset_name;
///
/// assert_eq!(preset_name("Ode to Joy.txt"), "Ode to Joy");
/// assert_eq!(preset_name("notes"), "notes");
/// ```
pub fn preset_name(file_name: &str) -> &str {
    file_name.strip_suffix(".txt").unwrap_or(file_name)
}

fn walk_error(dir: &Path, e: walkdir::Error) -> StyloError {
    let path = e.path().unwrap_or(dir).display().to_string();
    StyloError::PresetError {
        path,
        source: e.into(),
    }
}
