include!(concat!(env!("OUT_DIR"), "/presets.rs"));

/// A tab preset with its file name and content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub file_name: String,
    pub content: String,
}

impl Preset {
    /// Display name: the file name without `.txt`
    pub fn name(&self) -> &str {
        self.file_name.strip_suffix(".txt").unwrap_or(&self.file_name)
    }
}

/// Get all embedded presets
pub fn get_all_presets() -> Vec<Preset> {
    PRESETS
        .iter()
        .map(|(file_name, content)| Preset {
            file_name: file_name.to_string(),
            content: content.to_string(),
        })
        .collect()
}

/// Get a preset by file name or display name
pub fn get_preset(name: &str) -> Option<Preset> {
    get_all_presets()
        .into_iter()
        .find(|p| p.file_name == name || p.name() == name)
}

/// List all preset file names
pub fn list_presets() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _)| *name).collect()
}
