//! # Error Types
//!
//! This module defines the error type for the fallible edges of stylotab.
//!
//! The tab transformations themselves never fail: an out-of-scale note under
//! transposition becomes an `E:` tag, an unreadable token is skipped during
//! playback, and running off the end of a sequence simply finishes the track.
//! Errors only come from host input that cannot be honoured.
//!
//! ## Error Types
//! - `InvalidSetting` - A settings value outside its accepted range
//! - `ConfigError` - Settings YAML that cannot be deserialized
//! - `PresetError` - A preset directory that cannot be read
//! - `BundleError` - Preset bundle JSON that cannot be written
//!
//! ## Usage
//! ```rust
//! use stylotab::{Settings, StyloError};
//!
//! match Settings::from_yaml("delay: 250") {
//!     Ok(settings) => println!("delay {} ms", settings.delay_ms),
//!     Err(StyloError::InvalidSetting { name, message }) => {
//!         eprintln!("{}: {}", name, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyloError {
    /// A setting outside its accepted range.
    ///
    /// # Example
    /// ```
    /// # use stylotab::StyloError;
    /// let err = StyloError::InvalidSetting {
    ///     name: "transpose".to_string(),
    ///     message: "13 is outside -12..=12".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid setting 'transpose': 13 is outside -12..=12");
    /// ```
    #[error("Invalid setting '{name}': {message}")]
    InvalidSetting { name: String, message: String },

    /// Settings YAML that could not be deserialized.
    ///
    /// # Example
    /// ```
    /// # use stylotab::StyloError;
    /// let err = StyloError::ConfigError("expected a mapping".to_string());
    /// assert_eq!(err.to_string(), "Invalid settings: expected a mapping");
    /// ```
    #[error("Invalid settings: {0}")]
    ConfigError(String),

    /// A preset directory or file that could not be read.
    #[error("Cannot load presets from '{path}': {source}")]
    PresetError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The preset bundle could not be serialized.
    #[error("Cannot bundle presets: {0}")]
    BundleError(#[from] serde_json::Error),
}
