//! # Core Configuration Module
//!
//! Provides configuration management for the playlist core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `PlaylistConfig` instance holding the settings the repository and service
//! layers need. It enforces fail-fast validation so an inconsistent
//! configuration is rejected before any playlist is created.
//!
//! ## Settings
//!
//! - `default_playlist_entry_count` - Number of synthetic entries seeded into
//!   a newly created playlist
//! - `max_playlist_size` - Upper bound on the number of entries in a playlist
//! - `default_playlist_name` - Name given to lazily created playlists
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::PlaylistConfig;
//!
//! let config = PlaylistConfig::builder()
//!     .default_playlist_entry_count(376)
//!     .max_playlist_size(500)
//!     .build()
//!     .expect("Failed to build config");
//!
//! assert_eq!(config.default_playlist_entry_count, 376);
//! ```
//!
//! ## Error Handling
//!
//! The builder validates all values and provides actionable error messages:
//!
//! ```should_panic
//! use core_runtime::config::PlaylistConfig;
//!
//! // Seeding more entries than a playlist may hold is rejected
//! let config = PlaylistConfig::builder()
//!     .default_playlist_entry_count(600)
//!     .max_playlist_size(500)
//!     .build()
//!     .expect("Should fail - seed count exceeds the size cap");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of entries seeded into a new playlist.
pub const DEFAULT_PLAYLIST_ENTRY_COUNT: usize = 376;

/// Default maximum number of entries in a playlist.
pub const DEFAULT_MAX_PLAYLIST_SIZE: usize = 500;

/// Default name of a lazily created playlist.
pub const DEFAULT_PLAYLIST_NAME: &str = "Collection of great songs";

/// Playlist configuration.
///
/// Use [`PlaylistConfigBuilder`] to construct validated instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaylistConfig {
    /// Number of synthetic entries seeded into a newly created playlist
    pub default_playlist_entry_count: usize,

    /// Maximum number of entries a playlist may hold
    pub max_playlist_size: usize,

    /// Name given to lazily created playlists
    pub default_playlist_name: String,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            default_playlist_entry_count: DEFAULT_PLAYLIST_ENTRY_COUNT,
            max_playlist_size: DEFAULT_MAX_PLAYLIST_SIZE,
            default_playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
        }
    }
}

impl PlaylistConfig {
    /// Creates a new builder for constructing a `PlaylistConfig`.
    pub fn builder() -> PlaylistConfigBuilder {
        PlaylistConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The size cap is greater than zero
    /// - The seed count fits within the size cap
    /// - The default playlist name is not blank
    pub fn validate(&self) -> Result<()> {
        if self.max_playlist_size == 0 {
            return Err(Error::Config(
                "Maximum playlist size must be greater than 0".to_string(),
            ));
        }

        if self.default_playlist_entry_count > self.max_playlist_size {
            return Err(Error::Config(format!(
                "Default playlist entry count ({}) exceeds maximum playlist size ({}). \
                 Lower .default_playlist_entry_count() or raise .max_playlist_size().",
                self.default_playlist_entry_count, self.max_playlist_size
            )));
        }

        if self.default_playlist_name.trim().is_empty() {
            return Err(Error::Config(
                "Default playlist name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for constructing [`PlaylistConfig`] instances.
///
/// Unset values fall back to the defaults; [`build()`](PlaylistConfigBuilder::build)
/// validates the result.
#[derive(Debug, Default)]
pub struct PlaylistConfigBuilder {
    default_playlist_entry_count: Option<usize>,
    max_playlist_size: Option<usize>,
    default_playlist_name: Option<String>,
}

impl PlaylistConfigBuilder {
    /// Sets the number of synthetic entries seeded into new playlists.
    ///
    /// Default: 376
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::PlaylistConfig;
    ///
    /// let builder = PlaylistConfig::builder()
    ///     .default_playlist_entry_count(10);
    /// ```
    pub fn default_playlist_entry_count(mut self, count: usize) -> Self {
        self.default_playlist_entry_count = Some(count);
        self
    }

    /// Sets the maximum number of entries a playlist may hold.
    ///
    /// Default: 500
    pub fn max_playlist_size(mut self, size: usize) -> Self {
        self.max_playlist_size = Some(size);
        self
    }

    /// Sets the name given to lazily created playlists.
    pub fn default_playlist_name(mut self, name: impl Into<String>) -> Self {
        self.default_playlist_name = Some(name.into());
        self
    }

    /// Builds the final `PlaylistConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the resulting configuration fails
    /// [`PlaylistConfig::validate`].
    pub fn build(self) -> Result<PlaylistConfig> {
        let defaults = PlaylistConfig::default();

        let config = PlaylistConfig {
            default_playlist_entry_count: self
                .default_playlist_entry_count
                .unwrap_or(defaults.default_playlist_entry_count),
            max_playlist_size: self.max_playlist_size.unwrap_or(defaults.max_playlist_size),
            default_playlist_name: self
                .default_playlist_name
                .unwrap_or(defaults.default_playlist_name),
        };

        config.validate()?;

        Ok(config)
    }
}
