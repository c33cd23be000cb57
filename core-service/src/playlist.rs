//! # Playlist Service
//!
//! Validates add/remove requests before handing them to the repository.
//!
//! ## Overview
//!
//! The `PlaylistService` is responsible for:
//! - Short-circuiting empty requests
//! - Removing duplicate tracks from an incoming batch (first occurrence wins)
//! - Enforcing the maximum playlist size
//! - Normalizing the insert position (`-1` or past-the-end appends)
//! - Rejecting removals outside the current bounds
//! - Translating repository failures into [`ServiceError`]
//!
//! ## Usage
//!
//! ```ignore
//! use core_library::models::{PlaylistId, Track};
//! use core_library::repositories::InMemoryPlaylistRepository;
//! use core_runtime::config::PlaylistConfig;
//! use core_service::PlaylistService;
//! use std::sync::Arc;
//!
//! let config = PlaylistConfig::default();
//! let repository = Arc::new(InMemoryPlaylistRepository::new(config.clone()));
//! let service = PlaylistService::from_config(repository, &config);
//!
//! let playlist_id = PlaylistId::new();
//! let track = Track::new("A brand new track", 180.0, 4, 76868);
//! let added = service.add_tracks(&playlist_id, Some(vec![track]), 5).await?;
//! let removed = service.remove_tracks(&playlist_id, Some(vec![22])).await?;
//! ```

use crate::error::{Result, ServiceError};
use core_library::error::LibraryError;
use core_library::models::{InsertPosition, PlaylistEntry, PlaylistId, Track};
use core_library::repositories::PlaylistRepository;
use core_runtime::config::PlaylistConfig;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Insert position meaning "append at the end"
pub const APPEND_POSITION: i64 = -1;

/// Validating façade over a [`PlaylistRepository`]
#[derive(Clone)]
pub struct PlaylistService {
    repository: Arc<dyn PlaylistRepository>,
    max_playlist_size: usize,
}

impl PlaylistService {
    /// Create a new service enforcing `max_playlist_size`.
    pub fn new(repository: Arc<dyn PlaylistRepository>, max_playlist_size: usize) -> Self {
        Self {
            repository,
            max_playlist_size,
        }
    }

    /// Create a new service using the size cap from `config`.
    pub fn from_config(repository: Arc<dyn PlaylistRepository>, config: &PlaylistConfig) -> Self {
        Self::new(repository, config.max_playlist_size)
    }

    /// Access the repository backing the service.
    pub fn repository(&self) -> Arc<dyn PlaylistRepository> {
        Arc::clone(&self.repository)
    }

    /// Add tracks to a playlist at `at_position`.
    ///
    /// An absent or empty batch returns an empty list without touching the
    /// playlist. `at_position` of [`APPEND_POSITION`] or beyond the current
    /// size appends, also when the playlist shrinks before the insert runs;
    /// any other negative position yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::CapacityExceeded`] if the deduplicated batch would
    ///   push the playlist over its maximum size
    /// - [`ServiceError::OperationFailed`] for any unexpected repository failure
    #[instrument(skip(self, tracks_to_add), fields(playlist_id = %playlist_id))]
    pub async fn add_tracks(
        &self,
        playlist_id: &PlaylistId,
        tracks_to_add: Option<Vec<Track>>,
        at_position: i64,
    ) -> Result<Vec<PlaylistEntry>> {
        let tracks = match tracks_to_add {
            Some(tracks) if !tracks.is_empty() => tracks,
            _ => return Ok(Vec::new()),
        };

        let current_size = self
            .repository
            .entry_count(playlist_id)
            .await
            .map_err(|e| map_library_error(playlist_id, e))?;

        let tracks = remove_duplicate_tracks(tracks);

        if current_size + tracks.len() > self.max_playlist_size {
            warn!(
                current_size,
                requested = tracks.len(),
                max = self.max_playlist_size,
                "Rejecting insert over playlist capacity"
            );
            return Err(ServiceError::CapacityExceeded {
                max: self.max_playlist_size,
            });
        }

        let Some(position) = normalize_position(at_position, current_size) else {
            debug!(at_position, current_size, "Insert position out of bounds, nothing added");
            return Ok(Vec::new());
        };

        self.repository
            .insert(playlist_id, position, tracks)
            .await
            .map_err(|e| map_library_error(playlist_id, e))
    }

    /// Remove the entries at `positions` from a playlist.
    ///
    /// An absent or empty position list returns an empty list. Repeated
    /// positions collapse into a single removal.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidPosition`] if the playlist is empty or any
    ///   position lies outside `[0, size - 1]`
    /// - [`ServiceError::OperationFailed`] for any unexpected repository failure
    #[instrument(skip(self, positions), fields(playlist_id = %playlist_id))]
    pub async fn remove_tracks(
        &self,
        playlist_id: &PlaylistId,
        positions: Option<Vec<i64>>,
    ) -> Result<Vec<PlaylistEntry>> {
        let positions = match positions {
            Some(positions) if !positions.is_empty() => positions,
            _ => return Ok(Vec::new()),
        };

        let current_size = self
            .repository
            .entry_count(playlist_id)
            .await
            .map_err(|e| map_library_error(playlist_id, e))?;

        let Some(positions) = collect_positions(&positions, current_size) else {
            warn!(current_size, ?positions, "Rejecting removal at invalid positions");
            return Err(ServiceError::InvalidPosition);
        };

        self.repository
            .remove(playlist_id, &positions)
            .await
            .map_err(|e| map_library_error(playlist_id, e))
    }
}

/// Keep the first occurrence of every value-equal track, preserving order.
fn remove_duplicate_tracks(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::with_capacity(tracks.len());
    tracks
        .into_iter()
        .filter(|track| seen.insert(track.clone()))
        .collect()
}

/// `-1` and past-the-end positions append; `None` for any other negative
/// position.
///
/// The repository resolves the result against the playlist as it is when the
/// insert runs, so a concurrent removal still lands an append at the end.
fn normalize_position(at_position: i64, current_size: usize) -> Option<InsertPosition> {
    if at_position == APPEND_POSITION {
        return Some(InsertPosition::End);
    }

    let position = usize::try_from(at_position).ok()?;
    if position >= current_size {
        Some(InsertPosition::End)
    } else {
        Some(InsertPosition::At(position))
    }
}

/// De-duplicated positions, or `None` if the playlist is empty or any
/// position is outside `[0, current_size - 1]`.
fn collect_positions(positions: &[i64], current_size: usize) -> Option<BTreeSet<usize>> {
    if current_size == 0 {
        return None;
    }

    positions
        .iter()
        .map(|&position| {
            usize::try_from(position)
                .ok()
                .filter(|&position| position < current_size)
        })
        .collect()
}

fn map_library_error(playlist_id: &PlaylistId, err: LibraryError) -> ServiceError {
    match &err {
        LibraryError::CapacityExceeded { max, .. } => {
            warn!(playlist_id = %playlist_id, error = %err, "Playlist capacity exceeded");
            ServiceError::CapacityExceeded { max: *max }
        }
        LibraryError::PositionOutOfRange { .. } | LibraryError::EmptyPlaylist(_) => {
            warn!(playlist_id = %playlist_id, error = %err, "Invalid playlist position");
            ServiceError::InvalidPosition
        }
        LibraryError::Inconsistent(_) => {
            error!(playlist_id = %playlist_id, error = %err, "Playlist operation failed");
            ServiceError::OperationFailed
        }
    }
}
