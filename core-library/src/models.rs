//! Domain models for playlists
//!
//! This module contains the value types shared by the repository and service
//! layers, with structural equality and consistency validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for a playlist
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(pub String);

impl PlaylistId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PlaylistId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlaylistId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlaylistId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// Domain Models
// =============================================================================

/// A track as referenced by playlists.
///
/// Immutable after construction. Two tracks are equal iff title, duration,
/// artist id and track id are all equal; the duration is compared by bit
/// pattern so `Eq` and `Hash` stay lawful for floats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    title: String,
    /// Duration in seconds
    duration: f32,
    artist_id: i32,
    id: i32,
}

impl Track {
    pub fn new(title: impl Into<String>, duration: f32, artist_id: i32, id: i32) -> Self {
        Self {
            title: title.into(),
            duration,
            artist_id,
            id,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn artist_id(&self) -> i32 {
        self.artist_id
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// Structural equality over all four fields.
    pub fn same_as(&self, other: &Track) -> bool {
        self.id == other.id
            && self.artist_id == other.artist_id
            && self.duration.to_bits() == other.duration.to_bits()
            && self.title == other.title
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.duration.to_bits().hash(state);
        self.artist_id.hash(state);
        self.id.hash(state);
    }
}

/// Placement of a track within a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Identifier assigned by the owning playlist
    pub entry_id: u64,
    /// Owning playlist
    pub playlist_id: PlaylistId,
    /// 0-based rank within the playlist
    pub(crate) position: usize,
    /// When the entry was created
    pub added_at: DateTime<Utc>,
    track_id: i32,
    track: Track,
}

impl PlaylistEntry {
    pub fn new(
        entry_id: u64,
        playlist_id: PlaylistId,
        position: usize,
        added_at: DateTime<Utc>,
        track: Track,
    ) -> Self {
        Self {
            entry_id,
            playlist_id,
            position,
            added_at,
            track_id: track.id(),
            track,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Id of the referenced track, kept in sync with [`PlaylistEntry::track`].
    pub fn track_id(&self) -> i32 {
        self.track_id
    }

    /// Point this entry at another track.
    pub fn replace_track(&mut self, track: Track) {
        self.track_id = track.id();
        self.track = track;
    }
}

/// Where an inserted batch lands in a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the entry currently at this index; past the end appends
    At(usize),
    /// After the last entry
    End,
}

impl InsertPosition {
    /// Concrete index for a playlist currently holding `len` entries.
    pub fn resolve(self, len: usize) -> usize {
        match self {
            InsertPosition::At(position) => position.min(len),
            InsertPosition::End => len,
        }
    }
}

/// Ordered playlist state.
///
/// `entries` is the source of truth for order: after every successful
/// mutation `entries[i].position == i` and `entry_count == entries.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub(crate) id: PlaylistId,
    /// Display name
    pub name: String,
    pub(crate) entries: Vec<PlaylistEntry>,
    pub(crate) entry_count: usize,
    /// Sum of contained track durations, in seconds
    pub(crate) total_duration: f32,
    pub(crate) last_updated: DateTime<Utc>,
    pub(crate) registered_at: DateTime<Utc>,
    /// Soft-delete marker
    pub deleted: bool,
    pub(crate) next_entry_id: u64,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new(id: PlaylistId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            entries: Vec::new(),
            entry_count: 0,
            total_duration: 0.0,
            last_updated: now,
            registered_at: now,
            deleted: false,
            next_entry_id: 0,
        }
    }

    pub fn id(&self) -> &PlaylistId {
        &self.id
    }

    /// Entries in ascending position order
    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn entry_at(&self, position: usize) -> Option<&PlaylistEntry> {
        self.entries.get(position)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.entries.iter().map(PlaylistEntry::track)
    }

    pub fn contains_track(&self, track: &Track) -> bool {
        self.tracks().any(|existing| existing.same_as(track))
    }

    /// Append a freshly numbered entry for `track`.
    pub(crate) fn push_track(&mut self, track: Track, added_at: DateTime<Utc>) {
        let position = self.entries.len();
        self.total_duration += track.duration();
        self.entries.push(PlaylistEntry::new(
            self.next_entry_id,
            self.id.clone(),
            position,
            added_at,
            track,
        ));
        self.next_entry_id += 1;
        self.entry_count = self.entries.len();
    }

    /// Validate playlist consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.entry_count != self.entries.len() {
            return Err(format!(
                "Entry count {} does not match {} stored entries",
                self.entry_count,
                self.entries.len()
            ));
        }

        if let Some((index, entry)) = self
            .entries
            .iter()
            .enumerate()
            .find(|(index, entry)| entry.position != *index)
        {
            return Err(format!(
                "Entry {} sits at index {} but records position {}",
                entry.entry_id, index, entry.position
            ));
        }

        if let Some(entry) = self.entries.iter().find(|entry| entry.playlist_id != self.id) {
            return Err(format!(
                "Entry {} belongs to playlist {}",
                entry.entry_id, entry.playlist_id
            ));
        }

        Ok(())
    }
}
