//! Seeding of lazily created playlists
//!
//! A playlist that is referenced for the first time is created on the spot
//! and pre-populated with synthetic entries. The tracks come from a
//! [`TrackSeeder`], so hosts and tests can decide what those tracks look like.

use crate::models::{Playlist, PlaylistId, Track};
use chrono::Utc;
use rand::Rng;

/// Duration of every synthetic track, in seconds
pub const SEED_TRACK_DURATION: f32 = 180.0;

/// Source of synthetic tracks for new playlists
pub trait TrackSeeder: Send + Sync {
    /// Produce the track placed at `index` of a new playlist.
    fn seed_track(&self, index: usize) -> Track;
}

/// Random tracks: track number in `[0, 15)`, artist id in `[0, 10000)`.
///
/// Track numbers repeat, so a seeded playlist may already hold value-equal
/// tracks.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTrackSeeder;

impl TrackSeeder for RandomTrackSeeder {
    fn seed_track(&self, _index: usize) -> Track {
        let mut rng = rand::thread_rng();
        let track_number = rng.gen_range(0..15);

        Track::new(
            format!("Track no: {}", track_number),
            SEED_TRACK_DURATION,
            rng.gen_range(0..10_000),
            track_number,
        )
    }
}

/// Deterministic, pairwise distinct tracks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialTrackSeeder;

impl TrackSeeder for SequentialTrackSeeder {
    fn seed_track(&self, index: usize) -> Track {
        let id = i32::try_from(index).unwrap_or(i32::MAX);
        Track::new(format!("Seed track {}", index), SEED_TRACK_DURATION, id, id)
    }
}

/// Build a playlist holding `entry_count` seeded entries at positions
/// `0..entry_count`.
pub fn seed_playlist(
    id: PlaylistId,
    name: &str,
    entry_count: usize,
    seeder: &dyn TrackSeeder,
) -> Playlist {
    let mut playlist = Playlist::new(id, name);
    let now = Utc::now();

    for index in 0..entry_count {
        playlist.push_track(seeder.seed_track(index), now);
    }

    playlist
}
