//! Playlist repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{InsertPosition, Playlist, PlaylistEntry, PlaylistId, Track};
use crate::seed::{seed_playlist, RandomTrackSeeder, TrackSeeder};
use async_trait::async_trait;
use chrono::Utc;
use core_runtime::config::PlaylistConfig;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Playlist repository interface for data access operations
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Fetch a snapshot of the playlist, creating and seeding it if absent
    async fn get_or_create(&self, playlist_id: &PlaylistId) -> Result<Playlist>;

    /// Whether the playlist has been created. Never creates it.
    async fn exists(&self, playlist_id: &PlaylistId) -> Result<bool>;

    /// Number of entries in the playlist, creating it if absent
    async fn entry_count(&self, playlist_id: &PlaylistId) -> Result<usize>;

    /// Insert tracks at `at_position`
    ///
    /// The position is resolved against the entry count at the time of the
    /// insert, so a position past the end appends. Tracks already present in
    /// the playlist are dropped silently. Existing entries at or after the
    /// resolved position shift back by the number of inserted tracks.
    ///
    /// # Returns
    /// The newly created entries, in insertion order, at contiguous positions
    /// starting at the resolved position
    ///
    /// # Errors
    /// Returns error if the playlist would exceed its maximum size
    async fn insert(
        &self,
        playlist_id: &PlaylistId,
        at_position: InsertPosition,
        tracks: Vec<Track>,
    ) -> Result<Vec<PlaylistEntry>>;

    /// Remove the entries at the given positions
    ///
    /// Positions refer to the layout before the call.
    ///
    /// # Returns
    /// The removed entries in ascending original position
    ///
    /// # Errors
    /// Returns error if:
    /// - The playlist is empty
    /// - Any position is outside `[0, entry_count - 1]`
    async fn remove(
        &self,
        playlist_id: &PlaylistId,
        positions: &BTreeSet<usize>,
    ) -> Result<Vec<PlaylistEntry>>;

    /// Count registered playlists
    async fn count(&self) -> Result<usize>;
}

type PlaylistHandle = Arc<Mutex<Playlist>>;

/// In-memory implementation of PlaylistRepository
///
/// The outer map lock is only held to look up or create a playlist handle;
/// every mutation runs under that playlist's own lock.
pub struct InMemoryPlaylistRepository {
    playlists: Mutex<HashMap<PlaylistId, PlaylistHandle>>,
    config: PlaylistConfig,
    seeder: Arc<dyn TrackSeeder>,
}

impl InMemoryPlaylistRepository {
    /// Create a repository seeding new playlists with random tracks
    pub fn new(config: PlaylistConfig) -> Self {
        Self::with_seeder(config, Arc::new(RandomTrackSeeder))
    }

    /// Create a repository with a custom track seeder
    pub fn with_seeder(config: PlaylistConfig, seeder: Arc<dyn TrackSeeder>) -> Self {
        Self {
            playlists: Mutex::new(HashMap::new()),
            config,
            seeder,
        }
    }

    async fn handle(&self, playlist_id: &PlaylistId) -> PlaylistHandle {
        let mut playlists = self.playlists.lock().await;

        playlists
            .entry(playlist_id.clone())
            .or_insert_with(|| {
                debug!(
                    playlist_id = %playlist_id,
                    entries = self.config.default_playlist_entry_count,
                    "Creating seeded playlist"
                );
                Arc::new(Mutex::new(seed_playlist(
                    playlist_id.clone(),
                    &self.config.default_playlist_name,
                    self.config.default_playlist_entry_count,
                    self.seeder.as_ref(),
                )))
            })
            .clone()
    }
}

#[async_trait]
impl PlaylistRepository for InMemoryPlaylistRepository {
    async fn get_or_create(&self, playlist_id: &PlaylistId) -> Result<Playlist> {
        let handle = self.handle(playlist_id).await;
        let playlist = handle.lock().await;
        Ok(playlist.clone())
    }

    async fn exists(&self, playlist_id: &PlaylistId) -> Result<bool> {
        Ok(self.playlists.lock().await.contains_key(playlist_id))
    }

    async fn entry_count(&self, playlist_id: &PlaylistId) -> Result<usize> {
        let handle = self.handle(playlist_id).await;
        let playlist = handle.lock().await;
        Ok(playlist.entry_count)
    }

    #[instrument(skip(self, tracks), fields(playlist_id = %playlist_id, requested = tracks.len()))]
    async fn insert(
        &self,
        playlist_id: &PlaylistId,
        at_position: InsertPosition,
        tracks: Vec<Track>,
    ) -> Result<Vec<PlaylistEntry>> {
        let handle = self.handle(playlist_id).await;
        let mut playlist = handle.lock().await;

        let added = splice_in(&mut playlist, at_position, tracks, self.config.max_playlist_size)?;
        debug!(
            inserted = added.len(),
            entry_count = playlist.entry_count,
            "Tracks inserted"
        );

        Ok(added)
    }

    #[instrument(skip(self, positions), fields(playlist_id = %playlist_id, requested = positions.len()))]
    async fn remove(
        &self,
        playlist_id: &PlaylistId,
        positions: &BTreeSet<usize>,
    ) -> Result<Vec<PlaylistEntry>> {
        let handle = self.handle(playlist_id).await;
        let mut playlist = handle.lock().await;

        let removed = splice_out(&mut playlist, positions)?;
        debug!(
            removed = removed.len(),
            entry_count = playlist.entry_count,
            "Tracks removed"
        );

        Ok(removed)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.playlists.lock().await.len())
    }
}

/// Insert `tracks` at `at_position`.
///
/// The edit is applied to a working copy that replaces `playlist` only once
/// it validates, so a failure leaves `playlist` untouched.
fn splice_in(
    playlist: &mut Playlist,
    at_position: InsertPosition,
    tracks: Vec<Track>,
    max_size: usize,
) -> Result<Vec<PlaylistEntry>> {
    let original_len = playlist.entries.len();
    let at_position = at_position.resolve(original_len);

    let fresh: Vec<Track> = {
        let existing: HashSet<&Track> = playlist.tracks().collect();
        tracks
            .into_iter()
            .filter(|track| !existing.contains(track))
            .collect()
    };

    if original_len + fresh.len() > max_size {
        return Err(LibraryError::CapacityExceeded {
            playlist_id: playlist.id.to_string(),
            current: original_len,
            requested: fresh.len(),
            max: max_size,
        });
    }

    let mut working = playlist.clone();
    let shift = fresh.len();
    for entry in &mut working.entries[at_position..] {
        entry.position += shift;
    }

    let now = Utc::now();
    let mut added = Vec::with_capacity(shift);
    for (offset, track) in fresh.into_iter().enumerate() {
        working.total_duration += track.duration();
        added.push(PlaylistEntry::new(
            working.next_entry_id,
            working.id.clone(),
            at_position + offset,
            now,
            track,
        ));
        working.next_entry_id += 1;
    }

    working
        .entries
        .splice(at_position..at_position, added.iter().cloned());
    working.entry_count = working.entries.len();
    working.last_updated = now;

    working.validate().map_err(LibraryError::Inconsistent)?;
    *playlist = working;

    Ok(added)
}

/// Remove the entries at `positions`.
///
/// Removal runs from the highest position down, so each removal leaves the
/// positions still pending untouched. As with [`splice_in`], `playlist` is
/// only replaced once the edited copy validates.
fn splice_out(playlist: &mut Playlist, positions: &BTreeSet<usize>) -> Result<Vec<PlaylistEntry>> {
    let (Some(&lowest), Some(&highest)) = (positions.first(), positions.last()) else {
        return Ok(Vec::new());
    };

    let len = playlist.entries.len();
    if len == 0 {
        return Err(LibraryError::EmptyPlaylist(playlist.id.to_string()));
    }

    if highest >= len {
        return Err(LibraryError::PositionOutOfRange {
            playlist_id: playlist.id.to_string(),
            position: highest,
            len,
        });
    }

    let mut working = playlist.clone();
    let mut removed: Vec<PlaylistEntry> = positions
        .iter()
        .rev()
        .map(|&position| working.entries.remove(position))
        .collect();
    removed.reverse();

    for (index, entry) in working.entries.iter_mut().enumerate().skip(lowest) {
        entry.position = index;
    }

    let removed_duration: f32 = removed.iter().map(|entry| entry.track().duration()).sum();
    working.total_duration = (working.total_duration - removed_duration).max(0.0);
    working.entry_count = working.entries.len();
    working.last_updated = Utc::now();

    working.validate().map_err(LibraryError::Inconsistent)?;
    *playlist = working;

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SequentialTrackSeeder;

    fn setup_repo(entries: usize) -> InMemoryPlaylistRepository {
        let config = PlaylistConfig::builder()
            .default_playlist_entry_count(entries)
            .max_playlist_size(500)
            .build()
            .unwrap();
        InMemoryPlaylistRepository::with_seeder(config, Arc::new(SequentialTrackSeeder))
    }

    fn new_track(id: i32) -> Track {
        Track::new(format!("New track {}", id), 200.0, 4, 10_000 + id)
    }

    fn assert_contiguous(playlist: &Playlist) {
        for (index, entry) in playlist.entries().iter().enumerate() {
            assert_eq!(entry.position(), index);
        }
        assert_eq!(playlist.entry_count(), playlist.entries().len());
    }

    #[tokio::test]
    async fn test_get_or_create_seeds_once() {
        let repo = setup_repo(10);
        let id = PlaylistId::new();

        assert!(!repo.exists(&id).await.unwrap());

        let first = repo.get_or_create(&id).await.unwrap();
        assert_eq!(first.entry_count(), 10);
        assert_eq!(first.id(), &id);
        assert!(repo.exists(&id).await.unwrap());

        let second = repo.get_or_create(&id).await.unwrap();
        assert_eq!(first.registered_at(), second.registered_at());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_creates_one_playlist() {
        let repo = Arc::new(setup_repo(5));
        let id = PlaylistId::new();

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = Arc::clone(&repo);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                repo.insert(&id, InsertPosition::At(0), vec![new_track(i)]).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.count().await.unwrap(), 1);
        let playlist = repo.get_or_create(&id).await.unwrap();
        assert_eq!(playlist.entry_count(), 13);
        assert_contiguous(&playlist);
    }

    #[tokio::test]
    async fn test_insert_in_middle_shifts_tail() {
        let repo = setup_repo(10);
        let id = PlaylistId::new();
        let before = repo.get_or_create(&id).await.unwrap();
        let previously_at_5 = before.entry_at(5).unwrap().clone();

        let added = repo
            .insert(&id, InsertPosition::At(5), vec![new_track(1), new_track(2)])
            .await
            .unwrap();

        assert_eq!(added.len(), 2);
        assert_eq!(added[0].position(), 5);
        assert_eq!(added[1].position(), 6);
        assert_eq!(added[0].entry_id, 10);
        assert_eq!(added[1].entry_id, 11);

        let after = repo.get_or_create(&id).await.unwrap();
        assert_eq!(after.entry_count(), 12);
        assert_eq!(after.entry_at(7).unwrap().entry_id, previously_at_5.entry_id);
        assert_eq!(after.entry_at(4).unwrap().entry_id, before.entry_at(4).unwrap().entry_id);
        assert_eq!(after.total_duration(), before.total_duration() + 400.0);
        assert!(after.last_updated() >= before.last_updated());
        assert_contiguous(&after);
    }

    #[tokio::test]
    async fn test_insert_at_end_appends() {
        let repo = setup_repo(3);
        let id = PlaylistId::new();

        let added = repo.insert(&id, InsertPosition::At(3), vec![new_track(1)]).await.unwrap();
        assert_eq!(added[0].position(), 3);

        let playlist = repo.get_or_create(&id).await.unwrap();
        assert_eq!(playlist.entry_at(3).unwrap().track(), &new_track(1));
        assert_contiguous(&playlist);
    }

    #[tokio::test]
    async fn test_insert_drops_existing_tracks() {
        let repo = setup_repo(4);
        let id = PlaylistId::new();
        let existing = repo.get_or_create(&id).await.unwrap().entries()[2]
            .track()
            .clone();

        let added = repo
            .insert(&id, InsertPosition::At(0), vec![existing, new_track(1)])
            .await
            .unwrap();

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].track(), &new_track(1));
        assert_eq!(added[0].position(), 0);
        assert_eq!(repo.entry_count(&id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_insert_beyond_end_appends() {
        let repo = setup_repo(3);
        let id = PlaylistId::new();

        let added = repo
            .insert(&id, InsertPosition::At(4), vec![new_track(1)])
            .await
            .unwrap();
        assert_eq!(added[0].position(), 3);

        let added = repo
            .insert(&id, InsertPosition::End, vec![new_track(2)])
            .await
            .unwrap();
        assert_eq!(added[0].position(), 4);

        let playlist = repo.get_or_create(&id).await.unwrap();
        assert_eq!(playlist.entry_count(), 5);
        assert_contiguous(&playlist);
    }

    #[tokio::test]
    async fn test_insert_position_resolved_after_shrink() {
        let repo = setup_repo(5);
        let id = PlaylistId::new();

        // Position computed against 5 entries, playlist shrinks to 3 first
        repo.remove(&id, &BTreeSet::from([0, 1])).await.unwrap();
        let added = repo
            .insert(&id, InsertPosition::At(5), vec![new_track(1)])
            .await
            .unwrap();

        assert_eq!(added[0].position(), 3);
        assert_contiguous(&repo.get_or_create(&id).await.unwrap());
    }

    fn corrupted_playlist(entries: usize) -> Playlist {
        let mut playlist =
            seed_playlist(PlaylistId::from("p"), "Corrupt", entries, &SequentialTrackSeeder);
        playlist.entries[0].playlist_id = PlaylistId::from("elsewhere");
        playlist
    }

    #[test]
    fn test_failed_insert_validation_leaves_playlist_untouched() {
        let mut playlist = corrupted_playlist(4);
        let before = playlist.clone();

        let result = splice_in(&mut playlist, InsertPosition::At(1), vec![new_track(1)], 500);

        assert!(matches!(result, Err(LibraryError::Inconsistent(_))));
        assert_eq!(playlist, before);
    }

    #[test]
    fn test_failed_remove_validation_leaves_playlist_untouched() {
        let mut playlist = corrupted_playlist(4);
        let before = playlist.clone();

        let result = splice_out(&mut playlist, &BTreeSet::from([2]));

        assert!(matches!(result, Err(LibraryError::Inconsistent(_))));
        assert_eq!(playlist, before);
    }

    #[tokio::test]
    async fn test_insert_rejects_over_capacity_without_mutation() {
        let repo = setup_repo(499);
        let id = PlaylistId::new();
        let before = repo.get_or_create(&id).await.unwrap();

        let result = repo.insert(&id, InsertPosition::At(0), vec![new_track(1), new_track(2)]).await;
        assert!(matches!(
            result,
            Err(LibraryError::CapacityExceeded { current: 499, requested: 2, max: 500, .. })
        ));

        let after = repo.get_or_create(&id).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_remove_single_position() {
        let repo = setup_repo(10);
        let id = PlaylistId::new();
        let before = repo.get_or_create(&id).await.unwrap();

        let removed = repo.remove(&id, &BTreeSet::from([3])).await.unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].position(), 3);
        assert_eq!(removed[0].entry_id, before.entry_at(3).unwrap().entry_id);

        let after = repo.get_or_create(&id).await.unwrap();
        assert_eq!(after.entry_count(), 9);
        assert_eq!(after.entry_at(3).unwrap().entry_id, before.entry_at(4).unwrap().entry_id);
        assert_contiguous(&after);
    }

    #[tokio::test]
    async fn test_remove_multiple_positions_uses_original_layout() {
        let repo = setup_repo(10);
        let id = PlaylistId::new();
        let before = repo.get_or_create(&id).await.unwrap();

        let removed = repo.remove(&id, &BTreeSet::from([1, 4, 8])).await.unwrap();

        let removed_ids: Vec<u64> = removed.iter().map(|entry| entry.entry_id).collect();
        let expected: Vec<u64> = [1, 4, 8]
            .iter()
            .map(|&p| before.entry_at(p).unwrap().entry_id)
            .collect();
        assert_eq!(removed_ids, expected);

        let after = repo.get_or_create(&id).await.unwrap();
        assert_eq!(after.entry_count(), 7);
        for entry in &removed {
            assert!(!after.contains_track(entry.track()));
        }
        assert_contiguous(&after);
    }

    #[tokio::test]
    async fn test_remove_decrements_total_duration() {
        let repo = setup_repo(4);
        let id = PlaylistId::new();
        let before = repo.get_or_create(&id).await.unwrap();

        repo.remove(&id, &BTreeSet::from([0, 1])).await.unwrap();

        let after = repo.get_or_create(&id).await.unwrap();
        assert_eq!(after.total_duration(), before.total_duration() - 360.0);
    }

    #[tokio::test]
    async fn test_remove_rejects_out_of_range_without_mutation() {
        let repo = setup_repo(5);
        let id = PlaylistId::new();
        let before = repo.get_or_create(&id).await.unwrap();

        let result = repo.remove(&id, &BTreeSet::from([0, 5])).await;
        assert!(matches!(
            result,
            Err(LibraryError::PositionOutOfRange { position: 5, len: 5, .. })
        ));
        assert_eq!(repo.get_or_create(&id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_remove_from_empty_playlist() {
        let repo = setup_repo(0);
        let id = PlaylistId::new();

        let result = repo.remove(&id, &BTreeSet::from([0])).await;
        assert!(matches!(result, Err(LibraryError::EmptyPlaylist(_))));
    }

    #[tokio::test]
    async fn test_entry_ids_stay_unique_after_removal() {
        let repo = setup_repo(3);
        let id = PlaylistId::new();

        repo.remove(&id, &BTreeSet::from([0])).await.unwrap();
        let added = repo.insert(&id, InsertPosition::End, vec![new_track(1)]).await.unwrap();

        let playlist = repo.get_or_create(&id).await.unwrap();
        let ids: HashSet<u64> = playlist.entries().iter().map(|e| e.entry_id).collect();
        assert_eq!(ids.len(), playlist.entry_count());
        assert_eq!(added[0].entry_id, 3);
    }
}
