//! Playlist service demonstration
//!
//! Seeds a playlist, inserts and removes a few tracks, and logs each step.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run -p core-service --example playlist_demo
//!
//! # JSON format
//! cargo run -p core-service --example playlist_demo -- json
//! ```

use core_library::models::{PlaylistId, Track};
use core_library::repositories::{InMemoryPlaylistRepository, PlaylistRepository};
use core_runtime::config::PlaylistConfig;
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_service::PlaylistService;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let format = match env::args().nth(1).as_deref() {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug),
    )?;

    let config = PlaylistConfig::default();
    let repository = Arc::new(InMemoryPlaylistRepository::new(config.clone()));
    let service = PlaylistService::from_config(repository.clone(), &config);

    let playlist_id = PlaylistId::new();
    let tracks = vec![
        Track::new("A brand new track", 180.0, 4, 76868),
        Track::new("Another new track", 180.0, 5, 76869),
    ];

    let added = service
        .add_tracks(&playlist_id, Some(tracks.clone()), 5)
        .await?;
    info!(added = added.len(), "Inserted tracks at position 5");

    // Same tracks again: already present, nothing new is stored
    let again = service.add_tracks(&playlist_id, Some(tracks), -1).await?;
    info!(added = again.len(), "Re-inserted existing tracks");

    let removed = service.remove_tracks(&playlist_id, Some(vec![5, 6])).await?;
    info!(removed = removed.len(), "Removed inserted tracks");

    if let Err(e) = service.remove_tracks(&playlist_id, Some(vec![1000])).await {
        warn!(error = %e, "Removal rejected");
    }

    let playlist = repository.get_or_create(&playlist_id).await?;
    info!(
        entries = playlist.entry_count(),
        total_duration = playlist.total_duration(),
        "Final playlist state"
    );

    Ok(())
}
