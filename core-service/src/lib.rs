//! Playlist service façade.
//!
//! This crate validates caller requests (bounds, size cap, duplicate tracks
//! within a batch) and delegates the actual list mutation to a
//! [`PlaylistRepository`](core_library::repositories::PlaylistRepository).
//! `add_tracks` and `remove_tracks` are the whole boundary exposed to hosts.

pub mod error;
pub mod playlist;

pub use error::{Result, ServiceError};
pub use playlist::PlaylistService;
