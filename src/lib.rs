//! Workspace façade crate.
//!
//! Re-exports the individual workspace crates (`core-runtime`,
//! `core-library`, `core-service`) so host applications can depend on
//! `playlist-core` alone.

pub use core_library as library;
pub use core_runtime as runtime;
pub use core_service as service;

pub use core_library::models::{InsertPosition, Playlist, PlaylistEntry, PlaylistId, Track};
pub use core_runtime::config::PlaylistConfig;
pub use core_service::{PlaylistService, ServiceError};
