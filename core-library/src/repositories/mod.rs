//! # Repository Pattern Implementation
//!
//! This module provides the repository trait and implementation for playlist
//! state.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - The in-memory implementation keeps one lock per playlist, so operations
//!   on different playlists never contend
//! - All operations return `Result<T>` for error handling
//!
//! ## Available Repositories
//!
//! - `PlaylistRepository` - Lazily created playlists with positional insert and removal

pub mod playlist;

pub use playlist::{InMemoryPlaylistRepository, PlaylistRepository};
