//! # Library Management Module
//!
//! Owns the playlist state and provides the repository pattern for mutating
//! it.
//!
//! ## Overview
//!
//! This module manages:
//! - Domain models for tracks, playlist entries and playlists
//! - Seeding of lazily created playlists with synthetic tracks
//! - The playlist repository performing position-preserving inserts and removals

pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;

pub use error::{LibraryError, Result};
