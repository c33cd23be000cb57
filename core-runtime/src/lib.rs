//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the playlist core:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the library and service
//! crates depend on. It establishes the logging conventions and the validated
//! configuration shared across the workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
