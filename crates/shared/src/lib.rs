//! Shared configuration and error types for Noticeboard.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, StagingConfig, StorageKind, StorageSettings};
pub use error::AppError;
