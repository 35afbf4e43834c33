//! Object storage for notification images using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Google Cloud Storage (including Firebase Storage buckets)
//! - Local filesystem (development only)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Apache OpenDAL                              │
//! │                   (Unified Storage API)                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ op.write_with("key", data) │ op.presign_read("key", duration)   │
//! │ op.delete("key")           │ op.stat("key")                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{SignedUrl, StorageService};
pub(crate) use service::sanitize_filename;
