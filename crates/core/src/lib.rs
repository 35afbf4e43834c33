//! Core business logic for Noticeboard.
//!
//! This crate contains the notification lifecycle with ZERO web or database
//! dependencies. Persistence is reached through the
//! [`notification::NotificationRepository`] port.
//!
//! # Modules
//!
//! - `notification` - Record lifecycle orchestration
//! - `staging` - Local buffering of uploads
//! - `storage` - Object storage over OpenDAL

pub mod notification;
pub mod staging;
pub mod storage;
