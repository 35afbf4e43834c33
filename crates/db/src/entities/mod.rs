//! `SeaORM` entity definitions.

pub mod notifications;
