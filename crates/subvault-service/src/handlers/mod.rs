//! API handlers.

pub mod health;
pub mod subtitles;
pub mod transcript;
pub mod user;
