//! YouTube Module
//!
//! YouTube Data API v3 への再開可能アップロード

pub mod client;
pub mod models;
pub mod session;

pub use client::YouTubeClient;
