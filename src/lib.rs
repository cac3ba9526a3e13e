// ABOUTME: Library root for preview-wait - exposes the waiters and their collaborators.
// ABOUTME: The command-line entry point is in main.rs.

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod github;
pub mod output;
pub mod preview;
pub mod wait;
