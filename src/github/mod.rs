// ABOUTME: GitHub deployment API access.
// ABOUTME: Exports the DeploymentApi trait, its REST client, and payload types.

mod api;
mod client;
mod error;
mod models;

pub use api::{DeploymentApi, Repository};
pub use client::{GITHUB_API_BASE, GitHubClient, GitHubClientBuilder};
pub use error::ApiError;
pub use models::{Actor, CommitRef, Deployment, DeploymentState, DeploymentStatus, PullRequest};
