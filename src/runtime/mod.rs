//! Container runtime boundary
//!
//! Everything the dashboard knows comes from listing resources through a
//! [`SnapshotSource`], and everything it changes goes through
//! [`SnapshotSource::mutate`]. A mutation never returns the resulting record;
//! callers re-list to observe its effect.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{ContainerRecord, ImageRecord, ResourceKind, Result};

pub mod cli;
pub mod parse;

pub use cli::CliRuntime;

/// Source of resource listings and the only way to change them
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// List all containers, running and stopped
    async fn list_containers(&self) -> Result<Vec<ContainerRecord>>;

    /// List all images
    async fn list_images(&self) -> Result<Vec<ImageRecord>>;

    /// Apply a change; success only means the tool exited zero
    async fn mutate(&self, mutation: &Mutation) -> Result<()>;
}

/// Output format requested from the runtime's list commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line (`--format '{{json .}}'`)
    #[default]
    Json,
    /// Positional columns for runtimes without JSON templates
    Text,
}

/// A validated change to apply through the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    RemoveContainer {
        id: String,
    },
    StartContainer {
        id: String,
    },
    StopContainer {
        id: String,
    },
    RenameContainer {
        id: String,
        new_name: String,
    },
    CreateContainer {
        image: String,
        name: String,
        host_port: u16,
        container_port: u16,
    },
    RemoveImage {
        id: String,
    },
}

impl Mutation {
    /// The table whose contents this mutation changes
    pub fn kind(&self) -> ResourceKind {
        match self {
            Mutation::RemoveImage { .. } => ResourceKind::Images,
            _ => ResourceKind::Containers,
        }
    }

    /// Arguments passed to the runtime program
    pub fn args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            Mutation::RemoveContainer { id } => vec!["rm", "-f", id],
            Mutation::StartContainer { id } => vec!["start", id],
            Mutation::StopContainer { id } => vec!["stop", id],
            Mutation::RenameContainer { id, new_name } => vec!["rename", id, new_name],
            Mutation::CreateContainer {
                image,
                name,
                host_port,
                container_port,
            } => {
                return vec![
                    "run".to_string(),
                    "-d".to_string(),
                    "--name".to_string(),
                    name.clone(),
                    "-p".to_string(),
                    format!("{}:{}", host_port, container_port),
                    image.clone(),
                ];
            }
            Mutation::RemoveImage { id } => vec!["rmi", "-f", id],
        };
        args.into_iter().map(String::from).collect()
    }
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::RemoveContainer { id } => write!(f, "remove container {}", short(id)),
            Mutation::StartContainer { id } => write!(f, "start container {}", short(id)),
            Mutation::StopContainer { id } => write!(f, "stop container {}", short(id)),
            Mutation::RenameContainer { id, new_name } => {
                write!(f, "rename container {} to {}", short(id), new_name)
            }
            Mutation::CreateContainer {
                image,
                name,
                host_port,
                container_port,
            } => write!(
                f,
                "create container {} from {} ({}:{})",
                name, image, host_port, container_port
            ),
            Mutation::RemoveImage { id } => write!(f, "remove image {}", short(id)),
        }
    }
}

/// Shorten a full ID the way `ps` does by default
pub fn short(id: &str) -> &str {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    match id.char_indices().nth(12) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
