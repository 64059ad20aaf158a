//! Maps user actions to runtime mutations

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::controller::{AppEvent, RefreshHandle};
use crate::core::{ContainerId, ImageId, ResourceKind, ValidationError};
use crate::runtime::{Mutation, SnapshotSource};

/// A user action, carrying the target ID captured when it was triggered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    DeleteContainer {
        id: ContainerId,
    },
    RunContainer {
        id: ContainerId,
    },
    StopContainer {
        id: ContainerId,
    },
    RenameContainer {
        id: ContainerId,
        new_name: String,
    },
    CreateFromImage {
        image: String,
        name: String,
        host_port: String,
        container_port: String,
    },
    DeleteImage {
        id: ImageId,
    },
}

impl Command {
    /// Check required input and build the mutation to apply
    pub fn validate(&self) -> Result<Mutation, ValidationError> {
        let mutation = match self {
            Command::DeleteContainer { id } => Mutation::RemoveContainer {
                id: required("Container ID", id)?,
            },
            Command::RunContainer { id } => Mutation::StartContainer {
                id: required("Container ID", id)?,
            },
            Command::StopContainer { id } => Mutation::StopContainer {
                id: required("Container ID", id)?,
            },
            Command::RenameContainer { id, new_name } => Mutation::RenameContainer {
                id: required("Container ID", id)?,
                new_name: required("Name", new_name)?,
            },
            Command::CreateFromImage {
                image,
                name,
                host_port,
                container_port,
            } => Mutation::CreateContainer {
                image: required("Image", image)?,
                name: required("Name", name)?,
                host_port: port("Port to run on", host_port)?,
                container_port: port("Port to expose", container_port)?,
            },
            Command::DeleteImage { id } => Mutation::RemoveImage {
                id: required("Image ID", id)?,
            },
        };
        Ok(mutation)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(value.to_string())
}

fn port(field: &'static str, value: &str) -> Result<u16, ValidationError> {
    let value = required(field, value)?;
    match value.parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(ValidationError::InvalidPort { field, value }),
    }
}

/// Applies commands through the snapshot source without blocking the caller
pub struct CommandDispatcher {
    source: Arc<dyn SnapshotSource>,
    containers: RefreshHandle,
    images: RefreshHandle,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl CommandDispatcher {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        containers: RefreshHandle,
        images: RefreshHandle,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            source,
            containers,
            images,
            events,
        }
    }

    /// Request an immediate refresh of one table
    pub fn refresh(&self, kind: ResourceKind) {
        self.handle(kind).request();
    }

    fn handle(&self, kind: ResourceKind) -> &RefreshHandle {
        match kind {
            ResourceKind::Containers => &self.containers,
            ResourceKind::Images => &self.images,
        }
    }

    /// Validate `command` and start its mutation in the background.
    ///
    /// Invalid input is rejected here and nothing is run. Otherwise the
    /// affected table is refreshed once the mutation returns, whatever its
    /// outcome, and a [`AppEvent::MutationFinished`] is sent.
    pub fn dispatch(&self, command: Command) -> Result<JoinHandle<()>, ValidationError> {
        let mutation = match command.validate() {
            Ok(mutation) => mutation,
            Err(e) => {
                warn!("Rejected {:?}: {}", command, e);
                return Err(e);
            }
        };
        info!("Dispatching: {}", mutation);

        let source = self.source.clone();
        let refresh = self.handle(mutation.kind()).clone();
        let events = self.events.clone();

        Ok(tokio::spawn(async move {
            let result = source.mutate(&mutation).await;
            if let Err(e) = &result {
                warn!("{} failed: {}", mutation, e);
            }
            refresh.request();
            let _ = events.send(AppEvent::MutationFinished { mutation, result });
        }))
    }
}
