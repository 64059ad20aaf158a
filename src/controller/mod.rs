//! Resource table controllers
//!
//! One [`RefreshWorker`] per resource kind polls the runtime off the render
//! loop and hands back immutable snapshots as [`AppEvent`]s. The
//! [`CommandDispatcher`] turns user intent into mutations and then asks the
//! affected worker to refresh immediately.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::core::{ContainerRecord, ImageRecord, Record, ResourceKind, Result};
use crate::runtime::{Mutation, SnapshotSource};

pub mod dispatch;
pub mod refresh;

pub use dispatch::{Command, CommandDispatcher};
pub use refresh::{RefreshGate, RefreshHandle, RefreshState, RefreshWorker};

/// Messages from background tasks to the render loop
#[derive(Debug)]
pub enum AppEvent {
    ContainersRefreshed(Result<Vec<ContainerRecord>>),
    ImagesRefreshed(Result<Vec<ImageRecord>>),
    MutationFinished {
        mutation: Mutation,
        result: Result<()>,
    },
}

/// A record type with its own table, listing call and snapshot event
pub trait Resource: Record + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// List every record of this kind
    fn fetch(source: Arc<dyn SnapshotSource>) -> BoxFuture<'static, Result<Vec<Self>>>;

    /// Wrap a listing result for the render loop
    fn into_event(result: Result<Vec<Self>>) -> AppEvent;
}

impl Resource for ContainerRecord {
    const KIND: ResourceKind = ResourceKind::Containers;

    fn fetch(source: Arc<dyn SnapshotSource>) -> BoxFuture<'static, Result<Vec<Self>>> {
        async move { source.list_containers().await }.boxed()
    }

    fn into_event(result: Result<Vec<Self>>) -> AppEvent {
        AppEvent::ContainersRefreshed(result)
    }
}

impl Resource for ImageRecord {
    const KIND: ResourceKind = ResourceKind::Images;

    fn fetch(source: Arc<dyn SnapshotSource>) -> BoxFuture<'static, Result<Vec<Self>>> {
        async move { source.list_images().await }.boxed()
    }

    fn into_event(result: Result<Vec<Self>>) -> AppEvent {
        AppEvent::ImagesRefreshed(result)
    }
}
