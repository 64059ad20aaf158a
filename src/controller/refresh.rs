//! Periodic and on-demand refresh with at most one listing in flight per kind

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

use crate::controller::{AppEvent, Resource};
use crate::core::{ResourceKind, Result};
use crate::runtime::SnapshotSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// Decides when a listing may start.
///
/// Triggers that arrive while a listing is in flight collapse into a single
/// pending flag, consumed when the listing completes.
#[derive(Debug)]
pub struct RefreshGate {
    state: RefreshState,
    pending: bool,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            state: RefreshState::Idle,
            pending: false,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Register a trigger; returns true if a listing should start now
    pub fn request(&mut self) -> bool {
        match self.state {
            RefreshState::Idle => {
                self.state = RefreshState::Refreshing;
                true
            }
            RefreshState::Refreshing => {
                self.pending = true;
                false
            }
        }
    }

    /// Register completion; returns true if the coalesced follow-up should start now
    pub fn complete(&mut self) -> bool {
        if self.pending {
            self.pending = false;
            true
        } else {
            self.state = RefreshState::Idle;
            false
        }
    }
}

/// Asks a worker to refresh now
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    kind: ResourceKind,
    tx: mpsc::UnboundedSender<()>,
}

impl RefreshHandle {
    pub fn channel(kind: ResourceKind) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { kind, tx }, rx)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Never blocks; a no-op once the worker has stopped
    pub fn request(&self) {
        if self.tx.send(()).is_err() {
            debug!("Refresh worker for {} is gone, dropping request", self.kind);
        }
    }
}

/// Background task that lists one kind of resource on a timer and on request
pub struct RefreshWorker<R: Resource> {
    source: Arc<dyn SnapshotSource>,
    interval: Duration,
    requests: mpsc::UnboundedReceiver<()>,
    events: mpsc::UnboundedSender<AppEvent>,
    gate: RefreshGate,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> RefreshWorker<R> {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        interval: Duration,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> (Self, RefreshHandle) {
        let (handle, requests) = RefreshHandle::channel(R::KIND);
        let worker = Self {
            source,
            interval,
            requests,
            events,
            gate: RefreshGate::new(),
            _resource: PhantomData,
        };
        (worker, handle)
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until every handle is dropped or the render loop stops listening.
    ///
    /// The first timer tick fires immediately and performs the initial load.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight: Option<BoxFuture<'static, Result<Vec<R>>>> = None;

        debug!("Refresh worker for {} started ({:?})", R::KIND, self.interval);

        loop {
            tokio::select! {
                biased;
                request = self.requests.recv() => match request {
                    Some(()) => self.trigger(&mut in_flight, "request"),
                    None => break,
                },
                _ = ticker.tick() => self.trigger(&mut in_flight, "tick"),
                result = wait_for(&mut in_flight) => {
                    in_flight = None;
                    match &result {
                        Ok(rows) => debug!("Listed {} {}", rows.len(), R::KIND),
                        Err(e) if e.is_parse() => error!("Listing {} failed: {}", R::KIND, e),
                        Err(e) => warn!("Listing {} failed: {}", R::KIND, e),
                    }
                    if self.events.send(R::into_event(result)).is_err() {
                        break;
                    }
                    if self.gate.complete() {
                        debug!("Starting coalesced refresh of {}", R::KIND);
                        in_flight = Some(R::fetch(self.source.clone()));
                    }
                }
            }
        }

        debug!("Refresh worker for {} stopped", R::KIND);
    }

    fn trigger(
        &mut self,
        in_flight: &mut Option<BoxFuture<'static, Result<Vec<R>>>>,
        reason: &str,
    ) {
        if self.gate.request() {
            debug!("Refreshing {} ({})", R::KIND, reason);
            *in_flight = Some(R::fetch(self.source.clone()));
        } else {
            debug!("Refresh of {} already in flight, coalescing {}", R::KIND, reason);
        }
    }
}

async fn wait_for<T>(in_flight: &mut Option<BoxFuture<'static, T>>) -> T {
    match in_flight {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}
