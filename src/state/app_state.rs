//! Application state management

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::controller::AppEvent;
use crate::core::{
    ContainerRecord, DockpaneError, ImageRecord, NotificationLevel, ResourceKind, Tab,
};
use crate::state::{FormState, ResourceTable};

/// Main application state, owned by the render loop
#[derive(Debug, Clone)]
pub struct AppState {
    pub current_tab: Tab,

    // Tables
    pub containers: ResourceTable<ContainerRecord>,
    pub images: ResourceTable<ImageRecord>,

    // UI state
    pub form: Option<FormState>,
    pub show_help: bool,
    pub notifications: Vec<Notification>,
    pub runtime_name: String,
}

/// Notification message
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new app state
    pub fn new() -> Self {
        Self {
            current_tab: Tab::Containers,
            containers: ResourceTable::new(),
            images: ResourceTable::new(),
            form: None,
            show_help: false,
            notifications: vec![],
            runtime_name: "docker".to_string(),
        }
    }

    /// Add a notification; a repeat of the latest message only refreshes its timestamp
    pub fn add_notification(&mut self, message: impl Into<String>, level: NotificationLevel) {
        let message = message.into();
        if let Some(last) = self.notifications.last_mut() {
            if last.message == message && last.level == level {
                last.timestamp = Utc::now();
                return;
            }
        }

        self.notifications.push(Notification {
            message,
            level,
            timestamp: Utc::now(),
        });

        // Keep only last 10 notifications
        if self.notifications.len() > 10 {
            self.notifications.remove(0);
        }
    }

    /// Clear old notifications (older than threshold)
    pub fn clear_old_notifications(&mut self, max_age_seconds: i64) {
        let cutoff = Utc::now() - chrono::Duration::seconds(max_age_seconds);
        self.notifications.retain(|n| n.timestamp > cutoff);
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Error from the last refresh of `kind`, if it failed
    pub fn refresh_error(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Containers => self.containers.last_error(),
            ResourceKind::Images => self.images.last_error(),
        }
    }

    /// Apply a background result to the render state
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ContainersRefreshed(Ok(rows)) => {
                debug!("Reconciling {} containers", rows.len());
                self.containers.reconcile(rows);
            }
            AppEvent::ContainersRefreshed(Err(e)) => {
                let message = self.refresh_failed(ResourceKind::Containers, &e);
                self.containers.record_failure(message);
            }
            AppEvent::ImagesRefreshed(Ok(rows)) => {
                debug!("Reconciling {} images", rows.len());
                self.images.reconcile(rows);
            }
            AppEvent::ImagesRefreshed(Err(e)) => {
                let message = self.refresh_failed(ResourceKind::Images, &e);
                self.images.record_failure(message);
            }
            AppEvent::MutationFinished { mutation, result } => match result {
                Ok(()) => self.add_notification(
                    format!("Done: {}", mutation),
                    NotificationLevel::Success,
                ),
                Err(e) => self.add_notification(
                    format!("Could not {}: {}", mutation, e.user_message()),
                    NotificationLevel::Error,
                ),
            },
        }
    }

    fn refresh_failed(&mut self, kind: ResourceKind, err: &DockpaneError) -> String {
        let message = if err.is_parse() {
            error!("Refreshing {} hit unexpected runtime output: {}", kind, err);
            format!("Unexpected output listing {}: {}", kind, err)
        } else {
            warn!("Refreshing {} failed: {}", kind, err);
            format!("Could not list {}: {}", kind, err.user_message())
        };
        self.add_notification(message.clone(), NotificationLevel::Error);
        message
    }

    /// Switch to a specific tab
    pub fn switch_tab(&mut self, tab: Tab) {
        if self.current_tab != tab {
            self.current_tab = tab;
            self.form = None;
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
