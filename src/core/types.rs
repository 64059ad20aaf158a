//! Core type definitions and shared types

/// Type alias for container IDs
pub type ContainerId = String;

/// Type alias for image IDs
pub type ImageId = String;

/// Notification level for status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "INFO"),
            NotificationLevel::Success => write!(f, "SUCCESS"),
            NotificationLevel::Warning => write!(f, "WARNING"),
            NotificationLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// The kinds of resource the dashboard tracks, one table each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Containers,
    Images,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Containers => "containers",
            ResourceKind::Images => "images",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Application tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Containers,
    Images,
}

impl Tab {
    /// Get all available tabs
    pub fn all() -> &'static [Tab] {
        &[Tab::Containers, Tab::Images]
    }

    /// Get the display name for this tab
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Containers => "Containers",
            Tab::Images => "Images",
        }
    }

    /// Get the shortcut key for this tab
    pub fn shortcut(&self) -> char {
        match self {
            Tab::Containers => '1',
            Tab::Images => '2',
        }
    }

    /// The resource kind shown on this tab
    pub fn kind(&self) -> ResourceKind {
        match self {
            Tab::Containers => ResourceKind::Containers,
            Tab::Images => ResourceKind::Images,
        }
    }

    /// Key hints shown under the table
    pub fn instructions(&self) -> &'static str {
        match self {
            Tab::Containers => concat!(
                "Press 'd' to delete, 'r' to run, 's' to stop, 'e' to edit, ",
                "the arrow keys to switch tabs"
            ),
            Tab::Images => {
                "Press 'd' to delete, 'c' to create container, the arrow keys to switch tabs"
            }
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
