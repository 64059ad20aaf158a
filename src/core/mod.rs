use serde::{Deserialize, Serialize};

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::{ContainerId, ImageId, NotificationLevel, ResourceKind, Tab};

/// A row of a resource table, identified by the runtime's ID
pub trait Record {
    fn id(&self) -> &str;
}

/// Container status as shown in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    Stopped,
}

impl ContainerStatus {
    /// Classify the runtime's free-form status text ("Up 2 minutes", "Exited (0) ...")
    pub fn from_status_text(text: &str) -> Self {
        if text.trim_start().starts_with("Up") {
            ContainerStatus::Running
        } else {
            ContainerStatus::Stopped
        }
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerStatus::Running => write!(f, "running"),
            ContainerStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// One container from a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: ContainerId,
    pub name: String,
    pub status: ContainerStatus,
}

impl ContainerRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: ContainerStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
        }
    }
}

impl Record for ContainerRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One image from a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: ImageId,
    pub repository: String,
    pub tag: String,
}

impl ImageRecord {
    pub fn new(
        id: impl Into<String>,
        repository: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// Untagged images show `<none>` for repository and tag
    pub fn is_dangling(&self) -> bool {
        self.repository == "<none>" || self.repository.is_empty()
    }

    /// Reference usable as the image argument of `run`
    pub fn image_ref(&self) -> String {
        if self.is_dangling() {
            self.id.clone()
        } else if self.tag.is_empty() || self.tag == "<none>" {
            self.repository.clone()
        } else {
            format!("{}:{}", self.repository, self.tag)
        }
    }

    /// Suggested container name: last path segment of the repository
    pub fn suggested_container_name(&self) -> String {
        if self.is_dangling() {
            return String::new();
        }
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
            .to_string()
    }
}

impl Record for ImageRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_text() {
        assert_eq!(
            ContainerStatus::from_status_text("Up 2 minutes"),
            ContainerStatus::Running
        );
        assert_eq!(
            ContainerStatus::from_status_text("Exited (0) 3 hours ago"),
            ContainerStatus::Stopped
        );
        assert_eq!(
            ContainerStatus::from_status_text("Created"),
            ContainerStatus::Stopped
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ContainerStatus::Running.to_string(), "running");
        assert_eq!(ContainerStatus::Stopped.to_string(), "stopped");
    }

    #[test]
    fn test_image_ref() {
        let tagged = ImageRecord::new("sha1", "library/nginx", "1.27");
        assert_eq!(tagged.image_ref(), "library/nginx:1.27");
        assert_eq!(tagged.suggested_container_name(), "nginx");

        let dangling = ImageRecord::new("sha2", "<none>", "<none>");
        assert!(dangling.is_dangling());
        assert_eq!(dangling.image_ref(), "sha2");
        assert_eq!(dangling.suggested_container_name(), "");
    }

    #[test]
    fn test_record_identity() {
        let c = ContainerRecord::new("abc123", "web", ContainerStatus::Running);
        assert_eq!(c.id(), "abc123");
    }
}
