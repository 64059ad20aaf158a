//! Rename and create-from-image input forms

use crate::controller::Command;
use crate::core::{ContainerId, ContainerRecord, ImageRecord};

/// What a submitted form does; the target is fixed when the form opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Rename { id: ContainerId },
    Create,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl FormState {
    /// Rename form prefilled with the container's current name
    pub fn rename(container: &ContainerRecord) -> Self {
        Self {
            kind: FormKind::Rename {
                id: container.id.clone(),
            },
            fields: vec![FormField::new("Name", container.name.clone())],
            focused: 0,
        }
    }

    /// Create-container form prefilled from the image
    pub fn create(image: &ImageRecord) -> Self {
        Self {
            kind: FormKind::Create,
            fields: vec![
                FormField::new("Image", image.image_ref()),
                FormField::new("Name", image.suggested_container_name()),
                FormField::new("Port to run on", ""),
                FormField::new("Port to expose", ""),
            ],
            focused: 1,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Rename { .. } => "Edit Container",
            FormKind::Create => "Create Container",
        }
    }

    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
            .unwrap_or_default()
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.focused = if self.focused == 0 {
            self.fields.len() - 1
        } else {
            self.focused - 1
        };
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    /// The command this form submits, unvalidated
    pub fn to_command(&self) -> Command {
        match &self.kind {
            FormKind::Rename { id } => Command::RenameContainer {
                id: id.clone(),
                new_name: self.value("Name").to_string(),
            },
            FormKind::Create => Command::CreateFromImage {
                image: self.value("Image").to_string(),
                name: self.value("Name").to_string(),
                host_port: self.value("Port to run on").to_string(),
                container_port: self.value("Port to expose").to_string(),
            },
        }
    }
}
