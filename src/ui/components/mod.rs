//! UI components

pub mod container_list;
pub mod form;
pub mod image_list;

pub use container_list::ContainerListWidget;
pub use form::render_form;
pub use image_list::ImageListWidget;
