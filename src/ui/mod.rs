//! User interface module

pub mod app;
pub mod components;

pub use app::{UiAction, UiApp};
