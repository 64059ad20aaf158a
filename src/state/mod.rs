//! Application state management

pub mod app_state;
pub mod form;
pub mod table;

pub use app_state::{AppState, Notification};
pub use form::{FormField, FormKind, FormState};
pub use table::ResourceTable;
