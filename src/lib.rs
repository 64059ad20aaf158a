//! Dockpane - container and image dashboard for the terminal
//!
//! Polls a Docker-compatible command-line tool and renders its containers
//! and images as two navigable tables.

pub mod app;
pub mod config;
pub mod controller;
pub mod core;
pub mod runtime;
pub mod state;
pub mod ui;
