//! Clipsight - terminal clipboard inspector for Wayland
//!
//! This library exports the core modules for testing and potential reuse.

pub mod app;
pub mod capture;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod print;
pub mod tray;
pub mod ui;
pub mod viewer;
