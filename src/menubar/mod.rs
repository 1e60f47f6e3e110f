//! Menubar module for fetchbar.
//!
//! Owns the tray icon, the refresh timer, and the settings prompts.

#[cfg(target_os = "macos")]
pub mod app;

#[cfg(target_os = "macos")]
pub mod menu;
