//! Galaxy Player - runs the particle galaxy
//!
//! This crate wires the galaxy together: configuration files, the
//! asynchronous setup pipeline, the display-free per-frame `Experience`,
//! and the winit `GalaxyApp` handler used by the native binary and the
//! web entry point.

pub mod app;
pub mod config;
pub mod experience;
pub mod setup;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use app::{AppEvent, GalaxyApp};
pub use config::{ExperienceSettings, GalaxyConfig, DEFAULT_CONFIG};
pub use experience::Experience;
pub use setup::{build_galaxy, setup, Ready};
