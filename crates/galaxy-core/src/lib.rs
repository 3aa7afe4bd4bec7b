//! Galaxy Core - Foundational types for the galaxy experience
//!
//! This crate provides the types every other galaxy crate depends on:
//! - `Rgb` - Linear color triple used by layer descriptors and shading
//! - `TextureHandle` - Renderer-owned texture reference
//! - Error types and Result alias

mod error;
mod types;

pub use error::{GalaxyError, Result};
pub use types::{Rgb, TextureHandle};
