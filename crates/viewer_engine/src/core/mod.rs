//! # Core Module
//!
//! Shared configuration types used by the window layer and the viewer binary.

pub mod config;

pub use config::{ViewerConfig, WindowConfig};
