//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the viewer:
//! - Math types and operations
//! - Lazily recomputed values
//! - Time management
//! - Logging utilities

pub mod cache;
pub mod logging;
pub mod math;
pub mod time;
