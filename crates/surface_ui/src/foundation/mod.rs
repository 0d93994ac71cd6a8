//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Ray/plane geometry
//! - Time management
//! - Logging utilities

pub mod math;
pub mod geometry;
pub mod time;
pub mod logging;
