//! Utility functions and helpers for the editor service.
//!
//! This module provides cross-cutting concerns like structured logging and
//! log sanitization.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and redaction of keys and image data.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
