//! Configuration management for portprobe.
//!
//! Provides XDG-compliant, read-only settings with scan defaults.

mod settings;

pub use settings::{AppSettings, Paths};
