//! Serialization helpers for session data.

pub mod yaml;
