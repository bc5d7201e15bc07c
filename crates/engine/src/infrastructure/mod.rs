//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod jobs;
pub mod ports;
pub mod sqlite;
