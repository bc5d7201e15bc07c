//! Helpers shared by the domain and engine crates. No I/O.

pub mod datetime;

pub use datetime::from_millis;
