//! Worldkeeper Engine library.
//!
//! Lifecycle control plane for simulated worlds.
//!
//! ## Structure
//!
//! - `use_cases/` - Status store, heartbeat, sweeps, input queue, history
//! - `infrastructure/` - Ports, SQLite adapters, clock and periodic jobs
//! - `api/` - HTTP entry points
//! - `config` - Environment configuration
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
