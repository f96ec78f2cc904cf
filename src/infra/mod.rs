//! Infrastructure adapters and runtime bootstrap.

pub mod delivery;
pub mod error;
pub mod files;
pub mod http;
pub mod telemetry;
