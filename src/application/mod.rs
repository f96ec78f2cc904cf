//! Application layer: print workflow orchestration over the backend ports.

pub mod error;
pub mod poll;
pub mod ports;
pub mod print;
pub mod request;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;
