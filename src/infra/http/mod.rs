//! HTTP adapters for the print service.

mod client;

pub use client::{BodyEncoding, DEFAULT_PRINT_ORIGIN, PrintClient, encode_body};
