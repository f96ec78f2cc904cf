//! Domain layer: map state, layouts and the pure encoding rules.

pub mod catalog;
pub mod color;
pub mod layers;
pub mod layout;
pub mod snapshot;
