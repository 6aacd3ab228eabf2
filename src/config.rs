//! Configuration loader and schema types.
//!
//! This module exposes the settings passed to the scanner, playlist,
//! controller and device adapters, and helpers to load them from disk.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
