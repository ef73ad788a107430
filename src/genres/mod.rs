// src/genres/mod.rs

// High-level orchestrations that run several systems around one user action.
// Each is feature-gated so embedders enable only what they use.

#[cfg(feature = "genre-academy")]
pub mod academy;

#[cfg(feature = "genre-academy")]
pub use academy::*;
