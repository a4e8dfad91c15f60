//! Configuration types
//!
//! Board-agnostic settings for the face and the producer. Both derive serde
//! so a host can load them from a file and fall back to the defaults.

pub mod types;

pub use types::*;
