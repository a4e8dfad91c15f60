//! Board-agnostic core logic for the weather face
//!
//! This crate contains all application logic that does not depend on a
//! specific board, radio or screen:
//!
//! - Data-sync channel contract, in-process hub and framed link client/server
//! - Weather snapshot, payload codec, producer and consumer
//! - Display state machine and render-tick scheduler
//! - Sync worker bridging the channel to the render context
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]
#![allow(async_fn_in_trait)]

#[cfg(test)]
extern crate std;

mod fmt;

pub mod config;
pub mod face;
pub mod scheduler;
pub mod state;
pub mod sync;
pub mod weather;
