//! Watch face renderer for Nimbus
//!
//! This crate provides:
//! - Weather condition code to icon asset mapping
//! - Time, date and temperature formatting
//! - A pure `render()` producing a slot-addressed draw list
//! - `DisplayBackend` trait that executes a draw list on real hardware
//!
//! # Architecture
//!
//! Rendering is split in two. `render()` decides *what* to draw from the
//! display state, the cached snapshot and the current time; it knows
//! nothing about pixels. A `DisplayBackend` decides *where* each slot goes
//! on a given screen shape and how fonts and bitmaps are loaded.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod backend;
pub mod command;
pub mod format;
pub mod icon;
pub mod render;

// Re-export key types
pub use backend::{present, DisplayBackend, DisplayError};
pub use command::{Background, DrawCommand, DrawList, Slot, TextStyle};
pub use icon::WeatherIcon;
pub use render::{render, RenderOptions};
