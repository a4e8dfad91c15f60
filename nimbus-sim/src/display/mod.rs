//! Simulated screen
//!
//! The face draws into a [`TerminalDisplay`], which lays the slots out on a
//! single log line per frame.

pub mod terminal;

pub use terminal::TerminalDisplay;
