//! Face state machine
//!
//! Defines which power state the face is in. The state machine is
//! explicit, finite, and deterministic; side effects of each transition are
//! produced by [`crate::face::DisplayStateMachine`].

pub mod display;
pub mod events;
pub mod machine;

pub use display::DisplayState;
pub use events::FaceEvent;
pub use machine::FaceState;
