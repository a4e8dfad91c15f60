//! State machine definition
//!
//! The face is hidden, visible and interactive, or visible in low-power
//! ambient mode. Channel use, redraw ticks and listeners all follow from the
//! current state.

use super::events::FaceEvent;

/// Face power states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceState {
    /// Not on screen; no channel, no ticks
    #[default]
    Hidden,
    /// On screen at full power; redraw every second
    VisibleInteractive,
    /// On screen in low-power mode; redraw on the coarse system tick
    VisibleAmbient,
}

impl FaceState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, FaceState::Hidden)
    }

    /// Check if this state runs the per-second redraw tick
    pub fn ticks(&self) -> bool {
        matches!(self, FaceState::VisibleInteractive)
    }

    /// Process an event and return the next state
    ///
    /// `ambient` is the most recently reported ambient flag, used when the
    /// face becomes visible.
    pub fn transition(self, event: &FaceEvent, ambient: bool) -> Self {
        use FaceState::*;

        match (self, event) {
            (Hidden, FaceEvent::VisibilityChanged(true)) => {
                if ambient {
                    VisibleAmbient
                } else {
                    VisibleInteractive
                }
            }
            (_, FaceEvent::VisibilityChanged(false)) => Hidden,

            (VisibleInteractive, FaceEvent::AmbientChanged(true)) => VisibleAmbient,
            (VisibleAmbient, FaceEvent::AmbientChanged(false)) => VisibleInteractive,

            // Default: stay in current state
            _ => self,
        }
    }
}
