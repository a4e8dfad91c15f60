//! Display-relevant state owned by the face state machine

use jiff::tz::Offset;

use super::machine::FaceState;

/// What the renderer needs to know about the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub visible: bool,
    pub ambient: bool,
    pub low_bit_ambient: bool,
    /// UTC offset used for the clock and the date line
    pub time_zone: Offset,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    /// Hidden, interactive, UTC
    pub const fn new() -> Self {
        Self {
            visible: false,
            ambient: false,
            low_bit_ambient: false,
            time_zone: Offset::UTC,
        }
    }

    /// Power state implied by the flags
    pub fn face_state(&self) -> FaceState {
        match (self.visible, self.ambient) {
            (false, _) => FaceState::Hidden,
            (true, false) => FaceState::VisibleInteractive,
            (true, true) => FaceState::VisibleAmbient,
        }
    }

    /// Drawing without anti-aliasing
    pub fn draws_low_bit(&self) -> bool {
        self.ambient && self.low_bit_ambient
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "DisplayState {{ visible: {}, ambient: {}, low_bit: {}, offset: {=i32}s }}",
            self.visible,
            self.ambient,
            self.low_bit_ambient,
            self.time_zone.seconds()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_state_from_flags() {
        let mut state = DisplayState::new();
        assert_eq!(state.face_state(), FaceState::Hidden);

        state.visible = true;
        assert_eq!(state.face_state(), FaceState::VisibleInteractive);

        state.ambient = true;
        assert_eq!(state.face_state(), FaceState::VisibleAmbient);
    }

    #[test]
    fn test_low_bit_only_in_ambient() {
        let mut state = DisplayState::new();
        state.low_bit_ambient = true;
        assert!(!state.draws_low_bit());
        state.ambient = true;
        assert!(state.draws_low_bit());
    }
}
