//! Face lifecycle events
//!
//! Events are delivered by the platform adapter (visibility, ambient mode,
//! system broadcasts, device properties).

use jiff::tz::Offset;

/// Inputs that drive the face state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceEvent {
    /// Face became visible (`true`) or hidden (`false`)
    VisibilityChanged(bool),
    /// Face entered (`true`) or left (`false`) low-power ambient mode
    AmbientChanged(bool),
    /// System time zone changed
    TimeZoneChanged(Offset),
    /// Coarse system tick, about once a minute
    TimeTick,
    /// Device display properties reported
    PropertiesChanged {
        /// Ambient mode can only draw with fewer bits per pixel
        low_bit_ambient: bool,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for FaceEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            FaceEvent::VisibilityChanged(visible) => defmt::write!(f, "VisibilityChanged({})", visible),
            FaceEvent::AmbientChanged(ambient) => defmt::write!(f, "AmbientChanged({})", ambient),
            FaceEvent::TimeZoneChanged(offset) => {
                defmt::write!(f, "TimeZoneChanged({=i32}s)", offset.seconds())
            }
            FaceEvent::TimeTick => defmt::write!(f, "TimeTick"),
            FaceEvent::PropertiesChanged { low_bit_ambient } => {
                defmt::write!(f, "PropertiesChanged(low_bit_ambient={})", low_bit_ambient)
            }
        }
    }
}
