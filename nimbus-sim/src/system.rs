//! Simulated operating-system services for the face
//!
//! Holds the system time zone and whether the face has registered its
//! time-zone listener. Changes are only delivered while registered.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use jiff::tz::Offset;
use log::{debug, trace, warn};

use nimbus_core::state::FaceEvent;

use crate::channels::FACE_EVENTS;

#[derive(Clone, Copy)]
struct TimeZoneService {
    offset_seconds: i32,
    listening: bool,
}

static TIME_ZONE: Mutex<CriticalSectionRawMutex, Cell<TimeZoneService>> =
    Mutex::new(Cell::new(TimeZoneService {
        offset_seconds: 0,
        listening: false,
    }));

/// Current system time zone
pub fn time_zone() -> Offset {
    let seconds = TIME_ZONE.lock(|service| service.get().offset_seconds);
    Offset::from_seconds(seconds).unwrap_or(Offset::UTC)
}

/// Register or unregister the face's time-zone listener
pub fn set_time_zone_listener(listening: bool) {
    TIME_ZONE.lock(|service| {
        let mut current = service.get();
        current.listening = listening;
        service.set(current);
    });
    debug!("time zone listener {}", if listening { "registered" } else { "unregistered" });
}

/// Change the system time zone, notifying a registered listener
pub fn change_time_zone(hours: i8) {
    let Ok(offset) = Offset::from_hours(hours) else {
        warn!("time zone offset {}h out of range", hours);
        return;
    };
    let listening = TIME_ZONE.lock(|service| {
        let mut current = service.get();
        current.offset_seconds = offset.seconds();
        service.set(current);
        current.listening
    });

    if listening {
        if FACE_EVENTS.try_send(FaceEvent::TimeZoneChanged(offset)).is_err() {
            warn!("face event queue full, time zone change dropped");
        }
    } else {
        trace!("time zone changed with no listener");
    }
}
