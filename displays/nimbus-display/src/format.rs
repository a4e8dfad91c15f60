//! Text formatting for the face
//!
//! All strings are produced in English regardless of locale, matching the
//! fixed date pattern `EEE, MMM dd yyyy` shown upper-cased.

use core::fmt::Write;

use heapless::String;
use jiff::civil::DateTime;
use jiff::tz::Offset;
use jiff::Timestamp;
use nimbus_core::config::TemperatureUnit;
use nimbus_core::weather::DeciCelsius;

use crate::command::MAX_TEXT_LEN;

/// Short text such as `12`, `07` or `PM`
pub type ShortText = String<4>;

/// Text filling one draw slot
pub type SlotText = String<MAX_TEXT_LEN>;

const WEEKDAYS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Civil time at `now_ms` in the display time zone
///
/// Times outside the representable range clamp to the latest instant.
pub fn local_time(now_ms: u64, offset: Offset) -> DateTime {
    let millis = i64::try_from(now_ms).unwrap_or(i64::MAX);
    let timestamp = Timestamp::from_millisecond(millis).unwrap_or(Timestamp::MAX);
    offset.to_datetime(timestamp)
}

/// Hour text: zero-padded in 24-hour mode, 1-12 without padding otherwise
pub fn hour_text(time: &DateTime, use_24_hour: bool) -> ShortText {
    let mut text = ShortText::new();
    let hour = time.hour();
    if use_24_hour {
        let _ = write!(text, "{:02}", hour);
    } else {
        let hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        let _ = write!(text, "{}", hour);
    }
    text
}

/// Two-digit minute text
pub fn minute_text(time: &DateTime) -> ShortText {
    let mut text = ShortText::new();
    let _ = write!(text, "{:02}", time.minute());
    text
}

/// Two-digit seconds text
pub fn seconds_text(time: &DateTime) -> ShortText {
    let mut text = ShortText::new();
    let _ = write!(text, "{:02}", time.second());
    text
}

/// `AM` or `PM`
pub fn am_pm_text(time: &DateTime) -> &'static str {
    if time.hour() < 12 {
        "AM"
    } else {
        "PM"
    }
}

/// Date line, e.g. `MON, JAN 06 2025`
pub fn date_text(time: &DateTime) -> SlotText {
    let weekday = WEEKDAYS[time.weekday().to_monday_zero_offset() as usize];
    let month = MONTHS[(time.month() - 1) as usize];
    let mut text = SlotText::new();
    let _ = write!(text, "{}, {} {:02} {}", weekday, month, time.day(), time.year());
    text
}

/// Whole-degree temperature with a degree sign, e.g. `22°`
pub fn temperature_text(value: DeciCelsius, unit: TemperatureUnit) -> SlotText {
    let mut text = SlotText::new();
    let _ = write!(text, "{}\u{00B0}", value.whole_degrees(unit));
    text
}
