//! Frame renderer
//!
//! `render` is a pure function of the display state, the cached snapshot
//! and the current time: identical inputs always produce identical draw
//! lists.

use nimbus_core::config::{FaceConfig, TemperatureUnit};
use nimbus_core::state::DisplayState;
use nimbus_core::weather::WeatherSnapshot;

use crate::command::{Background, DrawCommand, DrawList, Slot, TextStyle};
use crate::format::{
    am_pm_text, date_text, hour_text, local_time, minute_text, seconds_text, temperature_text,
    SlotText,
};
use crate::icon::WeatherIcon;

/// User preferences that affect drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderOptions {
    pub use_24_hour: bool,
    /// Draw seconds while interactive
    pub show_seconds: bool,
    pub temperature_unit: TemperatureUnit,
}

impl From<&FaceConfig> for RenderOptions {
    fn from(config: &FaceConfig) -> Self {
        Self {
            use_24_hour: config.use_24_hour,
            show_seconds: config.show_seconds,
            temperature_unit: config.temperature_unit,
        }
    }
}

fn text(slot: Slot, value: &str, style: TextStyle, anti_alias: bool) -> DrawCommand {
    let mut text = SlotText::new();
    // Slot text always fits: the longest is the date line
    let _ = text.push_str(value);
    DrawCommand::Text {
        slot,
        text,
        style,
        anti_alias,
    }
}

/// Build the draw list for one frame
pub fn render(
    display: &DisplayState,
    weather: Option<&WeatherSnapshot>,
    now_ms: u64,
    options: &RenderOptions,
) -> DrawList {
    let ambient = display.ambient;
    let anti_alias = !display.draws_low_bit();
    let time = local_time(now_ms, display.time_zone);
    let mut list = DrawList::new();

    list.push(DrawCommand::Fill(if ambient {
        Background::Black
    } else {
        Background::Themed
    }));

    list.push(text(
        Slot::Hour,
        &hour_text(&time, options.use_24_hour),
        TextStyle::Normal,
        anti_alias,
    ));
    list.push(text(Slot::Colon, ":", TextStyle::Normal, anti_alias));
    list.push(text(Slot::Minute, &minute_text(&time), TextStyle::Light, anti_alias));
    if options.show_seconds && !ambient {
        list.push(text(Slot::Seconds, &seconds_text(&time), TextStyle::Dimmed, anti_alias));
    }
    if !options.use_24_hour {
        list.push(text(Slot::AmPm, am_pm_text(&time), TextStyle::Normal, anti_alias));
    }

    list.push(text(Slot::Date, &date_text(&time), TextStyle::Dimmed, anti_alias));
    list.push(DrawCommand::Divider);

    if let Some(weather) = weather {
        let unit = options.temperature_unit;
        list.push(text(
            Slot::HighTemp,
            &temperature_text(weather.high, unit),
            TextStyle::Normal,
            anti_alias,
        ));
        list.push(text(
            Slot::LowTemp,
            &temperature_text(weather.low, unit),
            TextStyle::LightDimmed,
            anti_alias,
        ));

        if let Some(icon) = WeatherIcon::for_condition(weather.condition_code) {
            list.push(DrawCommand::Icon {
                asset: icon.asset(ambient),
                anti_alias,
            });
        }
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::tz::Offset;
    use nimbus_core::weather::DeciCelsius;

    // 2025-01-06T15:04:07Z, a Monday
    const NOW_MS: u64 = 1_736_175_847_000;

    fn visible(ambient: bool) -> DisplayState {
        DisplayState {
            visible: true,
            ambient,
            low_bit_ambient: false,
            time_zone: Offset::UTC,
        }
    }

    fn snapshot(code: u16) -> WeatherSnapshot {
        WeatherSnapshot {
            condition_code: code,
            high: DeciCelsius(253),
            low: DeciCelsius(118),
            captured_at_ms: NOW_MS,
        }
    }

    fn has_anti_alias(list: &DrawList, expected: bool) -> bool {
        list.iter().all(|command| match command {
            DrawCommand::Text { anti_alias, .. } | DrawCommand::Icon { anti_alias, .. } => {
                *anti_alias == expected
            }
            _ => true,
        })
    }

    #[test]
    fn test_interactive_frame() {
        let list = render(&visible(false), Some(&snapshot(800)), NOW_MS, &RenderOptions::default());

        assert_eq!(list[0], DrawCommand::Fill(Background::Themed));
        assert_eq!(list.text(Slot::Hour), Some("3"));
        assert_eq!(list.text(Slot::Colon), Some(":"));
        assert_eq!(list.text(Slot::Minute), Some("04"));
        assert_eq!(list.text(Slot::AmPm), Some("PM"));
        assert_eq!(list.text(Slot::Seconds), None);
        assert_eq!(list.text(Slot::Date), Some("MON, JAN 06 2025"));
        assert!(list.contains(&DrawCommand::Divider));
        assert_eq!(list.text(Slot::HighTemp), Some("25°"));
        assert_eq!(list.text(Slot::LowTemp), Some("12°"));
        assert_eq!(list.icon(), Some("ic_clear"));
    }

    #[test]
    fn test_seconds_only_when_enabled_and_interactive() {
        let options = RenderOptions {
            show_seconds: true,
            ..RenderOptions::default()
        };

        let interactive = render(&visible(false), None, NOW_MS, &options);
        assert_eq!(interactive.text(Slot::Seconds), Some("07"));

        let ambient = render(&visible(true), None, NOW_MS, &options);
        assert_eq!(ambient.text(Slot::Seconds), None);
    }

    #[test]
    fn test_ambient_frame() {
        let list = render(&visible(true), Some(&snapshot(200)), NOW_MS, &RenderOptions::default());

        assert_eq!(list[0], DrawCommand::Fill(Background::Black));
        assert_eq!(list.text(Slot::Seconds), None);
        assert_eq!(list.icon(), Some("ic_storm_ambient"));
        assert!(has_anti_alias(&list, true));
    }

    #[test]
    fn test_low_bit_ambient_disables_anti_alias() {
        let mut state = visible(true);
        state.low_bit_ambient = true;
        let list = render(&state, Some(&snapshot(800)), NOW_MS, &RenderOptions::default());
        assert!(has_anti_alias(&list, false));

        // Low-bit only matters in ambient mode
        state.ambient = false;
        let list = render(&state, Some(&snapshot(800)), NOW_MS, &RenderOptions::default());
        assert!(has_anti_alias(&list, true));
    }

    #[test]
    fn test_without_snapshot() {
        let list = render(&visible(false), None, NOW_MS, &RenderOptions::default());

        assert_eq!(list.text(Slot::HighTemp), None);
        assert_eq!(list.text(Slot::LowTemp), None);
        assert_eq!(list.icon(), None);
        assert!(list.text(Slot::Hour).is_some());
        assert!(list.contains(&DrawCommand::Divider));
    }

    #[test]
    fn test_unknown_condition_keeps_temperatures() {
        let list = render(&visible(false), Some(&snapshot(900)), NOW_MS, &RenderOptions::default());
        assert_eq!(list.icon(), None);
        assert_eq!(list.text(Slot::HighTemp), Some("25°"));
    }

    #[test]
    fn test_24_hour_and_fahrenheit() {
        let options = RenderOptions {
            use_24_hour: true,
            temperature_unit: TemperatureUnit::Fahrenheit,
            ..RenderOptions::default()
        };
        let list = render(&visible(false), Some(&snapshot(800)), NOW_MS, &options);

        assert_eq!(list.text(Slot::Hour), Some("15"));
        assert_eq!(list.text(Slot::AmPm), None);
        assert_eq!(list.text(Slot::HighTemp), Some("78°"));
        assert_eq!(list.text(Slot::LowTemp), Some("53°"));
    }

    #[test]
    fn test_time_zone_moves_date() {
        let mut state = visible(false);
        state.time_zone = Offset::constant(10);
        let list = render(&state, None, NOW_MS, &RenderOptions::default());

        assert_eq!(list.text(Slot::Hour), Some("1"));
        assert_eq!(list.text(Slot::AmPm), Some("AM"));
        assert_eq!(list.text(Slot::Date), Some("TUE, JAN 07 2025"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let state = visible(false);
        let weather = snapshot(501);
        let a = render(&state, Some(&weather), NOW_MS, &RenderOptions::default());
        let b = render(&state, Some(&weather), NOW_MS, &RenderOptions::default());
        assert_eq!(a, b);
    }
}
