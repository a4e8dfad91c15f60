//! Weather snapshot types

use crate::config::TemperatureUnit;

/// Temperature in tenths of a degree Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeciCelsius(pub i16);

/// Integer division rounding half away from zero
fn div_round(n: i32, d: i32) -> i32 {
    if n >= 0 {
        (n + d / 2) / d
    } else {
        (n - d / 2) / d
    }
}

impl DeciCelsius {
    pub const fn tenths(self) -> i16 {
        self.0
    }

    /// Whole degrees in `unit`, rounded half away from zero
    pub fn whole_degrees(self, unit: TemperatureUnit) -> i32 {
        let tenths = self.0 as i32;
        match unit {
            TemperatureUnit::Celsius => div_round(tenths, 10),
            // F = C * 9/5 + 32, in fiftieths of a degree
            TemperatureUnit::Fahrenheit => div_round(tenths * 9 + 1600, 50),
        }
    }
}

/// Latest forecast as read from the local store, before it is stamped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Forecast {
    /// Provider weather condition code (e.g. 800 = clear)
    pub condition_code: u16,
    pub high: DeciCelsius,
    pub low: DeciCelsius,
}

/// One immutable weather record as carried to the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherSnapshot {
    /// Provider weather condition code
    pub condition_code: u16,
    pub high: DeciCelsius,
    pub low: DeciCelsius,
    /// Wall-clock capture time, milliseconds since the Unix epoch
    pub captured_at_ms: u64,
}

impl WeatherSnapshot {
    /// Stamp a forecast with its capture time
    pub const fn from_forecast(forecast: Forecast, captured_at_ms: u64) -> Self {
        Self {
            condition_code: forecast.condition_code,
            high: forecast.high,
            low: forecast.low,
            captured_at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_rounding() {
        assert_eq!(DeciCelsius(215).whole_degrees(TemperatureUnit::Celsius), 22);
        assert_eq!(DeciCelsius(214).whole_degrees(TemperatureUnit::Celsius), 21);
        assert_eq!(DeciCelsius(-15).whole_degrees(TemperatureUnit::Celsius), -2);
        assert_eq!(DeciCelsius(-14).whole_degrees(TemperatureUnit::Celsius), -1);
        assert_eq!(DeciCelsius(0).whole_degrees(TemperatureUnit::Celsius), 0);
    }

    #[test]
    fn test_fahrenheit_conversion() {
        assert_eq!(DeciCelsius(0).whole_degrees(TemperatureUnit::Fahrenheit), 32);
        assert_eq!(DeciCelsius(100).whole_degrees(TemperatureUnit::Fahrenheit), 50);
        assert_eq!(DeciCelsius(370).whole_degrees(TemperatureUnit::Fahrenheit), 99);
        assert_eq!(DeciCelsius(-400).whole_degrees(TemperatureUnit::Fahrenheit), -40);
    }

    #[test]
    fn test_from_forecast() {
        let forecast = Forecast {
            condition_code: 800,
            high: DeciCelsius(250),
            low: DeciCelsius(120),
        };
        let snapshot = WeatherSnapshot::from_forecast(forecast, 1_700_000_000_000);
        assert_eq!(snapshot.condition_code, 800);
        assert_eq!(snapshot.high, DeciCelsius(250));
        assert_eq!(snapshot.captured_at_ms, 1_700_000_000_000);
    }
}
