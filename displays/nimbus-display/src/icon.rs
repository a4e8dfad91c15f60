//! Weather condition icons
//!
//! Condition codes follow the OpenWeatherMap numbering. Every icon has a
//! full-colour asset and a simplified ambient-mode variant.

/// Icon drawn next to the temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WeatherIcon {
    Storm,
    LightRain,
    Rain,
    Snow,
    Fog,
    Clear,
    LightClouds,
    Cloudy,
}

impl WeatherIcon {
    /// Icon for a condition code, or `None` if the code has no icon
    pub fn for_condition(code: u16) -> Option<Self> {
        match code {
            200..=232 => Some(WeatherIcon::Storm),
            300..=321 => Some(WeatherIcon::LightRain),
            500..=504 => Some(WeatherIcon::Rain),
            511 => Some(WeatherIcon::Snow),
            520..=531 => Some(WeatherIcon::Rain),
            600..=622 => Some(WeatherIcon::Snow),
            // 761 (dust) lands here before the storm arm below
            701..=761 => Some(WeatherIcon::Fog),
            781 => Some(WeatherIcon::Storm),
            800 => Some(WeatherIcon::Clear),
            801 => Some(WeatherIcon::LightClouds),
            802..=804 => Some(WeatherIcon::Cloudy),
            _ => None,
        }
    }

    /// Asset name to load for this icon
    pub fn asset(self, ambient: bool) -> &'static str {
        match (self, ambient) {
            (WeatherIcon::Storm, false) => "ic_storm",
            (WeatherIcon::Storm, true) => "ic_storm_ambient",
            (WeatherIcon::LightRain, false) => "ic_light_rain",
            (WeatherIcon::LightRain, true) => "ic_light_rain_ambient",
            (WeatherIcon::Rain, false) => "ic_rain",
            (WeatherIcon::Rain, true) => "ic_rain_ambient",
            (WeatherIcon::Snow, false) => "ic_snow",
            (WeatherIcon::Snow, true) => "ic_snow_ambient",
            (WeatherIcon::Fog, false) => "ic_fog",
            (WeatherIcon::Fog, true) => "ic_fog_ambient",
            (WeatherIcon::Clear, false) => "ic_clear",
            (WeatherIcon::Clear, true) => "ic_clear_ambient",
            (WeatherIcon::LightClouds, false) => "ic_light_clouds",
            (WeatherIcon::LightClouds, true) => "ic_light_clouds_ambient",
            (WeatherIcon::Cloudy, false) => "ic_cloudy",
            (WeatherIcon::Cloudy, true) => "ic_cloudy_ambient",
        }
    }
}
