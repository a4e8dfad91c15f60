//! Simulated local forecast store

use log::trace;
use nimbus_core::weather::{DeciCelsius, Forecast, WeatherSource};

/// Conditions the simulated provider cycles through
const FORECASTS: [Forecast; 6] = [
    Forecast {
        condition_code: 800,
        high: DeciCelsius(214),
        low: DeciCelsius(118),
    },
    Forecast {
        condition_code: 801,
        high: DeciCelsius(197),
        low: DeciCelsius(104),
    },
    Forecast {
        condition_code: 500,
        high: DeciCelsius(152),
        low: DeciCelsius(96),
    },
    Forecast {
        condition_code: 211,
        high: DeciCelsius(176),
        low: DeciCelsius(121),
    },
    Forecast {
        condition_code: 741,
        high: DeciCelsius(85),
        low: DeciCelsius(-5),
    },
    Forecast {
        condition_code: 601,
        high: DeciCelsius(-15),
        low: DeciCelsius(-62),
    },
];

/// Forecast store that is empty for a few reads, then rotates conditions
#[derive(Debug, Clone)]
pub struct SimulatedWeather {
    cold_reads: u32,
    next: usize,
}

impl SimulatedWeather {
    /// `cold_start_cycles` reads return nothing before data appears
    pub fn new(cold_start_cycles: u32) -> Self {
        Self {
            cold_reads: cold_start_cycles,
            next: 0,
        }
    }
}

impl WeatherSource for SimulatedWeather {
    async fn latest(&mut self) -> Option<Forecast> {
        if self.cold_reads > 0 {
            self.cold_reads -= 1;
            trace!("forecast store still empty");
            return None;
        }

        let forecast = FORECASTS[self.next % FORECASTS.len()];
        self.next = self.next.wrapping_add(1);
        Some(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_cold_start_then_rotation() {
        let mut source = SimulatedWeather::new(2);
        assert_eq!(block_on(source.latest()), None);
        assert_eq!(block_on(source.latest()), None);

        let first = block_on(source.latest()).unwrap();
        assert_eq!(first.condition_code, 800);
        let second = block_on(source.latest()).unwrap();
        assert_eq!(second.condition_code, 801);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut source = SimulatedWeather::new(0);
        for _ in 0..FORECASTS.len() {
            block_on(source.latest());
        }
        assert_eq!(block_on(source.latest()), Some(FORECASTS[0]));
    }
}
