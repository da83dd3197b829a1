//! Fixed-domain categorical codes and their display labels.
//!
//! The dataset encodes season, weather and weekday as small integers. Each is
//! parsed once at load into a typed value, so the label lookups below are
//! total functions and never see an out-of-domain code.

use chrono::Weekday;

use crate::error::DataFormatError;

/// Meteorological season, coded 1-4 in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring = 1,
    Summer = 2,
    Fall = 3,
    Winter = 4,
}

impl Season {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl TryFrom<u8> for Season {
    type Error = DataFormatError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Season::Spring),
            2 => Ok(Season::Summer),
            3 => Ok(Season::Fall),
            4 => Ok(Season::Winter),
            other => Err(DataFormatError::OutOfDomain {
                column: "season",
                value: other.into(),
            }),
        }
    }
}

/// Weather situation, coded 1 (best) to 4 (worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeatherSituation {
    Clear = 1,
    Mist = 2,
    LightPrecipitation = 3,
    HeavyPrecipitation = 4,
}

impl WeatherSituation {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Legend text for the weather chart.
    pub fn description(self) -> &'static str {
        match self {
            WeatherSituation::Clear => "Clear, Few clouds, Partly cloudy",
            WeatherSituation::Mist => {
                "Mist + Cloudy, Mist + Broken clouds, Mist + Few clouds, Mist"
            }
            WeatherSituation::LightPrecipitation => {
                "Light Snow, Light Rain + Thunderstorm + Scattered clouds, Light Rain + Scattered clouds"
            }
            WeatherSituation::HeavyPrecipitation => {
                "Heavy Rain + Ice Pallets + Thunderstorm + Mist, Snow + Fog"
            }
        }
    }
}

impl TryFrom<u8> for WeatherSituation {
    type Error = DataFormatError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(WeatherSituation::Clear),
            2 => Ok(WeatherSituation::Mist),
            3 => Ok(WeatherSituation::LightPrecipitation),
            4 => Ok(WeatherSituation::HeavyPrecipitation),
            other => Err(DataFormatError::OutOfDomain {
                column: "weathersit",
                value: other.into(),
            }),
        }
    }
}

/// Maps the dataset's weekday code to a [`Weekday`].
///
/// The dataset counts from Sunday = 0 (2011-01-01, a Saturday, carries 6).
pub fn weekday_from_code(code: u8) -> Result<Weekday, DataFormatError> {
    match code {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(DataFormatError::OutOfDomain {
            column: "weekday",
            value: other.into(),
        }),
    }
}

/// Inverse of [`weekday_from_code`]; also the sort key of the weekday table.
pub fn weekday_code(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_codes_round_trip_over_domain() {
        for code in 1..=4u8 {
            let season = Season::try_from(code).unwrap();
            assert_eq!(season.code(), code);
        }
        assert_eq!(Season::try_from(1).unwrap().label(), "Spring");
        assert_eq!(Season::try_from(4).unwrap().label(), "Winter");
    }

    #[test]
    fn test_season_out_of_domain() {
        for code in [0u8, 5, 255] {
            assert!(matches!(
                Season::try_from(code),
                Err(DataFormatError::OutOfDomain { column: "season", .. })
            ));
        }
    }

    #[test]
    fn test_weather_out_of_domain() {
        assert!(WeatherSituation::try_from(0).is_err());
        assert!(WeatherSituation::try_from(5).is_err());
        assert_eq!(WeatherSituation::try_from(3).unwrap().code(), 3);
    }

    #[test]
    fn test_weekday_mapping_starts_on_sunday() {
        assert_eq!(weekday_label(weekday_from_code(0).unwrap()), "Sunday");
        assert_eq!(weekday_label(weekday_from_code(6).unwrap()), "Saturday");
        for code in 0..=6u8 {
            assert_eq!(weekday_code(weekday_from_code(code).unwrap()), code);
        }
    }

    #[test]
    fn test_weekday_out_of_domain() {
        assert!(matches!(
            weekday_from_code(7),
            Err(DataFormatError::OutOfDomain { column: "weekday", value: 7 })
        ));
    }
}
