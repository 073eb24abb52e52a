//! Property tests for the history buffer, slope estimator, classifier and unit flip

mod common;

use proptest::prelude::*;
use skywatch_core::{
    config::Comparison,
    testing::{history_from_oldest, reading, reading_with_rain},
    trend, units, History, Level, Metric, Reading, Threshold, ThresholdConfig, WindowedThreshold,
};

use common::station_with;

proptest! {
    #[test]
    fn buffer_keeps_the_newest_capacity_readings(capacity in 1usize..20, extra in 1usize..30) {
        let total = capacity + extra;
        let mut history = History::new(capacity).unwrap();
        history.initialize(reading(1)).unwrap();
        for timestamp in 2..=total as u64 {
            history.append(reading(timestamp)).unwrap();
        }

        prop_assert_eq!(history.len(), capacity);
        prop_assert_eq!(history.at(0).unwrap().timestamp, total as u64);
        prop_assert_eq!(history.at(capacity - 1).unwrap().timestamp, (total - capacity + 1) as u64);
        prop_assert!(history.at(capacity).is_err());
    }

    #[test]
    fn single_reading_slope_is_zero(value in -1000.0f64..1000.0, window in 1usize..100) {
        let history = history_from_oldest(&[value]).unwrap();
        prop_assert_eq!(trend::humidity_slope(&history, window).unwrap(), 0.0);
        prop_assert_eq!(trend::pressure_slope(&history, window).unwrap(), 0.0);
    }

    #[test]
    fn slope_recovers_linear_rate(a in -20.0f64..20.0, b in -100.0f64..100.0, n in 2usize..40) {
        let values: Vec<f64> = (0..n).map(|i| a * i as f64 + b).collect();
        let history = history_from_oldest(&values).unwrap();

        let slope = trend::humidity_slope(&history, n).unwrap();
        prop_assert!((slope - a).abs() < 1e-3, "slope {} for rate {}", slope, a);
    }

    #[test]
    fn oversized_window_clamps_to_length(values in prop::collection::vec(0.0f64..100.0, 5)) {
        let history = history_from_oldest(&values).unwrap();
        prop_assert_eq!(
            trend::humidity_slope(&history, 1000).unwrap(),
            trend::humidity_slope(&history, 5).unwrap()
        );
    }

    #[test]
    fn rain_boundaries_take_the_worse_level(yellow in 1u32..50, gap in 1u32..50) {
        let red = yellow + gap;
        let config = ThresholdConfig {
            rain: Threshold { yellow: yellow as f64, red: red as f64 },
            ..ThresholdConfig::default()
        };

        for (chance, expected) in [
            (red as f64, Level::Red),
            (yellow as f64, Level::Yellow),
            (yellow as f64 - 1.0, Level::Green),
        ] {
            let mut station = station_with(config.clone(), 5);
            station.accept(reading_with_rain(1, chance)).unwrap();
            prop_assert_eq!(station.evaluate().unwrap().rain.level, expected);
        }
    }

    #[test]
    fn unit_round_trip_restores_values(
        temperature in -40i32..50,
        dew_point in -40i32..30,
        wind in 0u32..40,
        gust in 0u32..60,
        pressure in 95000u32..105000,
        spread_yellow in 1u32..10,
        wind_red in 1u32..30,
        pressure_yellow in -100i32..0,
        pressure_red in -300i32..0,
    ) {
        let mut r: Reading = reading(1);
        r.temperature.current = temperature as f64;
        r.temperature.dew_point = dew_point as f64;
        r.wind.speed = wind as f64;
        r.wind.gust = gust as f64;
        r.pressure.sea_level = pressure as f64 / 100.0;

        let mut history = History::new(1).unwrap();
        history.initialize(r.clone()).unwrap();

        let original = ThresholdConfig {
            temperature: Threshold { yellow: spread_yellow as f64, red: 1.0 },
            wind: Threshold { yellow: 1.0, red: wind_red as f64 },
            pressure: WindowedThreshold {
                yellow: pressure_yellow as f64 / 100.0,
                red: pressure_red as f64 / 100.0,
                n: 10,
            },
            ..ThresholdConfig::default()
        };
        let mut config = original.clone();

        units::toggle_units(&mut config, &mut history);
        prop_assert!(!config.units.metric);
        units::toggle_units(&mut config, &mut history);
        prop_assert!(config.units.metric);

        let back = history.newest().unwrap();
        prop_assert_eq!(back.temperature, r.temperature);
        prop_assert_eq!(back.wind.speed, r.wind.speed);
        prop_assert_eq!(back.wind.gust, r.wind.gust);
        prop_assert!((back.pressure.sea_level - r.pressure.sea_level).abs() <= 0.2);

        prop_assert_eq!(config.temperature, original.temperature);
        prop_assert_eq!(config.wind, original.wind);
        prop_assert!((config.pressure.red - original.pressure.red).abs() <= 0.2);
        prop_assert!((config.pressure.yellow - original.pressure.yellow).abs() <= 0.2);
        prop_assert_eq!(config.humidity, original.humidity);
    }
}

#[test]
fn comparison_directions() {
    assert_eq!(Metric::Rain.comparison(), Comparison::AtLeast);
    assert_eq!(Metric::Humidity.comparison(), Comparison::AtLeast);
    assert_eq!(Metric::Wind.comparison(), Comparison::AtLeast);
    assert_eq!(Metric::Temperature.comparison(), Comparison::AtMost);
    assert_eq!(Metric::Pressure.comparison(), Comparison::AtMost);
}
