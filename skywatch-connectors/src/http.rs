//! Tempest REST client - the weather provider behind `ReadingSource`
//!
//! ## Overview
//!
//! A WeatherFlow Tempest station publishes its latest observation through the
//! `better_forecast` endpoint. One blocking GET per reading is enough for a
//! station sampled once a minute, so the client is a thin `ureq` agent with
//! retries and no connection state of its own.
//!
//! ## Request
//!
//! ```text
//! GET {base}/swd/rest/better_forecast
//!       ?station_id={id}
//!       &units_temp=c|f
//!       &units_wind=mps|mph
//!       &units_pressure=mb|inhg
//!       &api_key={key}
//! ```
//!
//! Unit labels come from the [`Units`] passed to every fetch. The client
//! never changes them; flipping units is the station's job.
//!
//! ## Field Mapping
//!
//! | `current_conditions` | [`Reading`] |
//! |---|---|
//! | `time` | `timestamp` |
//! | `air_temperature`, `dew_point` | `temperature.current`, `temperature.dew_point` |
//! | `conditions` | `conditions` |
//! | `precip_probability` | `chance_rain` |
//! | `relative_humidity` | `humidity` |
//! | `wind_avg`, `wind_direction`, `wind_direction_cardinal`, `wind_gust` | `wind.*` |
//! | `sea_level_pressure`, `pressure_trend` | `pressure.*` |
//!
//! Every other field of the forecast document is ignored.
//!
//! ## Example Usage
//!
//! ```no_run
//! use skywatch_connectors::http::{TempestClient, TempestConfig};
//! use skywatch_core::{ReadingSource, Units};
//!
//! let config = TempestConfig::new("your-api-key", "150341")
//!     .timeout_secs(10)
//!     .max_retries(2);
//! let client = TempestClient::new(config)?;
//!
//! let reading = client.fetch_reading(&Units::default())?;
//! println!("{} °C, {}% humidity", reading.temperature.current, reading.humidity);
//! # Ok::<(), skywatch_connectors::FetchError>(())
//! ```

use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use skywatch_core::{PressureReading, Reading, ReadingSource, TemperatureReading, Units, WindReading};

use crate::FetchError;

/// Public WeatherFlow endpoint
pub const DEFAULT_BASE_URL: &str = "https://swd.weatherflow.com";

/// Tempest client configuration
#[derive(Clone)]
pub struct TempestConfig {
    /// Scheme and host of the API, without a trailing path
    pub base_url: String,
    /// Personal access token
    pub api_key: String,
    /// Station to read
    pub station_id: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each attempt
    pub retry_backoff: Duration,
    /// Upper bound on a single retry delay
    pub max_backoff: Duration,
    /// User agent string
    pub user_agent: String,
}

impl TempestConfig {
    /// Configuration for `station_id` on the public endpoint
    pub fn new(api_key: impl Into<String>, station_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            station_id: station_id.into(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(10),
            user_agent: format!("Skywatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Point at another host (a proxy or a local test server)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set initial retry delay
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.retry_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

impl std::fmt::Debug for TempestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempestConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("station_id", &self.station_id)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Blocking client for one Tempest station
pub struct TempestClient {
    config: TempestConfig,
    agent: ureq::Agent,
}

impl TempestClient {
    /// Create new client
    pub fn new(config: TempestConfig) -> Result<Self, FetchError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(FetchError::Config("Base URL must start with http:// or https://".into()));
        }
        if config.api_key.trim().is_empty() {
            return Err(FetchError::Config("API key is empty".into()));
        }
        if config.station_id.trim().is_empty() {
            return Err(FetchError::Config("Station id is empty".into()));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self { config, agent })
    }

    /// Client settings
    pub fn config(&self) -> &TempestConfig {
        &self.config
    }

    /// Forecast URL for `units`
    pub fn url_for(&self, units: &Units) -> String {
        format!(
            "{}/swd/rest/better_forecast?station_id={}&units_temp={}&units_wind={}&units_pressure={}&api_key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.station_id,
            units.temp.as_str(),
            units.wind.as_str(),
            units.pressure.as_str(),
            self.config.api_key,
        )
    }

    /// Fetch with retries
    fn fetch_with_retry(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.backoff_for(attempt);
                debug!("retrying Tempest request in {:?} (attempt {})", delay, attempt + 1);
                std::thread::sleep(delay);
            }

            match self.fetch_once(url) {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() => {
                    warn!("Tempest request failed: {}", err);
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Request("Unknown error".into())))
    }

    fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        match self.agent.get(url).set("Accept", "application/json").call() {
            Ok(resp) => resp.into_string().map_err(|e| FetchError::Request(e.to_string())),
            Err(ureq::Error::Status(status, resp)) => Err(FetchError::Status {
                status,
                message: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(e)) => Err(FetchError::Request(e.to_string())),
        }
    }
}

impl std::fmt::Debug for TempestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempestClient").field("config", &self.config).finish()
    }
}

impl ReadingSource for TempestClient {
    type Error = FetchError;

    fn fetch_reading(&self, units: &Units) -> Result<Reading, Self::Error> {
        let body = self.fetch_with_retry(&self.url_for(units))?;
        let reading = parse_forecast(&body)?;
        debug!("fetched reading t={} from station {}", reading.timestamp, self.config.station_id);
        Ok(reading)
    }
}

#[derive(Deserialize)]
struct Forecast {
    current_conditions: CurrentConditions,
}

#[derive(Deserialize)]
struct CurrentConditions {
    time: u64,
    air_temperature: f64,
    dew_point: f64,
    #[serde(default)]
    conditions: String,
    #[serde(default)]
    precip_probability: f64,
    relative_humidity: f64,
    wind_avg: f64,
    wind_direction: u16,
    #[serde(default)]
    wind_direction_cardinal: String,
    wind_gust: f64,
    sea_level_pressure: f64,
    #[serde(default)]
    pressure_trend: String,
}

impl From<CurrentConditions> for Reading {
    fn from(c: CurrentConditions) -> Self {
        Reading {
            timestamp: c.time,
            temperature: TemperatureReading {
                current: c.air_temperature,
                dew_point: c.dew_point,
            },
            conditions: c.conditions,
            chance_rain: c.precip_probability,
            humidity: c.relative_humidity,
            wind: WindReading {
                speed: c.wind_avg,
                direction: c.wind_direction,
                cardinal_direction: c.wind_direction_cardinal,
                gust: c.wind_gust,
            },
            pressure: PressureReading {
                sea_level: c.sea_level_pressure,
                trend: c.pressure_trend,
            },
        }
    }
}

/// Map a `better_forecast` document to a reading
pub fn parse_forecast(body: &str) -> Result<Reading, FetchError> {
    let forecast: Forecast = serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    Ok(forecast.current_conditions.into())
}
