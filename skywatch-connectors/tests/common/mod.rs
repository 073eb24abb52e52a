//! Shared fixtures for connector integration tests
//!
//! - a canned HTTP server that answers requests from a script
//! - a scripted reading source for monitor tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use skywatch_core::{testing::reading, Reading, ReadingSource, Units};

/// Minimal forecast document with the given observation time
pub fn forecast_body(time: u64, humidity: f64) -> String {
    format!(
        r#"{{"current_conditions": {{
            "time": {time},
            "conditions": "Partly Cloudy",
            "air_temperature": 18.0,
            "dew_point": 9.0,
            "precip_probability": 0,
            "relative_humidity": {humidity},
            "wind_avg": 2.0,
            "wind_direction": 270,
            "wind_direction_cardinal": "W",
            "wind_gust": 3.5,
            "sea_level_pressure": 1014.2,
            "pressure_trend": "steady"
        }}}}"#
    )
}

/// Local server answering one scripted `(status, body)` per connection
///
/// Returns the base URL, the request lines it saw, and the server thread.
pub fn canned_server(responses: Vec<(u16, String)>) -> (String, Arc<Mutex<Vec<String>>>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    let handle = thread::spawn(move || {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();

            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let text = String::from_utf8_lossy(&request);
            log.lock().unwrap().push(text.lines().next().unwrap_or_default().to_string());

            let response = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
    });

    (base_url, seen, handle)
}

/// Source that replays a script of successes and failures, then fails
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Reading, String>>>,
    requested: Mutex<Vec<Units>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Reading, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// `count` calm readings with increasing timestamps
    pub fn calm(count: u64) -> Self {
        Self::new((1..=count).map(|t| Ok(reading(t))).collect())
    }

    /// Units passed to each fetch
    pub fn requested(&self) -> Vec<Units> {
        self.requested.lock().unwrap().clone()
    }
}

impl ReadingSource for ScriptedSource {
    type Error = String;

    fn fetch_reading(&self, units: &Units) -> Result<Reading, Self::Error> {
        self.requested.lock().unwrap().push(*units);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()))
    }
}
