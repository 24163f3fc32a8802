//! Shared domain types.
//!
//! - field values and the validated `WindRecord` snapshot
//! - forecast horizons and the keys the producer writes for them
//! - watch state threaded through each poll tick
//! - the user-visible monitor status

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::Serialize;

/// File name the game add-on writes into the game root.
pub const DEFAULT_DATA_FILE_NAME: &str = "WindyData.txt";

/// Default interval between poll ticks, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);

pub const KEY_SPEED: &str = "speed";
pub const KEY_DIRECTION: &str = "direction_deg";
pub const KEY_ALTITUDE: &str = "altitude";
pub const KEY_TIMESTAMP: &str = "timestamp_unix";
pub const KEY_BODY: &str = "body";

/// Keys that must be present for a read to count as a record.
pub const REQUIRED_KEYS: [&str; 2] = [KEY_SPEED, KEY_DIRECTION];

/// One parsed value from the data file.
///
/// The producer only writes numbers and a body name, but the format is open:
/// anything that does not parse as a float is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Interpret a trimmed raw value: a float if it parses, otherwise text.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(v) => FieldValue::Number(v),
            Err(_) => FieldValue::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => Some(s),
        }
    }
}

/// One complete, validated snapshot of the data file.
///
/// The only constructor checks `REQUIRED_KEYS`, so a `WindRecord` always
/// carries `speed` and `direction_deg`. It is never mutated after
/// construction; a newer read replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WindRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl WindRecord {
    /// Build a record from parsed fields, or `None` if a required key is missing.
    pub fn from_fields(fields: BTreeMap<String, FieldValue>) -> Option<Self> {
        if REQUIRED_KEYS.iter().all(|k| fields.contains_key(*k)) {
            Some(Self { fields })
        } else {
            None
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Numeric value of `key`; `None` when absent or text.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_number)
    }

    pub fn speed(&self) -> Option<f64> {
        self.number(KEY_SPEED)
    }

    pub fn direction_deg(&self) -> Option<f64> {
        self.number(KEY_DIRECTION)
    }

    pub fn altitude(&self) -> Option<f64> {
        self.number(KEY_ALTITUDE)
    }

    pub fn timestamp_unix(&self) -> Option<f64> {
        self.number(KEY_TIMESTAMP)
    }

    /// Celestial body name, when the producer wrote one.
    pub fn body(&self) -> Option<&str> {
        self.get(KEY_BODY).and_then(FieldValue::as_text)
    }

    pub fn forecast(&self, horizon: ForecastHorizon) -> Forecast {
        Forecast {
            horizon,
            speed: self.number(horizon.speed_key()),
            direction_deg: self.number(horizon.direction_key()),
        }
    }

    pub fn forecasts(&self) -> [Forecast; 3] {
        ForecastHorizon::ALL.map(|h| self.forecast(h))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Forecast horizons the producer publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ForecastHorizon {
    FiveMin,
    TenMin,
    FifteenMin,
}

impl ForecastHorizon {
    pub const ALL: [ForecastHorizon; 3] = [
        ForecastHorizon::FiveMin,
        ForecastHorizon::TenMin,
        ForecastHorizon::FifteenMin,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            ForecastHorizon::FiveMin => 5,
            ForecastHorizon::TenMin => 10,
            ForecastHorizon::FifteenMin => 15,
        }
    }

    pub fn speed_key(self) -> &'static str {
        match self {
            ForecastHorizon::FiveMin => "forecast_5min_speed",
            ForecastHorizon::TenMin => "forecast_10min_speed",
            ForecastHorizon::FifteenMin => "forecast_15min_speed",
        }
    }

    pub fn direction_key(self) -> &'static str {
        match self {
            ForecastHorizon::FiveMin => "forecast_5min_dir",
            ForecastHorizon::TenMin => "forecast_10min_dir",
            ForecastHorizon::FifteenMin => "forecast_15min_dir",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ForecastHorizon::FiveMin => "+5 min",
            ForecastHorizon::TenMin => "+10 min",
            ForecastHorizon::FifteenMin => "+15 min",
        }
    }
}

/// Forecast values for one horizon (either half may be missing).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    pub horizon: ForecastHorizon,
    pub speed: Option<f64>,
    pub direction_deg: Option<f64>,
}

/// Last observed modification time of the watched path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchState {
    pub last_modified: Option<SystemTime>,
}

impl WatchState {
    pub fn reset() -> Self {
        Self::default()
    }
}

/// Outcome of one watcher tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// The path is empty; nothing was checked.
    NoPath,
    /// The path does not exist.
    NotFound,
    /// The modification time moved (or was seen for the first time).
    Changed,
    Unchanged,
}

/// What the user sees in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorStatus {
    /// No tick has run yet.
    Waiting,
    NoPath,
    NotFound,
    /// The file changed but did not contain a complete record.
    Invalid,
    Updated,
}

/// Resolved runtime settings shared by every front-end.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub data_file: PathBuf,
    pub poll_interval: Duration,
}
