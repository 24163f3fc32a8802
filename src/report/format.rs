//! Presentation formatting shared by the TUI and the line-mode commands.
//!
//! We keep formatting code in one place so:
//! - the watch/parse code stays free of display concerns
//! - output changes are localized

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::domain::{DEFAULT_DATA_FILE_NAME, ForecastHorizon, MonitorStatus, WindRecord};

/// Shown for any field that is absent or not numeric.
pub const PLACEHOLDER: &str = "—";

/// Current wall-clock time as fractional Unix seconds.
pub fn now_unix() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Speed with one decimal place.
pub fn fmt_speed(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.1}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Whole degrees with a degree sign.
pub fn fmt_direction(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.0}°"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Whole metres.
pub fn fmt_altitude(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.0}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Eight-point compass label for a heading in degrees (any range).
pub fn compass_point(deg: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    if !deg.is_finite() {
        return PLACEHOLDER;
    }
    let idx = ((deg.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize % 8;
    POINTS[idx]
}

/// Seconds between the producer's timestamp and `now_unix`, never negative.
///
/// The producer's clock can run ahead of ours, which would otherwise show a
/// negative age.
pub fn age_seconds(timestamp_unix: f64, now_unix: f64) -> f64 {
    (now_unix - timestamp_unix).max(0.0)
}

/// The status line for the current monitor state.
pub fn status_line(status: MonitorStatus, path: &Path, record: Option<&WindRecord>, now_unix: f64) -> String {
    match status {
        MonitorStatus::Waiting => format!("Waiting for {DEFAULT_DATA_FILE_NAME}..."),
        MonitorStatus::NoPath => "No file selected.".to_string(),
        MonitorStatus::NotFound => format!("File not found: {}", path.display()),
        MonitorStatus::Invalid => "Invalid or incomplete data.".to_string(),
        MonitorStatus::Updated => match record.and_then(WindRecord::timestamp_unix) {
            Some(ts) => format!("Updated {:.1}s ago", age_seconds(ts, now_unix)),
            None => "Updated".to_string(),
        },
    }
}

/// Display strings for one forecast row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastDisplay {
    pub label: &'static str,
    pub speed: String,
    pub direction: String,
}

/// Display strings for every field the UI shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindDisplay {
    pub speed: String,
    pub direction: String,
    pub compass: &'static str,
    pub altitude: String,
    pub body: String,
    pub forecasts: [ForecastDisplay; 3],
}

impl WindDisplay {
    /// Build display strings; `None` renders every field as a placeholder.
    pub fn from_record(record: Option<&WindRecord>) -> Self {
        let direction = record.and_then(WindRecord::direction_deg);
        let forecasts = ForecastHorizon::ALL.map(|h| {
            let f = record.map(|r| r.forecast(h));
            ForecastDisplay {
                label: h.label(),
                speed: fmt_speed(f.and_then(|f| f.speed)),
                direction: fmt_direction(f.and_then(|f| f.direction_deg)),
            }
        });

        Self {
            speed: fmt_speed(record.and_then(WindRecord::speed)),
            direction: fmt_direction(direction),
            compass: direction.map(compass_point).unwrap_or(PLACEHOLDER),
            altitude: fmt_altitude(record.and_then(WindRecord::altitude)),
            body: record
                .and_then(WindRecord::body)
                .unwrap_or(PLACEHOLDER)
                .to_string(),
            forecasts,
        }
    }
}

/// One line for `windy watch`.
pub fn format_watch_line(display: &WindDisplay, status: &str) -> String {
    let mut out = format!(
        "speed {} m/s @ {} ({}) | alt {} m",
        display.speed, display.direction, display.compass, display.altitude
    );
    for f in &display.forecasts {
        out.push_str(&format!(" | {} {} @ {}", f.label, f.speed, f.direction));
    }
    out.push_str(&format!(" | {status}"));
    out
}

/// Multi-line snapshot for `windy show`.
pub fn format_snapshot(path: &Path, display: &WindDisplay, status: &str) -> String {
    let mut out = String::new();
    out.push_str("=== windy - wind monitor ===\n");
    out.push_str(&format!("File: {}\n", path.display()));
    out.push_str(&format!("Body: {}\n", display.body));
    out.push('\n');
    out.push_str("CURRENT WIND\n");
    out.push_str(&format!("  Speed (m/s):     {}\n", display.speed));
    out.push_str(&format!("  Direction (deg): {} {}\n", display.direction, display.compass));
    out.push_str(&format!("  Altitude (m):    {}\n", display.altitude));
    out.push('\n');
    out.push_str("FORECASTS\n");
    for f in &display.forecasts {
        out.push_str(&format!("  {:<8} {:>6} m/s @ {}\n", format!("{}:", f.label), f.speed, f.direction));
    }
    out.push('\n');
    out.push_str(status);
    out
}

/// JSON shape for `windy show --json`.
#[derive(Debug, Serialize)]
pub struct SnapshotJson<'a> {
    pub path: String,
    pub status: MonitorStatus,
    pub age_seconds: Option<f64>,
    pub record: Option<&'a WindRecord>,
}

impl<'a> SnapshotJson<'a> {
    pub fn new(path: &Path, status: MonitorStatus, record: Option<&'a WindRecord>, now_unix: f64) -> Self {
        Self {
            path: path.display().to_string(),
            status,
            age_seconds: record
                .and_then(WindRecord::timestamp_unix)
                .map(|ts| age_seconds(ts, now_unix)),
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_wind_text;

    #[test]
    fn speed_rounds_to_one_decimal() {
        let record = parse_wind_text("speed=12.345\ndirection_deg=270").unwrap();
        let display = WindDisplay::from_record(Some(&record));
        assert_eq!(display.speed, "12.3");
        assert_eq!(display.direction, "270°");
        assert_eq!(display.compass, "W");
    }

    #[test]
    fn absent_forecasts_render_as_placeholders() {
        let text = "speed=5.5\ndirection_deg=180\naltitude=1200\nforecast_5min_speed=6.0\nforecast_5min_dir=190";
        let record = parse_wind_text(text).unwrap();
        let display = WindDisplay::from_record(Some(&record));

        assert_eq!(display.altitude, "1200");
        assert_eq!(display.forecasts[0].speed, "6.0");
        assert_eq!(display.forecasts[0].direction, "190°");
        for f in &display.forecasts[1..] {
            assert_eq!(f.speed, PLACEHOLDER);
            assert_eq!(f.direction, PLACEHOLDER);
        }
        assert_eq!(display.body, PLACEHOLDER);
    }

    #[test]
    fn no_record_is_all_placeholders() {
        let display = WindDisplay::from_record(None);
        assert_eq!(display.speed, PLACEHOLDER);
        assert_eq!(display.direction, PLACEHOLDER);
        assert_eq!(display.compass, PLACEHOLDER);
        assert_eq!(display.altitude, PLACEHOLDER);
    }

    #[test]
    fn text_speed_renders_placeholder() {
        let record = parse_wind_text("speed=n/a\ndirection_deg=10").unwrap();
        assert_eq!(WindDisplay::from_record(Some(&record)).speed, PLACEHOLDER);
    }

    #[test]
    fn age_is_measured_against_now() {
        let now = now_unix();
        let record = parse_wind_text(&format!("speed=1\ndirection_deg=2\ntimestamp_unix={}", now - 30.0)).unwrap();
        let line = status_line(MonitorStatus::Updated, Path::new("x"), Some(&record), now_unix());

        let secs: f64 = line
            .strip_prefix("Updated ")
            .and_then(|s| s.strip_suffix("s ago"))
            .and_then(|s| s.parse().ok())
            .expect("age in status line");
        assert!((30.0..31.0).contains(&secs), "age {secs} should be about 30s");
    }

    #[test]
    fn future_timestamp_clamps_to_zero() {
        let now = 1_700_000_000.0;
        let record = parse_wind_text(&format!("speed=1\ndirection_deg=2\ntimestamp_unix={}", now + 10.0)).unwrap();
        assert_eq!(
            status_line(MonitorStatus::Updated, Path::new("x"), Some(&record), now),
            "Updated 0.0s ago"
        );
    }

    #[test]
    fn updated_without_timestamp() {
        let record = parse_wind_text("speed=1\ndirection_deg=2\ntimestamp_unix=soon").unwrap();
        assert_eq!(
            status_line(MonitorStatus::Updated, Path::new("x"), Some(&record), 0.0),
            "Updated"
        );
    }

    #[test]
    fn status_lines_for_failure_states() {
        let path = Path::new("/games/ksp/WindyData.txt");
        assert_eq!(status_line(MonitorStatus::NoPath, path, None, 0.0), "No file selected.");
        assert_eq!(
            status_line(MonitorStatus::NotFound, path, None, 0.0),
            "File not found: /games/ksp/WindyData.txt"
        );
        assert_eq!(
            status_line(MonitorStatus::Invalid, path, None, 0.0),
            "Invalid or incomplete data."
        );
        assert_eq!(
            status_line(MonitorStatus::Waiting, path, None, 0.0),
            "Waiting for WindyData.txt..."
        );
    }

    #[test]
    fn compass_wraps_any_range() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(-90.0), "W");
        assert_eq!(compass_point(450.0), "E");
        assert_eq!(compass_point(135.0), "SE");
    }

    #[test]
    fn watch_line_lists_every_horizon() {
        let record = parse_wind_text("speed=4\ndirection_deg=90").unwrap();
        let line = format_watch_line(&WindDisplay::from_record(Some(&record)), "Updated");
        assert!(line.starts_with("speed 4.0 m/s @ 90° (E)"));
        assert!(line.contains("+5 min — @ —"));
        assert!(line.contains("+15 min — @ —"));
        assert!(line.ends_with("| Updated"));
    }

    #[test]
    fn json_snapshot_keeps_value_types() {
        let record = parse_wind_text("speed=4\ndirection_deg=90\nbody=Duna\ntimestamp_unix=100").unwrap();
        let snapshot = SnapshotJson::new(Path::new("d.txt"), MonitorStatus::Updated, Some(&record), 160.0);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["status"], "updated");
        assert_eq!(json["age_seconds"], 60.0);
        assert_eq!(json["record"]["speed"], 4.0);
        assert_eq!(json["record"]["body"], "Duna");
    }
}
