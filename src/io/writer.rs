//! Producer-format writer used by the simulator.
//!
//! The line order and decimal places match what the game add-on writes, so
//! the monitor cannot tell the two producers apart.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{
    DEFAULT_DATA_FILE_NAME, ForecastHorizon, KEY_ALTITUDE, KEY_BODY, KEY_DIRECTION, KEY_SPEED, KEY_TIMESTAMP,
};
use crate::error::AppError;

/// Speed and direction for one forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameForecast {
    pub speed: f64,
    pub direction_deg: f64,
}

/// One full write of the data file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    pub speed: f64,
    pub direction_deg: f64,
    pub timestamp_unix: f64,
    pub altitude: f64,
    pub body: String,
    /// Ordered as `ForecastHorizon::ALL`.
    pub forecasts: [FrameForecast; 3],
}

impl DataFrame {
    /// The frame the producer writes when there is no wind to report.
    pub fn calm(body: impl Into<String>, timestamp_unix: f64) -> Self {
        Self {
            speed: 0.0,
            direction_deg: 0.0,
            timestamp_unix,
            altitude: 0.0,
            body: body.into(),
            forecasts: [FrameForecast::default(); 3],
        }
    }

    /// Render the file contents.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{KEY_SPEED}={:.2}\n", self.speed));
        out.push_str(&format!("{KEY_DIRECTION}={:.1}\n", self.direction_deg));
        out.push_str(&format!("{KEY_TIMESTAMP}={:.3}\n", self.timestamp_unix));
        out.push_str(&format!("{KEY_ALTITUDE}={:.0}\n", self.altitude));
        out.push_str(&format!("{KEY_BODY}={}\n", self.body));
        for (horizon, f) in ForecastHorizon::ALL.iter().zip(&self.forecasts) {
            out.push_str(&format!("{}={:.2}\n", horizon.speed_key(), f.speed));
            out.push_str(&format!("{}={:.1}\n", horizon.direction_key(), f.direction_deg));
        }
        out
    }
}

/// Replace the data file with `frame`.
///
/// Writes a sibling temp file first and renames it over the target so readers
/// never see a half-written frame.
pub fn write_data_file(path: &Path, frame: &DataFrame) -> Result<(), AppError> {
    let tmp = temp_path(path);
    fs::write(&tmp, frame.render())
        .map_err(|e| AppError::runtime(format!("Failed to write '{}': {e}", tmp.display())))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        AppError::runtime(format!("Failed to replace '{}': {e}", path.display()))
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_DATA_FILE_NAME.into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse::parse_wind_file;

    fn sample_frame() -> DataFrame {
        DataFrame {
            speed: 12.346,
            direction_deg: 270.04,
            timestamp_unix: 1_700_000_000.5,
            altitude: 1234.4,
            body: "Kerbin".to_string(),
            forecasts: [
                FrameForecast { speed: 6.0, direction_deg: 190.0 },
                FrameForecast { speed: 7.5, direction_deg: 200.26 },
                FrameForecast { speed: 8.126, direction_deg: 210.0 },
            ],
        }
    }

    #[test]
    fn render_matches_producer_layout() {
        let text = sample_frame().render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "speed=12.35",
                "direction_deg=270.0",
                "timestamp_unix=1700000000.500",
                "altitude=1234",
                "body=Kerbin",
                "forecast_5min_speed=6.00",
                "forecast_5min_dir=190.0",
                "forecast_10min_speed=7.50",
                "forecast_10min_dir=200.3",
                "forecast_15min_speed=8.13",
                "forecast_15min_dir=210.0",
            ]
        );
    }

    #[test]
    fn written_file_is_readable_by_monitor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WindyData.txt");
        write_data_file(&path, &sample_frame()).unwrap();

        let record = parse_wind_file(&path).expect("record");
        assert_eq!(record.body(), Some("Kerbin"));
        assert_eq!(record.number("forecast_15min_dir"), Some(210.0));
        assert!(!temp_path(&path).exists(), "temp file is renamed away");
    }

    #[test]
    fn calm_frame_has_zero_wind() {
        let frame = DataFrame::calm("Mun", 10.0);
        assert!(frame.render().starts_with("speed=0.00\ndirection_deg=0.0\n"));
        assert!(frame.render().contains("body=Mun\n"));
    }
}
