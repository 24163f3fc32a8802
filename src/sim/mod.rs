//! Procedural wind model and a stand-in producer for the data file.
//!
//! Reproduces the game add-on's wind: fractal noise over (time, altitude) for
//! speed and direction, a small altitude shear, a per-body scale, and a hard
//! cap at the configured maximum. Used by `windy simulate` so the monitor can
//! be exercised without the game running.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::io::writer::{DataFrame, FrameForecast};
use crate::domain::ForecastHorizon;

pub mod noise;

use noise::{Perlin, fbm};

/// Floor under the noise-driven speed (m/s).
const BASE_MEAN: f64 = 3.0;
/// Range the noise can add on top of the floor (m/s).
const BASE_VAR: f64 = 10.0;
const TIME_SCALE: f64 = 0.008;
const ALT_SCALE: f64 = 0.0006;
const SPEED_OCTAVES: u32 = 4;
const DIRECTION_OCTAVES: u32 = 3;
/// Altitude over which the shear adds 100% to the raw speed (m).
const SHEAR_ALTITUDE: f64 = 5000.0;

pub const DEFAULT_MAX_WIND: f64 = 25.0;

/// Built-in body scales; bodies not listed here have no wind.
pub const BODY_SCALES: [(&str, f64); 10] = [
    ("Kerbin", 1.0),
    ("Duna", 0.45),
    ("Eve", 1.8),
    ("Jool", 2.6),
    ("Laythe", 0.6),
    ("Sarnus", 2.6),
    ("Urlum", 2.6),
    ("Neidon", 2.6),
    ("Tekto", 0.6),
    ("Thatmo", 0.02),
];

/// Wind scale for `body` (case-insensitive), `0.0` when unknown.
pub fn body_scale(body: &str) -> f64 {
    BODY_SCALES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(body))
        .map(|&(_, s)| s)
        .unwrap_or(0.0)
}

/// Coarse strength label relative to the configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindClass {
    Stable,
    Breezy,
    Strong,
}

impl WindClass {
    pub fn display_name(self) -> &'static str {
        match self {
            WindClass::Stable => "Stable",
            WindClass::Breezy => "Breezy",
            WindClass::Strong => "Strong",
        }
    }
}

/// One evaluation of the wind model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSample {
    pub speed: f64,
    pub direction_deg: f64,
    pub altitude: f64,
    pub class: WindClass,
}

/// Deterministic wind field for one session.
#[derive(Debug, Clone)]
pub struct WindModel {
    noise: Perlin,
    seed_time: f64,
    seed_alt: f64,
    seed_dir: f64,
    max_wind: f64,
}

impl WindModel {
    /// Build a model; `max_wind <= 1` falls back to the default cap.
    pub fn new(seed: u64, max_wind: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let seed_time = rng.gen_range(0.0..10_000.0);
        let seed_alt = rng.gen_range(0.0..10_000.0);
        let seed_dir = rng.gen_range(0.0..10_000.0);
        let noise = Perlin::new(&mut rng);
        Self {
            noise,
            seed_time,
            seed_alt,
            seed_dir,
            max_wind: effective_max_wind(max_wind),
        }
    }

    pub fn max_wind(&self) -> f64 {
        self.max_wind
    }

    /// Wind at `altitude` (m) and simulation time `time` (s).
    pub fn sample(&self, altitude: f64, time: f64) -> WindSample {
        let n = fbm(
            &self.noise,
            self.seed_time + time * TIME_SCALE,
            self.seed_alt + altitude * ALT_SCALE,
            SPEED_OCTAVES,
        );
        let raw = BASE_MEAN + n * BASE_VAR;
        let sheared = raw * (1.0 + altitude / SHEAR_ALTITUDE);
        let speed = sheared.clamp(0.0, self.max_wind);

        let d = fbm(
            &self.noise,
            self.seed_dir + time * (TIME_SCALE * 0.9),
            self.seed_alt + altitude * (ALT_SCALE * 0.5),
            DIRECTION_OCTAVES,
        );
        let direction_deg = (d * 360.0).rem_euclid(360.0);

        let class = if speed > self.max_wind * 0.8 {
            WindClass::Strong
        } else if speed > self.max_wind * 0.45 {
            WindClass::Breezy
        } else {
            WindClass::Stable
        };

        WindSample {
            speed,
            direction_deg,
            altitude,
            class,
        }
    }

    /// Wind `minutes_ahead` minutes after `time`.
    pub fn forecast(&self, altitude: f64, time: f64, minutes_ahead: f64) -> WindSample {
        self.sample(altitude, time + minutes_ahead * 60.0)
    }
}

fn effective_max_wind(max_wind: f64) -> f64 {
    if max_wind.is_finite() && max_wind > 1.0 {
        max_wind
    } else {
        DEFAULT_MAX_WIND
    }
}

/// Simulator settings (resolved from `windy simulate` arguments).
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub body: String,
    /// Starting altitude (m).
    pub altitude: f64,
    /// Vertical speed applied over simulation time (m/s).
    pub climb_rate: f64,
    pub max_wind: f64,
    pub seed: u64,
    /// Added to elapsed seconds to form simulation time.
    pub time_offset: f64,
}

/// Stand-in for the game add-on: turns elapsed time into data frames.
#[derive(Debug, Clone)]
pub struct Simulator {
    model: WindModel,
    body: String,
    scale: f64,
    altitude: f64,
    climb_rate: f64,
    time_offset: f64,
}

impl Simulator {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            model: WindModel::new(config.seed, config.max_wind),
            body: config.body.clone(),
            scale: body_scale(&config.body),
            altitude: config.altitude,
            climb_rate: config.climb_rate,
            time_offset: config.time_offset,
        }
    }

    pub fn has_wind(&self) -> bool {
        self.scale > 0.0
    }

    /// Frame for `elapsed` seconds since start, stamped with `now_unix`.
    pub fn frame(&self, elapsed: f64, now_unix: f64) -> DataFrame {
        if !self.has_wind() {
            return DataFrame::calm(self.body.clone(), now_unix);
        }

        let time = self.time_offset + elapsed;
        let altitude = (self.altitude + self.climb_rate * elapsed).max(0.0);
        let max_wind = self.model.max_wind();

        let current = self.model.sample(altitude, time);
        let forecasts = ForecastHorizon::ALL.map(|h| {
            let f = self.model.forecast(altitude, time, f64::from(h.minutes()));
            FrameForecast {
                speed: (f.speed * self.scale).min(max_wind),
                direction_deg: f.direction_deg,
            }
        });

        tracing::trace!(
            speed = current.speed,
            direction = current.direction_deg,
            class = current.class.display_name(),
            "simulated wind"
        );

        DataFrame {
            speed: (current.speed * self.scale).min(max_wind),
            direction_deg: current.direction_deg,
            timestamp_unix: now_unix,
            altitude,
            body: self.body.clone(),
            forecasts,
        }
    }
}
