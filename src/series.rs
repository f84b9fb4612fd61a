//! Synthetic daily series generation
//!
//! Produces one multivariate observation per calendar day for a segment,
//! with a slow upward trend, annual seasonality, Gaussian noise, and a
//! small fraction of injected anomalies used as ground truth in tests.

use crate::error::{CarbonError, Result};
use crate::segment::Segment;
use chrono::{Duration, NaiveDate, Utc};
use ndarray::Array2;
use rand::prelude::*;
use rand_distr::Normal;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// Number of features per observation
pub const N_FEATURES: usize = 8;

/// Feature column names, in matrix column order
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "emission",
    "energy_consumption",
    "temperature",
    "humidity",
    "pressure",
    "wind_speed",
    "gdp",
    "policy_factor",
];

/// Probability that a day's emission is replaced by an injected anomaly
const INJECTION_RATE: f64 = 0.05;

/// Multipliers applied to the baseline emission for injected anomalies
const INJECTION_FACTORS: [f64; 3] = [0.1, 2.0, 5.0];

/// One calendar day of measurements for a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub emission: f64,
    pub energy_consumption: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub gdp: f64,
    pub policy_factor: f64,
}

impl Observation {
    /// Feature vector in [`FEATURE_NAMES`] order
    pub fn features(&self) -> [f64; N_FEATURES] {
        [
            self.emission,
            self.energy_consumption,
            self.temperature,
            self.humidity,
            self.pressure,
            self.wind_speed,
            self.gdp,
            self.policy_factor,
        ]
    }
}

/// A generated series plus the indices of its injected anomalies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticSeries {
    /// Observations in ascending date order, one per day
    pub observations: Vec<Observation>,
    /// Row indices whose emission was overridden with an injected anomaly
    pub injected: Vec<usize>,
}

impl SyntheticSeries {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Dense feature matrix, rows = observations, columns = [`FEATURE_NAMES`]
    pub fn feature_matrix(&self) -> Array2<f64> {
        let mut x = Array2::zeros((self.observations.len(), N_FEATURES));
        for (i, obs) in self.observations.iter().enumerate() {
            for (j, value) in obs.features().iter().enumerate() {
                x[[i, j]] = *value;
            }
        }
        x
    }
}

/// Synthetic series generator
///
/// Pure function of (segment, day count, seed): the same seed always
/// reproduces the same series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesGenerator {
    seed: Option<u64>,
}

impl SeriesGenerator {
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate `days` observations spanning `[today - days, today)`,
    /// ascending by date. A day count below 1 is clamped to 1.
    pub fn generate(&self, segment: Segment, days: usize) -> Result<SyntheticSeries> {
        let days = days.max(1);
        let base = segment.baseline();

        let mut rng = match self.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        let start = Utc::now().date_naive() - Duration::days(days as i64);

        let noise = gaussian(0.0, base.emission * 0.1)?;
        let energy_dist = gaussian(base.energy, base.energy * 0.1)?;
        let temperature_dist = gaussian(base.temperature, 5.0)?;
        let humidity_dist = gaussian(base.humidity, 10.0)?;
        let pressure_dist = gaussian(base.pressure, 5.0)?;
        let wind_dist = gaussian(base.wind_speed, 2.0)?;
        let gdp_dist = gaussian(base.gdp, base.gdp * 0.05)?;
        let policy_dist = gaussian(1.0, 0.1)?;

        let mut observations = Vec::with_capacity(days);
        let mut injected = Vec::new();

        for i in 0..days {
            let date = start + Duration::days(i as i64);

            let emission = if rng.gen::<f64>() < INJECTION_RATE {
                injected.push(i);
                let factor = INJECTION_FACTORS[rng.gen_range(0..INJECTION_FACTORS.len())];
                base.emission * factor
            } else {
                let trend = base.emission * (1.0 + 0.001 * i as f64);
                let seasonal = base.emission
                    * 0.2
                    * (2.0 * std::f64::consts::PI * i as f64 / 365.0).sin();
                (trend + seasonal + noise.sample(&mut rng)).max(0.0)
            };

            observations.push(Observation {
                date,
                emission,
                energy_consumption: energy_dist.sample(&mut rng),
                temperature: temperature_dist.sample(&mut rng),
                humidity: humidity_dist.sample(&mut rng),
                pressure: pressure_dist.sample(&mut rng),
                wind_speed: wind_dist.sample(&mut rng),
                gdp: gdp_dist.sample(&mut rng),
                policy_factor: policy_dist.sample(&mut rng),
            });
        }

        Ok(SyntheticSeries {
            observations,
            injected,
        })
    }
}

impl Default for SeriesGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn gaussian(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev)
        .map_err(|e| CarbonError::DataError(format!("invalid normal distribution: {e}")))
}
