//! Industry segments and their baseline statistical profiles

use crate::error::CarbonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Industry segment with its own baseline emission profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Manufacturing,
    Energy,
    Transportation,
    Agriculture,
    Construction,
    Services,
    Mining,
    Chemical,
}

/// Typical feature magnitudes for a segment, used to parameterize
/// synthetic series generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentBaseline {
    /// Daily emission baseline (tons CO2e)
    pub emission: f64,
    /// Energy consumption baseline (MWh)
    pub energy: f64,
    /// Ambient temperature baseline (deg C)
    pub temperature: f64,
    /// Relative humidity baseline (%)
    pub humidity: f64,
    /// Atmospheric pressure baseline (hPa)
    pub pressure: f64,
    /// Wind speed baseline (m/s)
    pub wind_speed: f64,
    /// Economic output proxy
    pub gdp: f64,
}

impl Segment {
    /// All segments, in declaration order
    pub const ALL: [Segment; 8] = [
        Segment::Manufacturing,
        Segment::Energy,
        Segment::Transportation,
        Segment::Agriculture,
        Segment::Construction,
        Segment::Services,
        Segment::Mining,
        Segment::Chemical,
    ];

    /// Lowercase wire name of the segment
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Manufacturing => "manufacturing",
            Segment::Energy => "energy",
            Segment::Transportation => "transportation",
            Segment::Agriculture => "agriculture",
            Segment::Construction => "construction",
            Segment::Services => "services",
            Segment::Mining => "mining",
            Segment::Chemical => "chemical",
        }
    }

    /// Baseline feature values for this segment
    pub fn baseline(&self) -> SegmentBaseline {
        match self {
            Segment::Energy => SegmentBaseline {
                emission: 1000.0,
                energy: 5000.0,
                temperature: 25.0,
                humidity: 60.0,
                pressure: 1013.0,
                wind_speed: 3.0,
                gdp: 100_000.0,
            },
            Segment::Manufacturing => SegmentBaseline {
                emission: 800.0,
                energy: 4000.0,
                temperature: 22.0,
                humidity: 50.0,
                pressure: 1013.0,
                wind_speed: 2.0,
                gdp: 80_000.0,
            },
            Segment::Transportation => SegmentBaseline {
                emission: 600.0,
                energy: 3000.0,
                temperature: 20.0,
                humidity: 55.0,
                pressure: 1013.0,
                wind_speed: 5.0,
                gdp: 60_000.0,
            },
            Segment::Agriculture => SegmentBaseline {
                emission: 400.0,
                energy: 2000.0,
                temperature: 18.0,
                humidity: 70.0,
                pressure: 1013.0,
                wind_speed: 4.0,
                gdp: 40_000.0,
            },
            Segment::Construction => SegmentBaseline {
                emission: 500.0,
                energy: 2500.0,
                temperature: 24.0,
                humidity: 45.0,
                pressure: 1013.0,
                wind_speed: 3.0,
                gdp: 50_000.0,
            },
            Segment::Services => SegmentBaseline {
                emission: 300.0,
                energy: 1500.0,
                temperature: 21.0,
                humidity: 55.0,
                pressure: 1013.0,
                wind_speed: 2.0,
                gdp: 30_000.0,
            },
            Segment::Mining => SegmentBaseline {
                emission: 700.0,
                energy: 3500.0,
                temperature: 26.0,
                humidity: 40.0,
                pressure: 1013.0,
                wind_speed: 4.0,
                gdp: 70_000.0,
            },
            Segment::Chemical => SegmentBaseline {
                emission: 900.0,
                energy: 4500.0,
                temperature: 23.0,
                humidity: 50.0,
                pressure: 1013.0,
                wind_speed: 2.0,
                gdp: 90_000.0,
            },
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = CarbonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manufacturing" => Ok(Segment::Manufacturing),
            "energy" => Ok(Segment::Energy),
            "transportation" => Ok(Segment::Transportation),
            "agriculture" => Ok(Segment::Agriculture),
            "construction" => Ok(Segment::Construction),
            "services" => Ok(Segment::Services),
            "mining" => Ok(Segment::Mining),
            "chemical" => Ok(Segment::Chemical),
            other => Err(CarbonError::UnknownSegment(other.to_string())),
        }
    }
}
