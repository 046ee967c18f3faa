//! Profile Samples

use crate::error::EncodingError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Date-time layouts accepted for observation dates (UTC)
const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// One physical profile measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSample {
    /// Latitude (°N)
    pub latitude: f64,
    /// Longitude (°E), either in [-180, 180] or [0, 360]
    pub longitude: f64,
    /// Observation date and time (UTC)
    pub observed_at: NaiveDateTime,
    /// Pressure (dbar)
    pub pressure: f64,
    /// In-situ temperature (°C)
    pub temperature: f64,
    /// Practical salinity
    pub salinity: f64,
    /// Dissolved oxygen (µmol/kg)
    pub oxygen: f64,
}

/// Columnar batch of samples as supplied by callers
///
/// Field names follow the argument names of the published CANYON-MED
/// functions. Values are not range checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileBatch {
    pub date: Vec<String>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub pres: Vec<f64>,
    pub temp: Vec<f64>,
    pub psal: Vec<f64>,
    pub doxy: Vec<f64>,
}

impl ProfileBatch {
    /// Number of samples, taken from the date column
    pub fn len(&self) -> usize {
        self.date.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
    }

    /// Check column lengths and parse dates into row-oriented samples
    pub fn into_samples(&self) -> Result<Vec<ProfileSample>, EncodingError> {
        let expected = self.date.len();
        let columns: [(&'static str, &[f64]); 6] = [
            ("lat", &self.lat),
            ("lon", &self.lon),
            ("pres", &self.pres),
            ("temp", &self.temp),
            ("psal", &self.psal),
            ("doxy", &self.doxy),
        ];
        for (field, values) in columns {
            if values.len() != expected {
                return Err(EncodingError::LengthMismatch {
                    field,
                    expected,
                    actual: values.len(),
                });
            }
        }

        let samples = self
            .date
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let observed_at =
                    parse_observation_date(raw).ok_or_else(|| EncodingError::InvalidDate {
                        index: i,
                        value: raw.clone(),
                    })?;
                Ok(ProfileSample {
                    latitude: self.lat[i],
                    longitude: self.lon[i],
                    observed_at,
                    pressure: self.pres[i],
                    temperature: self.temp[i],
                    salinity: self.psal[i],
                    oxygen: self.doxy[i],
                })
            })
            .collect::<Result<Vec<_>, EncodingError>>()?;

        debug!("Ingested batch of {} samples", samples.len());
        Ok(samples)
    }
}

/// Parse an observation date
///
/// Accepts `yyyy-mm-dd`, `yyyy-mm-dd HH:MM`, `yyyy-mm-dd HH:MM:SS` and
/// `yyyy-mm-ddTHH:MM:SS`. A bare date means midnight.
pub fn parse_observation_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
