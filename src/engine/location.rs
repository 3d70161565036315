//! Shareable location state for History sessions.
//!
//! While a snapshot is open, the History surface mirrors the selection into
//! three named query parameters (`date`, `period`, `camera`) so a copied
//! URL reproduces the exact view. Absence of the parameters means "nothing
//! open". Latest sessions never publish location state.

use crate::model::{CameraId, DayKey, Period};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PARAM_DATE: &str = "date";
pub const PARAM_PERIOD: &str = "period";
pub const PARAM_CAMERA: &str = "camera";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("missing parameter: {0}")]
    Missing(&'static str),

    #[error("invalid {name} parameter: {value}")]
    Invalid { name: &'static str, value: String },
}

/// The published selection. `camera` is omitted when the open cursor does
/// not resolve to an entry (there is nothing to name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationQuery {
    pub day: DayKey,
    pub period: Period,
    pub camera: Option<CameraId>,
}

impl LocationQuery {
    /// Query parameter pairs in publication order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            (PARAM_DATE.to_string(), self.day.to_string()),
            (PARAM_PERIOD.to_string(), self.period.to_string()),
        ];
        if let Some(camera) = &self.camera {
            pairs.push((PARAM_CAMERA.to_string(), camera.to_string()));
        }
        pairs
    }

    /// Reads a location back from query parameters. `Ok(None)` when none of
    /// the viewer parameters are present (nothing open); an error when they
    /// are present but incomplete or unparseable.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Option<Self>, LocationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut date = None;
        let mut period = None;
        let mut camera = None;
        for (name, value) in pairs {
            match name {
                PARAM_DATE => date = Some(value),
                PARAM_PERIOD => period = Some(value),
                PARAM_CAMERA => camera = Some(value),
                _ => {}
            }
        }

        if date.is_none() && period.is_none() && camera.is_none() {
            return Ok(None);
        }

        let date = date.ok_or(LocationError::Missing(PARAM_DATE))?;
        let period = period.ok_or(LocationError::Missing(PARAM_PERIOD))?;

        let day = date.parse::<DayKey>().map_err(|_| LocationError::Invalid {
            name: PARAM_DATE,
            value: date.to_string(),
        })?;
        let period = period
            .parse::<Period>()
            .map_err(|_| LocationError::Invalid {
                name: PARAM_PERIOD,
                value: period.to_string(),
            })?;

        Ok(Some(Self {
            day,
            period,
            camera: camera.map(CameraId::from),
        }))
    }
}
