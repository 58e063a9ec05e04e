//! Catalog targets and the cheap per-target pre-filter

use serde::{Deserialize, Serialize};

use crate::utils::config::{DEFAULT_MAX_DEC_DEG, DEFAULT_MAX_VMAG, DEFAULT_MIN_DEC_DEG};

/// A fixed point on the sky taken from one catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyTarget {
    pub name: String,
    /// Right ascension in degrees (ICRS)
    pub ra_deg: f64,
    /// Declination in degrees (ICRS), within [-90, 90]
    pub dec_deg: f64,
    /// Apparent V magnitude; `None` when missing or unparseable
    pub vmag: Option<f64>,
}

impl SkyTarget {
    pub fn new(name: impl Into<String>, ra_deg: f64, dec_deg: f64, vmag: Option<f64>) -> Self {
        SkyTarget {
            name: name.into(),
            ra_deg,
            dec_deg,
            vmag,
        }
    }
}

/// Why a target was rejected before any ephemeris work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreFilterRejection {
    DeclinationOutOfRange,
    MagnitudeMissing,
    TooFaint,
}

/// Plain numeric limits applied once per target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreFilter {
    pub min_dec_deg: f64,
    pub max_dec_deg: f64,
    pub max_vmag: f64,
}

impl Default for PreFilter {
    fn default() -> Self {
        PreFilter {
            min_dec_deg: DEFAULT_MIN_DEC_DEG,
            max_dec_deg: DEFAULT_MAX_DEC_DEG,
            max_vmag: DEFAULT_MAX_VMAG,
        }
    }
}

impl PreFilter {
    /// Accept or reject a target; limits are inclusive
    pub fn check(&self, target: &SkyTarget) -> Result<(), PreFilterRejection> {
        if target.dec_deg < self.min_dec_deg || target.dec_deg > self.max_dec_deg {
            return Err(PreFilterRejection::DeclinationOutOfRange);
        }
        match target.vmag {
            None => Err(PreFilterRejection::MagnitudeMissing),
            Some(v) if v.is_nan() => Err(PreFilterRejection::MagnitudeMissing),
            Some(v) if v > self.max_vmag => Err(PreFilterRejection::TooFaint),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(dec: f64, vmag: Option<f64>) -> SkyTarget {
        SkyTarget::new("t", 10.0, dec, vmag)
    }

    #[test]
    fn test_declination_boundaries_inclusive() {
        let f = PreFilter::default();
        assert_eq!(f.check(&target(65.0, Some(10.0))), Ok(()));
        assert_eq!(f.check(&target(-65.0, Some(10.0))), Ok(()));
        assert_eq!(
            f.check(&target(65.0001, Some(10.0))),
            Err(PreFilterRejection::DeclinationOutOfRange)
        );
        assert_eq!(
            f.check(&target(-65.0001, Some(10.0))),
            Err(PreFilterRejection::DeclinationOutOfRange)
        );
    }

    #[test]
    fn test_magnitude_boundaries() {
        let f = PreFilter::default();
        assert_eq!(f.check(&target(0.0, Some(15.0))), Ok(()));
        assert_eq!(
            f.check(&target(0.0, Some(15.0001))),
            Err(PreFilterRejection::TooFaint)
        );
        assert_eq!(
            f.check(&target(0.0, None)),
            Err(PreFilterRejection::MagnitudeMissing)
        );
        assert_eq!(
            f.check(&target(0.0, Some(f64::NAN))),
            Err(PreFilterRejection::MagnitudeMissing)
        );
    }

    #[test]
    fn test_declination_checked_before_magnitude() {
        let f = PreFilter::default();
        assert_eq!(
            f.check(&target(80.0, None)),
            Err(PreFilterRejection::DeclinationOutOfRange)
        );
    }
}
