/// Declination range constraint implementation
use super::core::{ConstraintConfig, ConstraintEvaluator};
use crate::error::Result;
use crate::site::Site;
use crate::target::SkyTarget;
use hifitime::Epoch;
use serde::{Deserialize, Serialize};

/// Configuration for the declination range constraint (telescope pointing limits)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclinationRangeConfig {
    /// Minimum allowed declination in degrees
    pub min_dec: f64,
    /// Maximum allowed declination in degrees
    pub max_dec: f64,
}

impl ConstraintConfig for DeclinationRangeConfig {
    fn to_evaluator(&self) -> Box<dyn ConstraintEvaluator> {
        Box::new(DeclinationRangeEvaluator {
            min_dec: self.min_dec,
            max_dec: self.max_dec,
        })
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

struct DeclinationRangeEvaluator {
    min_dec: f64,
    max_dec: f64,
}

impl ConstraintEvaluator for DeclinationRangeEvaluator {
    fn check(&self, _site: &Site, target: &SkyTarget, _time: &Epoch) -> Result<(bool, f64)> {
        let dec = target.dec_deg;
        let outside = (self.min_dec - dec).max(dec - self.max_dec);
        if outside > 0.0 {
            Ok((false, (outside / 90.0).min(1.0)))
        } else {
            Ok((true, 0.0))
        }
    }

    fn describe(&self, _site: &Site, target: &SkyTarget, _time: &Epoch) -> String {
        format!(
            "declination {:.2}° outside [{:.1}°, {:.1}°]",
            target.dec_deg, self.min_dec, self.max_dec
        )
    }

    fn name(&self) -> String {
        format!(
            "DeclinationRangeConstraint(min={:.1}°, max={:.1}°)",
            self.min_dec, self.max_dec
        )
    }
}
