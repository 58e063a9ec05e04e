/// Brightness ceiling constraint implementation
use super::core::{ConstraintConfig, ConstraintEvaluator};
use crate::error::Result;
use crate::site::Site;
use crate::target::SkyTarget;
use hifitime::Epoch;
use serde::{Deserialize, Serialize};

/// Configuration for the brightness ceiling: targets fainter than
/// `max_vmag`, or without a magnitude, fail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrightnessCeilingConfig {
    pub max_vmag: f64,
}

impl ConstraintConfig for BrightnessCeilingConfig {
    fn to_evaluator(&self) -> Box<dyn ConstraintEvaluator> {
        Box::new(BrightnessCeilingEvaluator {
            max_vmag: self.max_vmag,
        })
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

struct BrightnessCeilingEvaluator {
    max_vmag: f64,
}

impl ConstraintEvaluator for BrightnessCeilingEvaluator {
    fn check(&self, _site: &Site, target: &SkyTarget, _time: &Epoch) -> Result<(bool, f64)> {
        match target.vmag {
            Some(v) if v <= self.max_vmag => Ok((true, 0.0)),
            Some(v) if v.is_finite() => Ok((false, ((v - self.max_vmag) / 5.0).min(1.0))),
            _ => Ok((false, 1.0)),
        }
    }

    fn describe(&self, _site: &Site, target: &SkyTarget, _time: &Epoch) -> String {
        match target.vmag {
            Some(v) => format!("vmag {v:.2} fainter than {:.2}", self.max_vmag),
            None => "vmag missing".to_string(),
        }
    }

    fn name(&self) -> String {
        format!("BrightnessConstraint(max_vmag={:.2})", self.max_vmag)
    }
}
