/// Altitude constraint implementation
use super::core::{ConstraintConfig, ConstraintEvaluator};
use crate::error::Result;
use crate::site::Site;
use crate::target::SkyTarget;
use hifitime::Epoch;
use serde::{Deserialize, Serialize};

/// Configuration for the minimum (and optional maximum) altitude constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltitudeConfig {
    /// Minimum allowed altitude in degrees (0 = horizon, 90 = zenith)
    pub min_altitude: f64,
    /// Maximum allowed altitude in degrees (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_altitude: Option<f64>,
}

impl AltitudeConfig {
    pub fn minimum(min_altitude: f64) -> Self {
        AltitudeConfig {
            min_altitude,
            max_altitude: None,
        }
    }
}

impl ConstraintConfig for AltitudeConfig {
    fn to_evaluator(&self) -> Box<dyn ConstraintEvaluator> {
        Box::new(AltitudeEvaluator {
            min_altitude: self.min_altitude,
            max_altitude: self.max_altitude,
        })
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Evaluator for the altitude constraint
struct AltitudeEvaluator {
    min_altitude: f64,
    max_altitude: Option<f64>,
}

impl AltitudeEvaluator {
    fn format_name(&self) -> String {
        match self.max_altitude {
            Some(max) => format!(
                "AltitudeConstraint(min={:.1}°, max={:.1}°)",
                self.min_altitude, max
            ),
            None => format!("AltitudeConstraint(min={:.1}°)", self.min_altitude),
        }
    }
}

impl ConstraintEvaluator for AltitudeEvaluator {
    fn check(&self, site: &Site, target: &SkyTarget, time: &Epoch) -> Result<(bool, f64)> {
        let altitude_deg = site.altitude(target.ra_deg, target.dec_deg, time)?;

        if altitude_deg < self.min_altitude {
            let severity = ((self.min_altitude - altitude_deg) / 90.0).min(1.0);
            return Ok((false, severity));
        }
        if let Some(max_altitude) = self.max_altitude {
            if altitude_deg > max_altitude {
                let severity = ((altitude_deg - max_altitude) / 90.0).min(1.0);
                return Ok((false, severity));
            }
        }
        Ok((true, 0.0))
    }

    fn describe(&self, site: &Site, target: &SkyTarget, time: &Epoch) -> String {
        match site.altitude(target.ra_deg, target.dec_deg, time) {
            Ok(alt) if alt < self.min_altitude => {
                format!("altitude {alt:.1}° < min {:.1}°", self.min_altitude)
            }
            Ok(alt) => match self.max_altitude {
                Some(max) => format!("altitude {alt:.1}° > max {max:.1}°"),
                None => format!("altitude {alt:.1}°"),
            },
            Err(e) => format!("altitude unavailable: {e}"),
        }
    }

    fn name(&self) -> String {
        self.format_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::epoch_from_jd;

    #[test]
    fn test_zenith_target_passes_pole_target_fails() {
        // Siding Spring, 2020-06-09 12:00 UT: local sidereal time ~224.4°
        let site = Site::new("SSO", 149.07, -31.27, 1165.0, 600);
        let t = epoch_from_jd(2459007.0);
        let eval = AltitudeConfig::minimum(30.0).to_evaluator();

        let overhead = SkyTarget::new("overhead", 224.4, -31.27, Some(10.0));
        assert!(eval.check(&site, &overhead, &t).unwrap().0);

        // North celestial pole is below the horizon in the south
        let pole = SkyTarget::new("pole", 0.0, 89.9, Some(2.0));
        let (ok, severity) = eval.check(&site, &pole, &t).unwrap();
        assert!(!ok);
        assert!(severity > 0.0 && severity <= 1.0);
        assert!(eval.describe(&site, &pole, &t).contains("< min 30.0°"));
    }

    #[test]
    fn test_max_altitude() {
        let site = Site::new("SSO", 149.07, -31.27, 1165.0, 600);
        let t = epoch_from_jd(2459007.0);
        let eval = AltitudeConfig {
            min_altitude: 0.0,
            max_altitude: Some(80.0),
        }
        .to_evaluator();
        let overhead = SkyTarget::new("overhead", 224.4, -31.27, Some(10.0));
        assert!(!eval.check(&site, &overhead, &t).unwrap().0);
        assert_eq!(eval.name(), "AltitudeConstraint(min=0.0°, max=80.0°)");
    }

    #[test]
    fn test_config_json() {
        let json = AltitudeConfig::minimum(30.0).to_json();
        assert_eq!(json, r#"{"min_altitude":30.0}"#);
    }
}
