/// Night darkness (twilight) constraint implementation
use super::core::{ConstraintConfig, ConstraintEvaluator};
use crate::error::Result;
use crate::site::Site;
use crate::target::SkyTarget;
use crate::utils::config::{ASTRONOMICAL_TWILIGHT_DEG, CIVIL_TWILIGHT_DEG, NAUTICAL_TWILIGHT_DEG};
use hifitime::Epoch;
use serde::{Deserialize, Serialize};

/// Twilight definition: the Sun altitude below which the sky counts as dark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwilightKind {
    /// Civil twilight (-6° below horizon)
    #[default]
    Civil,
    /// Nautical twilight (-12° below horizon)
    Nautical,
    /// Astronomical twilight (-18° below horizon)
    Astronomical,
}

impl TwilightKind {
    /// Sun altitude threshold in degrees
    pub fn sun_altitude_limit(self) -> f64 {
        match self {
            TwilightKind::Civil => CIVIL_TWILIGHT_DEG,
            TwilightKind::Nautical => NAUTICAL_TWILIGHT_DEG,
            TwilightKind::Astronomical => ASTRONOMICAL_TWILIGHT_DEG,
        }
    }

    fn label(self) -> &'static str {
        match self {
            TwilightKind::Civil => "civil",
            TwilightKind::Nautical => "nautical",
            TwilightKind::Astronomical => "astronomical",
        }
    }
}

/// Configuration for the night darkness constraint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NightDarknessConfig {
    #[serde(default)]
    pub twilight: TwilightKind,
}

impl ConstraintConfig for NightDarknessConfig {
    fn to_evaluator(&self) -> Box<dyn ConstraintEvaluator> {
        Box::new(NightDarknessEvaluator {
            twilight: self.twilight,
        })
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Strictly below the limit counts as dark; a Sun exactly at the limit
/// (e.g. -6.000° for civil) is not dark, unlike astroplan's `<=`
fn is_dark(sun_alt: f64, limit: f64) -> bool {
    sun_alt < limit
}

/// Evaluator for the night darkness constraint
struct NightDarknessEvaluator {
    twilight: TwilightKind,
}

impl ConstraintEvaluator for NightDarknessEvaluator {
    fn check(&self, site: &Site, _target: &SkyTarget, time: &Epoch) -> Result<(bool, f64)> {
        let sun_alt = site.sun_altitude(time)?;
        let limit = self.twilight.sun_altitude_limit();
        if is_dark(sun_alt, limit) {
            Ok((true, 0.0))
        } else {
            Ok((false, ((sun_alt - limit) / 18.0).min(1.0)))
        }
    }

    fn describe(&self, site: &Site, _target: &SkyTarget, time: &Epoch) -> String {
        match site.sun_altitude(time) {
            Ok(sun_alt) => format!(
                "Sun at {sun_alt:.1}°, not below {} twilight ({:.0}°)",
                self.twilight.label(),
                self.twilight.sun_altitude_limit()
            ),
            Err(e) => format!("Sun altitude unavailable: {e}"),
        }
    }

    fn name(&self) -> String {
        format!("AtNightConstraint(twilight={})", self.twilight.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sun_exactly_at_limit_is_not_dark() {
        let limit = TwilightKind::Civil.sun_altitude_limit();
        assert!(!is_dark(limit, limit));
        assert!(is_dark(limit - 1e-9, limit));
        assert!(!is_dark(limit + 1e-9, limit));
    }
    use crate::utils::time_utils::epoch_from_jd;

    #[test]
    fn test_thresholds() {
        assert_eq!(TwilightKind::Civil.sun_altitude_limit(), -6.0);
        assert_eq!(TwilightKind::Nautical.sun_altitude_limit(), -12.0);
        assert_eq!(TwilightKind::Astronomical.sun_altitude_limit(), -18.0);
        assert_eq!(TwilightKind::default(), TwilightKind::Civil);
    }

    #[test]
    fn test_day_and_night_at_kavalur() {
        let site = Site::default();
        let target = SkyTarget::new("any", 0.0, 0.0, None);
        let eval = NightDarknessConfig::default().to_evaluator();

        // 12:00 IST and 00:00 IST on 2026-02-16
        let noon = epoch_from_jd(2461087.770833);
        let midnight = epoch_from_jd(2461088.270833);
        assert!(!eval.check(&site, &target, &noon).unwrap().0);
        assert!(eval.check(&site, &target, &midnight).unwrap().0);
        assert!(eval.describe(&site, &target, &noon).contains("civil"));
    }

    #[test]
    fn test_twilight_kind_from_config() {
        let cfg: NightDarknessConfig = serde_json::from_str(r#"{"twilight": "astronomical"}"#).unwrap();
        assert_eq!(cfg.twilight, TwilightKind::Astronomical);
        assert_eq!(
            cfg.to_evaluator().name(),
            "AtNightConstraint(twilight=astronomical)"
        );
    }
}
