//! Observing site and the sky-to-horizon transform

use chrono::FixedOffset;
use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::celestial::{sun_radec, topocentric_altitude};
use crate::utils::config::DEFAULT_SITE;
use crate::utils::time_utils::local_offset;

/// A fixed ground observing location
///
/// Passed explicitly into every engine entry point; nothing in the crate
/// holds a process-wide site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    pub name: String,
    /// Geodetic longitude in degrees, east positive
    pub longitude_deg: f64,
    /// Geodetic latitude in degrees
    pub latitude_deg: f64,
    /// Height above the ellipsoid in metres
    pub elevation_m: f64,
    /// Offset of local civil time from UTC, used only for display
    pub utc_offset_minutes: i32,
}

impl Default for Site {
    fn default() -> Self {
        DEFAULT_SITE.clone()
    }
}

impl Site {
    pub fn new(
        name: impl Into<String>,
        longitude_deg: f64,
        latitude_deg: f64,
        elevation_m: f64,
        utc_offset_minutes: i32,
    ) -> Self {
        Site {
            name: name.into(),
            longitude_deg,
            latitude_deg,
            elevation_m,
            utc_offset_minutes,
        }
    }

    /// Altitude in degrees of a fixed sky point at `instant`
    pub fn altitude(&self, ra_deg: f64, dec_deg: f64, instant: &Epoch) -> Result<f64> {
        topocentric_altitude(
            ra_deg,
            dec_deg,
            self.longitude_deg,
            self.latitude_deg,
            self.elevation_m,
            instant,
        )
    }

    /// Altitude in degrees of the Sun's centre at `instant`
    pub fn sun_altitude(&self, instant: &Epoch) -> Result<f64> {
        let (ra, dec) = sun_radec(instant);
        self.altitude(ra, dec, instant)
    }

    /// Local civil time offset for rendering
    pub fn timezone(&self) -> Result<FixedOffset> {
        local_offset(self.utc_offset_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::epoch_from_jd;

    #[test]
    fn test_default_site_is_kavalur() {
        let site = Site::default();
        assert_eq!(site.name, "VBO Kavalur");
        assert_eq!(site.utc_offset_minutes, 330);
        assert_eq!(site.timezone().unwrap().local_minus_utc(), 19800);
    }

    #[test]
    fn test_sun_up_at_local_noon_down_at_midnight() {
        let site = Site::default();
        // 2026-02-16 06:30 UTC is 12:00 IST
        let noon = epoch_from_jd(2461087.770833);
        // 2026-02-16 18:30 UTC is 00:00 IST
        let midnight = epoch_from_jd(2461088.270833);
        assert!(site.sun_altitude(&noon).unwrap() > 50.0);
        assert!(site.sun_altitude(&midnight).unwrap() < -50.0);
    }

    #[test]
    fn test_site_deserialises_with_partial_fields() {
        let site: Site = serde_json::from_str(r#"{"name": "Somewhere", "latitude_deg": -30.0}"#)
            .unwrap();
        assert_eq!(site.latitude_deg, -30.0);
        assert_eq!(site.longitude_deg, 78.875);
    }
}
