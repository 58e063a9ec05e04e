//! Celestial coordinate calculations
//!
//! Topocentric altitude of a fixed ICRS direction, and a low-precision Sun
//! position good to ~0.01° which is ample for twilight tests.

use hifitime::Epoch;
use sofars::astro::atco13;

use crate::error::{Result, TransitError};
use crate::utils::config::{J2000_JD, OBSERVING_WAVELENGTH_UM};
use crate::utils::hifi_time::epoch_to_jd_utc;
use crate::utils::time_utils::epoch_to_jd;

/// Geocentric apparent right ascension and declination of the Sun (degrees)
///
/// Uses the Astronomical Almanac low-precision series for the solar longitude.
pub fn sun_radec(epoch: &Epoch) -> (f64, f64) {
    let n = epoch_to_jd(epoch) - J2000_JD;

    let mean_lon = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();
    let ecl_lon = (mean_lon
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

    let ra = (obliquity.cos() * ecl_lon.sin())
        .atan2(ecl_lon.cos())
        .to_degrees()
        .rem_euclid(360.0);
    let dec = (obliquity.sin() * ecl_lon.sin()).asin().to_degrees();
    (ra, dec)
}

/// Observed altitude (degrees) of an ICRS direction from a geodetic location
///
/// # Arguments
/// * `ra_deg`, `dec_deg` - ICRS right ascension and declination
/// * `lon_deg`, `lat_deg`, `height_m` - observer geodetic position (east-positive longitude)
/// * `epoch` - instant of observation
///
/// Refraction is disabled (zero pressure) and UT1 is taken equal to UTC.
pub fn topocentric_altitude(
    ra_deg: f64,
    dec_deg: f64,
    lon_deg: f64,
    lat_deg: f64,
    height_m: f64,
    epoch: &Epoch,
) -> Result<f64> {
    let (utc1, utc2) = epoch_to_jd_utc(epoch);

    let (_aob, zob, _hob, _dob, _rob, _eo) = atco13(
        ra_deg.to_radians(),
        dec_deg.to_radians(),
        0.0,
        0.0,
        0.0,
        0.0,
        utc1,
        utc2,
        0.0,
        lon_deg.to_radians(),
        lat_deg.to_radians(),
        height_m,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        OBSERVING_WAVELENGTH_UM,
    )
    .map_err(|e| TransitError::Sofa(format!("{e:?}")))?;

    Ok((std::f64::consts::FRAC_PI_2 - zob).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::epoch_from_jd;

    #[test]
    fn test_sun_near_equinox() {
        // 2020-03-20 03:50 UTC, March equinox
        let (ra, dec) = sun_radec(&epoch_from_jd(2458928.66));
        assert!(dec.abs() < 0.1, "dec = {dec}");
        assert!(ra < 0.2 || ra > 359.8, "ra = {ra}");
    }

    #[test]
    fn test_sun_near_june_solstice() {
        // 2020-06-20 21:44 UTC
        let (ra, dec) = sun_radec(&epoch_from_jd(2459021.405));
        assert!((dec - 23.44).abs() < 0.05, "dec = {dec}");
        assert!((ra - 90.0).abs() < 0.2, "ra = {ra}");
    }

    #[test]
    fn test_pole_star_altitude_tracks_latitude() {
        // The celestial pole sits at an altitude equal to the site latitude
        let epoch = epoch_from_jd(2459000.5);
        let alt = topocentric_altitude(0.0, 90.0, 10.0, 45.0, 0.0, &epoch).unwrap();
        assert!((alt - 45.0).abs() < 0.5, "alt = {alt}");
    }

    #[test]
    fn test_altitude_is_pure() {
        let epoch = epoch_from_jd(2459007.0);
        let a = topocentric_altitude(224.4, -31.27, 149.07, -31.27, 1165.0, &epoch).unwrap();
        let b = topocentric_altitude(224.4, -31.27, 149.07, -31.27, 1165.0, &epoch).unwrap();
        assert_eq!(a, b);
        assert!(a > 60.0, "alt = {a}");
    }
}
