//! Minimal hifitime utilities for chrono interop
//!
//! Provides only the conversions needed between chrono DateTime<Utc> and hifitime Epoch.

use chrono::{DateTime, Utc};
use hifitime::{Duration, Epoch};

/// Convert chrono `DateTime<Utc>` to hifitime `Epoch`
#[inline]
pub fn chrono_to_epoch(dt: &DateTime<Utc>) -> Epoch {
    let nanos = (dt.timestamp() as i128) * 1_000_000_000 + (dt.timestamp_subsec_nanos() as i128);
    Epoch::from_unix_duration(Duration::from_total_nanoseconds(nanos))
}

/// Convert hifitime `Epoch` back to chrono `DateTime<Utc>` (millisecond resolution)
#[inline]
pub fn epoch_to_chrono(epoch: &Epoch) -> Option<DateTime<Utc>> {
    let millis = (epoch.to_unix_seconds() * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
}

/// Two-part UTC Julian Date for SOFA (JD1=2400000.5, JD2=MJD)
#[inline]
pub fn epoch_to_jd_utc(epoch: &Epoch) -> (f64, f64) {
    const JD1: f64 = 2400000.5;
    (JD1, epoch.to_mjd_utc_days())
}
