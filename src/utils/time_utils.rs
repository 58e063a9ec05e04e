//! Time utilities: Julian Dates, observing-date clock times and local rendering

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use hifitime::{Duration, Epoch, Unit};

use crate::error::{Result, TransitError};
use crate::utils::config::JD_MJD_OFFSET;
use crate::utils::hifi_time::{chrono_to_epoch, epoch_to_chrono};

/// Build an absolute instant from a UTC Julian Date
#[inline]
pub fn epoch_from_jd(jd: f64) -> Epoch {
    Epoch::from_mjd_utc(jd - JD_MJD_OFFSET)
}

/// UTC Julian Date of an instant
#[inline]
pub fn epoch_to_jd(epoch: &Epoch) -> f64 {
    epoch.to_mjd_utc_days() + JD_MJD_OFFSET
}

/// A length of time given in days
#[inline]
pub fn days(value: f64) -> Duration {
    Unit::Day * value
}

/// A length of time given in hours
#[inline]
pub fn hours(value: f64) -> Duration {
    Unit::Hour * value
}

/// Parse an observing date in `YYYY-MM-DD` form
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| TransitError::InvalidDate(format!("'{date}': {e}")))
}

/// Parse a clock time in `HH:MM` or `HH:MM:SS` form
pub fn parse_clock(clock: &str) -> Result<NaiveTime> {
    let clock = clock.trim();
    NaiveTime::parse_from_str(clock, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M"))
        .map_err(|e| TransitError::InvalidDate(format!("'{clock}': {e}")))
}

/// The instant at a UT clock time on a calendar date
pub fn utc_instant(date: NaiveDate, clock: NaiveTime) -> Epoch {
    let dt = DateTime::<Utc>::from_naive_utc_and_offset(NaiveDateTime::new(date, clock), Utc);
    chrono_to_epoch(&dt)
}

/// Fixed offset for a site's local time
pub fn local_offset(utc_offset_minutes: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
        TransitError::Config(format!("UTC offset out of range: {utc_offset_minutes} min"))
    })
}

/// Render an instant as local clock time with a chrono format string
pub fn format_local(epoch: &Epoch, offset: &FixedOffset, fmt: &str) -> String {
    match epoch_to_chrono(epoch) {
        Some(dt) => dt.with_timezone(offset).format(fmt).to_string(),
        None => format!("{epoch}"),
    }
}

/// Evenly spaced instants from `start` to `end` inclusive
pub fn linspace(start: Epoch, end: Epoch, samples: usize) -> Vec<Epoch> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let span = end - start;
            (0..n)
                .map(|i| start + span * (i as f64 / (n - 1) as f64))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jd_round_trip() {
        let e = epoch_from_jd(2459000.0);
        assert!((epoch_to_jd(&e) - 2459000.0).abs() < 1e-9);
        assert!((e.to_mjd_utc_days() - 58999.5).abs() < 1e-12);
    }

    #[test]
    fn test_utc_instant_matches_jd() {
        // 2020-05-31 12:00 UTC is JD 2459001.0
        let date = parse_date("2020-05-31").unwrap();
        let noon = parse_clock("12:00").unwrap();
        let e = utc_instant(date, noon);
        assert!((epoch_to_jd(&e) - 2459001.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_clock_accepts_seconds() {
        assert_eq!(
            parse_clock("23:30:15").unwrap(),
            NaiveTime::from_hms_opt(23, 30, 15).unwrap()
        );
        assert!(parse_clock("25:00").is_err());
    }

    #[test]
    fn test_format_local_ist() {
        // 13:15 UTC is 06:45 pm IST
        let date = parse_date("2026-02-16").unwrap();
        let e = utc_instant(date, parse_clock("13:15").unwrap());
        let ist = local_offset(330).unwrap();
        assert_eq!(format_local(&e, &ist, "%I:%M %P"), "06:45 pm");
    }

    #[test]
    fn test_linspace_endpoints() {
        let a = epoch_from_jd(2459000.0);
        let b = epoch_from_jd(2459000.5);
        let grid = linspace(a, b, 5);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], a);
        assert!((grid[4] - b).abs() < Unit::Microsecond * 1.0);
        assert!(linspace(a, b, 0).is_empty());
    }
}
