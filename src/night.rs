//! Observing night windows
//!
//! A window is either given as two UT clock times on the observing date
//! (the batch report policy) or derived from the next sunset and the sunrise
//! that follows it (the single-target chart policy). The two are separate
//! constructors; [`WindowPolicy`] picks one from configuration.

use chrono::NaiveDate;
use hifitime::{Epoch, Unit};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ephemeris::TransitEvent;
use crate::error::{Result, TransitError};
use crate::site::Site;
use crate::utils::config::{
    DEFAULT_WINDOW_END, DEFAULT_WINDOW_START, SUN_SEARCH_SPAN_HOURS, SUN_SEARCH_STEP_MINUTES,
    SUN_SEARCH_TOLERANCE_SECONDS,
};
use crate::utils::time_utils::{parse_clock, utc_instant};

/// Direction of a Sun horizon crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunEvent {
    Set,
    Rise,
}

impl SunEvent {
    fn label(self) -> &'static str {
        match self {
            SunEvent::Set => "set",
            SunEvent::Rise => "rise",
        }
    }

    fn crosses(self, before: f64, after: f64) -> bool {
        match self {
            SunEvent::Set => before >= 0.0 && after < 0.0,
            SunEvent::Rise => before < 0.0 && after >= 0.0,
        }
    }
}

/// Absolute interval during which observation takes place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightWindow {
    pub start: Epoch,
    pub end: Epoch,
}

impl NightWindow {
    /// Window from explicit instants; `start` must precede `end`
    pub fn new(start: Epoch, end: Epoch) -> Result<Self> {
        if start >= end {
            return Err(TransitError::InvalidWindow(format!(
                "start {start} is not before end {end}"
            )));
        }
        Ok(NightWindow { start, end })
    }

    /// Window between two UT clock times on `date`
    ///
    /// An end clock at or before the start clock is taken on the following day.
    pub fn fixed_clock(date: NaiveDate, start_clock: &str, end_clock: &str) -> Result<Self> {
        let start = utc_instant(date, parse_clock(start_clock)?);
        let mut end = utc_instant(date, parse_clock(end_clock)?);
        if end <= start {
            end += Unit::Day * 1;
        }
        Self::new(start, end)
    }

    /// Next sunset after `reference` up to the sunrise that follows it
    ///
    /// `horizon_deg` is the Sun-centre altitude that counts as set/risen.
    pub fn astronomical(site: &Site, reference: Epoch, horizon_deg: f64) -> Result<Self> {
        let sunset = next_sun_crossing(site, reference, horizon_deg, SunEvent::Set)?;
        let sunrise = next_sun_crossing(site, sunset, horizon_deg, SunEvent::Rise)?;
        debug!(%sunset, %sunrise, site = %site.name, "astronomical night window");
        Self::new(sunset, sunrise)
    }

    /// True iff the whole ingress..egress interval lies inside the window
    pub fn contains(&self, event: &TransitEvent) -> bool {
        event.ingress >= self.start && event.egress <= self.end
    }
}

/// First Sun crossing of `horizon_deg` in the given direction after `reference`
///
/// Brackets the crossing on a coarse grid, then bisects to one second.
pub fn next_sun_crossing(
    site: &Site,
    reference: Epoch,
    horizon_deg: f64,
    event: SunEvent,
) -> Result<Epoch> {
    let height = |t: &Epoch| -> Result<f64> { Ok(site.sun_altitude(t)? - horizon_deg) };

    let step = Unit::Minute * SUN_SEARCH_STEP_MINUTES;
    let limit = reference + Unit::Hour * SUN_SEARCH_SPAN_HOURS;

    let mut lo = reference;
    let mut f_lo = height(&lo)?;
    while lo < limit {
        let hi = lo + step;
        let f_hi = height(&hi)?;
        if event.crosses(f_lo, f_hi) {
            return bisect_crossing(lo, hi, event, &height);
        }
        lo = hi;
        f_lo = f_hi;
    }

    Err(TransitError::NoSunCrossing {
        event: event.label(),
        search_hours: SUN_SEARCH_SPAN_HOURS,
    })
}

fn bisect_crossing<F>(mut lo: Epoch, mut hi: Epoch, event: SunEvent, height: &F) -> Result<Epoch>
where
    F: Fn(&Epoch) -> Result<f64>,
{
    let tolerance = Unit::Second * SUN_SEARCH_TOLERANCE_SECONDS;
    let f_lo_initial = height(&lo)?;
    while hi - lo > tolerance {
        let mid = lo + (hi - lo) * 0.5;
        let f_mid = height(&mid)?;
        if event.crosses(f_lo_initial, f_mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Ok(hi)
}

/// How the batch pipeline builds its night window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Literal UT clock times on the observing date
    FixedClock { start: String, end: String },
    /// Sunset/sunrise after a UT clock time on the observing date
    Astronomical { reference: String, horizon_deg: f64 },
}

impl Default for WindowPolicy {
    fn default() -> Self {
        WindowPolicy::FixedClock {
            start: DEFAULT_WINDOW_START.to_string(),
            end: DEFAULT_WINDOW_END.to_string(),
        }
    }
}

impl WindowPolicy {
    pub fn build(&self, site: &Site, date: NaiveDate) -> Result<NightWindow> {
        match self {
            WindowPolicy::FixedClock { start, end } => NightWindow::fixed_clock(date, start, end),
            WindowPolicy::Astronomical {
                reference,
                horizon_deg,
            } => {
                let reference = utc_instant(date, parse_clock(reference)?);
                NightWindow::astronomical(site, reference, *horizon_deg)
            }
        }
    }
}
