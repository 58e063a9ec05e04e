//! Constants and built-in defaults

use once_cell::sync::Lazy;

use crate::site::Site;

/// Offset between Julian Date and Modified Julian Date
pub const JD_MJD_OFFSET: f64 = 2_400_000.5;

/// Julian Date of J2000.0
pub const J2000_JD: f64 = 2_451_545.0;

/// Sun altitude thresholds for the twilight kinds (degrees)
pub const CIVIL_TWILIGHT_DEG: f64 = -6.0;
pub const NAUTICAL_TWILIGHT_DEG: f64 = -12.0;
pub const ASTRONOMICAL_TWILIGHT_DEG: f64 = -18.0;

/// Telescope pointing limits on declination (degrees)
pub const DEFAULT_MIN_DEC_DEG: f64 = -65.0;
pub const DEFAULT_MAX_DEC_DEG: f64 = 65.0;

/// Faintest apparent magnitude kept by the pre-filter
pub const DEFAULT_MAX_VMAG: f64 = 15.0;

/// Minimum target altitude for the default constraint set (degrees)
pub const DEFAULT_MIN_ALTITUDE_DEG: f64 = 30.0;

/// Fixed-clock batch window, UT clock times on the observing date
pub const DEFAULT_WINDOW_START: &str = "12:30";
pub const DEFAULT_WINDOW_END: &str = "23:30";

/// Chart mode starts its sunset search at this UT clock time on the observing date
pub const DEFAULT_CHART_REFERENCE: &str = "10:30";

/// Number of samples in the altitude curve across the night
pub const DEFAULT_CURVE_SAMPLES: usize = 150;

/// Step used when bracketing sunset/sunrise (minutes)
pub const SUN_SEARCH_STEP_MINUTES: f64 = 10.0;

/// How far ahead sunset/sunrise are searched (hours)
pub const SUN_SEARCH_SPAN_HOURS: f64 = 48.0;

/// Bisection stops once the bracket is narrower than this (seconds)
pub const SUN_SEARCH_TOLERANCE_SECONDS: f64 = 1.0;

/// Observing wavelength handed to atco13 (micrometres)
pub const OBSERVING_WAVELENGTH_UM: f64 = 0.55;

/// Default observing site: Vainu Bappu Observatory, Kavalur (IST, UTC+05:30)
pub static DEFAULT_SITE: Lazy<Site> = Lazy::new(|| Site {
    name: "VBO Kavalur".to_string(),
    longitude_deg: 78.875,
    latitude_deg: 12.34,
    elevation_m: 700.0,
    utc_offset_minutes: 330,
});
