//! Periodic eclipse ephemeris: rolling a reference epoch forward to the next transit

use hifitime::{Duration, Epoch};

use crate::error::{Result, TransitError};
use crate::utils::time_utils::{days, epoch_from_jd, epoch_to_jd, hours};

/// Reference epoch, period and duration of a periodic primary eclipse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseEphemeris {
    /// Mid-eclipse time of a known event
    pub epoch: Epoch,
    /// Orbital period, must be positive
    pub period: Duration,
    /// Full ingress-to-egress duration; expected to be much shorter than the period
    pub duration: Duration,
}

/// One occurrence of the eclipse, derived on demand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitEvent {
    pub ingress: Epoch,
    pub mid: Epoch,
    pub egress: Epoch,
}

impl TransitEvent {
    /// The three sample instants used for observability, in time order
    pub fn sample_instants(&self) -> [Epoch; 3] {
        [self.ingress, self.mid, self.egress]
    }
}

impl EclipseEphemeris {
    /// Build an ephemeris, rejecting a non-positive period
    pub fn new(epoch: Epoch, period: Duration, duration: Duration) -> Result<Self> {
        let eph = EclipseEphemeris {
            epoch,
            period,
            duration,
        };
        eph.validate()?;
        Ok(eph)
    }

    /// Catalog units: epoch as a UTC Julian Date, period in days, duration in hours
    pub fn from_catalog_units(epoch_jd: f64, period_days: f64, duration_hours: f64) -> Result<Self> {
        if !epoch_jd.is_finite() || !period_days.is_finite() || !duration_hours.is_finite() {
            return Err(TransitError::InvalidEphemeris(format!(
                "non-finite value (epoch={epoch_jd}, period={period_days}, duration={duration_hours})"
            )));
        }
        Self::new(epoch_from_jd(epoch_jd), days(period_days), hours(duration_hours))
    }

    fn validate(&self) -> Result<()> {
        if self.period <= Duration::ZERO {
            return Err(TransitError::InvalidEphemeris(format!(
                "period must be positive, got {}",
                self.period
            )));
        }
        if self.duration < Duration::ZERO {
            return Err(TransitError::InvalidEphemeris(format!(
                "duration must not be negative, got {}",
                self.duration
            )));
        }
        Ok(())
    }

    /// Ingress/mid/egress for the mid-eclipse `epoch + n * period`
    pub fn event_at(&self, n: i64) -> TransitEvent {
        let mid = self.epoch + self.period * (n as f64);
        let half = self.duration * 0.5;
        TransitEvent {
            ingress: mid - half,
            mid,
            egress: mid + half,
        }
    }

    /// First transit whose mid time is at or after `reference`
    ///
    /// The cycle count never goes below zero, so a reference before the epoch
    /// yields the epoch itself.
    pub fn next_event(&self, reference: Epoch) -> Result<TransitEvent> {
        self.validate()?;

        let elapsed = (reference - self.epoch).to_seconds();
        let mut n = (elapsed / self.period.to_seconds()).ceil().max(0.0) as i64;

        // floating-point division can land one cycle off on exact multiples
        while n > 0 && self.epoch + self.period * ((n - 1) as f64) >= reference {
            n -= 1;
        }
        while self.epoch + self.period * (n as f64) < reference {
            n += 1;
        }

        Ok(self.event_at(n))
    }

    pub fn epoch_jd(&self) -> f64 {
        epoch_to_jd(&self.epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EclipseEphemeris {
        EclipseEphemeris::from_catalog_units(2459000.0, 3.5, 2.0).unwrap()
    }

    #[test]
    fn test_rollover_two_cycles() {
        let event = sample().next_event(epoch_from_jd(2459005.0)).unwrap();
        assert!((epoch_to_jd(&event.mid) - 2459007.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_before_epoch_returns_epoch() {
        let eph = sample();
        let event = eph.next_event(epoch_from_jd(2458000.0)).unwrap();
        assert_eq!(event.mid, eph.epoch);
    }

    #[test]
    fn test_reference_exactly_on_a_transit_is_included() {
        let eph = sample();
        let on_transit = eph.epoch + eph.period * 3.0;
        let event = eph.next_event(on_transit).unwrap();
        assert_eq!(event.mid, on_transit);

        let just_after = on_transit + Duration::EPSILON;
        let next = eph.next_event(just_after).unwrap();
        assert_eq!(next.mid, eph.epoch + eph.period * 4.0);
    }

    #[test]
    fn test_ingress_egress_offsets() {
        let event = sample().next_event(epoch_from_jd(2459006.9)).unwrap();
        assert!((epoch_to_jd(&event.ingress) - (2459007.0 - 1.0 / 24.0)).abs() < 1e-9);
        assert!((epoch_to_jd(&event.egress) - (2459007.0 + 1.0 / 24.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_collapses_to_mid() {
        let eph = EclipseEphemeris::from_catalog_units(2459000.0, 1.0, 0.0).unwrap();
        let event = eph.next_event(epoch_from_jd(2459000.2)).unwrap();
        assert_eq!(event.ingress, event.mid);
        assert_eq!(event.egress, event.mid);
    }

    #[test]
    fn test_invalid_period_rejected() {
        assert!(matches!(
            EclipseEphemeris::from_catalog_units(2459000.0, 0.0, 2.0),
            Err(TransitError::InvalidEphemeris(_))
        ));
        assert!(matches!(
            EclipseEphemeris::from_catalog_units(2459000.0, -1.5, 2.0),
            Err(TransitError::InvalidEphemeris(_))
        ));
        assert!(matches!(
            EclipseEphemeris::from_catalog_units(f64::NAN, 1.5, 2.0),
            Err(TransitError::InvalidEphemeris(_))
        ));
    }

    #[test]
    fn test_next_event_revalidates_hand_built_ephemeris() {
        let eph = EclipseEphemeris {
            epoch: epoch_from_jd(2459000.0),
            period: Duration::ZERO,
            duration: hours(1.0),
        };
        assert!(eph.next_event(epoch_from_jd(2459001.0)).is_err());
    }
}
