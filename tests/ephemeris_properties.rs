/// Property tests for rolling a periodic eclipse ephemeris forward
use hifitime::{Duration, Unit};
use proptest::prelude::*;
use transit_ephem::utils::time_utils::{epoch_from_jd, epoch_to_jd};
use transit_ephem::EclipseEphemeris;

proptest! {
    #[test]
    fn prop_next_event_is_first_at_or_after_reference(
        epoch_jd in 2_450_000.0..2_470_000.0f64,
        period_days in 0.2..50.0f64,
        offset_days in 0.0..2_000.0f64,
    ) {
        let eph = EclipseEphemeris::from_catalog_units(epoch_jd, period_days, 2.0).unwrap();
        let reference = epoch_from_jd(epoch_jd + offset_days);
        let event = eph.next_event(reference).unwrap();

        prop_assert!(event.mid >= reference);
        // allow for nanosecond rounding in period multiples
        prop_assert!(event.mid - reference < eph.period + Unit::Microsecond * 1);
    }

    #[test]
    fn prop_reference_before_epoch_gives_epoch(
        epoch_jd in 2_450_000.0..2_470_000.0f64,
        period_days in 0.2..50.0f64,
        before_days in 0.0..500.0f64,
    ) {
        let eph = EclipseEphemeris::from_catalog_units(epoch_jd, period_days, 1.0).unwrap();
        let event = eph.next_event(epoch_from_jd(epoch_jd - before_days)).unwrap();
        prop_assert_eq!(event.mid, eph.epoch);
    }

    #[test]
    fn prop_ingress_and_egress_are_symmetric(
        epoch_jd in 2_450_000.0..2_470_000.0f64,
        period_days in 0.5..30.0f64,
        duration_hours in 0.0..10.0f64,
        offset_days in -50.0..500.0f64,
    ) {
        let eph = EclipseEphemeris::from_catalog_units(epoch_jd, period_days, duration_hours).unwrap();
        let event = eph.next_event(epoch_from_jd(epoch_jd + offset_days)).unwrap();

        let half = eph.duration * 0.5;
        prop_assert_eq!(event.egress - event.mid, half);
        prop_assert_eq!(event.mid - event.ingress, half);
        prop_assert!((half * 2.0 - eph.duration).abs() <= Duration::from_total_nanoseconds(1));
    }

    #[test]
    fn prop_exact_cycle_reference_is_included(
        epoch_jd in 2_450_000.0..2_470_000.0f64,
        period_days in 0.5..30.0f64,
        cycles in 0i64..200,
    ) {
        let eph = EclipseEphemeris::from_catalog_units(epoch_jd, period_days, 1.0).unwrap();
        let target = eph.event_at(cycles);
        let event = eph.next_event(target.mid).unwrap();
        prop_assert_eq!(event.mid, target.mid);
    }
}

#[test]
fn test_documented_rollover_scenario() {
    let eph = EclipseEphemeris::from_catalog_units(2459000.0, 3.5, 2.0).unwrap();
    let event = eph.next_event(epoch_from_jd(2459005.0)).unwrap();
    assert!((epoch_to_jd(&event.mid) - 2459007.0).abs() < 1e-9);
    assert!((epoch_to_jd(&event.ingress) - 2459006.958_333_333).abs() < 1e-6);
    assert!((epoch_to_jd(&event.egress) - 2459007.041_666_667).abs() < 1e-6);
}
