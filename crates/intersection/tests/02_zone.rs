use intersection::{IntersectionZone, ZoneAverages};

#[test]
fn accident_latches_until_reset() {
    let mut zone = IntersectionZone::new();
    assert!(!zone.accident_occurred());
    zone.report_accident();
    zone.register_crossing(1.0, 1.0);
    assert!(zone.accident_occurred());
    zone.reset();
    assert!(!zone.accident_occurred());
    assert_eq!(zone.total_vehicles_passed(), 0);
}

#[test]
fn averages_without_crossings_are_zero() {
    let mut zone = IntersectionZone::new();
    assert_eq!(zone.averages(), None);
    assert_eq!(zone.compute_averages(), ZoneAverages::default());
}

#[test]
fn averages_are_finalised_on_demand() {
    let mut zone = IntersectionZone::new();
    zone.register_crossing(1.0, 4.0);
    zone.register_crossing(3.0, 2.0);
    assert_eq!(zone.total_vehicles_passed(), 2);
    assert_eq!(zone.averages(), None);

    let averages = zone.compute_averages();
    assert_eq!(averages.crossing_time, 2.0);
    assert_eq!(averages.wait_time, 3.0);
    assert_eq!(zone.averages(), Some(averages));

    zone.register_crossing(2.0, 3.0);
    assert_eq!(zone.averages(), None, "stale after a new crossing");
}
