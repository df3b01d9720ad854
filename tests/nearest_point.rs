mod common;

use common::{harness, harness_with, naboo, tatooine};
use travelnet::travel::{NearestPolicy, Planet, Point3D, TravelError, TravelSettings};
use travelnet::world::Creature;

#[test]
fn point_within_radius_is_found() {
    let h = harness();
    h.service
        .registry()
        .add_travel_point(&tatooine(), "Bestine", 100.0, 0.0, 50.0);

    let actor = Creature::new(1, tatooine(), Point3D::new(120.0, 0.0, 60.0));
    let point = h.service.nearest_point(&actor).unwrap();
    assert_eq!(point.name(), "Bestine");
}

#[test]
fn capture_radius_boundary() {
    let h = harness();
    h.service
        .registry()
        .add_travel_point(&tatooine(), "Bestine", 0.0, 0.0, 0.0);

    let at_70 = Creature::new(1, tatooine(), Point3D::new(70.0, 0.0, 0.0));
    assert!(h.service.nearest_point(&at_70).is_ok());

    let at_71 = Creature::new(1, tatooine(), Point3D::new(0.0, 0.0, 71.0));
    assert!(matches!(
        h.service.nearest_point(&at_71),
        Err(TravelError::NotFound(_))
    ));
}

#[test]
fn height_is_ignored() {
    let h = harness();
    h.service
        .registry()
        .add_travel_point(&tatooine(), "Bestine", 0.0, 0.0, 0.0);
    let above = Creature::new(1, tatooine(), Point3D::new(10.0, 500.0, 10.0));
    assert!(h.service.nearest_point(&above).is_ok());
}

#[test]
fn other_planets_points_do_not_count() {
    let h = harness();
    h.service
        .registry()
        .add_travel_point(&naboo(), "Theed Spaceport", 0.0, 0.0, 0.0);
    h.service.registry().add_planet(&tatooine()).unwrap();

    let actor = Creature::new(1, tatooine(), Point3D::new(0.0, 0.0, 0.0));
    assert!(h.service.nearest_point(&actor).is_err());

    let unregistered = Creature::new(1, Planet::new(99, "kashyyyk"), Point3D::default());
    assert!(h.service.nearest_point(&unregistered).unwrap_err().is_not_found());
}

#[test]
fn overlapping_points_follow_policy() {
    let last = harness();
    let closest = harness_with(TravelSettings {
        nearest_policy: NearestPolicy::Closest,
        ..TravelSettings::default()
    });
    for h in [&last, &closest] {
        let reg = h.service.registry();
        reg.add_travel_point(&tatooine(), "Starport", 0.0, 0.0, 0.0);
        reg.add_travel_point(&tatooine(), "Shuttleport", 50.0, 0.0, 0.0);
    }
    let actor = Creature::new(1, tatooine(), Point3D::new(5.0, 0.0, 0.0));

    assert_eq!(last.service.nearest_point(&actor).unwrap().name(), "Shuttleport");
    assert_eq!(closest.service.nearest_point(&actor).unwrap().name(), "Starport");
}

#[test]
fn custom_capture_radius_applies_to_new_points() {
    let h = harness_with(TravelSettings {
        capture_radius: 10.0,
        ..TravelSettings::default()
    });
    h.service
        .registry()
        .add_travel_point(&tatooine(), "Bestine", 0.0, 0.0, 0.0);
    let actor = Creature::new(1, tatooine(), Point3D::new(20.0, 0.0, 0.0));
    assert!(h.service.nearest_point(&actor).is_err());
}
