mod common;

use std::sync::Arc;

use common::{harness, naboo, seed_galaxy, tatooine};
use travelnet::travel::{
    Planet, Point3D, Quaternion, SpawnLocation, TransportExecutor, TransportMode,
    TravelError, TravelPointRegistry,
};
use travelnet::world::{Creature, Movement, RecordingSimulation, StaticPlanetCatalog};

#[test]
fn same_planet_uses_spawn_pose_and_no_fall() {
    let h = harness();
    seed_galaxy(&h);
    let spawn = SpawnLocation {
        position: Point3D::new(3530.0, 5.0, -4800.0),
        orientation: Quaternion {
            x: 0.0,
            y: 0.7071,
            z: 0.0,
            w: 0.7071,
        },
    };
    h.service
        .registry()
        .set_spawn_location(&tatooine(), "Mos Eisley", spawn)
        .unwrap();
    let dest = h
        .service
        .registry()
        .point_by_name(&tatooine(), "Mos Eisley")
        .unwrap();

    let actor = Creature::new(9, tatooine(), Point3D::default());
    assert_eq!(h.service.transport(&actor, &dest).unwrap(), TransportMode::Teleport);
    assert_eq!(
        h.simulation.moves(),
        vec![Movement::Teleport {
            actor: 9,
            position: spawn.position,
            orientation: spawn.orientation,
            fall_height: 0.0,
        }]
    );
}

#[test]
fn different_planet_transfers_to_catalog_planet() {
    let h = harness();
    seed_galaxy(&h);
    let dest = h
        .service
        .registry()
        .point_by_name(&naboo(), "Theed Spaceport")
        .unwrap();
    let actor = Creature::new(9, tatooine(), Point3D::default());
    assert_eq!(
        h.service.transport(&actor, &dest).unwrap(),
        TransportMode::PlanetTransfer {
            planet: "naboo".to_string()
        }
    );
    assert!(matches!(
        h.simulation.moves()[0],
        Movement::Transfer { actor: 9, origin: 9, .. }
    ));
}

#[test]
fn destination_missing_from_catalog_is_reported() {
    let registry = TravelPointRegistry::new();
    let kashyyyk = Planet::new(12, "kashyyyk");
    let dest = registry.add_travel_point(&kashyyyk, "Kachirho", 0.0, 0.0, 0.0);

    let simulation = Arc::new(RecordingSimulation::new());
    let executor = TransportExecutor::new(
        Arc::new(StaticPlanetCatalog::new(vec![tatooine()])),
        simulation.clone(),
    );
    let actor = Creature::new(9, tatooine(), Point3D::default());
    assert_eq!(
        executor.transport(&actor, &dest),
        Err(TravelError::PlanetUnknown("Kashyyyk".to_string()))
    );
    assert!(simulation.moves().is_empty());
}

#[test]
fn non_ascii_planet_names_compare_case_insensitively() {
    let ord_mantell = Planet::new(21, "ørd mantell");
    let registry = TravelPointRegistry::new();
    let dest = registry.add_travel_point(&ord_mantell, "Worlport", 10.0, 0.0, 10.0);
    assert_eq!(dest.planet_name(), "Ørd Mantell");

    let simulation = Arc::new(RecordingSimulation::new());
    let executor = TransportExecutor::new(
        Arc::new(StaticPlanetCatalog::new(vec![tatooine(), ord_mantell.clone()])),
        simulation.clone(),
    );
    let local = Creature::new(9, ord_mantell.clone(), Point3D::default());
    assert_eq!(executor.transport(&local, &dest), Ok(TransportMode::Teleport));

    let visitor = Creature::new(10, tatooine(), Point3D::default());
    assert_eq!(
        executor.transport(&visitor, &dest),
        Ok(TransportMode::PlanetTransfer {
            planet: "ørd mantell".to_string()
        })
    );
    assert_eq!(simulation.moves().len(), 2);
}
