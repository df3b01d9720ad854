//! Test utilities & fixtures.
//! Builds a travel service wired to the in-memory world so tests can inspect
//! inventories, windows and movements.

use std::sync::Arc;

use travelnet::travel::{Planet, TravelCollaborators, TravelService, TravelSettings};
use travelnet::world::{
    MemoryInventory, MemoryObjectFactory, PostureShuttle, RecordingNotifier, RecordingSimulation,
    StaticPlanetCatalog,
};

pub struct Harness {
    pub service: TravelService,
    pub factory: Arc<MemoryObjectFactory>,
    pub inventory: Arc<MemoryInventory>,
    pub notifier: Arc<RecordingNotifier>,
    pub simulation: Arc<RecordingSimulation>,
}

pub fn tatooine() -> Planet {
    Planet::new(8, "tatooine")
}

pub fn naboo() -> Planet {
    Planet::new(5, "naboo")
}

#[allow(dead_code)]
pub fn harness() -> Harness {
    harness_with(TravelSettings::default())
}

/// Catalog with tatooine and naboo, no point loader.
pub fn harness_with(settings: TravelSettings) -> Harness {
    let factory = Arc::new(MemoryObjectFactory::starting_at(1000));
    let inventory = Arc::new(MemoryInventory::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let simulation = Arc::new(RecordingSimulation::new());
    let collab = TravelCollaborators {
        catalog: Arc::new(StaticPlanetCatalog::new(vec![tatooine(), naboo()])),
        factory: factory.clone(),
        inventory: inventory.clone(),
        notifier: notifier.clone(),
        simulation: simulation.clone(),
        loader: None,
    };
    Harness {
        service: TravelService::new(collab, settings),
        factory,
        inventory,
        notifier,
        simulation,
    }
}

pub struct Shuttles {
    pub bestine: Arc<PostureShuttle>,
    pub mos_eisley: Arc<PostureShuttle>,
    pub theed: Arc<PostureShuttle>,
}

/// Bestine (100,0,50) and Mos Eisley on tatooine, Theed Spaceport on naboo, each with a shuttle.
#[allow(dead_code)]
pub fn seed_galaxy(h: &Harness) -> Shuttles {
    let reg = h.service.registry();
    reg.add_travel_point(&tatooine(), "Bestine", 100.0, 0.0, 50.0);
    reg.add_travel_point(&tatooine(), "Mos Eisley", 3528.0, 5.0, -4804.0);
    reg.add_travel_point(&naboo(), "Theed Spaceport", -4858.0, 6.0, 4164.0);

    let shuttles = Shuttles {
        bestine: Arc::new(PostureShuttle::new(1)),
        mos_eisley: Arc::new(PostureShuttle::new(2)),
        theed: Arc::new(PostureShuttle::new(3)),
    };
    reg.bind_shuttle(&tatooine(), "Bestine", shuttles.bestine.clone())
        .unwrap();
    reg.bind_shuttle(&tatooine(), "Mos Eisley", shuttles.mos_eisley.clone())
        .unwrap();
    reg.bind_shuttle(&naboo(), "Theed Spaceport", shuttles.theed.clone())
        .unwrap();
    shuttles
}
