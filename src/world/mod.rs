//! In-process stand-ins for the world systems the travel network consumes.
//!
//! The binary runs the travel service against these in standalone mode, and the
//! integration tests use them to observe what the service asked the world to do.

pub mod objects;
pub mod recording;

pub use objects::{MemoryInventory, MemoryObjectFactory, PostureShuttle};
pub use recording::{Movement, Notification, RecordingNotifier, RecordingSimulation};

use std::sync::{PoisonError, RwLock};

use crate::travel::{ObjectId, Planet, PlanetCatalog, Point3D, TravelError, Traveler};

/// Fixed planet list, looked up case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticPlanetCatalog {
    planets: Vec<Planet>,
}

impl StaticPlanetCatalog {
    pub fn new(planets: Vec<Planet>) -> Self {
        Self { planets }
    }
}

impl PlanetCatalog for StaticPlanetCatalog {
    fn list_planets(&self) -> Vec<Planet> {
        self.planets.clone()
    }

    fn planet_by_name(&self, name: &str) -> Result<Planet, TravelError> {
        let wanted = name.to_lowercase();
        self.planets
            .iter()
            .find(|p| p.name == wanted)
            .cloned()
            .ok_or_else(|| TravelError::PlanetUnknown(name.to_string()))
    }
}

/// A creature whose planet and position can be changed from any thread.
#[derive(Debug)]
pub struct Creature {
    id: ObjectId,
    planet: RwLock<Planet>,
    position: RwLock<Point3D>,
}

impl Creature {
    pub fn new(id: ObjectId, planet: Planet, position: Point3D) -> Self {
        Self {
            id,
            planet: RwLock::new(planet),
            position: RwLock::new(position),
        }
    }

    pub fn set_position(&self, position: Point3D) {
        *self.position.write().unwrap_or_else(PoisonError::into_inner) = position;
    }

    pub fn set_planet(&self, planet: Planet) {
        *self.planet.write().unwrap_or_else(PoisonError::into_inner) = planet;
    }
}

impl Traveler for Creature {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn planet(&self) -> Planet {
        self.planet
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn world_position(&self) -> Point3D {
        *self.position.read().unwrap_or_else(PoisonError::into_inner)
    }
}
