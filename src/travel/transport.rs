use log::info;
use std::sync::Arc;

use super::errors::TravelError;
use super::interfaces::{PlanetCatalog, Traveler, WorldSimulation};
use super::types::TravelPoint;
use crate::logutil::escape_log;

/// How an actor was moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    /// Same planet: position/orientation set in place.
    Teleport,
    /// Different planet: zone transfer to the named planet.
    PlanetTransfer { planet: String },
}

/// Moves actors to a destination travel point's spawn pose.
pub struct TransportExecutor {
    catalog: Arc<dyn PlanetCatalog>,
    simulation: Arc<dyn WorldSimulation>,
}

impl TransportExecutor {
    pub fn new(catalog: Arc<dyn PlanetCatalog>, simulation: Arc<dyn WorldSimulation>) -> Self {
        Self {
            catalog,
            simulation,
        }
    }

    /// Teleport within the planet, or transfer when the destination lies elsewhere.
    ///
    /// Fails only when the destination planet is missing from the catalog.
    pub fn transport(
        &self,
        actor: &dyn Traveler,
        destination: &TravelPoint,
    ) -> Result<TransportMode, TravelError> {
        let spawn = destination.spawn_location();
        let current = actor.planet();

        if destination.planet_name().to_lowercase() == current.name {
            self.simulation
                .teleport(actor.object_id(), spawn.position, spawn.orientation, 0.0);
            info!(
                "Teleported {} to {} on {}",
                actor.object_id(),
                escape_log(destination.name()),
                current.name
            );
            return Ok(TransportMode::Teleport);
        }

        let planet = self.catalog.planet_by_name(destination.planet_name())?;
        self.simulation.transfer_to_planet(
            actor.object_id(),
            &planet,
            spawn.position,
            spawn.orientation,
            actor.object_id(),
        );
        info!(
            "Transferring {} from {} to {} on {}",
            actor.object_id(),
            current.name,
            escape_log(destination.name()),
            planet.name
        );
        Ok(TransportMode::PlanetTransfer {
            planet: planet.name,
        })
    }
}
