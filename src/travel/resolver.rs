//! "Which travel point is this actor standing at?"

use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::errors::TravelError;
use super::interfaces::Traveler;
use super::registry::TravelPointRegistry;
use super::types::{Planet, Point3D, TravelPoint};

/// How to choose between several points whose capture radius contains the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NearestPolicy {
    /// Last qualifying point in registry order.
    #[default]
    LastMatch,
    /// Qualifying point with the smallest planar distance; ties go to the earlier point.
    Closest,
}

pub struct NearestPointResolver {
    registry: Arc<TravelPointRegistry>,
    policy: NearestPolicy,
}

impl NearestPointResolver {
    pub fn new(registry: Arc<TravelPointRegistry>, policy: NearestPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn policy(&self) -> NearestPolicy {
        self.policy
    }

    /// Travel point capturing the actor's current position.
    pub fn nearest_point(&self, actor: &dyn Traveler) -> Result<Arc<TravelPoint>, TravelError> {
        self.nearest_point_at(&actor.planet(), &actor.world_position())
    }

    pub fn nearest_point_at(
        &self,
        planet: &Planet,
        position: &Point3D,
    ) -> Result<Arc<TravelPoint>, TravelError> {
        let points = self.registry.points_for_planet(planet)?;
        let candidates = points.iter().filter(|p| p.captures(position));

        let found = match self.policy {
            NearestPolicy::LastMatch => candidates.last(),
            NearestPolicy::Closest => candidates.min_by(|a, b| {
                let da = a.location().distance_2d(position);
                let db = b.location().distance_2d(position);
                da.total_cmp(&db)
            }),
        };

        found.cloned().ok_or_else(|| {
            debug!(
                "No travel point within range of ({:.1}, {:.1}) on {}",
                position.x, position.z, planet.name
            );
            TravelError::NotFound(format!("no travel point near actor on {}", planet.name))
        })
    }
}
