//! Travel service facade: wires registry, schedule, resolver, tickets and transport
//! together and answers the client's travel point list request.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::errors::TravelError;
use super::interfaces::{
    Inventory, Notifier, ObjectFactory, PlanetCatalog, TravelPointLoader, Traveler,
    WorldSimulation,
};
use super::registry::TravelPointRegistry;
use super::resolver::{NearestPointResolver, NearestPolicy};
use super::scheduler::{start_shuttle_schedule, ShuttleScheduleConfig, ShuttleScheduleHandle};
use super::ticket::{TicketService, TicketServiceConfig};
use super::transport::{TransportExecutor, TransportMode};
use super::types::{
    TravelPoint, TravelPointView, DEFAULT_CAPTURE_RADIUS, DEFAULT_SHUTTLE_INTERVAL_SECS,
};
use crate::logutil::escape_log;

/// Answer to "list travel points for planet X": that planet's points plus every
/// planet name, for the client's galaxy map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetTravelPointListResponse {
    pub planet: String,
    pub points: Vec<TravelPointView>,
    pub planets: Vec<String>,
}

/// The external systems the travel service talks to.
#[derive(Clone)]
pub struct TravelCollaborators {
    pub catalog: Arc<dyn PlanetCatalog>,
    pub factory: Arc<dyn ObjectFactory>,
    pub inventory: Arc<dyn Inventory>,
    pub notifier: Arc<dyn Notifier>,
    pub simulation: Arc<dyn WorldSimulation>,
    pub loader: Option<Arc<dyn TravelPointLoader>>,
}

#[derive(Debug, Clone)]
pub struct TravelSettings {
    pub capture_radius: f32,
    pub nearest_policy: NearestPolicy,
    pub shuttle_interval: Duration,
    pub tickets: TicketServiceConfig,
}

impl Default for TravelSettings {
    fn default() -> Self {
        Self {
            capture_radius: DEFAULT_CAPTURE_RADIUS,
            nearest_policy: NearestPolicy::default(),
            shuttle_interval: Duration::from_secs(DEFAULT_SHUTTLE_INTERVAL_SECS),
            tickets: TicketServiceConfig::default(),
        }
    }
}

pub struct TravelService {
    registry: Arc<TravelPointRegistry>,
    catalog: Arc<dyn PlanetCatalog>,
    resolver: Arc<NearestPointResolver>,
    transport: Arc<TransportExecutor>,
    tickets: TicketService,
    shuttle_interval: Duration,
    schedule: Option<ShuttleScheduleHandle>,
}

impl TravelService {
    pub fn new(collab: TravelCollaborators, settings: TravelSettings) -> Self {
        let mut registry = TravelPointRegistry::new().with_capture_radius(settings.capture_radius);
        if let Some(loader) = collab.loader.clone() {
            registry = registry.with_loader(loader);
        }
        let registry = Arc::new(registry);
        let resolver = Arc::new(NearestPointResolver::new(
            registry.clone(),
            settings.nearest_policy,
        ));
        let transport = Arc::new(TransportExecutor::new(
            collab.catalog.clone(),
            collab.simulation.clone(),
        ));
        let tickets = TicketService::new(
            registry.clone(),
            resolver.clone(),
            collab.catalog.clone(),
            collab.factory,
            collab.inventory,
            collab.notifier,
            transport.clone(),
            settings.tickets,
        );
        Self {
            registry,
            catalog: collab.catalog,
            resolver,
            transport,
            tickets,
            shuttle_interval: settings.shuttle_interval,
            schedule: None,
        }
    }

    pub fn registry(&self) -> &Arc<TravelPointRegistry> {
        &self.registry
    }

    pub fn tickets(&self) -> &TicketService {
        &self.tickets
    }

    pub fn resolver(&self) -> &NearestPointResolver {
        &self.resolver
    }

    /// Register every catalog planet, loading its authored travel points.
    /// Returns how many planets loaded cleanly.
    pub fn load_travel_points(&self) -> usize {
        let planets = self.catalog.list_planets();
        let total = planets.len();
        let loaded = planets
            .iter()
            .filter(|planet| self.registry.add_planet(planet).is_ok())
            .count();
        info!("Loaded travel points for {}/{} planets", loaded, total);
        loaded
    }

    pub fn nearest_point(&self, actor: &dyn Traveler) -> Result<Arc<TravelPoint>, TravelError> {
        self.resolver.nearest_point(actor)
    }

    pub fn transport(
        &self,
        actor: &dyn Traveler,
        destination: &TravelPoint,
    ) -> Result<TransportMode, TravelError> {
        self.transport.transport(actor, destination)
    }

    /// Inbound "list travel points" request. `client` is the requesting creature, if
    /// its session is still alive. Anything unresolvable yields no response.
    pub fn handle_point_list_request(
        &self,
        client: Option<&dyn Traveler>,
        planet: &str,
    ) -> Option<PlanetTravelPointListResponse> {
        let client = client?;
        let planets = self.catalog.list_planets();
        let Some(target) = planets.iter().find(|p| p.name == planet) else {
            debug!(
                "Travel point list request from {} for unknown planet {}",
                client.object_id(),
                escape_log(planet)
            );
            return None;
        };
        let points = match self.registry.points_for_planet(target) {
            Ok(points) => points,
            Err(e) => {
                debug!("Travel point list request from {}: {}", client.object_id(), e);
                return None;
            }
        };
        Some(PlanetTravelPointListResponse {
            planet: target.name.clone(),
            points: points.iter().map(|p| p.view()).collect(),
            planets: planets.iter().map(|p| p.name.clone()).collect(),
        })
    }

    /// Start the shuttle timer. Calling again returns the running schedule's handle.
    pub fn start_shuttle_schedule(&mut self) -> ShuttleScheduleHandle {
        if let Some(handle) = &self.schedule {
            warn!("Shuttle schedule already running");
            return handle.clone();
        }
        let handle = start_shuttle_schedule(
            self.registry.clone(),
            ShuttleScheduleConfig {
                period: self.shuttle_interval,
            },
        );
        info!("Shuttle schedule started ({}s period)", self.shuttle_interval.as_secs());
        self.schedule = Some(handle.clone());
        handle
    }

    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.schedule.take() {
            handle.shutdown().await;
            info!("Shuttle schedule stopped");
        }
    }
}
