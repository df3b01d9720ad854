//! Narrow interfaces onto the systems the travel network relies on but does not own:
//! the world catalog, object creation, inventories, UI and the simulation.
//!
//! Every trait is `Send + Sync` and takes `&self`; implementations bring their own
//! interior mutability because the network calls them from request handlers and
//! from the shuttle timer at the same time.

use std::sync::Arc;

use super::errors::TravelError;
use super::registry::TravelPointRegistry;
use super::types::{InventoryItem, ObjectId, Planet, Point3D, Quaternion, ShuttlePosture};

/// A player or creature that can stand at and travel between travel points.
pub trait Traveler: Send + Sync {
    fn object_id(&self) -> ObjectId;
    fn planet(&self) -> Planet;
    fn world_position(&self) -> Point3D;
}

/// Shuttle entity bound to a travel point.
pub trait Shuttle: Send + Sync {
    fn object_id(&self) -> ObjectId;
    fn set_posture(&self, posture: ShuttlePosture);
}

pub trait PlanetCatalog: Send + Sync {
    fn list_planets(&self) -> Vec<Planet>;
    /// Case-insensitive lookup.
    fn planet_by_name(&self, name: &str) -> Result<Planet, TravelError>;
}

/// Populates a freshly registered planet with its authored travel points.
pub trait TravelPointLoader: Send + Sync {
    fn load_points(&self, registry: &TravelPointRegistry, planet: &Planet)
        -> Result<(), TravelError>;
}

pub trait ObjectFactory: Send + Sync {
    fn create_object(&self, template: &str, planet: &Planet) -> Result<ObjectId, TravelError>;
    fn spawn_shuttle(
        &self,
        template: &str,
        planet: &Planet,
        position: Point3D,
    ) -> Result<Arc<dyn Shuttle>, TravelError>;
    fn destroy_object(&self, id: ObjectId);
}

/// Inventory containers, addressed by the owning creature.
pub trait Inventory: Send + Sync {
    fn insert(&self, owner: ObjectId, item: InventoryItem);
    fn remove(&self, owner: ObjectId, item: ObjectId) -> Option<InventoryItem>;
    fn get(&self, owner: ObjectId, item: ObjectId) -> Option<InventoryItem>;
    fn enumerate(
        &self,
        owner: ObjectId,
        filter: &dyn Fn(&InventoryItem) -> bool,
    ) -> Vec<InventoryItem>;
}

/// Windows and chat messages shown to a player. The selection list is answered
/// later, through [`crate::travel::TicketService::handle_ticket_selection`].
pub trait Notifier: Send + Sync {
    fn show_message_box(&self, player: ObjectId, title: &str, body: &str);
    fn send_system_message(&self, player: ObjectId, text: &str);
    fn show_selection_list(
        &self,
        player: ObjectId,
        title: &str,
        prompt: &str,
        options: &[(ObjectId, String)],
    );
}

/// Position changes. Both calls are fire-and-forget.
pub trait WorldSimulation: Send + Sync {
    fn teleport(
        &self,
        actor: ObjectId,
        position: Point3D,
        orientation: Quaternion,
        fall_height: f32,
    );
    fn transfer_to_planet(
        &self,
        actor: ObjectId,
        planet: &Planet,
        position: Point3D,
        orientation: Quaternion,
        origin: ObjectId,
    );
}
