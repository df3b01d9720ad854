//! Data model for the travel network: planets, positions, travel points and tickets.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::interfaces::Shuttle;

/// Seconds between two shuttle availability flips.
pub const DEFAULT_SHUTTLE_INTERVAL_SECS: u64 = 60;

/// Planar distance at which an actor counts as standing at a travel point.
pub const DEFAULT_CAPTURE_RADIUS: f32 = 70.0;

/// Object template used when instantiating ticket entities.
pub const TICKET_TEMPLATE: &str =
    "object/tangible/travel/travel_ticket/base/shared_base_travel_ticket.iff";

/// Object template used when spawning shuttles for configured travel points.
pub const SHUTTLE_TEMPLATE: &str = "object/creature/npc/theme_park/shared_player_shuttle.iff";

pub const ATTR_DEPARTURE_PLANET: &str = "@obj_attr_n:travel_departure_planet";
pub const ATTR_DEPARTURE_POINT: &str = "@obj_attr_n:travel_departure_point";
pub const ATTR_ARRIVAL_PLANET: &str = "@obj_attr_n:travel_arrival_planet";
pub const ATTR_ARRIVAL_POINT: &str = "@obj_attr_n:travel_arrival_point";

/// Identifier of a world object (creature, ticket, shuttle...).
pub type ObjectId = u64;

/// A planet as known to the world catalog. Names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Planet {
    pub id: u32,
    pub name: String,
}

impl Planet {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_lowercase(),
        }
    }

    /// Display form, e.g. `tatooine` -> `Tatooine`.
    pub fn display_name(&self) -> String {
        capitalize_words(&self.name)
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Uppercase the first character of every whitespace separated word, leaving the rest alone.
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// World position. The ground plane is (x, z); y is height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance on the ground plane, ignoring height.
    pub fn distance_2d(&self, other: &Point3D) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

/// Pose an actor is placed at when arriving at a travel point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnLocation {
    pub position: Point3D,
    pub orientation: Quaternion,
}

/// Posture written to a shuttle entity whenever its availability flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ShuttlePosture {
    /// Landed and boardable.
    Idle = 0,
    /// Taken off; travel from this point is refused.
    Departed = 2,
}

impl ShuttlePosture {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Mutable part of a travel point. Guarded by one mutex so the availability
/// flag and the shuttle posture are never observed half-applied.
pub(crate) struct PointState {
    pub(crate) shuttle: Option<Arc<dyn Shuttle>>,
    pub(crate) available: bool,
    pub(crate) spawn: SpawnLocation,
}

/// A named departure/arrival node on one planet.
pub struct TravelPoint {
    name: String,
    planet_name: String,
    location: Point3D,
    capture_radius: f32,
    state: Mutex<PointState>,
}

impl TravelPoint {
    /// New point without a shuttle, available, spawning at its own location.
    pub fn new(name: &str, planet: &Planet, location: Point3D, capture_radius: f32) -> Self {
        Self {
            name: name.to_string(),
            planet_name: planet.display_name(),
            location,
            capture_radius,
            state: Mutex::new(PointState {
                shuttle: None,
                available: true,
                spawn: SpawnLocation {
                    position: location,
                    orientation: Quaternion::default(),
                },
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capitalized name of the owning planet.
    pub fn planet_name(&self) -> &str {
        &self.planet_name
    }

    pub fn location(&self) -> Point3D {
        self.location
    }

    pub fn capture_radius(&self) -> f32 {
        self.capture_radius
    }

    pub fn spawn_location(&self) -> SpawnLocation {
        self.state().spawn
    }

    pub fn has_shuttle(&self) -> bool {
        self.state().shuttle.is_some()
    }

    pub fn is_shuttle_available(&self) -> bool {
        self.state().available
    }

    /// Whether `position` lies within this point's capture radius on the ground plane.
    pub fn captures(&self, position: &Point3D) -> bool {
        self.location.distance_2d(position) <= self.capture_radius
    }

    /// Consistent read of every field in one lock acquisition.
    pub fn view(&self) -> TravelPointView {
        let state = self.state();
        TravelPointView {
            name: self.name.clone(),
            planet_name: self.planet_name.clone(),
            location: self.location,
            spawn: state.spawn,
            has_shuttle: state.shuttle.is_some(),
            shuttle_available: state.available,
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, PointState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TravelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("TravelPoint")
            .field("name", &self.name)
            .field("planet_name", &self.planet_name)
            .field("location", &self.location)
            .field("capture_radius", &self.capture_radius)
            .field("has_shuttle", &state.shuttle.is_some())
            .field("available", &state.available)
            .finish()
    }
}

/// Plain snapshot of a travel point, as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPointView {
    pub name: String,
    pub planet_name: String,
    pub location: Point3D,
    pub spawn: SpawnLocation,
    pub has_shuttle: bool,
    pub shuttle_available: bool,
}

/// A travel ticket for one departure/arrival pair. Planet fields hold the capitalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub departure_planet: String,
    pub departure_point: String,
    pub arrival_planet: String,
    pub arrival_point: String,
}

impl Ticket {
    pub fn new(
        departure_planet: &str,
        departure_point: &str,
        arrival_planet: &str,
        arrival_point: &str,
    ) -> Self {
        Self {
            departure_planet: capitalize_words(departure_planet),
            departure_point: departure_point.to_string(),
            arrival_planet: capitalize_words(arrival_planet),
            arrival_point: arrival_point.to_string(),
        }
    }

    /// String attributes as stamped on the ticket object.
    pub fn attributes(&self) -> HashMap<String, String> {
        HashMap::from([
            (ATTR_DEPARTURE_PLANET.to_string(), self.departure_planet.clone()),
            (ATTR_DEPARTURE_POINT.to_string(), self.departure_point.clone()),
            (ATTR_ARRIVAL_PLANET.to_string(), self.arrival_planet.clone()),
            (ATTR_ARRIVAL_POINT.to_string(), self.arrival_point.clone()),
        ])
    }

    /// Rebuild a ticket from an attribute bag. Returns `None` if any key is missing.
    pub fn from_attributes(attrs: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            departure_planet: attrs.get(ATTR_DEPARTURE_PLANET)?.clone(),
            departure_point: attrs.get(ATTR_DEPARTURE_POINT)?.clone(),
            arrival_planet: attrs.get(ATTR_ARRIVAL_PLANET)?.clone(),
            arrival_point: attrs.get(ATTR_ARRIVAL_POINT)?.clone(),
        })
    }

    /// Label used in the destination selection list.
    pub fn destination_label(&self) -> String {
        format!("{} -- {}", self.arrival_planet, self.arrival_point)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Ticket(Ticket),
    Other,
}

/// An object held in an inventory container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ObjectId,
    pub template: String,
    pub kind: ItemKind,
}

impl InventoryItem {
    pub fn ticket(&self) -> Option<&Ticket> {
        match &self.kind {
            ItemKind::Ticket(t) => Some(t),
            ItemKind::Other => None,
        }
    }
}
