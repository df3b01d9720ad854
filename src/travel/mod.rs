//! Fast-travel network: per-planet travel points, the shuttle availability
//! schedule, ticket purchase and redemption, and the resulting transport.

pub mod errors;
pub mod interfaces;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod service;
pub mod ticket;
pub mod transport;
pub mod types;

pub use errors::TravelError;
pub use interfaces::{
    Inventory, Notifier, ObjectFactory, PlanetCatalog, Shuttle, TravelPointLoader, Traveler,
    WorldSimulation,
};
pub use registry::TravelPointRegistry;
pub use resolver::{NearestPointResolver, NearestPolicy};
pub use scheduler::{
    start_shuttle_schedule, toggle_point, ScheduleStats, ShuttleScheduleConfig,
    ShuttleScheduleHandle, ShuttleScheduler, TickReport,
};
pub use service::{
    PlanetTravelPointListResponse, TravelCollaborators, TravelService, TravelSettings,
};
pub use ticket::{RedeemOutcome, TicketSelection, TicketService, TicketServiceConfig};
pub use transport::{TransportExecutor, TransportMode};
pub use types::*;
