//! # Travelnet - galaxy-wide fast travel for a multiplayer world server
//!
//! Travelnet manages the fast-travel network of a virtual galaxy: per-planet sets of
//! named travel points, a periodic shuttle availability cycle, the purchase and
//! redemption of travel tickets, and the resulting move of the player (a teleport on
//! the same planet or a transfer to another planet).
//!
//! ## Features
//!
//! - **Travel point registry**: planet -> ordered travel points, safe under concurrent
//!   request handlers and the shuttle timer.
//! - **Shuttle schedule**: a tokio timer that flips every shuttle between landed and
//!   departed once per interval.
//! - **Tickets**: purchase into inventory, per-location listing, redemption gated on
//!   the departure shuttle being available.
//! - **Transport**: same-planet teleport or cross-planet transfer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use travelnet::config::{Config, ConfigPointLoader};
//! use travelnet::travel::{TravelCollaborators, TravelService};
//! use travelnet::world::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let factory = Arc::new(MemoryObjectFactory::default());
//!     let collab = TravelCollaborators {
//!         catalog: Arc::new(StaticPlanetCatalog::new(config.planet_list())),
//!         factory: factory.clone(),
//!         inventory: Arc::new(MemoryInventory::new()),
//!         notifier: Arc::new(RecordingNotifier::new()),
//!         simulation: Arc::new(RecordingSimulation::new()),
//!         loader: Some(Arc::new(ConfigPointLoader::new(&config, factory))),
//!     };
//!     let mut service = TravelService::new(collab, config.travel.settings());
//!     service.load_travel_points();
//!     service.start_shuttle_schedule();
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`travel`] - registry, shuttle schedule, resolver, tickets, transport and the service facade
//! - [`world`] - in-memory implementations of the world interfaces the travel network consumes
//! - [`config`] - configuration loading and the config-backed travel point loader
//! - [`logutil`] - log line sanitizing

pub mod config;
pub mod logutil;
pub mod travel;
pub mod world;
