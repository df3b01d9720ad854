//! Travel tickets: creation, purchase, per-location listing and redemption.
//!
//! Redemption is driven by a destination list shown to the player. The player answers
//! that list some time later, so [`TicketService::handle_ticket_selection`] looks the
//! ticket, the arrival point and the player's current departure point up again instead
//! of trusting anything captured when the list was built.

use log::{debug, info, warn};
use std::sync::Arc;

use super::errors::TravelError;
use super::interfaces::{Inventory, Notifier, ObjectFactory, PlanetCatalog, Traveler};
use super::registry::TravelPointRegistry;
use super::resolver::NearestPointResolver;
use super::transport::{TransportExecutor, TransportMode};
use super::types::{InventoryItem, ItemKind, ObjectId, Ticket, TICKET_TEMPLATE};
use crate::logutil::escape_log;

pub const PURCHASE_WINDOW_TITLE: &str = "STAR WARS GALAXIES";
pub const PURCHASE_WINDOW_BODY: &str = "Ticket purchase complete.";
pub const SELECTION_WINDOW_TITLE: &str = "Select Destination";
pub const SHUTTLE_UNAVAILABLE_MESSAGE: &str =
    "The shuttle is not available at this time. Please wait for the next shuttle.";

#[derive(Debug, Clone)]
pub struct TicketServiceConfig {
    pub ticket_template: String,
    /// Tell the player when a redemption is refused because the shuttle has left.
    /// Off by default: refusals are silent.
    pub report_unavailable_shuttle: bool,
}

impl Default for TicketServiceConfig {
    fn default() -> Self {
        Self {
            ticket_template: TICKET_TEMPLATE.to_string(),
            report_unavailable_shuttle: false,
        }
    }
}

/// Result of a redemption that got as far as checking the departure shuttle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// Ticket consumed and the player moved.
    Transported(TransportMode),
    /// Shuttle at the departure point has left; the ticket stays in inventory.
    ShuttleUnavailable { departure: String },
}

/// Destination list shown to a player, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSelection {
    player: ObjectId,
    entries: Vec<(ObjectId, String)>,
}

impl TicketSelection {
    pub fn player(&self) -> ObjectId {
        self.player
    }

    pub fn entries(&self) -> &[(ObjectId, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn object_id_by_index(&self, index: usize) -> Option<ObjectId> {
        self.entries.get(index).map(|(id, _)| *id)
    }
}

pub struct TicketService {
    registry: Arc<TravelPointRegistry>,
    resolver: Arc<NearestPointResolver>,
    catalog: Arc<dyn PlanetCatalog>,
    factory: Arc<dyn ObjectFactory>,
    inventory: Arc<dyn Inventory>,
    notifier: Arc<dyn Notifier>,
    transport: Arc<TransportExecutor>,
    config: TicketServiceConfig,
}

impl TicketService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<TravelPointRegistry>,
        resolver: Arc<NearestPointResolver>,
        catalog: Arc<dyn PlanetCatalog>,
        factory: Arc<dyn ObjectFactory>,
        inventory: Arc<dyn Inventory>,
        notifier: Arc<dyn Notifier>,
        transport: Arc<TransportExecutor>,
        config: TicketServiceConfig,
    ) -> Self {
        Self {
            registry,
            resolver,
            catalog,
            factory,
            inventory,
            notifier,
            transport,
            config,
        }
    }

    /// Create a ticket object on the departure planet. The ticket is not placed anywhere.
    pub fn create_ticket(
        &self,
        departure_planet: &str,
        departure_point: &str,
        arrival_planet: &str,
        arrival_point: &str,
    ) -> Result<InventoryItem, TravelError> {
        let planet = self.catalog.planet_by_name(departure_planet)?;
        let id = self
            .factory
            .create_object(&self.config.ticket_template, &planet)?;
        let ticket = Ticket::new(departure_planet, departure_point, arrival_planet, arrival_point);
        debug!(
            "Created ticket {} {} -> {}",
            id,
            escape_log(&ticket.departure_point),
            escape_log(&ticket.arrival_point)
        );
        Ok(InventoryItem {
            id,
            template: self.config.ticket_template.clone(),
            kind: ItemKind::Ticket(ticket),
        })
    }

    /// Create a ticket, put it in the player's inventory and confirm the purchase.
    /// `cost` is display text only; no credits are moved here.
    pub fn purchase_ticket(
        &self,
        player: &dyn Traveler,
        departure_planet: &str,
        departure_point: &str,
        arrival_planet: &str,
        arrival_point: &str,
        cost: &str,
    ) -> Result<InventoryItem, TravelError> {
        let item = self.create_ticket(
            departure_planet,
            departure_point,
            arrival_planet,
            arrival_point,
        )?;
        let pid = player.object_id();
        self.inventory.insert(pid, item.clone());

        self.notifier
            .show_message_box(pid, PURCHASE_WINDOW_TITLE, PURCHASE_WINDOW_BODY);
        self.notifier.send_system_message(
            pid,
            &format!(
                "You successfully make a payment of {} credits to the Galactic Travel Commission.",
                cost
            ),
        );
        info!("Player {} purchased ticket {}", pid, item.id);
        Ok(item)
    }

    /// Tickets in the player's inventory that depart from the point the player stands at.
    pub fn list_eligible_tickets(
        &self,
        player: &dyn Traveler,
    ) -> Result<Vec<InventoryItem>, TravelError> {
        let nearest = self.resolver.nearest_point(player)?;
        let departure = nearest.name();
        Ok(self.inventory.enumerate(player.object_id(), &|item: &InventoryItem| {
            item.ticket()
                .is_some_and(|t| t.departure_point == departure)
        }))
    }

    /// Consume `ticket_id` and move the player, provided the shuttle at the
    /// player's current travel point is available.
    pub fn redeem(
        &self,
        ticket_id: ObjectId,
        player: &dyn Traveler,
    ) -> Result<RedeemOutcome, TravelError> {
        let pid = player.object_id();
        let item = self
            .inventory
            .get(pid, ticket_id)
            .ok_or_else(|| {
                TravelError::NotFound(format!("ticket {} in inventory of {}", ticket_id, pid))
            })?;
        let ticket = item
            .ticket()
            .ok_or_else(|| TravelError::NotFound(format!("object {} is not a ticket", ticket_id)))?;

        let arrival_planet = self.catalog.planet_by_name(&ticket.arrival_planet)?;
        let arrival = self
            .registry
            .point_by_name(&arrival_planet, &ticket.arrival_point)?;
        let departure = self.resolver.nearest_point(player)?;

        if !departure.is_shuttle_available() {
            info!(
                "Refused ticket {} for {}: shuttle at {} has departed",
                ticket_id,
                pid,
                escape_log(departure.name())
            );
            if self.config.report_unavailable_shuttle {
                self.notifier.send_system_message(pid, SHUTTLE_UNAVAILABLE_MESSAGE);
            }
            return Ok(RedeemOutcome::ShuttleUnavailable {
                departure: departure.name().to_string(),
            });
        }

        // Only the caller that takes the ticket out of the inventory gets to travel.
        if self.inventory.remove(pid, ticket_id).is_none() {
            warn!("Ticket {} of {} was consumed concurrently", ticket_id, pid);
            return Err(TravelError::NotFound(format!(
                "ticket {} in inventory of {}",
                ticket_id, pid
            )));
        }
        self.factory.destroy_object(ticket_id);
        let mode = self.transport.transport(player, &arrival)?;
        Ok(RedeemOutcome::Transported(mode))
    }

    /// Show the player a destination list built from their eligible tickets.
    pub fn open_ticket_window(
        &self,
        player: &dyn Traveler,
    ) -> Result<TicketSelection, TravelError> {
        let entries: Vec<(ObjectId, String)> = self
            .list_eligible_tickets(player)?
            .into_iter()
            .filter_map(|item| item.ticket().map(|t| (item.id, t.destination_label())))
            .collect();
        self.notifier.show_selection_list(
            player.object_id(),
            SELECTION_WINDOW_TITLE,
            SELECTION_WINDOW_TITLE,
            &entries,
        );
        Ok(TicketSelection {
            player: player.object_id(),
            entries,
        })
    }

    /// Callback for a row picked in a window from [`Self::open_ticket_window`].
    /// Failures are logged and absorbed; `None` means nothing happened.
    pub fn handle_ticket_selection(
        &self,
        player: &dyn Traveler,
        selection: &TicketSelection,
        index: usize,
    ) -> Option<RedeemOutcome> {
        if selection.player != player.object_id() {
            warn!(
                "Player {} answered a ticket window opened for {}",
                player.object_id(),
                selection.player
            );
            return None;
        }
        let Some(ticket_id) = selection.object_id_by_index(index) else {
            warn!("Ticket selection index {} out of range for {}", index, player.object_id());
            return None;
        };
        match self.redeem(ticket_id, player) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("Ticket {} not redeemed for {}: {}", ticket_id, player.object_id(), e);
                None
            }
        }
    }
}
