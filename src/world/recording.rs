use log::info;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::logutil::escape_log;
use crate::travel::{Notifier, ObjectId, Planet, Point3D, Quaternion, WorldSimulation};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    MessageBox {
        player: ObjectId,
        title: String,
        body: String,
    },
    SystemMessage {
        player: ObjectId,
        text: String,
    },
    SelectionList {
        player: ObjectId,
        title: String,
        options: Vec<(ObjectId, String)>,
    },
}

/// Logs every window and message and keeps them for inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for RecordingNotifier {
    fn show_message_box(&self, player: ObjectId, title: &str, body: &str) {
        info!("[{}] message box: {}", player, escape_log(body));
        self.lock().push(Notification::MessageBox {
            player,
            title: title.to_string(),
            body: body.to_string(),
        });
    }

    fn send_system_message(&self, player: ObjectId, text: &str) {
        info!("[{}] system: {}", player, escape_log(text));
        self.lock().push(Notification::SystemMessage {
            player,
            text: text.to_string(),
        });
    }

    fn show_selection_list(
        &self,
        player: ObjectId,
        title: &str,
        _prompt: &str,
        options: &[(ObjectId, String)],
    ) {
        info!("[{}] {} ({} options)", player, title, options.len());
        self.lock().push(Notification::SelectionList {
            player,
            title: title.to_string(),
            options: options.to_vec(),
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Movement {
    Teleport {
        actor: ObjectId,
        position: Point3D,
        orientation: Quaternion,
        fall_height: f32,
    },
    Transfer {
        actor: ObjectId,
        planet: Planet,
        position: Point3D,
        orientation: Quaternion,
        origin: ObjectId,
    },
}

/// Records requested moves instead of simulating them.
#[derive(Debug, Default)]
pub struct RecordingSimulation {
    moves: Mutex<Vec<Movement>>,
}

impl RecordingSimulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moves(&self) -> Vec<Movement> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Movement>> {
        self.moves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WorldSimulation for RecordingSimulation {
    fn teleport(
        &self,
        actor: ObjectId,
        position: Point3D,
        orientation: Quaternion,
        fall_height: f32,
    ) {
        self.lock().push(Movement::Teleport {
            actor,
            position,
            orientation,
            fall_height,
        });
    }

    fn transfer_to_planet(
        &self,
        actor: ObjectId,
        planet: &Planet,
        position: Point3D,
        orientation: Quaternion,
        origin: ObjectId,
    ) {
        self.lock().push(Movement::Transfer {
            actor,
            planet: planet.clone(),
            position,
            orientation,
            origin,
        });
    }
}
