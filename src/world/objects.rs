use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::travel::{
    Inventory, InventoryItem, ObjectFactory, ObjectId, Planet, Point3D, Shuttle, ShuttlePosture,
    TravelError,
};

/// Shuttle entity that only remembers its last posture code.
#[derive(Debug)]
pub struct PostureShuttle {
    id: ObjectId,
    posture: AtomicU8,
}

impl PostureShuttle {
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            posture: AtomicU8::new(ShuttlePosture::Idle.code()),
        }
    }

    pub fn posture(&self) -> u8 {
        self.posture.load(Ordering::SeqCst)
    }
}

impl Shuttle for PostureShuttle {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn set_posture(&self, posture: ShuttlePosture) {
        self.posture.store(posture.code(), Ordering::SeqCst);
    }
}

/// Hands out sequential object ids and tracks which objects are still alive.
#[derive(Debug)]
pub struct MemoryObjectFactory {
    next_id: AtomicU64,
    live: Mutex<HashSet<ObjectId>>,
}

impl Default for MemoryObjectFactory {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl MemoryObjectFactory {
    pub fn starting_at(first_id: ObjectId) -> Self {
        Self {
            next_id: AtomicU64::new(first_id),
            live: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_live(&self, id: ObjectId) -> bool {
        self.live().contains(&id)
    }

    fn allocate(&self) -> ObjectId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.live().insert(id);
        id
    }

    fn live(&self) -> MutexGuard<'_, HashSet<ObjectId>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectFactory for MemoryObjectFactory {
    fn create_object(&self, template: &str, planet: &Planet) -> Result<ObjectId, TravelError> {
        let id = self.allocate();
        debug!("Created object {} ({}) on {}", id, template, planet.name);
        Ok(id)
    }

    fn spawn_shuttle(
        &self,
        template: &str,
        planet: &Planet,
        position: Point3D,
    ) -> Result<Arc<dyn Shuttle>, TravelError> {
        let id = self.allocate();
        debug!(
            "Spawned shuttle {} ({}) on {} at ({:.1}, {:.1}, {:.1})",
            id, template, planet.name, position.x, position.y, position.z
        );
        Ok(Arc::new(PostureShuttle::new(id)))
    }

    fn destroy_object(&self, id: ObjectId) {
        if self.live().remove(&id) {
            debug!("Destroyed object {}", id);
        }
    }
}

/// Per-creature item lists.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    containers: Mutex<HashMap<ObjectId, Vec<InventoryItem>>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self, owner: ObjectId) -> Vec<InventoryItem> {
        self.containers().get(&owner).cloned().unwrap_or_default()
    }

    fn containers(&self) -> MutexGuard<'_, HashMap<ObjectId, Vec<InventoryItem>>> {
        self.containers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inventory for MemoryInventory {
    fn insert(&self, owner: ObjectId, item: InventoryItem) {
        self.containers().entry(owner).or_default().push(item);
    }

    fn remove(&self, owner: ObjectId, item: ObjectId) -> Option<InventoryItem> {
        let mut containers = self.containers();
        let items = containers.get_mut(&owner)?;
        let pos = items.iter().position(|i| i.id == item)?;
        Some(items.remove(pos))
    }

    fn get(&self, owner: ObjectId, item: ObjectId) -> Option<InventoryItem> {
        self.containers()
            .get(&owner)?
            .iter()
            .find(|i| i.id == item)
            .cloned()
    }

    fn enumerate(
        &self,
        owner: ObjectId,
        filter: &dyn Fn(&InventoryItem) -> bool,
    ) -> Vec<InventoryItem> {
        self.containers()
            .get(&owner)
            .map(|items| items.iter().filter(|i| filter(*i)).cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::travel::ItemKind;

    fn item(id: ObjectId) -> InventoryItem {
        InventoryItem {
            id,
            template: "object/tangible/loot/shared_rock.iff".to_string(),
            kind: ItemKind::Other,
        }
    }

    #[test]
    fn inventory_insert_get_remove() {
        let inv = MemoryInventory::new();
        inv.insert(1, item(10));
        inv.insert(1, item(11));
        assert_eq!(inv.get(1, 11).map(|i| i.id), Some(11));
        assert!(inv.get(2, 11).is_none());
        assert_eq!(inv.remove(1, 10).map(|i| i.id), Some(10));
        assert!(inv.remove(1, 10).is_none());
        assert_eq!(inv.enumerate(1, &|_: &InventoryItem| true).len(), 1);
    }

    #[test]
    fn factory_tracks_live_objects() {
        let factory = MemoryObjectFactory::starting_at(100);
        let planet = Planet::new(0, "naboo");
        let id = factory.create_object("ticket", &planet).unwrap();
        assert_eq!(id, 100);
        assert!(factory.is_live(id));
        factory.destroy_object(id);
        assert!(!factory.is_live(id));
    }
}
