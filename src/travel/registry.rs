//! Planet -> travel point registry.
//!
//! The registry is the only owner of the planet map. Structural changes (new
//! planets, new or removed points) take the map's write lock briefly; the shuttle
//! schedule never does. It clones the point handles under a read lock and then
//! flips each point under that point's own mutex, so a tick cannot be held up by
//! request handlers reading the map and vice versa.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::errors::TravelError;
use super::interfaces::{Shuttle, TravelPointLoader};
use super::types::{
    Planet, Point3D, ShuttlePosture, SpawnLocation, TravelPoint, DEFAULT_CAPTURE_RADIUS,
};
use crate::logutil::escape_log;

pub struct TravelPointRegistry {
    points: RwLock<HashMap<Planet, Vec<Arc<TravelPoint>>>>,
    loader: Option<Arc<dyn TravelPointLoader>>,
    capture_radius: f32,
}

impl Default for TravelPointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TravelPointRegistry {
    /// Empty registry without a point loader, using the default capture radius.
    pub fn new() -> Self {
        Self {
            points: RwLock::new(HashMap::new()),
            loader: None,
            capture_radius: DEFAULT_CAPTURE_RADIUS,
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn TravelPointLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Capture radius given to points created from now on.
    pub fn with_capture_radius(mut self, radius: f32) -> Self {
        self.capture_radius = radius;
        self
    }

    pub fn capture_radius(&self) -> f32 {
        self.capture_radius
    }

    /// Register `planet` with an empty point list (kept as is if already present)
    /// and run the point loader for it.
    ///
    /// The loader runs on every call, so calling this twice for the same planet
    /// loads its authored points twice.
    pub fn add_planet(&self, planet: &Planet) -> Result<(), TravelError> {
        {
            let mut map = self.write();
            map.entry(planet.clone()).or_default();
        }
        info!("Registered planet {} for travel", escape_log(&planet.name));

        // Lock released: the loader calls back into add_travel_point.
        if let Some(loader) = &self.loader {
            if let Err(e) = loader.load_points(self, planet) {
                warn!(
                    "Loading travel points for {} failed: {}",
                    escape_log(&planet.name),
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// Append a travel point, registering the planet first if needed.
    ///
    /// Names are not checked for uniqueness; a duplicate name makes later lookups ambiguous.
    pub fn add_travel_point(
        &self,
        planet: &Planet,
        name: &str,
        x: f32,
        y: f32,
        z: f32,
    ) -> Arc<TravelPoint> {
        let point = Arc::new(TravelPoint::new(
            name,
            planet,
            Point3D::new(x, y, z),
            self.capture_radius,
        ));
        let mut map = self.write();
        if !map.contains_key(planet) {
            debug!("Added planet {} to travel map", escape_log(&planet.name));
        }
        map.entry(planet.clone()).or_default().push(point.clone());
        debug!(
            "Added travel point {} on {}",
            escape_log(name),
            escape_log(&planet.name)
        );
        point
    }

    /// Remove the first point named `name`. Unknown planets and names are ignored.
    pub fn remove_travel_point_by_name(
        &self,
        planet: &Planet,
        name: &str,
    ) -> Option<Arc<TravelPoint>> {
        let mut map = self.write();
        let points = map.get_mut(planet)?;
        let pos = points.iter().position(|p| p.name() == name)?;
        let removed = points.remove(pos);
        debug!(
            "Removed travel point {} from {}",
            escape_log(name),
            escape_log(&planet.name)
        );
        Some(removed)
    }

    /// Handles to every point on `planet`, in insertion order.
    pub fn points_for_planet(
        &self,
        planet: &Planet,
    ) -> Result<Vec<Arc<TravelPoint>>, TravelError> {
        self.read()
            .get(planet)
            .cloned()
            .ok_or_else(|| TravelError::NotFound(format!("planet {}", planet.name)))
    }

    /// Look a point up by name. With duplicate names the last one in insertion order wins.
    pub fn point_by_name(
        &self,
        planet: &Planet,
        name: &str,
    ) -> Result<Arc<TravelPoint>, TravelError> {
        let map = self.read();
        let points = map
            .get(planet)
            .ok_or_else(|| TravelError::NotFound(format!("planet {}", planet.name)))?;
        points
            .iter()
            .rev()
            .find(|p| p.name() == name)
            .cloned()
            .ok_or_else(|| {
                debug!("Couldn't find a travel point named {}", escape_log(name));
                TravelError::NotFound(format!("travel point {} on {}", name, planet.name))
            })
    }

    /// Bind (or replace) the shuttle serving a point. The shuttle's posture is
    /// brought in line with the point's current availability.
    pub fn bind_shuttle(
        &self,
        planet: &Planet,
        name: &str,
        shuttle: Arc<dyn Shuttle>,
    ) -> Result<(), TravelError> {
        let point = self.point_by_name(planet, name)?;
        let mut state = point.state();
        let posture = if state.available {
            ShuttlePosture::Idle
        } else {
            ShuttlePosture::Departed
        };
        shuttle.set_posture(posture);
        debug!(
            "Bound shuttle {} to travel point {}",
            shuttle.object_id(),
            escape_log(name)
        );
        state.shuttle = Some(shuttle);
        Ok(())
    }

    pub fn set_spawn_location(
        &self,
        planet: &Planet,
        name: &str,
        spawn: SpawnLocation,
    ) -> Result<(), TravelError> {
        let point = self.point_by_name(planet, name)?;
        point.state().spawn = spawn;
        Ok(())
    }

    pub fn planets(&self) -> Vec<Planet> {
        self.read().keys().cloned().collect()
    }

    /// Handles to every point on every planet. Used by the shuttle schedule.
    pub fn all_points(&self) -> Vec<Arc<TravelPoint>> {
        self.read().values().flatten().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Planet, Vec<Arc<TravelPoint>>>> {
        self.points.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Planet, Vec<Arc<TravelPoint>>>> {
        self.points.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn tatooine() -> Planet {
        Planet::new(8, "tatooine")
    }

    struct CountingLoader {
        calls: Mutex<u32>,
    }

    impl TravelPointLoader for CountingLoader {
        fn load_points(
            &self,
            registry: &TravelPointRegistry,
            planet: &Planet,
        ) -> Result<(), TravelError> {
            *self.calls.lock().unwrap() += 1;
            registry.add_travel_point(planet, "Bestine", 100.0, 0.0, 50.0);
            Ok(())
        }
    }

    #[test]
    fn add_planet_starts_empty() {
        let reg = TravelPointRegistry::new();
        reg.add_planet(&tatooine()).unwrap();
        assert!(reg.points_for_planet(&tatooine()).unwrap().is_empty());
    }

    #[test]
    fn unknown_planet_is_not_found() {
        let reg = TravelPointRegistry::new();
        let err = reg.points_for_planet(&tatooine()).unwrap_err();
        assert!(err.is_not_found());
        assert!(reg.point_by_name(&tatooine(), "Bestine").is_err());
    }

    #[test]
    fn add_point_registers_planet_implicitly() {
        let reg = TravelPointRegistry::new();
        reg.add_travel_point(&tatooine(), "Bestine", 100.0, 0.0, 50.0);
        let p = reg.point_by_name(&tatooine(), "Bestine").unwrap();
        assert_eq!(p.name(), "Bestine");
        assert_eq!(p.location(), Point3D::new(100.0, 0.0, 50.0));
        assert_eq!(p.planet_name(), "Tatooine");
        assert_eq!(p.capture_radius(), DEFAULT_CAPTURE_RADIUS);
    }

    #[test]
    fn remove_missing_name_is_noop() {
        let reg = TravelPointRegistry::new();
        reg.add_travel_point(&tatooine(), "Bestine", 0.0, 0.0, 0.0);
        assert!(reg.remove_travel_point_by_name(&tatooine(), "Anchorhead").is_none());
        assert!(reg.remove_travel_point_by_name(&Planet::new(1, "naboo"), "Bestine").is_none());
        assert_eq!(reg.points_for_planet(&tatooine()).unwrap().len(), 1);
    }

    #[test]
    fn remove_takes_first_duplicate_and_lookup_sees_last() {
        let reg = TravelPointRegistry::new();
        reg.add_travel_point(&tatooine(), "Dup", 1.0, 0.0, 1.0);
        reg.add_travel_point(&tatooine(), "Dup", 2.0, 0.0, 2.0);
        assert_eq!(reg.point_by_name(&tatooine(), "Dup").unwrap().location().x, 2.0);

        let removed = reg.remove_travel_point_by_name(&tatooine(), "Dup").unwrap();
        assert_eq!(removed.location().x, 1.0);
        assert_eq!(reg.points_for_planet(&tatooine()).unwrap().len(), 1);
    }

    #[test]
    fn loader_runs_on_every_registration() {
        let loader = Arc::new(CountingLoader { calls: Mutex::new(0) });
        let reg = TravelPointRegistry::new().with_loader(loader.clone());
        reg.add_planet(&tatooine()).unwrap();
        reg.add_planet(&tatooine()).unwrap();
        assert_eq!(*loader.calls.lock().unwrap(), 2);
        assert_eq!(reg.planets().len(), 1);
        // Points are loaded twice; the registry does not de-duplicate.
        assert_eq!(reg.points_for_planet(&tatooine()).unwrap().len(), 2);
    }

    #[test]
    fn spawn_location_override() {
        let reg = TravelPointRegistry::new();
        reg.add_travel_point(&tatooine(), "Bestine", 0.0, 0.0, 0.0);
        let spawn = SpawnLocation {
            position: Point3D::new(5.0, 1.0, 5.0),
            ..Default::default()
        };
        reg.set_spawn_location(&tatooine(), "Bestine", spawn).unwrap();
        assert_eq!(
            reg.point_by_name(&tatooine(), "Bestine").unwrap().spawn_location(),
            spawn
        );
    }
}
