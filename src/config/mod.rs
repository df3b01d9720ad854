//! # Configuration
//!
//! TOML configuration for the travel network: the tunable travel constants, logging,
//! the planet catalog and the authored travel points loaded when a planet registers.
//!
//! ```toml
//! [travel]
//! shuttle_interval_secs = 60
//! capture_radius = 70.0
//! nearest_policy = "last_match"
//!
//! [logging]
//! level = "info"
//! file = "travelnet.log"
//!
//! [[planets]]
//! id = 8
//! name = "tatooine"
//!
//! [[points]]
//! planet = "tatooine"
//! name = "Bestine"
//! x = -1361.0
//! y = 12.0
//! z = -3600.0
//! shuttle = true
//! ```
//!
//! Note the `z` coordinate of a point is the second axis of the 2D galaxy map.

use anyhow::{anyhow, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;

use crate::logutil::escape_log;
use crate::travel::{
    NearestPolicy, ObjectFactory, Planet, TicketServiceConfig, TravelError, TravelPointLoader,
    TravelPointRegistry, TravelSettings, DEFAULT_CAPTURE_RADIUS, DEFAULT_SHUTTLE_INTERVAL_SECS,
    SHUTTLE_TEMPLATE, TICKET_TEMPLATE,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub travel: TravelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub planets: Vec<PlanetConfig>,
    #[serde(default)]
    pub points: Vec<TravelPointSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelConfig {
    /// Seconds between shuttle availability flips.
    #[serde(default = "default_shuttle_interval_secs")]
    pub shuttle_interval_secs: u64,
    /// Planar distance at which a player counts as standing at a travel point.
    #[serde(default = "default_capture_radius")]
    pub capture_radius: f32,
    /// "last_match" (default) or "closest".
    #[serde(default)]
    pub nearest_policy: NearestPolicy,
    #[serde(default = "default_ticket_template")]
    pub ticket_template: String,
    #[serde(default = "default_shuttle_template")]
    pub shuttle_template: String,
    /// Send the player a system message when a ticket is refused because the shuttle left.
    #[serde(default)]
    pub report_unavailable_shuttle: bool,
}

fn default_shuttle_interval_secs() -> u64 {
    DEFAULT_SHUTTLE_INTERVAL_SECS
}

fn default_capture_radius() -> f32 {
    DEFAULT_CAPTURE_RADIUS
}

fn default_ticket_template() -> String {
    TICKET_TEMPLATE.to_string()
}

fn default_shuttle_template() -> String {
    SHUTTLE_TEMPLATE.to_string()
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            shuttle_interval_secs: DEFAULT_SHUTTLE_INTERVAL_SECS,
            capture_radius: DEFAULT_CAPTURE_RADIUS,
            nearest_policy: NearestPolicy::default(),
            ticket_template: default_ticket_template(),
            shuttle_template: default_shuttle_template(),
            report_unavailable_shuttle: false,
        }
    }
}

impl TravelConfig {
    pub fn settings(&self) -> TravelSettings {
        TravelSettings {
            capture_radius: self.capture_radius,
            nearest_policy: self.nearest_policy,
            shuttle_interval: Duration::from_secs(self.shuttle_interval_secs),
            tickets: TicketServiceConfig {
                ticket_template: self.ticket_template.clone(),
                report_unavailable_shuttle: self.report_unavailable_shuttle,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    pub id: u32,
    pub name: String,
}

impl PlanetConfig {
    pub fn planet(&self) -> Planet {
        Planet::new(self.id, &self.name)
    }
}

/// One authored travel point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPointSeed {
    pub planet: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Spawn and bind a shuttle for this point.
    #[serde(default)]
    pub shuttle: bool,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.travel.shuttle_interval_secs == 0 {
            return Err(anyhow!("travel.shuttle_interval_secs must be greater than zero"));
        }
        if !(self.travel.capture_radius.is_finite() && self.travel.capture_radius > 0.0) {
            return Err(anyhow!(
                "travel.capture_radius must be a positive number, got {}",
                self.travel.capture_radius
            ));
        }
        for seed in &self.points {
            if !self
                .planets
                .iter()
                .any(|p| p.name.to_lowercase() == seed.planet.to_lowercase())
            {
                return Err(anyhow!(
                    "travel point '{}' references unknown planet '{}'",
                    seed.name,
                    seed.planet
                ));
            }
        }
        Ok(())
    }

    pub fn planet_list(&self) -> Vec<Planet> {
        self.planets.iter().map(PlanetConfig::planet).collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        let planets = vec![
            PlanetConfig { id: 0, name: "corellia".to_string() },
            PlanetConfig { id: 5, name: "naboo".to_string() },
            PlanetConfig { id: 8, name: "tatooine".to_string() },
        ];
        let seed = |planet: &str, name: &str, x: f32, y: f32, z: f32| TravelPointSeed {
            planet: planet.to_string(),
            name: name.to_string(),
            x,
            y,
            z,
            shuttle: true,
        };
        let points = vec![
            seed("corellia", "Coronet Starport", -66.0, 28.0, -4711.0),
            seed("naboo", "Theed Spaceport", -4858.0, 6.0, 4164.0),
            seed("tatooine", "Bestine", -1361.0, 12.0, -3600.0),
            seed("tatooine", "Mos Eisley", 3528.0, 5.0, -4804.0),
        ];
        Config {
            travel: TravelConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("travelnet.log".to_string()),
            },
            planets,
            points,
        }
    }
}

/// Feeds a registering planet with its configured points, spawning and binding
/// shuttles where requested.
pub struct ConfigPointLoader {
    seeds: Vec<TravelPointSeed>,
    factory: Arc<dyn ObjectFactory>,
    shuttle_template: String,
}

impl ConfigPointLoader {
    pub fn new(config: &Config, factory: Arc<dyn ObjectFactory>) -> Self {
        Self {
            seeds: config.points.clone(),
            factory,
            shuttle_template: config.travel.shuttle_template.clone(),
        }
    }
}

impl TravelPointLoader for ConfigPointLoader {
    fn load_points(
        &self,
        registry: &TravelPointRegistry,
        planet: &Planet,
    ) -> Result<(), TravelError> {
        let mut count = 0;
        for seed in self
            .seeds
            .iter()
            .filter(|s| s.planet.to_lowercase() == planet.name)
        {
            let point = registry.add_travel_point(planet, &seed.name, seed.x, seed.y, seed.z);
            if seed.shuttle {
                let shuttle =
                    self.factory
                        .spawn_shuttle(&self.shuttle_template, planet, point.location())?;
                registry.bind_shuttle(planet, &seed.name, shuttle)?;
            }
            count += 1;
        }
        debug!(
            "Loaded {} configured travel points for {}",
            count,
            escape_log(&planet.name)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MemoryObjectFactory;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.travel.shuttle_interval_secs, 60);
        assert_eq!(config.travel.capture_radius, 70.0);
        assert_eq!(config.travel.nearest_policy, NearestPolicy::LastMatch);
        assert!(!config.travel.report_unavailable_shuttle);
    }

    #[test]
    fn default_config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.points, config.points);
        assert_eq!(parsed.planets, config.planets);
    }

    #[test]
    fn partial_travel_section_uses_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [travel]
            nearest_policy = "closest"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.travel.nearest_policy, NearestPolicy::Closest);
        assert_eq!(parsed.travel.shuttle_interval_secs, 60);
        assert_eq!(parsed.travel.ticket_template, TICKET_TEMPLATE);
        assert!(parsed.points.is_empty());
    }

    #[test]
    fn validate_rejects_orphan_points_and_zero_interval() {
        let mut config = Config::default();
        config.points[0].planet = "hoth".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.travel.shuttle_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loader_inserts_only_matching_planet_and_binds_shuttles() {
        let config = Config::default();
        let factory = Arc::new(MemoryObjectFactory::default());
        let loader = Arc::new(ConfigPointLoader::new(&config, factory));
        let registry = TravelPointRegistry::new().with_loader(loader);
        let tatooine = Planet::new(8, "tatooine");
        registry.add_planet(&tatooine).unwrap();

        let points = registry.points_for_planet(&tatooine).unwrap();
        let names: Vec<&str> = points.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Bestine", "Mos Eisley"]);
        assert!(points.iter().all(|p| p.has_shuttle()));
    }
}
