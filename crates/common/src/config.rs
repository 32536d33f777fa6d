use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a simulation configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Full simulation configuration. Every section falls back to its defaults
/// when omitted from the YAML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldSettings,
    pub physics: PhysicsConfig,
    pub ticker: TickerConfig,
    pub player: PlayerSettings,
}

/// Level dimensions (in tiles) and the master seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub width: i32,
    pub height: i32,
    pub seed: u64,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 128,
            seed: 42,
        }
    }
}

/// Per-step physics constants shared by every entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to `velocity.y` once per step.
    pub gravity: f32,
    /// Collision scan radius, as a multiple of the entity size.
    pub collision_expanse: f32,
    /// Touching edges count as contact.
    pub inclusive_contact: bool,
    /// Horizontal acceleration per step while grounded.
    pub ground_accel: f32,
    /// Horizontal acceleration per step while airborne.
    pub air_accel: f32,
    /// Upward speed applied on a grounded jump.
    pub jump_impulse: f32,
    /// Drops older than this many steps despawn. `None` keeps them forever.
    pub max_drop_age: Option<u32>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.18,
            collision_expanse: 8.0,
            inclusive_contact: true,
            ground_accel: 0.5,
            air_accel: 0.25,
            jump_impulse: 6.0,
            max_drop_age: None,
        }
    }
}

/// Cadence and window of the periodic tile update pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Run one windowed pass every `cadence` simulation steps.
    pub cadence: u32,
    /// Half of the window size in world pixels, centred on the focus point.
    pub half_extent: Vec2,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            cadence: 3,
            half_extent: Vec2::new(320.0, 192.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub size: Vec2,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(36.0, 64.0),
        }
    }
}

impl SimConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "world dimensions must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if !self.physics.gravity.is_finite() {
            return Err(ConfigError::Invalid("gravity must be finite".into()));
        }
        if self.physics.collision_expanse <= 0.0 {
            return Err(ConfigError::Invalid(
                "collision_expanse must be positive".into(),
            ));
        }
        if self.ticker.cadence == 0 {
            return Err(ConfigError::Invalid("ticker cadence must be at least 1".into()));
        }
        if self.player.size.x <= 0.0 || self.player.size.y <= 0.0 {
            return Err(ConfigError::Invalid("player size must be positive".into()));
        }
        Ok(())
    }
}
