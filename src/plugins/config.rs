// Tuning configuration loaded from assets/config/game.ron (falls back to defaults).
use bevy::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::fs;

pub const CONFIG_PATH: &str = "assets/config/game.ron";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Vec2Def { pub x: f32, pub y: f32 }
impl Vec2Def { pub fn to_vec2(self) -> Vec2 { Vec2::new(self.x, self.y) } }

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct LaunchConfig {
    pub bucket_offset: Vec2Def,   // projectile spawn point relative to the arm origin
    pub arm_mass: f32,
    pub arm_spring_frequency: f32, // Hz, arm <-> cantilever
    pub touch_spring_frequency: f32, // Hz, touch anchor <-> arm
    pub spring_damping: f32,
    pub projectile_radius: f32,
    pub power_on_last_projectile: bool,
}
impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            bucket_offset: Vec2Def { x: 32.0, y: 50.0 },
            arm_mass: 0.5,
            arm_spring_frequency: 1.5,
            touch_spring_frequency: 4.0,
            spring_damping: 0.2,
            projectile_radius: 14.0,
            power_on_last_projectile: true,
        }
    }
}

/// Strike thresholds are the velocity change (px/s) one contact step gives the target,
/// i.e. collision impulse divided by the target's mass. Resting on the ground gives about
/// g * dt (16 px/s); a launched penguin hitting a seal head-on gives several hundred.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ContactConfig {
    pub seal_threshold: f32,
    pub block_threshold: f32,
    pub seal_score: u32,
    pub block_score: u32,
    pub power_scale: f32,
    pub spawn_grace: f32, // seconds a freshly spawned target cannot be destroyed
}
impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            seal_threshold: 250.0,
            block_threshold: 450.0,
            seal_score: 5000,
            block_score: 1000,
            power_scale: 1.6,
            spawn_grace: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct LifecycleConfig {
    pub settle_speed: f32,
    pub kill_floor: f32,
}
impl Default for LifecycleConfig {
    fn default() -> Self {
        Self { settle_speed: 0.18, kill_floor: -400.0 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct CameraConfig {
    pub min_x: f32,
    pub max_x: f32,
    pub home_x: f32,
    pub return_delay: f32,    // seconds
    pub return_duration: f32, // seconds
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self { min_x: 283.0, max_x: 677.0, home_x: 284.0, return_delay: 0.5, return_duration: 1.5 }
    }
}

/// What happens to the score when a game over is restarted.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreResetPolicy {
    /// Restore the score reached when the last level was completed.
    #[default]
    Checkpoint,
    /// Start again from zero.
    Zero,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ProgressionConfig {
    pub lives: u32,
    pub score_reset: ScoreResetPolicy,
}
impl Default for ProgressionConfig {
    fn default() -> Self {
        Self { lives: 3, score_reset: ScoreResetPolicy::Checkpoint }
    }
}

#[derive(Resource, Debug, Deserialize, Clone, Copy, Default)]
#[serde(default)]
pub struct GameConfig {
    pub launch: LaunchConfig,
    pub contact: ContactConfig,
    pub lifecycle: LifecycleConfig,
    pub camera: CameraConfig,
    pub progression: ProgressionConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(ron::error::SpannedError),
    Invalid(&'static str),
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "parse error: {e}"),
            ConfigError::Invalid(why) => write!(f, "invalid config: {why}"),
        }
    }
}
impl std::error::Error for ConfigError {}

impl GameConfig {
    pub fn from_ron(data: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = ron::from_str(data).map_err(ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contact.block_threshold <= self.contact.seal_threshold {
            return Err(ConfigError::Invalid("block_threshold must be above seal_threshold"));
        }
        if self.contact.seal_threshold <= 0.0 {
            return Err(ConfigError::Invalid("seal_threshold must be positive"));
        }
        if self.contact.spawn_grace < 0.0 {
            return Err(ConfigError::Invalid("spawn_grace must be non-negative"));
        }
        if self.camera.min_x > self.camera.max_x {
            return Err(ConfigError::Invalid("camera min_x exceeds max_x"));
        }
        if self.progression.lives == 0 {
            return Err(ConfigError::Invalid("lives must be at least 1"));
        }
        if self.camera.return_duration < 0.0 || self.camera.return_delay < 0.0 {
            return Err(ConfigError::Invalid("camera timings must be non-negative"));
        }
        Ok(())
    }
}

pub struct ConfigPlugin;
impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        // Tests and tools may insert their own config first.
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(load_config());
        }
    }
}

fn load_config() -> GameConfig {
    let Ok(data) = fs::read_to_string(CONFIG_PATH) else {
        info!("No config at {CONFIG_PATH}, using defaults");
        return GameConfig::default();
    };
    match GameConfig::from_ron(&data) {
        Ok(cfg) => {
            info!("Loaded config from {CONFIG_PATH}");
            cfg
        }
        Err(e) => {
            error!("Failed to load {CONFIG_PATH}: {e}; using defaults");
            GameConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = GameConfig::from_ron("(contact: (seal_threshold: 300.0))").unwrap();
        assert_eq!(cfg.contact.seal_threshold, 300.0);
        assert_eq!(cfg.contact.block_threshold, 450.0);
        assert_eq!(cfg.contact.spawn_grace, 1.0);
        assert_eq!(cfg.progression.lives, 3);
        assert_eq!(cfg.progression.score_reset, ScoreResetPolicy::Checkpoint);
    }

    #[test]
    fn block_threshold_must_exceed_seal_threshold() {
        let err = GameConfig::from_ron("(contact: (seal_threshold: 500.0, block_threshold: 450.0))");
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
        let err = GameConfig::from_ron("(contact: (spawn_grace: -1.0))");
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn score_policy_is_named_in_file() {
        let cfg = GameConfig::from_ron("(progression: (score_reset: Zero))").unwrap();
        assert_eq!(cfg.progression.score_reset, ScoreResetPolicy::Zero);
    }
}
