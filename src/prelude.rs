//! Convenience re-exports for frequently used types & plugins.
pub use crate::plugins::core_sim::{SimClock, GameplaySet, CoreSimPlugin, FIXED_DT};
pub use crate::plugins::config::{GameConfig, ConfigPlugin, ScoreResetPolicy};
pub use crate::plugins::game_state::{
    GameSession, GameStatePlugin, ProgressionPhase, TurnOutcome, seals_needed, MAX_LEVEL,
    LevelCompleteEvent, GameOverEvent, RestartRequested, ReloadLevelEvent,
};
pub use crate::plugins::level::{LevelPlugin, LevelDef, LevelCatalog, LevelRoot};
pub use crate::plugins::scene::ScenePlugin;
pub use crate::plugins::launch::{LaunchPlugin, LaunchRig, LaunchArm, TouchAnchor, PressEvent, LaunchEvent};
pub use crate::plugins::projectile::{ProjectilePlugin, Projectile, CameraTarget, TurnEndedEvent, RetireReason};
pub use crate::plugins::contact::{ContactPlugin, BodyCategory, ContactEvent, PoweredUp};
pub use crate::plugins::target::{TargetPlugin, Target, TargetKind, SpawnGrace, DestroyTargetEvent, TargetDestroyedEvent};
pub use crate::plugins::camera::{CameraPlugin, FollowCamera, CameraDirector};
pub use crate::plugins::hud::HudPlugin;
pub use crate::plugins::effects::EffectsPlugin;
pub use crate::plugins::game_audio::GameAudioPlugin;
