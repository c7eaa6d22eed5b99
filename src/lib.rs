//! Library entry for integration tests & external tooling.
//! Exposes plugin modules and a prelude for common types.

pub mod plugins {
    pub mod core_sim;
    pub mod config;
    pub mod game_state;
    pub mod level;
    pub mod scene;
    pub mod launch;
    pub mod projectile;
    pub mod contact;
    pub mod target;
    pub mod camera;
    pub mod hud;
    pub mod effects;
    pub mod game_audio;
}
pub mod prelude;
