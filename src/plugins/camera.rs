use bevy::prelude::*;

use crate::plugins::config::{CameraConfig, GameConfig};
use crate::plugins::core_sim::GameplaySet;
use crate::plugins::projectile::{CameraTarget, Projectile, TurnEndedEvent};

/// Marker component for the single side-scrolling camera.
#[derive(Component)]
pub struct FollowCamera;

/// Horizontal follow position kept inside the level edges.
pub fn clamp_follow_x(x: f32, cfg: &CameraConfig) -> f32 {
    x.clamp(cfg.min_x, cfg.max_x)
}

/// Smoothstep ease-in-out on [0, 1].
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Scheduled "return home" move: wait `delay`, then ease to `to_x` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraReturn {
    pub from_x: f32,
    pub to_x: f32,
    pub delay: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl CameraReturn {
    pub fn new(from_x: f32, cfg: &CameraConfig) -> Self {
        Self { from_x, to_x: cfg.home_x, delay: cfg.return_delay, duration: cfg.return_duration, elapsed: 0.0 }
    }

    /// Advance by `dt` seconds and return the camera x for this frame.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        self.sample()
    }

    pub fn sample(&self) -> f32 {
        let t = self.elapsed - self.delay;
        if t <= 0.0 {
            return self.from_x;
        }
        if self.duration <= 0.0 {
            return self.to_x;
        }
        self.from_x + (self.to_x - self.from_x) * ease_in_out(t / self.duration)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }
}

/// Running camera animation; a new one replaces the old.
#[derive(Resource, Debug, Default)]
pub struct CameraDirector {
    pub returning: Option<CameraReturn>,
}

pub struct CameraPlugin;
impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraDirector>()
            .init_resource::<CameraTarget>()
            .add_event::<TurnEndedEvent>()
            .add_systems(Update, camera_follow.in_set(GameplaySet::Camera));
    }
}

pub fn camera_follow(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    target: Res<CameraTarget>,
    mut director: ResMut<CameraDirector>,
    mut ev_turn: EventReader<TurnEndedEvent>,
    q_target: Query<&Transform, (With<Projectile>, Without<FollowCamera>)>,
    mut q_cam: Query<&mut Transform, With<FollowCamera>>,
) {
    let Ok(mut cam_t) = q_cam.get_single_mut() else { return; };

    if ev_turn.read().count() > 0 {
        director.returning = Some(CameraReturn::new(cam_t.translation.x, &cfg.camera));
    }

    if let Some(entity) = target.entity {
        if let Ok(t) = q_target.get(entity) {
            // Following a live projectile cancels any return move.
            director.returning = None;
            cam_t.translation.x = clamp_follow_x(t.translation.x, &cfg.camera);
        }
        return;
    }

    if let Some(anim) = director.returning.as_mut() {
        cam_t.translation.x = anim.advance(time.delta_seconds());
        if anim.finished() {
            director.returning = None;
        }
    }
}
