// Launch controller: press input routing, touch spring & projectile pin joints.
//
// A press on the catapult arm attaches a spring from a kinematic touch anchor to the arm and
// pins a freshly spawned projectile into the bucket. Dragging moves the anchor (loading the arm's
// spring against the cantilever); releasing removes both joints so the arm snaps forward.
//
// Depends on:
//  - GameSession (game_state) for game-over gating & lives
//  - CameraTarget (projectile) to hand the projectile to the camera
//  - FollowCamera (camera) to map screen positions into the world

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

use crate::plugins::camera::FollowCamera;
use crate::plugins::config::{GameConfig, LaunchConfig};
use crate::plugins::contact::BodyCategory;
use crate::plugins::core_sim::GameplaySet;
use crate::plugins::game_state::GameSession;
use crate::plugins::projectile::{CameraTarget, Projectile};

/// The swinging catapult arm.
#[derive(Component, Debug, Clone, Copy)]
pub struct LaunchArm {
    pub half_extents: Vec2,
}

/// Mass-less body that follows the pointer while pressed.
#[derive(Component, Debug)]
pub struct TouchAnchor;

/// Bodies making up the catapult, resolved once when the world is built.
#[derive(Resource, Debug)]
pub struct LaunchRig {
    pub base: Entity,
    pub arm: Entity,
    pub cantilever: Entity,
    pub touch_anchor: Entity,
    /// Projectile pinned to the arm while the touch spring is attached.
    pub loaded: Option<Entity>,
}
impl LaunchRig {
    pub fn new(base: Entity, arm: Entity, cantilever: Entity, touch_anchor: Entity) -> Self {
        Self { base, arm, cantilever, touch_anchor, loaded: None }
    }
    pub fn is_pulling(&self) -> bool {
        self.loaded.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressSource {
    Mouse,
    Touch(u64),
}

/// Single tracked press stream; extra touches are ignored until the owner lifts.
#[derive(Resource, Debug, Default)]
pub struct PressTracker {
    pub source: Option<PressSource>,
}
impl PressTracker {
    pub fn begin(&mut self, source: PressSource) -> bool {
        if self.source.is_some() {
            return false;
        }
        self.source = Some(source);
        true
    }
    pub fn owns(&self, source: PressSource) -> bool {
        self.source == Some(source)
    }
    pub fn end(&mut self, source: PressSource) -> bool {
        if !self.owns(source) {
            return false;
        }
        self.source = None;
        true
    }
}

/// Press stream in world coordinates.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PressEvent {
    Started(Vec2),
    Moved(Vec2),
    Ended,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct LaunchEvent {
    pub pos: Vec2,
    pub power: bool,
}

/// Spring stiffness giving `frequency` Hz oscillation for `mass`.
pub fn spring_stiffness(mass: f32, frequency: f32) -> f32 {
    let omega = std::f32::consts::TAU * frequency;
    mass * omega * omega
}

pub fn world_to_local(t: &Transform, point: Vec2) -> Vec2 {
    let rel = (point - t.translation.truncate()).extend(0.0);
    (t.rotation.inverse() * rel).truncate()
}

/// Point-in-oriented-rectangle test for the arm sprite.
pub fn arm_contains(t: &Transform, arm: &LaunchArm, point: Vec2) -> bool {
    let local = world_to_local(t, point);
    local.x.abs() <= arm.half_extents.x && local.y.abs() <= arm.half_extents.y
}

pub fn touch_spring(cfg: &LaunchConfig, arm_anchor: Vec2) -> SpringJoint {
    let k = spring_stiffness(cfg.arm_mass, cfg.touch_spring_frequency);
    SpringJointBuilder::new(0.0, k, cfg.spring_damping)
        .local_anchor1(arm_anchor)
        .local_anchor2(Vec2::ZERO)
        .build()
}

pub fn bucket_pin(arm_anchor: Vec2) -> RevoluteJoint {
    RevoluteJointBuilder::new()
        .local_anchor1(arm_anchor)
        .local_anchor2(Vec2::ZERO)
        .build()
}

pub struct LaunchPlugin;
impl Plugin for LaunchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PressTracker>()
            .init_resource::<CameraTarget>()
            .add_event::<PressEvent>()
            .add_event::<LaunchEvent>()
            .add_systems(Update, (route_press_input, handle_press_events)
                .chain()
                .in_set(GameplaySet::Input));
    }
}

// ---------------- Input routing ----------------

fn route_press_input(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_cam: Query<(&Camera, &GlobalTransform), With<FollowCamera>>,
    mut tracker: ResMut<PressTracker>,
    mut ev_press: EventWriter<PressEvent>,
) {
    let Ok((cam, cam_t)) = q_cam.get_single() else { return; };
    let to_world = |p: Vec2| cam.viewport_to_world_2d(cam_t, p);

    if let Some(touches) = touches {
        for touch in touches.iter_just_pressed() {
            let Some(pos) = to_world(touch.position()) else { continue; };
            if tracker.begin(PressSource::Touch(touch.id())) {
                ev_press.send(PressEvent::Started(pos));
            }
        }
        if let Some(PressSource::Touch(id)) = tracker.source {
            if let Some(pos) = touches.get_pressed(id).and_then(|t| to_world(t.position())) {
                ev_press.send(PressEvent::Moved(pos));
            }
        }
        for touch in touches.iter_just_released().chain(touches.iter_just_canceled()) {
            if tracker.end(PressSource::Touch(touch.id())) {
                ev_press.send(PressEvent::Ended);
            }
        }
    }

    let Some(buttons) = buttons else { return; };
    let cursor = q_window
        .get_single()
        .ok()
        .and_then(|w| w.cursor_position())
        .and_then(to_world);
    if buttons.just_pressed(MouseButton::Left) {
        if let Some(pos) = cursor {
            if tracker.begin(PressSource::Mouse) {
                ev_press.send(PressEvent::Started(pos));
            }
        }
    } else if buttons.pressed(MouseButton::Left) && tracker.owns(PressSource::Mouse) {
        if let Some(pos) = cursor {
            ev_press.send(PressEvent::Moved(pos));
        }
    }
    if buttons.just_released(MouseButton::Left) && tracker.end(PressSource::Mouse) {
        ev_press.send(PressEvent::Ended);
    }
}

// ---------------- Launch controller ----------------

#[allow(clippy::too_many_arguments)]
pub fn handle_press_events(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    rig: Option<ResMut<LaunchRig>>,
    mut session: ResMut<GameSession>,
    mut target: ResMut<CameraTarget>,
    q_arm: Query<(&Transform, &LaunchArm)>,
    mut q_anchor: Query<&mut Transform, (With<TouchAnchor>, Without<LaunchArm>)>,
    mut ev_press: EventReader<PressEvent>,
    mut ev_launch: EventWriter<LaunchEvent>,
) {
    let Some(mut rig) = rig else {
        ev_press.clear();
        return;
    };
    for press in ev_press.read() {
        if session.is_game_over {
            debug!("press ignored: game over");
            continue;
        }
        match *press {
            PressEvent::Started(pos) => {
                if rig.is_pulling() || target.entity.is_some() {
                    debug!("press ignored: projectile already in play");
                    continue;
                }
                let Ok((arm_t, arm)) = q_arm.get(rig.arm) else { continue; };
                if !arm_contains(arm_t, arm, pos) {
                    continue;
                }

                // Touch anchor -> arm spring.
                if let Ok(mut anchor_t) = q_anchor.get_mut(rig.touch_anchor) {
                    anchor_t.translation = pos.extend(anchor_t.translation.z);
                }
                let grab = world_to_local(arm_t, pos);
                commands
                    .entity(rig.touch_anchor)
                    .insert(ImpulseJoint::new(rig.arm, touch_spring(&cfg.launch, grab)));

                // Projectile pinned into the bucket.
                let power = session.load_projectile(cfg.launch.power_on_last_projectile);
                let spawn = arm_t.translation.truncate() + cfg.launch.bucket_offset.to_vec2();
                let bucket = world_to_local(arm_t, spawn);
                let projectile = spawn_projectile(&mut commands, &cfg.launch, spawn, power);
                commands
                    .entity(projectile)
                    .insert(ImpulseJoint::new(rig.arm, bucket_pin(bucket)));

                rig.loaded = Some(projectile);
                target.entity = Some(projectile);
                info!("LOAD projectile power={power} at ({:.1},{:.1})", spawn.x, spawn.y);
            }
            PressEvent::Moved(pos) => {
                if !rig.is_pulling() {
                    continue;
                }
                if let Ok(mut anchor_t) = q_anchor.get_mut(rig.touch_anchor) {
                    anchor_t.translation = pos.extend(anchor_t.translation.z);
                }
            }
            PressEvent::Ended => {
                let Some(projectile) = rig.loaded.take() else {
                    debug!("release ignored: nothing loaded");
                    continue;
                };
                commands.entity(rig.touch_anchor).remove::<ImpulseJoint>();
                if let Some(mut ec) = commands.get_entity(projectile) {
                    ec.remove::<ImpulseJoint>();
                }
                session.consume_projectile();
                let pos = q_arm.get(rig.arm).map(|(t, _)| t.translation.truncate()).unwrap_or_default();
                info!("LAUNCH power={} lives={}", session.is_power_projectile, session.lives);
                ev_launch.send(LaunchEvent { pos, power: session.is_power_projectile });
            }
        }
    }
}

pub fn spawn_projectile(commands: &mut Commands, cfg: &LaunchConfig, pos: Vec2, power: bool) -> Entity {
    let color = if power { Color::srgb(0.95, 0.35, 0.20) } else { Color::srgb(0.12, 0.12, 0.16) };
    let size = Vec2::splat(cfg.projectile_radius * 2.0);
    commands
        .spawn((
            SpriteBundle {
                sprite: Sprite { color, custom_size: Some(size), ..default() },
                transform: Transform::from_translation(pos.extend(2.0)),
                ..default()
            },
            Projectile { power },
            BodyCategory::Projectile,
            RigidBody::Dynamic,
            Collider::ball(cfg.projectile_radius),
            Ccd::enabled(),
            ActiveEvents::CONTACT_FORCE_EVENTS,
            // Every touch is reported so a gentle bump still powers up.
            ContactForceEventThreshold(0.0),
            Velocity::zero(),
        ))
        .id()
}
