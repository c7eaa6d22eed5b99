mod common;

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::{ImpulseJoint, RevoluteJointBuilder, Velocity};
use peeved_penguins::prelude::*;
use common::*;

struct Scene {
    arm: Entity,
    camera: Entity,
}

fn build_app() -> (App, Scene) {
    let mut app = headless_app();
    app.add_plugins(ProjectilePlugin).add_plugins(CameraPlugin);
    let arm = app
        .world_mut()
        .spawn((
            LaunchArm { half_extents: Vec2::new(12.0, 55.0) },
            Transform::from_rotation(Quat::from_rotation_z(0.7)),
            Velocity { linvel: Vec2::new(30.0, 0.0), angvel: 4.0 },
        ))
        .id();
    let camera = app.world_mut().spawn((FollowCamera, Transform::from_xyz(284.0, 160.0, 100.0))).id();
    (app, Scene { arm, camera })
}

fn spawn_projectile(app: &mut App, pos: Vec2, speed: f32) -> Entity {
    let e = app
        .world_mut()
        .spawn((
            Projectile { power: false },
            Transform::from_translation(pos.extend(0.0)),
            Velocity::linear(Vec2::new(speed, 0.0)),
        ))
        .id();
    app.world_mut().resource_mut::<CameraTarget>().entity = Some(e);
    e
}

fn set_speed(app: &mut App, e: Entity, speed: f32) {
    app.world_mut().get_mut::<Velocity>(e).unwrap().linvel = Vec2::new(speed, 0.0);
}

#[test]
fn pinned_projectile_never_settles() {
    let (mut app, scene) = build_app();
    let p = spawn_projectile(&mut app, Vec2::new(400.0, 30.0), 0.0);
    app.world_mut().entity_mut(p).insert(ImpulseJoint::new(scene.arm, RevoluteJointBuilder::new().build()));
    app.update();

    assert!(app.world().get_entity(p).is_some());
    assert_eq!(app.world().resource::<CameraTarget>().entity, Some(p));
    assert_eq!(count_events::<TurnEndedEvent>(&app), 0);
}

#[test]
fn joint_on_other_side_also_holds() {
    let (mut app, _) = build_app();
    let p = spawn_projectile(&mut app, Vec2::new(400.0, 30.0), 0.0);
    app.world_mut().spawn(ImpulseJoint::new(p, RevoluteJointBuilder::new().build()));
    app.update();
    assert!(app.world().get_entity(p).is_some());
}

#[test]
fn moving_projectile_does_not_settle() {
    let (mut app, _) = build_app();
    let p = spawn_projectile(&mut app, Vec2::new(400.0, 30.0), 0.18);
    app.update();
    assert!(app.world().get_entity(p).is_some());

    set_speed(&mut app, p, 0.1);
    app.update();
    assert!(app.world().get_entity(p).is_none());
    assert!(app.world().resource::<CameraTarget>().entity.is_none());
    assert_eq!(last_event::<TurnEndedEvent>(&app).unwrap().reason, RetireReason::Settled);
}

#[test]
fn settling_resets_the_arm() {
    let (mut app, scene) = build_app();
    spawn_projectile(&mut app, Vec2::new(400.0, 30.0), 0.0);
    app.update();

    let t = app.world().get::<Transform>(scene.arm).unwrap();
    assert_eq!(t.rotation, Quat::IDENTITY);
    let v = app.world().get::<Velocity>(scene.arm).unwrap();
    assert_eq!(v.linvel, Vec2::ZERO);
    assert_eq!(v.angvel, 0.0);
}

#[test]
fn falling_out_of_the_world_ends_the_turn() {
    let (mut app, _) = build_app();
    let p = spawn_projectile(&mut app, Vec2::new(400.0, -1000.0), 300.0);
    app.update();
    assert!(app.world().get_entity(p).is_none());
    assert_eq!(last_event::<TurnEndedEvent>(&app).unwrap().reason, RetireReason::OutOfWorld);
}

#[test]
fn last_turn_ends_the_game() {
    let (mut app, _) = build_app();
    app.world_mut().resource_mut::<GameSession>().lives = 0;
    spawn_projectile(&mut app, Vec2::new(400.0, 30.0), 0.0);
    app.update();

    let session = app.world().resource::<GameSession>();
    assert!(session.is_game_over);
    assert_eq!(session.lives, 3);
    assert_eq!(session.phase(), ProgressionPhase::GameOver);
    assert_eq!(count_events::<GameOverEvent>(&app), 1);
}

#[test]
fn turn_with_lives_left_keeps_playing() {
    let (mut app, _) = build_app();
    app.world_mut().resource_mut::<GameSession>().lives = 2;
    spawn_projectile(&mut app, Vec2::new(400.0, 30.0), 0.0);
    app.update();

    let session = app.world().resource::<GameSession>();
    assert!(!session.is_game_over);
    assert_eq!(session.lives, 2);
    assert_eq!(count_events::<GameOverEvent>(&app), 0);
}

#[test]
fn restart_after_game_over_reloads_level() {
    let (mut app, _) = build_app();
    {
        let mut session = app.world_mut().resource_mut::<GameSession>();
        session.score = 12_000;
        session.score_checkpoint = 9_000;
        session.level = 2;
        session.lives = 0;
    }
    spawn_projectile(&mut app, Vec2::new(400.0, 30.0), 0.0);
    app.update();
    assert!(app.world().resource::<GameSession>().is_game_over);

    app.world_mut().send_event(RestartRequested);
    app.update();

    let session = app.world().resource::<GameSession>();
    assert!(!session.is_game_over);
    assert_eq!(session.score, 9_000);
    assert_eq!(session.high_score, 12_000);
    assert_eq!(session.lives, 3);
    assert_eq!(last_event::<ReloadLevelEvent>(&app).unwrap().level, 2);
}

#[test]
fn camera_follows_within_bounds() {
    let (mut app, scene) = build_app();
    let p = spawn_projectile(&mut app, Vec2::new(700.0, 80.0), 200.0);
    app.update();
    let cam = app.world().get::<Transform>(scene.camera).unwrap();
    assert_eq!(cam.translation.x, 677.0);
    assert_eq!(cam.translation.y, 160.0);

    app.world_mut().get_mut::<Transform>(p).unwrap().translation.x = 450.0;
    app.update();
    assert_eq!(app.world().get::<Transform>(scene.camera).unwrap().translation.x, 450.0);
}

#[test]
fn camera_returns_home_after_turn() {
    let (mut app, scene) = build_app();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(250)));
    let p = spawn_projectile(&mut app, Vec2::new(700.0, 80.0), 200.0);
    app.update();
    assert_eq!(app.world().get::<Transform>(scene.camera).unwrap().translation.x, 677.0);

    set_speed(&mut app, p, 0.0);
    app.update();
    assert!(app.world().resource::<CameraDirector>().returning.is_some());
    // Still inside the delay.
    assert_eq!(app.world().get::<Transform>(scene.camera).unwrap().translation.x, 677.0);

    for _ in 0..12 {
        app.update();
    }
    assert_eq!(app.world().get::<Transform>(scene.camera).unwrap().translation.x, 284.0);
    assert!(app.world().resource::<CameraDirector>().returning.is_none());
}

#[test]
fn new_target_replaces_return_move() {
    let (mut app, scene) = build_app();
    let p = spawn_projectile(&mut app, Vec2::new(600.0, 80.0), 0.0);
    app.update();
    assert!(app.world().get_entity(p).is_none());
    assert!(app.world().resource::<CameraDirector>().returning.is_some());

    spawn_projectile(&mut app, Vec2::new(500.0, 80.0), 50.0);
    app.update();
    assert!(app.world().resource::<CameraDirector>().returning.is_none());
    assert_eq!(app.world().get::<Transform>(scene.camera).unwrap().translation.x, 500.0);
}
