// Static world: camera, ground and the catapult rig (base, arm, cantilever, touch anchor).
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::plugins::camera::FollowCamera;
use crate::plugins::config::GameConfig;
use crate::plugins::contact::BodyCategory;
use crate::plugins::launch::{spring_stiffness, LaunchArm, LaunchRig, TouchAnchor};

// Layout in world units (ground surface at y = 0).
const GROUND_CENTER: Vec2 = Vec2::new(480.0, -20.0);
const GROUND_HALF: Vec2 = Vec2::new(720.0, 20.0);
const BASE_POS: Vec2 = Vec2::new(200.0, 40.0);
const BASE_SIZE: Vec2 = Vec2::new(60.0, 80.0);
const ARM_PIVOT: Vec2 = Vec2::new(210.0, 105.0);
const ARM_POS: Vec2 = Vec2::new(215.0, 150.0);
const ARM_HALF: Vec2 = Vec2::new(12.0, 55.0);
const ARM_SPRING_ANCHOR: Vec2 = Vec2::new(15.0, 30.0); // arm-local
const CANTILEVER_POS: Vec2 = Vec2::new(180.0, 180.0);
const CAMERA_Y: f32 = 160.0;

pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_world);
    }
}

fn setup_world(mut commands: Commands, cfg: Res<GameConfig>) {
    commands.spawn((
        Camera2dBundle {
            transform: Transform::from_xyz(cfg.camera.home_x, CAMERA_Y, 100.0),
            ..default()
        },
        FollowCamera,
    ));

    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: Color::srgb(0.85, 0.92, 0.97),
                custom_size: Some(GROUND_HALF * 2.0),
                ..default()
            },
            transform: Transform::from_translation(GROUND_CENTER.extend(0.0)),
            ..default()
        },
        BodyCategory::Other,
        RigidBody::Fixed,
        Collider::cuboid(GROUND_HALF.x, GROUND_HALF.y),
        Name::new("Ground"),
    ));

    let rig = spawn_catapult(&mut commands, &cfg);
    commands.insert_resource(rig);
}

pub fn spawn_catapult(commands: &mut Commands, cfg: &GameConfig) -> LaunchRig {
    // Base and cantilever carry no collider: they only anchor joints.
    let base = commands
        .spawn((
            SpriteBundle {
                sprite: Sprite { color: Color::srgb(0.45, 0.30, 0.18), custom_size: Some(BASE_SIZE), ..default() },
                transform: Transform::from_translation(BASE_POS.extend(0.5)),
                ..default()
            },
            RigidBody::Fixed,
            Name::new("CatapultBase"),
        ))
        .id();

    let cantilever = commands
        .spawn((
            TransformBundle::from_transform(Transform::from_translation(CANTILEVER_POS.extend(0.0))),
            RigidBody::Fixed,
            Name::new("Cantilever"),
        ))
        .id();

    let arm = commands
        .spawn((
            SpriteBundle {
                sprite: Sprite { color: Color::srgb(0.55, 0.38, 0.22), custom_size: Some(ARM_HALF * 2.0), ..default() },
                transform: Transform::from_translation(ARM_POS.extend(1.0)),
                ..default()
            },
            LaunchArm { half_extents: ARM_HALF },
            BodyCategory::Other,
            RigidBody::Dynamic,
            Collider::cuboid(ARM_HALF.x, ARM_HALF.y),
            ColliderMassProperties::Mass(cfg.launch.arm_mass),
            GravityScale(0.0),
            Ccd::enabled(),
            Velocity::zero(),
            ImpulseJoint::new(
                base,
                RevoluteJointBuilder::new()
                    .local_anchor1(ARM_PIVOT - BASE_POS)
                    .local_anchor2(ARM_PIVOT - ARM_POS)
                    .build(),
            ),
            Name::new("CatapultArm"),
        ))
        .id();

    // Second joint on the arm lives on a child entity.
    let rest_length = (ARM_POS + ARM_SPRING_ANCHOR).distance(CANTILEVER_POS);
    let stiffness = spring_stiffness(cfg.launch.arm_mass, cfg.launch.arm_spring_frequency);
    commands.entity(arm).with_children(|parent| {
        parent.spawn((
            TransformBundle::default(),
            ImpulseJoint::new(
                cantilever,
                SpringJointBuilder::new(rest_length, stiffness, cfg.launch.spring_damping)
                    .local_anchor1(Vec2::ZERO)
                    .local_anchor2(ARM_SPRING_ANCHOR)
                    .build(),
            ),
            Name::new("ArmSpring"),
        ));
    });

    let touch_anchor = commands
        .spawn((
            TransformBundle::from_transform(Transform::from_translation(ARM_POS.extend(0.0))),
            RigidBody::KinematicPositionBased,
            TouchAnchor,
            Name::new("TouchAnchor"),
        ))
        .id();

    LaunchRig::new(base, arm, cantilever, touch_anchor)
}
