// Real Rapier stepping with the shipped config and levels.
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::*;
use peeved_penguins::plugins::launch::spawn_projectile;
use peeved_penguins::prelude::*;

const GROUND_CENTER: Vec2 = Vec2::new(480.0, -20.0);
const GROUND_HALF: Vec2 = Vec2::new(720.0, 20.0);

fn physics_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(TransformPlugin)
        .add_plugins(HierarchyPlugin)
        .add_plugins(AssetPlugin::default())
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(100.0))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(FIXED_DT)))
        .add_plugins(ConfigPlugin)
        .add_plugins(CoreSimPlugin)
        .add_plugins(GameStatePlugin)
        .add_plugins(ContactPlugin)
        .add_plugins(TargetPlugin)
        .add_plugins(LevelPlugin);
    app.world_mut().spawn((
        TransformBundle::from_transform(Transform::from_translation(GROUND_CENTER.extend(0.0))),
        BodyCategory::Other,
        RigidBody::Fixed,
        Collider::cuboid(GROUND_HALF.x, GROUND_HALF.y),
    ));
    app
}

fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn targets(app: &mut App) -> Vec<(Entity, TargetKind, Vec2)> {
    let mut q = app.world_mut().query::<(Entity, &Target, &Transform)>();
    q.iter(app.world())
        .map(|(e, t, tf)| (e, t.kind, tf.translation.truncate()))
        .collect()
}

#[test]
fn shipped_level_rests_without_losing_targets() {
    let mut app = physics_app();
    run(&mut app, 1);
    let start = targets(&mut app);
    assert_eq!(start.len(), 5);

    // Five seconds, well past the spawn grace.
    run(&mut app, 300);

    assert_eq!(targets(&mut app).len(), start.len());
    let session = app.world().resource::<GameSession>();
    assert_eq!(session.seals_killed, 0);
    assert_eq!(session.score, 0);
    assert_eq!(session.level, 1);
}

#[test]
fn launched_projectile_kills_the_seal_it_hits() {
    let mut app = physics_app();
    run(&mut app, 90);

    let (seal, _, seal_pos) = targets(&mut app)
        .into_iter()
        .filter(|(_, kind, _)| *kind == TargetKind::Seal)
        .min_by(|a, b| a.2.x.total_cmp(&b.2.x))
        .expect("level has seals");

    let cfg = *app.world().resource::<GameConfig>();
    let start = Vec2::new(seal_pos.x - 120.0, seal_pos.y + 12.0);
    let projectile = {
        let mut commands = app.world_mut().commands();
        spawn_projectile(&mut commands, &cfg.launch, start, false)
    };
    app.world_mut().flush();
    app.world_mut()
        .entity_mut(projectile)
        .insert(Velocity::linear(Vec2::new(1000.0, 0.0)));

    run(&mut app, 30);

    assert!(app.world().get_entity(seal).is_none());
    let session = app.world().resource::<GameSession>();
    assert!(session.seals_killed >= 1);
    assert!(session.score >= 5000);
}
