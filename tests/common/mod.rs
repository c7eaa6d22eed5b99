#![allow(dead_code)]
use bevy::prelude::*;
use peeved_penguins::plugins::config::ContactConfig;
use peeved_penguins::prelude::*;

/// Contact thresholds used by the scenarios: seal 0.8, block 10.0, no spawn grace.
/// Hand-built contacts use unit masses, so the impulse is the strike itself.
pub fn test_config() -> GameConfig {
    GameConfig {
        contact: ContactConfig {
            seal_threshold: 0.8,
            block_threshold: 10.0,
            spawn_grace: 0.0,
            ..ContactConfig::default()
        },
        ..GameConfig::default()
    }
}

/// Headless gameplay app: no window, no renderer, no physics stepping.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(test_config())
        .add_plugins(ConfigPlugin)
        .add_plugins(CoreSimPlugin)
        .add_plugins(GameStatePlugin);
    app
}

pub fn count_events<E: Event>(app: &App) -> usize {
    let events = app.world().resource::<Events<E>>();
    let mut reader = events.get_reader();
    reader.read(events).count()
}

pub fn last_event<E: Event + Copy>(app: &App) -> Option<E> {
    let events = app.world().resource::<Events<E>>();
    let mut reader = events.get_reader();
    reader.read(events).last().copied()
}

pub fn spawn_target(app: &mut App, kind: TargetKind, pos: Vec2) -> Entity {
    let category = match kind {
        TargetKind::Seal => BodyCategory::Seal,
        TargetKind::Block => BodyCategory::Block,
    };
    let t = Transform::from_translation(pos.extend(0.0));
    app.world_mut()
        .spawn((Target { kind }, category, t, GlobalTransform::from(t)))
        .id()
}

pub fn contact(a: Entity, ca: BodyCategory, b: Entity, cb: BodyCategory, impulse: f32) -> ContactEvent {
    ContactEvent {
        body_a: a,
        body_b: b,
        category_a: ca,
        category_b: cb,
        impulse,
        mass_a: 1.0,
        mass_b: 1.0,
    }
}
