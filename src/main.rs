use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use peeved_penguins::prelude::*;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.52, 0.80, 0.92)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Peeved Penguins".into(),
                resolution: (568.0, 320.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(100.0))
        .add_plugins(ConfigPlugin)       // tuning (must precede GameStatePlugin)
        .add_plugins(CoreSimPlugin)      // timing + frame ordering
        .add_plugins(GameStatePlugin)    // lives / score / levels
        .add_plugins(ScenePlugin)        // camera, ground, catapult rig
        .add_plugins(LevelPlugin)        // level catalog + level root
        .add_plugins(LaunchPlugin)       // press input & joints
        .add_plugins(ProjectilePlugin)   // settle detection
        .add_plugins(ContactPlugin)      // impulse thresholds
        .add_plugins(TargetPlugin)       // destruction + scoring
        .add_plugins(CameraPlugin)       // camera follow / return
        .add_plugins(EffectsPlugin)      // destruction bursts
        .add_plugins(GameAudioPlugin)    // optional sounds
        .add_plugins(HudPlugin)          // score text, game over, restart
        .run();
}
