use bevy::prelude::*;
use bevy::audio::{AudioSource, PlaybackMode, Volume};
use std::path::Path;

use crate::plugins::game_state::{GameOverEvent, LevelCompleteEvent};
use crate::plugins::launch::LaunchEvent;
use crate::plugins::target::{TargetDestroyedEvent, TargetKind};

pub struct GameAudioPlugin;

// Sounds are optional; a missing file just means silence for that cue.
#[derive(Resource, Clone, Default)]
struct SfxHandles {
    launch: Option<Handle<AudioSource>>,
    seal: Option<Handle<AudioSource>>,
    block: Option<Handle<AudioSource>>,
    game_over: Option<Handle<AudioSource>>,
    level_complete: Option<Handle<AudioSource>>,
}

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_audio_assets)
           .add_systems(Update, play_event_sfx);
    }
}

const AUDIO_DIR: &str = "assets/audio";
const CUES: [&str; 5] = ["launch", "sfx_seal", "block_break", "game_over", "level_complete"];

fn cue_file(name: &str) -> String {
    format!("audio/{name}.ogg")
}

/// Cues with no sound file under `dir`.
pub fn missing_cues(dir: &Path) -> Vec<&'static str> {
    CUES.into_iter()
        .filter(|name| !dir.join(format!("{name}.ogg")).exists())
        .collect()
}

fn load_audio_assets(mut commands: Commands, assets: Res<AssetServer>) {
    let missing = missing_cues(Path::new(AUDIO_DIR));
    if missing.len() == CUES.len() {
        info!("No sounds under {AUDIO_DIR}; audio cues are off");
    } else if !missing.is_empty() {
        info!("Audio cues off (no file under {AUDIO_DIR}): {}", missing.join(", "));
    }
    let load = |name: &str| (!missing.iter().any(|m| *m == name)).then(|| assets.load(cue_file(name)));
    commands.insert_resource(SfxHandles {
        launch: load("launch"),
        seal: load("sfx_seal"),
        block: load("block_break"),
        game_over: load("game_over"),
        level_complete: load("level_complete"),
    });
}

fn play(commands: &mut Commands, source: &Option<Handle<AudioSource>>, volume: f32) {
    let Some(source) = source else { return; };
    commands.spawn(AudioBundle {
        source: source.clone(),
        settings: PlaybackSettings {
            mode: PlaybackMode::Despawn,
            volume: Volume::new(volume),
            ..default()
        },
    });
}

fn play_event_sfx(
    sfx: Option<Res<SfxHandles>>,
    mut commands: Commands,
    mut ev_launch: EventReader<LaunchEvent>,
    mut ev_destroyed: EventReader<TargetDestroyedEvent>,
    mut ev_game_over: EventReader<GameOverEvent>,
    mut ev_level: EventReader<LevelCompleteEvent>,
) {
    let Some(sfx) = sfx else { return; };

    for e in ev_launch.read() {
        play(&mut commands, &sfx.launch, if e.power { 1.0 } else { 0.7 });
    }
    for e in ev_destroyed.read() {
        match e.kind {
            TargetKind::Seal => play(&mut commands, &sfx.seal, 0.9),
            TargetKind::Block => play(&mut commands, &sfx.block, 0.6),
        }
    }
    for _ in ev_game_over.read() {
        play(&mut commands, &sfx.game_over, 1.0);
    }
    for _ in ev_level.read() {
        play(&mut commands, &sfx.level_complete, 1.0);
    }
}
