// Destruction effects: short particle bursts described by RON effect files.
use bevy::prelude::*;
use rand::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::plugins::core_sim::GameplaySet;
use crate::plugins::target::{TargetDestroyedEvent, TargetKind};

pub const EFFECT_DIR: &str = "assets/effects";

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct EffectDef {
    pub count: u32,
    pub lifetime: f32,
    pub speed: (f32, f32), // min..max launch speed
    pub size: f32,
    pub gravity: f32,
    pub color: (f32, f32, f32, f32),
}

#[derive(Debug)]
pub enum EffectLoadError {
    Missing { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: ron::error::SpannedError },
}
impl fmt::Display for EffectLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectLoadError::Missing { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            EffectLoadError::Parse { path, source } => write!(f, "cannot parse {}: {source}", path.display()),
        }
    }
}
impl std::error::Error for EffectLoadError {}

pub fn effect_name(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Seal => "seal_death",
        TargetKind::Block => "block_break",
    }
}

impl EffectDef {
    pub fn load(dir: &Path, name: &str) -> Result<Self, EffectLoadError> {
        let path = dir.join(format!("{name}.ron"));
        let data = fs::read_to_string(&path)
            .map_err(|source| EffectLoadError::Missing { path: path.clone(), source })?;
        ron::from_str(&data).map_err(|source| EffectLoadError::Parse { path, source })
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct EffectLibrary {
    pub seal_death: EffectDef,
    pub block_break: EffectDef,
}
impl EffectLibrary {
    pub fn load_dir(dir: &Path) -> Result<Self, EffectLoadError> {
        Ok(Self {
            seal_death: EffectDef::load(dir, effect_name(TargetKind::Seal))?,
            block_break: EffectDef::load(dir, effect_name(TargetKind::Block))?,
        })
    }
    pub fn get(&self, kind: TargetKind) -> &EffectDef {
        match kind {
            TargetKind::Seal => &self.seal_death,
            TargetKind::Block => &self.block_break,
        }
    }
}

#[derive(Component)]
struct Particle {
    lifetime: f32,
    age: f32,
    gravity: f32,
    vel: Vec2,
}

pub struct EffectsPlugin;
impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TargetDestroyedEvent>()
            .add_systems(Startup, load_effects)
            .add_systems(Update, (spawn_bursts, update_particles).in_set(GameplaySet::Presentation));
    }
}

fn load_effects(mut commands: Commands, mut exit: EventWriter<AppExit>) {
    match EffectLibrary::load_dir(Path::new(EFFECT_DIR)) {
        Ok(lib) => commands.insert_resource(lib),
        Err(e) => {
            error!("Effect load failed: {e}");
            exit.send(AppExit::error());
        }
    }
}

fn spawn_bursts(
    mut commands: Commands,
    lib: Option<Res<EffectLibrary>>,
    mut ev_destroyed: EventReader<TargetDestroyedEvent>,
) {
    let Some(lib) = lib else {
        ev_destroyed.clear();
        return;
    };
    let mut rng = rand::thread_rng();
    for ev in ev_destroyed.read() {
        let def = lib.get(ev.kind);
        let (r, g, b, a) = def.color;
        for _ in 0..def.count {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(def.speed.0..=def.speed.1.max(def.speed.0));
            commands.spawn((
                SpriteBundle {
                    sprite: Sprite {
                        color: Color::srgba(r, g, b, a),
                        custom_size: Some(Vec2::splat(def.size)),
                        ..default()
                    },
                    transform: Transform::from_translation(ev.pos.extend(5.0)),
                    ..default()
                },
                Particle {
                    lifetime: def.lifetime * rng.gen_range(0.7..1.0),
                    age: 0.0,
                    gravity: def.gravity,
                    vel: Vec2::from_angle(angle) * speed,
                },
            ));
        }
    }
}

fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Transform, &mut Sprite, &mut Particle)>,
) {
    let dt = time.delta_seconds();
    for (e, mut t, mut sprite, mut p) in &mut q {
        p.age += dt;
        if p.age >= p.lifetime {
            commands.entity(e).despawn();
            continue;
        }
        p.vel.y -= p.gravity * dt;
        t.translation += (p.vel * dt).extend(0.0);
        let alpha = 1.0 - p.age / p.lifetime;
        sprite.color.set_alpha(alpha);
    }
}
