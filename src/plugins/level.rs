// Level loading (RON) & level root rebuilds.
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::plugins::config::{GameConfig, Vec2Def};
use crate::plugins::contact::{strike_force_threshold, BodyCategory};
use crate::plugins::core_sim::{GameplaySet, SimClock};
use crate::plugins::game_state::{seals_needed, GameSession, ReloadLevelEvent, MAX_LEVEL};
use crate::plugins::target::{SpawnGrace, Target, TargetKind};

pub const LEVEL_DIR: &str = "assets/levels";

// ----------------------- Level Definition (RON) -----------------------

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SealDef {
    pub pos: Vec2Def,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct BlockDef {
    pub pos: Vec2Def,
    pub size: Vec2Def,
    #[serde(default)]
    pub angle_deg: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelDef {
    pub name: String,
    #[serde(default = "default_seal_radius")]
    pub seal_radius: f32,
    pub seals: Vec<SealDef>,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

fn default_seal_radius() -> f32 { 18.0 }

#[derive(Debug)]
pub enum LevelLoadError {
    Missing { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: ron::error::SpannedError },
    TooFewSeals { level: u32, found: usize, needed: u32 },
}

impl fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelLoadError::Missing { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            LevelLoadError::Parse { path, source } => write!(f, "cannot parse {}: {source}", path.display()),
            LevelLoadError::TooFewSeals { level, found, needed } => {
                write!(f, "level {level} has {found} seals but needs {needed}")
            }
        }
    }
}

impl std::error::Error for LevelLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelLoadError::Missing { source, .. } => Some(source),
            LevelLoadError::Parse { source, .. } => Some(source),
            LevelLoadError::TooFewSeals { .. } => None,
        }
    }
}

pub fn level_path(dir: &Path, level: u32) -> PathBuf {
    dir.join(format!("level{level}.ron"))
}

impl LevelDef {
    pub fn load(dir: &Path, level: u32) -> Result<Self, LevelLoadError> {
        let path = level_path(dir, level);
        let data = fs::read_to_string(&path)
            .map_err(|source| LevelLoadError::Missing { path: path.clone(), source })?;
        let def: LevelDef = ron::from_str(&data)
            .map_err(|source| LevelLoadError::Parse { path, source })?;
        def.validate(level)?;
        Ok(def)
    }

    pub fn validate(&self, level: u32) -> Result<(), LevelLoadError> {
        let needed = seals_needed(level);
        if self.seals.len() < needed as usize {
            return Err(LevelLoadError::TooFewSeals { level, found: self.seals.len(), needed });
        }
        Ok(())
    }
}

/// Every level definition, loaded up front so a missing file fails at startup.
#[derive(Resource, Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<LevelDef>,
}

impl LevelCatalog {
    pub fn load_dir(dir: &Path) -> Result<Self, LevelLoadError> {
        let levels = (1..=MAX_LEVEL)
            .map(|level| LevelDef::load(dir, level))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { levels })
    }

    pub fn get(&self, level: u32) -> Option<&LevelDef> {
        let idx = level.clamp(1, MAX_LEVEL) as usize - 1;
        self.levels.get(idx)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

// ----------------------- Components / Plugin -----------------------

/// Parent of every level-owned entity; rebuilt on reload.
#[derive(Component)]
pub struct LevelRoot;

pub struct LevelPlugin;
impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>()
            .add_event::<ReloadLevelEvent>()
            .add_systems(Startup, load_levels)
            .add_systems(Startup, spawn_initial_level.after(load_levels))
            .add_systems(Update, reload_level.in_set(GameplaySet::Presentation));
    }
}

// ----------------------- Systems -----------------------

fn load_levels(mut commands: Commands, mut exit: EventWriter<AppExit>) {
    match LevelCatalog::load_dir(Path::new(LEVEL_DIR)) {
        Ok(catalog) => {
            info!("Loaded {} levels from {LEVEL_DIR}", catalog.len());
            commands.insert_resource(catalog);
        }
        Err(e) => {
            error!("Level load failed: {e}");
            exit.send(AppExit::error());
        }
    }
}

fn spawn_initial_level(
    mut commands: Commands,
    catalog: Option<Res<LevelCatalog>>,
    cfg: Res<GameConfig>,
    clock: Res<SimClock>,
    session: Res<GameSession>,
) {
    let root = commands.spawn((SpatialBundle::default(), LevelRoot, Name::new("LevelRoot"))).id();
    let Some(def) = catalog.as_ref().and_then(|c| c.get(session.level)) else { return; };
    spawn_level_contents(&mut commands, root, def, &cfg, &clock);
}

pub fn reload_level(
    mut commands: Commands,
    catalog: Option<Res<LevelCatalog>>,
    cfg: Res<GameConfig>,
    clock: Res<SimClock>,
    q_root: Query<Entity, With<LevelRoot>>,
    mut ev_reload: EventReader<ReloadLevelEvent>,
) {
    // Only the latest request matters.
    let Some(req) = ev_reload.read().last().copied() else { return; };
    let Ok(root) = q_root.get_single() else { return; };
    let Some(def) = catalog.as_ref().and_then(|c| c.get(req.level)) else {
        warn!("no definition for level {}", req.level);
        return;
    };
    commands.entity(root).despawn_descendants();
    spawn_level_contents(&mut commands, root, def, &cfg, &clock);
    info!("LEVEL {} loaded: {}", req.level, def.name);
}

// Colliders keep Rapier's default density of 1 per square pixel.
pub fn seal_mass(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}

pub fn block_mass(size: Vec2) -> f32 {
    size.x * size.y
}

pub fn spawn_level_contents(
    commands: &mut Commands,
    root: Entity,
    def: &LevelDef,
    cfg: &GameConfig,
    clock: &SimClock,
) {
    let grace = SpawnGrace { until_tick: clock.deadline(cfg.contact.spawn_grace) };
    let seal_force = strike_force_threshold(cfg.contact.seal_threshold, seal_mass(def.seal_radius));
    commands.entity(root).with_children(|parent| {
        for seal in &def.seals {
            parent.spawn((
                SpriteBundle {
                    sprite: Sprite {
                        color: Color::srgb(0.55, 0.60, 0.70),
                        custom_size: Some(Vec2::splat(def.seal_radius * 2.0)),
                        ..default()
                    },
                    transform: Transform::from_translation(seal.pos.to_vec2().extend(1.0)),
                    ..default()
                },
                Target { kind: TargetKind::Seal },
                BodyCategory::Seal,
                RigidBody::Dynamic,
                Collider::ball(def.seal_radius),
                ActiveEvents::CONTACT_FORCE_EVENTS,
                ContactForceEventThreshold(seal_force),
                ReadMassProperties::default(),
                Velocity::zero(),
                grace,
            ));
        }
        for block in &def.blocks {
            let size = block.size.to_vec2();
            let block_force = strike_force_threshold(cfg.contact.block_threshold, block_mass(size));
            parent.spawn((
                SpriteBundle {
                    sprite: Sprite {
                        color: Color::srgb(0.62, 0.45, 0.28),
                        custom_size: Some(size),
                        ..default()
                    },
                    transform: Transform::from_translation(block.pos.to_vec2().extend(1.0))
                        .with_rotation(Quat::from_rotation_z(block.angle_deg.to_radians())),
                    ..default()
                },
                Target { kind: TargetKind::Block },
                BodyCategory::Block,
                RigidBody::Dynamic,
                Collider::cuboid(size.x * 0.5, size.y * 0.5),
                ActiveEvents::CONTACT_FORCE_EVENTS,
                ContactForceEventThreshold(block_force),
                ReadMassProperties::default(),
                Velocity::zero(),
                grace,
            ));
        }
    });
}
