// Scorable targets (seals & blocks) and their one-shot destruction.
use bevy::prelude::*;
use bevy::utils::HashSet;

use crate::plugins::config::{ContactConfig, GameConfig};
use crate::plugins::core_sim::GameplaySet;
use crate::plugins::game_state::GameSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Seal,
    Block,
}

impl TargetKind {
    /// Minimum collision impulse (exclusive) that destroys this kind.
    pub fn threshold(self, cfg: &ContactConfig) -> f32 {
        match self {
            TargetKind::Seal => cfg.seal_threshold,
            TargetKind::Block => cfg.block_threshold,
        }
    }

    pub fn score(self, cfg: &ContactConfig) -> u32 {
        match self {
            TargetKind::Seal => cfg.seal_score,
            TargetKind::Block => cfg.block_score,
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Target {
    pub kind: TargetKind,
}

/// Freshly spawned target still settling onto the level; strikes are ignored until
/// the sim clock reaches `until_tick`.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpawnGrace {
    pub until_tick: u64,
}

/// Request to remove a target from the world. Repeats for the same target are ignored.
#[derive(Event, Debug, Clone, Copy)]
pub struct DestroyTargetEvent {
    pub entity: Entity,
    pub kind: TargetKind,
}

/// A target was removed; effects & sounds key off this.
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetDestroyedEvent {
    pub pos: Vec2,
    pub kind: TargetKind,
}

pub struct TargetPlugin;
impl Plugin for TargetPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DestroyTargetEvent>()
            .add_event::<TargetDestroyedEvent>()
            .add_systems(Update, destroy_targets
                .after(crate::plugins::contact::resolve_contacts)
                .in_set(GameplaySet::Contacts));
    }
}

pub fn destroy_targets(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut session: ResMut<GameSession>,
    mut ev_destroy: EventReader<DestroyTargetEvent>,
    q_target: Query<(&Target, &GlobalTransform)>,
    mut ev_destroyed: EventWriter<TargetDestroyedEvent>,
) {
    if session.is_game_over {
        // The world is frozen until restart rebuilds the level.
        ev_destroy.clear();
        return;
    }
    let mut removed: HashSet<Entity> = HashSet::default();
    for req in ev_destroy.read() {
        if !removed.insert(req.entity) {
            continue;
        }
        // Already despawned in an earlier frame.
        let Ok((target, gt)) = q_target.get(req.entity) else { continue; };

        let points = target.kind.score(&cfg.contact);
        match target.kind {
            TargetKind::Seal => session.record_seal_kill(points),
            TargetKind::Block => session.award(points),
        }
        let pos = gt.translation().truncate();
        info!(
            "DESTROY {:?} at ({:.1},{:.1}) score={} seals={}/{}",
            target.kind, pos.x, pos.y, session.score, session.seals_killed, session.seals_needed
        );
        ev_destroyed.send(TargetDestroyedEvent { pos, kind: target.kind });
        commands.entity(req.entity).despawn_recursive();
    }
}
