// Projectile lifecycle: camera target tracking, settle detection and retirement.
use bevy::prelude::*;
use bevy_rapier2d::prelude::{ImpulseJoint, RigidBody, Velocity};

use crate::plugins::config::GameConfig;
use crate::plugins::core_sim::GameplaySet;
use crate::plugins::launch::LaunchArm;

#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    pub power: bool,
}

/// Projectile the camera follows. At most one at a time.
#[derive(Resource, Debug, Default)]
pub struct CameraTarget {
    pub entity: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireReason {
    Settled,
    OutOfWorld,
    Lost, // despawned by something else (e.g. level rebuild)
}

#[derive(Event, Debug, Clone, Copy)]
pub struct TurnEndedEvent {
    pub reason: RetireReason,
}

/// Two bodies connected by a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointLink {
    pub body1: Entity,
    pub body2: Entity,
}

pub fn attached_joint_count(body: Entity, links: impl IntoIterator<Item = JointLink>) -> usize {
    links.into_iter().filter(|l| l.body1 == body || l.body2 == body).count()
}

/// Came to rest: nothing holds it and it barely moves.
pub fn is_settled(joint_count: usize, speed: f32, settle_speed: f32) -> bool {
    joint_count == 0 && speed < settle_speed
}

pub struct ProjectilePlugin;
impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraTarget>()
            .add_event::<TurnEndedEvent>()
            .add_systems(Update, retire_projectile.in_set(GameplaySet::Lifecycle));
    }
}

// A joint lives on the entity of its second body, or on a child of it when the entity has no body.
type JointQuery<'w, 's> = Query<'w, 's, (Entity, &'static ImpulseJoint, Option<&'static Parent>, Has<RigidBody>)>;

fn joint_links(q: &JointQuery) -> Vec<JointLink> {
    q.iter()
        .map(|(e, joint, parent, has_body)| {
            let body2 = match (has_body, parent) {
                (false, Some(p)) => p.get(),
                _ => e,
            };
            JointLink { body1: joint.parent, body2 }
        })
        .collect()
}

pub fn retire_projectile(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut target: ResMut<CameraTarget>,
    q_proj: Query<(&Transform, Option<&Velocity>), With<Projectile>>,
    q_joints: JointQuery,
    mut q_arm: Query<(&mut Transform, Option<&mut Velocity>), (With<LaunchArm>, Without<Projectile>)>,
    mut ev_turn: EventWriter<TurnEndedEvent>,
) {
    let Some(entity) = target.entity else { return; };

    let reason = match q_proj.get(entity) {
        Ok((t, vel)) => {
            let speed = vel.map(|v| v.linvel.length()).unwrap_or(0.0);
            let joints = attached_joint_count(entity, joint_links(&q_joints));
            if t.translation.y < cfg.lifecycle.kill_floor {
                RetireReason::OutOfWorld
            } else if is_settled(joints, speed, cfg.lifecycle.settle_speed) {
                RetireReason::Settled
            } else {
                return;
            }
        }
        Err(_) => RetireReason::Lost,
    };

    if reason != RetireReason::Lost {
        commands.entity(entity).despawn_recursive();
    }
    target.entity = None;

    for (mut t, vel) in &mut q_arm {
        t.rotation = Quat::IDENTITY;
        if let Some(mut vel) = vel {
            *vel = Velocity::zero();
        }
    }
    info!("PROJECTILE retired ({reason:?})");
    ev_turn.send(TurnEndedEvent { reason });
}
