// Contact resolution: classify the two bodies of a contact, turn the collision impulse into the
// velocity change each target received and request destructions / power-projectile feedback.
use bevy::prelude::*;
use bevy_rapier2d::prelude::{ContactForceEvent, RapierContext, ReadMassProperties};

use crate::plugins::config::{ContactConfig, GameConfig};
use crate::plugins::core_sim::{GameplaySet, SimClock, FIXED_DT};
use crate::plugins::projectile::Projectile;
use crate::plugins::target::{DestroyTargetEvent, SpawnGrace, TargetKind};

/// What kind of world object a physics body represents.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyCategory {
    Projectile,
    Seal,
    Block,
    Other,
}

impl BodyCategory {
    pub fn target_kind(self) -> Option<TargetKind> {
        match self {
            BodyCategory::Seal => Some(TargetKind::Seal),
            BodyCategory::Block => Some(TargetKind::Block),
            _ => None,
        }
    }
}

/// One collision reported by the physics step. `impulse` is shared by both bodies;
/// a side with zero mass (unknown or immovable) is never judged.
#[derive(Event, Debug, Clone, Copy)]
pub struct ContactEvent {
    pub body_a: Entity,
    pub body_b: Entity,
    pub category_a: BodyCategory,
    pub category_b: BodyCategory,
    pub impulse: f32,
    pub mass_a: f32,
    pub mass_b: f32,
}

impl ContactEvent {
    /// Velocity change the contact gave a body of `mass`.
    pub fn strike(&self, mass: f32) -> f32 {
        if mass > 0.0 {
            self.impulse / mass
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    Ignore,
    Strike,
    /// Strike where one side is a projectile (power feedback applies).
    ProjectileStrike,
}

/// Dispatch table over the category pair.
pub fn contact_action(a: BodyCategory, b: BodyCategory) -> ContactAction {
    use BodyCategory::*;
    match (a, b) {
        (Projectile, Seal | Block) | (Seal | Block, Projectile) => ContactAction::ProjectileStrike,
        (Seal | Block, _) | (_, Seal | Block) => ContactAction::Strike,
        _ => ContactAction::Ignore,
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct ContactResolution {
    pub destroy: Vec<(Entity, TargetKind)>,
    pub projectile: Option<Entity>,
}

/// Both sides are judged independently; either, both or neither may be destroyed.
pub fn resolve_contact(ev: &ContactEvent, cfg: &ContactConfig) -> ContactResolution {
    let mut out = ContactResolution::default();
    let action = contact_action(ev.category_a, ev.category_b);
    if action == ContactAction::Ignore {
        return out;
    }
    let sides = [
        (ev.body_a, ev.category_a, ev.mass_a),
        (ev.body_b, ev.category_b, ev.mass_b),
    ];
    for (body, category, mass) in sides {
        if let Some(kind) = category.target_kind() {
            if ev.strike(mass) > kind.threshold(cfg) {
                out.destroy.push((body, kind));
            }
        }
        if action == ContactAction::ProjectileStrike && category == BodyCategory::Projectile {
            out.projectile = Some(body);
        }
    }
    out
}

/// Contact force Rapier must exceed before reporting a pair involving a body of `mass`.
/// Set at half the strike so a frame longer than FIXED_DT still reports it.
pub fn strike_force_threshold(strike: f32, mass: f32) -> f32 {
    0.5 * strike * mass / FIXED_DT
}

/// Power projectile already scaled up.
#[derive(Component)]
pub struct PoweredUp;

pub struct ContactPlugin;
impl Plugin for ContactPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>()
            .add_event::<ContactForceEvent>()
            .add_event::<ContactEvent>()
            .add_event::<DestroyTargetEvent>()
            .add_systems(Update, (collect_contact_forces, resolve_contacts)
                .chain()
                .in_set(GameplaySet::Contacts));
    }
}

// Rapier reports forces; impulse = force * length of the step that produced them.
fn collect_contact_forces(
    time: Res<Time>,
    rapier: Option<Res<RapierContext>>,
    mut ev_force: EventReader<ContactForceEvent>,
    q_body: Query<(&BodyCategory, Option<&ReadMassProperties>)>,
    mut ev_contact: EventWriter<ContactEvent>,
) {
    let dt = match rapier.map(|r| r.integration_parameters.dt) {
        Some(d) if d > 0.0 => d,
        _ => match time.delta_seconds() {
            d if d > 0.0 => d.min(FIXED_DT),
            _ => FIXED_DT,
        },
    };
    let body = |e: Entity| match q_body.get(e) {
        Ok((cat, mass)) => (*cat, mass.map(|m| m.mass).unwrap_or(0.0)),
        Err(_) => (BodyCategory::Other, 0.0),
    };
    for ev in ev_force.read() {
        let (category_a, mass_a) = body(ev.collider1);
        let (category_b, mass_b) = body(ev.collider2);
        ev_contact.send(ContactEvent {
            body_a: ev.collider1,
            body_b: ev.collider2,
            category_a,
            category_b,
            impulse: ev.total_force_magnitude * dt,
            mass_a,
            mass_b,
        });
    }
}

pub fn resolve_contacts(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    clock: Res<SimClock>,
    mut ev_contact: EventReader<ContactEvent>,
    mut q_proj: Query<(&Projectile, &mut Transform), Without<PoweredUp>>,
    q_grace: Query<&SpawnGrace>,
    mut ev_destroy: EventWriter<DestroyTargetEvent>,
) {
    for ev in ev_contact.read() {
        let res = resolve_contact(ev, &cfg.contact);
        if let Some(entity) = res.projectile {
            if let Ok((proj, mut t)) = q_proj.get_mut(entity) {
                if proj.power {
                    t.scale = Vec3::splat(cfg.contact.power_scale);
                    commands.entity(entity).insert(PoweredUp);
                }
            }
        }
        for (entity, kind) in res.destroy {
            if q_grace.get(entity).is_ok_and(|g| !clock.reached(g.until_tick)) {
                debug!("CONTACT on settling {kind:?} ignored");
                continue;
            }
            debug!("CONTACT impulse={:.2} destroys {kind:?}", ev.impulse);
            ev_destroy.send(DestroyTargetEvent { entity, kind });
        }
    }
}
