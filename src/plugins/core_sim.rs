// Simulation clock and the per-frame ordering of gameplay systems.
use bevy::prelude::*;
use bevy::time::Fixed;

use crate::plugins::game_state::GameSession;

pub const SIM_HZ: f64 = 60.0;
/// Length of one simulation step; contact forces are turned into impulses with it.
pub const FIXED_DT: f32 = 1.0 / SIM_HZ as f32;

/// Fixed steps since startup. Stops counting while the game is over, so anything
/// scheduled on it (spawn grace, delayed continuations) waits too.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    pub tick: u64,
}

impl SimClock {
    pub fn seconds(&self) -> f32 {
        self.tick as f32 * FIXED_DT
    }

    /// Tick at which `seconds` from now will have elapsed.
    pub fn deadline(&self, seconds: f32) -> u64 {
        self.tick + (seconds.max(0.0) / FIXED_DT).ceil() as u64
    }

    pub fn reached(&self, deadline: u64) -> bool {
        self.tick >= deadline
    }
}

/// Per-frame order: input, then contact callbacks (physics already stepped last PostUpdate),
/// then the per-frame update (settle detection, progression, camera) and finally presentation.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Contacts,
    Lifecycle,
    Progression,
    Camera,
    Presentation,
}

pub struct CoreSimPlugin;
impl Plugin for CoreSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>()
            .insert_resource(Time::<Fixed>::from_hz(SIM_HZ))
            .configure_sets(Update, (
                GameplaySet::Input,
                GameplaySet::Contacts,
                GameplaySet::Lifecycle,
                GameplaySet::Progression,
                GameplaySet::Camera,
                GameplaySet::Presentation,
            ).chain())
            .add_systems(FixedUpdate, step_clock);
    }
}

fn step_clock(mut clock: ResMut<SimClock>, session: Option<Res<GameSession>>) {
    if session.is_some_and(|s| s.is_game_over) {
        return;
    }
    clock.tick += 1;
}
