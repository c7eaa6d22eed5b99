// Game session: lives, score, level progression, game over & restart.

use bevy::prelude::*;

use crate::plugins::config::{GameConfig, ScoreResetPolicy};
use crate::plugins::core_sim::GameplaySet;
use crate::plugins::projectile::TurnEndedEvent;

pub const MAX_LEVEL: u32 = 6;

// Seals required for levels 1..=4; later levels fall back to SEALS_FALLBACK.
const SEALS_TABLE: [u32; 4] = [3, 4, 5, 6];
const SEALS_FALLBACK: u32 = 4;

/// Seals that must be killed to complete `level`.
pub fn seals_needed(level: u32) -> u32 {
    let idx = level.max(1) as usize - 1;
    SEALS_TABLE.get(idx).copied().unwrap_or(SEALS_FALLBACK)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionPhase {
    Playing,
    LevelComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    GameOver,
}

#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    pub lives: u32,
    pub max_lives: u32,
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub seals_killed: u32,
    pub seals_needed: u32,
    pub is_game_over: bool,
    pub is_power_projectile: bool,
    pub score_checkpoint: u32, // score when the last level was completed
    pub score_reset: ScoreResetPolicy,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(3, ScoreResetPolicy::Checkpoint)
    }
}

impl GameSession {
    pub fn new(max_lives: u32, score_reset: ScoreResetPolicy) -> Self {
        let max_lives = max_lives.max(1);
        Self {
            lives: max_lives,
            max_lives,
            score: 0,
            high_score: 0,
            level: 1,
            seals_killed: 0,
            seals_needed: seals_needed(1),
            is_game_over: false,
            is_power_projectile: false,
            score_checkpoint: 0,
            score_reset,
        }
    }

    pub fn from_config(cfg: &GameConfig) -> Self {
        Self::new(cfg.progression.lives, cfg.progression.score_reset)
    }

    pub fn phase(&self) -> ProgressionPhase {
        if self.is_game_over {
            ProgressionPhase::GameOver
        } else if self.seals_killed >= self.seals_needed {
            ProgressionPhase::LevelComplete
        } else {
            ProgressionPhase::Playing
        }
    }

    /// Projectiles still waiting beside the catapult.
    pub fn queued_projectiles(&self) -> u32 {
        self.lives
    }

    /// Decide the variant of the projectile about to be loaded.
    pub fn load_projectile(&mut self, power_on_last: bool) -> bool {
        self.is_power_projectile = power_on_last && self.lives == 1;
        self.is_power_projectile
    }

    /// A release consumes one queued projectile.
    pub fn consume_projectile(&mut self) -> bool {
        if self.is_game_over {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        true
    }

    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.track_high_score();
    }

    pub fn record_seal_kill(&mut self, points: u32) {
        self.seals_killed += 1;
        self.award(points);
    }

    pub fn track_high_score(&mut self) {
        self.high_score = self.high_score.max(self.score);
    }

    /// Settled projectile; the game ends once no projectiles are left.
    pub fn end_turn(&mut self) -> TurnOutcome {
        if self.is_game_over {
            return TurnOutcome::GameOver;
        }
        if self.lives == 0 {
            self.is_game_over = true;
            self.is_power_projectile = false;
            self.lives = self.max_lives; // ready for the next session
            return TurnOutcome::GameOver;
        }
        TurnOutcome::Continue
    }

    /// Move to the next level (clamped to MAX_LEVEL). Returns the new level.
    pub fn advance_level(&mut self) -> u32 {
        self.level = (self.level + 1).clamp(1, MAX_LEVEL);
        self.seals_killed = 0;
        self.seals_needed = seals_needed(self.level);
        self.lives = self.max_lives;
        self.is_power_projectile = false;
        self.score_checkpoint = self.score;
        self.level
    }

    /// Leave the game-over state. Returns false when there is nothing to restart.
    pub fn restart(&mut self) -> bool {
        if !self.is_game_over {
            return false;
        }
        self.is_game_over = false;
        self.lives = self.max_lives;
        self.seals_killed = 0;
        self.is_power_projectile = false;
        self.score = match self.score_reset {
            ScoreResetPolicy::Checkpoint => self.score_checkpoint,
            ScoreResetPolicy::Zero => {
                self.score_checkpoint = 0;
                0
            }
        };
        true
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub struct LevelCompleteEvent {
    pub level: u32, // level now being loaded
}

#[derive(Event, Debug, Clone, Copy)]
pub struct GameOverEvent {
    pub score: u32,
}

/// User-confirmed restart (button tap or key).
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RestartRequested;

/// Ask the level plugin to rebuild the level root for `level`.
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadLevelEvent {
    pub level: u32,
}

pub struct GameStatePlugin;
impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        let session = app
            .world()
            .get_resource::<GameConfig>()
            .map(GameSession::from_config)
            .unwrap_or_default();
        app.insert_resource(session)
            .add_event::<TurnEndedEvent>()
            .add_event::<LevelCompleteEvent>()
            .add_event::<GameOverEvent>()
            .add_event::<RestartRequested>()
            .add_event::<ReloadLevelEvent>()
            .add_systems(Update, (
                check_level_complete,
                resolve_turn_end,
                handle_restart,
                track_high_score,
            ).chain().in_set(GameplaySet::Progression));
    }
}

pub fn check_level_complete(
    mut session: ResMut<GameSession>,
    mut ev_complete: EventWriter<LevelCompleteEvent>,
    mut ev_reload: EventWriter<ReloadLevelEvent>,
) {
    if session.phase() != ProgressionPhase::LevelComplete {
        return;
    }
    let finished = session.level;
    let level = session.advance_level();
    info!("LEVEL {finished} complete score={} -> level {level}", session.score);
    ev_complete.send(LevelCompleteEvent { level });
    ev_reload.send(ReloadLevelEvent { level });
}

pub fn resolve_turn_end(
    mut session: ResMut<GameSession>,
    mut ev_turn: EventReader<TurnEndedEvent>,
    mut ev_game_over: EventWriter<GameOverEvent>,
) {
    for turn in ev_turn.read() {
        if session.is_game_over {
            continue;
        }
        match session.end_turn() {
            TurnOutcome::Continue => {
                info!("TURN ended ({:?}) lives={}", turn.reason, session.lives);
            }
            TurnOutcome::GameOver => {
                info!("GAME OVER score={} high={}", session.score, session.high_score);
                ev_game_over.send(GameOverEvent { score: session.score });
            }
        }
    }
}

fn handle_restart(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut session: ResMut<GameSession>,
    mut ev_restart: EventReader<RestartRequested>,
    mut ev_reload: EventWriter<ReloadLevelEvent>,
) {
    let key = keys.is_some_and(|k| k.just_pressed(KeyCode::KeyR));
    let requested = ev_restart.read().count() > 0 || key;
    if !requested {
        return;
    }
    if !session.restart() {
        debug!("restart ignored: game is not over");
        return;
    }
    info!("RESTART level={} score={}", session.level, session.score);
    ev_reload.send(ReloadLevelEvent { level: session.level });
}

fn track_high_score(mut session: ResMut<GameSession>) {
    if session.high_score < session.score {
        session.track_high_score();
    }
}
