// HUD: score / high score / lives text, game-over indicator and restart button.
use bevy::prelude::*;

use crate::plugins::core_sim::GameplaySet;
use crate::plugins::game_state::{GameSession, RestartRequested};

#[derive(Component)]
pub struct ScoreText;
#[derive(Component)]
pub struct HighScoreText;
#[derive(Component)]
pub struct StatusText;
#[derive(Component)]
pub struct GameOverPanel;
#[derive(Component)]
pub struct RestartButton;

/// What the HUD shows for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score: String,
    pub high_score: String,
    pub status: String,
    pub game_over_visible: bool,
}

impl HudView {
    pub fn from_session(s: &GameSession) -> Self {
        Self {
            score: format!("Score: {}", s.score),
            high_score: format!("Best: {}", s.high_score),
            status: format!(
                "Level {}  Seals {}/{}  Penguins {}",
                s.level, s.seals_killed, s.seals_needed, s.queued_projectiles()
            ),
            game_over_visible: s.is_game_over,
        }
    }
}

pub struct HudPlugin;
impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RestartRequested>()
            .add_systems(Startup, spawn_hud)
            .add_systems(Update, restart_button.in_set(GameplaySet::Input))
            .add_systems(Update, update_hud.in_set(GameplaySet::Presentation));
    }
}

fn text(value: &str, size: f32) -> TextBundle {
    TextBundle::from_section(value, TextStyle { font_size: size, color: Color::WHITE, ..default() })
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        text("Score: 0", 22.0).with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(8.0),
            ..default()
        }),
        ScoreText,
    ));
    commands.spawn((
        text("Best: 0", 22.0).with_style(Style {
            position_type: PositionType::Absolute,
            right: Val::Px(12.0),
            top: Val::Px(8.0),
            ..default()
        }),
        HighScoreText,
    ));
    commands.spawn((
        text("", 16.0).with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(34.0),
            ..default()
        }),
        StatusText,
    ));

    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(14.0),
                    ..default()
                },
                background_color: BackgroundColor(Color::srgba(0.02, 0.02, 0.05, 0.6)),
                visibility: Visibility::Hidden,
                ..default()
            },
            GameOverPanel,
        ))
        .with_children(|parent| {
            parent.spawn(text("Game Over", 48.0));
            parent
                .spawn((
                    ButtonBundle {
                        style: Style {
                            width: Val::Px(200.0),
                            height: Val::Px(48.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        background_color: BackgroundColor(Color::srgb(0.15, 0.55, 0.25)),
                        ..default()
                    },
                    RestartButton,
                ))
                .with_children(|b| {
                    b.spawn(text("Restart", 28.0));
                });
        });
}

fn restart_button(
    q_buttons: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
    mut ev_restart: EventWriter<RestartRequested>,
) {
    for interaction in &q_buttons {
        if *interaction == Interaction::Pressed {
            ev_restart.send(RestartRequested);
        }
    }
}

fn update_hud(
    session: Res<GameSession>,
    mut q_score: Query<&mut Text, (With<ScoreText>, Without<HighScoreText>, Without<StatusText>)>,
    mut q_high: Query<&mut Text, (With<HighScoreText>, Without<ScoreText>, Without<StatusText>)>,
    mut q_status: Query<&mut Text, (With<StatusText>, Without<ScoreText>, Without<HighScoreText>)>,
    mut q_panel: Query<&mut Visibility, With<GameOverPanel>>,
) {
    if !session.is_changed() {
        return;
    }
    let view = HudView::from_session(&session);
    if let Ok(mut t) = q_score.get_single_mut() {
        t.sections[0].value = view.score;
    }
    if let Ok(mut t) = q_high.get_single_mut() {
        t.sections[0].value = view.high_score;
    }
    if let Ok(mut t) = q_status.get_single_mut() {
        t.sections[0].value = view.status;
    }
    if let Ok(mut vis) = q_panel.get_single_mut() {
        *vis = if view.game_over_visible { Visibility::Visible } else { Visibility::Hidden };
    }
}
