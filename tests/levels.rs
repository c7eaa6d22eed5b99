mod common;

use bevy::prelude::*;
use peeved_penguins::prelude::*;
use common::*;

fn build_app() -> App {
    let mut app = headless_app();
    app.add_plugins(LevelPlugin);
    app.update(); // Startup: catalog + level 1
    app
}

fn level_targets(app: &mut App) -> Vec<(Entity, TargetKind)> {
    let root = {
        let mut q = app.world_mut().query_filtered::<Entity, With<LevelRoot>>();
        q.single(app.world())
    };
    let mut q = app.world_mut().query::<(Entity, &Target, &Parent)>();
    q.iter(app.world())
        .filter(|(_, _, parent)| parent.get() == root)
        .map(|(e, t, _)| (e, t.kind))
        .collect()
}

fn count(targets: &[(Entity, TargetKind)], kind: TargetKind) -> usize {
    targets.iter().filter(|(_, k)| *k == kind).count()
}

#[test]
fn first_level_is_spawned_at_startup() {
    let mut app = build_app();
    let def = app.world().resource::<LevelCatalog>().get(1).unwrap().clone();
    let targets = level_targets(&mut app);
    assert_eq!(count(&targets, TargetKind::Seal), def.seals.len());
    assert_eq!(count(&targets, TargetKind::Block), def.blocks.len());
}

#[test]
fn reload_replaces_level_contents() {
    let mut app = build_app();
    let old = level_targets(&mut app);
    assert!(!old.is_empty());

    app.world_mut().send_event(ReloadLevelEvent { level: 2 });
    app.update();

    for (e, _) in &old {
        assert!(app.world().get_entity(*e).is_none());
    }
    let def = app.world().resource::<LevelCatalog>().get(2).unwrap().clone();
    let targets = level_targets(&mut app);
    assert_eq!(count(&targets, TargetKind::Seal), def.seals.len());
    assert_eq!(count(&targets, TargetKind::Block), def.blocks.len());
    assert_eq!(count(&targets, TargetKind::Seal), 4);
}

#[test]
fn completing_a_level_loads_the_next_one() {
    let mut app = build_app();
    {
        let mut session = app.world_mut().resource_mut::<GameSession>();
        session.seals_killed = session.seals_needed;
    }
    app.update();

    assert_eq!(app.world().resource::<GameSession>().level, 2);
    let targets = level_targets(&mut app);
    assert_eq!(count(&targets, TargetKind::Seal), 4);
}

#[test]
fn restart_rebuilds_the_current_level() {
    let mut app = build_app();
    let old = level_targets(&mut app);
    {
        let mut session = app.world_mut().resource_mut::<GameSession>();
        session.is_game_over = true;
    }
    app.world_mut().send_event(RestartRequested);
    app.update();

    assert!(!app.world().resource::<GameSession>().is_game_over);
    for (e, _) in &old {
        assert!(app.world().get_entity(*e).is_none());
    }
    assert_eq!(level_targets(&mut app).len(), old.len());
}
