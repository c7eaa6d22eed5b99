mod common;

use bevy::prelude::*;
use peeved_penguins::prelude::*;
use common::*;

fn step(app: &mut App, n: usize) {
    for _ in 0..n {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

#[test]
fn clock_counts_fixed_steps() {
    let mut app = headless_app();
    step(&mut app, 30);
    let clock = *app.world().resource::<SimClock>();
    assert_eq!(clock.tick, 30);
    assert!((clock.seconds() - 0.5).abs() < 1e-5);
}

#[test]
fn clock_stops_during_game_over_and_resumes_after_restart() {
    let mut app = headless_app();
    step(&mut app, 2);
    app.world_mut().resource_mut::<GameSession>().is_game_over = true;
    step(&mut app, 5);
    assert_eq!(app.world().resource::<SimClock>().tick, 2);

    assert!(app.world_mut().resource_mut::<GameSession>().restart());
    step(&mut app, 3);
    assert_eq!(app.world().resource::<SimClock>().tick, 5);
}

#[test]
fn deadline_is_reached_after_the_delay() {
    let mut app = headless_app();
    let deadline = app.world().resource::<SimClock>().deadline(0.5);
    step(&mut app, 29);
    assert!(!app.world().resource::<SimClock>().reached(deadline));
    step(&mut app, 1);
    assert!(app.world().resource::<SimClock>().reached(deadline));
}

#[test]
fn session_follows_config() {
    let app = headless_app();
    assert!(app.world().get_resource::<GameConfig>().is_some());
    assert_eq!(app.world().resource::<GameSession>().lives, 3);
}
