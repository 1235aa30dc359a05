//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - time advances by a fixed step per `app.update()` so timers are deterministic.
//! - we then call `alien_hunter_ar::game::configure_headless` to install gameplay plugins.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::ecs::message::Message;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use alien_hunter_ar::common::state::GameFlowState;
use alien_hunter_ar::common::tunables::Tunables;
use alien_hunter_ar::plugins::flow::FlowCommand;
use alien_hunter_ar::plugins::input::ContactBegan;
use alien_hunter_ar::plugins::session::{Session, StartRound};
use alien_hunter_ar::plugins::surfaces::{ArSurfaces, PlaneLayout, SimulatedSurfaces};

pub const STEP: Duration = Duration::from_millis(50);

/// Tunables with instant loading so tests reach `Playing` in a couple of ticks.
pub fn fast_tunables() -> Tunables {
    Tunables {
        loading_step_secs: 0.0,
        loading_settle_secs: 0.0,
        restart_delay_secs: 0.0,
        game_over_delay_secs: 0.1,
        wander_speed: 0.0,
        ..default()
    }
}

pub fn app_headless() -> App {
    app_with(fast_tunables())
}

pub fn app_with(tunables: Tunables) -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    if !app.is_plugin_added::<TransformPlugin>() {
        app.add_plugins(TransformPlugin);
    }
    app.insert_resource(TimeUpdateStrategy::ManualDuration(STEP));
    app.insert_resource(tunables);

    alien_hunter_ar::game::configure_headless(&mut app);
    // `App::run` normally does this; plugins register resources in `finish`.
    app.finish();
    app.cleanup();
    app.update();
    app
}

pub fn floor() -> SimulatedSurfaces {
    SimulatedSurfaces::new(vec![PlaneLayout::new(Vec3::ZERO, Vec2::new(1.5, 1.5))])
}

pub fn with_floor(mut app: App) -> App {
    app.insert_resource(ArSurfaces::new(floor()));
    app
}

pub fn floor_center_on_screen() -> Vec2 {
    floor().world_to_screen(Vec2::ZERO)
}

pub fn state(app: &App) -> GameFlowState {
    *app.world().resource::<State<GameFlowState>>().get()
}

pub fn send<M: Message>(app: &mut App, message: M) {
    app.world_mut().write_message(message);
}

pub fn step(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Tick until `done` holds, at most `limit` times. Returns whether it held.
pub fn step_until(app: &mut App, limit: usize, done: impl Fn(&App) -> bool) -> bool {
    for _ in 0..limit {
        if done(app) {
            return true;
        }
        app.update();
    }
    done(app)
}

pub fn session(app: &App) -> &Session {
    app.world().resource::<Session>()
}

pub fn enter_playing(app: &mut App) {
    send(app, FlowCommand::StartNewGame);
    assert!(
        step_until(app, 20, |a| state(a) == GameFlowState::Playing),
        "never reached Playing, stuck in {}",
        state(app)
    );
}

/// Reach `Playing`, wait for the floor to be tracked and tap it.
pub fn select_floor(app: &mut App) {
    enter_playing(app);
    assert!(
        step_until(app, 20, |a| session(a).candidates_found()),
        "floor never detected"
    );
    send(app, ContactBegan { position: floor_center_on_screen() });
    app.update();
    assert!(session(app).selected().is_some(), "tap did not select the floor");
}

/// Select the floor and press start.
pub fn start_round(app: &mut App) {
    select_floor(app);
    send(app, StartRound);
    app.update();
    assert!(session(app).round_started());
}

/// Collects every `M` written during the test.
#[derive(Resource)]
pub struct Recorded<M: Message + Clone>(pub Vec<M>);

fn record<M: Message + Clone>(mut reader: MessageReader<M>, mut log: ResMut<Recorded<M>>) {
    log.0.extend(reader.read().cloned());
}

pub fn record_messages<M: Message + Clone>(app: &mut App) {
    app.insert_resource(Recorded::<M>(Vec::new()));
    app.add_systems(Last, record::<M>);
}

pub fn recorded<M: Message + Clone>(app: &App) -> &[M] {
    &app.world().resource::<Recorded<M>>().0
}
