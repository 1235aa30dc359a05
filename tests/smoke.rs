mod common;

use alien_hunter_ar::common::state::GameFlowState;
use alien_hunter_ar::plugins::audio::{AudioCue, AudioLog};
use alien_hunter_ar::plugins::ui::{Hud, Panel};

#[test]
fn boots_into_the_main_menu_and_ticks() {
    let mut app = common::app_headless();
    common::step(&mut app, 3);

    assert_eq!(common::state(&app), GameFlowState::MainMenu);
    let hud = app.world().resource::<Hud>();
    assert!(hud.is_visible(Panel::MainMenu));
    assert!(!hud.is_visible(Panel::Gameplay));
    assert_eq!(
        app.world().resource::<AudioLog>().current_music,
        Some(AudioCue::MenuMusic)
    );
}

#[test]
fn a_game_without_surface_tracking_still_reaches_playing() {
    let mut app = common::app_headless();
    common::enter_playing(&mut app);
    common::step(&mut app, 5);

    assert_eq!(common::state(&app), GameFlowState::Playing);
    let session = common::session(&app);
    assert!(session.is_active());
    assert!(session.selected().is_none());
    assert!(app.world().resource::<Hud>().is_visible(Panel::PlaneSearching));
}
