//! Pointer and back-button input.
//!
//! Touches and left mouse presses are normalised into `ContactBegan` messages in
//! screen coordinates; Escape becomes `BackPressed`. Headless apps have no input
//! resources, so every source is optional and tests write the messages directly.

use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::plugins::GameSet;
use crate::plugins::flow::BackPressed;

/// A press began at `position` (screen pixels, origin top-left).
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ContactBegan {
    pub position: Vec2,
}

pub fn gather_contacts(
    touches: Option<Res<Touches>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut contacts: MessageWriter<ContactBegan>,
) {
    if let Some(touches) = touches {
        for touch in touches.iter_just_pressed() {
            contacts.write(ContactBegan { position: touch.position() });
        }
    }

    let Some(mouse) = mouse else { return };
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else { return };
    if let Some(position) = window.cursor_position() {
        contacts.write(ContactBegan { position });
    }
}

pub fn gather_back(keys: Option<Res<ButtonInput<KeyCode>>>, mut back: MessageWriter<BackPressed>) {
    if keys.is_some_and(|k| k.just_pressed(KeyCode::Escape)) {
        back.write(BackPressed);
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<ContactBegan>()
        .add_systems(Update, (gather_contacts, gather_back).in_set(GameSet::Input));
}
