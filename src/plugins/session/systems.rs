use bevy::prelude::*;

use super::{
    Reconciled, RoundEnded, RoundOutcome, Session, StartRound, SurfaceAnchor, SurfaceSelected,
};
use crate::common::rng::GameRng;
use crate::common::state::GameFlowState;
use crate::common::tunables::Tunables;
use crate::plugins::audio::AudioCue;
use crate::plugins::flow::FlowCommand;
use crate::plugins::input::ContactBegan;
use crate::plugins::leaderboard::Leaderboard;
use crate::plugins::projectiles::{AmmoCause, AmmoChanged, Projectile, Slingshot};
use crate::plugins::storage::{KEY_HIGH_SCORE, KeyValueStore};
use crate::plugins::surfaces::{ArSurfaces, SurfacesChanged};
use crate::plugins::targets::{SpawnPlan, SpawnSite, TargetDestroyed};
use crate::plugins::tasks::{
    Task, TaskClock, TaskEvent, TaskOutput, TaskOwner, TaskQueue, TaskSignal,
};
use crate::plugins::ui::{Hud, Panel};

pub fn activate_session(
    mut session: ResMut<Session>,
    tunables: Res<Tunables>,
    mut hud: ResMut<Hud>,
    surfaces: Option<ResMut<ArSurfaces>>,
) {
    let epoch = session.begin(tunables.ammo);
    hud.hide_session_panels();
    hud.show(Panel::PlaneSearching);
    hud.set_score(0);

    match surfaces {
        Some(mut surfaces) => surfaces.set_detection_enabled(true),
        None => warn!("no surface provider; session {epoch:?} cannot select a plane"),
    }
    info!("session {epoch:?} started");
}

#[allow(clippy::too_many_arguments)]
pub fn teardown_session(
    mut commands: Commands,
    mut session: ResMut<Session>,
    tunables: Res<Tunables>,
    mut slingshot: ResMut<Slingshot>,
    mut tasks: ResMut<TaskQueue>,
    mut hud: ResMut<Hud>,
    surfaces: Option<ResMut<ArSurfaces>>,
) {
    session.teardown(&mut commands, tunables.ammo);
    slingshot.clear();
    tasks.cancel_sessions();
    hud.hide_session_panels();

    if let Some(mut surfaces) = surfaces {
        surfaces.reset();
        surfaces.set_detection_enabled(true);
    }
}

pub fn discover_surfaces(
    mut changed: MessageReader<SurfacesChanged>,
    mut session: ResMut<Session>,
    mut hud: ResMut<Hud>,
) {
    for ev in changed.read() {
        if session.on_candidates(&ev.candidates) {
            debug!("{} candidate surface(s), waiting for a tap", ev.candidates.len());
            hud.hide(Panel::PlaneSearching);
            hud.show(Panel::SelectPlane);
        }
    }
}

/// One hit test for the first contact of the tick; the nearest hit wins.
pub fn select_surface_on_contact(
    mut contacts: MessageReader<ContactBegan>,
    mut session: ResMut<Session>,
    surfaces: Option<ResMut<ArSurfaces>>,
    mut selected: MessageWriter<SurfaceSelected>,
    mut cues: MessageWriter<AudioCue>,
) {
    let first = contacts.read().next().copied();
    contacts.clear();

    let Some(contact) = first else { return };
    if !session.wants_selection() {
        return;
    }
    let Some(mut surfaces) = surfaces else {
        debug!("contact without a surface provider");
        return;
    };

    let Some(hit) = surfaces.hit_test(contact.position).first().copied() else {
        trace!("no surface under {}", contact.position);
        return;
    };

    session.select(hit.surface);
    for id in surfaces.candidates() {
        if id != hit.surface {
            surfaces.set_surface_active(id, false);
        }
    }
    surfaces.set_detection_enabled(false);

    info!("selected {} at {}", hit.surface, hit.point);
    selected.write(SurfaceSelected { epoch: session.epoch(), surface: hit.surface });
    cues.write(AudioCue::PlaneSelected);
}

#[allow(clippy::too_many_arguments)]
pub fn spawn_targets_on_selection(
    mut commands: Commands,
    mut selected: MessageReader<SurfaceSelected>,
    mut session: ResMut<Session>,
    surfaces: Option<Res<ArSurfaces>>,
    tunables: Res<Tunables>,
    mut rng: ResMut<GameRng>,
    mut hud: ResMut<Hud>,
) {
    for ev in selected.read() {
        if ev.epoch != session.epoch() || session.anchor().is_some() {
            continue;
        }
        let surface = surfaces.as_ref().and_then(|s| s.surface(ev.surface).cloned());
        let transform = surface.as_ref().map(|s| s.transform).unwrap_or_default();

        let anchor = commands
            .spawn((Name::new("Surface Anchor"), SurfaceAnchor { surface: ev.surface }, transform))
            .id();
        session.set_anchor(anchor);

        let epoch = session.epoch();
        let plan = SpawnPlan::from_tunables(&tunables);
        let site = surface.as_ref().map(|surface| SpawnSite { anchor, surface });
        if session
            .targets_mut()
            .spawn(&mut commands, site, epoch, &plan, &mut rng)
            .is_ok()
        {
            hud.hide(Panel::SelectPlane);
            hud.show(Panel::StartButton);
        }
    }
}

pub fn track_surface_anchor(
    session: Res<Session>,
    surfaces: Option<Res<ArSurfaces>>,
    mut q: Query<&mut Transform, With<SurfaceAnchor>>,
) {
    let (Some(surface), Some(anchor), Some(surfaces)) =
        (session.selected(), session.anchor(), surfaces)
    else {
        return;
    };
    let Some(tracked) = surfaces.surface_transform(surface) else {
        return;
    };
    if let Ok(mut transform) = q.get_mut(anchor) {
        transform.set_if_neq(tracked);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn start_round(
    mut requests: MessageReader<StartRound>,
    mut session: ResMut<Session>,
    mut slingshot: ResMut<Slingshot>,
    surfaces: Option<Res<ArSurfaces>>,
    tunables: Res<Tunables>,
    mut hud: ResMut<Hud>,
    mut ammo: MessageWriter<AmmoChanged>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if !session.start_round(tunables.ammo) {
        debug!("start round ignored");
        return;
    }

    let center = session
        .selected()
        .zip(surfaces)
        .and_then(|(id, s)| s.surface_center(id))
        .unwrap_or_default();
    let muzzle = center.truncate() - Vec2::Y * tunables.launch_offset;
    ammo.write(slingshot.arm(tunables.ammo, muzzle));

    hud.set_score(0);
    hud.set_ammo(tunables.ammo);
    hud.hide(Panel::StartButton);
    hud.show(Panel::RoundHud);
    info!("round started with {} shot(s)", tunables.ammo);
}

pub fn reconcile_destroyed(
    mut destroyed: MessageReader<TargetDestroyed>,
    mut session: ResMut<Session>,
    mut hud: ResMut<Hud>,
    mut cues: MessageWriter<AudioCue>,
    mut ended: MessageWriter<RoundEnded>,
) {
    for ev in destroyed.read() {
        let result = session.reconcile_destroyed(ev);
        if result == Reconciled::Ignored {
            continue;
        }
        hud.set_score(session.score().total_points);
        cues.write(AudioCue::AlienDestroyed);
        if let Reconciled::Ended(outcome) = result {
            ended.write(RoundEnded {
                epoch: session.epoch(),
                outcome,
                score: session.score().total_points,
            });
        }
    }
}

pub fn reconcile_ammo(
    mut changes: MessageReader<AmmoChanged>,
    mut session: ResMut<Session>,
    mut hud: ResMut<Hud>,
    mut cues: MessageWriter<AudioCue>,
    mut ended: MessageWriter<RoundEnded>,
) {
    for ev in changes.read() {
        let result = session.reconcile_ammo(ev);
        if result == Reconciled::Ignored {
            continue;
        }
        if ev.cause == AmmoCause::Shot {
            cues.write(AudioCue::Shoot);
        }
        hud.set_ammo(session.score().ammo_remaining);
        if let Reconciled::Ended(outcome) = result {
            ended.write(RoundEnded {
                epoch: session.epoch(),
                outcome,
                score: session.score().total_points,
            });
        }
    }
}

/// Turn a spent slingshot into `OutOfAmmo` once no projectile is left in flight.
pub fn settle_last_shots(
    mut session: ResMut<Session>,
    in_flight: Query<(), With<Projectile>>,
    mut ended: MessageWriter<RoundEnded>,
) {
    if !session.ammo_spent() {
        return;
    }
    if let Reconciled::Ended(outcome) = session.settle_last_shots(in_flight.iter().count()) {
        ended.write(RoundEnded {
            epoch: session.epoch(),
            outcome,
            score: session.score().total_points,
        });
    }
}

#[allow(clippy::too_many_arguments)]
pub fn conclude_round(
    mut ended: MessageReader<RoundEnded>,
    mut session: ResMut<Session>,
    mut slingshot: ResMut<Slingshot>,
    mut leaderboard: ResMut<Leaderboard>,
    mut hud: ResMut<Hud>,
    mut tasks: ResMut<TaskQueue>,
    tunables: Res<Tunables>,
    mut cues: MessageWriter<AudioCue>,
) {
    for ev in ended.read() {
        if ev.epoch != session.epoch() {
            continue;
        }
        info!("round over: {:?} with {} point(s)", ev.outcome, ev.score);

        cues.write(AudioCue::Ending);
        slingshot.clear();
        session.unsubscribe_ammo();

        match leaderboard.submit_score(ev.score) {
            Some(rank) => debug!("score {} ranked #{rank}", ev.score),
            None => debug!("score {} did not make the leaderboard", ev.score),
        }
        hud.leaderboard_lines = leaderboard.render();
        hud.show(Panel::PlayAgainButton);
        hud.show(Panel::LeaderboardButton);
        if ev.outcome == RoundOutcome::OutOfAmmo {
            hud.show(Panel::Leaderboard);
        }

        tasks.spawn(
            Task::new(TaskOwner::Session(ev.epoch), TaskClock::Virtual)
                .wait(tunables.game_over_delay_secs)
                .signal(TaskSignal::RevealGameOver),
        );
    }
}

/// Record the reveal signal on the session.
///
/// Runs in every state: a reveal that fires on the tick the game gets paused is
/// presented after resuming instead of being lost.
pub fn note_game_over_reveal(
    mut task_events: MessageReader<TaskEvent>,
    mut session: ResMut<Session>,
) {
    for ev in task_events.read() {
        if ev.output != TaskOutput::Signal(TaskSignal::RevealGameOver) {
            continue;
        }
        if ev.owner != TaskOwner::Session(session.epoch()) {
            debug!("reveal from {:?} dropped", ev.owner);
            continue;
        }
        session.mark_reveal_due();
    }
}

/// Compare against the stored high score, fill in the game-over texts and ask
/// the flow machine for `GameOver`.
pub fn reveal_game_over(
    mut session: ResMut<Session>,
    mut store: Option<ResMut<KeyValueStore>>,
    mut hud: ResMut<Hud>,
    mut cues: MessageWriter<AudioCue>,
    mut flow: MessageWriter<FlowCommand>,
) {
    if !session.take_reveal_due() {
        return;
    }

    let score = session.score().total_points;
    let previous = store
        .as_ref()
        .map(|s| s.get_int(KEY_HIGH_SCORE, 0))
        .unwrap_or(0)
        .max(0);
    let previous = u32::try_from(previous).unwrap_or(u32::MAX);
    let new_high = score > previous;

    if new_high {
        match store.as_mut() {
            Some(store) => {
                store.set_int(KEY_HIGH_SCORE, i64::from(score));
                if let Err(e) = store.save() {
                    warn!("could not persist high score: {e:#}");
                }
            }
            None => debug!("no preference store, high score not persisted"),
        }
    }

    let high = previous.max(score);
    hud.final_score_text = format!("Final Score: {score}");
    if new_high {
        hud.high_score_text = format!("High Score: {high} NEW RECORD!");
        hud.title_text = "NEW RECORD!".to_owned();
        cues.write(AudioCue::NewHighScore);
    } else {
        hud.high_score_text = format!("High Score: {high}");
        hud.title_text = "Game Over".to_owned();
        cues.write(AudioCue::GameOver);
    }

    flow.write(FlowCommand::Transition(GameFlowState::GameOver));
}
