//! Session controller: one play attempt, from plane selection to a terminal outcome.
//!
//! The `Session` resource is the only writer of the live target set and the
//! score. Systems feed it notifications; its methods decide what they mean.
//!
//! # Lifecycle
//! ```text
//! OnTransition(Loading -> Playing): begin (new epoch, discovery subscribed)
//! Update / Playing:
//!   Session:   SurfacesChanged -> select panel
//!              ContactBegan -> hit test -> SurfaceSelected -> spawn targets
//!              StartRound -> arm slingshot (ammo subscribed)
//!   Reconcile: TargetDestroyed, then AmmoChanged, then last shots settled
//!              -> RoundEnded -> conclude
//!   Present:   RevealGameOver task -> reveal due -> (Playing) high score,
//!              GameOver requested
//! OnEnter(MainMenu | Loading): teardown (unsubscribe, despawn, cancel tasks)
//! ```
//!
//! Notifications carry the epoch of the session that produced them; anything
//! from another epoch is dropped with a warning.
//!
//! Spending the last shot does not end the round by itself: projectiles still in
//! flight may clear it, so `OutOfAmmo` is only declared once none are left.

use bevy::prelude::*;

use crate::common::ids::{SessionEpoch, SurfaceId};
use crate::common::state::GameFlowState;
use crate::plugins::GameSet;
use crate::plugins::projectiles::{AmmoCause, AmmoChanged};
use crate::plugins::targets::{TargetDestroyed, TargetSet};

pub mod systems;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Cleared,
    OutOfAmmo,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    /// Only grows during a session.
    pub total_points: u32,
    /// Only shrinks during a round.
    pub ammo_remaining: u32,
}

/// Which notifications the session currently listens to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Subscriptions {
    pub surfaces: bool,
    pub ammo: bool,
    pub destruction: bool,
}

/// Result of feeding one notification to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Ignored,
    Applied,
    Ended(RoundOutcome),
}

/// Entity whose transform follows the selected surface; targets are its children.
#[derive(Component, Debug, Clone, Copy)]
pub struct SurfaceAnchor {
    pub surface: SurfaceId,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSelected {
    pub epoch: SessionEpoch,
    pub surface: SurfaceId,
}

/// The player pressed "start".
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRound;

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundEnded {
    pub epoch: SessionEpoch,
    pub outcome: RoundOutcome,
    pub score: u32,
}

#[derive(Resource, Debug, Default)]
pub struct Session {
    epoch: SessionEpoch,
    active: bool,
    selected: Option<SurfaceId>,
    anchor: Option<Entity>,
    targets: TargetSet,
    score: ScoreState,
    outcome: Option<RoundOutcome>,
    subscriptions: Subscriptions,
    candidates_found: bool,
    round_started: bool,
    /// Ammo hit zero; waiting for the last projectiles to land.
    ammo_spent: bool,
    /// The game-over reveal fired and has not been presented yet.
    reveal_due: bool,
}

impl Session {
    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected(&self) -> Option<SurfaceId> {
        self.selected
    }

    pub fn anchor(&self) -> Option<Entity> {
        self.anchor
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn subscriptions(&self) -> Subscriptions {
        self.subscriptions
    }

    pub fn candidates_found(&self) -> bool {
        self.candidates_found
    }

    pub fn round_started(&self) -> bool {
        self.round_started
    }

    pub fn ammo_spent(&self) -> bool {
        self.ammo_spent
    }

    pub fn reveal_due(&self) -> bool {
        self.reveal_due
    }

    /// Start a fresh session with `ammo` shots and return its epoch.
    pub fn begin(&mut self, ammo: u32) -> SessionEpoch {
        assert!(!self.active, "session {:?} begun while still active", self.epoch);
        assert!(self.targets.is_empty(), "session begun with live targets");

        self.epoch = self.epoch.next();
        self.active = true;
        self.selected = None;
        self.anchor = None;
        self.score = ScoreState {
            total_points: 0,
            ammo_remaining: ammo,
        };
        self.outcome = None;
        self.subscriptions = Subscriptions {
            surfaces: true,
            ammo: false,
            destruction: true,
        };
        self.candidates_found = false;
        self.round_started = false;
        self.ammo_spent = false;
        self.reveal_due = false;
        self.epoch
    }

    /// Feed a "candidates changed" notification.
    ///
    /// Returns true the first time candidates show up; discovery is then unsubscribed.
    pub fn on_candidates(&mut self, candidates: &[SurfaceId]) -> bool {
        if !self.active || !self.subscriptions.surfaces || self.selected.is_some() {
            return false;
        }
        if candidates.is_empty() {
            return false;
        }
        self.candidates_found = true;
        self.subscriptions.surfaces = false;
        true
    }

    /// Whether a contact should be turned into a selection hit test.
    pub fn wants_selection(&self) -> bool {
        self.active && self.candidates_found && self.selected.is_none()
    }

    /// Commit the selected surface. Selecting twice is a bug in the caller.
    pub fn select(&mut self, surface: SurfaceId) {
        if let Some(current) = self.selected {
            panic!("surface {surface} selected while {current} is already selected");
        }
        self.selected = Some(surface);
    }

    pub fn set_anchor(&mut self, anchor: Entity) {
        self.anchor = Some(anchor);
    }

    pub fn targets_mut(&mut self) -> &mut TargetSet {
        &mut self.targets
    }

    /// Begin the round: score reset, ammo subscribed.
    ///
    /// False when not ready or already started.
    pub fn start_round(&mut self, ammo: u32) -> bool {
        if !self.active
            || self.selected.is_none()
            || self.round_started
            || self.outcome.is_some()
        {
            return false;
        }
        self.round_started = true;
        self.score = ScoreState {
            total_points: 0,
            ammo_remaining: ammo,
        };
        self.subscriptions.ammo = true;
        self.ammo_spent = false;
        true
    }

    pub fn reconcile_destroyed(&mut self, ev: &TargetDestroyed) -> Reconciled {
        if !self.active || ev.epoch != self.epoch {
            warn!(
                "dropping destruction of target {} from epoch {:?} (current {:?})",
                ev.id, ev.epoch, self.epoch
            );
            return Reconciled::Ignored;
        }
        if !self.subscriptions.destruction {
            return Reconciled::Ignored;
        }
        if let Err(e) = self.targets.mark_destroyed(ev.id) {
            panic!("destruction notification rejected: {e}");
        }

        self.score.total_points += ev.points;
        if self.targets.is_empty() && self.declare(RoundOutcome::Cleared) {
            Reconciled::Ended(RoundOutcome::Cleared)
        } else {
            Reconciled::Applied
        }
    }

    pub fn reconcile_ammo(&mut self, ev: &AmmoChanged) -> Reconciled {
        if !self.active || !self.subscriptions.ammo {
            return Reconciled::Ignored;
        }
        match ev.cause {
            AmmoCause::Reload => Reconciled::Ignored,
            AmmoCause::Shot => {
                self.score.ammo_remaining = self.score.ammo_remaining.saturating_sub(1);
                if self.score.ammo_remaining == 0 && self.outcome.is_none() {
                    self.ammo_spent = true;
                }
                Reconciled::Applied
            }
        }
    }

    /// Declare `OutOfAmmo` once the last shot was fired and `in_flight` projectiles
    /// have all landed or expired.
    pub fn settle_last_shots(&mut self, in_flight: usize) -> Reconciled {
        if !self.active || !self.ammo_spent || in_flight > 0 {
            return Reconciled::Ignored;
        }
        self.ammo_spent = false;
        if self.declare(RoundOutcome::OutOfAmmo) {
            Reconciled::Ended(RoundOutcome::OutOfAmmo)
        } else {
            Reconciled::Ignored
        }
    }

    /// First terminal trigger wins.
    fn declare(&mut self, outcome: RoundOutcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    pub fn unsubscribe_ammo(&mut self) {
        self.subscriptions.ammo = false;
    }

    /// Remember that the game-over reveal fired, whatever state the flow is in.
    pub fn mark_reveal_due(&mut self) {
        if self.active && self.outcome.is_some() {
            self.reveal_due = true;
        }
    }

    pub fn take_reveal_due(&mut self) -> bool {
        std::mem::take(&mut self.reveal_due)
    }

    /// Despawn everything the session owns and stop listening.
    pub fn teardown(&mut self, commands: &mut Commands, ammo: u32) {
        let cleared = self.targets.clear(commands);
        if let Some(anchor) = self.anchor.take() {
            commands.entity(anchor).try_despawn();
        }
        if self.active || cleared > 0 {
            debug!(
                "session {:?} torn down ({cleared} live target(s) removed)",
                self.epoch
            );
        }
        self.active = false;
        self.selected = None;
        self.score = ScoreState {
            total_points: 0,
            ammo_remaining: ammo,
        };
        self.outcome = None;
        self.subscriptions = Subscriptions::default();
        self.candidates_found = false;
        self.round_started = false;
        self.ammo_spent = false;
        self.reveal_due = false;
    }
}

pub fn session_active(session: Res<Session>) -> bool {
    session.is_active()
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Session>()
        .add_message::<SurfaceSelected>()
        .add_message::<StartRound>()
        .add_message::<RoundEnded>()
        .add_systems(
            OnTransition {
                exited: GameFlowState::Loading,
                entered: GameFlowState::Playing,
            },
            systems::activate_session,
        )
        .add_systems(OnEnter(GameFlowState::MainMenu), systems::teardown_session)
        .add_systems(OnEnter(GameFlowState::Loading), systems::teardown_session)
        .add_systems(
            Update,
            (
                systems::discover_surfaces,
                systems::select_surface_on_contact,
                systems::spawn_targets_on_selection,
                systems::track_surface_anchor,
                systems::start_round,
            )
                .chain()
                .in_set(GameSet::Session)
                .run_if(in_state(GameFlowState::Playing).and(session_active)),
        )
        .add_systems(
            Update,
            (
                systems::reconcile_destroyed,
                systems::reconcile_ammo,
                systems::settle_last_shots,
                systems::conclude_round,
            )
                .chain()
                .in_set(GameSet::Reconcile)
                .run_if(in_state(GameFlowState::Playing).and(session_active)),
        )
        .add_systems(
            Update,
            (
                systems::note_game_over_reveal.run_if(session_active),
                systems::reveal_game_over
                    .run_if(in_state(GameFlowState::Playing).and(session_active)),
            )
                .chain()
                .in_set(GameSet::Present),
        );
}
