use super::policy::{check, back_action};
use super::*;
use crate::common::tunables::Tunables;
use crate::plugins::tasks::{TaskOutput, TaskQueue, TaskSignal};

use GameFlowState::*;

#[test]
fn every_state_may_return_to_main_menu() {
    for from in GameFlowState::ALL {
        assert_eq!(check(from, MainMenu, TransitionKind::Normal), Ok(()), "{from}");
    }
}

#[test]
fn policy_table_matches_allowed_edges() {
    let allowed = [
        (MainMenu, Loading),
        (MainMenu, Settings),
        (Loading, Playing),
        (Playing, Paused),
        (Playing, GameOver),
        (Paused, Playing),
    ];
    for from in GameFlowState::ALL {
        for to in GameFlowState::ALL {
            if to == MainMenu {
                continue;
            }
            let expected = allowed.contains(&(from, to));
            assert_eq!(
                check(from, to, TransitionKind::Normal).is_ok(),
                expected,
                "{from} -> {to}"
            );
        }
    }
}

#[test]
fn loading_is_reentered_only_through_restart() {
    for from in [Playing, Paused, GameOver] {
        assert!(check(from, Loading, TransitionKind::Normal).is_err());
        assert_eq!(check(from, Loading, TransitionKind::Restart), Ok(()));
    }
    assert!(check(MainMenu, Loading, TransitionKind::Restart).is_err());
    assert!(check(Playing, Paused, TransitionKind::Restart).is_err());
}

#[test]
fn back_button_mapping() {
    assert_eq!(back_action(Playing), BackAction::Goto(Paused));
    assert_eq!(back_action(Paused), BackAction::Goto(Playing));
    assert_eq!(back_action(Settings), BackAction::Goto(MainMenu));
    assert_eq!(back_action(GameOver), BackAction::Goto(MainMenu));
    assert_eq!(back_action(MainMenu), BackAction::Quit);
    assert_eq!(back_action(Loading), BackAction::Ignore);
}

#[test]
fn requests_apply_one_at_a_time_against_the_current_state() {
    let mut machine = FlowMachine::default();
    machine.request_transition(Loading);
    machine.request_transition(Playing);

    assert_eq!(
        machine.step(MainMenu),
        Some(Ok(FlowRequest { to: Loading, kind: TransitionKind::Normal }))
    );
    assert_eq!(machine.pending(), 1);

    // Still in MainMenu: Playing is not reachable from here.
    let rejected = machine.step(MainMenu);
    assert!(matches!(rejected, Some(Err(FlowError::NotAllowed { from: MainMenu, to: Playing, .. }))));
    assert_eq!(machine.last_rejection(), rejected.and_then(Result::err));
    assert_eq!(machine.step(MainMenu), None);
}

#[test]
fn restart_request_is_remembered_as_the_entering_kind() {
    let mut machine = FlowMachine::default();
    machine.request_restart();
    assert!(matches!(machine.step(GameOver), Some(Ok(_))));
    assert_eq!(machine.entering(), TransitionKind::Restart);
}

#[test]
fn loading_sequence_reports_every_step_and_completes() {
    let tunables = Tunables::default();
    let mut queue = TaskQueue::default();
    queue.spawn(loading_sequence(&tunables));

    let total = tunables.loading_step_secs * 5.0 + tunables.loading_settle_secs;
    let mut statuses = Vec::new();
    let mut completed = false;
    let mut t = 0.0;
    while t < total + 0.5 {
        for ev in queue.tick(0.0, 0.1) {
            match ev.output {
                TaskOutput::Signal(TaskSignal::LoadingStatus(s)) => statuses.push(s),
                TaskOutput::Signal(TaskSignal::LoadingComplete) => completed = true,
                _ => {}
            }
        }
        t += 0.1;
    }

    assert_eq!(statuses.len(), 5);
    assert_eq!(statuses[0], "Checking AR device...");
    assert_eq!(statuses[4], "Ready to hunt aliens!");
    assert!(completed);
    assert!(queue.is_empty());
}

#[test]
fn ar_warning_until_override() {
    let mut ar = ArSupport { supported: false, override_accepted: false };
    assert!(ar.needs_warning());
    ar.override_accepted = true;
    assert!(!ar.needs_warning());
    assert!(!ArSupport::default().needs_warning());
}
