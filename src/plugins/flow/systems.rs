use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::time::Virtual;

use super::policy::{self, BackAction};
use super::{AR_WARNING_TEXT, ArSupport, BackPressed, FlowCommand, FlowMachine, TransitionKind};
use crate::common::state::GameFlowState;
use crate::common::tunables::Tunables;
use crate::plugins::audio::AudioCue;
use crate::plugins::tasks::{
    Task, TaskClock, TaskEvent, TaskOutput, TaskOwner, TaskQueue, TaskSignal, TweenChannel,
};
use crate::plugins::ui::{Hud, Panel};

pub const LOADING_STEPS: [(&str, f32); 5] = [
    ("Checking AR device...", 0.2),
    ("Starting AR camera...", 0.4),
    ("Preparing plane detection...", 0.6),
    ("Loading models...", 0.8),
    ("Ready to hunt aliens!", 1.0),
];

/// Status text and progress bar for a new game, then `LoadingComplete`.
///
/// Runs on the real clock: it is pure UI and must not depend on whether the
/// previous state left virtual time paused.
pub fn loading_sequence(tunables: &Tunables) -> Task {
    let mut task = Task::new(TaskOwner::Flow, TaskClock::Real);
    let mut progress = 0.0;
    for (status, target) in LOADING_STEPS {
        task = task
            .signal(TaskSignal::LoadingStatus(status))
            .tween(TweenChannel::LoadingProgress, progress, target, tunables.loading_step_secs);
        progress = target;
    }
    task.wait(tunables.loading_settle_secs)
        .signal(TaskSignal::LoadingComplete)
}

pub fn restart_sequence(tunables: &Tunables) -> Task {
    Task::new(TaskOwner::Flow, TaskClock::Real)
        .wait(tunables.restart_delay_secs)
        .signal(TaskSignal::LoadingComplete)
}

#[allow(clippy::too_many_arguments)]
pub fn drive_flow(
    mut commands_in: MessageReader<FlowCommand>,
    mut back_in: MessageReader<BackPressed>,
    mut task_events: MessageReader<TaskEvent>,
    state: Res<State<GameFlowState>>,
    mut next: ResMut<NextState<GameFlowState>>,
    mut machine: ResMut<FlowMachine>,
    mut hud: ResMut<Hud>,
    mut ar: ResMut<ArSupport>,
    mut exit: MessageWriter<AppExit>,
    mut cues: MessageWriter<AudioCue>,
) {
    let current = *state.get();

    for cmd in commands_in.read() {
        debug!("flow command {cmd:?} in {current}");
        match *cmd {
            FlowCommand::StartNewGame => {
                cues.write(AudioCue::ButtonClick);
                if ar.needs_warning() {
                    warn!("AR not supported on this device, continuing anyway");
                    hud.warning_text = AR_WARNING_TEXT.to_owned();
                    hud.show(Panel::CompatibilityWarning);
                }
                machine.request_transition(GameFlowState::Loading);
            }
            FlowCommand::Resume => {
                cues.write(AudioCue::ButtonClick);
                machine.request_transition(GameFlowState::Playing);
            }
            FlowCommand::Restart => {
                cues.write(AudioCue::ButtonClick);
                machine.request_restart();
            }
            FlowCommand::ReturnToMainMenu => {
                cues.write(AudioCue::ButtonClick);
                machine.request_transition(GameFlowState::MainMenu);
            }
            FlowCommand::OpenSettings => {
                cues.write(AudioCue::ButtonClick);
                machine.request_transition(GameFlowState::Settings);
            }
            FlowCommand::Quit => {
                info!("quit requested");
                exit.write(AppExit::Success);
            }
            FlowCommand::DismissWarning => {
                ar.override_accepted = true;
                hud.hide(Panel::CompatibilityWarning);
            }
            FlowCommand::Transition(to) => machine.request_transition(to),
        }
    }

    for _ in back_in.read() {
        match policy::back_action(current) {
            BackAction::Goto(to) => machine.request_transition(to),
            BackAction::Quit => {
                info!("back pressed in main menu, exiting");
                exit.write(AppExit::Success);
            }
            BackAction::Ignore => trace!("back ignored in {current}"),
        }
    }

    for ev in task_events.read() {
        if ev.owner != TaskOwner::Flow
            || ev.output != TaskOutput::Signal(TaskSignal::LoadingComplete)
        {
            continue;
        }
        if current == GameFlowState::Loading {
            machine.request_transition(GameFlowState::Playing);
        } else {
            debug!("loading finished outside Loading ({current}), ignored");
        }
    }

    if let Some(Ok(request)) = machine.step(current) {
        info!("flow {current} -> {} ({:?})", request.to, request.kind);
        next.set(request.to);
    }
}

pub fn enter_main_menu(
    mut machine: ResMut<FlowMachine>,
    mut time: ResMut<Time<Virtual>>,
    mut hud: ResMut<Hud>,
    mut tasks: ResMut<TaskQueue>,
    mut cues: MessageWriter<AudioCue>,
) {
    machine.clear_flags();
    time.unpause();
    hud.show_only_flow(Panel::MainMenu);
    let cancelled = tasks.cancel_owned_by(TaskOwner::Flow);
    if cancelled > 0 {
        debug!("cancelled {cancelled} flow task(s)");
    }
    cues.write(AudioCue::MenuMusic);
}

pub fn enter_loading(
    machine: Res<FlowMachine>,
    tunables: Res<Tunables>,
    mut hud: ResMut<Hud>,
    mut tasks: ResMut<TaskQueue>,
) {
    hud.show_only_flow(Panel::Loading);
    hud.loading_progress = 0.0;
    hud.loading_status.clear();

    tasks.cancel_owned_by(TaskOwner::Flow);
    let task = match machine.entering() {
        TransitionKind::Normal => loading_sequence(&tunables),
        TransitionKind::Restart => restart_sequence(&tunables),
    };
    tasks.spawn(task);
}

pub fn enter_playing(
    mut machine: ResMut<FlowMachine>,
    mut time: ResMut<Time<Virtual>>,
    mut hud: ResMut<Hud>,
    mut cues: MessageWriter<AudioCue>,
) {
    machine.clear_flags();
    time.unpause();
    hud.show_only_flow(Panel::Gameplay);
    cues.write(AudioCue::GameMusic);
}

pub fn enter_paused(
    mut machine: ResMut<FlowMachine>,
    mut time: ResMut<Time<Virtual>>,
    mut hud: ResMut<Hud>,
) {
    machine.paused = true;
    time.pause();
    hud.show_only_flow(Panel::PauseMenu);
}

pub fn enter_game_over(
    mut machine: ResMut<FlowMachine>,
    mut time: ResMut<Time<Virtual>>,
    mut hud: ResMut<Hud>,
) {
    machine.paused = false;
    machine.game_over = true;
    time.pause();
    hud.show_only_flow(Panel::GameOver);
}

pub fn enter_settings(mut hud: ResMut<Hud>) {
    hud.hide(Panel::MainMenu);
    hud.show(Panel::Settings);
}

pub fn exit_settings(mut hud: ResMut<Hud>) {
    hud.hide(Panel::Settings);
}
