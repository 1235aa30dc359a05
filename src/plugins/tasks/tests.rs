use super::*;

fn signals(events: &[TaskEvent]) -> Vec<TaskSignal> {
    events
        .iter()
        .filter_map(|e| match e.output {
            TaskOutput::Signal(s) => Some(s),
            TaskOutput::Sample { .. } => None,
        })
        .collect()
}

#[test]
fn wait_then_signal_fires_once_after_delay() {
    let mut queue = TaskQueue::default();
    queue.spawn(
        Task::new(TaskOwner::Flow, TaskClock::Virtual)
            .wait(1.0)
            .signal(TaskSignal::LoadingComplete),
    );

    assert!(signals(&queue.tick(0.6, 0.6)).is_empty());
    assert_eq!(signals(&queue.tick(0.6, 0.6)), vec![TaskSignal::LoadingComplete]);
    assert!(queue.is_empty(), "finished tasks are dropped");
    assert!(queue.tick(1.0, 1.0).is_empty());
}

#[test]
fn zero_duration_steps_complete_in_the_same_poll() {
    let mut queue = TaskQueue::default();
    queue.spawn(
        Task::new(TaskOwner::Flow, TaskClock::Virtual)
            .wait(0.0)
            .signal(TaskSignal::LoadingStatus("a"))
            .wait(0.0)
            .signal(TaskSignal::LoadingComplete),
    );

    let out = queue.tick(0.0, 0.0);
    assert_eq!(
        signals(&out),
        vec![TaskSignal::LoadingStatus("a"), TaskSignal::LoadingComplete]
    );
}

#[test]
fn virtual_clock_stands_still_while_paused_but_real_clock_runs() {
    let epoch = SessionEpoch(1);
    let mut queue = TaskQueue::default();
    queue.spawn(
        Task::new(TaskOwner::Session(epoch), TaskClock::Virtual)
            .wait(1.0)
            .signal(TaskSignal::RevealGameOver),
    );
    queue.spawn(
        Task::new(TaskOwner::Flow, TaskClock::Real)
            .wait(1.0)
            .signal(TaskSignal::LoadingComplete),
    );

    // Paused: virtual delta is zero.
    let out = queue.tick(0.0, 2.0);
    assert_eq!(signals(&out), vec![TaskSignal::LoadingComplete]);
    assert!(queue.has_owner(TaskOwner::Session(epoch)));

    let out = queue.tick(1.0, 1.0);
    assert_eq!(signals(&out), vec![TaskSignal::RevealGameOver]);
}

#[test]
fn tween_samples_interpolate_and_end_on_target() {
    let mut queue = TaskQueue::default();
    queue.spawn(Task::new(TaskOwner::Flow, TaskClock::Virtual).tween(
        TweenChannel::LoadingProgress,
        0.0,
        1.0,
        1.0,
    ));

    let out = queue.tick(0.25, 0.25);
    assert_eq!(
        out,
        vec![TaskEvent {
            owner: TaskOwner::Flow,
            output: TaskOutput::Sample { channel: TweenChannel::LoadingProgress, value: 0.25 },
        }]
    );

    let out = queue.tick(5.0, 5.0);
    assert_eq!(
        out.last().map(|e| e.output),
        Some(TaskOutput::Sample { channel: TweenChannel::LoadingProgress, value: 1.0 })
    );
    assert!(queue.is_empty());
}

#[test]
fn leftover_time_carries_into_following_steps() {
    let mut queue = TaskQueue::default();
    queue.spawn(
        Task::new(TaskOwner::Flow, TaskClock::Virtual)
            .wait(0.5)
            .signal(TaskSignal::LoadingStatus("one"))
            .wait(0.5)
            .signal(TaskSignal::LoadingStatus("two")),
    );

    assert_eq!(
        signals(&queue.tick(1.0, 1.0)),
        vec![TaskSignal::LoadingStatus("one"), TaskSignal::LoadingStatus("two")]
    );
}

#[test]
fn cancelling_an_owner_drops_only_its_tasks() {
    let mut queue = TaskQueue::default();
    queue.spawn(Task::new(TaskOwner::Session(SessionEpoch(1)), TaskClock::Virtual).wait(1.0));
    queue.spawn(Task::new(TaskOwner::Session(SessionEpoch(2)), TaskClock::Virtual).wait(1.0));
    queue.spawn(Task::new(TaskOwner::Flow, TaskClock::Virtual).wait(1.0));

    assert_eq!(queue.cancel_owned_by(TaskOwner::Session(SessionEpoch(1))), 1);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.cancel_sessions(), 1);
    assert!(queue.has_owner(TaskOwner::Flow));
    assert_eq!(queue.len(), 1);
}
