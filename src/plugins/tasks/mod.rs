//! Cooperative tasks: suspendable scripts resumed once per tick.
//!
//! A task is an ordered list of steps (wait, tween, signal). Each task owns its
//! elapsed time and reads one of two clocks:
//! - `Virtual`: halts while virtual time is paused (gameplay delays).
//! - `Real`: wall-clock, keeps running while paused (UI-only animation).
//!
//! Tasks never touch the world. Everything they produce leaves as `TaskEvent`
//! messages, and owners cancel their tasks explicitly on teardown.
//!
//! ```text
//! PreUpdate: poll_tasks -> TaskEvent -> (flow: LoadingComplete, session: RevealGameOver,
//!                                        ui: status text + progress samples)
//! ```

use std::collections::VecDeque;

use bevy::prelude::*;
use bevy::time::{Real, Virtual};

use crate::common::ids::SessionEpoch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskClock {
    Virtual,
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOwner {
    Flow,
    Session(SessionEpoch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenChannel {
    LoadingProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSignal {
    LoadingStatus(&'static str),
    LoadingComplete,
    RevealGameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Wait(f32),
    Tween { channel: TweenChannel, from: f32, to: f32, secs: f32 },
    Signal(TaskSignal),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskOutput {
    Signal(TaskSignal),
    Sample { channel: TweenChannel, value: f32 },
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct TaskEvent {
    pub owner: TaskOwner,
    pub output: TaskOutput,
}

#[derive(Debug, Clone)]
pub struct Task {
    owner: TaskOwner,
    clock: TaskClock,
    steps: VecDeque<Step>,
    elapsed: f32,
}

impl Task {
    pub fn new(owner: TaskOwner, clock: TaskClock) -> Self {
        Self { owner, clock, steps: VecDeque::new(), elapsed: 0.0 }
    }

    pub fn wait(mut self, secs: f32) -> Self {
        self.steps.push_back(Step::Wait(secs));
        self
    }

    pub fn tween(mut self, channel: TweenChannel, from: f32, to: f32, secs: f32) -> Self {
        self.steps.push_back(Step::Tween { channel, from, to, secs });
        self
    }

    pub fn signal(mut self, signal: TaskSignal) -> Self {
        self.steps.push_back(Step::Signal(signal));
        self
    }

    pub fn owner(&self) -> TaskOwner {
        self.owner
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Advance by `dt` seconds of this task's clock, running every step that fits.
    fn advance(&mut self, dt: f32, out: &mut Vec<TaskEvent>) {
        let mut budget = dt.max(0.0);

        while let Some(step) = self.steps.front().copied() {
            match step {
                Step::Signal(signal) => {
                    out.push(TaskEvent { owner: self.owner, output: TaskOutput::Signal(signal) });
                }
                Step::Wait(secs) => {
                    let left = secs - self.elapsed;
                    if budget < left {
                        self.elapsed += budget;
                        return;
                    }
                    budget -= left.max(0.0);
                }
                Step::Tween { channel, from, to, secs } => {
                    let left = secs - self.elapsed;
                    if budget < left {
                        self.elapsed += budget;
                        let t = (self.elapsed / secs).clamp(0.0, 1.0);
                        out.push(TaskEvent {
                            owner: self.owner,
                            output: TaskOutput::Sample { channel, value: from + (to - from) * t },
                        });
                        return;
                    }
                    budget -= left.max(0.0);
                    out.push(TaskEvent {
                        owner: self.owner,
                        output: TaskOutput::Sample { channel, value: to },
                    });
                }
            }
            self.elapsed = 0.0;
            self.steps.pop_front();
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct TaskQueue {
    tasks: Vec<Task>,
}

impl TaskQueue {
    pub fn spawn(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn has_owner(&self, owner: TaskOwner) -> bool {
        self.tasks.iter().any(|t| t.owner == owner)
    }

    /// Drop every task of `owner`. Returns how many were cancelled.
    pub fn cancel_owned_by(&mut self, owner: TaskOwner) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.owner != owner);
        before - self.tasks.len()
    }

    /// Drop every session-owned task, whatever its epoch.
    pub fn cancel_sessions(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !matches!(t.owner, TaskOwner::Session(_)));
        before - self.tasks.len()
    }

    /// Resume every task once, in spawn order, and drop the finished ones.
    pub fn tick(&mut self, virtual_dt: f32, real_dt: f32) -> Vec<TaskEvent> {
        let mut out = Vec::new();
        for task in &mut self.tasks {
            let dt = match task.clock {
                TaskClock::Virtual => virtual_dt,
                TaskClock::Real => real_dt,
            };
            task.advance(dt, &mut out);
        }
        self.tasks.retain(|t| !t.is_finished());
        out
    }
}

/// Resume all tasks once per tick.
///
/// Paused virtual time has a zero delta, so virtual-clock tasks stand still on
/// their own; no task re-checks the flow state.
pub fn poll_tasks(
    virtual_time: Res<Time<Virtual>>,
    real_time: Res<Time<Real>>,
    mut queue: ResMut<TaskQueue>,
    mut writer: MessageWriter<TaskEvent>,
) {
    if queue.is_empty() {
        return;
    }
    let events = queue.tick(virtual_time.delta_secs(), real_time.delta_secs());
    writer.write_batch(events);
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskPolling;

pub fn plugin(app: &mut App) {
    app.init_resource::<TaskQueue>()
        .add_message::<TaskEvent>()
        .add_systems(PreUpdate, poll_tasks.in_set(TaskPolling));
}

#[cfg(test)]
mod tests;
