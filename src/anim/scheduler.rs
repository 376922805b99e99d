//! Cancelable time-based tasks
//!
//! Tweens are data, not closures: the scheduler only tracks time and hands
//! back eased progress, and the session applies it. Advancing happens from
//! the frame tick alone, so canceling a task is immediate and final.

use super::Easing;
use crate::geometry::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    /// Edit mode: move a part to its assembled position
    AssembleMove { part: String, from: Vec3, to: Vec3 },
    /// Simulator: settle the explode progress after release
    ExplodeSnap { from: f32, to: f32 },
    /// Single mode: scale and fade a part in
    Appear { part: String },
}

impl TaskKind {
    pub fn part(&self) -> Option<&str> {
        match self {
            TaskKind::AssembleMove { part, .. } | TaskKind::Appear { part } => Some(part),
            TaskKind::ExplodeSnap { .. } => None,
        }
    }
}

/// Progress report for one task this frame
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStep {
    pub id: TaskId,
    pub kind: TaskKind,
    /// Eased progress in [0, 1]
    pub progress: f32,
    pub finished: bool,
}

#[derive(Debug)]
struct Task {
    id: TaskId,
    kind: TaskKind,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Task {
    fn linear_progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    fn step(&self) -> TaskStep {
        let t = self.linear_progress();
        TaskStep {
            id: self.id,
            kind: self.kind.clone(),
            progress: self.easing.apply(t),
            finished: t >= 1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct AnimationScheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, kind: TaskKind, duration: f32, easing: Easing) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            kind,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        });
        id
    }

    /// Advance every task by `dt` seconds. Finished tasks are reported once
    /// with `progress == 1.0` and then removed.
    pub fn advance(&mut self, dt: f32) -> Vec<TaskStep> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut steps = Vec::with_capacity(self.tasks.len());
        for task in &mut self.tasks {
            task.elapsed += dt;
            steps.push(task.step());
        }
        self.tasks.retain(|t| t.linear_progress() < 1.0);
        steps
    }

    /// Jump a task to its end and remove it, returning its final step
    pub fn complete(&mut self, id: TaskId) -> Option<TaskStep> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let mut task = self.tasks.remove(index);
        task.elapsed = task.duration;
        Some(task.step())
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Cancel every task touching `part`. Returns how many were dropped.
    pub fn cancel_for_part(&mut self, part: &str) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.kind.part() != Some(part));
        before - self.tasks.len()
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_running(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Whether an assemble tween is in flight for `part`
    pub fn is_assembling(&self, part: &str) -> bool {
        self.tasks
            .iter()
            .any(|t| matches!(&t.kind, TaskKind::AssembleMove { part: p, .. } if p == part))
    }

    /// Eased progress of the appear tween running for `part`, if any
    pub fn appear_progress(&self, part: &str) -> Option<f32> {
        self.tasks
            .iter()
            .find(|t| matches!(&t.kind, TaskKind::Appear { part: p } if p == part))
            .map(|t| t.easing.apply(t.linear_progress()))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(part: &str) -> TaskKind {
        TaskKind::AssembleMove {
            part: part.into(),
            from: Vec3::ZERO,
            to: Vec3::UP,
        }
    }

    #[test]
    fn test_task_finishes_once_then_disappears() {
        let mut sched = AnimationScheduler::new();
        let id = sched.start(assemble("a"), 0.6, Easing::EaseOutCubic);

        let steps = sched.advance(0.3);
        assert_eq!(steps.len(), 1);
        assert!(!steps[0].finished);
        assert!(steps[0].progress > 0.5); // eased

        let steps = sched.advance(0.4);
        assert!(steps[0].finished);
        assert_eq!(steps[0].progress, 1.0);
        assert!(!sched.is_running(id));
        assert!(sched.advance(0.1).is_empty());
    }

    #[test]
    fn test_cancel_for_part() {
        let mut sched = AnimationScheduler::new();
        sched.start(assemble("a"), 0.6, Easing::Linear);
        sched.start(TaskKind::Appear { part: "a".into() }, 0.35, Easing::Linear);
        sched.start(assemble("b"), 0.6, Easing::Linear);
        sched.start(TaskKind::ExplodeSnap { from: 0.7, to: 1.0 }, 0.15, Easing::Linear);

        assert_eq!(sched.cancel_for_part("a"), 2);
        assert!(sched.is_assembling("b"));
        assert!(!sched.is_assembling("a"));
        assert_eq!(sched.len(), 2);

        sched.cancel_all();
        assert!(sched.is_empty());
    }

    #[test]
    fn test_appear_progress_tracks_running_fade() {
        let mut sched = AnimationScheduler::new();
        sched.start(TaskKind::Appear { part: "a".into() }, 0.4, Easing::Linear);
        sched.start(assemble("b"), 0.6, Easing::Linear);
        assert_eq!(sched.appear_progress("a"), Some(0.0));

        sched.advance(0.1);
        assert!((sched.appear_progress("a").unwrap() - 0.25).abs() < 1e-6);
        assert_eq!(sched.appear_progress("b"), None);

        sched.advance(0.3);
        assert_eq!(sched.appear_progress("a"), None);
    }

    #[test]
    fn test_complete_jumps_to_end() {
        let mut sched = AnimationScheduler::new();
        let id = sched.start(TaskKind::ExplodeSnap { from: 0.7, to: 1.0 }, 0.15, Easing::Linear);
        let step = sched.complete(id).unwrap();
        assert!(step.finished);
        assert_eq!(step.progress, 1.0);
        assert!(sched.is_empty());
        assert!(sched.complete(id).is_none());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut sched = AnimationScheduler::new();
        sched.start(assemble("a"), 0.0, Easing::EaseOutCubic);
        let steps = sched.advance(0.0);
        assert!(steps[0].finished);
    }
}
