//! Tasks and the task queue.
//!
//! A task is a unit of work at a tile: created by designation or by the
//! colony AI discovering haul/cook work, claimed by at most one colonist,
//! progressed while claimed, and removed once its effects are applied.

use serde::{Deserialize, Serialize};

use crate::building::BuildType;
use crate::constants::work::DEFAULT_PRIORITY;
use crate::grid::Position;
use crate::ids::{ColonistId, IdSequence, TaskId};

/// Kinds of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Mine,
    Chop,
    Haul,
    Build,
    Cook,
    Eat,
    Sleep,
}

impl TaskType {
    /// Work ticks needed when no build subtype applies.
    pub fn base_work_time(self) -> f32 {
        match self {
            TaskType::Mine => 100.0,
            TaskType::Chop => 80.0,
            TaskType::Haul => 20.0,
            TaskType::Build => 50.0,
            TaskType::Cook => 40.0,
            TaskType::Eat => 30.0,
            TaskType::Sleep => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskType::Mine => "mine",
            TaskType::Chop => "chop",
            TaskType::Haul => "haul",
            TaskType::Build => "build",
            TaskType::Cook => "cook",
            TaskType::Eat => "eat",
            TaskType::Sleep => "sleep",
        }
    }
}

/// Completion threshold for a task. Build tasks use their subtype's time
/// and fall back to the generic build time without one.
pub fn work_time(task_type: TaskType, build_type: Option<BuildType>) -> f32 {
    match (task_type, build_type) {
        (TaskType::Build, Some(build)) => build.work_time(),
        _ => task_type.base_work_time(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub task_type: TaskType,
    pub pos: Position,
    pub priority: i32,
    pub assigned_to: Option<ColonistId>,
    pub progress: f32,
    pub build_type: Option<BuildType>,
}

impl Task {
    pub fn new(id: TaskId, task_type: TaskType, pos: Position, priority: i32) -> Self {
        Self {
            id,
            task_type,
            pos,
            priority,
            assigned_to: None,
            progress: 0.0,
            build_type: None,
        }
    }

    pub fn with_build(mut self, build_type: BuildType) -> Self {
        self.build_type = Some(build_type);
        self
    }

    /// Hand the task to `colonist`. Returns whoever held it before; keeping
    /// that colonist's own state consistent is the caller's job.
    pub fn assign(&mut self, colonist: ColonistId) -> Option<ColonistId> {
        self.assigned_to.replace(colonist)
    }

    pub fn unassign(&mut self) {
        self.assigned_to = None;
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }

    pub fn work_time(&self) -> f32 {
        work_time(self.task_type, self.build_type)
    }

    /// Add work. Returns true once the accumulated progress reaches the
    /// work time. Negative amounts are ignored.
    pub fn progress(&mut self, amount: f32) -> bool {
        if amount > 0.0 {
            self.progress += amount;
        }
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.work_time()
    }
}

/// All live tasks in creation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQueue {
    tasks: Vec<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and enqueue a task, returning its id.
    pub fn create(
        &mut self,
        ids: &mut IdSequence,
        task_type: TaskType,
        pos: Position,
        priority: Option<i32>,
    ) -> TaskId {
        let id = ids.next_task();
        let task = Task::new(id, task_type, pos, priority.unwrap_or(DEFAULT_PRIORITY));
        self.tasks.push(task);
        id
    }

    /// Create a build task for `build_type` at the default priority.
    pub fn create_build(
        &mut self,
        ids: &mut IdSequence,
        pos: Position,
        build_type: BuildType,
    ) -> TaskId {
        let id = ids.next_task();
        let task = Task::new(id, TaskType::Build, pos, DEFAULT_PRIORITY).with_build(build_type);
        self.tasks.push(task);
        id
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn unassigned(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(|t| !t.is_assigned())
    }

    pub fn of_type(&self, task_type: TaskType) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |t| t.task_type == task_type)
    }

    /// Unassigned task with the largest priority number; the earliest
    /// created wins a tie.
    pub fn highest_priority(&self) -> Option<&Task> {
        self.unassigned().fold(None, |best: Option<&Task>, t| match best {
            Some(b) if b.priority >= t.priority => Some(b),
            _ => Some(t),
        })
    }

    /// Whether a task of `task_type` already targets `pos`.
    pub fn any_at(&self, task_type: TaskType, pos: Position) -> bool {
        self.tasks
            .iter()
            .any(|t| t.task_type == task_type && t.pos == pos)
    }

    /// Tasks currently claimed by `colonist`.
    pub fn held_by(&self, colonist: ColonistId) -> impl Iterator<Item = &Task> + '_ {
        self.tasks
            .iter()
            .filter(move |t| t.assigned_to == Some(colonist))
    }

    /// Release every task `colonist` holds. Returns how many were released.
    pub fn release_all(&mut self, colonist: ColonistId) -> usize {
        let mut released = 0;
        for task in self
            .tasks
            .iter_mut()
            .filter(|t| t.assigned_to == Some(colonist))
        {
            task.unassign();
            released += 1;
        }
        released
    }

    /// Remove a task by id. An absent id is a no-op.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_with(priorities: &[i32]) -> (TaskQueue, IdSequence) {
        let mut ids = IdSequence::new();
        let mut queue = TaskQueue::new();
        for (i, &p) in priorities.iter().enumerate() {
            queue.create(&mut ids, TaskType::Mine, Position::new(i as i32, 0), Some(p));
        }
        (queue, ids)
    }

    #[test]
    fn test_create_defaults() {
        let mut ids = IdSequence::new();
        let mut queue = TaskQueue::new();
        let id = queue.create(&mut ids, TaskType::Chop, Position::new(3, 4), None);
        let task = queue.get(id).unwrap();
        assert_eq!(task.priority, DEFAULT_PRIORITY);
        assert_eq!(task.progress, 0.0);
        assert!(task.assigned_to.is_none());
        assert_eq!(task.pos, Position::new(3, 4));
        assert_eq!(id.to_string(), "task-1");
    }

    #[test]
    fn test_ids_are_unique() {
        let (queue, _) = queue_with(&[1, 1, 1]);
        let mut ids: Vec<TaskId> = queue.iter().map(|t| t.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_assign_is_last_writer_wins() {
        let (mut queue, _) = queue_with(&[5]);
        let task = queue.get_mut(TaskId(1)).unwrap();
        assert_eq!(task.assign(ColonistId(1)), None);
        assert_eq!(task.assign(ColonistId(2)), Some(ColonistId(1)));
        assert_eq!(task.assigned_to, Some(ColonistId(2)));
    }

    #[test]
    fn test_progress_reports_completion_on_crossing() {
        let mut task = Task::new(TaskId(1), TaskType::Haul, Position::new(0, 0), 5);
        assert!(!task.progress(10.0));
        assert!(!task.progress(9.5));
        let before = task.progress;
        assert!(task.progress(0.5));
        assert!(task.progress >= before);
        assert!(task.is_complete());
        // Progress never goes backwards.
        assert!(task.progress(-5.0));
        assert_eq!(task.progress, 20.0);
    }

    #[test]
    fn test_build_work_time_uses_subtype() {
        assert_eq!(work_time(TaskType::Build, Some(BuildType::Bed)), 60.0);
        assert_eq!(work_time(TaskType::Build, None), 50.0);
        assert_eq!(work_time(TaskType::Mine, Some(BuildType::Bed)), 100.0);
        let stockpile = Task::new(TaskId(1), TaskType::Build, Position::new(0, 0), 5)
            .with_build(BuildType::Stockpile);
        assert!(stockpile.is_complete());
    }

    #[test]
    fn test_highest_priority_prefers_larger_number() {
        let (mut queue, _) = queue_with(&[3, 9, 9, 1]);
        assert_eq!(queue.highest_priority().unwrap().id, TaskId(2));
        queue.get_mut(TaskId(2)).unwrap().assign(ColonistId(1));
        assert_eq!(queue.highest_priority().unwrap().id, TaskId(3));
    }

    #[test]
    fn test_filters() {
        let mut ids = IdSequence::new();
        let mut queue = TaskQueue::new();
        queue.create(&mut ids, TaskType::Mine, Position::new(0, 0), None);
        let haul = queue.create(&mut ids, TaskType::Haul, Position::new(1, 0), Some(8));
        queue.get_mut(haul).unwrap().assign(ColonistId(4));

        assert_eq!(queue.unassigned().count(), 1);
        assert_eq!(queue.of_type(TaskType::Haul).count(), 1);
        assert!(queue.any_at(TaskType::Haul, Position::new(1, 0)));
        assert!(!queue.any_at(TaskType::Mine, Position::new(1, 0)));
        assert_eq!(queue.held_by(ColonistId(4)).count(), 1);

        assert_eq!(queue.release_all(ColonistId(4)), 1);
        assert_eq!(queue.unassigned().count(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut queue, _) = queue_with(&[1, 2]);
        assert!(queue.remove(TaskId(7)).is_none());
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.remove(TaskId(1)).unwrap().priority, 1);
        assert_eq!(queue.len(), 1);
    }
}
