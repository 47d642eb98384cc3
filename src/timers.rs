use super::*;

/// Deferred page work. Each variant is one `setTimeout`/`setInterval`
/// callback of the page behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Task {
    Reveal(NodeId),
    StartRoleRotation,
    RotateRole,
    TypeNextChar,
    RemoveNode(NodeId),
}

impl Task {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Reveal(_) => "reveal",
            Self::StartRoleRotation => "role_start",
            Self::RotateRole => "role_rotate",
            Self::TypeNextChar => "type_char",
            Self::RemoveNode(_) => "remove_node",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    order: i64,
    pub(crate) interval_ms: Option<i64>,
    pub(crate) task: Task,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub interval_ms: Option<i64>,
    pub label: &'static str,
}

#[derive(Debug, Clone)]
pub(crate) struct TimerQueue {
    tasks: Vec<ScheduledTask>,
    now_ms: i64,
    next_timer_id: i64,
    next_task_order: i64,
}

impl TimerQueue {
    pub(crate) fn new() -> Self {
        Self {
            tasks: Vec::new(),
            now_ms: 0,
            next_timer_id: 1,
            next_task_order: 0,
        }
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub(crate) fn set_now(&mut self, now_ms: i64) {
        self.now_ms = now_ms;
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn schedule_timeout(&mut self, task: Task, delay_ms: i64) -> ScheduledTask {
        self.push(task, delay_ms, None)
    }

    pub(crate) fn schedule_interval(&mut self, task: Task, interval_ms: i64) -> ScheduledTask {
        let interval_ms = interval_ms.max(0);
        self.push(task, interval_ms, Some(interval_ms))
    }

    fn push(&mut self, task: Task, delay_ms: i64, interval_ms: Option<i64>) -> ScheduledTask {
        let delay_ms = delay_ms.max(0);
        let scheduled = ScheduledTask {
            id: self.next_timer_id,
            due_at: self.now_ms.saturating_add(delay_ms),
            order: self.next_order(),
            interval_ms,
            task,
        };
        self.next_timer_id += 1;
        self.tasks.push(scheduled.clone());
        scheduled
    }

    fn next_order(&mut self) -> i64 {
        let order = self.next_task_order;
        self.next_task_order += 1;
        order
    }

    /// Puts an interval task back one period after its previous due time.
    pub(crate) fn requeue(&mut self, task: ScheduledTask) -> Option<ScheduledTask> {
        let interval_ms = task.interval_ms?;
        let requeued = ScheduledTask {
            due_at: task.due_at.saturating_add(interval_ms),
            order: self.next_order(),
            ..task
        };
        self.tasks.push(requeued.clone());
        Some(requeued)
    }

    pub(crate) fn clear(&mut self, id: i64) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        before - self.tasks.len()
    }

    pub(crate) fn clear_all(&mut self) -> usize {
        let cleared = self.tasks.len();
        self.tasks.clear();
        cleared
    }

    pub(crate) fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .tasks
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                interval_ms: task.interval_ms,
                label: task.task.label(),
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub(crate) fn has_next(&self, due_limit: Option<i64>) -> bool {
        self.next_task_index(due_limit).is_some()
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    /// Removes the earliest task due at or before `due_limit` (any task when
    /// `None`), moving the clock forward to its due time when `advance_clock`.
    pub(crate) fn pop_next(
        &mut self,
        due_limit: Option<i64>,
        advance_clock: bool,
    ) -> Option<ScheduledTask> {
        let idx = self.next_task_index(due_limit)?;
        let task = self.tasks.remove(idx);
        if advance_clock && task.due_at > self.now_ms {
            self.now_ms = task.due_at;
        }
        Some(task)
    }

    pub(crate) fn describe_next(&self, due_limit: Option<i64>) -> String {
        self.next_task_index(due_limit)
            .and_then(|idx| self.tasks.get(idx))
            .map(|task| {
                let interval_desc = task
                    .interval_ms
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "none".into());
                format!(
                    "id={},task={},due_at={},order={},interval_ms={}",
                    task.id,
                    task.task.label(),
                    task.due_at,
                    task.order,
                    interval_desc
                )
            })
            .unwrap_or_else(|| "none".into())
    }
}
