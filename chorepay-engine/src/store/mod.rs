mod conversation;
mod draft;
mod registry;
mod settlement;

use chorepay_shared::domain::{
    AppState, ChildId, ChildMode, ChildProfile, ParentProfile, Settings, Task, TaskId, TaskStatus,
};
use chorepay_shared::recurrence;
use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

pub use draft::{ChildPatch, NewTask, ProofSubmission, TaskPatch};

/// Structured error type for all state transitions.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The caller supplied invalid input; nothing was mutated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("child not found: {0}")]
    ChildNotFound(ChildId),

    /// The task's current status does not allow the requested move.
    #[error("task {task} cannot leave status {from:?} via this transition")]
    InvalidTransition { task: TaskId, from: TaskStatus },
}

/// Single owner of the application state. All mutation goes through the
/// transition methods below; each either fully applies or returns an
/// error with the state untouched.
#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: AppState) -> Self {
        Store { state }
    }

    /// Snapshot handed to the persistence collaborator.
    pub fn export_state(&self) -> &AppState {
        &self.state
    }

    /// Wholesale rehydration from a persisted blob.
    pub fn replace_state(&mut self, state: AppState) {
        self.state = state;
    }

    // ---- queries ----

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn task(&self, id: &TaskId) -> Result<&Task, StoreError> {
        self.state
            .tasks
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))
    }

    pub fn parent(&self) -> Option<&ParentProfile> {
        self.state.users.iter().find_map(|u| u.as_parent())
    }

    pub fn children(&self) -> impl Iterator<Item = &ChildProfile> {
        self.state.users.iter().filter_map(|u| u.as_child())
    }

    pub fn child(&self, id: &ChildId) -> Result<&ChildProfile, StoreError> {
        self.children()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::ChildNotFound(id.clone()))
    }

    pub fn tasks_for_child(&self, id: &ChildId) -> Vec<&Task> {
        self.state
            .tasks
            .iter()
            .filter(|t| &t.assigned_to == id)
            .collect()
    }

    /// Tasks occurring on `date`, per the computed recurrence view.
    pub fn tasks_on(&self, date: NaiveDate) -> Vec<&Task> {
        self.state
            .tasks
            .iter()
            .filter(|t| recurrence::occurs_on(t, date))
            .collect()
    }

    pub fn tasks_awaiting_approval(&self) -> Vec<&Task> {
        self.state
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::WaitingApproval)
            .collect()
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn filter_child(&self) -> Option<&ChildId> {
        self.state.filter_child_id.as_ref()
    }

    // ---- task transitions ----

    /// Append a new task in `Pending` status. The assignee must exist;
    /// id collisions are the caller's responsibility when an explicit id
    /// is supplied.
    pub fn create_task(&mut self, draft: NewTask) -> Result<TaskId, StoreError> {
        self.child(&draft.assigned_to)?;
        let id = draft
            .id
            .clone()
            .unwrap_or_else(|| TaskId(Uuid::new_v4().to_string()));
        let task = draft.build(id.clone(), draft.assigned_to.clone())?;
        debug!(task_id = %id, child_id = %task.assigned_to, "task created");
        self.state.tasks.push(task);
        Ok(id)
    }

    /// Fan-out creation: one independently-owned copy per registered
    /// child, each with a fresh id. The draft's own assignee is ignored.
    pub fn create_task_for_all_children(
        &mut self,
        draft: NewTask,
    ) -> Result<Vec<TaskId>, StoreError> {
        let child_ids: Vec<ChildId> = self.children().map(|c| c.id.clone()).collect();
        if child_ids.is_empty() {
            return Err(StoreError::InvalidInput(
                "no children registered to assign to".to_string(),
            ));
        }
        let mut created = Vec::with_capacity(child_ids.len());
        let mut tasks = Vec::with_capacity(child_ids.len());
        for child_id in child_ids {
            let id = TaskId(Uuid::new_v4().to_string());
            tasks.push(draft.build(id.clone(), child_id)?);
            created.push(id);
        }
        debug!(count = created.len(), "task fanned out to all children");
        self.state.tasks.extend(tasks);
        Ok(created)
    }

    /// Merge `patch` into an existing task. Allowed in any status so a
    /// parent can correct mistakes after the fact, with one exception:
    /// a completed task's status can never change again.
    pub fn edit_task(&mut self, id: &TaskId, patch: TaskPatch) -> Result<(), StoreError> {
        let idx = self.task_index(id)?;

        if let Some(title) = &patch.title {
            draft::validate_title(title)?;
        }
        if let Some(days) = &patch.selected_days {
            draft::validate_days(days)?;
        }
        if let Some(rewards) = &patch.rewards {
            draft::validate_rewards(rewards)?;
        }
        if let Some(Some(rule)) = &patch.streak {
            draft::validate_streak(rule)?;
        }
        if let Some(child_id) = &patch.assigned_to {
            self.child(child_id)?;
        }
        let task_date = match &patch.task_date {
            Some(raw) => draft::parse_date(raw)?,
            None => None,
        };
        let task_time = match &patch.task_time {
            Some(raw) => draft::parse_time(raw)?,
            None => None,
        };
        if let Some(status) = patch.status {
            let current = self.state.tasks[idx].status;
            if current == TaskStatus::Completed && status != TaskStatus::Completed {
                return Err(StoreError::InvalidTransition {
                    task: id.clone(),
                    from: current,
                });
            }
        }

        let task = &mut self.state.tasks[idx];
        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(icon) = patch.icon {
            task.icon = Some(icon);
        }
        if let Some(is_urgent) = patch.is_urgent {
            task.is_urgent = is_urgent;
        }
        if let Some(child_id) = patch.assigned_to {
            task.assigned_to = child_id;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(days) = patch.selected_days {
            task.kind = draft::kind_for_days(&days);
            task.selected_days = days;
        }
        // An empty date/time string keeps the existing value.
        if let Some(date) = task_date {
            task.task_date = Some(date);
        }
        if let Some(time) = task_time {
            task.task_time = Some(time);
        }
        if let Some(rewards) = patch.rewards {
            task.rewards = rewards;
        }
        if let Some(streak) = patch.streak {
            task.streak = streak;
        }
        debug!(task_id = %id, "task updated");
        Ok(())
    }

    /// Unconditional removal.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let idx = self.task_index(id)?;
        self.state.tasks.remove(idx);
        debug!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Child submits completion proof: moves the task to
    /// `WaitingApproval` and stores the proof fields verbatim, including
    /// the fraud flag pre-computed by the photo validator.
    pub fn complete_task(
        &mut self,
        id: &TaskId,
        submission: ProofSubmission,
    ) -> Result<(), StoreError> {
        let idx = self.task_index(id)?;
        let task = &mut self.state.tasks[idx];
        if task.status == TaskStatus::Completed {
            return Err(StoreError::InvalidTransition {
                task: id.clone(),
                from: task.status,
            });
        }
        task.status = TaskStatus::WaitingApproval;
        task.completed_at = Some(Utc::now());
        task.proof = submission.proof;
        task.proof_photo = submission.proof_photo;
        task.proof_photo_timestamp = submission.proof_photo_timestamp;
        task.fraud_warning = submission.fraud_warning;
        debug!(task_id = %id, fraud_warning = task.fraud_warning, "task submitted for approval");
        Ok(())
    }

    /// Parent review. Only legal from `WaitingApproval`, which makes
    /// double approval and double rejection impossible. Rejection never
    /// settles rewards, not even partially. The `needs_response` flag is
    /// advisory metadata for the caller and is not checked here.
    pub fn validate_task(&mut self, id: &TaskId, approved: bool) -> Result<(), StoreError> {
        let idx = self.task_index(id)?;
        let status = self.state.tasks[idx].status;
        if status != TaskStatus::WaitingApproval {
            return Err(StoreError::InvalidTransition {
                task: id.clone(),
                from: status,
            });
        }
        if approved {
            self.settle_approval(idx)?;
            debug!(task_id = %id, "task approved and settled");
        } else {
            self.state.tasks[idx].status = TaskStatus::Rejected;
            debug!(task_id = %id, "task rejected");
        }
        Ok(())
    }

    // ---- settings & session ----

    pub fn set_child_mode(&mut self, mode: ChildMode) {
        self.state.settings.child_mode = mode;
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.state.settings.dark_mode = !self.state.settings.dark_mode;
        self.state.settings.dark_mode
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.state.settings.language = language.into();
    }

    pub fn set_filter_child(&mut self, id: Option<ChildId>) {
        self.state.filter_child_id = id;
    }

    /// The simple lookup backing PIN login; the login flow itself is an
    /// external collaborator.
    pub fn verify_parent_pin(&self, pin: &str) -> bool {
        self.parent().is_some_and(|p| p.pin == pin)
    }

    // ---- internals ----

    fn task_index(&self, id: &TaskId) -> Result<usize, StoreError> {
        self.state
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))
    }

    fn child_profile_mut(&mut self, id: &ChildId) -> Result<&mut ChildProfile, StoreError> {
        self.state
            .users
            .iter_mut()
            .find_map(|u| u.as_child_mut().filter(|c| &c.id == id))
            .ok_or_else(|| StoreError::ChildNotFound(id.clone()))
    }
}
