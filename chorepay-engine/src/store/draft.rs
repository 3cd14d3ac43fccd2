use chorepay_shared::domain::{
    ChildId, StreakRule, Task, TaskId, TaskKind, TaskRewards, TaskStatus, UserId,
};
use chorepay_shared::proof::ProofCheck;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::StoreError;

/// Caller-authored task draft. Schedule fields arrive as strings (the
/// form values); they are whitespace-trimmed and parsed on build.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Explicit id, when the caller manages ids itself. Collision is the
    /// caller's responsibility.
    pub id: Option<TaskId>,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_urgent: bool,
    pub assigned_to: ChildId,
    pub created_by: UserId,
    /// Monday-indexed weekdays; non-empty makes the task repetitive.
    pub selected_days: Vec<u8>,
    pub task_date: Option<String>,
    pub task_time: Option<String>,
    pub rewards: TaskRewards,
    pub streak: Option<StreakRule>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, assigned_to: ChildId, created_by: UserId) -> Self {
        NewTask {
            id: None,
            title: title.into(),
            description: None,
            icon: None,
            is_urgent: false,
            assigned_to,
            created_by,
            selected_days: vec![],
            task_date: None,
            task_time: None,
            rewards: TaskRewards::default(),
            streak: None,
        }
    }

    pub(super) fn build(&self, id: TaskId, assigned_to: ChildId) -> Result<Task, StoreError> {
        validate_title(&self.title)?;
        validate_days(&self.selected_days)?;
        validate_rewards(&self.rewards)?;
        if let Some(rule) = &self.streak {
            validate_streak(rule)?;
        }
        let task_date = match &self.task_date {
            Some(raw) => parse_date(raw)?,
            None => None,
        };
        let task_time = match &self.task_time {
            Some(raw) => parse_time(raw)?,
            None => None,
        };
        Ok(Task {
            id,
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            is_urgent: self.is_urgent,
            assigned_to,
            created_by: self.created_by.clone(),
            status: TaskStatus::Pending,
            kind: kind_for_days(&self.selected_days),
            selected_days: self.selected_days.clone(),
            task_date,
            task_time,
            rewards: self.rewards.clone(),
            streak: self.streak.clone(),
            proof: None,
            proof_photo: None,
            proof_photo_timestamp: None,
            fraud_warning: false,
            completed_at: None,
            conversation: vec![],
            needs_response: false,
        })
    }
}

/// Partial update merged into an existing task; `None` leaves a field
/// untouched. `streak` distinguishes "leave alone" (`None`) from
/// "disable" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_urgent: Option<bool>,
    pub assigned_to: Option<ChildId>,
    pub status: Option<TaskStatus>,
    pub selected_days: Option<Vec<u8>>,
    pub task_date: Option<String>,
    pub task_time: Option<String>,
    pub rewards: Option<TaskRewards>,
    pub streak: Option<Option<StreakRule>>,
}

/// Proof payload attached by `complete_task`, carrying the photo
/// validator's verdict computed before submission.
#[derive(Debug, Clone, Default)]
pub struct ProofSubmission {
    pub proof: Option<String>,
    pub proof_photo: Option<String>,
    pub proof_photo_timestamp: Option<NaiveDateTime>,
    pub fraud_warning: bool,
}

impl ProofSubmission {
    pub fn text(proof: impl Into<String>) -> Self {
        ProofSubmission {
            proof: Some(proof.into()),
            ..ProofSubmission::default()
        }
    }

    pub fn with_photo(
        proof: Option<String>,
        photo_payload: impl Into<String>,
        check: &ProofCheck,
    ) -> Self {
        ProofSubmission {
            proof,
            proof_photo: Some(photo_payload.into()),
            proof_photo_timestamp: check.photo_timestamp,
            fraud_warning: check.fraud_warning(),
        }
    }
}

/// Partial update for a child profile; balance, xp and streak are owned
/// by settlement and the wallet operations, never patched directly.
#[derive(Debug, Clone, Default)]
pub struct ChildPatch {
    pub name: Option<String>,
    pub avatar: Option<String>,
    /// Blank input clears the stored IBAN.
    pub iban: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

pub(super) fn validate_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "task title must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub(super) fn validate_days(days: &[u8]) -> Result<(), StoreError> {
    if let Some(day) = days.iter().find(|d| **d > 6) {
        return Err(StoreError::InvalidInput(format!(
            "weekday index out of range: {day}"
        )));
    }
    Ok(())
}

pub(super) fn validate_rewards(rewards: &TaskRewards) -> Result<(), StoreError> {
    if let Some(money) = rewards.money
        && money.0 < 0
    {
        return Err(StoreError::InvalidInput(
            "reward amount must not be negative".to_string(),
        ));
    }
    if rewards.items.iter().any(|label| label.trim().is_empty()) {
        return Err(StoreError::InvalidInput(
            "reward label must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub(super) fn validate_streak(rule: &StreakRule) -> Result<(), StoreError> {
    if let Some(bonus) = rule.bonus
        && bonus.0 < 0
    {
        return Err(StoreError::InvalidInput(
            "streak bonus must not be negative".to_string(),
        ));
    }
    if let Some(item) = &rule.bonus_item
        && item.trim().is_empty()
    {
        return Err(StoreError::InvalidInput(
            "streak reward label must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub(super) fn kind_for_days(days: &[u8]) -> TaskKind {
    if days.is_empty() {
        TaskKind::Unique
    } else {
        TaskKind::Repetitive
    }
}

/// Trim and parse a `YYYY-MM-DD` form value. Blank means "not set".
pub(super) fn parse_date(raw: &str) -> Result<Option<NaiveDate>, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| StoreError::InvalidInput(format!("invalid date: {trimmed:?}")))
}

/// Trim and parse an `HH:MM` (or `HH:MM:SS`) form value.
pub(super) fn parse_time(raw: &str) -> Result<Option<NaiveTime>, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(Some)
        .map_err(|_| StoreError::InvalidInput(format!("invalid time: {trimmed:?}")))
}
