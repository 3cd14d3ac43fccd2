use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(pub String);

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ChildId {
    fn from(value: &str) -> Self {
        ChildId(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

impl From<&ChildId> for UserId {
    fn from(value: &ChildId) -> Self {
        UserId(value.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Amount of currency in euro-cents. Reward math stays in integer
/// arithmetic; display formatting is the only place a decimal point
/// appears.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub fn zero() -> Self {
        Money(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtract, clamping at zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{}{}.{:02}", sign, cents / 100, cents % 100)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    WaitingApproval,
    Completed,
    Rejected,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Unique,
    Repetitive,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Parent,
    Child,
}

/// One explicit optional money amount plus non-money labels. All labels
/// are granted; duplicates are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRewards {
    pub money: Option<Money>,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Streak configuration for a task. Present iff streaks are enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRule {
    pub days_required: u32,
    pub bonus: Option<Money>,
    pub bonus_item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMessage {
    pub id: MessageId,
    pub from: Sender,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_urgent: bool,
    pub assigned_to: ChildId,
    pub created_by: UserId,
    pub status: TaskStatus,
    pub kind: TaskKind,
    /// Monday-indexed weekdays (0 = Monday .. 6 = Sunday) a repetitive
    /// task recurs on. Occurrences are computed, never materialized.
    #[serde(default)]
    pub selected_days: Vec<u8>,
    pub task_date: Option<NaiveDate>,
    pub task_time: Option<NaiveTime>,
    pub rewards: TaskRewards,
    pub streak: Option<StreakRule>,
    pub proof: Option<String>,
    pub proof_photo: Option<String>,
    pub proof_photo_timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub fraud_warning: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub conversation: Vec<TaskMessage>,
    /// True exactly when the latest message came from the parent and the
    /// child has not yet replied. Maintained on every append.
    #[serde(default)]
    pub needs_response: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentProfile {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
    pub children_ids: Vec<ChildId>,
    pub pin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: ChildId,
    pub name: String,
    pub avatar: String,
    pub balance: Money,
    #[serde(default)]
    pub inventory: Vec<String>,
    pub level: u32,
    pub xp: u32,
    pub streak: u32,
    pub last_streak_date: Option<NaiveDate>,
    pub iban: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl ChildProfile {
    /// Level is derived from xp: every 100 xp is one boundary.
    pub fn level_for_xp(xp: u32) -> u32 {
        xp / 100 + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum User {
    Parent(ParentProfile),
    Child(ChildProfile),
}

impl User {
    pub fn name(&self) -> &str {
        match self {
            User::Parent(p) => &p.name,
            User::Child(c) => &c.name,
        }
    }

    pub fn as_parent(&self) -> Option<&ParentProfile> {
        match self {
            User::Parent(p) => Some(p),
            User::Child(_) => None,
        }
    }

    pub fn as_parent_mut(&mut self) -> Option<&mut ParentProfile> {
        match self {
            User::Parent(p) => Some(p),
            User::Child(_) => None,
        }
    }

    pub fn as_child(&self) -> Option<&ChildProfile> {
        match self {
            User::Parent(_) => None,
            User::Child(c) => Some(c),
        }
    }

    pub fn as_child_mut(&mut self) -> Option<&mut ChildProfile> {
        match self {
            User::Parent(_) => None,
            User::Child(c) => Some(c),
        }
    }

    pub fn is_child_with_id(&self, id: &ChildId) -> bool {
        self.as_child().is_some_and(|c| &c.id == id)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildMode {
    #[default]
    Under12,
    Under18,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub language: String,
    pub child_mode: ChildMode,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            language: "es".to_string(),
            child_mode: ChildMode::default(),
            dark_mode: false,
        }
    }
}

/// The whole persisted application state. Serialized as one opaque blob;
/// never written field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub settings: Settings,
    pub filter_child_id: Option<ChildId>,
}
