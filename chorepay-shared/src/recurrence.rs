use chrono::{Datelike, NaiveDate};

use crate::domain::{Task, TaskKind};

/// Whether `task` has an occurrence on `date`.
///
/// Unique tasks occur on their scheduled date only. Repetitive tasks
/// occur on every date whose weekday appears in `selected_days`
/// (0 = Monday .. 6 = Sunday); no per-date instances exist anywhere.
pub fn occurs_on(task: &Task, date: NaiveDate) -> bool {
    match task.kind {
        TaskKind::Unique => task.task_date == Some(date),
        TaskKind::Repetitive => {
            let weekday = date.weekday().num_days_from_monday() as u8;
            task.selected_days.contains(&weekday)
        }
    }
}
