use chorepay_shared::domain::{ChildProfile, TaskStatus};
use tracing::warn;

use super::{Store, StoreError};

impl Store {
    /// Apply the reward math for an approved task and mark it completed,
    /// as one mutation. Either the child is paid and the task completed,
    /// or (missing child) nothing changes at all.
    pub(super) fn settle_approval(&mut self, task_idx: usize) -> Result<(), StoreError> {
        let task = &self.state.tasks[task_idx];
        let child_id = task.assigned_to.clone();
        let rewards = task.rewards.clone();
        let streak = task.streak.clone();

        let child = self.child_profile_mut(&child_id)?;

        // Base XP for any approved task, reward list or not.
        child.xp += 10;
        child.level = ChildProfile::level_for_xp(child.xp);

        if let Some(money) = rewards.money {
            child.balance = child.balance.saturating_add(money);
        }
        child.inventory.extend(rewards.items.iter().cloned());

        if let Some(rule) = streak {
            // The bonus is paid whenever the rule is present on the task;
            // the child's streak counter is not checked against
            // days_required.
            if child.streak < rule.days_required {
                warn!(
                    child_id = %child_id,
                    streak = child.streak,
                    days_required = rule.days_required,
                    "streak bonus paid below configured streak length"
                );
            }
            if let Some(bonus) = rule.bonus
                && !bonus.is_zero()
            {
                child.balance = child.balance.saturating_add(bonus);
            }
            if let Some(item) = rule.bonus_item {
                child.inventory.push(item);
            }
        }

        self.state.tasks[task_idx].status = TaskStatus::Completed;
        Ok(())
    }
}
