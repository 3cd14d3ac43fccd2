use chorepay_shared::domain::{ChildId, ChildProfile, Money, ParentProfile, User, UserId};
use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use super::{ChildPatch, Store, StoreError};
use crate::config::AppConfig;

impl Store {
    /// Build the initial state from the seed configuration. Applied only
    /// to an empty state; a rehydrated store is left as loaded.
    pub fn seed_from_config(&mut self, cfg: &AppConfig) -> Result<(), StoreError> {
        if !self.state.users.is_empty() {
            return Ok(());
        }
        if let Some(language) = &cfg.language {
            self.state.settings.language = language.clone();
        }
        self.state.users.push(User::Parent(ParentProfile {
            id: UserId(Uuid::new_v4().to_string()),
            name: cfg.parent.name.clone(),
            avatar: cfg.parent.avatar.clone(),
            children_ids: vec![],
            pin: cfg.parent.pin.clone(),
        }));
        for seed in &cfg.children {
            self.add_child(
                &seed.name,
                &seed.avatar,
                seed.iban.clone(),
                seed.birth_date,
            )?;
        }
        debug!(children = cfg.children.len(), "state seeded from config");
        Ok(())
    }

    /// Register a new child under the sole parent. The name needs at
    /// least two visible characters.
    pub fn add_child(
        &mut self,
        name: &str,
        avatar: &str,
        iban: Option<String>,
        birth_date: Option<NaiveDate>,
    ) -> Result<ChildId, StoreError> {
        let name = name.trim();
        if name.chars().count() < 2 {
            return Err(StoreError::InvalidInput(
                "child name needs at least 2 characters".to_string(),
            ));
        }
        let parent = self
            .state
            .users
            .iter_mut()
            .find_map(|u| u.as_parent_mut())
            .ok_or_else(|| StoreError::InvalidInput("no parent profile in state".to_string()))?;

        let id = ChildId(Uuid::new_v4().to_string());
        parent.children_ids.push(id.clone());
        self.state.users.push(User::Child(ChildProfile {
            id: id.clone(),
            name: name.to_string(),
            avatar: avatar.to_string(),
            balance: Money::zero(),
            inventory: vec![],
            level: 1,
            xp: 0,
            streak: 0,
            last_streak_date: None,
            iban,
            birth_date,
        }));
        debug!(child_id = %id, "child added");
        Ok(id)
    }

    /// Merge-only profile update.
    pub fn update_child(&mut self, id: &ChildId, patch: ChildPatch) -> Result<(), StoreError> {
        if let Some(name) = &patch.name
            && name.trim().chars().count() < 2
        {
            return Err(StoreError::InvalidInput(
                "child name needs at least 2 characters".to_string(),
            ));
        }
        let child = self.child_profile_mut(id)?;
        if let Some(name) = patch.name {
            child.name = name.trim().to_string();
        }
        if let Some(avatar) = patch.avatar {
            child.avatar = avatar;
        }
        if let Some(iban) = patch.iban {
            let trimmed = iban.trim();
            child.iban = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(birth_date) = patch.birth_date {
            child.birth_date = Some(birth_date);
        }
        debug!(child_id = %id, "child updated");
        Ok(())
    }

    /// Remove a child, detach it from the parent, and hard-delete every
    /// task assigned to it.
    pub fn delete_child(&mut self, id: &ChildId) -> Result<(), StoreError> {
        self.child(id)?;
        if let Some(parent) = self.state.users.iter_mut().find_map(|u| u.as_parent_mut()) {
            parent.children_ids.retain(|c| c != id);
        }
        self.state.users.retain(|u| !u.is_child_with_id(id));
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| &t.assigned_to != id);
        debug!(
            child_id = %id,
            cascaded_tasks = before - self.state.tasks.len(),
            "child deleted"
        );
        Ok(())
    }

    // ---- wallet & inventory ----

    /// Direct balance top-up outside any task (e.g. pocket money).
    /// Returns the new balance.
    pub fn grant_manual_reward(
        &mut self,
        id: &ChildId,
        amount: Money,
    ) -> Result<Money, StoreError> {
        if amount.0 <= 0 {
            return Err(StoreError::InvalidInput(
                "amount must be positive".to_string(),
            ));
        }
        let child = self.child_profile_mut(id)?;
        child.balance = child.balance.saturating_add(amount);
        debug!(child_id = %id, amount = %amount, balance = %child.balance, "manual reward granted");
        Ok(child.balance)
    }

    /// Explicit deduction, clamped so the balance never goes negative.
    /// Returns the new balance.
    pub fn deduct_balance(&mut self, id: &ChildId, amount: Money) -> Result<Money, StoreError> {
        if amount.0 <= 0 {
            return Err(StoreError::InvalidInput(
                "amount must be positive".to_string(),
            ));
        }
        let child = self.child_profile_mut(id)?;
        child.balance = child.balance.saturating_sub(amount);
        debug!(child_id = %id, amount = %amount, balance = %child.balance, "balance deducted");
        Ok(child.balance)
    }

    /// Remove and return the unredeemed reward label at `index`.
    pub fn redeem_inventory_item(
        &mut self,
        id: &ChildId,
        index: usize,
    ) -> Result<String, StoreError> {
        let child = self.child_profile_mut(id)?;
        if index >= child.inventory.len() {
            return Err(StoreError::InvalidInput(format!(
                "no inventory item at index {index}"
            )));
        }
        let label = child.inventory.remove(index);
        debug!(child_id = %id, label = %label, "inventory item redeemed");
        Ok(label)
    }
}
