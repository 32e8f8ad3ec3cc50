use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::core::errors::{Result, ShopkeeperError};
use crate::core::models::actor::Actor;
use crate::core::models::audit_entry::{AuditAction, AuditEntry};
use crate::core::models::shop::{MentionField, NewShop, Shop, ShopUpdate};
use crate::core::models::tier::{Allotment, Tier, TierTable};
use crate::core::traits::audit::AuditLogger;
use crate::core::traits::shop_store::ShopStore;

/// Hard upper bound for every mention counter unless configured otherwise.
pub const DEFAULT_CEILING: u32 = 30_000;

/// How many mentions shops get, and how many they may hold.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaRules {
    /// Applies to all tiers and all three counters.
    pub ceiling: u32,
    pub tiers: TierTable,
}

impl Default for QuotaRules {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_CEILING,
            tiers: TierTable::default(),
        }
    }
}

/// Shop registry and mention ledger.
///
/// Every successful mutation appends exactly one audit entry. Failed
/// operations leave both the store and the log untouched: when the audit
/// write fails after the store has changed, the change is undone.
#[derive(Clone)]
pub struct ShopService {
    store: Arc<dyn ShopStore>,
    audit: Arc<dyn AuditLogger>,
    rules: QuotaRules,
}

impl ShopService {
    pub fn new(store: Arc<dyn ShopStore>, audit: Arc<dyn AuditLogger>, rules: QuotaRules) -> Self {
        Self {
            store,
            audit,
            rules,
        }
    }

    pub fn rules(&self) -> &QuotaRules {
        &self.rules
    }

    /// Create a shop seeded with its tier's allotment.
    pub fn create_shop(&self, actor: &Actor, name: &str, tier: &str) -> Result<Shop> {
        let tier: Tier = tier.parse()?;
        let name = validate_name(name)?;

        let allotment = self.rules.tiers.allotment(tier);
        let counters = Allotment::new(
            allotment.mention_everyone.min(self.rules.ceiling),
            allotment.mention_here.min(self.rules.ceiling),
            allotment.mention_stores.min(self.rules.ceiling),
        );

        let shop = self.store.insert(NewShop {
            owner: actor.id.clone(),
            name,
            tier,
            counters,
        })?;
        info!(shop_id = shop.id, tier = %tier, actor = %actor, "shop created");

        self.record_or_undo(
            actor,
            AuditAction::ShopCreated,
            &shop.name,
            format!("الفئة: {tier}"),
            || self.store.remove(shop.id).map(drop),
        )?;
        Ok(shop)
    }

    pub fn list_shops(&self) -> Result<Vec<Shop>> {
        self.store.list()
    }

    pub fn get_shop(&self, id: u64) -> Result<Shop> {
        self.store
            .get(id)?
            .ok_or(ShopkeeperError::ShopNotFound { id })
    }

    /// Change a shop's name and/or tier. Counters are left as they are.
    pub fn update_shop(&self, actor: &Actor, id: u64, update: &ShopUpdate) -> Result<Shop> {
        let name = update.name.as_deref().map(validate_name).transpose()?;
        let tier = update
            .tier
            .as_deref()
            .map(str::parse::<Tier>)
            .transpose()?;

        let mut changes = Vec::new();
        let mut previous = None;
        let updated = self
            .store
            .update(id, &mut |shop: &mut Shop| {
                changes.clear();
                previous = Some((shop.name.clone(), shop.tier));
                if let Some(name) = &name
                    && *name != shop.name
                {
                    changes.push(format!("الاسم: {} ← {}", shop.name, name));
                    shop.name = name.clone();
                }
                if let Some(tier) = tier
                    && tier != shop.tier
                {
                    changes.push(format!("الفئة: {} ← {}", shop.tier, tier));
                    shop.tier = tier;
                }
                Ok(())
            })?
            .ok_or(ShopkeeperError::ShopNotFound { id })?;

        let details = if changes.is_empty() {
            "بدون تغيير".to_string()
        } else {
            changes.join("، ")
        };
        self.record_or_undo(actor, AuditAction::ShopUpdated, &updated.name, details, || {
            let Some((old_name, old_tier)) = previous.clone() else {
                return Ok(());
            };
            self.store
                .update(id, &mut |shop: &mut Shop| {
                    shop.name = old_name.clone();
                    shop.tier = old_tier;
                    Ok(())
                })
                .map(drop)
        })?;
        Ok(updated)
    }

    /// Delete a shop. Unknown ids are a no-op and return `false`.
    pub fn delete_shop(&self, actor: &Actor, id: u64) -> Result<bool> {
        let Some(removed) = self.store.remove(id)? else {
            debug!(shop_id = id, "delete ignored, shop does not exist");
            return Ok(false);
        };
        info!(shop_id = id, actor = %actor, "shop deleted");

        self.record_or_undo(
            actor,
            AuditAction::ShopDeleted,
            &removed.name,
            format!("الفئة: {}", removed.tier),
            || self.store.restore(removed.clone()),
        )?;
        Ok(true)
    }

    /// Deduct `amount` mentions from one counter and return what is left.
    ///
    /// Fails with `QuotaExceeded` when fewer than `amount` remain; the
    /// counter is not touched in that case.
    pub fn use_mention(
        &self,
        actor: &Actor,
        id: u64,
        field: MentionField,
        amount: u32,
    ) -> Result<u32> {
        if amount == 0 {
            return Err(ShopkeeperError::InvalidAmount);
        }

        let updated = self
            .store
            .update(id, &mut |shop: &mut Shop| {
                let counter = shop.counter_mut(field);
                if *counter < amount {
                    return Err(ShopkeeperError::QuotaExceeded {
                        field: field.to_string(),
                        remaining: *counter,
                        requested: amount,
                    });
                }
                *counter -= amount;
                Ok(())
            })?
            .ok_or(ShopkeeperError::ShopNotFound { id })?;

        let remaining = updated.counter(field);
        debug!(shop_id = id, %field, amount, remaining, "mention used");

        self.record_or_undo(
            actor,
            AuditAction::MentionUsed,
            &updated.name,
            format!("نوع: {field} -{amount}"),
            || {
                self.store
                    .update(id, &mut |shop: &mut Shop| {
                        let counter = shop.counter_mut(field);
                        *counter = counter.saturating_add(amount);
                        Ok(())
                    })
                    .map(drop)
            },
        )?;
        Ok(remaining)
    }

    /// Add the tier allotment to all three counters, saturating at the
    /// ceiling.
    pub fn renew_mentions(&self, actor: &Actor, id: u64) -> Result<Shop> {
        let ceiling = self.rules.ceiling;
        let tiers = &self.rules.tiers;

        let mut added = [0u32; 3];
        let updated = self
            .store
            .update(id, &mut |shop: &mut Shop| {
                let allotment = tiers.allotment(shop.tier);
                for (i, field) in MentionField::ALL.into_iter().enumerate() {
                    let counter = shop.counter_mut(field);
                    let raised = counter.saturating_add(field.of(&allotment)).min(ceiling);
                    // a counter left above a since-lowered ceiling is not cut down
                    let next = (*counter).max(raised);
                    added[i] = next - *counter;
                    *counter = next;
                }
                Ok(())
            })?
            .ok_or(ShopkeeperError::ShopNotFound { id })?;
        info!(shop_id = id, actor = %actor, "mentions renewed");

        self.record_or_undo(
            actor,
            AuditAction::MentionsRenewed,
            &updated.name,
            format!(
                "الكل: {}، هنا: {}، المتاجر: {}",
                updated.mention_everyone, updated.mention_here, updated.mention_stores
            ),
            || {
                self.store
                    .update(id, &mut |shop: &mut Shop| {
                        for (i, field) in MentionField::ALL.into_iter().enumerate() {
                            let counter = shop.counter_mut(field);
                            *counter = counter.saturating_sub(added[i]);
                        }
                        Ok(())
                    })
                    .map(drop)
            },
        )?;
        Ok(updated)
    }

    /// Newest audit entries first.
    pub fn recent_logs(&self, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
        self.audit.recent(limit)
    }

    /// Write the audit entry for a change that is already in the store. If
    /// that fails, `undo` reverts the change and the audit error is returned.
    fn record_or_undo(
        &self,
        actor: &Actor,
        action: AuditAction,
        store: &str,
        details: String,
        undo: impl FnOnce() -> Result<()>,
    ) -> Result<()> {
        let Err(err) = self.record(actor, action, store, details) else {
            return Ok(());
        };
        match undo() {
            Ok(()) => warn!(action = %action, store, "change reverted, audit log unavailable"),
            Err(undo_err) => tracing::error!(
                error = %undo_err,
                action = %action,
                store,
                "could not revert change after audit failure"
            ),
        }
        Err(err)
    }

    fn record(&self, actor: &Actor, action: AuditAction, store: &str, details: String) -> Result<()> {
        let entry = AuditEntry {
            time: Utc::now(),
            action,
            store: store.to_string(),
            actor_name: actor.name.clone(),
            actor_id: actor.id.clone(),
            details,
        };
        self.audit.log_event(&entry).inspect_err(|e| {
            tracing::error!(error = %e, action = %action, store, "could not write audit entry");
        })
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ShopkeeperError::InvalidName);
    }
    Ok(trimmed.to_string())
}
