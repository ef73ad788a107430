//! Per-category XP: bucket roll-over on the linear curve.
//!
//! This path persists on its own and does not touch the account level. A
//! task that should count for both runs it and then
//! [`update_user_progress`](ProgressStore::update_user_progress); the two are
//! separate read-modify-write cycles over the same document, not one
//! transaction.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::mechanics::category::Category;
use crate::mechanics::linear;
use crate::systems::progress::{ProgressStore, XpHistoryItem};
use crate::systems::sdk::{Backend, Clock};

/// What changed on one category, for level-up effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeUpdate {
    pub attribute: Category,
    pub leveled_up: bool,
    pub new_level: u32,
    pub levels_gained: u32,
    pub xp_added: u64,
    #[serde(rename = "currentXP")]
    pub current_xp: u64,
    #[serde(rename = "nextLevelXP")]
    pub next_level_xp: u64,
}

impl<B: Backend, C: Clock> ProgressStore<B, C> {
    /// Adds `amount` XP to one category, logs the gain and saves.
    ///
    /// Rolls over as many levels as the amount fills, charging
    /// `linear::xp_to_next_level` for each.
    pub fn add_attribute_xp(&self, category: Category, amount: u64) -> Result<AttributeUpdate> {
        let mut progress = self.load()?;
        let stats = progress.stats.get_mut(category);

        let r = linear::roll_over(stats.level, stats.xp, stats.next_level_xp, amount);
        stats.level = r.level;
        stats.xp = r.xp;
        stats.next_level_xp = r.next_level_xp;
        stats.total_xp = stats.total_xp.saturating_add(amount);

        // history entries carry positive amounts only
        if amount > 0 {
            progress.xp_history.push(XpHistoryItem {
                date: self.clock.now(),
                attribute: category,
                amount,
            });
        }

        self.save(&progress)?;

        debug!(%category, amount, level = r.level, xp = r.xp, "attribute xp applied");
        if r.levels_gained > 0 {
            info!(%category, level = r.level, gained = r.levels_gained, "attribute level up");
        }

        Ok(AttributeUpdate {
            attribute: category,
            leveled_up: r.levels_gained > 0,
            new_level: r.level,
            levels_gained: r.levels_gained,
            xp_added: amount,
            current_xp: r.xp,
            next_level_xp: r.next_level_xp,
        })
    }

    /// [`add_attribute_xp`](Self::add_attribute_xp) by wire name; unknown
    /// names fail with `Error::InvalidCategory` and nothing is written.
    pub fn add_attribute_xp_named(&self, category: &str, amount: u64) -> Result<AttributeUpdate> {
        self.add_attribute_xp(category.parse()?, amount)
    }
}
