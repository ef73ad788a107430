//! Account-level XP on the quadratic curve.
//!
//! When a category is given, its stats are recomputed from its lifetime total
//! on the *quadratic* curve, not rolled over like
//! [`add_attribute_xp`](ProgressStore::add_attribute_xp) does. Both paths
//! charge 500·L per level, so they agree for records built by one path alone;
//! they part ways when a stat block's bucket and lifetime total disagree
//! (records migrated from `categoryXP`, or hand-edited ones).

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::mechanics::category::Category;
use crate::mechanics::quadratic;
use crate::mechanics::titles::title_for_level;
use crate::systems::progress::{CategoryStats, ProgressStore, UserProgress};
use crate::systems::sdk::{Backend, Clock};

/// Result of a global XP update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub progress: UserProgress,
    pub leveled_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_up_message: Option<String>,
}

/// Celebration line shown on a global level-up.
pub fn level_up_message(title: &str, level: u32) -> String {
    format!("Congratulations! You have been promoted to [{title}] (Lv.{level})")
}

impl<B: Backend, C: Clock> ProgressStore<B, C> {
    /// Adds `xp_gained` to the account total, re-derives level and title,
    /// and optionally credits one category. History is left untouched.
    pub fn update_user_progress(
        &self,
        xp_gained: u64,
        category: Option<Category>,
    ) -> Result<ProgressUpdate> {
        let current = self.load()?;

        let total_xp = current.total_xp.saturating_add(xp_gained);
        let level = quadratic::level_from_total_xp(total_xp);
        let current_xp = total_xp - quadratic::total_xp_for_level(level);

        let mut category_xp = current.category_xp;
        let mut stats = current.stats;
        if let Some(category) = category {
            let ledger = category_xp.entry(category.as_str().to_string()).or_insert(0);
            *ledger = ledger.saturating_add(xp_gained);

            let stat = stats.get_mut(category);
            *stat = CategoryStats::from_total_xp(stat.total_xp.saturating_add(xp_gained));
        }

        let leveled_up = level > current.level;
        let title = title_for_level(level);

        let progress = UserProgress {
            level,
            current_xp,
            total_xp,
            title: title.to_string(),
            category_xp,
            stats,
            xp_history: current.xp_history,
        };
        self.save(&progress)?;

        debug!(xp_gained, total_xp, level, ?category, "global xp applied");
        let level_up_message = if leveled_up {
            info!(from = current.level, to = level, title, "account level up");
            Some(level_up_message(title, level))
        } else {
            None
        };

        Ok(ProgressUpdate { progress, leveled_up, level_up_message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::sdk::MemoryBackend;

    #[test]
    fn message_format() {
        assert_eq!(
            level_up_message("Intermediate AI Creator", 4),
            "Congratulations! You have been promoted to [Intermediate AI Creator] (Lv.4)"
        );
    }

    #[test]
    fn no_level_up_no_message() {
        let store = ProgressStore::new(MemoryBackend::new());
        let u = store.update_user_progress(499, None).unwrap();
        assert!(!u.leveled_up);
        assert!(u.level_up_message.is_none());
        assert_eq!(u.progress.level, 1);
        assert_eq!(u.progress.current_xp, 499);
    }

    #[test]
    fn legacy_ledger_accumulates() {
        let store = ProgressStore::new(MemoryBackend::new());
        store.update_user_progress(100, Some(Category::Speech)).unwrap();
        let u = store.update_user_progress(250, Some(Category::Speech)).unwrap();
        assert_eq!(u.progress.category_xp.get("speech"), Some(&350));
        assert_eq!(u.progress.category_xp.len(), 1);
    }

    #[test]
    fn saturated_totals_stay_bounded() {
        let store = ProgressStore::new(MemoryBackend::new());
        store.update_user_progress(u64::MAX, Some(Category::Coding)).unwrap();
        let u = store.update_user_progress(10, Some(Category::Coding)).unwrap();
        assert_eq!(u.progress.level, quadratic::MAX_LEVEL);
        assert_eq!(u.progress.total_xp, u64::MAX);
        assert!(u.progress.is_consistent());
        assert_eq!(u.progress.category_xp.get("coding"), Some(&u64::MAX));
        assert_eq!(u.progress.stats(Category::Coding).level, quadratic::MAX_LEVEL);
    }
}
