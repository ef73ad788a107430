//! Growth projection from the recent XP history.
//!
//! Takes the last [`WINDOW_DAYS`] days of events, picks the category that
//! gained the most, and projects linearly how many days it needs to reach
//! its next milestone: level [`MILESTONE_LEVEL`] first, then one level at a
//! time.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::mechanics::category::Category;
use crate::mechanics::quadratic;
use crate::systems::progress::{CategoryTable, ProgressStore, XpHistory};
use crate::systems::sdk::{Backend, Clock};

pub const WINDOW_DAYS: i64 = 7;
pub const MILESTONE_LEVEL: u32 = 10;

pub const INSUFFICIENT_DATA: &str = "Not enough recent activity to make a prediction yet.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Prediction {
    /// No XP in the window (or only zero-sized gains).
    InsufficientData,
    /// The fastest category already has the lifetime XP of its target level.
    AlreadySurpassed { category: Category, target_level: u32 },
    /// At the current weekly pace the target is `days` away.
    OnTrack { category: Category, target_level: u32, days: u64 },
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Prediction::InsufficientData => f.write_str(INSUFFICIENT_DATA),
            Prediction::AlreadySurpassed { category, target_level } => {
                write!(f, "Your [{category}] has already surpassed Lv.{target_level}!")
            }
            Prediction::OnTrack { category, target_level, days } => write!(
                f,
                "Based on your last {WINDOW_DAYS} days, your '{}' is growing fastest and \
                 should break through Lv.{target_level} within {days} days.",
                category.skill_name()
            ),
        }
    }
}

/// Next milestone for a category at `level`.
#[inline]
pub fn target_level(level: u32) -> u32 {
    if level < MILESTONE_LEVEL { MILESTONE_LEVEL } else { level.saturating_add(1) }
}

/// Projects the fastest-growing category from `history` as seen at `now`.
///
/// Ties on weekly gain go to the category whose first event in the window
/// came earliest.
pub fn growth_prediction(history: &XpHistory, stats: &CategoryTable, now: DateTime<Utc>) -> Prediction {
    let since = now - Duration::days(WINDOW_DAYS);

    let mut gains: Vec<(Category, u64)> = Vec::new();
    for item in history.iter().filter(|i| i.date >= since) {
        match gains.iter_mut().find(|(c, _)| *c == item.attribute) {
            Some((_, sum)) => *sum = sum.saturating_add(item.amount),
            None => gains.push((item.attribute, item.amount)),
        }
    }

    let mut best: Option<(Category, u64)> = None;
    for &(c, sum) in &gains {
        if best.is_none_or(|(_, top)| sum > top) {
            best = Some((c, sum));
        }
    }
    let Some((category, weekly)) = best else {
        return Prediction::InsufficientData;
    };
    // daily rate = weekly / 7; a zero rate would never arrive
    if weekly == 0 {
        return Prediction::InsufficientData;
    }

    let stat = stats.get(category);
    let target = target_level(stat.level);
    let needed = quadratic::total_xp_for_level(target).saturating_sub(stat.total_xp);
    if needed == 0 {
        return Prediction::AlreadySurpassed { category, target_level: target };
    }

    // ceil(needed / (weekly / 7)) without going through floats
    let days = (u128::from(needed) * WINDOW_DAYS as u128).div_ceil(u128::from(weekly));
    Prediction::OnTrack {
        category,
        target_level: target,
        days: u64::try_from(days).unwrap_or(u64::MAX),
    }
}

impl<B: Backend, C: Clock> ProgressStore<B, C> {
    /// Growth projection for the stored record at the store clock's now.
    pub fn growth_prediction(&self) -> Result<Prediction> {
        let progress = self.load()?;
        Ok(growth_prediction(&progress.xp_history, &progress.stats, self.clock.now()))
    }
}
