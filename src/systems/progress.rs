//! User progress: the persisted record and the store that loads and saves it.
//!
//! One [`UserProgress`] document per account lives under [`PROGRESS_KEY`].
//! It is created lazily on first read and replaced whole on every update;
//! the updaters live in `attribute_xp` (per-category bucket roll-over) and
//! `global_xp` (account level from lifetime XP).

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mechanics::category::Category;
use crate::mechanics::titles::{attribute_title, title_for_level};
use crate::mechanics::{linear, quadratic};
use crate::systems::sdk::{Backend, Clock, SystemClock, read_or_default, write_document};

pub const PROGRESS_KEY: &str = "user_progress";

/// Most recent XP events kept for growth projection.
pub const XP_HISTORY_CAP: usize = 100;

/// Level state of one skill track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub level: u32,
    /// XP inside the current level; always below `next_level_xp`.
    pub xp: u64,
    pub next_level_xp: u64,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
}

impl Default for CategoryStats {
    fn default() -> Self {
        Self { level: 1, xp: 0, next_level_xp: linear::xp_to_next_level(1), total_xp: 0 }
    }
}

impl CategoryStats {
    /// Stats implied by a lifetime total on the quadratic curve.
    pub fn from_total_xp(total_xp: u64) -> Self {
        let level = quadratic::level_from_total_xp(total_xp);
        Self {
            level,
            xp: total_xp - quadratic::total_xp_for_level(level),
            next_level_xp: linear::xp_to_next_level(level),
            total_xp,
        }
    }
}

/// The five per-category stat blocks, stored as an object keyed by category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTable {
    pub painting: CategoryStats,
    pub music: CategoryStats,
    pub speech: CategoryStats,
    pub video: CategoryStats,
    pub coding: CategoryStats,
}

impl CategoryTable {
    pub fn get(&self, category: Category) -> &CategoryStats {
        match category {
            Category::Painting => &self.painting,
            Category::Music => &self.music,
            Category::Speech => &self.speech,
            Category::Video => &self.video,
            Category::Coding => &self.coding,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut CategoryStats {
        match category {
            Category::Painting => &mut self.painting,
            Category::Music => &mut self.music,
            Category::Speech => &mut self.speech,
            Category::Video => &mut self.video,
            Category::Coding => &mut self.coding,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryStats)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// One XP gain, appended by the attribute updater.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpHistoryItem {
    pub date: DateTime<Utc>,
    pub attribute: Category,
    pub amount: u64,
}

/// Oldest-first event log holding at most [`XP_HISTORY_CAP`] entries.
///
/// Stored as a plain JSON array; longer arrays keep only their newest tail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<XpHistoryItem>", into = "Vec<XpHistoryItem>")]
pub struct XpHistory {
    items: VecDeque<XpHistoryItem>,
}

impl XpHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends, dropping the oldest entry when full.
    pub fn push(&mut self, item: XpHistoryItem) {
        if self.items.len() == XP_HISTORY_CAP {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &XpHistoryItem> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn last(&self) -> Option<&XpHistoryItem> {
        self.items.back()
    }
}

impl From<Vec<XpHistoryItem>> for XpHistory {
    fn from(mut items: Vec<XpHistoryItem>) -> Self {
        if items.len() > XP_HISTORY_CAP {
            items.drain(..items.len() - XP_HISTORY_CAP);
        }
        Self { items: items.into() }
    }
}

impl From<XpHistory> for Vec<XpHistoryItem> {
    fn from(h: XpHistory) -> Self {
        h.items.into()
    }
}

impl<'a> IntoIterator for &'a XpHistory {
    type Item = &'a XpHistoryItem;
    type IntoIter = std::collections::vec_deque::Iter<'a, XpHistoryItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Account-wide progress.
///
/// `total_xp == quadratic::total_xp_for_level(level) + current_xp` after
/// every global update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub level: u32,
    #[serde(rename = "currentXP")]
    pub current_xp: u64,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    /// Cached `title_for_level(level)`.
    pub title: String,
    /// Legacy lifetime totals per category name.
    #[serde(rename = "categoryXP")]
    pub category_xp: BTreeMap<String, u64>,
    pub stats: CategoryTable,
    #[serde(rename = "xpHistory")]
    pub xp_history: XpHistory,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            total_xp: 0,
            title: title_for_level(1).to_string(),
            category_xp: BTreeMap::new(),
            stats: CategoryTable::default(),
            xp_history: XpHistory::new(),
        }
    }
}

impl UserProgress {
    pub fn stats(&self, category: Category) -> &CategoryStats {
        self.stats.get(category)
    }

    pub fn attribute_title(&self, category: Category) -> &'static str {
        attribute_title(category, self.stats.get(category).level)
    }

    /// Whether level, current and total XP agree on the quadratic curve.
    pub fn is_consistent(&self) -> bool {
        quadratic::total_xp_for_level(self.level).checked_add(self.current_xp) == Some(self.total_xp)
    }
}

/// On-disk shape, tolerant of records written before `categoryXP`,
/// `stats` or `xpHistory` existed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredProgress {
    level: Option<u32>,
    #[serde(rename = "currentXP")]
    current_xp: Option<u64>,
    #[serde(rename = "totalXP")]
    total_xp: Option<u64>,
    title: Option<String>,
    #[serde(rename = "categoryXP")]
    category_xp: Option<BTreeMap<String, u64>>,
    stats: Option<CategoryTable>,
    #[serde(rename = "xpHistory")]
    xp_history: Option<XpHistory>,
}

impl StoredProgress {
    fn migrate(self) -> UserProgress {
        let level = self.level.unwrap_or(1).max(1);
        let category_xp = self.category_xp.unwrap_or_default();
        let stats = self.stats.unwrap_or_else(|| {
            // older records only had the flat totals
            let mut table = CategoryTable::default();
            for c in Category::ALL {
                if let Some(&total) = category_xp.get(c.as_str()).filter(|t| **t > 0) {
                    *table.get_mut(c) = CategoryStats::from_total_xp(total);
                }
            }
            table
        });
        UserProgress {
            level,
            current_xp: self.current_xp.unwrap_or(0),
            total_xp: self.total_xp.unwrap_or(0),
            title: self.title.unwrap_or_else(|| title_for_level(level).to_string()),
            category_xp,
            stats,
            xp_history: self.xp_history.unwrap_or_default(),
        }
    }
}

/// Reads and writes [`UserProgress`] through a backend.
///
/// Holds no cached copy: every update reloads the document, so two updates
/// issued back to back each see the other's write only because they run in
/// sequence on one thread.
#[derive(Debug)]
pub struct ProgressStore<B: Backend, C: Clock = SystemClock> {
    pub(crate) backend: B,
    pub(crate) clock: C,
}

impl<B: Backend> ProgressStore<B, SystemClock> {
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: Backend, C: Clock> ProgressStore<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current progress; a fresh level-1 record if none (or garbage) is stored.
    pub fn load(&self) -> Result<UserProgress> {
        let stored: StoredProgress = read_or_default(&self.backend, PROGRESS_KEY)?;
        Ok(stored.migrate())
    }

    /// Replaces the stored record.
    pub fn save(&self, progress: &UserProgress) -> Result<()> {
        write_document(&self.backend, PROGRESS_KEY, progress)
    }
}
