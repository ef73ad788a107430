//! Badge definitions.
//!
//! Badges are never stored: each one is a predicate over [`UserProgress`],
//! re-evaluated whenever a wall of medals is drawn.

use serde::Serialize;

use crate::mechanics::category::Category;
use crate::systems::progress::UserProgress;

/// Badge rarity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Collection points a badge of this rarity is worth.
    #[inline]
    pub const fn points(self) -> u32 {
        match self {
            Rarity::Common => 10,
            Rarity::Rare => 30,
            Rarity::Epic => 50,
            Rarity::Legendary => 100,
        }
    }
}

/// Which skill a badge belongs to, for icon selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeIcon {
    Skill(Category),
    General,
}

/// A badge definition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: BadgeIcon,
    pub rarity: Rarity,
    #[serde(skip)]
    condition: fn(&UserProgress) -> bool,
}

impl Badge {
    pub fn is_unlocked(&self, progress: &UserProgress) -> bool {
        (self.condition)(progress)
    }
}

fn painting_1(p: &UserProgress) -> bool {
    p.stats.painting.level >= 1
}

fn painting_10(p: &UserProgress) -> bool {
    p.stats.painting.level >= 10
}

fn music_1(p: &UserProgress) -> bool {
    p.stats.music.level >= 1
}

fn coding_10(p: &UserProgress) -> bool {
    p.stats.coding.level >= 10
}

fn all_rounder(p: &UserProgress) -> bool {
    p.stats.iter().all(|(_, s)| s.level >= 5)
}

fn legendary_master(p: &UserProgress) -> bool {
    p.level >= 20
}

/// The badge catalogue.
pub static BADGES: [Badge; 6] = [
    Badge {
        id: "painting_1",
        name: "Doodle Apprentice",
        description: "Reach painting Lv.1",
        icon: BadgeIcon::Skill(Category::Painting),
        rarity: Rarity::Common,
        condition: painting_1,
    },
    Badge {
        id: "painting_10",
        name: "Light & Shadow Artisan",
        description: "Reach painting Lv.10",
        icon: BadgeIcon::Skill(Category::Painting),
        rarity: Rarity::Epic,
        condition: painting_10,
    },
    Badge {
        id: "music_1",
        name: "First Notes",
        description: "Reach music Lv.1",
        icon: BadgeIcon::Skill(Category::Music),
        rarity: Rarity::Common,
        condition: music_1,
    },
    Badge {
        id: "coding_10",
        name: "Logic Grandmaster",
        description: "Reach coding Lv.10",
        icon: BadgeIcon::Skill(Category::Coding),
        rarity: Rarity::Epic,
        condition: coding_10,
    },
    Badge {
        id: "all_rounder",
        name: "All-Round Expert",
        description: "Reach Lv.5 in every skill",
        icon: BadgeIcon::General,
        rarity: Rarity::Rare,
        condition: all_rounder,
    },
    Badge {
        id: "legendary_master",
        name: "Cyber Legend",
        description: "Reach account Lv.20",
        icon: BadgeIcon::General,
        rarity: Rarity::Legendary,
        condition: legendary_master,
    },
];

/// Looks up a badge by ID.
pub fn get_badge(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}

/// Badges unlocked by `progress`, in catalogue order.
pub fn unlocked(progress: &UserProgress) -> Vec<&'static Badge> {
    BADGES.iter().filter(|b| b.is_unlocked(progress)).collect()
}

/// Tally of the badge wall for one progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub collected: usize,
    pub total: usize,
    pub points: u32,
    pub max_points: u32,
}

/// Counts unlocked badges and their rarity points against the catalogue.
pub fn collection(progress: &UserProgress) -> Collection {
    let mut out = Collection { collected: 0, total: BADGES.len(), points: 0, max_points: 0 };
    for b in &BADGES {
        let p = b.rarity.points();
        out.max_points += p;
        if b.is_unlocked(progress) {
            out.collected += 1;
            out.points += p;
        }
    }
    out
}

/// Badges unlocked in `after` that were still locked in `before`.
pub fn newly_unlocked(before: &UserProgress, after: &UserProgress) -> Vec<&'static Badge> {
    BADGES
        .iter()
        .filter(|b| !b.is_unlocked(before) && b.is_unlocked(after))
        .collect()
}

/// Badges of a given rarity.
pub fn badges_by_rarity(rarity: Rarity) -> Vec<&'static Badge> {
    BADGES.iter().filter(|b| b.rarity == rarity).collect()
}
