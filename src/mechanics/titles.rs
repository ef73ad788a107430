//! Display titles for global and per-category levels.

use crate::mechanics::category::Category;

/// Global staircase: (first level, title), ascending.
pub const LEVEL_TITLES: [(u32, &str); 4] = [
    (1, "Junior AI Apprentice"),
    (4, "Intermediate AI Creator"),
    (7, "Senior AI Master"),
    (10, "Legendary AI Lord"),
];

/// Inclusive level band with its title.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TitleBand {
    pub min: u32,
    pub max: u32,
    pub title: &'static str,
}

const PAINTING_TITLES: [TitleBand; 3] = [
    TitleBand { min: 1, max: 5, title: "Doodle Apprentice" },
    TitleBand { min: 6, max: 10, title: "Light & Shadow Artisan" },
    TitleBand { min: 11, max: 999, title: "Cyber Painting Sage" },
];

const DEFAULT_TITLES: [TitleBand; 3] = [
    TitleBand { min: 1, max: 5, title: "Newcomer" },
    TitleBand { min: 6, max: 10, title: "Skilled Hand" },
    TitleBand { min: 11, max: 999, title: "Domain Expert" },
];

/// Title of the highest threshold ≤ `level`.
pub fn title_for_level(level: u32) -> &'static str {
    LEVEL_TITLES
        .iter()
        .rev()
        .find(|(min, _)| level >= *min)
        .map_or(LEVEL_TITLES[0].1, |(_, title)| *title)
}

/// Band table for a category; only painting has its own.
pub fn attribute_bands(category: Category) -> &'static [TitleBand] {
    match category {
        Category::Painting => &PAINTING_TITLES,
        _ => &DEFAULT_TITLES,
    }
}

/// Title for a category level. Levels outside every band get the last tier.
pub fn attribute_title(category: Category, level: u32) -> &'static str {
    let bands = attribute_bands(category);
    bands
        .iter()
        .find(|b| level >= b.min && level <= b.max)
        .or(bands.last())
        .map_or("", |b| b.title)
}
