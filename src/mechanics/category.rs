//! category: the five fixed skill tracks.
//! Wire names are lowercase (`"painting"`, …) so stored records and legacy
//! `categoryXP` keys line up with `Category::as_str`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Painting,
    Music,
    Speech,
    Video,
    Coding,
}

impl Category {
    /// Canonical order; also the order of the stored `stats` table.
    pub const ALL: [Category; 5] = [
        Category::Painting,
        Category::Music,
        Category::Speech,
        Category::Video,
        Category::Coding,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Painting => "painting",
            Category::Music => "music",
            Category::Speech => "speech",
            Category::Video => "video",
            Category::Coding => "coding",
        }
    }

    /// Name of the skill as shown in growth projections.
    #[inline]
    pub const fn skill_name(self) -> &'static str {
        match self {
            Category::Painting => "Painting Power",
            Category::Music => "Musical Sense",
            Category::Speech => "Speaking Power",
            Category::Video => "Directing Power",
            Category::Coding => "Logic Power",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}
