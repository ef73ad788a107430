//! Per-level curve (linear in level) used by the bucket roll-over.
//! Advancing from level L costs 500·L XP, spent from the within-level bucket.

/// XP required to advance from `level` to `level + 1`.
#[inline]
pub fn xp_to_next_level(level: u32) -> u64 {
    u64::from(level.max(1)) * 500
}

/// Result of pouring XP into a level bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollOver {
    pub level: u32,
    pub xp: u64,
    pub next_level_xp: u64,
    pub levels_gained: u32,
}

/// Adds `amount` to the bucket and rolls over as many times as it fills.
///
/// Afterwards `xp < next_level_xp` holds. A zero `next_level_xp` (only seen
/// in damaged records) is replaced by the curve value for `level`.
pub fn roll_over(level: u32, xp: u64, next_level_xp: u64, amount: u64) -> RollOver {
    let mut level = level.max(1);
    let mut xp = xp.saturating_add(amount);
    let mut next = if next_level_xp == 0 {
        xp_to_next_level(level)
    } else {
        next_level_xp
    };
    let mut levels_gained = 0;

    while xp >= next {
        xp -= next;
        level += 1;
        levels_gained += 1;
        next = xp_to_next_level(level);
    }

    RollOver { level, xp, next_level_xp: next, levels_gained }
}
