//! Global level curve (quadratic in level).
//! Reaching level L takes 250·L·(L−1) lifetime XP; the inverse is the closed
//! form L = ⌊(1 + √(1 + 4·X/250)) / 2⌋, never below 1.

/// Highest level whose threshold fits in a `u64` total.
pub const MAX_LEVEL: u32 = 271_637_583;

/// Lifetime XP needed to have completed levels 1..L-1.
/// Saturates above [`MAX_LEVEL`].
#[inline]
pub fn total_xp_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let l = u64::from(level);
    250u64.saturating_mul(l).saturating_mul(l - 1)
}

/// Level reached with `total_xp` lifetime XP, at most [`MAX_LEVEL`].
///
/// The float closed form gives the estimate; the two integer walks pin it to
/// the exact staircase so level boundaries round-trip with
/// [`total_xp_for_level`].
pub fn level_from_total_xp(total_xp: u64) -> u32 {
    let est = ((1.0 + (1.0 + 4.0 * (total_xp as f64 / 250.0)).sqrt()) / 2.0).floor();
    let mut level = if est.is_finite() && est >= 1.0 {
        est.min(MAX_LEVEL as f64) as u32
    } else {
        1
    };
    while level < MAX_LEVEL && total_xp_for_level(level + 1) <= total_xp {
        level += 1;
    }
    while level > 1 && total_xp_for_level(level) > total_xp {
        level -= 1;
    }
    level
}

/// XP earned since reaching the level implied by `total_xp`.
#[inline]
pub fn xp_into_level(total_xp: u64) -> u64 {
    total_xp - total_xp_for_level(level_from_total_xp(total_xp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_points() {
        assert_eq!(total_xp_for_level(0), 0);
        assert_eq!(total_xp_for_level(1), 0);
        assert_eq!(total_xp_for_level(2), 500);
        assert_eq!(total_xp_for_level(3), 1500);
        assert_eq!(total_xp_for_level(10), 22_500);
    }

    #[test]
    fn round_trips_at_every_boundary() {
        for l in 1..=2_000u32 {
            let x = total_xp_for_level(l);
            assert_eq!(level_from_total_xp(x), l, "boundary of level {l}");
            if x > 0 {
                assert_eq!(level_from_total_xp(x - 1), l - 1, "just below level {l}");
            }
        }
    }

    #[test]
    fn worked_example_760() {
        assert_eq!(level_from_total_xp(760), 2);
        assert_eq!(xp_into_level(760), 260);
    }

    #[test]
    fn never_below_one() {
        assert_eq!(level_from_total_xp(0), 1);
        assert_eq!(level_from_total_xp(499), 1);
    }

    #[test]
    fn max_level_is_the_last_unsaturated_threshold() {
        let l = u64::from(MAX_LEVEL);
        assert!(250u64.checked_mul(l).and_then(|x| x.checked_mul(l - 1)).is_some());
        assert!(250u64.checked_mul(l + 1).and_then(|x| x.checked_mul(l)).is_none());
    }

    #[test]
    fn saturated_total_stops_at_max_level() {
        assert_eq!(level_from_total_xp(u64::MAX), MAX_LEVEL);
        assert_eq!(xp_into_level(u64::MAX), 17_098_475_115);
        assert_eq!(level_from_total_xp(total_xp_for_level(MAX_LEVEL)), MAX_LEVEL);
        assert_eq!(level_from_total_xp(total_xp_for_level(MAX_LEVEL) - 1), MAX_LEVEL - 1);
    }

    #[test]
    fn large_totals_stay_consistent() {
        let x = total_xp_for_level(1_000_000) + 7;
        assert_eq!(level_from_total_xp(x), 1_000_000);
        assert_eq!(xp_into_level(x), 7);
    }
}
