/// Energy mechanics: depletion and threshold crossings.

/// Share of capacity already spent: (total - current) / total, in 0..=1.
#[inline]
pub fn depletion(current: u64, total: u64) -> f64 {
    if total > 0 {
        (total.saturating_sub(current) as f64 / total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// True when a spend from `before` to `after` points moves depletion across
/// `pct` percent, i.e. `ratio(before) < pct/100 <= ratio(after)`.
///
/// Compared as integers, so landing exactly on the threshold counts once.
#[inline]
pub fn crosses(total: u64, before: u64, after: u64, pct: u32) -> bool {
    let used_before = u128::from(total.saturating_sub(before)) * 100;
    let used_after = u128::from(total.saturating_sub(after)) * 100;
    let line = u128::from(pct) * u128::from(total);
    used_before < line && used_after >= line
}
