//! reward: evaluation score (0..=100) → XP amount.
//! xp = round(50 + 1.5 * score), then * 1.2 for members before rounding.

pub const BASE_XP: f64 = 50.0;
pub const SCORE_WEIGHT: f64 = 1.5;
pub const MEMBER_MULT: f64 = 1.2;

#[inline]
pub fn xp_for_score(score: u32, is_member: bool) -> u64 {
    let score = f64::from(score.min(100));
    let mut gained = BASE_XP + score * SCORE_WEIGHT;
    if is_member {
        gained *= MEMBER_MULT;
    }
    gained.round() as u64
}
