/*!
`skill_progress` — the progression engine of a gamified creative-skills platform.

What it does
- Turns XP gains into an account level (quadratic curve, 250·L·(L−1) lifetime
  XP to reach level L) and into five per-skill levels (bucket roll-over,
  500·L XP to leave level L).
- Keeps one persisted `UserProgress` document per account, including a
  bounded log of the last 100 XP events.
- Projects which skill grows fastest over the last 7 days and how many days
  it needs to reach its next milestone.
- Runs an energy counter whose depletion thresholds (30/60/90 %) roll a coin
  for a bonus package.
- Derives badges from progress on every read.

How to use (call surface only)
- Pick a storage backend (`systems::sdk::MemoryBackend`, `FileBackend`, or
  your own `Backend`) and a clock.
- `ProgressStore::add_attribute_xp(category, xp)` for a skill,
  `ProgressStore::update_user_progress(xp, category)` for the account.
  They are independent saves; call both when an action counts for both.
- `ResourceStore::consume_points(n)` before a costly action;
  `claim_package()` to collect a pending bonus.
- Or drive the whole page flow through `genres::academy::Academy`.

What it does NOT do
- No network, no accounts, no payments. Evaluation scores arrive from the
  caller; the generator behind them is not part of this crate.
- No cross-process locking. Each store assumes it is the only writer of its
  document while an update runs.
*/

pub mod error;
pub mod mechanics;
pub mod systems;
pub mod genres;

pub use error::{Error, Result};
pub use mechanics::Category;
pub use systems::progress::{CategoryStats, ProgressStore, UserProgress};
