//! Energy points: a draining counter with bonus-package rolls.
//!
//! Every costly action spends points. When one spend carries depletion
//! across a configured threshold (30 / 60 / 90 % by default) a coin is
//! flipped for that threshold; heads leaves a bonus package pending until
//! [`ResourceStore::claim_package`] collects it.
//!
//! The store holds the live state and writes the whole snapshot back after
//! each mutation. It assumes one caller at a time; nothing guards two
//! stores over the same key against each other.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::mechanics::energy;
use crate::mechanics::stoch::{Coin, SeededCoin};
use crate::systems::sdk::{Backend, Observer, read_or_default, write_document};

pub const RESOURCE_KEY: &str = "resource_store";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Capacity of a fresh store.
    pub total_points: u64,
    /// Depletion thresholds in percent, ascending.
    pub thresholds_pct: [u32; 3],
    /// Chance that crossing a threshold leaves a package.
    pub bonus_chance: f64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self { total_points: 1000, thresholds_pct: [30, 60, 90], bonus_chance: 0.5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceState {
    pub total_points: u64,
    pub current_points: u64,
    pub has_pending_package: bool,
}

impl ResourceState {
    pub fn full(total_points: u64) -> Self {
        Self { total_points, current_points: total_points, has_pending_package: false }
    }

    /// Spent share of capacity, 0..=1.
    pub fn depletion(&self) -> f64 {
        energy::depletion(self.current_points, self.total_points)
    }
}

/// Stored snapshot; absent fields take the fresh-store values.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoredResource {
    total_points: Option<u64>,
    current_points: Option<u64>,
    has_pending_package: Option<bool>,
}

impl StoredResource {
    fn merge_over(self, fresh: ResourceState) -> ResourceState {
        let total_points = self.total_points.filter(|t| *t > 0).unwrap_or(fresh.total_points);
        let stored_current = self.current_points.unwrap_or(total_points);
        if stored_current > total_points {
            warn!(stored_current, total_points, "stored points exceed capacity; clamping");
        }
        ResourceState {
            total_points,
            current_points: stored_current.min(total_points),
            has_pending_package: self.has_pending_package.unwrap_or(fresh.has_pending_package),
        }
    }
}

/// Outcome of [`ResourceStore::consume_points`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Consumption {
    /// False when the balance was too low; nothing changed then.
    pub success: bool,
    /// A package became pending during this spend.
    pub triggered: bool,
    /// Thresholds crossed by this spend (each rolled once).
    pub crossed: u32,
}

pub type ObserverId = usize;

pub struct ResourceStore<B: Backend, R: Coin = SeededCoin> {
    backend: B,
    coin: R,
    config: ResourceConfig,
    state: ResourceState,
    observers: Vec<(ObserverId, Box<dyn Observer<ResourceState>>)>,
    next_observer: ObserverId,
}

impl<B: Backend, R: Coin> fmt::Debug for ResourceStore<B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStore")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl<B: Backend> ResourceStore<B, SeededCoin> {
    /// Opens with default config and a clock-seeded coin.
    pub fn open_default(backend: B) -> Result<Self> {
        Self::open(backend, SeededCoin::from_clock(), ResourceConfig::default())
    }
}

impl<B: Backend, R: Coin> ResourceStore<B, R> {
    /// Loads the stored snapshot (or a full store per `config`).
    pub fn open(backend: B, coin: R, config: ResourceConfig) -> Result<Self> {
        let fresh = ResourceState::full(config.total_points.max(1));
        let stored: StoredResource = read_or_default(&backend, RESOURCE_KEY)?;
        let state = stored.merge_over(fresh);
        debug!(?state, "resource store opened");
        Ok(Self { backend, coin, config, state, observers: Vec::new(), next_observer: 0 })
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn coin(&self) -> &R {
        &self.coin
    }

    /// Spends `amount` points. A short balance returns `success: false`
    /// and leaves state and storage untouched. So does a failed save.
    pub fn consume_points(&mut self, amount: u64) -> Result<Consumption> {
        let before = self.state.current_points;
        if before < amount {
            warn!(amount, current = before, "not enough points");
            return Ok(Consumption::default());
        }
        let after = before - amount;
        let total = self.state.total_points;

        let mut next = self.state;
        let mut out = Consumption { success: true, ..Consumption::default() };
        for pct in self.config.thresholds_pct {
            if !energy::crosses(total, before, after, pct) {
                continue;
            }
            out.crossed += 1;
            if self.coin.flip(self.config.bonus_chance) {
                next.has_pending_package = true;
                out.triggered = true;
                info!(threshold = pct, "depletion threshold reached; package pending");
            } else {
                info!(threshold = pct, "depletion threshold reached; package missed");
            }
        }

        next.current_points = after;
        self.commit(next)?;
        Ok(out)
    }

    /// Clears a pending package. Returns false (and writes nothing) if none.
    pub fn claim_package(&mut self) -> Result<bool> {
        if !self.state.has_pending_package {
            return Ok(false);
        }
        self.commit(ResourceState { has_pending_package: false, ..self.state })?;
        Ok(true)
    }

    /// Resets the balance, and optionally the capacity.
    pub fn set_points(&mut self, current: u64, total: Option<u64>) -> Result<()> {
        let total = total.unwrap_or(self.state.total_points);
        if total == 0 {
            return Err(Error::InvalidInput("total points must be positive".into()));
        }
        if current > total {
            return Err(Error::InvalidInput(format!("{current} points exceed capacity {total}")));
        }
        self.commit(ResourceState { current_points: current, total_points: total, ..self.state })
    }

    /// Registers an observer called after every saved change.
    pub fn subscribe(&mut self, observer: impl Observer<ResourceState> + 'static) -> ObserverId {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(i, _)| *i != id);
        self.observers.len() != before
    }

    /// Saves `next`; the live state only moves once the write succeeded.
    fn commit(&mut self, next: ResourceState) -> Result<()> {
        write_document(&self.backend, RESOURCE_KEY, &next)?;
        self.state = next;
        for (_, o) in self.observers.iter_mut() {
            o.on_change(&self.state);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::stoch::FixedCoin;
    use crate::systems::sdk::MemoryBackend;

    #[test]
    fn config_from_partial_json() {
        let cfg: ResourceConfig = serde_json::from_str(r#"{"bonus_chance":1.0}"#).unwrap();
        assert_eq!(cfg.total_points, 1000);
        assert_eq!(cfg.thresholds_pct, [30, 60, 90]);
        assert_eq!(cfg.bonus_chance, 1.0);
    }

    #[test]
    fn partial_snapshot_merges_over_defaults() {
        let backend = MemoryBackend::new();
        backend.put_raw(RESOURCE_KEY, r#"{"currentPoints":420}"#);
        let store = ResourceStore::open(backend, FixedCoin::tails(), ResourceConfig::default()).unwrap();
        assert_eq!(
            store.state(),
            ResourceState { total_points: 1000, current_points: 420, has_pending_package: false }
        );
    }

    #[test]
    fn overfull_snapshot_is_clamped() {
        let backend = MemoryBackend::new();
        backend.put_raw(RESOURCE_KEY, r#"{"totalPoints":100,"currentPoints":500}"#);
        let store = ResourceStore::open(backend, FixedCoin::tails(), ResourceConfig::default()).unwrap();
        assert_eq!(store.state().current_points, 100);
    }

    struct ReadOnly;

    impl Backend for ReadOnly {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn save(&self, key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage(format!("{key} is read-only")))
        }
    }

    #[test]
    fn failed_save_leaves_state_untouched() {
        let mut store = ResourceStore::open(ReadOnly, FixedCoin::heads(), ResourceConfig::default()).unwrap();
        let seen = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&seen);
        store.subscribe(move |_: &ResourceState| counter.set(counter.get() + 1));

        assert!(matches!(store.consume_points(300), Err(Error::Storage(_))));
        assert_eq!(store.state(), ResourceState::full(1000));

        assert!(store.set_points(10, Some(20)).is_err());
        assert_eq!(store.state(), ResourceState::full(1000));
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn failed_claim_keeps_the_package() {
        let mut store = ResourceStore::open(ReadOnly, FixedCoin::tails(), ResourceConfig::default()).unwrap();
        store.state.has_pending_package = true;
        assert!(store.claim_package().is_err());
        assert!(store.state().has_pending_package);
    }

    #[test]
    fn set_points_validates() {
        let mut store =
            ResourceStore::open(MemoryBackend::new(), FixedCoin::tails(), ResourceConfig::default()).unwrap();
        assert!(store.set_points(2000, None).is_err());
        assert!(store.set_points(0, Some(0)).is_err());
        store.set_points(50, Some(200)).unwrap();
        assert_eq!(store.state().total_points, 200);
        assert_eq!(store.state().current_points, 50);
    }
}
