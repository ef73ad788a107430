// src/genres/academy.rs
#![cfg(feature = "genre-academy")]

//! Academy orchestrator: what a creative-tool page does around one task.
//!
//! - generation → spend energy ([`resources`](crate::systems::resources))
//! - evaluation → score → XP, then the category update
//!   ([`add_attribute_xp`](ProgressStore::add_attribute_xp)) followed by
//!   the account update ([`update_user_progress`](ProgressStore::update_user_progress))
//! - profile    → titles, growth projection and badge count
//!
//! Both stores share one backend. The two XP updates are separate saves in
//! a fixed order; the second reloads the document the first wrote.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::mechanics::category::Category;
use crate::mechanics::quadratic;
use crate::mechanics::reward::xp_for_score;
use crate::mechanics::stoch::Coin;
use crate::systems::attribute_xp::AttributeUpdate;
use crate::systems::badges;
use crate::systems::global_xp::ProgressUpdate;
use crate::systems::growth_prediction::Prediction;
use crate::systems::progress::ProgressStore;
use crate::systems::resources::{Consumption, ResourceConfig, ResourceStore};
use crate::systems::sdk::{Backend, Clock};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademyConfig {
    /// Energy spent per generation request.
    pub generation_cost: u64,
    /// Score assumed when an evaluation cannot be parsed.
    pub fallback_score: u32,
    pub resources: ResourceConfig,
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self { generation_cost: 10, fallback_score: 80, resources: ResourceConfig::default() }
    }
}

impl AcademyConfig {
    /// Parses a JSON object; absent fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Extracts the integer `score` (0..=100) from an evaluator reply.
///
/// Markdown code fences are stripped first. Anything unreadable yields
/// `fallback`.
pub fn parse_evaluation_score(reply: &str, fallback: u32) -> u32 {
    let body = reply.replace("```json", "").replace("```", "");
    let score = serde_json::from_str::<serde_json::Value>(body.trim())
        .ok()
        .and_then(|v| v.get("score").and_then(serde_json::Value::as_f64));
    match score {
        Some(s) if s.is_finite() => s.round().clamp(0.0, 100.0) as u32,
        _ => {
            warn!(fallback, "evaluation reply has no readable score");
            fallback
        }
    }
}

/// Everything an evaluation changed.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    pub score: u32,
    pub xp_gained: u64,
    pub attribute: AttributeUpdate,
    pub global: ProgressUpdate,
    /// IDs of badges that unlocked with this evaluation.
    pub new_badges: Vec<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub category: Category,
    pub level: u32,
    pub xp: u64,
    pub next_level_xp: u64,
    pub title: &'static str,
}

/// Profile page data.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub level: u32,
    pub title: String,
    pub current_xp: u64,
    /// XP span of the current account level.
    pub level_span_xp: u64,
    pub skills: Vec<SkillSummary>,
    pub prediction: Prediction,
    pub badges_unlocked: usize,
    pub badges_total: usize,
    pub badge_points: u32,
    pub badge_max_points: u32,
}

pub struct Academy<B: Backend, C: Clock, R: Coin> {
    config: AcademyConfig,
    progress: ProgressStore<Rc<B>, C>,
    resources: ResourceStore<Rc<B>, R>,
}

impl<B: Backend, C: Clock, R: Coin> Academy<B, C, R> {
    pub fn open(backend: B, clock: C, coin: R, config: AcademyConfig) -> Result<Self> {
        let backend = Rc::new(backend);
        let resources = ResourceStore::open(Rc::clone(&backend), coin, config.resources)?;
        let progress = ProgressStore::with_clock(backend, clock);
        Ok(Self { config, progress, resources })
    }

    pub fn config(&self) -> &AcademyConfig {
        &self.config
    }

    pub fn progress(&self) -> &ProgressStore<Rc<B>, C> {
        &self.progress
    }

    pub fn resources(&self) -> &ResourceStore<Rc<B>, R> {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceStore<Rc<B>, R> {
        &mut self.resources
    }

    /// Pays for one generation. `success: false` means the page must not
    /// call the generator.
    pub fn start_generation(&mut self) -> Result<Consumption> {
        self.resources.consume_points(self.config.generation_cost)
    }

    /// Applies a numeric evaluation score to `category` and the account.
    pub fn record_evaluation(
        &self,
        category: Category,
        score: u32,
        is_member: bool,
    ) -> Result<EvaluationOutcome> {
        let before = self.progress.load()?;
        let xp_gained = xp_for_score(score, is_member);

        let attribute = self.progress.add_attribute_xp(category, xp_gained)?;
        let global = self.progress.update_user_progress(xp_gained, None)?;

        let new_badges: Vec<&'static str> =
            badges::newly_unlocked(&before, &global.progress).iter().map(|b| b.id).collect();
        debug!(%category, score, xp_gained, ?new_badges, "evaluation recorded");

        Ok(EvaluationOutcome { score, xp_gained, attribute, global, new_badges })
    }

    /// Like [`record_evaluation`](Self::record_evaluation), reading the score
    /// out of the evaluator's raw reply.
    pub fn record_evaluation_reply(
        &self,
        category: Category,
        reply: &str,
        is_member: bool,
    ) -> Result<EvaluationOutcome> {
        let score = parse_evaluation_score(reply, self.config.fallback_score);
        self.record_evaluation(category, score, is_member)
    }

    pub fn profile(&self) -> Result<ProfileSummary> {
        let p = self.progress.load()?;
        let skills = p
            .stats
            .iter()
            .map(|(category, s)| SkillSummary {
                category,
                level: s.level,
                xp: s.xp,
                next_level_xp: s.next_level_xp,
                title: p.attribute_title(category),
            })
            .collect();
        let wall = badges::collection(&p);
        let prediction = crate::systems::growth_prediction::growth_prediction(
            &p.xp_history,
            &p.stats,
            self.progress.clock().now(),
        );
        Ok(ProfileSummary {
            level: p.level,
            title: p.title.clone(),
            current_xp: p.current_xp,
            level_span_xp: quadratic::total_xp_for_level(p.level.saturating_add(1))
                .saturating_sub(quadratic::total_xp_for_level(p.level)),
            skills,
            prediction,
            badges_unlocked: wall.collected,
            badges_total: wall.total,
            badge_points: wall.points,
            badge_max_points: wall.max_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_from_plain_json() {
        assert_eq!(parse_evaluation_score(r#"{"score": 85, "comment": "ok"}"#, 80), 85);
    }

    #[test]
    fn score_from_fenced_json() {
        let reply = "```json\n{\"score\": 91.6, \"radar\": []}\n```";
        assert_eq!(parse_evaluation_score(reply, 80), 92);
    }

    #[test]
    fn unreadable_reply_falls_back() {
        assert_eq!(parse_evaluation_score("Great work, 9/10!", 80), 80);
        assert_eq!(parse_evaluation_score(r#"{"comment":"no score"}"#, 80), 80);
        assert_eq!(parse_evaluation_score(r#"{"score":"high"}"#, 75), 75);
    }

    #[test]
    fn out_of_range_scores_clamp() {
        assert_eq!(parse_evaluation_score(r#"{"score": 140}"#, 80), 100);
        assert_eq!(parse_evaluation_score(r#"{"score": -3}"#, 80), 0);
    }

    #[test]
    fn config_overrides() {
        let cfg = AcademyConfig::from_json(r#"{"generation_cost": 25, "resources": {"total_points": 300}}"#).unwrap();
        assert_eq!(cfg.generation_cost, 25);
        assert_eq!(cfg.fallback_score, 80);
        assert_eq!(cfg.resources.total_points, 300);
        assert_eq!(cfg.resources.bonus_chance, 0.5);
    }
}
