// demos/academy.rs
// Run with:
//   cargo run --example academy [-- <state-dir>]
//   RUST_LOG=skill_progress=debug cargo run --example academy

use skill_progress::Category;
use skill_progress::genres::academy::{Academy, AcademyConfig};
use skill_progress::mechanics::SeededCoin;
use skill_progress::systems::sdk::{FileBackend, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skill_progress=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let dir = std::env::args()
        .nth(1)
        .map(Into::into)
        .unwrap_or_else(|| std::env::temp_dir().join("skill_progress_demo"));
    tracing::info!(dir = %dir.display(), "state directory");

    let mut academy = Academy::open(
        FileBackend::new(dir),
        SystemClock,
        SeededCoin::from_clock(),
        AcademyConfig::default(),
    )?;

    // A week of practice: one generation + one evaluation per task.
    let tasks = [
        (Category::Painting, r#"{"score": 85}"#),
        (Category::Music, "```json\n{\"score\": 72}\n```"),
        (Category::Painting, r#"{"score": 93}"#),
        (Category::Coding, "no json here"),
        (Category::Painting, r#"{"score": 100}"#),
    ];

    for (category, reply) in tasks {
        let energy = academy.start_generation()?;
        if !energy.success {
            println!("out of energy; skipping {category}");
            continue;
        }
        if energy.triggered {
            println!("bonus package unlocked!");
        }

        let out = academy.record_evaluation_reply(category, reply, false)?;
        println!(
            "{category:<8} score {:>3} → +{:>3} XP  (skill Lv.{} {}/{})",
            out.score, out.xp_gained, out.attribute.new_level, out.attribute.current_xp, out.attribute.next_level_xp,
        );
        if let Some(msg) = &out.global.level_up_message {
            println!("  {msg}");
        }
        for id in &out.new_badges {
            println!("  badge unlocked: {id}");
        }
    }

    if academy.resources_mut().claim_package()? {
        println!("claimed a bonus package");
    }

    let profile = academy.profile()?;
    println!("\n== Profile ==");
    println!("Lv.{} {}  ({}/{} XP)", profile.level, profile.title, profile.current_xp, profile.level_span_xp);
    for s in &profile.skills {
        println!("  {:<8} Lv.{:<3} {:<24} {}/{}", s.category.as_str(), s.level, s.title, s.xp, s.next_level_xp);
    }
    println!("  {}", profile.prediction);
    println!(
        "  badges {}/{}  ({}/{} pts)",
        profile.badges_unlocked, profile.badges_total, profile.badge_points, profile.badge_max_points
    );
    println!("  energy {}/{}", academy.resources().state().current_points, academy.resources().state().total_points);
    Ok(())
}
