use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dr_owl_lib::grading::{GradeHomeworkRequest, GradingGateway, GradingOutcome};
use dr_owl_lib::progress::alerts::score_percentage;
use dr_owl_lib::progress::check_performance_alerts;
use dr_owl_lib::settings::Settings;
use log::info;

/// Usage: grade_image <photo.jpg>
///
/// Grades one homework photo with the configured provider and prints the
/// result JSON followed by a per-dimension summary.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: grade_image <image-file>"))?;

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path))?;
    info!("🧪 Grading {} ({} bytes)", path, bytes.len());

    let settings = Settings::load()?;
    let gateway = GradingGateway::from_settings(&settings);

    let request = GradeHomeworkRequest::new(STANDARD.encode(&bytes), Some(path.clone()));

    let outcome = gateway.grade(&request).await?;
    if let GradingOutcome::Degraded { reason, .. } = &outcome {
        println!("⚠️  Model reply was unusable ({}); showing the fallback result.\n", reason);
    }

    println!("{}", serde_json::to_string_pretty(&outcome.document())?);
    let result = outcome.result();

    println!("\n=== SCORE SUMMARY ===");
    for line in result.scores.breakdown() {
        println!("{:<22} {:>3}/{:<3} {}", line.dimension, line.score, line.max, line.band.label());
    }
    println!("{:<22} {:>3}/110", "total_score", result.total_score);

    let percentage = score_percentage(result);
    for alert in check_performance_alerts(percentage, &[percentage]) {
        println!("🔔 {:?} ({:?}): {}", alert.kind, alert.severity, alert.message);
    }

    Ok(())
}
