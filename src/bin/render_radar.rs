use anyhow::{Context, Result};
use dr_owl_lib::radar::svg::{render_svg, SvgLegend};
use dr_owl_lib::radar::{default_skills, ChartSize, Skill};
use log::info;

/// Usage: render_radar [small|medium|large] [skills.json]
///
/// Prints an SVG radar chart to stdout. `skills.json` holds an array of
/// `{"name", "progress", "goal"}` objects; without it the default literacy
/// skills are drawn.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let size = match args.first() {
        Some(name) => ChartSize::from_str(name).ok_or_else(|| anyhow::anyhow!("Unknown chart size: {}", name))?,
        None => ChartSize::Medium,
    };

    let skills: Vec<Skill> = match args.get(1) {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("Invalid skills file {}", path))?
        }
        None => default_skills(),
    };

    info!("Rendering {} skills at {} size", skills.len(), size.as_str());
    print!("{}", render_svg(&skills, size, &SvgLegend::default()));
    Ok(())
}
