//! Standalone SVG rendering of a [`RadarChart`].

use std::fmt::Write;

use super::{ChartSize, Point2, RadarChart, Skill};

const CURRENT_STROKE: &str = "#22c55e";
const CURRENT_FILL: &str = "rgba(34, 197, 94, 0.10)";
const GOAL_STROKE: &str = "#d1d5db";
const GRID_STROKE: &str = "#f8fafc";
const LABEL_FILL: &str = "#374151";
const LEGEND_FILL: &str = "#4b5563";
const FONT_FAMILY: &str = "-apple-system, BlinkMacSystemFont, system-ui, sans-serif";

#[derive(Debug, Clone)]
pub struct SvgLegend {
    pub current: String,
    pub goal: String,
}

impl Default for SvgLegend {
    fn default() -> Self {
        Self {
            current: "Current level".to_string(),
            goal: "Goal level".to_string(),
        }
    }
}

/// Render `skills` as a complete `<svg>` document at one of the preset sizes.
pub fn render_svg(skills: &[Skill], size: ChartSize, legend: &SvgLegend) -> String {
    let config = size.config();
    let chart = RadarChart::build(skills, config);
    let font_px = size.font_px();
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = config.width,
        h = config.height
    );

    for (i, ring) in chart.grid_rings.iter().enumerate() {
        let _ = writeln!(
            out,
            r#"  <polygon points="{}" fill="none" stroke="{}" stroke-width="1" opacity="{:.1}"/>"#,
            polygon_points(ring),
            GRID_STROKE,
            0.6 - i as f64 * 0.2
        );
    }

    for point in &chart.points {
        let _ = writeln!(
            out,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1" opacity="0.4"/>"#,
            config.center_x, config.center_y, point.grid.x, point.grid.y, GRID_STROKE
        );
    }

    if !chart.points.is_empty() {
        let _ = writeln!(
            out,
            r#"  <path d="{}" fill="none" stroke="{}" stroke-width="1.5" stroke-dasharray="3,3" opacity="0.6"/>"#,
            chart.goal_path(),
            GOAL_STROKE
        );
        let _ = writeln!(
            out,
            r#"  <path d="{}" fill="{}" stroke="{}" stroke-width="2.5"/>"#,
            chart.current_path(),
            CURRENT_FILL,
            CURRENT_STROKE
        );
    }

    for point in &chart.points {
        let _ = writeln!(
            out,
            r##"  <circle cx="{}" cy="{}" r="3.5" fill="{}" stroke="#ffffff" stroke-width="2"/>"##,
            point.current.x, point.current.y, CURRENT_STROKE
        );
    }

    for point in &chart.points {
        let anchor = point.text_anchor().as_str();
        let _ = writeln!(
            out,
            r#"  <text x="{}" y="{}" text-anchor="{}" fill="{}" font-size="{}px" font-weight="600" font-family="{}">{}</text>"#,
            point.label.x,
            point.label.y - 8.0,
            anchor,
            LABEL_FILL,
            font_px,
            FONT_FAMILY,
            escape_xml(&point.skill.name)
        );
        let _ = writeln!(
            out,
            r#"  <text x="{}" y="{}" text-anchor="{}" fill="{}" font-size="{}px" font-weight="700" font-family="{}">{}%</text>"#,
            point.label.x,
            point.label.y + 5.0,
            anchor,
            CURRENT_STROKE,
            font_px,
            FONT_FAMILY,
            point.skill.progress
        );
    }

    let legend_y = config.height - 20.0;
    let _ = writeln!(
        out,
        r#"  <line x1="20" y1="{y}" x2="35" y2="{y}" stroke="{}" stroke-width="2.5"/>"#,
        CURRENT_STROKE,
        y = legend_y
    );
    let _ = writeln!(
        out,
        r#"  <text x="40" y="{}" fill="{}" font-size="{}px" font-weight="500" font-family="{}">{}</text>"#,
        legend_y + 4.0,
        LEGEND_FILL,
        font_px,
        FONT_FAMILY,
        escape_xml(&legend.current)
    );
    let _ = writeln!(
        out,
        r#"  <line x1="140" y1="{y}" x2="155" y2="{y}" stroke="{}" stroke-width="1.5" stroke-dasharray="3,3"/>"#,
        GOAL_STROKE,
        y = legend_y
    );
    let _ = writeln!(
        out,
        r#"  <text x="160" y="{}" fill="{}" font-size="{}px" font-weight="500" font-family="{}">{}</text>"#,
        legend_y + 4.0,
        LEGEND_FILL,
        font_px,
        FONT_FAMILY,
        escape_xml(&legend.goal)
    );

    out.push_str("</svg>\n");
    out
}

fn polygon_points(ring: &[Point2]) -> String {
    ring.iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
