//! Geometry for the skills radar ("spider") chart.
//!
//! Every skill gets one axis radiating from the chart center. Axis 0 points
//! straight up and the rest follow clockwise (screen coordinates, y grows
//! downwards) at `360 / N` degree steps. Progress and goal values are
//! percentages of `max_radius`; they are not clamped, so values outside
//! `0..=100` simply land inside the center or beyond the outer ring.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub mod svg;

/// Ring radii, as fractions of `max_radius`, drawn as the background grid.
pub const GRID_RING_RATIOS: [f64; 3] = [0.3, 0.6, 1.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub progress: i32,
    #[serde(alias = "Goal")]
    pub goal: i32,
}

impl Skill {
    pub fn new(name: impl Into<String>, progress: i32, goal: i32) -> Self {
        Self {
            name: name.into(),
            progress,
            goal,
        }
    }
}

/// The five literacy skills shown on the progress pages.
pub fn default_skills() -> Vec<Skill> {
    vec![
        Skill::new("alphabet", 85, 80),
        Skill::new("sightWords", 60, 75),
        Skill::new("vocabulary", 72, 70),
        Skill::new("phonemicAwareness", 79, 75),
        Skill::new("pointAndRead", 91, 85),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub max_radius: f64,
    /// Extra distance beyond `max_radius` where labels are anchored.
    pub label_radius: f64,
}

impl ChartConfig {
    pub fn center(&self) -> Point2 {
        Point2::new(self.center_x, self.center_y)
    }

    /// Point at `radius` from the center along an axis given in degrees.
    fn polar(&self, radius: f64, angle_degrees: f64) -> Point2 {
        let theta = angle_degrees.to_radians();
        Point2::new(
            self.center_x + radius * theta.cos(),
            self.center_y + radius * theta.sin(),
        )
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartSize::Medium.config()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSize {
    Small,
    Medium,
    Large,
}

impl ChartSize {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "small" | "sm" => Some(ChartSize::Small),
            "medium" | "md" => Some(ChartSize::Medium),
            "large" | "lg" => Some(ChartSize::Large),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartSize::Small => "small",
            ChartSize::Medium => "medium",
            ChartSize::Large => "large",
        }
    }

    pub fn config(&self) -> ChartConfig {
        match self {
            ChartSize::Small => ChartConfig {
                width: 280.0,
                height: 200.0,
                center_x: 140.0,
                center_y: 120.0,
                max_radius: 50.0,
                label_radius: 35.0,
            },
            ChartSize::Medium => ChartConfig {
                width: 360.0,
                height: 280.0,
                center_x: 180.0,
                center_y: 170.0,
                max_radius: 70.0,
                label_radius: 55.0,
            },
            ChartSize::Large => ChartConfig {
                width: 440.0,
                height: 340.0,
                center_x: 220.0,
                center_y: 210.0,
                max_radius: 90.0,
                label_radius: 70.0,
            },
        }
    }

    /// Label font size in pixels.
    pub fn font_px(&self) -> u32 {
        match self {
            ChartSize::Small => 8,
            ChartSize::Medium => 10,
            ChartSize::Large => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    /// Horizontal anchor for a label on an axis at `angle_degrees`, chosen so
    /// the text grows away from its own spoke.
    pub fn for_angle(angle_degrees: f64) -> Self {
        let angle = normalize_degrees(angle_degrees);
        if angle > -45.0 && angle < 45.0 {
            TextAnchor::Start
        } else if angle > 135.0 || angle < -135.0 {
            TextAnchor::End
        } else {
            TextAnchor::Middle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Map any angle into `(-180, 180]`.
fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub current: Point2,
    pub goal: Point2,
    /// Outer end of the axis spoke.
    pub grid: Point2,
    pub label: Point2,
    pub skill: Skill,
    pub angle_degrees: f64,
    pub index: usize,
}

impl RadarPoint {
    pub fn text_anchor(&self) -> TextAnchor {
        TextAnchor::for_angle(self.angle_degrees)
    }
}

/// Angle of axis `index` out of `count`, in degrees. Axis 0 is -90 (up).
pub fn axis_angle_degrees(index: usize, count: usize) -> f64 {
    if count == 0 {
        return -90.0;
    }
    index as f64 * (360.0 / count as f64) - 90.0
}

/// Compute one [`RadarPoint`] per skill, in input order.
pub fn compute_radar_points(skills: &[Skill], config: &ChartConfig) -> Vec<RadarPoint> {
    let count = skills.len();

    skills
        .iter()
        .enumerate()
        .map(|(index, skill)| {
            let angle = axis_angle_degrees(index, count);
            let current_radius = f64::from(skill.progress) / 100.0 * config.max_radius;
            let goal_radius = f64::from(skill.goal) / 100.0 * config.max_radius;

            RadarPoint {
                current: config.polar(current_radius, angle),
                goal: config.polar(goal_radius, angle),
                grid: config.polar(config.max_radius, angle),
                label: config.polar(config.max_radius + config.label_radius, angle),
                skill: skill.clone(),
                angle_degrees: angle,
                index,
            }
        })
        .collect()
}

/// Vertices of a regular ring at `ratio * max_radius`, one per axis.
pub fn grid_ring(count: usize, ratio: f64, config: &ChartConfig) -> Vec<Point2> {
    (0..count)
        .map(|index| config.polar(config.max_radius * ratio, axis_angle_degrees(index, count)))
        .collect()
}

/// Polygon vertices with the first vertex repeated at the end.
pub fn closed_loop(vertices: &[Point2]) -> Vec<Point2> {
    let mut closed = vertices.to_vec();
    if let Some(first) = vertices.first() {
        closed.push(*first);
    }
    closed
}

/// SVG path data (`M x y L x y ... Z`) for a closed polygon.
pub fn path_data(vertices: &[Point2]) -> String {
    let mut data = String::new();
    for (index, point) in vertices.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        if index > 0 {
            data.push(' ');
        }
        let _ = write!(data, "{} {} {}", command, point.x, point.y);
    }
    if !vertices.is_empty() {
        data.push_str(" Z");
    }
    data
}

/// Everything needed to draw one radar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarChart {
    pub config: ChartConfig,
    pub points: Vec<RadarPoint>,
    pub current_outline: Vec<Point2>,
    pub goal_outline: Vec<Point2>,
    pub grid_rings: Vec<Vec<Point2>>,
}

impl RadarChart {
    pub fn build(skills: &[Skill], config: ChartConfig) -> Self {
        let points = compute_radar_points(skills, &config);
        let current: Vec<Point2> = points.iter().map(|p| p.current).collect();
        let goal: Vec<Point2> = points.iter().map(|p| p.goal).collect();
        let grid_rings = GRID_RING_RATIOS
            .iter()
            .map(|ratio| grid_ring(points.len(), *ratio, &config))
            .collect();

        Self {
            config,
            current_outline: closed_loop(&current),
            goal_outline: closed_loop(&goal),
            grid_rings,
            points,
        }
    }

    pub fn current_path(&self) -> String {
        path_data(open_polygon(&self.current_outline))
    }

    pub fn goal_path(&self) -> String {
        path_data(open_polygon(&self.goal_outline))
    }
}

/// Drop the repeated closing vertex; `Z` closes the SVG path instead.
fn open_polygon(closed: &[Point2]) -> &[Point2] {
    match closed.len() {
        0 => closed,
        n => &closed[..n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{} != {}", a, b);
    }

    #[test]
    fn one_point_per_skill_in_order() {
        let skills = default_skills();
        let points = compute_radar_points(&skills, &ChartConfig::default());
        assert_eq!(points.len(), skills.len());
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.index, i);
            assert_eq!(point.skill, skills[i]);
        }
    }

    #[test]
    fn axes_start_up_and_are_evenly_spaced() {
        for count in 3..=9 {
            let skills: Vec<Skill> = (0..count).map(|i| Skill::new(format!("s{i}"), 50, 50)).collect();
            let points = compute_radar_points(&skills, &ChartConfig::default());
            assert_close(points[0].angle_degrees, -90.0);
            let step = 360.0 / count as f64;
            for pair in points.windows(2) {
                assert_close(pair[1].angle_degrees - pair[0].angle_degrees, step);
            }
        }
    }

    #[test]
    fn first_axis_vertex_points_straight_up() {
        let config = ChartSize::Medium.config();
        let points = compute_radar_points(&default_skills(), &config);
        let first = &points[0];
        assert_close(first.current.x, config.center_x);
        assert_close(first.current.y, config.center_y - 0.85 * config.max_radius);
        assert_close(first.goal.y, config.center_y - 0.80 * config.max_radius);
        assert_close(first.grid.y, config.center_y - config.max_radius);
        assert_close(first.label.y, config.center_y - (config.max_radius + config.label_radius));
    }

    #[test]
    fn in_range_vertices_stay_inside_max_radius() {
        let config = ChartSize::Large.config();
        let skills = vec![
            Skill::new("a", 0, 100),
            Skill::new("b", 100, 0),
            Skill::new("c", 37, 64),
            Skill::new("d", 99, 1),
        ];
        for point in compute_radar_points(&skills, &config) {
            let current = point.current.distance_to(config.center());
            let goal = point.goal.distance_to(config.center());
            assert!(current <= config.max_radius + EPS);
            assert!(goal <= config.max_radius + EPS);
            assert_close(point.grid.distance_to(config.center()), config.max_radius);
        }
        let full = compute_radar_points(&[Skill::new("x", 100, 100)], &config);
        assert_close(full[0].current.distance_to(config.center()), config.max_radius);
    }

    #[test]
    fn out_of_range_values_are_not_clamped() {
        let config = ChartConfig::default();
        let points = compute_radar_points(&[Skill::new("over", 150, -20)], &config);
        assert_close(points[0].current.distance_to(config.center()), 1.5 * config.max_radius);
        // Negative goal lands on the opposite side of the center.
        assert!(points[0].goal.y > config.center_y);
    }

    #[test]
    fn zero_radius_collapses_to_center() {
        let config = ChartConfig {
            max_radius: 0.0,
            label_radius: 0.0,
            ..ChartConfig::default()
        };
        for point in compute_radar_points(&default_skills(), &config) {
            assert_close(point.current.distance_to(config.center()), 0.0);
            assert_close(point.label.distance_to(config.center()), 0.0);
        }
    }

    #[test]
    fn text_anchor_follows_axis_direction() {
        assert_eq!(TextAnchor::for_angle(0.0), TextAnchor::Start);
        assert_eq!(TextAnchor::for_angle(-90.0), TextAnchor::Middle);
        assert_eq!(TextAnchor::for_angle(90.0), TextAnchor::Middle);
        assert_eq!(TextAnchor::for_angle(180.0), TextAnchor::End);
        assert_eq!(TextAnchor::for_angle(-170.0), TextAnchor::End);
        assert_eq!(TextAnchor::for_angle(45.0), TextAnchor::Middle);
        // 198 degrees is the fifth pentagon axis, pointing left.
        assert_eq!(TextAnchor::for_angle(198.0), TextAnchor::End);
        // 250 degrees points mostly up once wrapped to -110.
        assert_eq!(TextAnchor::for_angle(250.0), TextAnchor::Middle);
    }

    #[test]
    fn pentagon_label_anchors() {
        let points = compute_radar_points(&default_skills(), &ChartConfig::default());
        let anchors: Vec<TextAnchor> = points.iter().map(RadarPoint::text_anchor).collect();
        assert_eq!(
            anchors,
            vec![
                TextAnchor::Middle,
                TextAnchor::Start,
                TextAnchor::Middle,
                TextAnchor::Middle,
                TextAnchor::End,
            ]
        );
    }

    #[test]
    fn outlines_are_closed_loops() {
        let chart = RadarChart::build(&default_skills(), ChartConfig::default());
        assert_eq!(chart.current_outline.len(), 6);
        assert_eq!(chart.current_outline.first(), chart.current_outline.last());
        assert_eq!(chart.goal_outline.first(), chart.goal_outline.last());
        assert_eq!(chart.grid_rings.len(), GRID_RING_RATIOS.len());
        assert!(chart.grid_rings.iter().all(|ring| ring.len() == 5));
    }

    #[test]
    fn path_data_uses_move_line_close() {
        let path = path_data(&[Point2::new(0.0, 1.0), Point2::new(2.0, 3.5), Point2::new(4.0, 5.0)]);
        assert_eq!(path, "M 0 1 L 2 3.5 L 4 5 Z");
        assert_eq!(path_data(&[]), "");

        let chart = RadarChart::build(&default_skills(), ChartConfig::default());
        let current = chart.current_path();
        assert!(current.starts_with('M'));
        assert_eq!(current.matches('L').count(), 4);
        assert!(current.ends_with(" Z"));
    }

    #[test]
    fn skill_accepts_legacy_goal_key() {
        let skill: Skill = serde_json::from_str(r#"{"name":"alphabet","progress":85,"Goal":80}"#).unwrap();
        assert_eq!(skill, Skill::new("alphabet", 85, 80));
    }
}
