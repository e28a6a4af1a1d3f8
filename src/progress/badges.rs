use serde::{Deserialize, Serialize};

/// Quality score given to volunteers who have no completion ratings yet.
pub const DEFAULT_QUALITY_SCORE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeType {
    Helper,
    Mentor,
    Expert,
    Champion,
    Legend,
}

impl BadgeType {
    pub const ALL: [BadgeType; 5] = [
        BadgeType::Helper,
        BadgeType::Mentor,
        BadgeType::Expert,
        BadgeType::Champion,
        BadgeType::Legend,
    ];

    /// Volunteer hours needed for the bronze level of this badge.
    pub fn hours_requirement(&self) -> f64 {
        match self {
            BadgeType::Helper => 10.0,
            BadgeType::Mentor => 25.0,
            BadgeType::Expert => 50.0,
            BadgeType::Champion => 100.0,
            BadgeType::Legend => 200.0,
        }
    }

    /// Minimum average completion rating (out of 5).
    pub fn quality_requirement(&self) -> f64 {
        match self {
            BadgeType::Helper => 3.0,
            BadgeType::Mentor => 3.5,
            BadgeType::Expert => 4.0,
            BadgeType::Champion => 4.5,
            BadgeType::Legend => 4.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl BadgeLevel {
    const ORDER: [BadgeLevel; 5] = [
        BadgeLevel::Bronze,
        BadgeLevel::Silver,
        BadgeLevel::Gold,
        BadgeLevel::Platinum,
        BadgeLevel::Diamond,
    ];

    /// Level for `total_hours` on a badge whose bronze level needs
    /// `requirement` hours: one step per full multiple, capped at diamond.
    fn for_hours(total_hours: f64, requirement: f64) -> Self {
        let multiple = (total_hours / requirement).floor() as usize;
        Self::ORDER[multiple.saturating_sub(1).min(Self::ORDER.len() - 1)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerBadge {
    pub badge_type: BadgeType,
    pub badge_level: BadgeLevel,
    pub hours_requirement: f64,
    pub quality_score: f64,
}

/// Average of completion ratings, or [`DEFAULT_QUALITY_SCORE`] with none.
pub fn quality_score(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return DEFAULT_QUALITY_SCORE;
    }
    ratings.iter().sum::<f64>() / ratings.len() as f64
}

/// Every badge a volunteer currently qualifies for, lowest tier first.
pub fn earned_badges(total_hours: f64, quality: f64) -> Vec<VolunteerBadge> {
    BadgeType::ALL
        .iter()
        .filter(|badge| total_hours >= badge.hours_requirement() && quality >= badge.quality_requirement())
        .map(|badge| VolunteerBadge {
            badge_type: *badge,
            badge_level: BadgeLevel::for_hours(total_hours, badge.hours_requirement()),
            hours_requirement: badge.hours_requirement(),
            quality_score: quality,
        })
        .collect()
}
