use serde::{Deserialize, Serialize};

use crate::grading::models::{GradingResult, TOTAL_SCORE_MAX};

/// Scores below this percentage raise a low-score alert.
pub const LOW_SCORE_THRESHOLD: f64 = 60.0;
/// Below this the low-score alert is high severity.
pub const CRITICAL_SCORE_THRESHOLD: f64 = 40.0;
/// Drop, in percentage points, between the older and recent averages that
/// counts as declining performance.
pub const DECLINE_MARGIN: f64 = 15.0;
/// How many of the newest scores form the recent average.
pub const RECENT_WINDOW: usize = 3;
/// How many scores the history check looks at in total.
pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowScore,
    DecliningPerformance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAlert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
}

impl PerformanceAlert {
    /// High severity alerts go straight to the NGO coordinators.
    pub fn needs_escalation(&self) -> bool {
        self.severity >= AlertSeverity::High
    }
}

/// Percentage (0-100) a grading result represents.
pub fn score_percentage(result: &GradingResult) -> f64 {
    f64::from(result.total_score) / f64::from(TOTAL_SCORE_MAX) * 100.0
}

/// Alerts raised by a new `score` (percentage). `recent_scores` is the
/// student's graded history, newest first, including the new score.
pub fn check_performance_alerts(score: f64, recent_scores: &[f64]) -> Vec<PerformanceAlert> {
    let mut alerts = Vec::new();

    if score < LOW_SCORE_THRESHOLD {
        alerts.push(PerformanceAlert {
            kind: AlertKind::LowScore,
            severity: if score >= CRITICAL_SCORE_THRESHOLD {
                AlertSeverity::Medium
            } else {
                AlertSeverity::High
            },
            message: format!(
                "Student scored {:.1}% on recent assignment. Consider additional support.",
                score
            ),
        });
    }

    let history = &recent_scores[..recent_scores.len().min(HISTORY_LIMIT)];
    if history.len() >= RECENT_WINDOW {
        let (recent, older) = history.split_at(RECENT_WINDOW);
        let avg_recent = mean(recent);
        let avg_older = if older.is_empty() { avg_recent } else { mean(older) };

        if avg_recent < avg_older - DECLINE_MARGIN {
            alerts.push(PerformanceAlert {
                kind: AlertKind::DecliningPerformance,
                severity: AlertSeverity::Medium,
                message: format!(
                    "Student's performance has declined from {:.1}% to {:.1}% average.",
                    avg_older, avg_recent
                ),
            });
        }
    }

    alerts
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
