use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

pub const LETTER_FORMATION_MAX: u32 = 50;
pub const LINE_ADHERENCE_MAX: u32 = 30;
pub const CONSISTENCY_SPACING_MAX: u32 = 20;
pub const OVERALL_EFFORT_MAX: u32 = 10;
pub const TOTAL_SCORE_MAX: u32 =
    LETTER_FORMATION_MAX + LINE_ADHERENCE_MAX + CONSISTENCY_SPACING_MAX + OVERALL_EFFORT_MAX;

/// Body of `POST /api/grade-homework`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GradeHomeworkRequest {
    /// Base64 image, optionally prefixed with a `data:image/...;base64,` URI header.
    /// Absent and `null` both count as missing.
    #[serde(default)]
    #[validate(
        required(message = "No image provided"),
        length(min = 1, message = "No image provided")
    )]
    pub image: Option<String>,
    /// Advisory only; used for logging.
    #[serde(default)]
    pub filename: Option<String>,
}

impl GradeHomeworkRequest {
    pub fn new(image: impl Into<String>, filename: Option<String>) -> Self {
        Self {
            image: Some(image.into()),
            filename,
        }
    }

    /// The uploaded image text, if any non-blank text was sent.
    pub fn image_data(&self) -> Option<&str> {
        self.image.as_deref().filter(|image| !image.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParentAnalysis {
    pub overall_assessment: String,
    /// Strengths observed in the handwriting.
    #[serde(default)]
    pub glows: Vec<String>,
    /// Areas to improve.
    #[serde(default)]
    pub grows: Vec<String>,
    #[serde(default)]
    pub parent_child_activities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChildEncouragement {
    pub praise_message: String,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub fun_challenges: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Scores {
    /// 0-50
    #[serde(deserialize_with = "deserialize_score")]
    #[schemars(with = "u32")]
    pub letter_formation: u32,
    /// 0-30
    #[serde(deserialize_with = "deserialize_score")]
    #[schemars(with = "u32")]
    pub line_adherence: u32,
    /// 0-20
    #[serde(deserialize_with = "deserialize_score")]
    #[schemars(with = "u32")]
    pub consistency_spacing: u32,
    /// 0-10
    #[serde(deserialize_with = "deserialize_score")]
    #[schemars(with = "u32")]
    pub overall_effort: u32,
}

/// Models sometimes write scores as `32.0`; any non-negative number is
/// accepted and rounded.
fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) {
        Ok(value.round() as u32)
    } else {
        Err(D::Error::custom(format!("score out of range: {}", value)))
    }
}

impl Scores {
    pub fn component_sum(&self) -> u32 {
        self.letter_formation + self.line_adherence + self.consistency_spacing + self.overall_effort
    }

    /// Each rubric dimension with its maximum and band, in rubric order.
    pub fn breakdown(&self) -> Vec<ScoreLine> {
        vec![
            ScoreLine::new("letter_formation", self.letter_formation, LETTER_FORMATION_MAX),
            ScoreLine::new("line_adherence", self.line_adherence, LINE_ADHERENCE_MAX),
            ScoreLine::new("consistency_spacing", self.consistency_spacing, CONSISTENCY_SPACING_MAX),
            ScoreLine::new("overall_effort", self.overall_effort, OVERALL_EFFORT_MAX),
        ]
    }
}

/// Structured grading document, in the wire shape the grader page consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GradingResult {
    pub parent_analysis: ParentAnalysis,
    pub child_encouragement: ChildEncouragement,
    pub scores: Scores,
    /// 0-110, the sum of the four scores.
    #[serde(deserialize_with = "deserialize_score")]
    #[schemars(with = "u32")]
    pub total_score: u32,
}

impl GradingResult {
    /// Whether `total_score` equals the sum of the component scores. Not
    /// enforced; callers only log a mismatch.
    pub fn is_score_consistent(&self) -> bool {
        self.scores.component_sum() == self.total_score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsPractice,
}

impl ScoreBand {
    /// >= 80% is excellent, >= 60% good, anything lower needs practice.
    pub fn classify(score: u32, max: u32) -> Self {
        if max == 0 {
            return ScoreBand::NeedsPractice;
        }
        let scaled = u64::from(score) * 100;
        let max = u64::from(max);
        if scaled >= max * 80 {
            ScoreBand::Excellent
        } else if scaled >= max * 60 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsPractice
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsPractice => "Needs practice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreLine {
    pub dimension: &'static str,
    pub score: u32,
    pub max: u32,
    pub band: ScoreBand,
}

impl ScoreLine {
    fn new(dimension: &'static str, score: u32, max: u32) -> Self {
        Self {
            dimension,
            score,
            max,
            band: ScoreBand::classify(score, max),
        }
    }
}

/// A grading result together with whether it came from the model or from
/// the canned fallback.
///
/// An authoritative outcome keeps the model's document exactly as parsed;
/// `result` is the typed view used for validation and summaries.
#[derive(Debug, Clone, PartialEq)]
pub enum GradingOutcome {
    Authoritative { result: GradingResult, document: Value },
    Degraded { result: GradingResult, reason: String },
}

impl GradingOutcome {
    pub fn result(&self) -> &GradingResult {
        match self {
            GradingOutcome::Authoritative { result, .. } => result,
            GradingOutcome::Degraded { result, .. } => result,
        }
    }

    pub fn into_result(self) -> GradingResult {
        match self {
            GradingOutcome::Authoritative { result, .. } => result,
            GradingOutcome::Degraded { result, .. } => result,
        }
    }

    /// The JSON document sent to the client.
    pub fn document(&self) -> Value {
        match self {
            GradingOutcome::Authoritative { document, .. } => document.clone(),
            GradingOutcome::Degraded { result, .. } => serde_json::to_value(result).unwrap_or_default(),
        }
    }

    pub fn into_document(self) -> Value {
        match self {
            GradingOutcome::Authoritative { document, .. } => document,
            degraded => degraded.document(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, GradingOutcome::Degraded { .. })
    }

    /// Value of the `X-Grading-Mode` response header.
    pub fn mode(&self) -> &'static str {
        if self.is_degraded() {
            "degraded"
        } else {
            "authoritative"
        }
    }
}
