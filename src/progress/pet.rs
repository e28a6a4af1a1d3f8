use serde::{Deserialize, Serialize};

/// Experience needed to reach levels 2 through 10.
pub const LEVEL_THRESHOLDS: [u32; 9] = [100, 250, 500, 1000, 1750, 2750, 4000, 5500, 7500];

/// Experience per level once past the last threshold.
pub const EXP_PER_LEVEL_AFTER_CURVE: u32 = 1000;

/// Health and happiness restored on level up.
pub const LEVEL_UP_BONUS: u8 = 20;

/// Level for a total amount of experience. Level 1 starts at zero.
pub fn pet_level(experience: u32) -> u32 {
    let last = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    if experience >= last {
        return 10 + (experience - last) / EXP_PER_LEVEL_AFTER_CURVE;
    }
    1 + LEVEL_THRESHOLDS.iter().filter(|&&threshold| experience >= threshold).count() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    AssignmentCompletion,
    PerfectScore,
    StreakBonus,
    HelpingOthers,
    DailyLogin,
    FirstSubmission,
    Improvement,
    Participation,
}

impl Activity {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "assignment_completion" => Some(Activity::AssignmentCompletion),
            "perfect_score" => Some(Activity::PerfectScore),
            "streak_bonus" => Some(Activity::StreakBonus),
            "helping_others" => Some(Activity::HelpingOthers),
            "daily_login" => Some(Activity::DailyLogin),
            "first_submission" => Some(Activity::FirstSubmission),
            "improvement" => Some(Activity::Improvement),
            "participation" => Some(Activity::Participation),
            _ => None,
        }
    }

    pub fn base_exp(&self) -> u32 {
        match self {
            Activity::AssignmentCompletion => 50,
            Activity::PerfectScore => 75,
            Activity::StreakBonus => 25,
            Activity::HelpingOthers => 30,
            Activity::DailyLogin => 10,
            Activity::FirstSubmission => 100,
            Activity::Improvement => 40,
            Activity::Participation => 20,
        }
    }
}

/// Base experience for activities without a table entry.
pub const DEFAULT_ACTIVITY_EXP: u32 = 10;

/// Experience awarded for `activity`, scaled by `multiplier` and truncated.
/// Unknown activity names earn [`DEFAULT_ACTIVITY_EXP`].
pub fn exp_reward(activity: &str, multiplier: f64) -> u32 {
    let base = Activity::from_str(activity).map_or(DEFAULT_ACTIVITY_EXP, |a| a.base_exp());
    // `as` saturates: negative or NaN products give 0.
    (f64::from(base) * multiplier) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetStats {
    pub level: u32,
    pub experience: u32,
    pub health: u8,
    pub happiness: u8,
}

impl Default for PetStats {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            health: 100,
            happiness: 100,
        }
    }
}

impl PetStats {
    /// Add experience and recompute the level. Returns whether the pet
    /// levelled up, in which case health and happiness get a capped bonus.
    pub fn gain_experience(&mut self, exp: u32) -> bool {
        self.experience = self.experience.saturating_add(exp);
        let new_level = pet_level(self.experience);
        let levelled_up = new_level > self.level;
        if levelled_up {
            self.health = self.health.saturating_add(LEVEL_UP_BONUS).min(100);
            self.happiness = self.happiness.saturating_add(LEVEL_UP_BONUS).min(100);
        }
        self.level = new_level;
        levelled_up
    }
}
