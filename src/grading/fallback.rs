use super::models::{ChildEncouragement, GradingResult, ParentAnalysis, Scores};

/// Canned, encouraging result returned when the model reply carries no
/// usable JSON. Scores are moderate and sum to `total_score`.
pub fn fallback_result() -> GradingResult {
    GradingResult {
        parent_analysis: ParentAnalysis {
            overall_assessment: "Dr. Owl has looked at your child's homework! The photo shows your child \
                working hard at writing letters, which is a wonderful start. There is still room to grow, \
                and their careful attitude deserves encouragement."
                .to_string(),
            glows: vec![
                "Letter writing shows a serious, focused attitude toward learning".to_string(),
                "Finished the whole worksheet, a sign of good study habits".to_string(),
                "Good pencil control on several of the letters".to_string(),
            ],
            grows: vec![
                "Pay attention to the standard shape and proportion of each letter; tracing worksheets \
                 help build muscle memory"
                    .to_string(),
                "Slow down while practising and focus on the direction and position of every stroke"
                    .to_string(),
            ],
            parent_child_activities: vec![
                "Trace letter shapes together with a finger in a sand tray or on a touch screen".to_string(),
                "Make letter cards and let your child feel the outline of each letter".to_string(),
                "Read alphabet picture books together and point out the letters as you go".to_string(),
            ],
        },
        child_encouragement: ChildEncouragement {
            praise_message: "Wow! You have been practising your letters so hard! 🌟 Dr. Owl can see how \
                carefully you wrote, and thinks you are a superstar! Every letter shows your effort. Keep \
                going and your writing will get better and better! 💪✨"
                .to_string(),
            badges: vec![
                "Practice Champion 🏆".to_string(),
                "Letter Explorer 🔤".to_string(),
            ],
            fun_challenges: vec![
                "Next time, try writing your letters with your favourite coloured pen".to_string(),
                "Have a race with Mum or Dad to see who can write the neatest letters".to_string(),
            ],
        },
        scores: Scores {
            letter_formation: 32,
            line_adherence: 22,
            consistency_spacing: 14,
            overall_effort: 9,
        },
        total_score: 77,
    }
}
