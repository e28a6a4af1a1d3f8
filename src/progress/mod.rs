//! Progress rules shared by the parent and child views: pet levels and
//! experience rewards, performance alerts raised from grading scores, and
//! volunteer badges.
//!
//! Everything here is pure; callers own storage.

pub mod alerts;
pub mod badges;
pub mod pet;

pub use alerts::{check_performance_alerts, AlertKind, AlertSeverity, PerformanceAlert};
pub use badges::{earned_badges, quality_score, BadgeLevel, BadgeType, VolunteerBadge};
pub use pet::{exp_reward, pet_level, Activity, PetStats};
