use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Strength,
    Endurance,
}

impl ExerciseKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Endurance => "endurance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub kind: ExerciseKind,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    pub exercise_ids: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub routine_id: Option<String>,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    pub created_at: String,
}

/// Flat join row: which exercise appears in which workout, and where.
/// `order_index` is unique within a workout and drives display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: String,
    pub workout_id: String,
    pub exercise_id: String,
    pub order_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub id: String,
    pub workout_exercise_id: String,
    pub set_index: u32,
    pub reps: u32,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningLog {
    pub id: String,
    pub workout_exercise_id: String,
    pub distance_km: f64,
    pub time_minutes: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avg_heart_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyWeightLog {
    pub id: String,
    pub date: NaiveDate,
    pub weight_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Brunch,
    Lunch,
    Snack,
    Dinner,
}

impl MealSlot {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Brunch => "brunch",
            Self::Lunch => "lunch",
            Self::Snack => "snack",
            Self::Dinner => "dinner",
        }
    }
}

pub const MEAL_SLOTS: &[&str] = &["breakfast", "brunch", "lunch", "snack", "dinner"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLog {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    pub meal_slot: MealSlot,
    pub created_at: String,
}

// --- Write-pipeline input types ---

/// Partial workout passed to `save_workout`. A present `id` means update,
/// absence means create. Missing `date` defaults to today, missing
/// `created_at` to now.
#[derive(Debug, Clone, Default)]
pub struct WorkoutDraft {
    pub id: Option<String>,
    pub routine_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

/// One exercise entry in a workout being saved, in display order.
/// Strength exercises carry `sets`; endurance exercises carry `running`.
#[derive(Debug, Clone)]
pub struct WorkoutEntry {
    pub exercise_id: String,
    pub sets: Vec<NewSet>,
    pub running: Option<NewRunningLog>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewSet {
    pub reps: u32,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct NewRunningLog {
    pub distance_km: f64,
    pub time_minutes: f64,
    pub avg_heart_rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewFoodLog {
    pub date: NaiveDate,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    pub meal_slot: MealSlot,
}

// --- Read-model view types ---

/// A workout with its child rows joined in. Reconstructed from the flat
/// tables on every read; never stored in this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<String>,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub workout_exercises: Vec<WorkoutExerciseView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutExerciseView {
    pub id: String,
    pub workout_id: String,
    pub exercise_id: String,
    pub order_index: u32,
    /// Resolved best-effort; `None` when the exercise was deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Exercise>,
    pub sets: Vec<Set>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_log: Option<RunningLog>,
}

/// Most recent prior performance of an exercise, used to pre-fill a new
/// entry. Empty (no sets, no running log) when there is no history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LastPerformance {
    pub sets: Vec<Set>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_log: Option<RunningLog>,
}

impl LastPerformance {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.running_log.is_none()
    }
}

// --- Validation / parsing helpers ---

pub fn parse_exercise_kind(kind: &str) -> Result<ExerciseKind> {
    match kind.to_lowercase().as_str() {
        "strength" => Ok(ExerciseKind::Strength),
        "endurance" => Ok(ExerciseKind::Endurance),
        _ => bail!("Invalid exercise kind '{kind}'. Must be 'strength' or 'endurance'"),
    }
}

pub fn parse_meal_slot(slot: &str) -> Result<MealSlot> {
    match slot.to_lowercase().as_str() {
        "breakfast" => Ok(MealSlot::Breakfast),
        "brunch" => Ok(MealSlot::Brunch),
        "lunch" => Ok(MealSlot::Lunch),
        "snack" => Ok(MealSlot::Snack),
        "dinner" => Ok(MealSlot::Dinner),
        _ => bail!(
            "Invalid meal slot '{slot}'. Must be one of: {}",
            MEAL_SLOTS.join(", ")
        ),
    }
}

pub fn validate_exercise_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Exercise name must not be empty");
    }
    Ok(())
}

pub fn validate_routine(name: &str, exercise_ids: &[String]) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Routine name must not be empty");
    }
    if exercise_ids.is_empty() {
        bail!("A routine must contain at least one exercise");
    }
    Ok(())
}

/// Coerce user-supplied numeric text. Non-numeric or negative input becomes
/// 0 rather than an error, matching the tolerant write-pipeline policy.
#[must_use]
pub fn num_or_zero(s: &str) -> f64 {
    let v: f64 = s.trim().parse().unwrap_or(0.0);
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Same coercion for rep counts.
#[must_use]
pub fn reps_or_zero(s: &str) -> u32 {
    s.trim().parse().unwrap_or(0)
}

/// Estimated one-rep max via the Epley formula. Display-only.
#[must_use]
pub fn estimate_1rm(weight_kg: f64, reps: u32) -> f64 {
    if reps <= 1 {
        return weight_kg;
    }
    weight_kg * (1.0 + f64::from(reps) / 30.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exercise_kind() {
        assert_eq!(
            parse_exercise_kind("strength").unwrap(),
            ExerciseKind::Strength
        );
        assert_eq!(
            parse_exercise_kind("Endurance").unwrap(),
            ExerciseKind::Endurance
        );
        assert!(parse_exercise_kind("cardio").is_err());
        assert!(parse_exercise_kind("").is_err());
    }

    #[test]
    fn test_parse_meal_slot() {
        assert_eq!(parse_meal_slot("breakfast").unwrap(), MealSlot::Breakfast);
        assert_eq!(parse_meal_slot("brunch").unwrap(), MealSlot::Brunch);
        assert_eq!(parse_meal_slot("Dinner").unwrap(), MealSlot::Dinner);
        assert!(parse_meal_slot("supper").is_err());
    }

    #[test]
    fn test_validate_exercise_name() {
        assert!(validate_exercise_name("Bench Press").is_ok());
        assert!(validate_exercise_name("").is_err());
        assert!(validate_exercise_name("   ").is_err());
    }

    #[test]
    fn test_validate_routine() {
        assert!(validate_routine("Push Day", &["1".to_string()]).is_ok());
        assert!(validate_routine("", &["1".to_string()]).is_err());
        assert!(validate_routine("Push Day", &[]).is_err());
    }

    #[test]
    fn test_num_or_zero() {
        assert!((num_or_zero("100.5") - 100.5).abs() < f64::EPSILON);
        assert!((num_or_zero(" 80 ") - 80.0).abs() < f64::EPSILON);
        assert_eq!(num_or_zero("abc"), 0.0);
        assert_eq!(num_or_zero(""), 0.0);
        assert_eq!(num_or_zero("-5"), 0.0);
        assert_eq!(num_or_zero("NaN"), 0.0);
    }

    #[test]
    fn test_reps_or_zero() {
        assert_eq!(reps_or_zero("12"), 12);
        assert_eq!(reps_or_zero("twelve"), 0);
        assert_eq!(reps_or_zero("-3"), 0);
    }

    #[test]
    fn test_estimate_1rm_single_rep_is_weight() {
        assert!((estimate_1rm(100.0, 1) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_estimate_1rm_epley() {
        // 100 * (1 + 5/30) = 116.67
        assert!((estimate_1rm(100.0, 5) - 116.666_666).abs() < 0.001);
        // 80 * (1 + 10/30) = 106.67
        assert!((estimate_1rm(80.0, 10) - 106.666_666).abs() < 0.001);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ExerciseKind::Strength).unwrap();
        assert_eq!(json, "\"strength\"");
        let back: ExerciseKind = serde_json::from_str("\"endurance\"").unwrap();
        assert_eq!(back, ExerciseKind::Endurance);
    }

    #[test]
    fn test_meal_slot_serializes_lowercase() {
        let json = serde_json::to_string(&MealSlot::Brunch).unwrap();
        assert_eq!(json, "\"brunch\"");
    }

    #[test]
    fn test_last_performance_empty() {
        let lp = LastPerformance::default();
        assert!(lp.is_empty());
    }
}
