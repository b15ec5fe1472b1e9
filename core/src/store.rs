use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::models::{
    BodyWeightLog, Exercise, ExerciseKind, FoodLog, Routine, RunningLog, Set, Workout,
    WorkoutExercise,
};

/// The entire database: one record of flat tables, persisted as a single
/// JSON blob. Relationships are id references; nesting is reconstructed at
/// read time, never stored.
///
/// `exercises`, `workouts` and `routines` must be present when
/// deserializing a snapshot; the remaining tables default to empty so that
/// older snapshots without them still load (and self-heal on the next save).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbState {
    pub exercises: Vec<Exercise>,
    pub workouts: Vec<Workout>,
    #[serde(default)]
    pub workout_exercises: Vec<WorkoutExercise>,
    #[serde(default)]
    pub sets: Vec<Set>,
    #[serde(default)]
    pub running_logs: Vec<RunningLog>,
    #[serde(default)]
    pub body_weight_logs: Vec<BodyWeightLog>,
    pub routines: Vec<Routine>,
    #[serde(default)]
    pub food_logs: Vec<FoodLog>,
}

/// Starting contents for a fresh install (and for `reset`): a few exercises
/// and one routine so the app is usable immediately.
#[must_use]
pub fn seed_state() -> DbState {
    let now = Local::now().to_rfc3339();
    DbState {
        exercises: vec![
            Exercise {
                id: "1".to_string(),
                name: "Bench Press".to_string(),
                kind: ExerciseKind::Strength,
                created_at: now.clone(),
            },
            Exercise {
                id: "2".to_string(),
                name: "Squat".to_string(),
                kind: ExerciseKind::Strength,
                created_at: now.clone(),
            },
            Exercise {
                id: "3".to_string(),
                name: "Outdoor Run".to_string(),
                kind: ExerciseKind::Endurance,
                created_at: now.clone(),
            },
        ],
        workouts: Vec::new(),
        workout_exercises: Vec::new(),
        sets: Vec::new(),
        running_logs: Vec::new(),
        body_weight_logs: Vec::new(),
        routines: vec![Routine {
            id: "r1".to_string(),
            name: "Strength A".to_string(),
            exercise_ids: vec!["1".to_string(), "2".to_string()],
            created_at: now,
        }],
        food_logs: Vec::new(),
    }
}

enum Backend {
    File(PathBuf),
    Memory(RefCell<Option<String>>),
}

/// Owns the single serialized snapshot. `load` and `save` are the only
/// primitives; every save fully overwrites the previous blob.
pub struct Store {
    backend: Backend,
}

impl Store {
    #[must_use]
    pub fn open(path: &Path) -> Self {
        Store {
            backend: Backend::File(path.to_path_buf()),
        }
    }

    /// Volatile store for tests; the analogue of an in-memory database.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Store {
            backend: Backend::Memory(RefCell::new(None)),
        }
    }

    /// Read the current snapshot, or the seed state when none exists yet.
    pub fn load(&self) -> Result<DbState> {
        let blob = match &self.backend {
            Backend::File(path) => {
                if !path.exists() {
                    return Ok(seed_state());
                }
                Some(std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read database file: {}", path.display())
                })?)
            }
            Backend::Memory(cell) => cell.borrow().clone(),
        };
        match blob {
            Some(text) => serde_json::from_str(&text).context("Database snapshot is corrupt"),
            None => Ok(seed_state()),
        }
    }

    /// Overwrite the snapshot with the given state.
    pub fn save(&self, state: &DbState) -> Result<()> {
        let text = serde_json::to_string(state)?;
        match &self.backend {
            Backend::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create data directory: {}", parent.display())
                    })?;
                }
                std::fs::write(path, text)
                    .with_context(|| format!("Failed to write database file: {}", path.display()))
            }
            Backend::Memory(cell) => {
                *cell.borrow_mut() = Some(text);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_returns_seed_when_empty() {
        let store = Store::open_in_memory();
        let state = store.load().unwrap();
        assert_eq!(state.exercises.len(), 3);
        assert_eq!(state.exercises[0].name, "Bench Press");
        assert_eq!(state.exercises[2].kind, ExerciseKind::Endurance);
        assert_eq!(state.routines.len(), 1);
        assert_eq!(state.routines[0].exercise_ids, vec!["1", "2"]);
        assert!(state.workouts.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = Store::open_in_memory();
        let mut state = store.load().unwrap();
        state.exercises.push(Exercise {
            id: "x1".to_string(),
            name: "Deadlift".to_string(),
            kind: ExerciseKind::Strength,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        });
        store.save(&state).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, state);
    }

    #[test]
    fn test_file_backend_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progreso.json");

        let store = Store::open(&path);
        let mut state = store.load().unwrap();
        state.workouts.push(Workout {
            id: "w1".to_string(),
            routine_id: None,
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            notes: None,
            created_at: "2024-01-01T10:00:00Z".to_string(),
        });
        store.save(&state).unwrap();

        // A second handle against the same path sees the saved state.
        let store2 = Store::open(&path);
        let reloaded = store2.load().unwrap();
        assert_eq!(reloaded.workouts.len(), 1);
        assert_eq!(reloaded.workouts[0].id, "w1");
    }

    #[test]
    fn test_missing_optional_tables_default_to_empty() {
        let snapshot = r#"{"exercises":[],"workouts":[],"routines":[]}"#;
        let state: DbState = serde_json::from_str(snapshot).unwrap();
        assert!(state.workout_exercises.is_empty());
        assert!(state.sets.is_empty());
        assert!(state.running_logs.is_empty());
        assert!(state.body_weight_logs.is_empty());
        assert!(state.food_logs.is_empty());
    }

    #[test]
    fn test_missing_required_table_is_rejected() {
        // No routines field: not a valid snapshot.
        let snapshot = r#"{"exercises":[],"workouts":[]}"#;
        assert!(serde_json::from_str::<DbState>(snapshot).is_err());
    }
}
