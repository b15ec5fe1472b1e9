use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::models::{
    BodyWeightLog, Exercise, ExerciseKind, FoodLog, LastPerformance, NewFoodLog, Routine,
    RunningLog, Set, Workout, WorkoutDraft, WorkoutEntry, WorkoutExercise, WorkoutExerciseView,
    WorkoutView, validate_exercise_name, validate_routine,
};
use crate::store::{DbState, Store, seed_state};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The data layer. Holds the store handle; every operation is a full
/// load-modify-save cycle, so no table state survives between calls.
pub struct Database {
    store: Store,
}

impl Database {
    #[must_use]
    pub fn open(path: &Path) -> Self {
        Database {
            store: Store::open(path),
        }
    }

    #[must_use]
    pub fn open_in_memory() -> Self {
        Database {
            store: Store::open_in_memory(),
        }
    }

    // --- Exercises ---

    pub fn list_exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.store.load()?.exercises)
    }

    pub fn add_exercise(&self, name: &str, kind: ExerciseKind) -> Result<Exercise> {
        validate_exercise_name(name)?;
        let mut state = self.store.load()?;
        let exercise = Exercise {
            id: new_id(),
            name: name.trim().to_string(),
            kind,
            created_at: Local::now().to_rfc3339(),
        };
        state.exercises.push(exercise.clone());
        self.store.save(&state)?;
        Ok(exercise)
    }

    /// Removes only the exercise row. Historical workout entries and routine
    /// references keep pointing at the id; readers render them as deleted.
    pub fn delete_exercise(&self, id: &str) -> Result<bool> {
        let mut state = self.store.load()?;
        let before = state.exercises.len();
        state.exercises.retain(|e| e.id != id);
        let removed = state.exercises.len() < before;
        if removed {
            self.store.save(&state)?;
        }
        Ok(removed)
    }

    // --- Routines ---

    pub fn list_routines(&self) -> Result<Vec<Routine>> {
        Ok(self.store.load()?.routines)
    }

    pub fn add_routine(&self, name: &str, exercise_ids: &[String]) -> Result<Routine> {
        validate_routine(name, exercise_ids)?;
        let mut state = self.store.load()?;
        let routine = Routine {
            id: new_id(),
            name: name.trim().to_string(),
            exercise_ids: exercise_ids.to_vec(),
            created_at: Local::now().to_rfc3339(),
        };
        state.routines.push(routine.clone());
        self.store.save(&state)?;
        Ok(routine)
    }

    /// Removes only the routine row; workouts keep their `routine_id`.
    pub fn delete_routine(&self, id: &str) -> Result<bool> {
        let mut state = self.store.load()?;
        let before = state.routines.len();
        state.routines.retain(|r| r.id != id);
        let removed = state.routines.len() < before;
        if removed {
            self.store.save(&state)?;
        }
        Ok(removed)
    }

    // --- Read model ---

    /// All workouts with their children joined in, newest first. Ties on
    /// date keep insertion order. Pure projection over the flat tables.
    pub fn list_workouts(&self) -> Result<Vec<WorkoutView>> {
        let state = self.store.load()?;
        Ok(build_workout_views(&state))
    }

    /// The most recent prior performance of an exercise, as a template for
    /// a new entry. Among workouts sharing the maximum date the last match
    /// wins. Empty when the exercise has no history.
    pub fn last_performance(&self, exercise_id: &str) -> Result<LastPerformance> {
        let state = self.store.load()?;

        let workout_dates: HashMap<&str, NaiveDate> = state
            .workouts
            .iter()
            .map(|w| (w.id.as_str(), w.date))
            .collect();

        let mut best: Option<(&WorkoutExercise, NaiveDate)> = None;
        for we in &state.workout_exercises {
            if we.exercise_id != exercise_id {
                continue;
            }
            let Some(&date) = workout_dates.get(we.workout_id.as_str()) else {
                continue;
            };
            match best {
                Some((_, best_date)) if date < best_date => {}
                _ => best = Some((we, date)),
            }
        }

        let Some((last, _)) = best else {
            return Ok(LastPerformance::default());
        };

        let mut sets: Vec<Set> = state
            .sets
            .iter()
            .filter(|s| s.workout_exercise_id == last.id)
            .cloned()
            .collect();
        sets.sort_by_key(|s| s.set_index);
        let running_log = state
            .running_logs
            .iter()
            .find(|rl| rl.workout_exercise_id == last.id)
            .cloned();

        Ok(LastPerformance { sets, running_log })
    }

    // --- Write pipeline ---

    /// Upsert a workout and fully replace its child rows.
    ///
    /// The workout row is replaced in place when the id already exists,
    /// appended otherwise. All workout-exercise rows owned by the id (and
    /// their sets and running logs) are deleted and recreated with fresh
    /// ids from the entry list, so the persisted state exactly mirrors the
    /// input: removed exercises leave no orphans. An empty entry list is a
    /// valid (empty) session.
    pub fn save_workout(&self, draft: &WorkoutDraft, entries: &[WorkoutEntry]) -> Result<Workout> {
        let mut state = self.store.load()?;

        let workout_id = draft.id.clone().unwrap_or_else(new_id);
        let workout = Workout {
            id: workout_id.clone(),
            routine_id: draft.routine_id.clone(),
            date: draft.date.unwrap_or_else(|| Local::now().date_naive()),
            notes: draft.notes.clone(),
            created_at: draft
                .created_at
                .clone()
                .unwrap_or_else(|| Local::now().to_rfc3339()),
        };

        match state.workouts.iter_mut().find(|w| w.id == workout_id) {
            Some(existing) => *existing = workout.clone(),
            None => state.workouts.push(workout.clone()),
        }

        // Unconditionally drop the old children before rebuilding.
        let old_we_ids: HashSet<String> = state
            .workout_exercises
            .iter()
            .filter(|we| we.workout_id == workout_id)
            .map(|we| we.id.clone())
            .collect();
        state
            .workout_exercises
            .retain(|we| we.workout_id != workout_id);
        state
            .sets
            .retain(|s| !old_we_ids.contains(&s.workout_exercise_id));
        state
            .running_logs
            .retain(|rl| !old_we_ids.contains(&rl.workout_exercise_id));

        let kinds: HashMap<String, ExerciseKind> = state
            .exercises
            .iter()
            .map(|e| (e.id.clone(), e.kind))
            .collect();

        for (order_index, entry) in entries.iter().enumerate() {
            let we_id = new_id();
            state.workout_exercises.push(WorkoutExercise {
                id: we_id.clone(),
                workout_id: workout_id.clone(),
                exercise_id: entry.exercise_id.clone(),
                order_index: order_index as u32,
            });

            // A dangling exercise id has no kind; follow whichever payload
            // the caller supplied.
            let kind = kinds.get(&entry.exercise_id).copied();
            if kind != Some(ExerciseKind::Endurance) {
                for (set_index, set) in entry.sets.iter().enumerate() {
                    state.sets.push(Set {
                        id: new_id(),
                        workout_exercise_id: we_id.clone(),
                        set_index: set_index as u32,
                        reps: set.reps,
                        weight_kg: set.weight_kg,
                    });
                }
            }
            if kind != Some(ExerciseKind::Strength) {
                if let Some(run) = entry.running {
                    state.running_logs.push(RunningLog {
                        id: new_id(),
                        workout_exercise_id: we_id,
                        distance_km: run.distance_km,
                        time_minutes: run.time_minutes,
                        avg_heart_rate: run.avg_heart_rate,
                    });
                }
            }
        }

        self.store.save(&state)?;
        Ok(workout)
    }

    /// Removes the workout and, transitively, every workout-exercise, set
    /// and running log it owns.
    pub fn delete_workout(&self, id: &str) -> Result<bool> {
        let mut state = self.store.load()?;
        let before = state.workouts.len();
        state.workouts.retain(|w| w.id != id);
        if state.workouts.len() == before {
            return Ok(false);
        }

        let we_ids: HashSet<String> = state
            .workout_exercises
            .iter()
            .filter(|we| we.workout_id == id)
            .map(|we| we.id.clone())
            .collect();
        state.workout_exercises.retain(|we| we.workout_id != id);
        state
            .sets
            .retain(|s| !we_ids.contains(&s.workout_exercise_id));
        state
            .running_logs
            .retain(|rl| !we_ids.contains(&rl.workout_exercise_id));

        self.store.save(&state)?;
        Ok(true)
    }

    // --- Body weight logs ---

    /// Newest first; ties keep insertion order.
    pub fn list_body_weight_logs(&self) -> Result<Vec<BodyWeightLog>> {
        let mut logs = self.store.load()?.body_weight_logs;
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(logs)
    }

    pub fn add_body_weight_log(
        &self,
        date: NaiveDate,
        weight_kg: f64,
        notes: Option<String>,
    ) -> Result<BodyWeightLog> {
        let mut state = self.store.load()?;
        let log = BodyWeightLog {
            id: new_id(),
            date,
            weight_kg: weight_kg.max(0.0),
            notes,
            created_at: Local::now().to_rfc3339(),
        };
        state.body_weight_logs.push(log.clone());
        self.store.save(&state)?;
        Ok(log)
    }

    pub fn delete_body_weight_log(&self, id: &str) -> Result<bool> {
        let mut state = self.store.load()?;
        let before = state.body_weight_logs.len();
        state.body_weight_logs.retain(|l| l.id != id);
        let removed = state.body_weight_logs.len() < before;
        if removed {
            self.store.save(&state)?;
        }
        Ok(removed)
    }

    // --- Food logs ---

    pub fn list_food_logs(&self) -> Result<Vec<FoodLog>> {
        Ok(self.store.load()?.food_logs)
    }

    pub fn food_logs_for_date(&self, date: NaiveDate) -> Result<Vec<FoodLog>> {
        let state = self.store.load()?;
        Ok(state
            .food_logs
            .into_iter()
            .filter(|l| l.date == date)
            .collect())
    }

    pub fn add_food_log(&self, new: &NewFoodLog) -> Result<FoodLog> {
        let mut state = self.store.load()?;
        let log = FoodLog {
            id: new_id(),
            date: new.date,
            name: new.name.clone(),
            calories: new.calories.max(0.0),
            protein_g: new.protein_g.max(0.0),
            carbs_g: new.carbs_g.max(0.0),
            fats_g: new.fats_g.max(0.0),
            meal_slot: new.meal_slot,
            created_at: Local::now().to_rfc3339(),
        };
        state.food_logs.push(log.clone());
        self.store.save(&state)?;
        Ok(log)
    }

    pub fn delete_food_log(&self, id: &str) -> Result<bool> {
        let mut state = self.store.load()?;
        let before = state.food_logs.len();
        state.food_logs.retain(|l| l.id != id);
        let removed = state.food_logs.len() < before;
        if removed {
            self.store.save(&state)?;
        }
        Ok(removed)
    }

    // --- Snapshot transfer ---

    /// Serialize the whole database to JSON for backup.
    pub fn export_data(&self) -> Result<String> {
        let state = self.store.load()?;
        Ok(serde_json::to_string(&state)?)
    }

    /// Parse and validate a snapshot, then replace the whole store with it.
    /// Returns false (store untouched) when the text does not parse or
    /// lacks the exercises/workouts/routines tables.
    pub fn import_data(&self, json: &str) -> Result<bool> {
        let Ok(state) = serde_json::from_str::<DbState>(json) else {
            return Ok(false);
        };
        self.store.save(&state)?;
        Ok(true)
    }

    /// Replace the store with the original seed state, discarding all data.
    pub fn reset_data(&self) -> Result<()> {
        self.store.save(&seed_state())
    }
}

/// Join the flat tables into nested view objects: one index-building pass
/// per child table, then a walk over the workouts.
fn build_workout_views(state: &DbState) -> Vec<WorkoutView> {
    let exercises_by_id: HashMap<&str, &Exercise> = state
        .exercises
        .iter()
        .map(|e| (e.id.as_str(), e))
        .collect();

    let mut wes_by_workout: HashMap<&str, Vec<&WorkoutExercise>> = HashMap::new();
    for we in &state.workout_exercises {
        wes_by_workout
            .entry(we.workout_id.as_str())
            .or_default()
            .push(we);
    }
    let mut sets_by_we: HashMap<&str, Vec<&Set>> = HashMap::new();
    for set in &state.sets {
        sets_by_we
            .entry(set.workout_exercise_id.as_str())
            .or_default()
            .push(set);
    }
    let mut run_by_we: HashMap<&str, &RunningLog> = HashMap::new();
    for rl in &state.running_logs {
        run_by_we
            .entry(rl.workout_exercise_id.as_str())
            .or_insert(rl);
    }

    let mut views: Vec<WorkoutView> = state
        .workouts
        .iter()
        .map(|w| {
            let mut wes: Vec<&WorkoutExercise> = wes_by_workout
                .get(w.id.as_str())
                .map(Vec::clone)
                .unwrap_or_default();
            wes.sort_by_key(|we| we.order_index);

            let workout_exercises = wes
                .into_iter()
                .map(|we| {
                    let mut sets: Vec<Set> = sets_by_we
                        .get(we.id.as_str())
                        .map(|rows| rows.iter().map(|s| (*s).clone()).collect())
                        .unwrap_or_default();
                    sets.sort_by_key(|s| s.set_index);
                    WorkoutExerciseView {
                        id: we.id.clone(),
                        workout_id: we.workout_id.clone(),
                        exercise_id: we.exercise_id.clone(),
                        order_index: we.order_index,
                        exercise: exercises_by_id
                            .get(we.exercise_id.as_str())
                            .map(|e| (*e).clone()),
                        sets,
                        running_log: run_by_we.get(we.id.as_str()).map(|rl| (*rl).clone()),
                    }
                })
                .collect();

            WorkoutView {
                id: w.id.clone(),
                routine_id: w.routine_id.clone(),
                date: w.date,
                notes: w.notes.clone(),
                created_at: w.created_at.clone(),
                workout_exercises,
            }
        })
        .collect();

    // Stable sort: same-date workouts keep their insertion order.
    views.sort_by(|a, b| b.date.cmp(&a.date));
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealSlot, NewRunningLog, NewSet};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn strength_entry(exercise_id: &str, sets: &[(u32, f64)]) -> WorkoutEntry {
        WorkoutEntry {
            exercise_id: exercise_id.to_string(),
            sets: sets
                .iter()
                .map(|&(reps, weight_kg)| NewSet { reps, weight_kg })
                .collect(),
            running: None,
        }
    }

    fn run_entry(exercise_id: &str, distance_km: f64, time_minutes: f64) -> WorkoutEntry {
        WorkoutEntry {
            exercise_id: exercise_id.to_string(),
            sets: Vec::new(),
            running: Some(NewRunningLog {
                distance_km,
                time_minutes,
                avg_heart_rate: None,
            }),
        }
    }

    fn draft_for(d: &str) -> WorkoutDraft {
        WorkoutDraft {
            date: Some(date(d)),
            ..WorkoutDraft::default()
        }
    }

    // Scenario: log one strength workout against the seed bench press.
    #[test]
    fn test_save_workout_creates_full_structure() {
        let db = Database::open_in_memory();
        let workout = db
            .save_workout(
                &draft_for("2024-01-01"),
                &[strength_entry("1", &[(5, 100.0)])],
            )
            .unwrap();
        assert_eq!(workout.date, date("2024-01-01"));

        let views = db.list_workouts().unwrap();
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.id, workout.id);
        assert_eq!(view.workout_exercises.len(), 1);
        let we = &view.workout_exercises[0];
        assert_eq!(we.exercise_id, "1");
        assert_eq!(we.exercise.as_ref().unwrap().name, "Bench Press");
        assert_eq!(we.sets.len(), 1);
        assert_eq!(we.sets[0].reps, 5);
        assert_eq!(we.sets[0].weight_kg, 100.0);
        assert!(we.running_log.is_none());
    }

    // Scenario: re-saving with an empty entry list wipes all children.
    #[test]
    fn test_save_workout_with_empty_entries_removes_children() {
        let db = Database::open_in_memory();
        let workout = db
            .save_workout(
                &draft_for("2024-01-01"),
                &[strength_entry("1", &[(5, 100.0)])],
            )
            .unwrap();

        let updated = db
            .save_workout(
                &WorkoutDraft {
                    id: Some(workout.id.clone()),
                    date: Some(date("2024-01-01")),
                    ..WorkoutDraft::default()
                },
                &[],
            )
            .unwrap();
        assert_eq!(updated.id, workout.id);

        let views = db.list_workouts().unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].workout_exercises.is_empty());

        // No set survives anywhere in the exported snapshot.
        let snapshot: DbState = serde_json::from_str(&db.export_data().unwrap()).unwrap();
        assert!(snapshot.sets.is_empty());
        assert!(snapshot.workout_exercises.is_empty());
    }

    #[test]
    fn test_save_workout_overwrite_replaces_children() {
        let db = Database::open_in_memory();
        let workout = db
            .save_workout(
                &draft_for("2024-01-01"),
                &[strength_entry("1", &[(5, 100.0)]), run_entry("3", 5.0, 25.0)],
            )
            .unwrap();

        // Overwrite with only squat.
        db.save_workout(
            &WorkoutDraft {
                id: Some(workout.id.clone()),
                date: Some(date("2024-01-01")),
                ..WorkoutDraft::default()
            },
            &[strength_entry("2", &[(8, 80.0)])],
        )
        .unwrap();

        let views = db.list_workouts().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].workout_exercises.len(), 1);
        assert_eq!(views[0].workout_exercises[0].exercise_id, "2");

        let snapshot: DbState = serde_json::from_str(&db.export_data().unwrap()).unwrap();
        assert_eq!(snapshot.workout_exercises.len(), 1);
        assert_eq!(snapshot.sets.len(), 1);
        assert!(snapshot.running_logs.is_empty());
    }

    #[test]
    fn test_save_workout_idempotent_overwrite() {
        let db = Database::open_in_memory();
        let entries = vec![
            strength_entry("1", &[(5, 100.0), (5, 102.5)]),
            run_entry("3", 8.2, 41.0),
        ];
        let workout = db.save_workout(&draft_for("2024-03-10"), &entries).unwrap();
        let first = db.list_workouts().unwrap();

        let draft = WorkoutDraft {
            id: Some(workout.id.clone()),
            date: Some(date("2024-03-10")),
            created_at: Some(workout.created_at.clone()),
            ..WorkoutDraft::default()
        };
        db.save_workout(&draft, &entries).unwrap();
        let second = db.list_workouts().unwrap();

        // Child ids churn on every save; compare content, not ids.
        assert_eq!(first.len(), second.len());
        for (a, b) in first[0]
            .workout_exercises
            .iter()
            .zip(&second[0].workout_exercises)
        {
            assert_eq!(a.exercise_id, b.exercise_id);
            assert_eq!(a.order_index, b.order_index);
            assert_eq!(a.sets.len(), b.sets.len());
            for (sa, sb) in a.sets.iter().zip(&b.sets) {
                assert_eq!(sa.set_index, sb.set_index);
                assert_eq!(sa.reps, sb.reps);
                assert_eq!(sa.weight_kg, sb.weight_kg);
            }
            assert_eq!(
                a.running_log.as_ref().map(|r| (r.distance_km, r.time_minutes)),
                b.running_log.as_ref().map(|r| (r.distance_km, r.time_minutes))
            );
        }
    }

    #[test]
    fn test_workouts_sorted_by_date_descending_stable() {
        let db = Database::open_in_memory();
        let w1 = db.save_workout(&draft_for("2024-01-05"), &[]).unwrap();
        let w2 = db.save_workout(&draft_for("2024-02-01"), &[]).unwrap();
        let w3 = db.save_workout(&draft_for("2024-01-05"), &[]).unwrap();

        let views = db.list_workouts().unwrap();
        assert_eq!(views[0].id, w2.id);
        // Same date: insertion order preserved.
        assert_eq!(views[1].id, w1.id);
        assert_eq!(views[2].id, w3.id);
    }

    #[test]
    fn test_children_ordered_by_index() {
        let db = Database::open_in_memory();
        db.save_workout(
            &draft_for("2024-01-01"),
            &[
                strength_entry("2", &[(8, 80.0), (6, 85.0), (4, 90.0)]),
                strength_entry("1", &[(5, 100.0)]),
                run_entry("3", 5.0, 25.0),
            ],
        )
        .unwrap();

        let views = db.list_workouts().unwrap();
        let wes = &views[0].workout_exercises;
        assert_eq!(
            wes.iter().map(|we| we.order_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(wes[0].exercise_id, "2");
        assert_eq!(wes[1].exercise_id, "1");
        assert_eq!(wes[2].exercise_id, "3");
        assert_eq!(
            wes[0].sets.iter().map(|s| s.set_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(wes[2].running_log.is_some());
    }

    #[test]
    fn test_delete_workout_cascades() {
        let db = Database::open_in_memory();
        let keep = db
            .save_workout(
                &draft_for("2024-01-02"),
                &[strength_entry("2", &[(5, 60.0)])],
            )
            .unwrap();
        let victim = db
            .save_workout(
                &draft_for("2024-01-01"),
                &[
                    strength_entry("1", &[(5, 100.0), (3, 110.0)]),
                    run_entry("3", 10.0, 55.0),
                ],
            )
            .unwrap();

        assert!(db.delete_workout(&victim.id).unwrap());
        assert!(!db.delete_workout(&victim.id).unwrap());

        let snapshot: DbState = serde_json::from_str(&db.export_data().unwrap()).unwrap();
        assert!(snapshot.workouts.iter().all(|w| w.id != victim.id));
        assert!(
            snapshot
                .workout_exercises
                .iter()
                .all(|we| we.workout_id == keep.id)
        );
        // Remaining sets/logs all belong to the surviving workout's rows.
        let keep_we_ids: HashSet<&str> = snapshot
            .workout_exercises
            .iter()
            .map(|we| we.id.as_str())
            .collect();
        assert!(
            snapshot
                .sets
                .iter()
                .all(|s| keep_we_ids.contains(s.workout_exercise_id.as_str()))
        );
        assert!(snapshot.running_logs.is_empty());
    }

    #[test]
    fn test_deleted_exercise_is_tolerated_in_views() {
        let db = Database::open_in_memory();
        db.save_workout(
            &draft_for("2024-01-01"),
            &[strength_entry("1", &[(5, 100.0)])],
        )
        .unwrap();

        assert!(db.delete_exercise("1").unwrap());

        let views = db.list_workouts().unwrap();
        let we = &views[0].workout_exercises[0];
        assert_eq!(we.exercise_id, "1");
        assert!(we.exercise.is_none());
        // History stays intact.
        assert_eq!(we.sets.len(), 1);
    }

    #[test]
    fn test_delete_exercise_leaves_routine_reference() {
        let db = Database::open_in_memory();
        assert!(db.delete_exercise("1").unwrap());
        let routines = db.list_routines().unwrap();
        // The seed routine still lists the deleted exercise id.
        assert!(routines[0].exercise_ids.contains(&"1".to_string()));
    }

    #[test]
    fn test_delete_routine_leaves_workout_reference() {
        let db = Database::open_in_memory();
        let workout = db
            .save_workout(
                &WorkoutDraft {
                    routine_id: Some("r1".to_string()),
                    date: Some(date("2024-01-01")),
                    ..WorkoutDraft::default()
                },
                &[],
            )
            .unwrap();

        assert!(db.delete_routine("r1").unwrap());
        assert!(db.list_routines().unwrap().is_empty());

        let views = db.list_workouts().unwrap();
        assert_eq!(views[0].id, workout.id);
        assert_eq!(views[0].routine_id.as_deref(), Some("r1"));
    }

    // Scenario: last performance picks the most recent workout.
    #[test]
    fn test_last_performance_prefers_latest_date() {
        let db = Database::open_in_memory();
        db.save_workout(
            &draft_for("2024-01-01"),
            &[strength_entry("1", &[(5, 100.0)])],
        )
        .unwrap();
        db.save_workout(
            &draft_for("2024-02-01"),
            &[strength_entry("1", &[(3, 110.0), (3, 112.5)])],
        )
        .unwrap();

        let last = db.last_performance("1").unwrap();
        assert_eq!(last.sets.len(), 2);
        assert_eq!(last.sets[0].weight_kg, 110.0);
        assert_eq!(last.sets[1].weight_kg, 112.5);
        assert!(last.running_log.is_none());
    }

    #[test]
    fn test_last_performance_empty_without_history() {
        let db = Database::open_in_memory();
        let last = db.last_performance("1").unwrap();
        assert!(last.is_empty());
    }

    #[test]
    fn test_last_performance_running() {
        let db = Database::open_in_memory();
        db.save_workout(&draft_for("2024-01-01"), &[run_entry("3", 5.0, 26.5)])
            .unwrap();

        let last = db.last_performance("3").unwrap();
        assert!(last.sets.is_empty());
        let run = last.running_log.unwrap();
        assert_eq!(run.distance_km, 5.0);
        assert_eq!(run.time_minutes, 26.5);
    }

    #[test]
    fn test_add_exercise_and_routine_validation() {
        let db = Database::open_in_memory();
        let exercise = db.add_exercise("Deadlift", ExerciseKind::Strength).unwrap();
        assert!(!exercise.id.is_empty());
        assert!(db.add_exercise("  ", ExerciseKind::Strength).is_err());

        let routine = db.add_routine("Pull Day", &[exercise.id.clone()]).unwrap();
        assert_eq!(routine.exercise_ids, vec![exercise.id]);
        assert!(db.add_routine("Empty Day", &[]).is_err());
    }

    #[test]
    fn test_body_weight_logs_sorted_newest_first() {
        let db = Database::open_in_memory();
        db.add_body_weight_log(date("2024-01-10"), 80.0, None)
            .unwrap();
        db.add_body_weight_log(date("2024-01-20"), 79.2, Some("post holiday".to_string()))
            .unwrap();
        db.add_body_weight_log(date("2024-01-05"), 80.5, None)
            .unwrap();

        let logs = db.list_body_weight_logs().unwrap();
        assert_eq!(
            logs.iter().map(|l| l.date).collect::<Vec<_>>(),
            vec![date("2024-01-20"), date("2024-01-10"), date("2024-01-05")]
        );

        let id = logs[0].id.clone();
        assert!(db.delete_body_weight_log(&id).unwrap());
        assert!(!db.delete_body_weight_log(&id).unwrap());
    }

    #[test]
    fn test_food_logs_by_date() {
        let db = Database::open_in_memory();
        db.add_food_log(&NewFoodLog {
            date: date("2024-01-01"),
            name: "Oatmeal".to_string(),
            calories: 350.0,
            protein_g: 12.0,
            carbs_g: 60.0,
            fats_g: 6.0,
            meal_slot: MealSlot::Breakfast,
        })
        .unwrap();
        db.add_food_log(&NewFoodLog {
            date: date("2024-01-02"),
            name: "Chicken Bowl".to_string(),
            calories: 620.0,
            protein_g: 45.0,
            carbs_g: 70.0,
            fats_g: 14.0,
            meal_slot: MealSlot::Lunch,
        })
        .unwrap();

        assert_eq!(db.list_food_logs().unwrap().len(), 2);
        let day1 = db.food_logs_for_date(date("2024-01-01")).unwrap();
        assert_eq!(day1.len(), 1);
        assert_eq!(day1[0].name, "Oatmeal");
    }

    #[test]
    fn test_add_food_log_clamps_negative_values() {
        let db = Database::open_in_memory();
        let log = db
            .add_food_log(&NewFoodLog {
                date: date("2024-01-01"),
                name: "Mystery".to_string(),
                calories: -100.0,
                protein_g: -1.0,
                carbs_g: 10.0,
                fats_g: 0.0,
                meal_slot: MealSlot::Snack,
            })
            .unwrap();
        assert_eq!(log.calories, 0.0);
        assert_eq!(log.protein_g, 0.0);
        assert_eq!(log.carbs_g, 10.0);
    }

    #[test]
    fn test_export_import_round_trip() {
        let db = Database::open_in_memory();
        db.save_workout(
            &draft_for("2024-01-01"),
            &[strength_entry("1", &[(5, 100.0)]), run_entry("3", 5.0, 25.0)],
        )
        .unwrap();
        db.add_body_weight_log(date("2024-01-01"), 80.0, None)
            .unwrap();

        let exported = db.export_data().unwrap();
        assert!(db.import_data(&exported).unwrap());

        // Re-export reproduces the snapshot byte for byte.
        assert_eq!(db.export_data().unwrap(), exported);
    }

    // Scenario: snapshot missing the routines table is rejected wholesale.
    #[test]
    fn test_import_missing_required_table_fails_untouched() {
        let db = Database::open_in_memory();
        let workout = db.save_workout(&draft_for("2024-01-01"), &[]).unwrap();

        assert!(!db.import_data(r#"{"exercises":[],"workouts":[]}"#).unwrap());
        assert!(!db.import_data("not json at all").unwrap());

        // Prior contents untouched.
        let views = db.list_workouts().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, workout.id);
    }

    #[test]
    fn test_import_accepts_minimal_snapshot() {
        let db = Database::open_in_memory();
        assert!(
            db.import_data(r#"{"exercises":[],"workouts":[],"routines":[]}"#)
                .unwrap()
        );
        assert!(db.list_exercises().unwrap().is_empty());
        assert!(db.list_routines().unwrap().is_empty());
    }

    #[test]
    fn test_reset_restores_seed() {
        let db = Database::open_in_memory();
        db.save_workout(&draft_for("2024-01-01"), &[]).unwrap();
        db.delete_exercise("1").unwrap();

        db.reset_data().unwrap();

        let exercises = db.list_exercises().unwrap();
        assert_eq!(exercises.len(), 3);
        assert_eq!(exercises[0].name, "Bench Press");
        assert!(db.list_workouts().unwrap().is_empty());
    }

    #[test]
    fn test_workout_keeps_notes_and_routine() {
        let db = Database::open_in_memory();
        let workout = db
            .save_workout(
                &WorkoutDraft {
                    routine_id: Some("r1".to_string()),
                    date: Some(date("2024-01-01")),
                    notes: Some("felt strong".to_string()),
                    ..WorkoutDraft::default()
                },
                &[],
            )
            .unwrap();

        let views = db.list_workouts().unwrap();
        assert_eq!(views[0].routine_id.as_deref(), Some("r1"));
        assert_eq!(views[0].notes.as_deref(), Some("felt strong"));
        assert_eq!(views[0].created_at, workout.created_at);
    }
}
