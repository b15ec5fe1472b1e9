use anyhow::{Result, bail};
use tabled::{
    Table, Tabled,
    settings::Style,
};

use progreso_core::db::Database;
use progreso_core::models::{
    NewRunningLog, NewSet, WorkoutDraft, WorkoutEntry, WorkoutView, estimate_1rm,
};

use super::helpers::{format_duration, parse_date, resolve_exercise, short_id, truncate};
use super::routine::resolve_routine;

fn find_workout<'a>(views: &'a [WorkoutView], id: &str) -> Result<&'a WorkoutView> {
    let matches: Vec<&WorkoutView> = views
        .iter()
        .filter(|w| w.id == id || w.id.starts_with(id))
        .collect();
    match matches.as_slice() {
        [w] => Ok(w),
        [] => bail!("No workout with id '{id}'. See `progreso workout list`"),
        _ => bail!("Workout id '{id}' is ambiguous; give more characters"),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_workout_log(
    db: &Database,
    id: Option<String>,
    date: Option<String>,
    notes: Option<String>,
    routine: Option<String>,
    set_specs: &[String],
    run_specs: &[String],
    json: bool,
) -> Result<()> {
    let exercises = db.list_exercises()?;

    let mut entries: Vec<WorkoutEntry> = Vec::new();
    for spec in set_specs {
        let (name, sets) = super::helpers::parse_set_spec(spec)?;
        let exercise = resolve_exercise(&exercises, &name)?;
        entries.push(WorkoutEntry {
            exercise_id: exercise.id.clone(),
            sets,
            running: None,
        });
    }
    for spec in run_specs {
        let (name, running) = super::helpers::parse_run_spec(spec)?;
        let exercise = resolve_exercise(&exercises, &name)?;
        entries.push(WorkoutEntry {
            exercise_id: exercise.id.clone(),
            sets: Vec::new(),
            running: Some(running),
        });
    }

    let routine_id = match &routine {
        Some(query) => {
            let routines = db.list_routines()?;
            let routine = resolve_routine(&routines, query)?;
            // With no explicit entries, pre-fill from the routine template,
            // seeding each exercise with its last performance.
            if entries.is_empty() {
                for exercise_id in &routine.exercise_ids {
                    let last = db.last_performance(exercise_id)?;
                    entries.push(WorkoutEntry {
                        exercise_id: exercise_id.clone(),
                        sets: last
                            .sets
                            .iter()
                            .map(|s| NewSet {
                                reps: s.reps,
                                weight_kg: s.weight_kg,
                            })
                            .collect(),
                        running: last.running_log.map(|r| NewRunningLog {
                            distance_km: r.distance_km,
                            time_minutes: r.time_minutes,
                            avg_heart_rate: r.avg_heart_rate,
                        }),
                    });
                }
            }
            Some(routine.id.clone())
        }
        None => None,
    };

    // Updating an existing workout keeps its identity and creation stamp;
    // fields not given on the command line carry over from the stored row.
    let mut draft = WorkoutDraft {
        id: None,
        routine_id,
        date: match date {
            Some(d) => Some(parse_date(Some(d))?),
            None => None,
        },
        notes,
        created_at: None,
    };
    if let Some(ref prefix) = id {
        let views = db.list_workouts()?;
        let existing = find_workout(&views, prefix)?;
        draft.id = Some(existing.id.clone());
        draft.created_at = Some(existing.created_at.clone());
        if draft.date.is_none() {
            draft.date = Some(existing.date);
        }
        if draft.notes.is_none() {
            draft.notes = existing.notes.clone();
        }
        if draft.routine_id.is_none() {
            draft.routine_id = existing.routine_id.clone();
        }
    }

    let workout = db.save_workout(&draft, &entries)?;

    if json {
        let views = db.list_workouts()?;
        let view = find_workout(&views, &workout.id)?;
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        let verb = if id.is_some() { "Updated" } else { "Logged" };
        println!(
            "{verb} workout {} on {} with {} exercise(s)",
            short_id(&workout.id),
            workout.date.format("%Y-%m-%d"),
            entries.len()
        );
    }
    Ok(())
}

pub(crate) fn cmd_workout_list(db: &Database, limit: Option<usize>, json: bool) -> Result<()> {
    let mut views = db.list_workouts()?;
    if let Some(n) = limit {
        views.truncate(n);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }
    if views.is_empty() {
        eprintln!("No workouts yet. Use `progreso workout log` to record one.");
        return Ok(());
    }

    #[derive(Tabled)]
    struct WorkoutRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Exercises")]
        exercises: String,
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let rows: Vec<WorkoutRow> = views
        .iter()
        .map(|w| {
            let summary = w
                .workout_exercises
                .iter()
                .map(|we| {
                    let name = we
                        .exercise
                        .as_ref()
                        .map_or("(deleted)", |e| e.name.as_str());
                    if let Some(run) = &we.running_log {
                        format!("{name} {:.1}km", run.distance_km)
                    } else {
                        format!("{name} x{}", we.sets.len())
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            WorkoutRow {
                id: short_id(&w.id),
                date: w.date.format("%Y-%m-%d").to_string(),
                exercises: truncate(&summary, 60),
                notes: truncate(w.notes.as_deref().unwrap_or_default(), 30),
            }
        })
        .collect();

    println!("{}", Table::new(&rows).with(Style::rounded()));
    Ok(())
}

pub(crate) fn cmd_workout_show(db: &Database, id: &str, json: bool) -> Result<()> {
    let views = db.list_workouts()?;
    let view = find_workout(&views, id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!("=== Workout {} — {} ===", short_id(&view.id), view.date);
    if let Some(notes) = &view.notes {
        println!("Notes: {notes}");
    }
    for we in &view.workout_exercises {
        let name = we
            .exercise
            .as_ref()
            .map_or("(deleted exercise)", |e| e.name.as_str());
        println!("\n  {name}");
        for set in &we.sets {
            println!(
                "    set {}: {} x {:.1}kg (1RM ~{:.1}kg)",
                set.set_index + 1,
                set.reps,
                set.weight_kg,
                estimate_1rm(set.weight_kg, set.reps)
            );
        }
        if let Some(run) = &we.running_log {
            let hr = run
                .avg_heart_rate
                .map(|h| format!(" @ {h:.0} bpm"))
                .unwrap_or_default();
            println!(
                "    {:.1}km in {}{hr}",
                run.distance_km,
                format_duration(run.time_minutes)
            );
        }
    }
    Ok(())
}

pub(crate) fn cmd_workout_delete(db: &Database, id: &str, json: bool) -> Result<()> {
    let views = db.list_workouts()?;
    let full_id = find_workout(&views, id)?.id.clone();
    db.delete_workout(&full_id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": full_id }));
    } else {
        println!("Deleted workout {} and all its entries", short_id(&full_id));
    }
    Ok(())
}

pub(crate) fn cmd_last(db: &Database, query: &str, json: bool) -> Result<()> {
    let exercises = db.list_exercises()?;
    let exercise = resolve_exercise(&exercises, query)?;
    let last = db.last_performance(&exercise.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&last)?);
        return Ok(());
    }
    if last.is_empty() {
        eprintln!("No previous performance for '{}'", exercise.name);
        return Ok(());
    }

    println!("Last performance of '{}':", exercise.name);
    for set in &last.sets {
        println!(
            "  set {}: {} x {:.1}kg (1RM ~{:.1}kg)",
            set.set_index + 1,
            set.reps,
            set.weight_kg,
            estimate_1rm(set.weight_kg, set.reps)
        );
    }
    if let Some(run) = &last.running_log {
        let hr = run
            .avg_heart_rate
            .map(|h| format!(" @ {h:.0} bpm"))
            .unwrap_or_default();
        println!(
            "  {:.1}km in {}{hr}",
            run.distance_km,
            format_duration(run.time_minutes)
        );
    }
    Ok(())
}
