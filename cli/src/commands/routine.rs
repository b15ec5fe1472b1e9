use anyhow::{Context, Result};
use tabled::{
    Table, Tabled,
    settings::Style,
};

use progreso_core::db::Database;
use progreso_core::models::Routine;

use super::helpers::{resolve_exercise, short_id};

/// Resolve a routine reference (id or case-insensitive name).
pub(super) fn resolve_routine<'a>(routines: &'a [Routine], query: &str) -> Result<&'a Routine> {
    if let Some(r) = routines.iter().find(|r| r.id == query) {
        return Ok(r);
    }
    let lower = query.to_lowercase();
    routines
        .iter()
        .find(|r| r.name.to_lowercase() == lower)
        .with_context(|| format!("No routine named '{query}'. See `progreso routine list`"))
}

pub(crate) fn cmd_routine_create(
    db: &Database,
    name: &str,
    exercise_refs: &[String],
    json: bool,
) -> Result<()> {
    let exercises = db.list_exercises()?;
    let ids: Vec<String> = exercise_refs
        .iter()
        .map(|q| resolve_exercise(&exercises, q).map(|e| e.id.clone()))
        .collect::<Result<_>>()?;
    let routine = db.add_routine(name, &ids)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routine)?);
    } else {
        println!(
            "Created routine '{}' with {} exercise(s)",
            routine.name,
            routine.exercise_ids.len()
        );
    }
    Ok(())
}

pub(crate) fn cmd_routine_list(db: &Database, json: bool) -> Result<()> {
    let routines = db.list_routines()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routines)?);
        return Ok(());
    }
    if routines.is_empty() {
        eprintln!("No routines. Use `progreso routine create` to add one.");
        return Ok(());
    }

    let exercises = db.list_exercises()?;

    #[derive(Tabled)]
    struct RoutineRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Exercises")]
        exercises: String,
    }

    let rows: Vec<RoutineRow> = routines
        .iter()
        .map(|r| RoutineRow {
            id: short_id(&r.id),
            name: r.name.clone(),
            exercises: r
                .exercise_ids
                .iter()
                .map(|id| {
                    exercises
                        .iter()
                        .find(|e| &e.id == id)
                        .map_or("(deleted)".to_string(), |e| e.name.clone())
                })
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    println!("{}", Table::new(&rows).with(Style::rounded()));
    Ok(())
}

pub(crate) fn cmd_routine_delete(db: &Database, query: &str, json: bool) -> Result<()> {
    let routines = db.list_routines()?;
    let routine = resolve_routine(&routines, query)?.clone();
    db.delete_routine(&routine.id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": routine.id }));
    } else {
        println!("Deleted routine '{}'", routine.name);
    }
    Ok(())
}
