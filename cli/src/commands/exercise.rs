use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::Style,
};

use progreso_core::db::Database;
use progreso_core::models::parse_exercise_kind;

use super::helpers::{resolve_exercise, short_id};

pub(crate) fn cmd_exercise_add(db: &Database, name: &str, kind: &str, json: bool) -> Result<()> {
    let kind = parse_exercise_kind(kind)?;
    let exercise = db.add_exercise(name, kind)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&exercise)?);
    } else {
        println!(
            "Added {} exercise '{}' ({})",
            exercise.kind.as_str(),
            exercise.name,
            short_id(&exercise.id)
        );
    }
    Ok(())
}

pub(crate) fn cmd_exercise_list(db: &Database, json: bool) -> Result<()> {
    let exercises = db.list_exercises()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&exercises)?);
        return Ok(());
    }
    if exercises.is_empty() {
        eprintln!("No exercises. Use `progreso exercise add` to create one.");
        return Ok(());
    }

    #[derive(Tabled)]
    struct ExerciseRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Kind")]
        kind: &'static str,
    }

    let rows: Vec<ExerciseRow> = exercises
        .iter()
        .map(|e| ExerciseRow {
            id: short_id(&e.id),
            name: e.name.clone(),
            kind: e.kind.as_str(),
        })
        .collect();

    println!("{}", Table::new(&rows).with(Style::rounded()));
    Ok(())
}

pub(crate) fn cmd_exercise_delete(db: &Database, query: &str, json: bool) -> Result<()> {
    let exercises = db.list_exercises()?;
    let exercise = resolve_exercise(&exercises, query)?.clone();
    db.delete_exercise(&exercise.id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": exercise.id }));
    } else {
        println!("Deleted exercise '{}' (workout history is kept)", exercise.name);
    }
    Ok(())
}
