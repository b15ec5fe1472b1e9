use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use progreso_core::db::Database;

pub(crate) fn cmd_export(db: &Database, file: Option<PathBuf>, json: bool) -> Result<()> {
    let snapshot = db.export_data()?;

    match file {
        Some(path) => {
            std::fs::write(&path, &snapshot)
                .with_context(|| format!("Failed to write export file: {}", path.display()))?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "exported": path.display().to_string() })
                );
            } else {
                println!("Exported database to {}", path.display());
            }
        }
        // No file: write the snapshot itself to stdout.
        None => println!("{snapshot}"),
    }
    Ok(())
}

pub(crate) fn cmd_import(db: &Database, file: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;

    if !db.import_data(&text)? {
        bail!(
            "Import rejected: file is not a valid snapshot (must contain the \
             exercises, workouts and routines tables). Existing data is untouched."
        );
    }

    let exercises = db.list_exercises()?.len();
    let workouts = db.list_workouts()?.len();
    if json {
        println!(
            "{}",
            serde_json::json!({ "imported": true, "exercises": exercises, "workouts": workouts })
        );
    } else {
        println!("Imported snapshot: {exercises} exercise(s), {workouts} workout(s)");
    }
    Ok(())
}

pub(crate) fn cmd_reset(db: &Database, yes: bool, json: bool) -> Result<()> {
    if !yes {
        bail!("This discards ALL data and restores the seed state. Re-run with --yes to confirm.");
    }
    db.reset_data()?;

    if json {
        println!("{}", serde_json::json!({ "reset": true }));
    } else {
        println!("Database reset to seed state");
    }
    Ok(())
}
