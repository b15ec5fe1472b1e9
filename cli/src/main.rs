mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_exercise_add, cmd_exercise_delete, cmd_exercise_list, cmd_export, cmd_food_delete,
    cmd_food_list, cmd_food_log, cmd_import, cmd_last, cmd_reset, cmd_routine_create,
    cmd_routine_delete, cmd_routine_list, cmd_weight_delete, cmd_weight_history, cmd_weight_log,
    cmd_workout_delete, cmd_workout_list, cmd_workout_log, cmd_workout_show,
};
use crate::config::Config;
use progreso_core::db::Database;
use progreso_core::models::num_or_zero;

#[derive(Parser)]
#[command(
    name = "progreso",
    version,
    about = "A local-first workout and nutrition tracker",
    long_about = "\n
  ██████╗ ██████╗  ██████╗  ██████╗ ██████╗ ███████╗███████╗ ██████╗
  ██╔══██╗██╔══██╗██╔═══██╗██╔════╝ ██╔══██╗██╔════╝██╔════╝██╔═══██╗
  ██████╔╝██████╔╝██║   ██║██║  ███╗██████╔╝█████╗  ███████╗██║   ██║
  ██╔═══╝ ██╔══██╗██║   ██║██║   ██║██╔══██╗██╔══╝  ╚════██║██║   ██║
  ██║     ██║  ██║╚██████╔╝╚██████╔╝██║  ██║███████╗███████║╚██████╔╝
  ╚═╝     ╚═╝  ╚═╝ ╚═════╝  ╚═════╝ ╚═╝  ╚═╝╚══════╝╚══════╝ ╚═════╝
                     every rep, on your machine.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the exercise catalog
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },
    /// Manage workout routines (exercise templates)
    Routine {
        #[command(subcommand)]
        command: RoutineCommands,
    },
    /// Log and browse workout sessions
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },
    /// Show the most recent performance of an exercise
    Last {
        /// Exercise id or name
        exercise: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Track body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },
    /// Track food intake
    Food {
        #[command(subcommand)]
        command: FoodCommands,
    },
    /// Export the full database as a JSON snapshot
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        file: Option<std::path::PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import a JSON snapshot, replacing all current data
    Import {
        /// Path to the snapshot file
        file: std::path::PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Discard all data and restore the seed state
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Add an exercise to the catalog
    Add {
        /// Exercise name
        name: String,
        /// Exercise kind: strength or endurance
        #[arg(short, long, default_value = "strength")]
        kind: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all exercises
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an exercise (past workout entries are kept)
    Delete {
        /// Exercise id or name
        exercise: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RoutineCommands {
    /// Create a routine from a list of exercises
    Create {
        /// Routine name
        name: String,
        /// Exercises (id or name), in order
        #[arg(required = true)]
        exercises: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all routines
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a routine (workouts that used it are kept)
    Delete {
        /// Routine id or name
        routine: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WorkoutCommands {
    /// Log a workout, or overwrite an existing one with --id
    Log {
        /// Existing workout id to overwrite
        #[arg(long)]
        id: Option<String>,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Optional notes
        #[arg(long)]
        notes: Option<String>,
        /// Routine (id or name); with no --set/--run, pre-fills from last performance
        #[arg(short, long)]
        routine: Option<String>,
        /// Strength entry: "EXERCISE:WEIGHTxREPS,WEIGHTxREPS,..." (repeatable)
        #[arg(long = "set")]
        sets: Vec<String>,
        /// Endurance entry: "EXERCISE:KM/MIN[@HR]" (repeatable)
        #[arg(long = "run")]
        runs: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List workouts, most recent first
    List {
        /// Show at most N workouts
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one workout in full
    Show {
        /// Workout id (prefix allowed)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a workout and all its sets and running logs
    Delete {
        /// Workout id (prefix allowed)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Log a body weight entry
    Log {
        /// Weight value (number)
        value: f64,
        /// Unit: kg or lbs (default: kg)
        #[arg(short, long, default_value = "kg")]
        unit: String,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Optional notes
        #[arg(long)]
        notes: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weight history, most recent first
    History {
        /// Show at most N entries
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a weight entry by id
    Delete {
        /// Weight entry id (prefix allowed)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FoodCommands {
    /// Log a food entry
    Log {
        /// Food name
        name: String,
        /// Calories (kcal); non-numeric values count as 0
        #[arg(long, default_value = "0")]
        calories: String,
        /// Protein in grams
        #[arg(long, default_value = "0")]
        protein: String,
        /// Carbohydrates in grams
        #[arg(long, default_value = "0")]
        carbs: String,
        /// Fats in grams
        #[arg(long, default_value = "0")]
        fats: String,
        /// Meal slot: breakfast, brunch, lunch, snack, dinner
        #[arg(short, long, default_value = "snack")]
        meal: String,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List food entries, optionally for one date
    List {
        /// Only show entries for this date
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a food entry by id
    Delete {
        /// Food entry id (prefix allowed)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&config.db_path);

    match cli.command {
        Commands::Exercise { command } => match command {
            ExerciseCommands::Add { name, kind, json } => {
                cmd_exercise_add(&db, &name, &kind, json)
            }
            ExerciseCommands::List { json } => cmd_exercise_list(&db, json),
            ExerciseCommands::Delete { exercise, json } => {
                cmd_exercise_delete(&db, &exercise, json)
            }
        },
        Commands::Routine { command } => match command {
            RoutineCommands::Create {
                name,
                exercises,
                json,
            } => cmd_routine_create(&db, &name, &exercises, json),
            RoutineCommands::List { json } => cmd_routine_list(&db, json),
            RoutineCommands::Delete { routine, json } => cmd_routine_delete(&db, &routine, json),
        },
        Commands::Workout { command } => match command {
            WorkoutCommands::Log {
                id,
                date,
                notes,
                routine,
                sets,
                runs,
                json,
            } => cmd_workout_log(&db, id, date, notes, routine, &sets, &runs, json),
            WorkoutCommands::List { limit, json } => cmd_workout_list(&db, limit, json),
            WorkoutCommands::Show { id, json } => cmd_workout_show(&db, &id, json),
            WorkoutCommands::Delete { id, json } => cmd_workout_delete(&db, &id, json),
        },
        Commands::Last { exercise, json } => cmd_last(&db, &exercise, json),
        Commands::Weight { command } => match command {
            WeightCommands::Log {
                value,
                unit,
                date,
                notes,
                json,
            } => cmd_weight_log(&db, value, &unit, date, notes, json),
            WeightCommands::History { limit, json } => cmd_weight_history(&db, limit, json),
            WeightCommands::Delete { id, json } => cmd_weight_delete(&db, &id, json),
        },
        Commands::Food { command } => match command {
            FoodCommands::Log {
                name,
                calories,
                protein,
                carbs,
                fats,
                meal,
                date,
                json,
            } => cmd_food_log(
                &db,
                &name,
                num_or_zero(&calories),
                num_or_zero(&protein),
                num_or_zero(&carbs),
                num_or_zero(&fats),
                &meal,
                date,
                json,
            ),
            FoodCommands::List { date, json } => cmd_food_list(&db, date, json),
            FoodCommands::Delete { id, json } => cmd_food_delete(&db, &id, json),
        },
        Commands::Export { file, json } => cmd_export(&db, file, json),
        Commands::Import { file, json } => cmd_import(&db, &file, json),
        Commands::Reset { yes, json } => cmd_reset(&db, yes, json),
    }
}
