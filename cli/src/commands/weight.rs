use anyhow::{Result, bail};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use progreso_core::db::Database;

use super::helpers::{parse_date, short_id};

const LBS_PER_KG: f64 = 2.20462;
const KG_PER_LB: f64 = 0.453_592;

pub(crate) fn cmd_weight_log(
    db: &Database,
    value: f64,
    unit: &str,
    date: Option<String>,
    notes: Option<String>,
    json: bool,
) -> Result<()> {
    if value <= 0.0 {
        bail!("Weight must be greater than 0");
    }

    let weight_kg = match unit.to_lowercase().as_str() {
        "kg" => value,
        "lbs" | "lb" => {
            let kg = value * KG_PER_LB;
            eprintln!("Converting {value:.1} lbs → {kg:.2} kg");
            kg
        }
        _ => bail!("Invalid unit '{unit}'. Use 'kg' or 'lbs'"),
    };

    let date = parse_date(date)?;
    let log = db.add_body_weight_log(date, weight_kg, notes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&log)?);
    } else {
        let lbs = log.weight_kg * LBS_PER_KG;
        println!(
            "Logged {:.1} kg ({:.1} lbs) for {}",
            log.weight_kg,
            lbs,
            log.date.format("%Y-%m-%d")
        );
        if let Some(ref n) = log.notes {
            println!("  Notes: {n}");
        }
    }
    Ok(())
}

pub(crate) fn cmd_weight_history(db: &Database, limit: Option<usize>, json: bool) -> Result<()> {
    let mut logs = db.list_body_weight_logs()?;
    if let Some(n) = limit {
        logs.truncate(n);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&logs)?);
        return Ok(());
    }
    if logs.is_empty() {
        eprintln!("No weight entries found. Use `progreso weight log` to record your weight.");
        return Ok(());
    }

    #[derive(Tabled)]
    struct WeightRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Weight (kg)")]
        kg: String,
        #[tabled(rename = "Weight (lbs)")]
        lbs: String,
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let rows: Vec<WeightRow> = logs
        .iter()
        .map(|l| WeightRow {
            id: short_id(&l.id),
            date: l.date.format("%Y-%m-%d").to_string(),
            kg: format!("{:.1}", l.weight_kg),
            lbs: format!("{:.1}", l.weight_kg * LBS_PER_KG),
            notes: l.notes.clone().unwrap_or_default(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_weight_delete(db: &Database, id: &str, json: bool) -> Result<()> {
    let logs = db.list_body_weight_logs()?;
    let matches: Vec<&str> = logs
        .iter()
        .map(|l| l.id.as_str())
        .filter(|full| *full == id || full.starts_with(id))
        .collect();
    let full_id = match matches.as_slice() {
        [one] => (*one).to_string(),
        [] => bail!("No weight entry with id '{id}'"),
        _ => bail!("Weight entry id '{id}' is ambiguous; give more characters"),
    };
    db.delete_body_weight_log(&full_id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": full_id }));
    } else {
        println!("Deleted weight entry {}", short_id(&full_id));
    }
    Ok(())
}
