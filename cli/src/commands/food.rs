use anyhow::{Result, bail};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use progreso_core::db::Database;
use progreso_core::models::{NewFoodLog, parse_meal_slot};

use super::helpers::{parse_date, short_id, truncate};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_food_log(
    db: &Database,
    name: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    slot: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Food name must not be empty");
    }
    let log = db.add_food_log(&NewFoodLog {
        date: parse_date(date)?,
        name: name.trim().to_string(),
        calories,
        protein_g: protein,
        carbs_g: carbs,
        fats_g: fats,
        meal_slot: parse_meal_slot(slot)?,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&log)?);
    } else {
        println!(
            "Logged '{}' — {:.0} kcal ({}) for {}",
            log.name,
            log.calories,
            log.meal_slot.as_str(),
            log.date.format("%Y-%m-%d")
        );
    }
    Ok(())
}

pub(crate) fn cmd_food_list(db: &Database, date: Option<String>, json: bool) -> Result<()> {
    let logs = match date {
        Some(d) => db.food_logs_for_date(parse_date(Some(d))?)?,
        None => db.list_food_logs()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&logs)?);
        return Ok(());
    }
    if logs.is_empty() {
        eprintln!("No food entries. Use `progreso food log` to record one.");
        return Ok(());
    }

    #[derive(Tabled)]
    struct FoodRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Slot")]
        slot: &'static str,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "kcal")]
        calories: String,
        #[tabled(rename = "P (g)")]
        protein: String,
        #[tabled(rename = "C (g)")]
        carbs: String,
        #[tabled(rename = "F (g)")]
        fats: String,
    }

    let rows: Vec<FoodRow> = logs
        .iter()
        .map(|l| FoodRow {
            id: short_id(&l.id),
            date: l.date.format("%Y-%m-%d").to_string(),
            slot: l.meal_slot.as_str(),
            name: truncate(&l.name, 30),
            calories: format!("{:.0}", l.calories),
            protein: format!("{:.1}", l.protein_g),
            carbs: format!("{:.1}", l.carbs_g),
            fats: format!("{:.1}", l.fats_g),
        })
        .collect();

    let total: f64 = logs.iter().map(|l| l.calories).sum();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..8)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    println!("Total: {total:.0} kcal");
    Ok(())
}

pub(crate) fn cmd_food_delete(db: &Database, id: &str, json: bool) -> Result<()> {
    let logs = db.list_food_logs()?;
    let matches: Vec<&str> = logs
        .iter()
        .map(|l| l.id.as_str())
        .filter(|full| *full == id || full.starts_with(id))
        .collect();
    let full_id = match matches.as_slice() {
        [one] => (*one).to_string(),
        [] => bail!("No food entry with id '{id}'"),
        _ => bail!("Food entry id '{id}' is ambiguous; give more characters"),
    };
    db.delete_food_log(&full_id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": full_id }));
    } else {
        println!("Deleted food entry {}", short_id(&full_id));
    }
    Ok(())
}
