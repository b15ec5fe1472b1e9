use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};

use progreso_core::models::{Exercise, NewRunningLog, NewSet, num_or_zero, reps_or_zero};

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday")),
        },
    }
}

/// Resolve an exercise reference (id or case-insensitive name) against the
/// exercise table.
pub(crate) fn resolve_exercise<'a>(exercises: &'a [Exercise], query: &str) -> Result<&'a Exercise> {
    if let Some(e) = exercises.iter().find(|e| e.id == query) {
        return Ok(e);
    }
    let lower = query.to_lowercase();
    exercises
        .iter()
        .find(|e| e.name.to_lowercase() == lower)
        .with_context(|| format!("No exercise named '{query}'. See `progreso exercise list`"))
}

/// Parse a strength entry spec: `"EXERCISE:WEIGHTxREPS,WEIGHTxREPS,..."`,
/// e.g. `"Bench Press:100x5,102.5x3"`. Non-numeric weights or reps become 0.
pub(crate) fn parse_set_spec(spec: &str) -> Result<(String, Vec<NewSet>)> {
    let Some((name, sets_part)) = spec.rsplit_once(':') else {
        bail!("Invalid set spec '{spec}'. Use 'EXERCISE:WEIGHTxREPS,...' (e.g. 'Bench:100x5')");
    };
    if name.trim().is_empty() || sets_part.trim().is_empty() {
        bail!("Invalid set spec '{spec}'. Use 'EXERCISE:WEIGHTxREPS,...' (e.g. 'Bench:100x5')");
    }
    let sets = sets_part
        .split(',')
        .map(|s| {
            let (weight, reps) = s.trim().split_once(['x', 'X']).unwrap_or((s.trim(), ""));
            NewSet {
                reps: reps_or_zero(reps),
                weight_kg: num_or_zero(weight),
            }
        })
        .collect();
    Ok((name.trim().to_string(), sets))
}

/// Parse an endurance entry spec: `"EXERCISE:KM/MIN[@HR]"`,
/// e.g. `"Outdoor Run:5km/25min@150"`. Unit suffixes are optional.
pub(crate) fn parse_run_spec(spec: &str) -> Result<(String, NewRunningLog)> {
    let Some((name, payload)) = spec.rsplit_once(':') else {
        bail!("Invalid run spec '{spec}'. Use 'EXERCISE:KM/MIN[@HR]' (e.g. 'Run:5km/25min@150')");
    };
    let (course, hr) = payload.split_once('@').unwrap_or((payload, ""));
    let Some((distance, time)) = course.split_once('/') else {
        bail!("Invalid run spec '{spec}'. Use 'EXERCISE:KM/MIN[@HR]' (e.g. 'Run:5km/25min@150')");
    };
    let distance_km = num_or_zero(distance.trim().trim_end_matches("km"));
    let time_minutes = num_or_zero(time.trim().trim_end_matches("min").trim_end_matches('m'));
    let avg_heart_rate = if hr.trim().is_empty() {
        None
    } else {
        Some(num_or_zero(hr))
    };
    Ok((
        name.trim().to_string(),
        NewRunningLog {
            distance_km,
            time_minutes,
            avg_heart_rate,
        },
    ))
}

/// Format a duration in minutes as `1h 5m 30s` (hours omitted when zero).
pub(crate) fn format_duration(minutes: f64) -> String {
    let h = (minutes / 60.0).floor() as u64;
    let m = (minutes % 60.0).floor() as u64;
    let s = ((minutes * 60.0) % 60.0).floor() as u64;
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else {
        format!("{m}m {s}s")
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

/// Shorten a uuid for table display.
pub(crate) fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
