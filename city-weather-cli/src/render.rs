//! Plain-text rendering of the city table and the weather view.

use city_weather_core::{CityLookup, CityRecord, WeatherSummary};
use unicode_width::UnicodeWidthStr;

const HEADERS: [&str; 4] = ["Name", "Country", "Timezone", "Population"];
const NA: &str = "n/a";

/// Render records as an aligned table with a header row.
pub fn city_table(rows: &[CityRecord]) -> String {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|city| {
            [
                city.name.clone(),
                city.country.clone().unwrap_or_else(|| NA.to_string()),
                city.timezone.clone().unwrap_or_else(|| NA.to_string()),
                group_thousands(city.population),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.width());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![
        table_row(&HEADERS.map(str::to_string), &widths),
        rule.join("-+-"),
    ];
    lines.extend(cells.iter().map(|row| table_row(row, &widths)));
    text(&lines)
}

fn table_row(row: &[String; 4], widths: &[usize; 4]) -> String {
    let last = row.len() - 1;
    let cells: Vec<String> = row
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            let pad = " ".repeat(width.saturating_sub(cell.width()));
            // Population is right-aligned.
            if i == last {
                format!("{pad}{cell}")
            } else {
                format!("{cell}{pad}")
            }
        })
        .collect();
    cells.join(" | ").trim_end().to_string()
}

/// One newline-terminated line per entry.
fn text(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// Heading plus table for the browse view.
pub fn browse_screen(lookup: &CityLookup) -> String {
    let rows = lookup.visible_rows();
    let count = rows.len();

    let heading = if lookup.is_searching() {
        format!("Search results for \"{}\" ({count})", lookup.query().trim())
    } else {
        match lookup.total_hits() {
            Some(total) => format!("Cities ({count} of {})", group_thousands(total)),
            None => format!("Cities ({count})"),
        }
    };

    let body = if rows.is_empty() {
        "No cities to show.\n".to_string()
    } else {
        city_table(rows)
    };
    format!("{heading}\n\n{body}")
}

/// Multi-line weather view.
pub fn weather_detail(summary: &WeatherSummary) -> String {
    let units = summary.units;
    let temp = |v: Option<f64>| match v {
        Some(v) => format!("{v:.1}{}", units.temperature_suffix()),
        None => NA.to_string(),
    };
    let time = |v: Option<chrono::DateTime<chrono::FixedOffset>>| match v {
        Some(t) => t.format("%H:%M").to_string(),
        None => NA.to_string(),
    };

    let condition = summary.condition.as_deref().unwrap_or(NA);
    let period = if summary.is_night() { "night" } else { "day" };
    let (min, max) = (temp(summary.temp_min), temp(summary.temp_max));
    let wind = summary
        .wind_speed
        .map(|w| format!("{w:.1} {}", units.speed_suffix()));

    text(&[
        summary.display_name(),
        format!("  {} | {condition} ({period})", temp(summary.temperature)),
        String::new(),
        format!("  Feels like   {}", temp(summary.feels_like)),
        format!("  Min / Max    {min} / {max}"),
        format!("  Humidity     {}", opt(summary.humidity_pct, "%")),
        format!("  Pressure     {}", opt(summary.pressure_hpa, " hPa")),
        format!("  Wind         {}", wind.as_deref().unwrap_or(NA)),
        format!("  Sunrise      {}", time(summary.sunrise)),
        format!("  Sunset       {}", time(summary.sunset)),
        format!("  Observed at  {}", time(summary.observation_time)),
    ])
}

fn opt(value: Option<u64>, suffix: &str) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v}{suffix}"))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
