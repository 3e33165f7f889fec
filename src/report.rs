use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use crate::domain::JourneyReport;
use crate::validation::UNKNOWN_FIELD;

pub fn generate_console_report(out: &mut dyn Write, report: &JourneyReport) -> Result<()> {
    writeln!(out, "{}", "📋 Booking Journey Report".bright_cyan().bold())?;
    writeln!(out, "{}", "=".repeat(40).cyan())?;
    writeln!(out, "Scenario: {}", report.scenario_name)?;
    writeln!(out, "Attempts: {}", report.attempts)?;
    writeln!(out, "Duration: {:?}", report.duration)?;
    writeln!(out)?;

    writeln!(out, "{}", "🔎 Search".bright_yellow().bold())?;
    let c = &report.criteria;
    writeln!(
        out,
        "  {} -> {} departing {} for {} nights",
        c.departure_airport, c.destination, c.departure_date, c.duration
    )?;
    if c.children > 0 {
        writeln!(
            out,
            "  {} adults, {} children (first child age {})",
            c.adults, c.children, c.child_age
        )?;
    } else {
        writeln!(out, "  {} adults", c.adults)?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "🏨 Hotel".bright_yellow().bold())?;
    let h = &report.hotel;
    writeln!(
        out,
        "  {} ({}, {}, rated {}) at result index {}",
        h.name, h.price, h.board_type, h.rating, h.index
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "🧾 Passenger validation".bright_yellow().bold())?;
    let v = &report.validation;
    if v.alert_visible {
        writeln!(out, "  {} alert: {}", "✅".green(), v.alert_message)?;
    } else {
        writeln!(out, "  {} no validation alert appeared", "❌".red())?;
    }
    for error in &v.field_errors {
        writeln!(out, "  - {}: {}", error.field_id, error.message)?;
    }
    let unknown = v
        .field_errors
        .iter()
        .filter(|e| e.field_id == UNKNOWN_FIELD)
        .count();
    if unknown > 0 {
        writeln!(out, "  ({unknown} unclassified error(s) ignored)")?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &JourneyReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &JourneyReport) -> Result<()> {
    writeln!(out, "# Booking Journey Report")?;
    writeln!(out)?;
    writeln!(out, "- **Scenario:** {}", report.scenario_name)?;
    writeln!(out, "- **Attempts:** {}", report.attempts)?;
    writeln!(out, "- **Duration:** {:?}", report.duration)?;
    writeln!(out)?;

    writeln!(out, "## Search criteria")?;
    writeln!(out)?;
    let c = &report.criteria;
    writeln!(out, "| Field | Value |")?;
    writeln!(out, "|---|---|")?;
    writeln!(out, "| Departure airport | {} |", c.departure_airport)?;
    writeln!(out, "| Destination | {} |", c.destination)?;
    writeln!(out, "| Departure date | {} |", c.departure_date)?;
    writeln!(out, "| Nights | {} |", c.duration)?;
    writeln!(out, "| Adults | {} |", c.adults)?;
    writeln!(out, "| Children | {} |", c.children)?;
    if c.children > 0 {
        writeln!(out, "| First child age | {} |", c.child_age)?;
    }
    writeln!(out)?;

    writeln!(out, "## Hotel")?;
    writeln!(out)?;
    let h = &report.hotel;
    writeln!(
        out,
        "**{}** ({}, {}, rated {}), result index {}.",
        h.name, h.price, h.board_type, h.rating, h.index
    )?;
    writeln!(out)?;

    writeln!(out, "## Passenger validation")?;
    writeln!(out)?;
    let v = &report.validation;
    if v.alert_visible {
        writeln!(out, "Alert shown: {}", v.alert_message)?;
    } else {
        writeln!(out, "No validation alert appeared.")?;
    }
    writeln!(out)?;
    for error in &v.field_errors {
        writeln!(out, "- `{}`: {}", error.field_id, error.message)?;
    }
    Ok(())
}
