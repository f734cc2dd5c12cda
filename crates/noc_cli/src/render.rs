//! Markdown renderings of the report payloads.
//!
//! Output is a pure function of the payload, so it is as deterministic as the payload itself.

use noc_core::analytics::AnalyticsSummary;
use noc_core::availability::format_percent;
use noc_core::domain::ValidationWarning;
use noc_core::report::sectors::SectorReport;
use noc_core::report::{AvailabilityReport, DowntimeRank};
use noc_core::window::WindowSummary;

use crate::{TrendOutput, ValidationOutput};

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn minutes(m: f64) -> String {
    format!("{m:.0}")
}

fn window_line(window: &WindowSummary) -> String {
    format!(
        "Window: **{}** to **{}** ({} minutes)\n\n",
        window.start,
        window.end,
        minutes(window.minutes)
    )
}

fn ranking_section(out: &mut String, ranking: &[DowntimeRank]) {
    out.push_str("## Top downtime\n\n");
    if ranking.is_empty() {
        out.push_str("No downtime recorded in this window.\n\n");
        return;
    }
    for r in ranking {
        out.push_str(&format!(
            "{}. {} ({}): {} min, {}%\n",
            r.rank,
            r.entity_id,
            r.category,
            minutes(r.total_downtime_minutes),
            format_percent(r.availability_percent)
        ));
    }
    out.push('\n');
}

fn warnings_section(out: &mut String, warnings: &[ValidationWarning]) {
    if warnings.is_empty() {
        return;
    }
    out.push_str("## Warnings\n\n");
    for w in warnings {
        match &w.details {
            Some(d) => out.push_str(&format!("- {}: {} ({d})\n", w.code, w.message)),
            None => out.push_str(&format!("- {}: {}\n", w.code, w.message)),
        }
    }
    out.push('\n');
}

pub fn availability_markdown(report: &AvailabilityReport) -> String {
    let mut out = String::new();
    out.push_str("# Availability Report\n\n");
    out.push_str(&window_line(&report.window));

    out.push_str("## Categories\n\n");
    out.push_str(
        "| Category | Entities | Perfect uptime | Had downtime \
         | Planned (min) | Unplanned (min) |\n",
    );
    out.push_str("|---|---:|---:|---:|---:|---:|\n");
    for c in &report.categories {
        out.push_str(&format!(
            "| {} | {} | {} ({}%) | {} ({}%) | {} | {} |\n",
            cell(&c.category),
            c.total_entities,
            c.perfect_uptime_count,
            format_percent(c.perfect_uptime_percent),
            c.has_downtime_count,
            format_percent(c.has_downtime_percent),
            minutes(c.planned_downtime_minutes),
            minutes(c.unplanned_downtime_minutes)
        ));
    }
    out.push('\n');

    out.push_str("## Entities\n\n");
    out.push_str(
        "| Category | Entity | Availability % | Planned (min) | Unplanned (min) | Incidents \
         | Remarks |\n",
    );
    out.push_str("|---|---|---:|---:|---:|---:|---|\n");
    for e in &report.entities {
        let remarks: Vec<String> = e.remarks.iter().map(|r| cell(r)).collect();
        out.push_str(&format!(
            "| {} | {}{} | {} | {} | {} | {} | {} |\n",
            cell(&e.category),
            cell(&e.entity_id),
            if e.recognized { "" } else { " (unrecognized)" },
            e.availability_display,
            minutes(e.planned_downtime_minutes),
            minutes(e.unplanned_downtime_minutes),
            e.incident_count,
            remarks.join("<br>")
        ));
    }
    out.push('\n');

    ranking_section(&mut out, &report.top_downtime);
    warnings_section(&mut out, &report.warnings);
    out
}

pub fn sectors_markdown(report: &SectorReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Sector Summary: {}\n\n", report.category));
    out.push_str(&window_line(&report.window));

    out.push_str("| Sector | Entities | Perfect uptime | Had downtime |\n");
    out.push_str("|---|---:|---:|---:|\n");
    for s in &report.sectors {
        out.push_str(&format!(
            "| {} | {} | {} ({}%) | {} ({}%) |\n",
            s.label,
            s.total_entities,
            s.perfect_uptime_count,
            format_percent(s.perfect_uptime_percent),
            s.has_downtime_count,
            format_percent(s.has_downtime_percent)
        ));
    }
    out.push('\n');

    for s in report.sectors.iter().filter(|s| !s.has_downtime.is_empty()) {
        out.push_str(&format!("## {}\n\n", s.label));
        for e in &s.has_downtime {
            out.push_str(&format!(
                "- {}: {}% ({} min)\n",
                e.entity_id,
                e.availability_display,
                minutes(e.total_downtime_minutes)
            ));
        }
        out.push('\n');
    }

    warnings_section(&mut out, &report.warnings);
    out
}

pub fn growth_markdown(trend: &TrendOutput) -> String {
    let mut out = String::new();
    match &trend.category {
        Some(c) => out.push_str(&format!("# Availability Growth: {c}\n\n")),
        None => out.push_str("# Availability Growth\n\n"),
    }
    out.push_str(&window_line(&trend.window));
    out.push_str("| Month | Availability % | Downtime (min) | Incidents |\n");
    out.push_str("|---|---:|---:|---:|\n");
    for m in &trend.months {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            m.label,
            m.availability_display,
            minutes(m.downtime_minutes),
            m.incident_count
        ));
    }
    out
}

pub fn analytics_markdown(summary: &AnalyticsSummary) -> String {
    let mut out = String::new();
    out.push_str("# Analytics\n\n");
    out.push_str(&window_line(&summary.window));
    out.push_str(&format!(
        "- Incidents in window: **{}** ({} planned, {} unplanned)\n\n",
        summary.total_incidents, summary.planned_incidents, summary.unplanned_incidents
    ));

    out.push_str("| Category | Availability % | Downtime (min) | Planned | Unplanned |\n");
    out.push_str("|---|---:|---:|---:|---:|\n");
    for c in &summary.categories {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cell(&c.category),
            c.availability_display,
            minutes(c.downtime_minutes),
            c.planned_incidents,
            c.unplanned_incidents
        ));
    }
    out.push('\n');

    ranking_section(&mut out, &summary.top_downtime);
    out
}

pub fn validation_markdown(output: &ValidationOutput) -> String {
    let mut out = String::new();
    out.push_str("# Incident Validation\n\n");
    out.push_str(&format!(
        "Records loaded: **{}**, skipped: **{}**\n\n",
        output.loaded, output.skipped
    ));

    if !output.conflicts.is_empty() {
        out.push_str("## Skipped rows\n\n");
        for c in &output.conflicts {
            let id = c.id.map(|id| format!(" id={id}")).unwrap_or_default();
            out.push_str(&format!("- row {}{id}: {}\n", c.row, c.reason));
        }
        out.push('\n');
    }

    warnings_section(&mut out, &output.ingest_warnings);

    out.push_str("## Records\n\n");
    if output.records.is_empty() {
        out.push_str("Every record yields a usable outage interval.\n");
        return out;
    }
    for item in &output.records {
        let id = item.id.map(|id| format!("#{id} ")).unwrap_or_default();
        let codes: Vec<&str> = item.warnings.iter().map(|w| w.code.as_str()).collect();
        out.push_str(&format!(
            "- {id}{} / {}: {}\n",
            item.category,
            item.entity_id,
            codes.join(", ")
        ));
    }
    out
}
