//! noc-report: command-line shell over the availability engine.
//!
//! Argument handling returns a [`CliOutput`] instead of printing, so every command can be
//! exercised in-process.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use noc_core::analytics::build_analytics_summary;
use noc_core::demo::seed_demo_incidents;
use noc_core::domain::{Incident, ValidationWarning};
use noc_core::ingest::{load_incidents_file, IngestConflict, IngestSummary};
use noc_core::normalize::interval::OngoingPolicy;
use noc_core::normalize::timestamps::{parse_date, parse_instant};
use noc_core::report::sectors::build_sector_report;
use noc_core::report::trend::{build_monthly_trend, MonthlyAvailability};
use noc_core::report::{build_availability_report, ReportOptions};
use noc_core::universe::EntityUniverse;
use noc_core::validate::{validate_all_incidents, IncidentValidationReportItem};
use noc_core::window::{ReportWindow, WindowSummary};

use crate::config::ReportConfig;

pub mod config;
pub mod logging;
pub mod render;

const DEMO_FROM: &str = "2026-01-01";
const DEMO_TO: &str = "2026-03-31";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CliOutput {
    fn success(stdout: String) -> Self {
        Self {
            stdout,
            stderr: String::new(),
            exit_code: 0,
        }
    }

    fn failure(exit_code: i32, stderr: String) -> Self {
        Self {
            stdout: String::new(),
            stderr,
            exit_code,
        }
    }
}

/// Bad invocation, as opposed to a failure while running a valid one. Exits with 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(String);

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

fn help_text() -> String {
    "\
noc-report computes availability and downtime reports from the NOC incident log.

Usage:
  noc-report <command> [flags]

Commands:
  availability  Per-entity availability, category roll-ups and top downtime
  sectors       Perfect-uptime / had-downtime split per business sector
  growth        Month-by-month availability of a category
  analytics     Incident counts and per-category availability
  validate      Explain which records contribute no downtime, and why
  demo          Availability report over the built-in demo dataset

Flags:
      --incidents FILE        Incident export (.json, otherwise CSV)
      --from DATE             Window start (YYYY-MM-DD or timestamp)
      --to DATE               Window end; a bare date includes that whole day
      --month YYYY-MM         Window covering one calendar month
      --category NAME         Restrict to one category
      --top N                 Length of the downtime ranking
      --search TEXT           Keep ranked entities whose id contains TEXT (any case)
      --ongoing-until TS      Count outages without an up time until TS
      --config FILE           Settings file (TOML, YAML or JSON)
      --format FORMAT         json (default) or markdown
      --log-level LEVEL       trace, debug, info, warn or error
  -h, --help                  Show this help
  -V, --version               Show the version
"
    .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Availability,
    Sectors,
    Growth,
    Analytics,
    Validate,
    Demo,
}

impl Command {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "availability" | "report" => Some(Command::Availability),
            "sectors" | "sector" => Some(Command::Sectors),
            "growth" | "trend" => Some(Command::Growth),
            "analytics" => Some(Command::Analytics),
            "validate" => Some(Command::Validate),
            "demo" => Some(Command::Demo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

#[derive(Debug, Default)]
struct CliArgs {
    incidents: Option<PathBuf>,
    from: Option<String>,
    to: Option<String>,
    month: Option<String>,
    category: Option<String>,
    top: Option<usize>,
    search: Option<String>,
    ongoing_until: Option<String>,
    config: Option<PathBuf>,
    format: OutputFormat,
    log_level: Option<String>,
}

impl CliArgs {
    fn parse(rest: &[&str]) -> Result<Self, UsageError> {
        let mut args = CliArgs::default();
        let mut iter = rest.iter();
        while let Some(raw) = iter.next() {
            let (flag, inline) = match raw.split_once('=') {
                Some((f, v)) if f.starts_with("--") => (f, Some(v.to_string())),
                _ => (*raw, None),
            };
            let mut value = || -> Result<String, UsageError> {
                match inline.clone() {
                    Some(v) => Ok(v),
                    None => iter
                        .next()
                        .map(|v| v.to_string())
                        .ok_or_else(|| UsageError::new(format!("flag {flag} needs a value"))),
                }
            };
            match flag {
                "--incidents" => args.incidents = Some(PathBuf::from(value()?)),
                "--from" => args.from = Some(value()?),
                "--to" => args.to = Some(value()?),
                "--month" => args.month = Some(value()?),
                "--category" => args.category = Some(value()?),
                "--top" => {
                    let raw = value()?;
                    let n = raw
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| UsageError::new(format!("invalid --top \"{raw}\"")))?;
                    args.top = Some(n);
                }
                "--search" => args.search = Some(value()?),
                "--ongoing-until" => args.ongoing_until = Some(value()?),
                "--config" => args.config = Some(PathBuf::from(value()?)),
                "--format" => {
                    args.format = match value()?.as_str() {
                        "json" => OutputFormat::Json,
                        "markdown" | "md" => OutputFormat::Markdown,
                        other => {
                            return Err(UsageError::new(format!("unknown format \"{other}\"")))
                        }
                    }
                }
                "--log-level" => args.log_level = Some(value()?),
                other => return Err(UsageError::new(format!("unknown flag \"{other}\""))),
            }
        }
        Ok(args)
    }

    fn window(&self, command: Command) -> anyhow::Result<ReportWindow> {
        if let Some(month) = &self.month {
            if self.from.is_some() || self.to.is_some() {
                return Err(UsageError::new("--month cannot be combined with --from/--to").into());
            }
            return Ok(ReportWindow::parse_month(month)?);
        }
        match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) => window_between(from, to),
            (None, None) if command == Command::Demo => {
                Ok(ReportWindow::from_dates(DEMO_FROM, DEMO_TO)?)
            }
            _ => Err(UsageError::new(
                "a report window is required: --month YYYY-MM or --from DATE --to DATE",
            )
            .into()),
        }
    }

    fn ongoing(&self) -> Result<OngoingPolicy, UsageError> {
        match self.ongoing_until.as_deref() {
            None => Ok(OngoingPolicy::Exclude),
            Some(raw) => parse_instant(raw)
                .map(OngoingPolicy::CountUntil)
                .ok_or_else(|| UsageError::new(format!("invalid --ongoing-until \"{raw}\""))),
        }
    }
}

/// Two bare dates cover whole days (end inclusive); anything else is taken literally.
fn window_between(from: &str, to: &str) -> anyhow::Result<ReportWindow> {
    if parse_date(from).is_some() && parse_date(to).is_some() {
        Ok(ReportWindow::from_dates(from, to)?)
    } else {
        Ok(ReportWindow::parse(from, to)?)
    }
}

/// Payload of the `growth` command.
#[derive(Debug, Clone, Serialize)]
pub struct TrendOutput {
    pub category: Option<String>,
    pub window: WindowSummary,
    pub months: Vec<MonthlyAvailability>,
}

/// Payload of the `validate` command.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutput {
    pub loaded: usize,
    pub skipped: usize,
    pub conflicts: Vec<IngestConflict>,
    pub ingest_warnings: Vec<ValidationWarning>,
    pub records: Vec<IncidentValidationReportItem>,
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    markdown: fn(&T) -> String,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(value).context("failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Markdown => Ok(markdown(value)),
    }
}

fn load_incidents(command: Command, path: Option<&Path>) -> anyhow::Result<IngestSummary> {
    let summary = match (command, path) {
        (Command::Demo, _) => seed_demo_incidents()?,
        (_, Some(path)) => load_incidents_file(path)
            .with_context(|| format!("failed to load incidents from {}", path.display()))?,
        (_, None) => return Err(UsageError::new("--incidents FILE is required").into()),
    };
    for w in &summary.warnings {
        tracing::warn!(
            code = %w.code,
            details = w.details.as_deref().unwrap_or(""),
            "{}",
            w.message
        );
    }
    Ok(summary)
}

/// Inputs shared by every windowed report.
struct ReportContext {
    window: ReportWindow,
    universe: EntityUniverse,
    options: ReportOptions,
}

impl ReportContext {
    fn new(
        command: Command,
        args: &CliArgs,
        config: &ReportConfig,
        incidents: &[Incident],
    ) -> anyhow::Result<Self> {
        let window = args.window(command)?;
        let universe = config.universe(incidents);
        let options = ReportOptions {
            category: args.category.clone(),
            top_n: args.top.unwrap_or(config.top_n),
            ongoing: args.ongoing()?,
            entity_filter: args.search.clone(),
        };
        tracing::debug!(
            ?command,
            records = incidents.len(),
            entities = universe.len(),
            window_minutes = window.minutes(),
            "running report"
        );
        Ok(Self {
            window,
            universe,
            options,
        })
    }
}

fn run_command(command: Command, rest: &[&str]) -> anyhow::Result<String> {
    let args = CliArgs::parse(rest)?;
    let config = ReportConfig::load(args.config.as_deref())?;
    logging::init(args.log_level.as_deref().unwrap_or(config.log_level.as_str()))?;

    let summary = load_incidents(command, args.incidents.as_deref())?;
    let incidents = summary.incidents.as_slice();

    match command {
        Command::Validate => {
            let output = ValidationOutput {
                loaded: incidents.len(),
                skipped: summary.skipped,
                conflicts: summary.conflicts.clone(),
                ingest_warnings: summary.warnings.clone(),
                records: validate_all_incidents(incidents),
            };
            emit(args.format, &output, render::validation_markdown)
        }
        Command::Availability | Command::Demo => {
            let ctx = ReportContext::new(command, &args, &config, incidents)?;
            let report =
                build_availability_report(incidents, &ctx.window, &ctx.universe, &ctx.options);
            emit(args.format, &report, render::availability_markdown)
        }
        Command::Sectors => {
            let ctx = ReportContext::new(command, &args, &config, incidents)?;
            let category = args
                .category
                .clone()
                .unwrap_or_else(|| config.sector_category.clone());
            let report = build_sector_report(
                incidents,
                &ctx.window,
                &ctx.universe,
                &category,
                &ctx.options,
            );
            emit(args.format, &report, render::sectors_markdown)
        }
        Command::Growth => {
            let ctx = ReportContext::new(command, &args, &config, incidents)?;
            let trend = TrendOutput {
                category: args.category.clone(),
                window: ctx.window.summary(),
                months: build_monthly_trend(
                    incidents,
                    &ctx.window,
                    args.category.as_deref(),
                    ctx.options.ongoing,
                ),
            };
            emit(args.format, &trend, render::growth_markdown)
        }
        Command::Analytics => {
            let ctx = ReportContext::new(command, &args, &config, incidents)?;
            let summary =
                build_analytics_summary(incidents, &ctx.window, &ctx.universe, &ctx.options);
            emit(args.format, &summary, render::analytics_markdown)
        }
    }
}

pub fn run_cli_for_test(args: &[&str]) -> CliOutput {
    let Some((cmd, rest)) = args.split_first() else {
        return CliOutput::success(help_text());
    };

    let command = match *cmd {
        "-h" | "--help" | "help" => return CliOutput::success(help_text()),
        "-V" | "--version" => {
            return CliOutput::success(format!("noc-report {}\n", env!("CARGO_PKG_VERSION")))
        }
        other => match Command::parse(other) {
            Some(command) => command,
            None => {
                return CliOutput::failure(
                    2,
                    format!(
                        "Error: unknown command \"{other}\"\n\
                         Run 'noc-report --help' for usage.\n"
                    ),
                )
            }
        },
    };

    if rest.iter().any(|a| *a == "-h" || *a == "--help") {
        return CliOutput::success(help_text());
    }

    match run_command(command, rest) {
        Ok(stdout) => CliOutput::success(stdout),
        Err(err) => {
            let exit_code = if err.downcast_ref::<UsageError>().is_some() { 2 } else { 1 };
            CliOutput::failure(exit_code, format!("Error: {err:#}\n"))
        }
    }
}

pub fn run_cli(args: &[String]) -> CliOutput {
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    run_cli_for_test(&refs)
}
