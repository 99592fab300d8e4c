use std::fmt::Write as _;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use target_days_core::civil_date::CivilDate;
use target_days_core::form::{DayEntry, FormInput, Request};
use target_days_core::{MatchedDay, Weekday, WeekdaySelection};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "target-days",
    about = "Count selected weekdays in a date range and total their hours"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count target days and sum their hours
    Calculate {
        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, defaults to a week from today)
        #[arg(long)]
        end: Option<String>,

        /// Target days as NAME[=HOURS] (comma-separated, e.g. mon=2,wed=3)
        #[arg(short, long = "day", value_delimiter = ',', value_parser = parse_day_arg)]
        days: Vec<DayEntry>,

        /// Time zone used to decide what "today" is (IANA name, defaults to system local)
        #[arg(long)]
        tz: Option<String>,

        /// Reject ranges longer than this many days
        #[arg(long)]
        max_days: Option<u64>,

        /// List every counted date before the totals
        #[arg(long)]
        breakdown: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// `mon=2`, `wednesday=1.5`, or a bare `fri` (enabled, hours left empty).
fn parse_day_arg(s: &str) -> Result<DayEntry, String> {
    let (name, hours) = s.split_once('=').unwrap_or((s, ""));
    let weekday: Weekday = name.parse().map_err(|e| format!("{e}"))?;
    Ok(DayEntry::enabled(weekday, hours.trim()))
}

fn today(tz: Option<&str>) -> Result<CivilDate> {
    match tz {
        Some(name) => {
            let zone: chrono_tz::Tz = name
                .parse()
                .map_err(|e| anyhow!("unknown time zone {name}: {e}"))?;
            Ok(CivilDate::today_in(zone))
        }
        None => Ok(CivilDate::today()),
    }
}

/// Fill in defaulted dates the way the form pre-populates them.
fn build_form(
    start: Option<&str>,
    end: Option<&str>,
    days: &[DayEntry],
    max_days: Option<u64>,
    today: CivilDate,
) -> Result<FormInput> {
    let default_end = today
        .add_days(7)
        .context("default end date out of range")?;
    Ok(FormInput {
        start: start.map_or_else(|| today.to_string(), str::to_string),
        end: end.map_or_else(|| default_end.to_string(), str::to_string),
        days: days.to_vec(),
        max_days,
    })
}

#[derive(Serialize)]
struct Report<'a> {
    start: CivilDate,
    end: CivilDate,
    selection: &'a WeekdaySelection,
    total_days: u64,
    total_hours: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<Vec<MatchedDay>>,
}

fn render(request: &Request, format: OutputFormat, breakdown: bool) -> Result<String> {
    let result = request.aggregate()?;
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            if breakdown {
                for day in request.matching_days() {
                    writeln!(
                        out,
                        "{} {:<9} {}",
                        day.date,
                        day.date.weekday(),
                        day.hours.normalize()
                    )?;
                }
            }
            write!(out, "{result}")?;
            Ok(out)
        }
        OutputFormat::Json => {
            let report = Report {
                start: request.start,
                end: request.end,
                selection: &request.selection,
                total_days: result.total_days,
                total_hours: result.total_hours,
                days: breakdown.then(|| request.matching_days().collect()),
            };
            serde_json::to_string_pretty(&report).context("failed to serialize report")
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Calculate {
            start,
            end,
            days,
            tz,
            max_days,
            breakdown,
            format,
        } => {
            let today = today(tz.as_deref())?;
            let form = build_form(start.as_deref(), end.as_deref(), days, *max_days, today)?;
            let request = form.validate()?;
            info!(
                "Calculating {} day(s) from {} to {}",
                request.span_days(),
                request.start,
                request.end
            );
            println!("{}", render(&request, *format, *breakdown)?);
        }
    }

    Ok(())
}
