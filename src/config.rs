use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;

use crate::trends::DEFAULT_WINDOW_DAYS;

#[derive(Parser, Debug)]
#[command(author, version, about = "Registration analytics and spreadsheet exports")]
pub struct Args {
    /// Backend snapshot to read (JSON).
    #[arg(long, env = "EVENT_REPORT_SNAPSHOT", default_value = "snapshot.json")]
    pub snapshot: PathBuf,

    /// Directory the CSV sheets and summary.json are written to.
    #[arg(long, env = "EVENT_REPORT_OUT_DIR", default_value = "reports")]
    pub out_dir: PathBuf,

    /// Trailing window for the daily trend charts.
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    pub window_days: u32,

    /// Last day of the trend window (YYYY-MM-DD); defaults to today in UTC.
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Rows shown per console preview table.
    #[arg(long, default_value_t = 3)]
    pub preview_rows: usize,

    /// Only write per-event sheets for these event ids.
    #[arg(long = "event")]
    pub events: Vec<String>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "EVENT_REPORT_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub snapshot: PathBuf,
    pub out_dir: PathBuf,
    pub window_days: u32,
    pub today: NaiveDate,
    pub preview_rows: usize,
    pub events: Vec<String>,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
}

impl ReportConfig {
    pub fn from_args(args: Args) -> Self {
        Self::from_args_at(args, Utc::now())
    }

    /// `today` falls back to the UTC date of `now`, the same clock that
    /// stamps registrations with no `created_at`.
    pub fn from_args_at(args: Args, now: DateTime<Utc>) -> Self {
        Self {
            snapshot: args.snapshot,
            out_dir: args.out_dir,
            window_days: args.window_days,
            today: args.today.unwrap_or_else(|| now.date_naive()),
            preview_rows: args.preview_rows,
            events: args.events,
            cache_capacity: 16,
            cache_ttl: Duration::from_secs(300),
        }
    }
}
