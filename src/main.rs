// Entry point: load a backend snapshot, preview the dashboard figures on the
// console and write every export sheet plus JSON summaries to disk.
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use event_report::attendance::{attendance_by_event, AttendanceBook, EventAttendance};
use event_report::cache::WorkbookCache;
use event_report::comparison::{
    build_event_comparison, sort_by_participants, EventComparisonRow,
};
use event_report::config::{Args, ReportConfig};
use event_report::distribution::{
    affiliation_distribution, event_distribution, status_distribution, with_percentages,
    year_distribution, Share,
};
use event_report::events::EventCatalog;
use event_report::export::{
    accounts_sheet, all_registrations_sheet, approved_participants_sheet, event_sheet,
    pending_sheet, SheetKind,
};
use event_report::loader::{load_snapshot, Snapshot};
use event_report::output::{preview_table, write_json, write_sheet};
use event_report::summary::{generate_summary, statistics_sheet};
use event_report::trends::{registration_trend, revenue_trend, CountPoint, RevenuePoint};
use event_report::util::{format_int, format_number};
use event_report::ReportError;

/// Chart series written to `analytics.json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Analytics {
    registration_trend: Vec<CountPoint>,
    revenue_trend: Vec<RevenuePoint>,
    event_distribution: Vec<Share>,
    affiliation_distribution: Vec<Share>,
    year_distribution: Vec<Share>,
    status_distribution: Vec<Share>,
    event_comparison: Vec<EventComparisonRow>,
    attendance_by_event: Vec<EventAttendance>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn build_analytics(
    snapshot: &Snapshot,
    config: &ReportConfig,
    catalog: &EventCatalog,
) -> Analytics {
    let regs = &snapshot.registrations;
    let book = AttendanceBook::from_records(&snapshot.attendance);
    let mut event_comparison = build_event_comparison(regs, catalog);
    sort_by_participants(&mut event_comparison);
    Analytics {
        registration_trend: registration_trend(regs, config.today, config.window_days),
        revenue_trend: revenue_trend(regs, config.today, config.window_days),
        event_distribution: with_percentages(&event_distribution(regs)),
        affiliation_distribution: with_percentages(&affiliation_distribution(regs)),
        year_distribution: with_percentages(&year_distribution(regs)),
        status_distribution: with_percentages(&status_distribution(regs)),
        event_comparison,
        attendance_by_event: attendance_by_event(regs, &book, catalog),
    }
}

fn preview(analytics: &Analytics, rows: usize) {
    let days = analytics.registration_trend.len();
    preview_table("Event Comparison (by participants)", &analytics.event_comparison, rows);
    preview_table("Registrations per Day", &analytics.registration_trend, days);
    preview_table("Revenue per Day", &analytics.revenue_trend, days);
    preview_table("Internal vs External", &analytics.affiliation_distribution, 2);
    preview_table("Year of Study", &analytics.year_distribution, 5);
    preview_table("Attendance", &analytics.attendance_by_event, rows);
}

fn write_sheets(
    snapshot: &Snapshot,
    config: &ReportConfig,
    catalog: &EventCatalog,
    analytics: &Analytics,
) -> Result<(), ReportError> {
    let regs = &snapshot.registrations;
    let dir = &config.out_dir;
    std::fs::create_dir_all(dir)?;
    let mut cache = WorkbookCache::new(config.cache_capacity, config.cache_ttl);
    let path = |kind: &SheetKind| dir.join(format!("{}.csv", kind.file_stem()));

    let kind = SheetKind::AllRegistrations;
    let rows = all_registrations_sheet(regs, catalog);
    write_sheet(&mut cache, &path(&kind), &kind.file_stem(), &rows)?;

    let kind = SheetKind::ApprovedParticipants;
    let rows = approved_participants_sheet(regs, catalog);
    write_sheet(&mut cache, &path(&kind), &kind.file_stem(), &rows)?;

    let kind = SheetKind::Pending;
    let rows = pending_sheet(regs, catalog);
    write_sheet(&mut cache, &path(&kind), &kind.file_stem(), &rows)?;

    let kind = SheetKind::Accounts;
    let rows = accounts_sheet(regs, catalog);
    write_sheet(&mut cache, &path(&kind), &kind.file_stem(), &rows)?;

    let event_ids: Vec<String> = if config.events.is_empty() {
        catalog.events().iter().map(|e| e.id.clone()).collect()
    } else {
        config.events.clone()
    };
    for id in event_ids {
        let rows = event_sheet(regs, catalog, &id);
        let kind = SheetKind::PerEvent(id);
        write_sheet(&mut cache, &path(&kind), &kind.file_stem(), &rows)?;
    }

    let book = AttendanceBook::from_records(&snapshot.attendance);
    let summary = generate_summary(regs, &book, &snapshot.contact_messages);
    let kind = SheetKind::StatisticsSummary;
    let stats = statistics_sheet(&summary, &analytics.event_comparison);
    write_sheet(&mut cache, &path(&kind), &kind.file_stem(), &stats)?;

    write_json(&dir.join("summary.json"), &summary)?;
    write_json(&dir.join("analytics.json"), analytics)?;

    println!("Summary Stats (summary.json):");
    println!(
        "{{\"recognized_revenue\": {}, \"potential_revenue\": {}, \"attendance\": \"{}%\"}}\n",
        format_number(summary.revenue.recognized, 2),
        format_number(summary.revenue.potential, 2),
        summary.attendance.attendance_percentage
    );
    Ok(())
}

fn run(config: ReportConfig) -> Result<(), ReportError> {
    let (snapshot, load_report) = load_snapshot(&config.snapshot)?;
    info!(?load_report, "snapshot loaded");
    println!(
        "Processing snapshot... ({} registrations, {} team members, {} attendance marks)",
        format_int(load_report.total_registrations),
        format_int(load_report.team_members),
        format_int(load_report.attendance_records)
    );
    if load_report.skipped_records > 0 {
        println!(
            "Note: {} records skipped due to malformed data.",
            format_int(load_report.skipped_records)
        );
    }
    if load_report.defaulted_registrations > 0 {
        println!(
            "Info: Filled defaults for {} registrations.",
            format_int(load_report.defaulted_registrations)
        );
    }
    println!();

    let catalog = EventCatalog::standard();
    let analytics = build_analytics(&snapshot, &config, catalog);
    preview(&analytics, config.preview_rows);
    write_sheets(&snapshot, &config, catalog, &analytics)?;
    println!("(Full sheets exported to {})", config.out_dir.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_json);
    let config = ReportConfig::from_args(args);
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "report generation failed");
            eprintln!("Failed to generate reports: {}", e);
            ExitCode::FAILURE
        }
    }
}
