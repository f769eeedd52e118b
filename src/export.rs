// Flat, spreadsheet-ready rows built from normalized registrations.
//
// Every sheet uses a single row struct, so the column set and order are
// identical for every row. Missing values are written as "N/A". A
// registration that cannot be formatted becomes one diagnostic row instead
// of aborting the whole export.
use tracing::debug;

use crate::error::{or_fallback, ReportError};
use crate::events::EventCatalog;
use crate::types::{AccountsRow, Registration, RegistrationRow, Status, TeamMember};
use crate::util::{format_date, or_na, parse_timestamp, NOT_AVAILABLE};

pub const ERROR_MARKER: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetKind {
    AllRegistrations,
    ApprovedParticipants,
    Pending,
    Accounts,
    PerEvent(String),
    StatisticsSummary,
}

impl SheetKind {
    pub fn file_stem(&self) -> String {
        match self {
            SheetKind::AllRegistrations => "all_registrations".to_string(),
            SheetKind::ApprovedParticipants => "approved_participants".to_string(),
            SheetKind::Pending => "pending_registrations".to_string(),
            SheetKind::Accounts => "accounts".to_string(),
            SheetKind::PerEvent(id) => format!("event_{}", id.replace('-', "_")),
            SheetKind::StatisticsSummary => "statistics_summary".to_string(),
        }
    }
}

pub fn member_type(index: usize) -> String {
    if index == 0 {
        "Leader".to_string()
    } else {
        format!("Member {}", index)
    }
}

fn amount_label(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn registered_on(registration: &Registration) -> Result<String, ReportError> {
    let raw = registration.created_at.trim();
    if raw.is_empty() {
        return Ok(NOT_AVAILABLE.to_string());
    }
    parse_timestamp(raw)
        .map(format_date)
        .ok_or_else(|| ReportError::InvalidTimestamp {
            registration_id: registration.id.clone(),
            value: raw.to_string(),
        })
}

fn check_amount(registration: &Registration) -> Result<(), ReportError> {
    if registration.total_amount < 0.0 {
        return Err(ReportError::MalformedRecord {
            registration_id: registration.id.clone(),
            reason: format!("negative total amount {}", registration.total_amount),
        });
    }
    Ok(())
}

fn try_rows(
    registration: &Registration,
    catalog: &EventCatalog,
) -> Result<Vec<RegistrationRow>, ReportError> {
    check_amount(registration)?;
    let registered_on = registered_on(registration)?;
    let events = catalog.titles(&registration.selected_events);
    let row = |member_type: String, member: Option<&TeamMember>| RegistrationRow {
        team_id: or_na(registration.team_id.as_deref()),
        registration_id: or_na(Some(registration.id.as_str())),
        member_type,
        name: or_na(member.and_then(|m| m.name.as_deref())),
        email: or_na(member.and_then(|m| m.email.as_deref())),
        phone: or_na(member.and_then(|m| m.phone.as_deref())),
        college: or_na(member.and_then(|m| m.college.as_deref())),
        department: or_na(member.and_then(|m| m.department.as_deref())),
        year: or_na(member.and_then(|m| m.year.as_deref())),
        events: or_na(Some(events.as_str())),
        total_amount: amount_label(registration.total_amount),
        status: registration.status.as_str().to_string(),
        registered_on: registered_on.clone(),
    };

    if registration.team_members.is_empty() {
        return Ok(vec![row(NOT_AVAILABLE.to_string(), None)]);
    }
    Ok(registration
        .team_members
        .iter()
        .enumerate()
        .map(|(i, m)| row(member_type(i), Some(m)))
        .collect())
}

/// Placeholder row for a registration that could not be formatted.
pub fn diagnostic_row(registration: &Registration) -> RegistrationRow {
    let err = || ERROR_MARKER.to_string();
    RegistrationRow {
        team_id: or_na(registration.team_id.as_deref()),
        registration_id: or_na(Some(registration.id.as_str())),
        member_type: err(),
        name: err(),
        email: err(),
        phone: err(),
        college: err(),
        department: err(),
        year: err(),
        events: err(),
        total_amount: err(),
        status: err(),
        registered_on: err(),
    }
}

/// One row per team member, leader first; exactly one row when the team
/// list is empty; a single diagnostic row if formatting fails.
pub fn to_rows(registration: &Registration, catalog: &EventCatalog) -> Vec<RegistrationRow> {
    or_fallback(
        "registration export",
        try_rows(registration, catalog),
        |_| vec![diagnostic_row(registration)],
    )
}

/// Rows for every registration accepted by `keep`, in input order.
pub fn registration_sheet(
    registrations: &[Registration],
    catalog: &EventCatalog,
    keep: impl Fn(&Registration) -> bool,
) -> Vec<RegistrationRow> {
    let rows: Vec<RegistrationRow> = registrations
        .iter()
        .filter(|r| keep(*r))
        .flat_map(|r| to_rows(r, catalog))
        .collect();
    debug!(rows = rows.len(), "built registration sheet");
    rows
}

pub fn all_registrations_sheet(
    registrations: &[Registration],
    catalog: &EventCatalog,
) -> Vec<RegistrationRow> {
    registration_sheet(registrations, catalog, |_| true)
}

pub fn approved_participants_sheet(
    registrations: &[Registration],
    catalog: &EventCatalog,
) -> Vec<RegistrationRow> {
    registration_sheet(registrations, catalog, Registration::is_approved)
}

pub fn pending_sheet(
    registrations: &[Registration],
    catalog: &EventCatalog,
) -> Vec<RegistrationRow> {
    registration_sheet(registrations, catalog, |r| r.status == Status::Pending)
}

pub fn event_sheet(
    registrations: &[Registration],
    catalog: &EventCatalog,
    event_id: &str,
) -> Vec<RegistrationRow> {
    registration_sheet(registrations, catalog, |r| r.selects(event_id))
}

fn try_accounts_row(
    registration: &Registration,
    catalog: &EventCatalog,
) -> Result<AccountsRow, ReportError> {
    check_amount(registration)?;
    let leader = registration.leader();
    Ok(AccountsRow {
        team_id: or_na(registration.team_id.as_deref()),
        registration_id: or_na(Some(registration.id.as_str())),
        leader_name: or_na(leader.and_then(|m| m.name.as_deref())),
        leader_email: or_na(leader.and_then(|m| m.email.as_deref())),
        team_size: registration.team_size.to_string(),
        events: or_na(Some(catalog.titles(&registration.selected_events).as_str())),
        total_amount: amount_label(registration.total_amount),
        transaction_id: or_na(registration.transaction_id.as_deref()),
        payment_method: or_na(registration.payment_method.as_deref()),
        payment_proof: or_na(registration.payment_proof.as_deref()),
        status: registration.status.as_str().to_string(),
        registered_on: registered_on(registration)?,
    })
}

fn accounts_diagnostic_row(registration: &Registration) -> AccountsRow {
    let err = || ERROR_MARKER.to_string();
    AccountsRow {
        team_id: or_na(registration.team_id.as_deref()),
        registration_id: or_na(Some(registration.id.as_str())),
        leader_name: err(),
        leader_email: err(),
        team_size: err(),
        events: err(),
        total_amount: err(),
        transaction_id: err(),
        payment_method: err(),
        payment_proof: err(),
        status: err(),
        registered_on: err(),
    }
}

/// One payment-oriented row per registration.
pub fn accounts_sheet(registrations: &[Registration], catalog: &EventCatalog) -> Vec<AccountsRow> {
    registrations
        .iter()
        .map(|r| {
            or_fallback("accounts export", try_accounts_row(r, catalog), |_| {
                accounts_diagnostic_row(r)
            })
        })
        .collect()
}
