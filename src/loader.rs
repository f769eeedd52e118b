use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ReportError;
use crate::normalize::{missing_fields, normalize_at};
use crate::types::{AttendanceRecord, ContactMessage, RawRegistration, Registration};

/// A point-in-time export of the backend tables the reports read.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub registrations: Vec<Registration>,
    pub attendance: Vec<AttendanceRecord>,
    pub contact_messages: Vec<ContactMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_registrations: usize,
    pub defaulted_registrations: usize,
    pub team_members: usize,
    pub attendance_records: usize,
    pub contact_messages: usize,
    pub skipped_records: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSnapshot {
    registrations: Vec<Value>,
    attendance: Vec<Value>,
    contact_messages: Vec<Value>,
}

pub fn load_snapshot(path: &Path) -> Result<(Snapshot, LoadReport), ReportError> {
    let text = std::fs::read_to_string(path)?;
    parse_snapshot(&text, Utc::now())
}

/// Parse a snapshot document. Only a document that is not a JSON object
/// fails. A registration field of the wrong type is defaulted like a missing
/// one; entries that are not objects at all are skipped and counted.
pub fn parse_snapshot(
    text: &str,
    now: DateTime<Utc>,
) -> Result<(Snapshot, LoadReport), ReportError> {
    let raw: RawSnapshot = serde_json::from_str(text)?;
    let mut report = LoadReport::default();

    let mut registrations = Vec::with_capacity(raw.registrations.len());
    for raw_reg in entries::<RawRegistration>("registration", raw.registrations, &mut report) {
        let missing = missing_fields(&raw_reg);
        if !missing.is_empty() {
            debug!(?missing, "filled defaults for registration");
            report.defaulted_registrations += 1;
        }
        let reg = normalize_at(&raw_reg, now);
        report.team_members += reg.team_members.len();
        registrations.push(reg);
    }
    report.total_registrations = registrations.len();

    let attendance = entries::<AttendanceRecord>("attendance", raw.attendance, &mut report);
    report.attendance_records = attendance.len();

    let contact_messages =
        entries::<ContactMessage>("contact message", raw.contact_messages, &mut report);
    report.contact_messages = contact_messages.len();

    Ok((
        Snapshot {
            registrations,
            attendance,
            contact_messages,
        },
        report,
    ))
}

fn entries<T: DeserializeOwned>(kind: &str, values: Vec<Value>, report: &mut LoadReport) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(v) => out.push(v),
            Err(e) => {
                warn!(kind, index, error = %e, "skipping malformed record");
                report.skipped_records += 1;
            }
        }
    }
    out
}
