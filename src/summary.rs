use serde::Serialize;

use crate::attendance::{attendance_summary, AttendanceBook, AttendanceSummary};
use crate::comparison::EventComparisonRow;
use crate::contacts::unread;
use crate::distribution::{is_internal, unique_members};
use crate::revenue::{total_revenue, Revenue};
use crate::types::{ContactMessage, Registration, StatisticRow, Status};
use crate::util::{format_int, format_number};

/// Headline figures for the admin dashboard and `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_registrations: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total_participants: usize,
    pub unique_participants: usize,
    pub internal_participants: usize,
    pub external_participants: usize,
    pub revenue: Revenue,
    pub attendance: AttendanceSummary,
    pub unread_messages: usize,
}

pub fn generate_summary(
    registrations: &[Registration],
    book: &AttendanceBook,
    messages: &[ContactMessage],
) -> DashboardSummary {
    let count = |status: Status| registrations.iter().filter(|r| r.status == status).count();
    let unique = unique_members(registrations);
    let internal = unique.iter().filter(|m| is_internal(m)).count();
    DashboardSummary {
        total_registrations: registrations.len(),
        pending: count(Status::Pending),
        approved: count(Status::Approved),
        rejected: count(Status::Rejected),
        total_participants: registrations.iter().map(|r| r.team_members.len()).sum(),
        unique_participants: unique.len(),
        internal_participants: internal,
        external_participants: unique.len() - internal,
        revenue: total_revenue(registrations).rounded(),
        attendance: attendance_summary(registrations, book),
        unread_messages: unread(messages).count(),
    }
}

/// `{Metric, Value}` rows for the statistics sheet.
pub fn statistics_sheet(
    summary: &DashboardSummary,
    events: &[EventComparisonRow],
) -> Vec<StatisticRow> {
    let stat = |metric: &str, value: String| StatisticRow {
        metric: metric.to_string(),
        value,
    };
    let mut rows = vec![
        stat("Total Registrations", format_int(summary.total_registrations)),
        stat("Approved", format_int(summary.approved)),
        stat("Pending", format_int(summary.pending)),
        stat("Rejected", format_int(summary.rejected)),
        stat("Total Participants", format_int(summary.total_participants)),
        stat("Unique Participants", format_int(summary.unique_participants)),
        stat("Internal Participants", format_int(summary.internal_participants)),
        stat("External Participants", format_int(summary.external_participants)),
        stat("Recognized Revenue", format_number(summary.revenue.recognized, 2)),
        stat("Potential Revenue", format_number(summary.revenue.potential, 2)),
        stat(
            "Attendance",
            format!(
                "{} / {} ({}%)",
                summary.attendance.total_attended,
                summary.attendance.total_approved,
                summary.attendance.attendance_percentage
            ),
        ),
    ];
    for e in events {
        rows.push(stat(
            &format!("{} Participants", e.title),
            format_int(e.participants),
        ));
    }
    rows
}
