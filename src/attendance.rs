// Attendance statistics.
//
// Cross-references approved team members against recorded check-ins. A
// member is present for an event when a record exists for that exact
// `(member id, event id)` pair. The registration desk is just another event
// id here; whether a venue check-in requires a desk check-in first is
// enforced by whoever records attendance, not by these numbers.
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tabled::Tabled;

use crate::events::{EventCatalog, REGISTRATION_DESK};
use crate::types::{AttendanceRecord, Registration, TeamMember};
use crate::util::{or_na, percentage};

/// Attendance records indexed by event id, then member id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceBook {
    by_event: BTreeMap<String, BTreeSet<String>>,
}

impl AttendanceBook {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        let mut book = AttendanceBook::default();
        for r in records {
            book.by_event
                .entry(r.event_id.clone())
                .or_default()
                .insert(r.team_member_id.clone());
        }
        book
    }

    pub fn is_present(&self, member_id: &str, event_id: &str) -> bool {
        self.by_event
            .get(event_id)
            .is_some_and(|members| members.contains(member_id))
    }

    /// Records across every event bucket, the desk included.
    pub fn total_records(&self) -> usize {
        self.by_event.values().map(BTreeSet::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total_approved: usize,
    pub total_attended: usize,
    pub attendance_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendance {
    #[tabled(rename = "Event")]
    pub event_id: String,
    #[tabled(rename = "Registered")]
    pub total_registered: usize,
    #[tabled(rename = "Present")]
    pub total_present: usize,
    #[tabled(rename = "Attendance %")]
    pub attendance_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct PresenceRow {
    #[tabled(rename = "Team ID")]
    pub team_id: String,
    #[tabled(rename = "Member ID")]
    pub member_id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Desk")]
    pub at_desk: bool,
    #[tabled(rename = "Venue")]
    pub at_event: bool,
}

fn approved(registrations: &[Registration]) -> impl Iterator<Item = &Registration> {
    registrations.iter().filter(|r| r.is_approved())
}

fn approved_members<'a>(
    registrations: &'a [Registration],
    event_id: Option<&'a str>,
) -> impl Iterator<Item = (&'a Registration, &'a TeamMember)> {
    approved(registrations)
        .filter(move |r| event_id.map_or(true, |e| r.selects(e)))
        .flat_map(|r| r.team_members.iter().map(move |m| (r, m)))
}

/// Overall figures. Non-approved registrations are ignored.
pub fn attendance_summary(
    registrations: &[Registration],
    book: &AttendanceBook,
) -> AttendanceSummary {
    let total_approved = approved_members(registrations, None).count();
    let total_attended = book.total_records();
    AttendanceSummary {
        total_approved,
        total_attended,
        attendance_percentage: percentage(total_attended, total_approved),
    }
}

fn event_row(
    registrations: &[Registration],
    book: &AttendanceBook,
    event_id: &str,
    scope: Option<&str>,
) -> EventAttendance {
    let mut total_registered = 0;
    let mut total_present = 0;
    for (_, m) in approved_members(registrations, scope) {
        total_registered += 1;
        if m.id.as_deref().is_some_and(|id| book.is_present(id, event_id)) {
            total_present += 1;
        }
    }
    EventAttendance {
        event_id: event_id.to_string(),
        total_registered,
        total_present,
        attendance_percentage: percentage(total_present, total_registered),
    }
}

/// The desk row first (every approved member is expected there), then one
/// row per catalog event over the members whose team selected it.
pub fn attendance_by_event(
    registrations: &[Registration],
    book: &AttendanceBook,
    catalog: &EventCatalog,
) -> Vec<EventAttendance> {
    let mut rows = vec![event_row(registrations, book, REGISTRATION_DESK, None)];
    for event in catalog.events() {
        rows.push(event_row(registrations, book, &event.id, Some(event.id.as_str())));
    }
    rows
}

/// The check-in table for one event: every approved member registered for
/// it, leaders first within each team. For the desk, every approved member.
pub fn member_presence(
    registrations: &[Registration],
    book: &AttendanceBook,
    event_id: &str,
) -> Vec<PresenceRow> {
    let scope = (event_id != REGISTRATION_DESK).then_some(event_id);
    approved_members(registrations, scope)
        .map(|(r, m)| {
            let id = m.id.as_deref();
            PresenceRow {
                team_id: or_na(r.team_id.as_deref()),
                member_id: or_na(id),
                name: or_na(m.name.as_deref()),
                at_desk: id.is_some_and(|id| book.is_present(id, REGISTRATION_DESK)),
                at_event: id.is_some_and(|id| book.is_present(id, event_id)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{member, registration};
    use crate::types::Status;

    fn mark(member: &str, event: &str) -> AttendanceRecord {
        AttendanceRecord {
            team_member_id: member.to_string(),
            event_id: event.to_string(),
            marked_at: Some("2026-10-16T09:00:00Z".to_string()),
            marked_by: Some("desk-admin".to_string()),
        }
    }

    fn sample() -> Vec<Registration> {
        vec![
            registration(
                "a",
                Status::Approved,
                500.0,
                &["code-quest"],
                vec![member("m1", "HITS", "1"), member("m2", "HITS", "1")],
            ),
            registration(
                "b",
                Status::Approved,
                300.0,
                &["tech-quiz"],
                vec![member("m3", "MIT", "2")],
            ),
            registration(
                "c",
                Status::Pending,
                300.0,
                &["code-quest"],
                vec![member("m4", "MIT", "2")],
            ),
        ]
    }

    #[test]
    fn empty_inputs_are_all_zero() {
        let summary = attendance_summary(&[], &AttendanceBook::default());
        assert_eq!(
            summary,
            AttendanceSummary {
                total_approved: 0,
                total_attended: 0,
                attendance_percentage: 0
            }
        );
        let rows = attendance_by_event(&[], &AttendanceBook::default(), EventCatalog::standard());
        assert!(rows.iter().all(|r| r.attendance_percentage == 0));
    }

    #[test]
    fn summary_counts_every_record() {
        let book = AttendanceBook::from_records(&[
            mark("m1", REGISTRATION_DESK),
            mark("m1", "code-quest"),
            mark("m3", REGISTRATION_DESK),
        ]);
        let summary = attendance_summary(&sample(), &book);
        assert_eq!(summary.total_approved, 3);
        assert_eq!(summary.total_attended, 3);
        assert_eq!(summary.attendance_percentage, 100);
    }

    #[test]
    fn per_event_presence_needs_the_matching_event_id() {
        let book = AttendanceBook::from_records(&[
            mark("m1", REGISTRATION_DESK),
            mark("m2", "code-quest"),
            mark("m3", "code-quest"),
            mark("m4", "code-quest"),
        ]);
        let rows = attendance_by_event(&sample(), &book, EventCatalog::standard());
        assert_eq!(rows[0].event_id, REGISTRATION_DESK);
        assert_eq!((rows[0].total_registered, rows[0].total_present), (3, 1));

        let code = rows.iter().find(|r| r.event_id == "code-quest").unwrap();
        // m3 is not on a code-quest team and m4 is not approved
        assert_eq!((code.total_registered, code.total_present), (2, 1));
        assert_eq!(code.attendance_percentage, 50);

        let quiz = rows.iter().find(|r| r.event_id == "tech-quiz").unwrap();
        assert_eq!((quiz.total_registered, quiz.total_present), (1, 0));
    }

    #[test]
    fn presence_table_flags_desk_and_venue() {
        let book = AttendanceBook::from_records(&[
            mark("m1", REGISTRATION_DESK),
            mark("m1", "code-quest"),
            mark("m2", REGISTRATION_DESK),
        ]);
        let rows = member_presence(&sample(), &book, "code-quest");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].at_desk && rows[0].at_event);
        assert!(rows[1].at_desk && !rows[1].at_event);

        let desk = member_presence(&sample(), &book, REGISTRATION_DESK);
        assert_eq!(desk.len(), 3);
    }
}
