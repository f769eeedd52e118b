// Record normalization.
//
// Turns whatever the backend returned into a `Registration` the
// aggregators can trust. Normalization never fails: missing or unusable
// values get a documented default.
//
// | field             | default                          |
// |-------------------|----------------------------------|
// | `selected_events` | empty                            |
// | `team_members`    | empty                            |
// | `total_amount`    | `0`                              |
// | `team_size`       | `0`                              |
// | `created_at`      | the normalization instant (ISO)  |
use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::{Lenient, RawRegistration, RawTeamMember, Registration, Status, TeamMember};

pub fn normalize(raw: &RawRegistration) -> Registration {
    normalize_at(raw, Utc::now())
}

/// Same as [`normalize`], with the clock supplied by the caller.
pub fn normalize_at(raw: &RawRegistration, now: DateTime<Utc>) -> Registration {
    let mut selected_events: Vec<String> = Vec::new();
    for event in raw.selected_events.iter().flatten() {
        let event = event.trim();
        if !event.is_empty() && !selected_events.iter().any(|e| e == event) {
            selected_events.push(event.to_string());
        }
    }

    let team_size = raw
        .team_size
        .as_ref()
        .and_then(Lenient::as_f64)
        .filter(|v| *v >= 0.0)
        .map(|v| v as u32)
        .unwrap_or(0);

    let total_amount = raw
        .total_amount
        .as_ref()
        .and_then(Lenient::as_f64)
        .unwrap_or(0.0);

    let created_at = clean(raw.created_at.as_deref())
        .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

    Registration {
        id: raw.id.as_ref().map(Lenient::to_text).unwrap_or_default(),
        team_id: clean(raw.team_id.as_deref()),
        selected_events,
        team_size,
        total_amount,
        status: raw
            .status
            .as_deref()
            .map(Status::parse)
            .unwrap_or(Status::Pending),
        created_at,
        transaction_id: clean(raw.transaction_id.as_deref()),
        payment_method: clean(raw.payment_method.as_deref()),
        payment_proof: clean(raw.payment_proof.as_deref()),
        team_members: raw
            .team_members
            .iter()
            .flatten()
            .map(normalize_member)
            .collect(),
    }
}

pub fn normalize_member(raw: &RawTeamMember) -> TeamMember {
    TeamMember {
        id: lenient_text(raw.id.as_ref()),
        name: clean(raw.name.as_deref()),
        email: clean(raw.email.as_deref()),
        phone: lenient_text(raw.phone.as_ref()),
        college: clean(raw.college.as_deref()),
        department: clean(raw.department.as_deref()),
        year: lenient_text(raw.year.as_ref()),
        player_id: clean(raw.player_id.as_deref()),
    }
}

/// Names of the defaulted fields that were absent or unusable on `raw`.
pub fn missing_fields(raw: &RawRegistration) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if raw.selected_events.is_none() {
        missing.push("selected_events");
    }
    if raw.team_members.is_none() {
        missing.push("team_members");
    }
    if raw.total_amount.as_ref().and_then(Lenient::as_f64).is_none() {
        missing.push("total_amount");
    }
    if raw.team_size.as_ref().and_then(Lenient::as_f64).is_none() {
        missing.push("team_size");
    }
    if clean(raw.created_at.as_deref()).is_none() {
        missing.push("created_at");
    }
    missing
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn lenient_text(value: Option<&Lenient>) -> Option<String> {
    value.map(Lenient::to_text).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap()
    }

    fn reparse(reg: &Registration) -> RawRegistration {
        serde_json::from_value(serde_json::to_value(reg).unwrap()).unwrap()
    }

    #[test]
    fn fills_defaults_for_empty_record() {
        let reg = normalize_at(&RawRegistration::default(), fixed_now());
        assert!(reg.selected_events.is_empty());
        assert!(reg.team_members.is_empty());
        assert_eq!(reg.total_amount, 0.0);
        assert_eq!(reg.team_size, 0);
        assert_eq!(reg.status, Status::Pending);
        assert_eq!(reg.created_at, "2026-10-16T08:30:00.000Z");
    }

    #[test]
    fn keeps_present_values() {
        let raw: RawRegistration = serde_json::from_str(
            r#"{
                "id": 42,
                "team_id": "HX-042",
                "selected_events": ["code-quest", " tech-quiz ", "code-quest", ""],
                "team_size": "2",
                "total_amount": "1,500",
                "status": "approved",
                "created_at": "2026-10-10T12:00:00Z",
                "team_members": [{"id": 7, "name": " Asha ", "year": 3}]
            }"#,
        )
        .unwrap();
        let reg = normalize_at(&raw, fixed_now());
        assert_eq!(reg.id, "42");
        assert_eq!(reg.team_id.as_deref(), Some("HX-042"));
        assert_eq!(reg.selected_events, vec!["code-quest", "tech-quiz"]);
        assert_eq!(reg.team_size, 2);
        assert_eq!(reg.total_amount, 1500.0);
        assert!(reg.is_approved());
        assert_eq!(reg.created_at, "2026-10-10T12:00:00Z");
        let member = &reg.team_members[0];
        assert_eq!(member.id.as_deref(), Some("7"));
        assert_eq!(member.name.as_deref(), Some("Asha"));
        assert_eq!(member.year.as_deref(), Some("3"));
        assert!(member.email.is_none());
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let raw: RawRegistration = serde_json::from_str(
            r#"{"id": "r9", "total_amount": "abc", "team_size": -3,
                "team_members": [{"id": "m1", "phone": 9876543210}]}"#,
        )
        .unwrap();
        let once = normalize_at(&raw, fixed_now());
        let later = fixed_now() + chrono::Duration::hours(5);
        let twice = normalize_at(&reparse(&once), later);
        assert_eq!(once, twice);
    }

    #[test]
    fn reports_missing_fields() {
        let raw: RawRegistration =
            serde_json::from_str(r#"{"selected_events": [], "total_amount": 100}"#).unwrap();
        assert_eq!(
            missing_fields(&raw),
            vec!["team_members", "team_size", "created_at"]
        );
    }
}
