use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tabled::Tabled;

use crate::util::parse_f64_safe;

/// A scalar the backend may send either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Lenient {
    Number(f64),
    Text(String),
}

impl Lenient {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Lenient::Number(n) if n.is_finite() => Some(*n),
            Lenient::Number(_) => None,
            Lenient::Text(s) => parse_f64_safe(Some(s)),
        }
    }

    /// Textual form; whole numbers drop their fractional part (`2.0` -> `"2"`).
    pub fn to_text(&self) -> String {
        match self {
            Lenient::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{:.0}", n),
            Lenient::Number(n) => n.to_string(),
            Lenient::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Approved,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::Approved, Status::Rejected];

    /// Unknown or missing values are treated as `pending`.
    pub fn parse(s: &str) -> Status {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => Status::Approved,
            "rejected" => Status::Rejected,
            _ => Status::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        }
    }
}

/// A field value of the wrong JSON type reads as absent.
fn none_on_mismatch<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A list whose unusable elements read as `T::default()`. Anything other
/// than an array reads as absent.
fn list_with_defaults<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
    ))
}

/// A team member exactly as the backend returned it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawTeamMember {
    #[serde(deserialize_with = "none_on_mismatch")]
    pub id: Option<Lenient>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub name: Option<String>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub email: Option<String>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub phone: Option<Lenient>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub college: Option<String>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub department: Option<String>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub year: Option<Lenient>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub player_id: Option<String>,
}

/// A registration exactly as the backend returned it. Any field may be
/// absent or of the wrong type; both cases read as `None`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawRegistration {
    #[serde(deserialize_with = "none_on_mismatch")]
    pub id: Option<Lenient>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub team_id: Option<String>,
    #[serde(deserialize_with = "list_with_defaults")]
    pub selected_events: Option<Vec<String>>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub team_size: Option<Lenient>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub total_amount: Option<Lenient>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub status: Option<String>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub transaction_id: Option<String>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub payment_method: Option<String>,
    #[serde(deserialize_with = "none_on_mismatch")]
    pub payment_proof: Option<String>,
    #[serde(deserialize_with = "list_with_defaults")]
    pub team_members: Option<Vec<RawTeamMember>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamMember {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub player_id: Option<String>,
}

/// A normalized registration. Produced only by [`crate::normalize`].
///
/// `team_size` is what the team declared; iteration always goes over
/// `team_members`, and the two are allowed to disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub id: String,
    pub team_id: Option<String>,
    pub selected_events: Vec<String>,
    pub team_size: u32,
    pub total_amount: f64,
    pub status: Status,
    pub created_at: String,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub payment_proof: Option<String>,
    pub team_members: Vec<TeamMember>,
}

impl Registration {
    pub fn is_approved(&self) -> bool {
        self.status == Status::Approved
    }

    pub fn selects(&self, event_id: &str) -> bool {
        self.selected_events.iter().any(|e| e == event_id)
    }

    pub fn leader(&self) -> Option<&TeamMember> {
        self.team_members.first()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AttendanceRecord {
    pub team_member_id: String,
    pub event_id: String,
    #[serde(default)]
    pub marked_at: Option<String>,
    #[serde(default)]
    pub marked_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One member-level row of a registration export sheet.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RegistrationRow {
    #[serde(rename = "Team ID")]
    #[tabled(rename = "Team ID")]
    pub team_id: String,
    #[serde(rename = "Registration ID")]
    #[tabled(rename = "Registration ID")]
    pub registration_id: String,
    #[serde(rename = "Member Type")]
    #[tabled(rename = "Member Type")]
    pub member_type: String,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    #[tabled(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    #[tabled(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "College")]
    #[tabled(rename = "College")]
    pub college: String,
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: String,
    #[serde(rename = "Events")]
    #[tabled(rename = "Events")]
    pub events: String,
    #[serde(rename = "Total Amount")]
    #[tabled(rename = "Total Amount")]
    pub total_amount: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "Registered On")]
    #[tabled(rename = "Registered On")]
    pub registered_on: String,
}

/// One registration-level row of the accounts sheet.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct AccountsRow {
    #[serde(rename = "Team ID")]
    #[tabled(rename = "Team ID")]
    pub team_id: String,
    #[serde(rename = "Registration ID")]
    #[tabled(rename = "Registration ID")]
    pub registration_id: String,
    #[serde(rename = "Leader Name")]
    #[tabled(rename = "Leader Name")]
    pub leader_name: String,
    #[serde(rename = "Leader Email")]
    #[tabled(rename = "Leader Email")]
    pub leader_email: String,
    #[serde(rename = "Team Size")]
    #[tabled(rename = "Team Size")]
    pub team_size: String,
    #[serde(rename = "Events")]
    #[tabled(rename = "Events")]
    pub events: String,
    #[serde(rename = "Total Amount")]
    #[tabled(rename = "Total Amount")]
    pub total_amount: String,
    #[serde(rename = "Transaction ID")]
    #[tabled(rename = "Transaction ID")]
    pub transaction_id: String,
    #[serde(rename = "Payment Method")]
    #[tabled(rename = "Payment Method")]
    pub payment_method: String,
    #[serde(rename = "Payment Proof")]
    #[tabled(rename = "Payment Proof")]
    pub payment_proof: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "Registered On")]
    #[tabled(rename = "Registered On")]
    pub registered_on: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct StatisticRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_accepts_numbers_and_strings() {
        let n: Lenient = serde_json::from_str("1500").unwrap();
        let s: Lenient = serde_json::from_str("\"1,500\"").unwrap();
        assert_eq!(n.as_f64(), Some(1500.0));
        assert_eq!(s.as_f64(), Some(1500.0));
        assert_eq!(n.to_text(), "1500");
        assert_eq!(Lenient::Text(" 3 ".into()).to_text(), "3");
    }

    #[test]
    fn status_parse_defaults_to_pending() {
        assert_eq!(Status::parse("APPROVED"), Status::Approved);
        assert_eq!(Status::parse("rejected"), Status::Rejected);
        assert_eq!(Status::parse("on-hold"), Status::Pending);
    }

    #[test]
    fn raw_registration_tolerates_missing_fields() {
        let raw: RawRegistration = serde_json::from_str(r#"{"id": "r1"}"#).unwrap();
        assert!(raw.selected_events.is_none());
        assert!(raw.team_members.is_none());
        assert!(raw.total_amount.is_none());
    }

    #[test]
    fn wrongly_typed_fields_read_as_absent() {
        let raw: RawRegistration = serde_json::from_str(
            r#"{"id": "r3", "total_amount": true, "status": 7,
                "selected_events": "code-quest",
                "team_members": [{"id": "m1", "college": 42, "name": "Asha"}, "junk"]}"#,
        )
        .unwrap();
        assert_eq!(raw.id, Some(Lenient::Text("r3".into())));
        assert!(raw.total_amount.is_none());
        assert!(raw.status.is_none());
        assert!(raw.selected_events.is_none());
        let members = raw.team_members.unwrap();
        assert_eq!(members.len(), 2);
        assert!(members[0].college.is_none());
        assert_eq!(members[0].name.as_deref(), Some("Asha"));
        assert!(members[1].id.is_none());
    }

    #[test]
    fn bad_list_elements_become_defaults() {
        let raw: RawRegistration =
            serde_json::from_str(r#"{"selected_events": ["code-quest", 5, null]}"#).unwrap();
        assert_eq!(
            raw.selected_events,
            Some(vec!["code-quest".to_string(), String::new(), String::new()])
        );
    }

    #[test]
    fn large_numeric_ids_keep_every_digit() {
        let a = Lenient::Number(9_223_372_036_854_775_808.0);
        let b = Lenient::Number(18_446_744_073_709_551_616.0);
        assert_eq!(a.to_text(), "9223372036854775808");
        assert_ne!(a.to_text(), b.to_text());
        assert_eq!(Lenient::Number(-4.0).to_text(), "-4");
    }
}
