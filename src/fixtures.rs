// Builders for normalized records used across unit tests.
use crate::types::{Registration, Status, TeamMember};

pub fn member(id: &str, college: &str, year: &str) -> TeamMember {
    TeamMember {
        id: Some(id.to_string()),
        name: Some(format!("Member {id}")),
        email: Some(format!("{id}@example.com")),
        phone: Some("9000000000".to_string()),
        college: Some(college.to_string()),
        department: Some("CSE".to_string()),
        year: Some(year.to_string()),
        player_id: None,
    }
}

pub fn registration(
    id: &str,
    status: Status,
    amount: f64,
    events: &[&str],
    members: Vec<TeamMember>,
) -> Registration {
    Registration {
        id: id.to_string(),
        team_id: Some(format!("TEAM-{id}")),
        selected_events: events.iter().map(|e| e.to_string()).collect(),
        team_size: members.len() as u32,
        total_amount: amount,
        status,
        created_at: "2026-10-16T10:00:00Z".to_string(),
        transaction_id: None,
        payment_method: None,
        payment_proof: None,
        team_members: members,
    }
}

pub fn created(mut registration: Registration, created_at: &str) -> Registration {
    registration.created_at = created_at.to_string();
    registration
}
