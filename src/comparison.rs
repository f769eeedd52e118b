use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tabled::Tabled;

use crate::distribution::{is_internal, keep_member};
use crate::events::{EventCatalog, EventMode};
use crate::revenue::{apportion, Revenue};
use crate::types::{Registration, TeamMember};
use crate::util::{average_label, percentage};

/// Side-by-side statistics for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct EventComparisonRow {
    #[tabled(rename = "Event")]
    pub event_id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Mode")]
    pub mode: String,
    #[tabled(rename = "Teams")]
    pub teams: usize,
    #[tabled(rename = "Participants")]
    pub participants: usize,
    #[tabled(rename = "Internal")]
    pub internal: usize,
    #[tabled(rename = "External")]
    pub external: usize,
    #[tabled(rename = "Internal %")]
    pub internal_pct: u32,
    #[tabled(rename = "External %")]
    pub external_pct: u32,
    #[tabled(rename = "Approval %")]
    pub approval_rate: u32,
    #[tabled(rename = "Revenue")]
    pub revenue: f64,
    #[tabled(rename = "Avg Team Size")]
    pub avg_team_size: String,
}

/// One row per event id selected by any registration, in event-id order.
///
/// Row order carries no meaning; use [`sort_by_participants`] for display.
pub fn build_event_comparison(
    registrations: &[Registration],
    catalog: &EventCatalog,
) -> Vec<EventComparisonRow> {
    #[derive(Default)]
    struct Acc<'a> {
        teams: usize,
        approved: usize,
        members: BTreeMap<&'a str, &'a TeamMember>,
        team_sizes: Vec<f64>,
        revenue: Revenue,
    }

    let mut map: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in registrations {
        let shares: HashMap<&str, f64> = apportion(r).into_iter().collect();
        for event in &r.selected_events {
            let acc = map.entry(event.as_str()).or_default();
            acc.teams += 1;
            if r.is_approved() {
                acc.approved += 1;
            }
            acc.team_sizes.push(r.team_size as f64);
            acc.revenue
                .add(r, shares.get(event.as_str()).copied().unwrap_or(0.0));
            for m in &r.team_members {
                keep_member(&mut acc.members, m);
            }
        }
    }

    map.into_iter()
        .map(|(event_id, acc)| {
            let participants = acc.members.len();
            let internal = acc.members.values().filter(|m| is_internal(m)).count();
            let external = participants - internal;
            EventComparisonRow {
                event_id: event_id.to_string(),
                title: catalog.title_of(event_id).to_string(),
                mode: EventMode::of(event_id).label().to_string(),
                teams: acc.teams,
                participants,
                internal,
                external,
                internal_pct: percentage(internal, participants),
                external_pct: percentage(external, participants),
                approval_rate: percentage(acc.approved, acc.teams),
                revenue: acc.revenue.rounded().recognized,
                avg_team_size: average_label(&acc.team_sizes),
            }
        })
        .collect()
}

/// Most participants first; ties broken by event id.
pub fn sort_by_participants(rows: &mut [EventComparisonRow]) {
    rows.sort_by(|a, b| {
        b.participants
            .cmp(&a.participants)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
}
