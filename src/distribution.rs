// Categorical breakdowns for the dashboard charts.
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tabled::Tabled;

use crate::types::{Registration, Status, TeamMember};
use crate::util::percentage;

pub const INTERNAL: &str = "Internal";
pub const EXTERNAL: &str = "External";
pub const YEAR_BUCKETS: [&str; 5] = ["1", "2", "3", "4", "Other"];

/// Substrings of a lower-cased college name that mark the host institution.
const HOST_MARKERS: [&str; 2] = ["hindustan", "hits"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct Bucket {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct Share {
    pub name: String,
    pub value: usize,
    pub percentage: u32,
}

pub fn is_internal(member: &TeamMember) -> bool {
    let college = member.college.as_deref().unwrap_or("").to_lowercase();
    HOST_MARKERS.iter().any(|m| college.contains(m))
}

pub fn year_bucket(member: &TeamMember) -> &'static str {
    match member.year.as_deref().map(str::trim) {
        Some("1") => "1",
        Some("2") => "2",
        Some("3") => "3",
        Some("4") => "4",
        _ => "Other",
    }
}

fn member_key(m: &TeamMember) -> [Option<&str>; 4] {
    [
        m.college.as_deref(),
        m.year.as_deref(),
        m.name.as_deref(),
        m.email.as_deref(),
    ]
}

/// Record `m` under its id. When the same id shows up on several rosters
/// with different details, the smallest entry wins so the outcome does not
/// depend on roster order. Members without an id are ignored.
pub fn keep_member<'a>(seen: &mut BTreeMap<&'a str, &'a TeamMember>, m: &'a TeamMember) {
    let Some(id) = m.id.as_deref() else {
        return;
    };
    seen.entry(id)
        .and_modify(|kept| {
            if member_key(m) < member_key(*kept) {
                *kept = m;
            }
        })
        .or_insert(m);
}

/// Every member with an id, once, across all rosters. Members without an
/// id cannot be deduplicated and are left out.
pub fn unique_members<'a>(
    registrations: impl IntoIterator<Item = &'a Registration>,
) -> Vec<&'a TeamMember> {
    let mut seen: BTreeMap<&str, &TeamMember> = BTreeMap::new();
    for r in registrations {
        for m in &r.team_members {
            keep_member(&mut seen, m);
        }
    }
    seen.into_values().collect()
}

/// One count per selected event; a registration with `k` events feeds `k`
/// buckets. Sorted by count, largest first, then by name.
pub fn event_distribution(registrations: &[Registration]) -> Vec<Bucket> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in registrations {
        for event in &r.selected_events {
            *counts.entry(event.as_str()).or_default() += 1;
        }
    }
    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(name, value)| Bucket {
            name: name.to_string(),
            value,
        })
        .collect();
    buckets.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    buckets
}

pub fn affiliation_distribution(registrations: &[Registration]) -> Vec<Bucket> {
    let members = unique_members(registrations);
    let internal = members.iter().filter(|m| is_internal(m)).count();
    vec![
        Bucket {
            name: INTERNAL.to_string(),
            value: internal,
        },
        Bucket {
            name: EXTERNAL.to_string(),
            value: members.len() - internal,
        },
    ]
}

pub fn year_distribution(registrations: &[Registration]) -> Vec<Bucket> {
    let mut counts = [0usize; YEAR_BUCKETS.len()];
    for m in unique_members(registrations) {
        let bucket = year_bucket(m);
        if let Some(i) = YEAR_BUCKETS.iter().position(|b| *b == bucket) {
            counts[i] += 1;
        }
    }
    YEAR_BUCKETS
        .iter()
        .zip(counts)
        .map(|(name, value)| Bucket {
            name: name.to_string(),
            value,
        })
        .collect()
}

pub fn status_distribution(registrations: &[Registration]) -> Vec<Bucket> {
    Status::ALL
        .iter()
        .map(|status| Bucket {
            name: status.as_str().to_string(),
            value: registrations.iter().filter(|r| r.status == *status).count(),
        })
        .collect()
}

/// Attach `round(value / total * 100)` to each bucket, `0` when the total is `0`.
pub fn with_percentages(buckets: &[Bucket]) -> Vec<Share> {
    let total: usize = buckets.iter().map(|b| b.value).sum();
    buckets
        .iter()
        .map(|b| Share {
            name: b.name.clone(),
            value: b.value,
            percentage: percentage(b.value, total),
        })
        .collect()
}
