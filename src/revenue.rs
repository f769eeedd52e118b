// Revenue calculation and per-event apportionment.
//
// `revenue_of` returns what a registration *would* bring in, whatever its
// status. Deciding that only approved registrations count is the caller's
// job; `Revenue` makes that split explicit with separate `potential` and
// `recognized` totals so the two are never summed into each other.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::Registration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Revenue {
    /// Every registration's amount, regardless of status.
    pub potential: f64,
    /// Approved registrations only.
    pub recognized: f64,
}

impl Revenue {
    pub fn add(&mut self, registration: &Registration, amount: f64) {
        self.potential += amount;
        if registration.is_approved() {
            self.recognized += amount;
        }
    }

    /// Rounded to whole currency units. Apply once, on the final figure.
    pub fn rounded(&self) -> Revenue {
        Revenue {
            potential: self.potential.round(),
            recognized: self.recognized.round(),
        }
    }
}

pub fn revenue_of(registration: &Registration) -> f64 {
    registration.total_amount
}

/// Unrounded share of the amount for each selected event.
///
/// Empty when nothing is selected, so the registration feeds no bucket.
pub fn apportion(registration: &Registration) -> Vec<(&str, f64)> {
    let n = registration.selected_events.len();
    if n == 0 {
        return Vec::new();
    }
    let share = revenue_of(registration) / n as f64;
    registration
        .selected_events
        .iter()
        .map(|event| (event.as_str(), share))
        .collect()
}

pub fn total_revenue(registrations: &[Registration]) -> Revenue {
    let mut total = Revenue::default();
    for r in registrations {
        total.add(r, revenue_of(r));
    }
    total
}

/// Apportioned revenue per event id, accumulated without intermediate rounding.
pub fn revenue_by_event(registrations: &[Registration]) -> BTreeMap<String, Revenue> {
    let mut map: BTreeMap<String, Revenue> = BTreeMap::new();
    for r in registrations {
        for (event, share) in apportion(r) {
            map.entry(event.to_string()).or_default().add(r, share);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::registration;
    use crate::types::Status;

    fn reg(status: Status, amount: f64, events: &[&str]) -> Registration {
        registration("r", status, amount, events, vec![])
    }

    #[test]
    fn apportionment_conserves_the_total() {
        let r = reg(Status::Approved, 1500.0, &["a", "b", "c"]);
        let shares = apportion(&r);
        assert_eq!(shares.len(), 3);
        let sum: f64 = shares.iter().map(|(_, s)| s).sum();
        assert!((sum - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn rounding_only_happens_on_the_aggregate() {
        // 100 / 3 three times over: rounding per share would give 99.
        let regs = vec![
            reg(Status::Approved, 100.0, &["a", "b", "c"]),
            reg(Status::Approved, 100.0, &["a", "b", "c"]),
            reg(Status::Approved, 100.0, &["a", "b", "c"]),
        ];
        let by_event = revenue_by_event(&regs);
        assert_eq!(by_event["a"].rounded().recognized, 100.0);
    }

    #[test]
    fn no_selected_events_means_no_buckets() {
        let r = reg(Status::Approved, 500.0, &[]);
        assert!(apportion(&r).is_empty());
        assert!(revenue_by_event(&[r]).is_empty());
    }

    #[test]
    fn potential_and_recognized_stay_separate() {
        let regs = vec![
            reg(Status::Approved, 500.0, &["code-quest"]),
            reg(Status::Pending, 300.0, &["code-quest"]),
            reg(Status::Rejected, 200.0, &["tech-quiz"]),
        ];
        let total = total_revenue(&regs);
        assert_eq!(total.potential, 1000.0);
        assert_eq!(total.recognized, 500.0);

        let by_event = revenue_by_event(&regs);
        assert_eq!(by_event["code-quest"].recognized, 500.0);
        assert_eq!(by_event["code-quest"].potential, 800.0);
        assert_eq!(by_event["tech-quiz"].recognized, 0.0);
    }

    #[test]
    fn revenue_of_ignores_status() {
        assert_eq!(revenue_of(&reg(Status::Rejected, 250.0, &["a"])), 250.0);
    }
}
