// Daily trend series over a trailing window.
//
// Each series has exactly one point per day, oldest first, ending on
// `today`. Days without records report zeros.
use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tabled::Tabled;

use crate::revenue::{revenue_of, Revenue};
use crate::types::Registration;
use crate::util::{day_key, day_key_of};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CountPoint {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    pub date: String,
    pub revenue: f64,
    pub potential_revenue: f64,
}

/// Day keys for the `window_days` days ending on `today`, ascending.
pub fn trailing_days(today: NaiveDate, window_days: u32) -> Vec<String> {
    (0..window_days)
        .rev()
        .map(|back| day_key(today - Duration::days(back as i64)))
        .collect()
}

/// Fold `registrations` into one accumulator per day of the window.
fn bucket<T: Default>(
    registrations: &[Registration],
    today: NaiveDate,
    window_days: u32,
    mut fold: impl FnMut(&mut T, &Registration),
) -> Vec<(String, T)> {
    let days = trailing_days(today, window_days);
    let index: HashMap<String, usize> = days
        .iter()
        .enumerate()
        .map(|(i, d)| (d.clone(), i))
        .collect();
    let mut buckets: Vec<(String, T)> = days.into_iter().map(|d| (d, T::default())).collect();
    for r in registrations {
        if let Some(&i) = index.get(day_key_of(&r.created_at)) {
            fold(&mut buckets[i].1, r);
        }
    }
    buckets
}

pub fn registration_trend(
    registrations: &[Registration],
    today: NaiveDate,
    window_days: u32,
) -> Vec<CountPoint> {
    bucket(registrations, today, window_days, |count: &mut usize, _| {
        *count += 1
    })
    .into_iter()
    .map(|(date, count)| CountPoint { date, count })
    .collect()
}

pub fn revenue_trend(
    registrations: &[Registration],
    today: NaiveDate,
    window_days: u32,
) -> Vec<RevenuePoint> {
    bucket(registrations, today, window_days, |acc: &mut Revenue, r| {
        acc.add(r, revenue_of(r))
    })
    .into_iter()
    .map(|(date, acc)| {
        let acc = acc.rounded();
        RevenuePoint {
            date,
            revenue: acc.recognized,
            potential_revenue: acc.potential,
        }
    })
    .collect()
}
