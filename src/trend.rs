use crate::models::{Entry, GroupSeries, TrendRow};
use crate::progression::parse_weight;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Number of most recent training days shown in a trend.
pub const TREND_WINDOW_DATES: usize = 10;

/// Builds the weight trend for one workout group from that group's entries.
pub fn build_series<'a>(group: &str, entries: impl IntoIterator<Item = &'a Entry>) -> GroupSeries {
    let entries: Vec<&Entry> = entries.into_iter().collect();

    let mut personal_records: BTreeMap<String, f64> = BTreeMap::new();
    for entry in &entries {
        if let Some(weight) = parse_weight(&entry.weight) {
            personal_records
                .entry(entry.exercise.clone())
                .and_modify(|best| *best = best.max(weight))
                .or_insert(weight);
        }
    }

    let distinct: BTreeSet<NaiveDate> = entries.iter().map(|entry| entry.date).collect();
    let window: BTreeSet<NaiveDate> = distinct.into_iter().rev().take(TREND_WINDOW_DATES).collect();

    let mut exercises: BTreeSet<String> = BTreeSet::new();
    let mut pivot: BTreeMap<NaiveDate, BTreeMap<String, Option<f64>>> = BTreeMap::new();
    for entry in entries.iter().filter(|entry| window.contains(&entry.date)) {
        exercises.insert(entry.exercise.clone());
        // First value logged for a (date, exercise) pair wins.
        pivot
            .entry(entry.date)
            .or_default()
            .entry(entry.exercise.clone())
            .or_insert_with(|| parse_weight(&entry.weight));
    }

    let rows = pivot
        .into_iter()
        .map(|(date, mut weights)| {
            for exercise in &exercises {
                weights.entry(exercise.clone()).or_insert(None);
            }
            TrendRow { date, weights }
        })
        .collect();

    GroupSeries {
        workout_group: group.to_string(),
        personal_records,
        exercises: exercises.into_iter().collect(),
        rows,
    }
}

/// One series per workout group, in the order groups first appear.
pub fn build_all_series(entries: &[Entry]) -> Vec<GroupSeries> {
    let mut groups: Vec<&str> = Vec::new();
    for entry in entries {
        if !groups.contains(&entry.workout_group.as_str()) {
            groups.push(&entry.workout_group);
        }
    }

    groups
        .into_iter()
        .map(|group| {
            build_series(
                group,
                entries.iter().filter(|entry| entry.workout_group == group),
            )
        })
        .collect()
}

/// Heaviest logged weight as whole-number text, or empty without history.
pub fn personal_best_hint<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> String {
    entries
        .into_iter()
        .filter_map(|entry| parse_weight(&entry.weight))
        .reduce(f64::max)
        .map(|best| format!("{}", best.trunc() as i64))
        .unwrap_or_default()
}
