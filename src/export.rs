use crate::errors::TrackerError;
use crate::models::{DEFAULT_SETS, Entry};

/// Renders a group's entries as a CSV table, one row per entry.
///
/// There are as many `repsN` columns as the longest entry has sets; shorter
/// rows are padded with empty cells.
pub fn group_csv<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Result<Vec<u8>, TrackerError> {
    let entries: Vec<&Entry> = entries.into_iter().collect();
    let rep_columns = entries
        .iter()
        .map(|entry| entry.reps.len())
        .max()
        .unwrap_or(usize::from(DEFAULT_SETS));

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<String> = vec!["date".into(), "exercise".into(), "weight".into()];
    header.extend((1..=rep_columns).map(|set| format!("reps{set}")));
    header.push("weight_change".into());
    header.push("reps3_change".into());
    writer.write_record(&header)?;

    for entry in entries {
        let mut record = Vec::with_capacity(header.len());
        record.push(entry.date.to_string());
        record.push(entry.exercise.clone());
        record.push(entry.weight.clone());
        record.extend(
            (0..rep_columns).map(|set| entry.reps.get(set).cloned().unwrap_or_default()),
        );
        record.push(entry.weight_change.clone());
        record.push(entry.reps3_change.clone());
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|err| TrackerError::Storage(err.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseInput;
    use chrono::NaiveDate;

    #[test]
    fn header_widens_to_longest_set_list() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let mut bench = Entry::from_input(
            date,
            "Push",
            ExerciseInput {
                exercise: "Bench".into(),
                weight: "185".into(),
                reps: vec!["8".into(), "8".into(), "10".into(), "6".into()],
            },
        );
        bench.weight_change = "+5 lbs".into();
        bench.reps3_change = "+2 reps".into();
        let dips = Entry::from_input(
            date,
            "Push",
            ExerciseInput {
                exercise: "Dips, weighted".into(),
                weight: "25".into(),
                reps: vec!["12".into(), "10".into()],
            },
        );

        let bytes = group_csv(&[bench, dips]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "date,exercise,weight,reps1,reps2,reps3,reps4,weight_change,reps3_change"
        );
        assert_eq!(lines[1], "2025-06-02,Bench,185,8,8,10,6,+5 lbs,+2 reps");
        assert_eq!(lines[2], "2025-06-02,\"Dips, weighted\",25,12,10,,,N/A,N/A");
    }

    #[test]
    fn empty_group_still_has_a_header() {
        let bytes = group_csv(std::iter::empty()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "date,exercise,weight,reps1,reps2,reps3,weight_change,reps3_change\n"
        );
    }
}
