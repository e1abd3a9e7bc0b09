use crate::errors::TrackerError;
use crate::models::{Entry, Exercise, ExerciseInput, SessionForm, SessionFormExercise};
use crate::progression::annotate;
use crate::storage::persist_document;
use crate::store::EntryStore;
use crate::trend::personal_best_hint;
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

/// Annotates one workout's inputs against the stored history and appends them.
///
/// The annotated batch is also written to `snapshot_path` before the append,
/// so a failed snapshot aborts the whole workout.
pub async fn record_workout(
    store: &mut EntryStore,
    snapshot_path: &Path,
    group: &str,
    date: NaiveDate,
    inputs: Vec<ExerciseInput>,
) -> Result<Vec<Entry>, TrackerError> {
    let batch: Vec<Entry> = inputs
        .into_iter()
        .filter(|input| !input.exercise.trim().is_empty())
        .map(|input| annotate(Entry::from_input(date, group, input), store.all()))
        .collect();
    if batch.is_empty() {
        return Err(TrackerError::validation("workout has no exercises"));
    }

    persist_document(snapshot_path, &batch).await?;
    let appended = store.append(batch, group).await?;
    info!("recorded {} exercises for {group} on {date}", appended.len());
    Ok(appended)
}

/// Checks a submitted workout against its group: every named input must be
/// one of the group's exercises and may not log more sets than it has.
/// Inputs with a blank name are left for `record_workout` to skip.
pub fn check_inputs(group: &str, exercises: &[Exercise], inputs: &[ExerciseInput]) -> Result<(), TrackerError> {
    for input in inputs {
        let name = input.exercise.trim();
        if name.is_empty() {
            continue;
        }
        let Some(exercise) = exercises.iter().find(|exercise| exercise.name == name) else {
            return Err(TrackerError::validation(format!("{name} is not part of {group}")));
        };
        if input.reps.len() > usize::from(exercise.sets) {
            return Err(TrackerError::validation(format!(
                "{name} has {} sets, got {} rep counts",
                exercise.sets,
                input.reps.len()
            )));
        }
    }
    Ok(())
}

/// The blank form for a workout: each exercise with its set count and best weight so far.
pub fn session_form(group: &str, exercises: &[Exercise], store: &EntryStore) -> SessionForm {
    SessionForm {
        workout_group: group.to_string(),
        exercises: exercises
            .iter()
            .map(|exercise| SessionFormExercise {
                name: exercise.name.clone(),
                sets: exercise.sets,
                personal_best: personal_best_hint(store.for_exercise(&exercise.name)),
            })
            .collect(),
    }
}
