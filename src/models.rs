use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::vaccines::Decision;

pub const DEFAULT_SETS: u8 = 3;
pub const MAX_SETS: u8 = 10;
/// Rep count recorded when a set's input is left blank.
pub const DEFAULT_REPS: &str = "8";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExerciseDoc")]
pub struct Exercise {
    pub name: String,
    pub sets: u8,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: DEFAULT_SETS,
        }
    }

    pub fn with_sets(name: impl Into<String>, sets: u8) -> Self {
        Self {
            name: name.into(),
            sets,
        }
    }
}

// Older catalog documents list exercises as bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExerciseDoc {
    Named(String),
    Full {
        name: String,
        #[serde(default = "default_sets")]
        sets: u8,
    },
}

fn default_sets() -> u8 {
    DEFAULT_SETS
}

impl From<ExerciseDoc> for Exercise {
    fn from(doc: ExerciseDoc) -> Self {
        match doc {
            ExerciseDoc::Named(name) => Exercise::new(name),
            ExerciseDoc::Full { name, sets } => Exercise::with_sets(name, sets.max(1)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDoc {
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogData {
    pub groups: BTreeMap<String, GroupDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub workout_group: String,
    pub exercise: String,
    pub weight: String,
    pub reps: Vec<String>,
    #[serde(default = "not_available")]
    pub weight_change: String,
    #[serde(default = "not_available")]
    pub reps3_change: String,
}

pub(crate) fn not_available() -> String {
    crate::progression::NOT_AVAILABLE.to_string()
}

impl Entry {
    /// Builds an unannotated entry from one exercise of a workout form.
    pub fn from_input(date: NaiveDate, workout_group: &str, input: ExerciseInput) -> Self {
        let reps = input
            .reps
            .into_iter()
            .map(|rep| {
                let rep = rep.trim();
                if rep.is_empty() {
                    DEFAULT_REPS.to_string()
                } else {
                    rep.to_string()
                }
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            date,
            workout_group: workout_group.to_string(),
            exercise: input.exercise.trim().to_string(),
            weight: input.weight.trim().to_string(),
            reps,
            weight_change: not_available(),
            reps3_change: not_available(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryData {
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExerciseInput {
    pub exercise: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub reps: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub exercises: Vec<String>,
    pub sets: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct RecordWorkoutRequest {
    pub date: Option<NaiveDate>,
    pub exercises: Vec<ExerciseInput>,
}

#[derive(Debug, Deserialize)]
pub struct FinishSessionRequest {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SelectGroupRequest {
    pub group: String,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub reps: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub status: Decision,
}

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub name: String,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Serialize)]
pub struct SessionFormExercise {
    pub name: String,
    pub sets: u8,
    /// Best weight so far, shown as the input placeholder. Empty without history.
    pub personal_best: String,
}

#[derive(Debug, Serialize)]
pub struct SessionForm {
    pub workout_group: String,
    pub exercises: Vec<SessionFormExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub date: NaiveDate,
    pub weights: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSeries {
    pub workout_group: String,
    pub personal_records: BTreeMap<String, f64>,
    pub exercises: Vec<String>,
    pub rows: Vec<TrendRow>,
}
