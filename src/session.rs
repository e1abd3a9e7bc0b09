use crate::catalog::{EditAction, GroupCatalog};
use crate::errors::TrackerError;
use crate::models::{Exercise, ExerciseInput};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::info;
use uuid::Uuid;

/// Open sessions kept before the oldest is evicted.
pub const MAX_SESSIONS: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExerciseDraft {
    pub weight: String,
    pub reps: Vec<String>,
}

/// Per-client working state: the selected group, its edit buffer and the
/// weights and reps typed in so far for the current workout.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub id: Uuid,
    pub selected_group: Option<String>,
    pub edit_buffer: Vec<Exercise>,
    pub drafts: BTreeMap<String, ExerciseDraft>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            selected_group: None,
            edit_buffer: Vec::new(),
            drafts: BTreeMap::new(),
        }
    }

    /// Switches to `group` and reloads the buffer from the catalog.
    /// Re-selecting the current group keeps the drafts.
    pub fn select(&mut self, group: &str, catalog: &GroupCatalog) -> Result<(), TrackerError> {
        let exercises = catalog.get(group)?;
        if self.selected_group.as_deref() != Some(group) {
            self.selected_group = Some(group.to_string());
            self.drafts.clear();
        }
        self.edit_buffer = exercises.to_vec();
        Ok(())
    }

    pub fn selected_group(&self) -> Result<&str, TrackerError> {
        self.selected_group
            .as_deref()
            .ok_or_else(|| TrackerError::validation("no workout group selected"))
    }

    pub async fn edit(&mut self, catalog: &mut GroupCatalog, action: EditAction) -> Result<(), TrackerError> {
        let group = self.selected_group()?.to_string();
        self.edit_buffer = catalog.apply(&group, action).await?;
        Ok(())
    }

    /// Stores the typed-in values for one exercise of the selected group.
    /// The exercise is checked against the live catalog, not the buffer.
    pub fn record_draft(
        &mut self,
        catalog: &GroupCatalog,
        exercise: &str,
        draft: ExerciseDraft,
    ) -> Result<(), TrackerError> {
        let exercises = catalog.get(self.selected_group()?)?;
        if !exercises.iter().any(|known| known.name == exercise) {
            return Err(TrackerError::not_found(format!("exercise {exercise}")));
        }
        self.edit_buffer = exercises.to_vec();
        self.drafts.insert(exercise.to_string(), draft);
        Ok(())
    }

    /// One input per exercise of the group. Missing drafts become a blank
    /// weight with every set left at the default rep count.
    pub fn workout_inputs(&self, exercises: &[Exercise]) -> Vec<ExerciseInput> {
        exercises
            .iter()
            .map(|exercise| {
                let draft = self.drafts.get(&exercise.name);
                let reps = (0..usize::from(exercise.sets))
                    .map(|set| {
                        draft
                            .and_then(|draft| draft.reps.get(set).cloned())
                            .unwrap_or_default()
                    })
                    .collect();
                ExerciseInput {
                    exercise: exercise.name.clone(),
                    weight: draft.map(|draft| draft.weight.clone()).unwrap_or_default(),
                    reps,
                }
            })
            .collect()
    }

    pub fn clear_drafts(&mut self) {
        self.drafts.clear();
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Open sessions by id. Holds at most [`MAX_SESSIONS`]; opening one more
/// drops the oldest.
#[derive(Debug, Default)]
pub struct Sessions {
    contexts: HashMap<Uuid, SessionContext>,
    opened: VecDeque<Uuid>,
}

impl Sessions {
    pub fn open(&mut self) -> SessionContext {
        while self.opened.len() >= MAX_SESSIONS {
            if let Some(oldest) = self.opened.pop_front() {
                self.contexts.remove(&oldest);
                info!("evicted session {oldest}");
            }
        }
        let context = SessionContext::new();
        self.contexts.insert(context.id, context.clone());
        self.opened.push_back(context.id);
        context
    }

    pub fn close(&mut self, id: Uuid) -> Result<SessionContext, TrackerError> {
        let context = self
            .contexts
            .remove(&id)
            .ok_or_else(|| TrackerError::not_found(format!("session {id}")))?;
        self.opened.retain(|open| *open != id);
        Ok(context)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Result<&SessionContext, TrackerError> {
        self.contexts
            .get(&id)
            .ok_or_else(|| TrackerError::not_found(format!("session {id}")))
    }

    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut SessionContext, TrackerError> {
        self.contexts
            .get_mut(&id)
            .ok_or_else(|| TrackerError::not_found(format!("session {id}")))
    }
}
