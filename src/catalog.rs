use crate::errors::TrackerError;
use crate::models::{CatalogData, Exercise, GroupDoc, GroupView, MAX_SETS};
use crate::storage::{load_document, persist_document};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A single edit to a group's exercise list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
    Add { name: String },
    Move { index: usize, direction: Direction },
    Remove { index: usize },
}

/// Named workout groups and their ordered exercises.
///
/// Every mutation is written through before it becomes visible; a failed
/// write leaves the catalog as it was.
#[derive(Debug)]
pub struct GroupCatalog {
    path: PathBuf,
    data: CatalogData,
}

impl GroupCatalog {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, TrackerError> {
        let path = path.into();
        let data: CatalogData = load_document(&path).await?;
        info!("loaded {} workout groups from {}", data.groups.len(), path.display());
        Ok(Self { path, data })
    }

    pub fn list(&self) -> Vec<GroupView> {
        self.data
            .groups
            .iter()
            .map(|(name, doc)| GroupView {
                name: name.clone(),
                exercises: doc.exercises.clone(),
            })
            .collect()
    }

    pub fn get(&self, group: &str) -> Result<&[Exercise], TrackerError> {
        self.data
            .groups
            .get(group)
            .map(|doc| doc.exercises.as_slice())
            .ok_or_else(|| group_not_found(group))
    }

    /// Creates `name`, replacing any group already stored under it.
    pub async fn create(&mut self, name: &str, exercises: Vec<Exercise>) -> Result<Vec<Exercise>, TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::validation("workout group needs a name"));
        }

        let mut cleaned: Vec<Exercise> = Vec::with_capacity(exercises.len());
        for exercise in exercises {
            let exercise_name = exercise.name.trim();
            if exercise_name.is_empty() || cleaned.iter().any(|kept| kept.name == exercise_name) {
                continue;
            }
            if exercise.sets == 0 || exercise.sets > MAX_SETS {
                return Err(TrackerError::validation(format!(
                    "set count for {exercise_name} must be between 1 and {MAX_SETS}"
                )));
            }
            cleaned.push(Exercise::with_sets(exercise_name, exercise.sets));
        }
        if cleaned.is_empty() {
            return Err(TrackerError::validation("workout group needs at least one exercise"));
        }

        let mut next = self.data.clone();
        let replaced = next
            .groups
            .insert(name.to_string(), GroupDoc { exercises: cleaned.clone() })
            .is_some();
        self.commit(next).await?;

        if replaced {
            warn!("replaced existing workout group {name}");
        } else {
            info!("created workout group {name} with {} exercises", cleaned.len());
        }
        Ok(cleaned)
    }

    /// Appends an exercise unless the name is blank or already present.
    pub async fn add_exercise(&mut self, group: &str, name: &str) -> Result<bool, TrackerError> {
        let name = name.trim();
        self.mutate(group, |exercises| {
            if name.is_empty() || exercises.iter().any(|exercise| exercise.name == name) {
                return Ok(false);
            }
            exercises.push(Exercise::new(name));
            Ok(true)
        })
        .await
    }

    /// Swaps the exercise at `index` with its neighbour. No-op at either end.
    pub async fn reorder(&mut self, group: &str, index: usize, direction: Direction) -> Result<bool, TrackerError> {
        self.mutate(group, |exercises| {
            check_index(exercises, index)?;
            let neighbour = match direction {
                Direction::Up if index > 0 => index - 1,
                Direction::Down if index + 1 < exercises.len() => index + 1,
                _ => return Ok(false),
            };
            exercises.swap(index, neighbour);
            Ok(true)
        })
        .await
    }

    pub async fn remove(&mut self, group: &str, index: usize) -> Result<bool, TrackerError> {
        self.mutate(group, |exercises| {
            check_index(exercises, index)?;
            exercises.remove(index);
            Ok(true)
        })
        .await
    }

    /// Drops the group definition. Entries logged under it are left alone.
    pub async fn delete(&mut self, group: &str) -> Result<(), TrackerError> {
        let mut next = self.data.clone();
        if next.groups.remove(group).is_none() {
            return Err(group_not_found(group));
        }
        self.commit(next).await?;
        info!("deleted workout group {group}");
        Ok(())
    }

    pub async fn apply(&mut self, group: &str, action: EditAction) -> Result<Vec<Exercise>, TrackerError> {
        match action {
            EditAction::Add { name } => self.add_exercise(group, &name).await?,
            EditAction::Move { index, direction } => self.reorder(group, index, direction).await?,
            EditAction::Remove { index } => self.remove(group, index).await?,
        };
        Ok(self.get(group)?.to_vec())
    }

    async fn mutate<F>(&mut self, group: &str, edit: F) -> Result<bool, TrackerError>
    where
        F: FnOnce(&mut Vec<Exercise>) -> Result<bool, TrackerError>,
    {
        let mut next = self.data.clone();
        let doc = next.groups.get_mut(group).ok_or_else(|| group_not_found(group))?;
        if !edit(&mut doc.exercises)? {
            return Ok(false);
        }
        self.commit(next).await?;
        info!("updated exercises of {group}");
        Ok(true)
    }

    async fn commit(&mut self, next: CatalogData) -> Result<(), TrackerError> {
        persist_document(&self.path, &next).await?;
        self.data = next;
        Ok(())
    }
}

fn check_index(exercises: &[Exercise], index: usize) -> Result<(), TrackerError> {
    if index < exercises.len() {
        Ok(())
    } else {
        Err(TrackerError::not_found(format!("exercise #{index}")))
    }
}

fn group_not_found(group: &str) -> TrackerError {
    TrackerError::not_found(format!("workout group {group}"))
}
