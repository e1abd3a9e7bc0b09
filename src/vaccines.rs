//! Yes/no/undecided decisions over a baby's vaccine schedule.

use crate::errors::TrackerError;
use crate::storage::{load_document, persist_document};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    #[default]
    Undecided,
    Yes,
    No,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaccineDetails {
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub glances: Vec<String>,
    #[serde(default)]
    pub status: Decision,
    /// Any other fields in the schedule file, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A JSON object whose key order is kept, e.g. visits in calendar order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordered<T>(pub Vec<(String, T)>);

impl<T> Default for Ordered<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Ordered<T> {
    fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.0
            .iter_mut()
            .find(|(name, _)| name.as_str() == key)
            .map(|(_, value)| value)
    }
}

impl<T: Serialize> Serialize for Ordered<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, value)))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Ordered<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = Ordered<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut items = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    items.push((key, value));
                }
                Ok(Ordered(items))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

pub type Schedule = Ordered<Ordered<VaccineDetails>>;

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct DecisionSummary {
    pub accepted: Vec<String>,
    pub declined: Vec<String>,
}

#[derive(Debug)]
pub struct VaccineTracker {
    path: PathBuf,
    schedule: Schedule,
}

impl VaccineTracker {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, TrackerError> {
        let path = path.into();
        let schedule: Schedule = load_document(&path).await?;
        info!("loaded {} doctor visits from {}", schedule.0.len(), path.display());
        Ok(Self { path, schedule })
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Records a decision, writing the schedule back only when it changed.
    pub async fn set_status(&mut self, visit: &str, vaccine: &str, status: Decision) -> Result<bool, TrackerError> {
        let mut next = self.schedule.clone();
        let details = next
            .get_mut(visit)
            .ok_or_else(|| TrackerError::not_found(format!("visit {visit}")))?
            .get_mut(vaccine)
            .ok_or_else(|| TrackerError::not_found(format!("vaccine {vaccine} at {visit}")))?;
        if details.status == status {
            return Ok(false);
        }
        details.status = status;

        persist_document(&self.path, &next).await?;
        self.schedule = next;
        info!("{visit}: {vaccine} set to {status:?}");
        Ok(true)
    }

    pub fn summary(&self) -> DecisionSummary {
        let mut summary = DecisionSummary::default();
        for (visit, vaccines) in &self.schedule.0 {
            for (vaccine, details) in &vaccines.0 {
                let label = format!("{visit}: {vaccine}");
                match details.status {
                    Decision::Yes => summary.accepted.push(label),
                    Decision::No => summary.declined.push(label),
                    Decision::Undecided => {}
                }
            }
        }
        summary
    }
}
