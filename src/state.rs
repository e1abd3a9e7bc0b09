use crate::catalog::GroupCatalog;
use crate::config::AppConfig;
use crate::errors::TrackerError;
use crate::session::Sessions;
use crate::store::EntryStore;
use crate::vaccines::VaccineTracker;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub latest_workout_path: PathBuf,
    pub catalog: Arc<Mutex<GroupCatalog>>,
    pub entries: Arc<Mutex<EntryStore>>,
    pub sessions: Arc<Mutex<Sessions>>,
    pub vaccines: Arc<Mutex<VaccineTracker>>,
}

impl AppState {
    pub fn new(
        latest_workout_path: PathBuf,
        catalog: GroupCatalog,
        entries: EntryStore,
        vaccines: VaccineTracker,
    ) -> Self {
        Self {
            latest_workout_path,
            catalog: Arc::new(Mutex::new(catalog)),
            entries: Arc::new(Mutex::new(entries)),
            sessions: Arc::new(Mutex::new(Sessions::default())),
            vaccines: Arc::new(Mutex::new(vaccines)),
        }
    }

    /// Loads every document named by `config`.
    pub async fn load(config: &AppConfig) -> Result<Self, TrackerError> {
        let catalog = GroupCatalog::open(config.catalog_path()).await?;
        let entries = EntryStore::open(config.entries_path()).await?;
        let vaccines = VaccineTracker::open(config.vaccine_schedule_path.clone()).await?;
        Ok(Self::new(config.latest_workout_path(), catalog, entries, vaccines))
    }
}
