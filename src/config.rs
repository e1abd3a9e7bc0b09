use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;

/// Runtime settings, read from the environment only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub vaccine_schedule_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = env::var("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let vaccine_schedule_path = env::var("VACCINE_SCHEDULE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("vaccines.json"));

        Self {
            data_dir,
            port,
            vaccine_schedule_path,
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("catalog.json")
    }

    pub fn entries_path(&self) -> PathBuf {
        self.data_dir.join("entries.json")
    }

    pub fn latest_workout_path(&self) -> PathBuf {
        self.data_dir.join("latest_workout.json")
    }
}
