use std::env;
use std::path::PathBuf;

use crate::infrastructure::http_api::DEFAULT_BASE_URL;

pub const BASE_URL_VAR: &str = "TODO_API_BASE_URL";
pub const STORAGE_PATH_VAR: &str = "TODO_STORAGE_PATH";
pub const LOG_FILE_VAR: &str = "TODO_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub storage_path: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    /// Reads the process environment; call after `.env` has been loaded.
    pub fn from_env() -> Self { Self::from_lookup(|key| env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            api_base_url: get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            storage_path: get(STORAGE_PATH_VAR).map(PathBuf::from).unwrap_or_else(default_storage_path),
            log_file: get(LOG_FILE_VAR).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("todo-dashboard.log")),
        }
    }
}

fn default_storage_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join("todo-dashboard").join("local_storage.json"),
        None => PathBuf::from("todo-dashboard.storage.json"),
    }
}
