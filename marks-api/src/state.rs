use crate::config::Config;
use crate::dataset::{self, LookupTable};
use tracing::{debug, info};

pub struct AppState {
    // Built once before serving starts; handlers only read it.
    pub table: LookupTable,
    pub welcome_message: String,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> Self {
        let data_path = cfg.resolve_data_path();
        debug!("Resolved dataset path: {}", data_path.display());

        let table = dataset::load(&data_path);
        if table.is_empty() {
            info!("Lookup table is empty; every name will resolve to null");
        }

        AppState::new(table, cfg.welcome_message())
    }

    pub fn new(table: LookupTable, welcome_message: impl Into<String>) -> Self {
        AppState {
            table,
            welcome_message: welcome_message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_WELCOME;
    use serde_json::json;
    use std::fs;

    #[test]
    fn appstate_from_config_loads_dataset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("marks.json");
        fs::write(&path, r#"{"Alice": 90, "Bob": 75}"#).unwrap();
        let cfg = Config {
            data_path: Some(path.to_string_lossy().into_owned()),
            ..Config::default()
        };
        let st = AppState::from_config(&cfg);
        assert_eq!(st.table.len(), 2);
        assert_eq!(st.table.get("Bob"), Some(&json!(75)));
        assert_eq!(st.welcome_message, DEFAULT_WELCOME);
    }

    #[test]
    fn appstate_survives_missing_dataset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config {
            data_path: Some(dir.path().join("nope.json").to_string_lossy().into_owned()),
            welcome_message: Some("hi".to_string()),
            ..Config::default()
        };
        let st = AppState::from_config(&cfg);
        assert!(st.table.is_empty(), "missing dataset should give an empty table");
        assert_eq!(st.welcome_message, "hi");
    }
}
