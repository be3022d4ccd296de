use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// Immutable name -> marks mapping, built once at startup.
///
/// Values are kept as JSON so marks come back exactly as they were written
/// (`95` stays an integer, `87.5` a float).
#[derive(Debug, Default, Clone)]
pub struct LookupTable {
    entries: HashMap<String, Value>,
}

impl LookupTable {
    /// Builds a table from `{name, marks}` records. Later records overwrite
    /// earlier ones with the same name; records without a string `name` and a
    /// numeric `marks` are skipped.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut entries = HashMap::new();
        for record in records {
            let Some(obj) = record.as_object() else {
                continue;
            };
            let name = obj.get("name").and_then(|v| v.as_str());
            let marks = obj.get("marks").filter(|v| v.is_number());
            if let (Some(name), Some(marks)) = (name, marks) {
                entries.insert(name.to_string(), marks.clone());
            }
        }
        LookupTable { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// A top-level object is already a name -> marks mapping and is taken as-is,
// values included.
impl From<Map<String, Value>> for LookupTable {
    fn from(map: Map<String, Value>) -> Self {
        LookupTable {
            entries: map.into_iter().collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode JSON from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected dataset shape in {path}: top-level {kind}")]
    UnexpectedShape { path: PathBuf, kind: &'static str },
}

/// Normalizes a parsed dataset. Arrays are read as records, objects are used
/// directly, anything else is rejected with the name of its JSON kind.
pub fn from_value(value: Value) -> Result<LookupTable, &'static str> {
    match value {
        Value::Array(records) => {
            let table = LookupTable::from_records(&records);
            if table.is_empty() && !records.is_empty() {
                warn!(
                    "Dataset array has {} element(s) but no valid name/marks records",
                    records.len()
                );
            }
            Ok(table)
        }
        Value::Object(map) => Ok(LookupTable::from(map)),
        Value::Null => Err("null"),
        Value::Bool(_) => Err("boolean"),
        Value::Number(_) => Err("number"),
        Value::String(_) => Err("string"),
    }
}

pub fn try_load(path: &Path) -> Result<LookupTable, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    from_value(value).map_err(|kind| LoadError::UnexpectedShape {
        path: path.to_path_buf(),
        kind,
    })
}

/// Loads the dataset, degrading to an empty table on any failure.
pub fn load(path: &Path) -> LookupTable {
    match try_load(path) {
        Ok(table) => {
            info!(
                "Loaded {} student record(s) from {}",
                table.len(),
                path.display()
            );
            table
        }
        Err(e) => {
            error!("{}; serving with an empty dataset", e);
            LookupTable::default()
        }
    }
}
