//! Result Store - JSON result files on disk
//!
//! Each file holds one trial: a `parameters` object describing the run, and
//! metric entries next to it.
//!
//! ```json
//! {"parameters": {"lr": 0.01, "seed": 43}, "ppo_reward": [[0.1, 0.4]], "steps": 100}
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::TrialRecord;
use crate::{Error, Result};

const PARAMETERS_KEY: &str = "parameters";

/// One stored trial: its parameters and its metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFile {
    parameters: Map<String, Value>,
    record: TrialRecord,
}

impl ResultFile {
    /// Create a result from its parameters and metrics.
    #[must_use]
    pub const fn new(parameters: Map<String, Value>, record: TrialRecord) -> Self {
        Self { parameters, record }
    }

    /// Parse a result file body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `value` is not an object or has no
    /// `parameters` object.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::InvalidInput("result file must be a JSON object".to_string()))?;
        let parameters = object
            .get(PARAMETERS_KEY)
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| Error::InvalidInput("missing \"parameters\" object".to_string()))?;

        let mut metrics = object.clone();
        metrics.remove(PARAMETERS_KEY);
        Ok(Self {
            parameters,
            record: TrialRecord::from_json_map(&metrics),
        })
    }

    /// Encode as a result file body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a metric is named `parameters` or
    /// holds a non-finite number, neither of which would read back intact.
    pub fn to_json(&self) -> Result<Value> {
        if self.record.contains(PARAMETERS_KEY) {
            return Err(Error::InvalidInput(format!(
                "metric name \"{PARAMETERS_KEY}\" is reserved for run parameters"
            )));
        }
        if let Some((name, _)) = self
            .record
            .iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(Error::InvalidInput(format!(
                "metric \"{name}\" holds a non-finite number, which JSON cannot store"
            )));
        }

        let Value::Object(mut object) = serde_json::to_value(&self.record)? else {
            return Err(Error::InvalidInput(
                "trial record did not encode as a JSON object".to_string(),
            ));
        };
        object.insert(PARAMETERS_KEY.to_string(), Value::Object(self.parameters.clone()));
        Ok(Value::Object(object))
    }

    /// Run parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    /// Trial metrics.
    #[must_use]
    pub const fn record(&self) -> &TrialRecord {
        &self.record
    }

    /// Take the trial metrics.
    #[must_use]
    pub fn into_record(self) -> TrialRecord {
        self.record
    }

    /// Check that every entry of `wanted` appears in the parameters with an
    /// equal value. Parameters not mentioned in `wanted` are ignored.
    #[must_use]
    pub fn matches(&self, wanted: &Map<String, Value>) -> bool {
        wanted
            .iter()
            .all(|(key, value)| self.parameters.get(key) == Some(value))
    }
}

/// Directory of JSON result files.
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    /// Create a store rooted at `root`. Nothing is read until a load call.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `result` as `root/file_name`, creating `root` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, file_name: &str, result: &ResultFile) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(file_name);
        let body = serde_json::to_string_pretty(&result.to_json()?)?;
        fs::write(&path, body)?;
        debug!(path = %path.display(), "saved result");
        Ok(path)
    }

    /// Read one result file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::Json`] if it
    /// is not JSON, and [`Error::InvalidResultFile`] if it is not a result.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ResultFile> {
        let path = path.as_ref();
        let value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        ResultFile::from_json(&value).map_err(|e| Error::InvalidResultFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load every `{result_name}*.json` file in the store whose parameters
    /// match `parameters`, in file-name order.
    ///
    /// Files without a `parameters` object are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed or a candidate file
    /// cannot be read or parsed as JSON.
    pub fn load_matching(
        &self,
        result_name: &str,
        parameters: &Map<String, Value>,
    ) -> Result<Vec<ResultFile>> {
        let mut matched = Vec::new();
        for path in self.candidates(result_name)? {
            match self.load(&path) {
                Ok(result) if result.matches(parameters) => matched.push(result),
                Ok(_) => debug!(path = %path.display(), "parameters differ, skipping"),
                Err(Error::InvalidResultFile { path, reason }) => {
                    warn!(path = %path.display(), %reason, "skipping result file");
                }
                Err(e) => return Err(e),
            }
        }
        debug!(result_name, matched = matched.len(), "loaded matching results");
        Ok(matched)
    }

    /// Trial records of every matching result file, ready to aggregate.
    ///
    /// # Errors
    ///
    /// Same as [`ResultStore::load_matching`].
    pub fn load_records(
        &self,
        result_name: &str,
        parameters: &Map<String, Value>,
    ) -> Result<Vec<TrialRecord>> {
        Ok(self
            .load_matching(result_name, parameters)?
            .into_iter()
            .map(ResultFile::into_record)
            .collect())
    }

    fn candidates(&self, result_name: &str) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if path.is_file()
                && file_name.starts_with(result_name)
                && path.extension().is_some_and(|ext| ext == "json")
            {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}
