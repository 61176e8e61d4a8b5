use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::job::JobInfo;

/// The single persisted record: the most recently parsed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredJob {
    pub current_job: JobInfo,
    pub saved_at: DateTime<Utc>,
}

/// JSON file holding the current job. Every save overwrites the previous one.
#[derive(Debug, Clone)]
pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JobStore { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn save(&self, job: &JobInfo) -> Result<StoredJob> {
        let record = StoredJob { current_job: job.clone(), saved_at: Utc::now() };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create store dir {}", dir.display()))?;
        }
        // readers never see a half-written file
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&record)?;
        fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| format!("replace {}", self.path.display()))?;
        Ok(record)
    }

    pub fn load(&self) -> Result<Option<StoredJob>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("read {}", self.path.display())),
        };
        let record = serde_json::from_slice(&bytes).with_context(|| format!("decode {}", self.path.display()))?;
        Ok(Some(record))
    }

    /// Remove the stored job. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}
