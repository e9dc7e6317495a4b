//! Live snapshot feed.
//!
//! The latest cycle snapshot is rewritten every cycle for dashboards. Each
//! write goes to a sibling temp file that is then renamed over the target,
//! so readers always see one whole document (last writer wins).

use crate::ResultsResult;
use crate::types::CycleSnapshot;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct LiveFeed {
    path: PathBuf,
}

impl LiveFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn publish(&self, snapshot: &CycleSnapshot) -> ResultsResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn read(&self) -> ResultsResult<CycleSnapshot> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
