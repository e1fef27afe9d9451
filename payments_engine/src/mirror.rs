//! JSON mirror of the payments table
//!
//! After every mutation the full payment set is written to a side file as a pretty-printed JSON array. The file is
//! always overwritten wholesale. It is never read back by the engine and is not authoritative.
//!
//! The snapshot is first written to a temporary sibling file (`<name>.tmp`), which is then renamed over the target, so
//! a reader never sees a partially written mirror.
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::*;
use thiserror::Error;

use crate::db_types::Payment;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Could not serialize the payment snapshot. {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Could not write the mirror file {path}. {source}")]
    WriteError { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Clone)]
pub struct MirrorWriter {
    path: PathBuf,
}

impl MirrorWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Overwrites the mirror file with the given snapshot.
    pub async fn write_snapshot(&self, payments: &[Payment]) -> Result<(), MirrorError> {
        let json = serde_json::to_string_pretty(payments)?;
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|source| MirrorError::WriteError { path: tmp_path.clone(), source })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| MirrorError::WriteError { path: self.path.clone(), source })?;
        trace!("🪞️ Mirror {} refreshed with {} payments", self.path.display(), payments.len());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| OsString::from("mirror"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
