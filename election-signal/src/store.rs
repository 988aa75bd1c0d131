use crate::model::TextClassifier;
use crate::types::{ArtifactPaths, PipelineError, RawArticleBatch, Result, TrainingRow, TrainingTable};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Reads and writes the three pipeline artifacts. Every write replaces the
/// whole file atomically; readers see either the old or the new content.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    paths: ArtifactPaths,
}

impl ArtifactStore {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn save_raw_batch(&self, articles: &RawArticleBatch) -> Result<()> {
        let bytes = serde_json::to_vec(articles)?;
        write_atomic(&self.paths.raw_batch, &bytes)?;
        info!("Saved {} articles to {}", articles.len(), self.paths.raw_batch.display());
        Ok(())
    }

    pub fn load_raw_batch(&self) -> Result<RawArticleBatch> {
        let path = &self.paths.raw_batch;
        let bytes = fs::read(path).map_err(|e| data_missing(path, e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| data_missing(path, format!("unreadable raw batch: {}", e)))
    }

    pub fn save_training_table(&self, table: &TrainingTable) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in table {
            writer.serialize(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| PipelineError::Io(e.into_error()))?;
        // A header-less empty table still needs the header to be readable.
        let bytes = if table.is_empty() { b"text,label\n".to_vec() } else { bytes };
        write_atomic(&self.paths.training_table, &bytes)?;
        info!("Saved training table with {} rows to {}", table.len(), self.paths.training_table.display());
        Ok(())
    }

    pub fn load_training_table(&self) -> Result<TrainingTable> {
        let path = &self.paths.training_table;
        let mut reader = csv::Reader::from_path(path).map_err(|e| data_missing(path, e.to_string()))?;
        reader
            .deserialize::<TrainingRow>()
            .collect::<std::result::Result<TrainingTable, _>>()
            .map_err(|e| data_missing(path, format!("unreadable training table: {}", e)))
    }

    pub fn save_model(&self, model: &TextClassifier) -> Result<()> {
        let bytes = serde_json::to_vec(model)?;
        write_atomic(&self.paths.model, &bytes)?;
        info!("Saved model {} to {}", model.summary().run_id, self.paths.model.display());
        Ok(())
    }

    /// A missing file and an undecodable file are reported as different
    /// errors.
    pub fn load_model(&self) -> Result<TextClassifier> {
        let path = &self.paths.model;
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PipelineError::ModelMissing { path: path.clone() });
            }
            Err(e) => {
                return Err(PipelineError::ModelCorrupt { path: path.clone(), reason: e.to_string() });
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| PipelineError::ModelCorrupt {
            path: path.clone(),
            reason: e.to_string(),
        })
    }
}

fn data_missing(path: &Path, reason: String) -> PipelineError {
    PipelineError::DataMissing { path: path.to_path_buf(), reason }
}

/// Write via a temp file in the target's directory, then rename over it.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| PipelineError::Io(e.error))?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
