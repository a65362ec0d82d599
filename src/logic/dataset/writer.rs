use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, Writer};

use super::record::{collection_columns, DatasetRecord};
use crate::logic::error::{PipelineError, PipelineResult};

/// Append-only CSV writer for collected samples
pub struct DatasetWriter {
    writer: Writer<File>,
    path: PathBuf,
    rows_written: usize,
}

impl DatasetWriter {
    /// Open `path` for appending; the header is written only when the file
    /// is new or empty
    ///
    /// An existing file must already carry the collection header, otherwise
    /// `SchemaMismatch` and nothing is written.
    pub fn open(path: &Path) -> PipelineResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        if !is_new {
            ensure_collection_header(path)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = Writer::from_writer(file);

        if is_new {
            writer.write_record(collection_columns())?;
            writer.flush()?;
        }

        Ok(Self { writer, path: path.to_path_buf(), rows_written: 0 })
    }

    pub fn append(&mut self, record: &DatasetRecord) -> PipelineResult<()> {
        self.writer.write_record(record.to_fields())?;
        // Rows survive an interrupted collection
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn ensure_collection_header(path: &Path) -> PipelineResult<()> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let found: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let expected = collection_columns();

    if found != expected {
        return Err(PipelineError::SchemaMismatch { expected, found });
    }
    Ok(())
}
