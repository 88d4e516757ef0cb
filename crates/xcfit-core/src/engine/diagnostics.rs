use nalgebra::DMatrix;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Receives intermediate arrays of a failed evaluation for offline inspection.
pub trait DiagnosticSink: Send + Sync {
    fn capture(&self, label: &str, values: &DMatrix<f64>) -> Result<(), DiagnosticsError>;
}

/// Discards every capture.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn capture(&self, _label: &str, _values: &DMatrix<f64>) -> Result<(), DiagnosticsError> {
        Ok(())
    }
}

/// Keeps captures in memory, in capture order.
#[derive(Debug, Default)]
pub struct MemorySink {
    captures: Mutex<Vec<(String, DMatrix<f64>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captures(&self) -> Vec<(String, DMatrix<f64>)> {
        self.captures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, label: &str) -> Option<DMatrix<f64>> {
        self.captures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, values)| values.clone())
    }
}

impl DiagnosticSink for MemorySink {
    fn capture(&self, label: &str, values: &DMatrix<f64>) -> Result<(), DiagnosticsError> {
        self.captures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((label.to_string(), values.clone()));
        Ok(())
    }
}

/// Writes every capture to `<dir>/<label>.csv`, one matrix row per line.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DiagnosticSink for DirectorySink {
    fn capture(&self, label: &str, values: &DMatrix<f64>) -> Result<(), DiagnosticsError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{label}.csv"));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        for row in values.row_iter() {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        debug!(path = %path.display(), rows = values.nrows(), "Wrote diagnostic capture.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_sink_keeps_captures_in_order() {
        let sink = MemorySink::new();
        sink.capture("a", &DMatrix::from_element(1, 1, 1.0)).unwrap();
        sink.capture("b", &DMatrix::from_element(2, 1, 2.0)).unwrap();

        let labels: Vec<String> = sink.captures().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(sink.get("b").unwrap().nrows(), 2);
        assert!(sink.get("c").is_none());
    }

    #[test]
    fn directory_sink_writes_one_csv_per_label() {
        let dir = tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("nan_dump"));
        let values = DMatrix::from_row_slice(2, 2, &[1.0, 2.5, f64::NAN, -4.0]);
        sink.capture("densities", &values).unwrap();

        let contents = fs::read_to_string(dir.path().join("nan_dump/densities.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["1,2.5", "NaN,-4"]);
    }

    #[test]
    fn null_sink_accepts_anything() {
        assert!(NullSink.capture("x", &DMatrix::zeros(0, 0)).is_ok());
    }
}
