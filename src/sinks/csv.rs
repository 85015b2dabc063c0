use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::SinkError;

/// Append-only CSV file: one header, then one line per stats row.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl CsvSink {
    /// Creates (or truncates) `path` and writes the header.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created or written.
    pub async fn create(path: &Path, header: &[String]) -> Result<Self, SinkError> {
        let file = File::create(path)
            .await
            .map_err(|err| SinkError::CreateCsv {
                path: path.to_path_buf(),
                source: err,
            })?;
        let mut sink = Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        };
        sink.write_row(header).await?;
        Ok(sink)
    }

    /// Appends one line and flushes it.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub async fn write_row(&mut self, cells: &[String]) -> Result<(), SinkError> {
        let line = csv_line(cells);
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|err| self.write_error(err))?;
        self.writer
            .flush()
            .await
            .map_err(|err| self.write_error(err))
    }

    fn write_error(&self, source: std::io::Error) -> SinkError {
        SinkError::WriteCsv {
            path: self.path.clone(),
            source,
        }
    }
}

fn csv_line(cells: &[String]) -> String {
    let mut line = cells
        .iter()
        .map(|cell| escape(cell))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn escape(cell: &str) -> Cow<'_, str> {
    if cell.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}
