use std::path::Path;

use tracing::warn;

use super::console::ConsoleRenderer;
use super::csv::CsvSink;
use super::layout::StatsLayout;
use crate::error::SinkError;
use crate::metrics::StatsRow;

/// Fans stats rows out to the console and the optional CSV file.
///
/// A sink that fails mid-run is logged once and disabled; the run goes on.
#[derive(Debug)]
pub struct StatsSink {
    layout: StatsLayout,
    console: Option<ConsoleRenderer>,
    csv: Option<CsvSink>,
}

impl StatsSink {
    /// Prints the header and opens the CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error when the header cannot be written or the CSV file
    /// cannot be created.
    pub async fn open(
        layout: StatsLayout,
        console: bool,
        csv_path: Option<&Path>,
    ) -> Result<Self, SinkError> {
        let header = layout.header();
        let console = if console {
            let mut renderer = ConsoleRenderer::new(&header);
            renderer
                .print_header(&header)
                .map_err(|err| SinkError::Console { source: err })?;
            Some(renderer)
        } else {
            None
        };
        let csv = match csv_path {
            Some(path) => Some(CsvSink::create(path, &header).await?),
            None => None,
        };
        Ok(Self {
            layout,
            console,
            csv,
        })
    }

    pub async fn write(&mut self, row: &StatsRow) {
        let console_error = match self.console.as_mut() {
            Some(console) => console
                .render(&self.layout.console_cells(row), row.fixed)
                .err(),
            None => None,
        };
        if let Some(err) = console_error {
            warn!("Disabling console stats output: {}", err);
            self.console = None;
        }

        let csv_error = match self.csv.as_mut() {
            Some(csv) => csv.write_row(&self.layout.csv_cells(row)).await.err(),
            None => None,
        };
        if let Some(err) = csv_error {
            warn!("Disabling CSV stats output: {}", err);
            self.csv = None;
        }
    }

    pub fn finish(&mut self) {
        if let Some(console) = self.console.as_mut()
            && let Err(err) = console.finish()
        {
            warn!("Failed to finish console stats output: {}", err);
        }
        self.csv = None;
    }
}
