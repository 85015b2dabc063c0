use crate::args::Mode;
use crate::metrics::StatsRow;

use super::format::format_bytes;

/// Column set of the stats line for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsLayout {
    transfer: Option<&'static str>,
    latency_labels: Vec<String>,
    hosts: Vec<String>,
}

impl StatsLayout {
    /// `hosts` should be empty for a single-host run.
    #[must_use]
    pub fn new(mode: &Mode, latency_labels: Vec<String>, hosts: Vec<String>) -> Self {
        let transfer = match mode {
            Mode::Login => None,
            Mode::Upload { .. } => Some("upload"),
            Mode::Download { .. } => Some("download"),
        };
        Self {
            transfer,
            latency_labels,
            hosts,
        }
    }

    #[must_use]
    pub fn header(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        columns.push("time".to_owned());
        let latency_prefix = match self.transfer {
            None => {
                columns.extend(
                    [
                        "requests",
                        "requests/s",
                        "success",
                        "success/s",
                        "timeout",
                        "rejected",
                        "in-flight",
                    ]
                    .map(str::to_owned),
                );
                "latency".to_owned()
            }
            Some(direction) => {
                columns.extend(
                    [
                        "total",
                        "total/s",
                        "complete",
                        "complete/s",
                        "timeout",
                        "rejected",
                        "in-flight",
                        "traffic",
                        "traffic/s",
                    ]
                    .map(str::to_owned),
                );
                format!("{}-time", direction)
            }
        };
        columns.extend(
            self.latency_labels
                .iter()
                .map(|label| format!("{}{}", latency_prefix, label)),
        );
        columns.extend(self.hosts.iter().map(|host| format!("server:{}", host)));
        columns
    }

    /// Raw numbers, suitable for CSV.
    #[must_use]
    pub fn csv_cells(&self, row: &StatsRow) -> Vec<String> {
        self.cells(row, |bytes| bytes.to_string())
    }

    /// Numbers with human readable traffic, suitable for the console.
    #[must_use]
    pub fn console_cells(&self, row: &StatsRow) -> Vec<String> {
        self.cells(row, format_bytes)
    }

    fn cells(&self, row: &StatsRow, bytes: fn(u64) -> String) -> Vec<String> {
        let snapshot = &row.snapshot;
        let rates = &row.rates;
        let mut cells = vec![
            row.time.clone(),
            snapshot.requests.to_string(),
            rates.requests_per_sec.to_string(),
            snapshot.success.to_string(),
            rates.success_per_sec.to_string(),
            snapshot.timeouts.to_string(),
            snapshot.rejected.to_string(),
            snapshot.in_flight.to_string(),
        ];
        if self.transfer.is_some() {
            cells.push(bytes(snapshot.traffic_bytes));
            cells.push(bytes(rates.traffic_per_sec));
        }
        cells.extend(snapshot.latency_buckets.iter().map(u64::to_string));
        if let Some(hosts) = row.hosts.as_ref() {
            cells.extend(hosts.iter().map(u64::to_string));
        }
        cells
    }
}
