//! Stats line output: console rendering and the CSV file.
mod console;
mod csv;
mod format;
mod layout;
mod sink;

pub use console::ConsoleRenderer;
pub use csv::CsvSink;
pub use format::{format_bytes, format_duration, format_x100};
pub use layout::StatsLayout;
pub use sink::StatsSink;
