use std::io::{IsTerminal, Write};

use crossterm::{
    cursor, queue,
    style::Print,
    terminal::{Clear, ClearType},
};

const MIN_COLUMN_WIDTH: usize = 8;

/// Right-aligned stats table on stdout.
///
/// On a terminal every row is drawn over the current line and fixed rows are
/// committed with a newline. Without a terminal only fixed rows are printed.
#[derive(Debug)]
pub struct ConsoleRenderer {
    interactive: bool,
    widths: Vec<usize>,
    line_open: bool,
}

impl ConsoleRenderer {
    #[must_use]
    pub fn new(header: &[String]) -> Self {
        Self::with_mode(header, std::io::stdout().is_terminal())
    }

    #[must_use]
    pub fn with_mode(header: &[String], interactive: bool) -> Self {
        Self {
            interactive,
            widths: header
                .iter()
                .map(|column| column.len().max(MIN_COLUMN_WIDTH))
                .collect(),
            line_open: false,
        }
    }

    /// # Errors
    ///
    /// Returns an error when stdout cannot be written.
    pub fn print_header(&mut self, header: &[String]) -> std::io::Result<()> {
        self.print_header_to(&mut std::io::stdout().lock(), header)
    }

    /// # Errors
    ///
    /// Returns an error when stdout cannot be written.
    pub fn render(&mut self, cells: &[String], fixed: bool) -> std::io::Result<()> {
        self.render_to(&mut std::io::stdout().lock(), cells, fixed)
    }

    /// Terminates a line left open by an intermediate row.
    ///
    /// # Errors
    ///
    /// Returns an error when stdout cannot be written.
    pub fn finish(&mut self) -> std::io::Result<()> {
        self.finish_to(&mut std::io::stdout().lock())
    }

    pub(crate) fn print_header_to<W: Write>(
        &mut self,
        out: &mut W,
        header: &[String],
    ) -> std::io::Result<()> {
        writeln!(out, "{}", self.format_line(header))?;
        out.flush()
    }

    pub(crate) fn render_to<W: Write>(
        &mut self,
        out: &mut W,
        cells: &[String],
        fixed: bool,
    ) -> std::io::Result<()> {
        let line = self.format_line(cells);
        if self.interactive {
            queue!(
                out,
                cursor::MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(&line)
            )?;
            if fixed {
                queue!(out, Print("\n"))?;
            }
            self.line_open = !fixed;
        } else if fixed {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }

    pub(crate) fn finish_to<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        if self.line_open {
            writeln!(out)?;
            self.line_open = false;
        }
        out.flush()
    }

    fn format_line(&self, cells: &[String]) -> String {
        cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let width = self
                    .widths
                    .get(index)
                    .copied()
                    .unwrap_or(MIN_COLUMN_WIDTH);
                format!("{:>width$}", cell, width = width)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
