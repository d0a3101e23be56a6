//! Output formatting for CLI commands.
//!
//! Supports table (human-readable), CSV and JSON output formats. In JSON mode
//! API commands pass the server's body through untouched; derived views are
//! serialized with `serde_json`.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles table, CSV and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Check if CSV format is selected.
    #[must_use]
    pub const fn is_csv(&self) -> bool {
        matches!(self.format, Format::Csv)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => value.write_table(writer)?,
            Format::Csv => value.write_csv(writer)?,
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;

    /// Write the value as CSV. Defaults to the table rendering for values
    /// without a tabular shape.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.write_table(writer)
    }
}

/// A borderless, column-aligned table.
///
/// Column widths follow the widest cell. Headers are upper-cased and
/// underlined with a rule spanning the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty cells.
    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = row.into_iter().map(Into::into).collect();
        if cells.len() < self.headers.len() {
            cells.resize(self.headers.len(), String::new());
        }
        self.rows.push(cells);
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0; columns];
        for (i, header) in self.headers.iter().enumerate() {
            widths[i] = header.chars().count();
        }
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        widths
    }

    /// Render the table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let widths = self.widths();
        let headers: Vec<String> = self.headers.iter().map(|h| h.to_uppercase()).collect();
        write_line(writer, &headers, &widths)?;
        let rule = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        writeln!(writer, "{}", "─".repeat(rule))?;
        for row in &self.rows {
            write_line(writer, row, &widths)?;
        }
        Ok(())
    }

    /// Write the rows as CSV, optionally preceded by the header row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_csv<W: Write>(&self, writer: &mut W, include_header: bool) -> Result<(), CliError> {
        let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        if include_header {
            csv.write_record(&self.headers)?;
        }
        for row in &self.rows {
            csv.write_record(row)?;
        }
        csv.flush()?;
        Ok(())
    }
}

fn write_line<W: Write>(writer: &mut W, cells: &[String], widths: &[usize]) -> Result<(), CliError> {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let width = widths.get(i).copied().unwrap_or(0);
        line.push_str(&format!("{cell:<width$}"));
    }
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}

/// Simple message output.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message text.
    pub message: String,
}

impl Message {
    /// Create an informational message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.message)?;
        Ok(())
    }
}

/// Write a response body verbatim, ending with a newline.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_raw<W: Write>(writer: &mut W, body: &[u8]) -> Result<(), CliError> {
    writer.write_all(body)?;
    if !body.ends_with(b"\n") {
        writeln!(writer)?;
    }
    Ok(())
}

/// Re-indent a JSON document with `indent` spaces, keeping key order.
///
/// # Errors
///
/// Returns an error if the body is not valid JSON.
pub fn pretty_json(body: &[u8], indent: usize) -> Result<String, CliError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value
        .serialize(&mut ser)
        .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
    String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
}

/// Space separated items in brackets, e.g. `[crm sales]`.
pub fn bracketed<S: AsRef<str>>(items: &[S]) -> String {
    let joined: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    format!("[{}]", joined.join(" "))
}
