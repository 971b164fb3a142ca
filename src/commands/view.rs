//! View command - Show the workers in a dataset

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};

use super::dataset::unwrap_gated;
use worker_ledger::records::{parse_rows, WorkerRecord};
use worker_ledger::service::{KeyProvider, Session, WorkerService};

/// Output format for the view command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFormat {
    /// Stored text, exactly as persisted
    Raw,
    Table,
    Json,
}

impl ViewFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "raw" | "csv" => Some(Self::Raw),
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Execute the view command; `None` when the gate blocked it
pub fn execute<P: KeyProvider>(
    service: &mut WorkerService<P>,
    session: &mut Session,
    dataset: &str,
    format: ViewFormat,
) -> Result<Option<String>> {
    let outcome = service.read_dataset(session, dataset)?;
    let Some(text) = unwrap_gated(session, outcome) else {
        return Ok(None);
    };

    let rendered = match format {
        ViewFormat::Raw => text.trim_end_matches('\n').to_string(),
        ViewFormat::Table => format_as_table(&parse_rows(&text)),
        ViewFormat::Json => serde_json::to_string_pretty(&parse_rows(&text))?,
    };
    Ok(Some(rendered))
}

fn format_as_table(records: &[WorkerRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name"),
        Cell::new("Salary"),
        Cell::new("Attendance"),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(&record.salary).set_alignment(CellAlignment::Right),
            Cell::new(record.attendance).set_alignment(CellAlignment::Right),
        ]);
    }

    format!("{}\n\nTotal: {} worker(s)", table, records.len())
}
