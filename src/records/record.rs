//! Worker rows

use serde::Serialize;

use crate::error::{Result, WorkerError};

/// Fixed first line of every dataset
pub const HEADER: &str = "Name,Salary,Attendance";

/// One `name,salary,attendance` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerRecord {
    pub name: String,
    pub salary: String,
    pub attendance: u64,
}

impl WorkerRecord {
    /// A freshly hired worker; attendance always starts at zero
    pub fn new(name: impl Into<String>, salary: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let salary = salary.into();
        validate_field("worker name", &name)?;
        validate_field("salary", &salary)?;
        Ok(Self {
            name,
            salary,
            attendance: 0,
        })
    }

    /// Render as a stored line, without the trailing newline
    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.name, self.salary, self.attendance)
    }

    /// Parse a stored line; `None` for anything that is not a well-formed row
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim().split(',').collect();
        let [name, salary, attendance] = fields.as_slice() else {
            return None;
        };
        Some(Self {
            name: name.to_string(),
            salary: salary.to_string(),
            attendance: attendance.trim().parse().ok()?,
        })
    }
}

fn validate_field(label: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(WorkerError::InvalidInput(format!(
            "{} must not be empty",
            label
        )));
    }
    if value.contains([',', '\n', '\r']) {
        return Err(WorkerError::InvalidInput(format!(
            "{} must not contain commas or line breaks",
            label
        )));
    }
    Ok(())
}

/// Every well-formed row of a dataset, header and malformed lines skipped
pub fn parse_rows(text: &str) -> Vec<WorkerRecord> {
    text.lines()
        .filter(|line| line.trim() != HEADER)
        .filter_map(WorkerRecord::parse_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_at_zero() {
        let record = WorkerRecord::new("Alice", "50000").unwrap();
        assert_eq!(record.attendance, 0);
        assert_eq!(record.to_line(), "Alice,50000,0");
    }

    #[test]
    fn test_new_record_rejects_bad_fields() {
        assert!(matches!(
            WorkerRecord::new("", "50000"),
            Err(WorkerError::InvalidInput(_))
        ));
        assert!(matches!(
            WorkerRecord::new("Alice", ""),
            Err(WorkerError::InvalidInput(_))
        ));
        assert!(matches!(
            WorkerRecord::new("Smith, Alice", "50000"),
            Err(WorkerError::InvalidInput(_))
        ));
        assert!(matches!(
            WorkerRecord::new("Alice", "50\n000"),
            Err(WorkerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_line() {
        let record = WorkerRecord::parse_line("Bob,42000,7\n").unwrap();
        assert_eq!(record.name, "Bob");
        assert_eq!(record.salary, "42000");
        assert_eq!(record.attendance, 7);

        assert!(WorkerRecord::parse_line("Bob,42000").is_none());
        assert!(WorkerRecord::parse_line("Bob,42000,7,extra").is_none());
        assert!(WorkerRecord::parse_line("Bob,42000,many").is_none());
    }

    #[test]
    fn test_parse_rows_skips_header_and_garbage() {
        let text = "Name,Salary,Attendance\nAlice,50000,2\nbroken\nBob,42000,0\n";
        let rows = parse_rows(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[1].name, "Bob");
    }
}
