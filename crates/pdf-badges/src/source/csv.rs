use super::RecordSource;
use crate::types::{BadgeRecord, Result};
use std::path::PathBuf;

/// Comma-separated file with one badge per row and no header row.
///
/// Rows may have any number of columns; only the first three are used.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvSource {
    fn with_records<T>(
        self,
        f: impl FnOnce(&mut dyn Iterator<Item = Result<BadgeRecord>>) -> Result<T>,
    ) -> Result<T> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        log::debug!("Reading badges from {}", self.path.display());

        let mut records = reader.into_records().map(|row| -> Result<BadgeRecord> {
            let row = row?;
            Ok(row.iter().collect::<BadgeRecord>())
        });
        f(&mut records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BadgeError;
    use std::io::Write;

    fn read_all(source: CsvSource) -> Result<Vec<BadgeRecord>> {
        source.with_records(|records| records.collect())
    }

    #[test]
    fn test_rows_of_varying_width() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Alice Doe,Acme Corp,Speaker").unwrap();
        writeln!(file, "Bob").unwrap();
        writeln!(file, "\"Carol, Jr.\",,Staff,extra").unwrap();

        let records = read_all(CsvSource::new(file.path())).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].role(), "Speaker");
        assert_eq!(records[1].len(), 1);
        assert_eq!(records[1].name(), "Bob");
        assert_eq!(records[2].name(), "Carol, Jr.");
        assert_eq!(records[2].company(), "");
        assert_eq!(records[2].len(), 3);
    }

    #[test]
    fn test_first_row_is_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,company,role").unwrap();

        let records = read_all(CsvSource::new(file.path())).unwrap();
        assert_eq!(records, vec![BadgeRecord::new(["name", "company", "role"])]);
    }

    #[test]
    fn test_missing_file() {
        let result = read_all(CsvSource::new("/nonexistent/badges.csv"));
        assert!(matches!(result, Err(BadgeError::Csv(_))));
    }
}
