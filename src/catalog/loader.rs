use super::error::TableError;
use super::record::{LocationRecord, LocationTable, TableOrigin};
use crate::config::TableConfig;
use crate::observability::OperationTimer;
use csv::{ReaderBuilder, StringRecord, Trim};
use moka::sync::Cache;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

pub const DEFAULT_DELIMITER: u8 = b';';

/// Lowercase fragments that mark a header row in the source column
pub const DEFAULT_HEADER_MARKERS: &[&str] = &["ancien"];

/// Raw input for the loader: a file on disk or bytes already in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<PathBuf> for TableSource {
    fn from(path: PathBuf) -> Self {
        TableSource::Path(path)
    }
}

impl From<&Path> for TableSource {
    fn from(path: &Path) -> Self {
        TableSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for TableSource {
    fn from(bytes: Vec<u8>) -> Self {
        TableSource::Bytes(bytes)
    }
}

impl From<&[u8]> for TableSource {
    fn from(bytes: &[u8]) -> Self {
        TableSource::Bytes(bytes.to_vec())
    }
}

impl From<&str> for TableSource {
    fn from(text: &str) -> Self {
        TableSource::Bytes(text.as_bytes().to_vec())
    }
}

/// Parses semicolon-separated `source;quantity;destination` tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoader {
    delimiter: u8,
    header_markers: Vec<String>,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            header_markers: DEFAULT_HEADER_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl TableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &TableConfig) -> Self {
        let delimiter = match config.delimiter.as_bytes() {
            [byte] => *byte,
            _ => {
                warn!(
                    delimiter = %config.delimiter,
                    "Table delimiter must be a single ASCII character, using ';'"
                );
                DEFAULT_DELIMITER
            }
        };

        Self::new()
            .with_delimiter(delimiter)
            .with_header_markers(&config.header_markers)
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.header_markers = markers
            .into_iter()
            .map(|m| m.as_ref().trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        self
    }

    /// Load a table, substituting the built-in sample table on any failure.
    pub fn load(&self, source: impl Into<TableSource>) -> LocationTable {
        let source = source.into();
        let timer = OperationTimer::new("load_table");

        let (result, origin) = match source {
            TableSource::Path(path) => {
                let result = self.try_load_file(&path);
                (result, TableOrigin::File(path))
            }
            TableSource::Bytes(bytes) => (self.parse(&bytes), TableOrigin::Bytes),
        };
        timer.finish();

        match result {
            Ok(records) => {
                info!(records = records.len(), origin = %origin, "Reference table loaded");
                LocationTable::new(records, origin)
            }
            Err(e) => {
                warn!(error = %e, origin = %origin, "Reference table unavailable, using built-in sample table");
                LocationTable::fallback(e.to_string())
            }
        }
    }

    pub fn try_load_file(&self, path: &Path) -> Result<Vec<LocationRecord>, TableError> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TableError::FileNotFound(path.to_path_buf()),
            _ => TableError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        self.parse(&bytes)
    }

    /// Parse table bytes into records, dropping rows that carry no usable data.
    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<LocationRecord>, TableError> {
        let text = std::str::from_utf8(bytes).map_err(|e| TableError::InvalidEncoding {
            offset: e.valid_up_to(),
        })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result.map_err(|e| TableError::Malformed {
                line: e.position().map(|p| p.line()).unwrap_or_default(),
                message: e.to_string(),
            })?;

            match self.parse_row(&row) {
                Some(record) => records.push(record),
                None => debug!(
                    line = row.position().map(|p| p.line()).unwrap_or_default(),
                    "Skipping table row"
                ),
            }
        }

        if records.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(records)
    }

    fn parse_row(&self, row: &StringRecord) -> Option<LocationRecord> {
        if row.len() < 3 {
            return None;
        }

        let source = row.get(0)?.trim();
        let quantity = row.get(1)?.trim();
        let destination = row.get(2)?.trim();

        if source.is_empty() || destination.is_empty() || self.is_header_or_noise(source) {
            return None;
        }

        Some(LocationRecord::new(source, parse_quantity(quantity), destination))
    }

    fn is_header_or_noise(&self, source: &str) -> bool {
        if source == "1" {
            return true;
        }
        let lower = source.to_lowercase();
        self.header_markers.iter().any(|marker| lower.contains(marker.as_str()))
    }
}

/// Parse a quantity cell; anything that is not a non-negative number is 0.
///
/// Decimal cells are truncated, so `"10.0"` exported by a spreadsheet reads as 10.
pub fn parse_quantity(raw: &str) -> u32 {
    if let Ok(value) = raw.parse::<u32>() {
        return value;
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) => {
            value.trunc() as u32
        }
        _ => 0,
    }
}

/// Load a table with the default loader settings.
pub fn load_table(source: impl Into<TableSource>) -> LocationTable {
    TableLoader::default().load(source)
}

static TABLE_CACHE: LazyLock<Cache<PathBuf, Arc<LocationTable>>> =
    LazyLock::new(|| Cache::builder().max_capacity(16).build());

/// Table for `path`, loaded on first use and kept for the life of the process.
///
/// The cache is keyed by path only: the loader settings of the first call win.
pub fn cached_table(loader: &TableLoader, path: impl AsRef<Path>) -> Arc<LocationTable> {
    let path = path.as_ref().to_path_buf();
    TABLE_CACHE.get_with(path.clone(), || Arc::new(loader.load(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_column_rows() {
        let records = TableLoader::new()
            .parse(b"L-10-06-5;10;A-01-01\n  L-10-07-1 ; 3 ; B-02-04 \n")
            .unwrap();

        assert_eq!(
            records,
            vec![
                LocationRecord::new("L-10-06-5", 10, "A-01-01"),
                LocationRecord::new("L-10-07-1", 3, "B-02-04"),
            ]
        );
    }

    #[test]
    fn test_parse_drops_header_and_noise_rows() {
        let table = "Ancien emplacement;Quantite;Nouveau\n1;2;3\n;4;C-01-01\nL-1-1;7;A-1\n";
        let records = TableLoader::new().parse(table.as_bytes()).unwrap();

        assert_eq!(records, vec![LocationRecord::new("L-1-1", 7, "A-1")]);
    }

    #[test]
    fn test_parse_drops_short_rows_and_keeps_first_three_columns() {
        let table = "ONLY;TWO\nL-1-1;7;A-1;extra;columns\n";
        let records = TableLoader::new().parse(table.as_bytes()).unwrap();

        assert_eq!(records, vec![LocationRecord::new("L-1-1", 7, "A-1")]);
    }

    #[test]
    fn test_quote_in_cell_is_plain_text() {
        let records = TableLoader::new()
            .parse(b"L-1;1;\"A-1\nL-2;2;A-2\nL-3;3;A-3\n")
            .unwrap();

        assert_eq!(
            records,
            vec![
                LocationRecord::new("L-1", 1, "\"A-1"),
                LocationRecord::new("L-2", 2, "A-2"),
                LocationRecord::new("L-3", 3, "A-3"),
            ]
        );
    }

    #[test]
    fn test_bad_quantity_defaults_to_zero() {
        let records = TableLoader::new()
            .parse(b"L-1-1;abc;A-1\nL-1-2;;A-2\nL-1-3;-4;A-3\nL-1-4;12.0;A-4\n")
            .unwrap();

        let quantities: Vec<u32> = records.iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, vec![0, 0, 0, 12]);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("25"), 25);
        assert_eq!(parse_quantity("7.9"), 7);
        assert_eq!(parse_quantity("NaN"), 0);
        assert_eq!(parse_quantity("1e20"), 0);
        assert_eq!(parse_quantity("dix"), 0);
    }

    #[test]
    fn test_parse_strips_utf8_bom() {
        let mut bytes = "\u{feff}".as_bytes().to_vec();
        bytes.extend_from_slice(b"L-1-1;1;A-1\n");

        let records = TableLoader::new().parse(&bytes).unwrap();
        assert_eq!(records[0].source_code, "L-1-1");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = TableLoader::new().parse(b"L-1-1;1;A-\xff\n").unwrap_err();
        assert!(matches!(err, TableError::InvalidEncoding { offset: 10 }));
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let err = TableLoader::new().parse(b"ancien;quantite;nouveau\n").unwrap_err();
        assert!(matches!(err, TableError::Empty));
    }

    #[test]
    fn test_load_falls_back_on_garbage() {
        let table = load_table(&b"\xff\xfe\x00garbage"[..]);

        assert!(table.origin().is_fallback());
        assert!(!table.is_empty());
    }

    #[test]
    fn test_custom_delimiter_and_markers() {
        let loader = TableLoader::new()
            .with_delimiter(b',')
            .with_header_markers(["Source"]);
        let records = loader.parse(b"source,qty,dest\nL-1-1,2,A-1\n").unwrap();

        assert_eq!(records, vec![LocationRecord::new("L-1-1", 2, "A-1")]);
    }

    #[test]
    fn test_from_config_rejects_multi_char_delimiter() {
        let config = TableConfig {
            delimiter: ";;".to_string(),
            ..TableConfig::default()
        };
        assert_eq!(TableLoader::from_config(&config), TableLoader::default());
    }
}
