use crate::normalize::CodeNormalizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Sample rows served when no usable reference table can be loaded
const FALLBACK_RECORDS: [(&str, u32, &str); 3] = [
    ("TEST001", 10, "A-01-01"),
    ("TEST002", 25, "A-01-02"),
    ("TEST003", 5, "B-01-01"),
];

/// One row of the reference table: where an item currently sits, how many
/// pieces to move, and where they go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub source_code: String,
    pub quantity: u32,
    pub destination_code: String,
}

impl LocationRecord {
    pub fn new(
        source_code: impl Into<String>,
        quantity: u32,
        destination_code: impl Into<String>,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            quantity,
            destination_code: destination_code.into(),
        }
    }
}

/// Where the records of a [`LocationTable`] came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOrigin {
    File(PathBuf),
    Bytes,
    /// The built-in sample table, substituted after a load failure
    Fallback { reason: String },
}

impl TableOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TableOrigin::Fallback { .. })
    }
}

impl fmt::Display for TableOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableOrigin::File(path) => write!(f, "{}", path.display()),
            TableOrigin::Bytes => write!(f, "in-memory table"),
            TableOrigin::Fallback { reason } => write!(f, "built-in sample table ({reason})"),
        }
    }
}

/// Ordered, read-only set of location records loaded once per process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTable {
    records: Vec<LocationRecord>,
    origin: TableOrigin,
}

impl LocationTable {
    pub fn new(records: Vec<LocationRecord>, origin: TableOrigin) -> Self {
        Self { records, origin }
    }

    pub fn fallback(reason: impl Into<String>) -> Self {
        let records = FALLBACK_RECORDS
            .iter()
            .map(|(source, quantity, destination)| LocationRecord::new(*source, *quantity, *destination))
            .collect();

        Self {
            records,
            origin: TableOrigin::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn origin(&self) -> &TableOrigin {
        &self.origin
    }

    /// First record whose normalized source code equals `code`.
    ///
    /// `code` must already be normalized with the same `normalizer`.
    pub fn find_source(&self, code: &str, normalizer: &CodeNormalizer) -> Option<&LocationRecord> {
        self.records
            .iter()
            .find(|record| normalizer.normalize(&record.source_code) == code)
    }
}
