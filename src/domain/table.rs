//! Tabular export of scraped biomarker records.

use super::BiomarkerRecord;
use crate::error::ScrapeResult;
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;

/// Ordered table of biomarker records with fixed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiomarkerTable {
    records: Vec<BiomarkerRecord>,
}

impl BiomarkerTable {
    /// Column order of the exported table.
    pub const COLUMNS: [&'static str; 5] = ["category", "name", "status", "value", "units"];

    pub fn new(records: Vec<BiomarkerRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BiomarkerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<BiomarkerRecord> {
        self.records
    }

    /// Conventional export file name for a client identifier.
    pub fn file_name(client_id: &str) -> String {
        format!("{}_functionhealth.csv", client_id)
    }

    /// Writes the table as CSV. The header row is written even when the
    /// table is empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> ScrapeResult<()> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record(Self::COLUMNS)?;
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> ScrapeResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }

    pub fn save_csv(&self, path: &Path) -> ScrapeResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }
}

impl From<Vec<BiomarkerRecord>> for BiomarkerTable {
    fn from(records: Vec<BiomarkerRecord>) -> Self {
        Self::new(records)
    }
}
