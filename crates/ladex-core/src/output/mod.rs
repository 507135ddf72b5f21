//! Durable outputs: per-document JSON snapshots and shared append-only CSVs.
//!
//! The sink assumes a single writer per output directory. Rows are only ever
//! appended; the header row is written exactly once, guarded by a file
//! existence check at open time. That check-then-write is not safe under
//! concurrent writers, so concurrent invocations across processes are
//! unsupported.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing::debug;

use crate::error::OutputError;
use crate::models::record::{BolRecord, ExtractionRecord, WaybillRecord};

const BOL_HEADERS_FILE: &str = "bol_headers.csv";
const BOL_LINES_FILE: &str = "bol_lines.csv";
const WAYBILLS_FILE: &str = "waybills.csv";

/// Raw-text debug dumps are truncated to this many characters.
const DEBUG_DUMP_LIMIT: usize = 20_000;

const BOL_HEADER_COLUMNS: [&str; 7] = [
    "id",
    "bol_number",
    "pro_number",
    "ship_date",
    "carrier_scac",
    "total_weight",
    "total_packages",
];

const BOL_LINE_COLUMNS: [&str; 6] = [
    "id",
    "description",
    "quantity",
    "package_type",
    "weight",
    "weight_unit",
];

const WAYBILL_COLUMNS: [&str; 15] = [
    "source_file",
    "ticket_number",
    "waybill_number",
    "date",
    "carrier",
    "shipper",
    "consignee",
    "origin",
    "destination",
    "commodity",
    "vehicle_id",
    "gross_weight",
    "tare_weight",
    "net_weight",
    "hazmat",
];

/// Output writer with a validated directory layout.
///
/// Construction creates `<root>/json` and `<root>/debug`; individual writes
/// do not re-validate the tree.
pub struct OutputSink {
    root: PathBuf,
    json_dir: PathBuf,
    debug_dir: PathBuf,
}

impl OutputSink {
    /// Create the sink, ensuring the directory structure exists.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let root = root.into();
        let json_dir = root.join("json");
        let debug_dir = root.join("debug");
        fs::create_dir_all(&json_dir)?;
        fs::create_dir_all(&debug_dir)?;
        Ok(Self {
            root,
            json_dir,
            debug_dir,
        })
    }

    /// Write `json/{id}.json`, pretty-printed. Rerunning with the same id
    /// overwrites the previous snapshot (last-write-wins, not an error).
    pub fn write_snapshot(
        &self,
        id: &str,
        record: &ExtractionRecord,
    ) -> Result<PathBuf, OutputError> {
        let path = self.json_dir.join(format!("{id}.json"));
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&path, content)?;
        debug!(path = %path.display(), "wrote snapshot");
        Ok(path)
    }

    /// Append one header row and one row per freight line to the shared BOL
    /// tables.
    pub fn append_bol(&self, id: &str, record: &BolRecord) -> Result<(), OutputError> {
        let mut headers = self.open_table(BOL_HEADERS_FILE, &BOL_HEADER_COLUMNS)?;
        headers.write_record([
            id,
            opt_str(&record.bol_number),
            opt_str(&record.pro_number),
            opt_str(&record.ship_date),
            opt_str(&record.carrier.scac),
            &opt_num(record.total_weight),
            &opt_num(record.total_packages),
        ])?;
        headers.flush()?;

        let mut lines = self.open_table(BOL_LINES_FILE, &BOL_LINE_COLUMNS)?;
        for line in &record.freight_lines {
            lines.write_record([
                id,
                opt_str(&line.description),
                &opt_num(line.quantity),
                opt_str(&line.package_type),
                &opt_num(line.weight),
                opt_str(&line.weight_unit),
            ])?;
        }
        lines.flush()?;
        Ok(())
    }

    /// Append one row to the shared waybill table.
    pub fn append_waybill(
        &self,
        source_file: &str,
        record: &WaybillRecord,
    ) -> Result<(), OutputError> {
        let mut table = self.open_table(WAYBILLS_FILE, &WAYBILL_COLUMNS)?;
        table.write_record([
            source_file,
            opt_str(&record.ticket_number),
            opt_str(&record.waybill_number),
            opt_str(&record.date),
            opt_str(&record.carrier),
            opt_str(&record.shipper),
            opt_str(&record.consignee),
            opt_str(&record.origin),
            opt_str(&record.destination),
            opt_str(&record.commodity),
            opt_str(&record.vehicle_id),
            &opt_num(record.gross_weight),
            &opt_num(record.tare_weight),
            &opt_num(record.net_weight),
            record.hazmat.map(|t| t.as_str()).unwrap_or(""),
        ])?;
        table.flush()?;
        Ok(())
    }

    /// Dump the raw OCR text and the pre-reconciliation record for manual
    /// inspection.
    pub fn write_debug(
        &self,
        id: &str,
        ocr_text: &str,
        record: &ExtractionRecord,
    ) -> Result<(), OutputError> {
        let text: String = ocr_text.chars().take(DEBUG_DUMP_LIMIT).collect();
        fs::write(self.debug_dir.join(format!("{id}.txt")), text)?;
        fs::write(
            self.debug_dir.join(format!("{id}.pre.json")),
            serde_json::to_string_pretty(record)?,
        )?;
        Ok(())
    }

    fn open_table(
        &self,
        file_name: &str,
        columns: &[&str],
    ) -> Result<csv::Writer<fs::File>, OutputError> {
        let path = self.root.join(file_name);
        let needs_header = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(columns)?;
        }
        Ok(writer)
    }
}

fn opt_str(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Null numbers serialize as empty string, never as a "null" literal.
fn opt_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{FreightLine, TriState};
    use pretty_assertions::assert_eq;

    fn sample_bol() -> BolRecord {
        BolRecord {
            bol_number: Some("AB123456".to_string()),
            ship_date: Some("2024-01-05".to_string()),
            total_weight: Some(1200.0),
            freight_lines: vec![FreightLine {
                description: Some("Freight".to_string()),
                quantity: Some(1.0),
                package_type: Some("PKG".to_string()),
                weight: Some(1200.0),
                weight_unit: Some("lb".to_string()),
            }],
            ..BolRecord::default()
        }
    }

    #[test]
    fn test_header_written_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::create(dir.path()).unwrap();

        for i in 0..3 {
            sink.append_bol(&format!("doc-{i:04}"), &sample_bol()).unwrap();
        }

        let content = fs::read_to_string(dir.path().join(BOL_HEADERS_FILE)).unwrap();
        let header_rows = content
            .lines()
            .filter(|l| l.starts_with("id,bol_number"))
            .count();
        assert_eq!(header_rows, 1);
        assert_eq!(content.lines().count(), 4);
    }

    #[test]
    fn test_rows_survive_sink_recreation() {
        let dir = tempfile::tempdir().unwrap();

        {
            let sink = OutputSink::create(dir.path()).unwrap();
            sink.append_bol("run1-0001", &sample_bol()).unwrap();
        }
        {
            let sink = OutputSink::create(dir.path()).unwrap();
            sink.append_bol("run2-0001", &sample_bol()).unwrap();
        }

        let content = fs::read_to_string(dir.path().join(BOL_HEADERS_FILE)).unwrap();
        // one header plus a row per run, nothing truncated
        assert_eq!(content.lines().count(), 3);
        assert!(content.contains("run1-0001"));
        assert!(content.contains("run2-0001"));
    }

    #[test]
    fn test_nulls_serialize_as_empty_string() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::create(dir.path()).unwrap();

        sink.append_bol("doc-0001", &BolRecord::default()).unwrap();

        let content = fs::read_to_string(dir.path().join(BOL_HEADERS_FILE)).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert_eq!(row, "doc-0001,,,,,,");
    }

    #[test]
    fn test_waybill_row_has_15_columns() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::create(dir.path()).unwrap();

        let record = WaybillRecord {
            date: Some("2024-03-14".to_string()),
            gross_weight: Some(42000.0),
            tare_weight: Some(15000.0),
            net_weight: Some(27000.0),
            hazmat: Some(TriState::No),
            ..WaybillRecord::default()
        };
        sink.append_waybill("ticket.pdf", &record).unwrap();

        let content = fs::read_to_string(dir.path().join(WAYBILLS_FILE)).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap().split(',').count(), 15);
        let row = lines.next().unwrap();
        assert_eq!(row.split(',').count(), 15);
        assert!(row.starts_with("ticket.pdf,"));
        assert!(row.ends_with(",42000,15000,27000,No"));
    }

    #[test]
    fn test_snapshot_overwrites_same_id() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::create(dir.path()).unwrap();

        let first = ExtractionRecord::Bol(sample_bol());
        let second = ExtractionRecord::Bol(BolRecord::default());
        sink.write_snapshot("doc-0001", &first).unwrap();
        let path = sink.write_snapshot("doc-0001", &second).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(value["bol_number"].is_null());
    }

    #[test]
    fn test_debug_dump_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::create(dir.path()).unwrap();

        let long_text = "x".repeat(DEBUG_DUMP_LIMIT + 500);
        sink.write_debug("doc-0001", &long_text, &ExtractionRecord::Bol(sample_bol()))
            .unwrap();

        let dumped = fs::read_to_string(dir.path().join("debug/doc-0001.txt")).unwrap();
        assert_eq!(dumped.len(), DEBUG_DUMP_LIMIT);
    }
}
