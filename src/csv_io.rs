// 📄 CSV Import/Export - Student lists in, payment reports out
//
// Import is a deliberately small line parser: fields are split on every
// comma, so a quoted value containing a comma is split as well. Export
// wraps the student name in double quotes but escapes nothing inside it.
// `parse_export` reads a report back with the csv crate, which does honor
// the quoting.

use crate::entities::{PaymentStatus, PaymentType, TransactionId};
use crate::i18n::t;
use crate::settings::Language;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Header token that marks the first line of an import file as a header row.
pub const IMPORT_HEADER_TOKEN: &str = "nis";

/// Column label keys of the export header, in column order.
pub const EXPORT_HEADER_KEYS: [&str; 8] = [
    "th_id",
    "th_student",
    "th_type",
    "label_month_bill",
    "label_year_bill",
    "th_date",
    "th_amount",
    "th_status",
];

// ============================================================================
// IMPORT
// ============================================================================

/// One accepted import row. `class` is `None` when the column was absent or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub line_number: usize,
    pub nis: String,
    pub name: String,
    pub class: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImport {
    pub rows: Vec<StudentRow>,
    /// Non-blank lines rejected for a missing NIS or name
    pub skipped: usize,
    pub header_skipped: bool,
}

pub fn parse_student_rows(text: &str) -> ParsedImport {
    let lines: Vec<&str> = text.split('\n').collect();

    let header_skipped = lines
        .first()
        .map(|first| first.to_lowercase().contains(IMPORT_HEADER_TOKEN))
        .unwrap_or(false);
    let start = if header_skipped { 1 } else { 0 };

    let mut parsed = ParsedImport {
        header_skipped,
        ..ParsedImport::default()
    };

    for (index, raw) in lines.iter().enumerate().skip(start) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(',');
        let nis = fields.next().unwrap_or("").trim();
        let name = fields.next().unwrap_or("").replace('"', "");
        let name = name.trim();
        let class = fields
            .next()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        if nis.is_empty() || name.is_empty() {
            tracing::debug!(line = index + 1, "skipping import row without nis or name");
            parsed.skipped += 1;
            continue;
        }

        parsed.rows.push(StudentRow {
            line_number: index + 1,
            nis: nis.to_string(),
            name: name.to_string(),
            class,
        });
    }

    parsed
}

// ============================================================================
// EXPORT
// ============================================================================

/// Flat report line: a transaction with its student name already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub id: TransactionId,
    pub student: String,
    pub payment_type: PaymentType,
    pub month: String,
    pub year: String,
    pub date: String,
    pub amount: u64,
    pub status: PaymentStatus,
}

impl ExportRow {
    fn to_line(&self) -> String {
        format!(
            "{},\"{}\",{},{},{},{},{},{}",
            self.id,
            self.student,
            self.payment_type.label(),
            self.month,
            self.year,
            self.date,
            self.amount,
            self.status.label()
        )
    }
}

pub fn export_header(language: Language) -> String {
    EXPORT_HEADER_KEYS
        .iter()
        .map(|key| t(language, key))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line plus one line per row, newline-joined without a trailing newline.
pub fn write_export(rows: &[ExportRow], language: Language) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(export_header(language));
    lines.extend(rows.iter().map(ExportRow::to_line));
    lines.join("\n")
}

/// `Laporan_<YYYY-MM-DD>.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("Laporan_{}.csv", date.format("%Y-%m-%d"))
}

/// Read an exported report back into rows. The header line is skipped
/// whatever its language.
pub fn parse_export(text: &str) -> Result<Vec<ExportRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read report line {}", index + 2))?;
        let row: ExportRow = record
            .deserialize(None)
            .with_context(|| format!("Failed to parse report line {}", index + 2))?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_with_header_and_blank_row() {
        let parsed =
            parse_student_rows("nis,nama,kelas\n2024010,Test Siswa,9B\n,,\n2024011,Another,9C");

        assert!(parsed.header_skipped);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.rows[0].nis, "2024010");
        assert_eq!(parsed.rows[0].name, "Test Siswa");
        assert_eq!(parsed.rows[0].class.as_deref(), Some("9B"));
        assert_eq!(parsed.rows[1].line_number, 4);
    }

    #[test]
    fn test_import_header_detection_is_case_insensitive() {
        let parsed = parse_student_rows("NIS;Nama\n2024010,Budi");
        assert!(parsed.header_skipped);
        assert_eq!(parsed.rows.len(), 1);
    }

    #[test]
    fn test_import_without_header() {
        let parsed = parse_student_rows("2024010,Budi,9A\n2024011,Sari");

        assert!(!parsed.header_skipped);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].class, None);
    }

    #[test]
    fn test_import_strips_quotes_and_whitespace() {
        let parsed = parse_student_rows("2024010 , \"Dewi Sartika\" ,  9C \r\n");

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].nis, "2024010");
        assert_eq!(parsed.rows[0].name, "Dewi Sartika");
        assert_eq!(parsed.rows[0].class.as_deref(), Some("9C"));
    }

    #[test]
    fn test_import_rejects_missing_fields() {
        let parsed = parse_student_rows("2024010\n,Nameless\n2024012,   \n\n   \n2024013,Ok");

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].nis, "2024013");
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn test_import_splits_quoted_commas() {
        // Known limitation: the comma inside the quotes starts a new field
        let parsed = parse_student_rows("2024010,\"Santoso, Budi\",9A");

        assert_eq!(parsed.rows[0].name, "Santoso");
        assert_eq!(parsed.rows[0].class.as_deref(), Some("Budi\""));
    }

    #[test]
    fn test_import_empty_text() {
        let parsed = parse_student_rows("");
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.skipped, 0);
    }

    fn sample_row() -> ExportRow {
        ExportRow {
            id: 101,
            student: "Ahmad Muzaki".to_string(),
            payment_type: PaymentType::Spp,
            month: "Januari".to_string(),
            year: "2024".to_string(),
            date: "2024-01-10".to_string(),
            amount: 150_000,
            status: PaymentStatus::Paid,
        }
    }

    #[test]
    fn test_export_layout() {
        let text = write_export(&[sample_row()], Language::Id);

        assert_eq!(
            text,
            "ID,Siswa,Jenis,Bulan Tagihan,Tahun Tagihan,Tanggal,Jumlah,Status\n\
             101,\"Ahmad Muzaki\",SPP,Januari,2024,2024-01-10,150000,Lunas"
        );
    }

    #[test]
    fn test_export_header_is_localized() {
        assert_eq!(
            export_header(Language::En),
            "ID,Student,Type,Billing Month,Billing Year,Date,Amount,Status"
        );
    }

    #[test]
    fn test_export_only_header_when_empty() {
        let text = write_export(&[], Language::Id);
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_export_reads_back() {
        let mut fee = sample_row();
        fee.id = 105;
        fee.student = "Dewi, Sartika".to_string();
        fee.payment_type = PaymentType::BuildingFund;
        fee.month = "-".to_string();
        fee.year = "-".to_string();
        fee.status = PaymentStatus::Installment1;

        let rows = vec![sample_row(), fee];
        let parsed = parse_export(&write_export(&rows, Language::En)).unwrap();

        assert_eq!(parsed, rows);
    }

    #[test]
    fn test_parse_export_rejects_garbage() {
        assert!(parse_export("h\nnot-a-number,x,SPP,-,-,2024-01-01,1,Lunas").is_err());
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_filename(date), "Laporan_2024-03-07.csv");
    }
}
