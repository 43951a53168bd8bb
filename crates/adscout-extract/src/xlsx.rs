//! Spreadsheet export for reports.

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::types::Report;

const COLUMNS: [&str; 6] = [
    "published_at",
    "video_url",
    "title",
    "description",
    "brand",
    "link",
];

/// Render a report as an `.xlsx` workbook in memory.
///
/// One header row plus one row per result row, columns in report order.
///
/// # Errors
///
/// Returns [`XlsxError`] if the workbook cannot be serialized.
pub fn report_to_xlsx(report: &Report) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in (0u16..).zip(COLUMNS) {
        worksheet.write_string(0, col, name)?;
    }

    for (i, row) in report.rows.iter().enumerate() {
        let r = u32::try_from(i + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        worksheet.write_string(r, 0, &row.published_at)?;
        worksheet.write_string(r, 1, &row.video_url)?;
        worksheet.write_string(r, 2, &row.title)?;
        worksheet.write_string(r, 3, &row.description)?;
        worksheet.write_string(r, 4, &row.brand)?;
        worksheet.write_string(r, 5, &row.link)?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResultRow;

    fn sample_report() -> Report {
        Report {
            rows: vec![ResultRow {
                published_at: "2025-06-01T10:00:00Z".into(),
                video_url: "https://www.youtube.com/watch?v=vid-1".into(),
                title: "Video One".into(),
                description: "Check out https://example.com".into(),
                brand: "Example".into(),
                link: "https://example.com".into(),
            }],
        }
    }

    #[test]
    fn export_produces_xlsx_magic_bytes() {
        let bytes = report_to_xlsx(&sample_report()).expect("export");
        // xlsx is a zip container: PK\x03\x04.
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn export_of_empty_report_still_writes_header() {
        let bytes = report_to_xlsx(&Report { rows: vec![] }).expect("export");
        assert!(!bytes.is_empty());
    }
}
