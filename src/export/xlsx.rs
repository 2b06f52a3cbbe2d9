//! In-memory XLSX serialization of a filtered observation view.
//!
//! Builds the OOXML package by direct ZIP/XML generation: a workbook with a
//! single `Dados` sheet, a header row of column names and one row per
//! observation. Dates are written as ISO-8601 inline strings so no styles
//! part is needed.

use crate::export::error::ExportError;
use crate::frame::epoch_days_to_date;
use polars::frame::DataFrame;
use polars::prelude::*;
use std::io::{Cursor, Write};
use ::zip::write::FileOptions;
use ::zip::ZipWriter;

/// Download name offered by the dashboard.
pub const XLSX_FILE_NAME: &str = "dados_santa_helena.xlsx";
/// MIME type of the download artifact.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Dados";

enum ColumnCells<'a> {
    Date(&'a DateChunked),
    Float(&'a Float64Chunked),
}

/// Serializes a collected view into XLSX bytes, ready to be served as a file
/// download. No side effects; the archive lives entirely in memory.
pub fn to_spreadsheet_bytes(df: &DataFrame) -> Result<Vec<u8>, ExportError> {
    let sheet = worksheet_xml(df)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_xml().as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(WORKBOOK_RELS_XML.as_bytes())?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(sheet.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn worksheet_xml(df: &DataFrame) -> Result<String, ExportError> {
    let names = df.get_column_names();
    let mut cells = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let kind = match column.dtype() {
            DataType::Date => ColumnCells::Date(column.date()?),
            DataType::Float64 => ColumnCells::Float(column.f64()?),
            other => {
                return Err(ExportError::UnsupportedColumnType {
                    column: column.name().to_string(),
                    dtype: other.to_string(),
                })
            }
        };
        cells.push(kind);
    }

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
         <sheetData>",
    );

    // Header row.
    xml.push_str("<row r=\"1\">");
    for (idx, name) in names.iter().enumerate() {
        push_inline_string(&mut xml, idx, 1, name.as_str());
    }
    xml.push_str("</row>");

    // Data rows.
    for row_idx in 0..df.height() {
        let row_number = row_idx + 2;
        xml.push_str(&format!("<row r=\"{row_number}\">"));
        for (col_idx, kind) in cells.iter().enumerate() {
            match kind {
                ColumnCells::Date(dates) => {
                    if let Some(days) = dates.get(row_idx) {
                        let iso = epoch_days_to_date(days).format("%Y-%m-%d").to_string();
                        push_inline_string(&mut xml, col_idx, row_number, &iso);
                    }
                }
                ColumnCells::Float(values) => {
                    if let Some(value) = values.get(row_idx) {
                        xml.push_str(&format!(
                            "<c r=\"{}{}\"><v>{}</v></c>",
                            column_letters(col_idx),
                            row_number,
                            value
                        ));
                    }
                    // Nulls stay as blank cells.
                }
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    Ok(xml)
}

fn push_inline_string(xml: &mut String, col_idx: usize, row_number: usize, value: &str) {
    xml.push_str(&format!(
        "<c r=\"{}{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
        column_letters(col_idx),
        row_number,
        xml_escape(value)
    ));
}

/// Zero-based column index to spreadsheet letters (0 -> A, 26 -> AA).
fn column_letters(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn workbook_xml() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
         <sheets><sheet name=\"{SHEET_NAME}\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>"
    )
}

const CONTENT_TYPES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
</Types>";

const ROOT_RELS_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>\
</Relationships>";

const WORKBOOK_RELS_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>\
</Relationships>";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::normalizer::normalize;
    use crate::types::observation::{DATE_COLUMN, NUMERIC_COLUMNS};
    use calamine::{Data, Reader, Xlsx};

    fn table(rows: usize) -> DataFrame {
        let dates: Vec<String> = (1..=rows).map(|d| format!("{d:02}/01/2023")).collect();
        let values: Vec<String> = (1..=rows)
            .map(|d| if d == 2 { "n/d".to_string() } else { format!("{d},5") })
            .collect();
        let mut columns = vec![Column::new(
            DATE_COLUMN.into(),
            dates.iter().map(String::as_str).collect::<Vec<_>>(),
        )];
        for name in NUMERIC_COLUMNS {
            columns.push(Column::new(
                name.into(),
                values.iter().map(String::as_str).collect::<Vec<_>>(),
            ));
        }
        normalize(DataFrame::new(columns).unwrap()).unwrap()
    }

    fn read_back(bytes: Vec<u8>) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        workbook.worksheet_range(SHEET_NAME).unwrap()
    }

    #[test]
    fn round_trip_preserves_headers_and_row_count() {
        let df = table(4);
        let range = read_back(to_spreadsheet_bytes(&df).unwrap());

        assert_eq!(range.height(), 5); // header + 4 observations
        let header: Vec<String> = range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(header[0], DATE_COLUMN);
        assert_eq!(header[1..].to_vec(), NUMERIC_COLUMNS.to_vec());
    }

    #[test]
    fn numeric_cells_survive_as_numbers_and_nulls_as_blanks() {
        let df = table(3);
        let range = read_back(to_spreadsheet_bytes(&df).unwrap());
        let rows: Vec<_> = range.rows().collect();

        assert_eq!(rows[1][1], Data::Float(1.5));
        assert_eq!(rows[2][1], Data::Empty); // the "n/d" cell
        assert_eq!(rows[3][1], Data::Float(3.5));
    }

    #[test]
    fn dates_are_written_as_iso_strings() {
        let df = table(1);
        let range = read_back(to_spreadsheet_bytes(&df).unwrap());
        let rows: Vec<_> = range.rows().collect();
        assert_eq!(rows[1][0], Data::String("2023-01-01".to_string()));
    }

    #[test]
    fn empty_view_exports_header_only() {
        let df = table(1);
        let empty = df.head(Some(0));
        let range = read_back(to_spreadsheet_bytes(&empty).unwrap());
        assert_eq!(range.height(), 1);
    }

    #[test]
    fn unsupported_column_type_is_rejected() {
        let df = DataFrame::new(vec![Column::new("texto".into(), ["a", "b"])]).unwrap();
        match to_spreadsheet_bytes(&df).unwrap_err() {
            ExportError::UnsupportedColumnType { column, .. } => assert_eq!(column, "texto"),
            other => panic!("expected UnsupportedColumnType, got {other:?}"),
        }
    }

    #[test]
    fn column_letters_cover_two_letter_range() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(7), "H");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
    }
}
