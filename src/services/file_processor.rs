use bytes::Bytes;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{Number, Value};
use std::io::Cursor;

use crate::error::AppError;
use crate::models::Row;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

// Excel serial for 9999-12-31; anything outside is not a date cell we trust.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

pub async fn load_file_from_url(url: &str) -> Result<Bytes, AppError> {
    let response = HTTP_CLIENT
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Http(format!("Failed to fetch file: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::Http(format!(
            "Failed to fetch file. Status: {}",
            response.status()
        )));
    }

    response
        .bytes()
        .await
        .map_err(|e| AppError::Http(format!("Failed to read response bytes: {}", e)))
}

/// Parse the first sheet of an XLSX workbook into header-keyed rows.
/// The first sheet row is the header row; empty headers and empty cells are
/// omitted from the resulting maps.
pub fn rows_from_xlsx(file_data: Bytes) -> Result<Vec<Row>, AppError> {
    let cursor = Cursor::new(file_data);

    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor).map_err(|e| {
        tracing::error!("Failed to open Excel file: {}", e);
        AppError::FileProcessing(format!("Failed to open Excel file: {}", e))
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    tracing::info!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

    let sheet_name = sheet_names
        .first()
        .ok_or_else(|| AppError::FileProcessing("No sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| AppError::FileProcessing(format!("Failed to read worksheet: {}", e)))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
        .unwrap_or_default();

    let rows: Vec<Row> = sheet_rows
        .map(|sheet_row| {
            let mut row = Row::new();
            for (header, cell) in headers.iter().zip(sheet_row.iter()) {
                if header.is_empty() {
                    continue;
                }
                if let Some(value) = cell_value(cell) {
                    row.insert(header.clone(), value);
                }
            }
            row
        })
        .collect();

    Ok(rows)
}

/// Parse CSV bytes into header-keyed rows. Fields that parse as finite
/// numbers become numbers; everything else stays a string.
pub fn rows_from_csv(file_data: Bytes) -> Result<Vec<Row>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(file_data.as_ref());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::FileProcessing(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|e| AppError::FileProcessing(format!("Failed to read CSV record: {}", e)))?;

        let mut row = Row::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            if header.is_empty() || field.is_empty() {
                continue;
            }
            row.insert(header.clone(), field_value(field));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::Number((*i).into())),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()).map(Value::String),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}

fn field_value(field: &str) -> Value {
    match field.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(field.to_string())),
        _ => Value::String(field.to_string()),
    }
}

/// Render an Excel date serial as `YYYY-MM-DD` so month bucketing sees the
/// usual `YYYY-MM` prefix. Serials count days from the 1899-12-30 epoch.
fn excel_serial_to_date(serial: f64) -> Option<String> {
    if !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base.checked_add_signed(Duration::days(serial.trunc() as i64))?;
    Some(date.format("%Y-%m-%d").to_string())
}
