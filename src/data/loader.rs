use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type,
};
use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{Days, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{SalesDataset, Transaction};
use crate::config::ColumnMapping;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – worksheet `mapping.sheet` (first sheet if absent)
/// * `.csv`     – header row, one transaction per line
/// * `.json`    – `[{ "Data da Venda": "2024-01-05", ... }, ...]`
/// * `.parquet` – one transaction per row
pub fn load_file(path: &Path, mapping: &ColumnMapping) -> Result<SalesDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path, &mapping.sheet)?,
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    build_dataset(&table, mapping).with_context(|| format!("loading {}", path.display()))
}

// ---------------------------------------------------------------------------
// Format-independent table
// ---------------------------------------------------------------------------

/// One cell as read from the source, before column-specific parsing.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

static EMPTY: Cell = Cell::Empty;

/// One data row and the source line it came from.
#[derive(Debug)]
struct RawRow {
    line: usize,
    cells: Vec<Cell>,
}

/// Header row plus data rows.
#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Rows numbered consecutively, header on line 1.
    fn numbered(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| RawRow { line: i + 2, cells })
            .collect();
        Self { headers, rows }
    }
}

fn build_dataset(table: &RawTable, mapping: &ColumnMapping) -> Result<SalesDataset> {
    let column = |name: &str| {
        table
            .headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("missing column '{name}'"))
    };
    let date_idx = column(&mapping.date)?;
    let region_idx = column(&mapping.region)?;
    let store_idx = column(&mapping.store)?;
    let amount_idx = column(&mapping.amount)?;
    let quantity_idx = column(&mapping.quantity)?;

    let mut transactions = Vec::with_capacity(table.rows.len());
    let mut skipped = 0usize;

    for row in &table.rows {
        if row.cells.iter().all(|c| *c == Cell::Empty) {
            skipped += 1;
            continue;
        }
        let cell = |idx: usize| row.cells.get(idx).unwrap_or(&EMPTY);
        let line = row.line;

        let date = parse_date(cell(date_idx))
            .with_context(|| format!("line {line}: column '{}'", mapping.date))?;
        let amount = parse_amount(cell(amount_idx))
            .with_context(|| format!("line {line}: column '{}'", mapping.amount))?;
        let quantity = parse_quantity(cell(quantity_idx))
            .with_context(|| format!("line {line}: column '{}'", mapping.quantity))?;

        transactions.push(Transaction {
            region: cell_text(cell(region_idx)),
            store: cell_text(cell(store_idx)),
            date,
            amount,
            quantity,
        });
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} blank rows");
    }

    Ok(SalesDataset::from_transactions(transactions))
}

// -- Cell parsing --

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%d/%m/%Y %H:%M:%S"];

fn parse_date(cell: &Cell) -> Result<NaiveDate> {
    match cell {
        Cell::Date(d) => Ok(*d),
        Cell::Number(serial) => excel_serial_to_date(*serial),
        Cell::Text(s) => {
            let s = s.trim();
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    DATETIME_FORMATS
                        .iter()
                        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                        .map(|dt| dt.date())
                })
                .with_context(|| format!("'{s}' is not a date"))
        }
        Cell::Empty => bail!("missing sale date"),
    }
}

/// Excel counts days from 1899-12-30 (the 1900 leap-year bug folded in).
fn excel_serial_to_date(serial: f64) -> Result<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        bail!("{serial} is not a spreadsheet date");
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).context("spreadsheet epoch")?;
    epoch
        .checked_add_days(Days::new(serial.floor() as u64))
        .with_context(|| format!("{serial} is out of the date range"))
}

fn parse_amount(cell: &Cell) -> Result<f64> {
    let value = match cell {
        Cell::Number(v) => *v,
        Cell::Text(s) => parse_decimal_text(s).with_context(|| format!("'{s}' is not an amount"))?,
        Cell::Date(d) => bail!("expected an amount, found date {d}"),
        Cell::Empty => bail!("missing sale amount"),
    };
    if !value.is_finite() {
        bail!("amount {value} is not finite");
    }
    Ok(value)
}

/// Amount written as text.
///
/// * `R$ 1.234,56` – a `R$` prefix means pt-BR: `.` groups thousands, `,` is decimal
/// * `1,234.56` / `1.234,56` – the last separator is the decimal one
/// * `1.234.567` / `1,234,567` – a repeated separator only groups thousands
/// * `1234.56` – a lone `.` is a decimal point
/// * `50,00` – a lone `,` is a decimal comma, unless exactly three digits follow it
///   (`1,234` could be either and is rejected)
fn parse_decimal_text(s: &str) -> Result<f64> {
    let s = s.trim();
    let (pt_br, s) = match s.strip_prefix("R$") {
        Some(rest) => (true, rest.trim()),
        None => (false, s),
    };
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s),
    };

    let dots = digits.matches('.').count();
    let commas = digits.matches(',').count();

    let value = if pt_br {
        split_number(digits, Some('.'), Some(','))?
    } else if dots > 0 && commas > 0 {
        let last_dot = digits.rfind('.').unwrap_or(0);
        let last_comma = digits.rfind(',').unwrap_or(0);
        if last_dot > last_comma {
            split_number(digits, Some(','), Some('.'))?
        } else {
            split_number(digits, Some('.'), Some(','))?
        }
    } else if commas > 1 {
        split_number(digits, Some(','), None)?
    } else if dots > 1 {
        split_number(digits, Some('.'), None)?
    } else if commas == 1 {
        let (_, fraction) = digits.split_once(',').unwrap_or((digits, ""));
        if fraction.len() == 3 {
            bail!("ambiguous separator: thousands or decimal comma");
        }
        split_number(digits, None, Some(','))?
    } else {
        digits.parse::<f64>().context("malformed number")?
    };

    Ok(if negative { -value } else { value })
}

/// Parse unsigned `digits` with the given separators. Thousands groups must be
/// well formed (`1.234.567`, not `12.34`) and the decimal separator may appear
/// at most once.
fn split_number(digits: &str, thousands: Option<char>, decimal: Option<char>) -> Result<f64> {
    let (integer, fraction) = match decimal {
        Some(d) => match digits.split_once(d) {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        },
        None => (digits, None),
    };

    let integer: String = match thousands {
        Some(t) if integer.contains(t) => {
            let groups: Vec<&str> = integer.split(t).collect();
            let well_formed = groups.iter().enumerate().all(|(i, g)| {
                let len_ok = if i == 0 { (1..=3).contains(&g.len()) } else { g.len() == 3 };
                len_ok && g.chars().all(|c| c.is_ascii_digit())
            });
            if !well_formed {
                bail!("malformed thousands grouping");
            }
            groups.concat()
        }
        _ => integer.to_string(),
    };

    if integer.is_empty() || !integer.chars().all(|c| c.is_ascii_digit()) {
        bail!("malformed number");
    }
    let text = match fraction {
        Some(f) if !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()) => format!("{integer}.{f}"),
        Some(_) => bail!("malformed decimal part"),
        None => integer,
    };
    text.parse::<f64>().context("malformed number")
}

fn parse_quantity(cell: &Cell) -> Result<u64> {
    match cell {
        Cell::Empty => Ok(0),
        // `u64::MAX as f64` rounds up to 2^64, which no u64 can hold.
        Cell::Number(v) if *v >= 0.0 && *v < u64::MAX as f64 && v.fract() == 0.0 => Ok(*v as u64),
        Cell::Number(v) => bail!("{v} is not a non-negative whole quantity"),
        Cell::Text(s) if s.trim().is_empty() => Ok(0),
        Cell::Text(s) => s
            .trim()
            .parse::<u64>()
            .with_context(|| format!("'{s}' is not a non-negative whole quantity")),
        Cell::Date(d) => bail!("expected a quantity, found date {d}"),
    }
}

/// Text of a label column. Whole numbers print without a fraction.
fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Cell::Number(v) => v.to_string(),
        Cell::Date(d) => d.to_string(),
        Cell::Empty => String::new(),
    }
}

fn text_cell(s: &str) -> Cell {
    if s.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet reader
// ---------------------------------------------------------------------------

fn read_workbook(path: &Path, sheet: &str) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;

    let name = pick_sheet(&workbook.sheet_names(), sheet)?;
    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("reading sheet '{name}'"))?;

    Ok(range_table(&range))
}

/// The configured sheet, or the first one when the workbook has no such sheet.
fn pick_sheet(names: &[String], sheet: &str) -> Result<String> {
    if names.iter().any(|n| n == sheet) {
        return Ok(sheet.to_string());
    }
    let first = names.first().context("workbook has no sheets")?.clone();
    log::warn!("Sheet '{sheet}' not found, reading '{first}' instead");
    Ok(first)
}

/// First used row is the header. Line numbers follow the sheet, which may
/// not start at row 1.
fn range_table(range: &Range<Data>) -> RawTable {
    let header_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| cell_text(&workbook_cell(c))).collect(),
        None => return RawTable::default(),
    };
    let rows = rows
        .enumerate()
        .map(|(i, r)| RawRow {
            line: header_line + 1 + i,
            cells: r.iter().map(workbook_cell).collect(),
        })
        .collect();

    RawTable { headers, rows }
}

fn workbook_cell(cell: &Data) -> Cell {
    match cell {
        Data::String(s) => text_cell(s),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => Cell::Date(d.date()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s),
        Data::Error(e) => Cell::Text(format!("{e:?}")),
        Data::Empty => Cell::Empty,
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    // Blank lines yield no record, so take line numbers from the reader.
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("reading CSV record")?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        rows.push(RawRow {
            line,
            cells: record.iter().map(text_cell).collect(),
        });
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Record {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    Ok(RawTable::numbered(headers, rows))
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => text_cell(s),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        JsonValue::Null => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Timestamp and Date64 columns are cast
/// to dates.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let columns: Vec<ArrayRef> = batch
            .columns()
            .iter()
            .map(|col| match col.data_type() {
                DataType::Date64 | DataType::Timestamp(_, _) => {
                    arrow::compute::cast(col, &DataType::Date32)
                        .context("casting timestamp column to date")
                }
                _ => Ok(col.clone()),
            })
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| arrow_cell(col, row)).collect());
        }
    }

    Ok(RawTable::numbered(headers, rows))
}

fn arrow_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Empty;
    }
    match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Int32 => Cell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Cell::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map(Cell::Date)
            .unwrap_or(Cell::Empty),
        other => Cell::Text(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const CSV: &str = "\
Data da Venda,UF da Compra,Nome da Loja,Valor da Venda,Quantidade
2024-01-05,SP,A,100.00,2
10/02/2024,SP,B,\"50,00\",1
,,,,
2024-02-20 13:45:00,RJ,A,30,1
";

    #[test]
    fn test_load_csv_with_default_mapping() {
        let file = write_temp(".csv", CSV);
        let ds = load_file(file.path(), &ColumnMapping::default()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.transactions[0].date, date(2024, 1, 5));
        assert_eq!(ds.transactions[1].date, date(2024, 2, 10));
        assert_eq!(ds.transactions[1].amount, 50.0);
        assert_eq!(ds.transactions[2].date, date(2024, 2, 20));
        assert_eq!(ds.transactions[2].region, "RJ");
        assert_eq!(ds.transactions[0].quantity, 2);
        assert_eq!(ds.year_months, vec!["2024-01", "2024-02", "2024-02"]);
    }

    #[test]
    fn test_load_json_with_custom_mapping() {
        let json = r#"[
            {"date": "2024-03-01", "state": "MG", "shop": "C", "value": 12.5, "qty": 0},
            {"date": "2024-03-02", "state": "MG", "shop": "C", "value": 7.5, "qty": null}
        ]"#;
        let file = write_temp(".json", json);
        let mapping = ColumnMapping {
            sheet: String::new(),
            date: "date".into(),
            region: "state".into(),
            store: "shop".into(),
            amount: "value".into(),
            quantity: "qty".into(),
        };

        let ds = load_file(file.path(), &mapping).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.transactions[0].store, "C");
        assert_eq!(ds.transactions[1].quantity, 0);
        assert_eq!(ds.regions, vec!["MG"]);
    }

    #[test]
    fn test_load_parquet_with_date_and_timestamp_columns() {
        use std::sync::Arc;

        use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray, TimestampSecondArray};
        use arrow::datatypes::{Field, Schema, TimeUnit};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Data da Venda", DataType::Date32, false),
            Field::new("UF da Compra", DataType::Utf8, false),
            Field::new("Nome da Loja", DataType::Utf8, false),
            Field::new("Valor da Venda", DataType::Float64, false),
            Field::new("Quantidade", DataType::Int64, false),
            Field::new("Registrado", DataType::Timestamp(TimeUnit::Second, None), true),
        ]));
        // 19727 days after 1970-01-01 is 2024-01-05.
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(vec![19727, 19763])),
                Arc::new(StringArray::from(vec!["SP", "RJ"])),
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Float64Array::from(vec![100.0, 30.0])),
                Arc::new(Int64Array::from(vec![2, 1])),
                Arc::new(TimestampSecondArray::from(vec![Some(0), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path(), &ColumnMapping::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.transactions[0].date, date(2024, 1, 5));
        assert_eq!(ds.transactions[1].date, date(2024, 2, 10));
        assert_eq!(ds.transactions[1].store, "B");
        assert_eq!(ds.transactions[0].quantity, 2);
    }

    #[test]
    fn test_missing_column_is_named() {
        let file = write_temp(".csv", "Data da Venda,UF da Compra\n2024-01-01,SP\n");
        let err = load_file(file.path(), &ColumnMapping::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Nome da Loja"));
    }

    #[test]
    fn test_row_without_amount_is_rejected() {
        let csv = "Data da Venda,UF da Compra,Nome da Loja,Valor da Venda,Quantidade\n\
                   2024-01-01,SP,A,,1\n";
        let file = write_temp(".csv", csv);
        let err = load_file(file.path(), &ColumnMapping::default()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 2"));
        assert!(msg.contains("missing sale amount"));
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        let csv = "Data da Venda,UF da Compra,Nome da Loja,Valor da Venda,Quantidade\n\
                   2024-01-01,SP,A,10,-1\n";
        let file = write_temp(".csv", csv);
        assert!(load_file(file.path(), &ColumnMapping::default()).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".txt", "");
        let err = load_file(file.path(), &ColumnMapping::default()).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn test_parse_date_variants() {
        assert_eq!(parse_date(&Cell::Date(date(2024, 5, 1))).unwrap(), date(2024, 5, 1));
        assert_eq!(parse_date(&Cell::Number(45296.0)).unwrap(), date(2024, 1, 5));
        assert_eq!(parse_date(&Cell::Number(45296.75)).unwrap(), date(2024, 1, 5));
        assert_eq!(
            parse_date(&Cell::Text("2024-01-05T08:00:00".into())).unwrap(),
            date(2024, 1, 5)
        );
        assert_eq!(
            parse_date(&Cell::Text("05/01/2024".into())).unwrap(),
            date(2024, 1, 5)
        );
        assert!(parse_date(&Cell::Text("January".into())).is_err());
        assert!(parse_date(&Cell::Empty).is_err());
    }

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount(&Cell::Number(12.5)).unwrap(), 12.5);
        assert_eq!(parse_amount(&Cell::Text("1234.56".into())).unwrap(), 1234.56);
        assert_eq!(parse_amount(&Cell::Text("R$ 1.234,56".into())).unwrap(), 1234.56);
        assert!(parse_amount(&Cell::Text("abc".into())).is_err());
        assert!(parse_amount(&Cell::Number(f64::NAN)).is_err());
    }

    #[test]
    fn test_amount_separators() {
        let amount = |s: &str| parse_amount(&Cell::Text(s.into()));

        assert_eq!(amount("1,234.56").unwrap(), 1234.56);
        assert_eq!(amount("1.234,56").unwrap(), 1234.56);
        assert_eq!(amount("R$ 1.234").unwrap(), 1234.0);
        assert_eq!(amount("R$ 1.234.567,8").unwrap(), 1234567.8);
        assert_eq!(amount("1.234.567").unwrap(), 1234567.0);
        assert_eq!(amount("1,234,567.25").unwrap(), 1234567.25);
        assert_eq!(amount("50,00").unwrap(), 50.0);
        assert_eq!(amount("-1.234,50").unwrap(), -1234.5);
        assert_eq!(amount("R$ -12,5").unwrap(), -12.5);
    }

    #[test]
    fn test_ambiguous_or_malformed_amounts_are_rejected() {
        let amount = |s: &str| parse_amount(&Cell::Text(s.into()));

        assert!(amount("1,234").is_err());
        assert!(amount("12.34.5").is_err());
        assert!(amount("1.234,56,7").is_err());
        assert!(amount("1,23.45").is_err());
        assert!(amount("R$ 1,234.56").is_err());
        assert!(amount("R$").is_err());
        assert!(amount("1.234,").is_err());
    }

    #[test]
    fn test_quantity_beyond_u64_is_rejected() {
        assert!(parse_quantity(&Cell::Number(1e20)).is_err());
        assert!(parse_quantity(&Cell::Number(u64::MAX as f64)).is_err());
        assert_eq!(parse_quantity(&Cell::Number(9007199254740992.0)).unwrap(), 1 << 53);
        assert_eq!(parse_quantity(&Cell::Number(3.0)).unwrap(), 3);
        assert!(parse_quantity(&Cell::Number(2.5)).is_err());
    }

    #[test]
    fn test_csv_errors_name_the_source_line_after_blank_lines() {
        let csv = "Data da Venda,UF da Compra,Nome da Loja,Valor da Venda,Quantidade\n\
                   2024-01-01,SP,A,10,1\n\
                   \n\
                   \n\
                   2024-01-02,SP,A,,1\n";
        let file = write_temp(".csv", csv);
        let err = load_file(file.path(), &ColumnMapping::default()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 5"), "{msg}");
    }

    #[test]
    fn test_workbook_cell_variants() {
        use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

        assert_eq!(workbook_cell(&Data::String("SP".into())), Cell::Text("SP".into()));
        assert_eq!(workbook_cell(&Data::String("  ".into())), Cell::Empty);
        assert_eq!(workbook_cell(&Data::Float(12.5)), Cell::Number(12.5));
        assert_eq!(workbook_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(workbook_cell(&Data::Bool(true)), Cell::Text("true".into()));
        assert_eq!(
            workbook_cell(&Data::DateTime(ExcelDateTime::new(
                45296.5,
                ExcelDateTimeType::DateTime,
                false
            ))),
            Cell::Date(date(2024, 1, 5))
        );
        assert_eq!(
            workbook_cell(&Data::DateTimeIso("2024-01-05T10:00:00".into())),
            Cell::Text("2024-01-05T10:00:00".into())
        );
        assert_eq!(
            workbook_cell(&Data::Error(CellErrorType::Div0)),
            Cell::Text("Div0".into())
        );
        assert_eq!(workbook_cell(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn test_pick_sheet_falls_back_to_first() {
        let names = vec!["Resumo".to_string(), "Vendas_dos_Mercados_2024".to_string()];
        assert_eq!(
            pick_sheet(&names, "Vendas_dos_Mercados_2024").unwrap(),
            "Vendas_dos_Mercados_2024"
        );
        assert_eq!(pick_sheet(&names, "Outra").unwrap(), "Resumo");
        assert!(pick_sheet(&[], "Vendas_dos_Mercados_2024").is_err());
    }

    #[test]
    fn test_sheet_range_builds_dataset() {
        use calamine::{ExcelDateTime, ExcelDateTimeType};

        // Header on sheet row 2, so data starts on line 3.
        let mut range: Range<Data> = Range::new((1, 0), (3, 4));
        let header = ["Data da Venda", "UF da Compra", "Nome da Loja", "Valor da Venda", "Quantidade"];
        for (col, title) in header.iter().enumerate() {
            range.set_value((1, col as u32), Data::String(title.to_string()));
        }
        range.set_value(
            (2, 0),
            Data::DateTime(ExcelDateTime::new(45296.0, ExcelDateTimeType::DateTime, false)),
        );
        range.set_value((2, 1), Data::String("SP".into()));
        range.set_value((2, 2), Data::String("A".into()));
        range.set_value((2, 3), Data::Float(100.0));
        range.set_value((2, 4), Data::Int(2));
        range.set_value((3, 0), Data::Float(45332.0));
        range.set_value((3, 1), Data::String("RJ".into()));
        range.set_value((3, 2), Data::String("B".into()));
        range.set_value((3, 3), Data::String("abc".into()));
        range.set_value((3, 4), Data::Int(1));

        let table = range_table(&range);
        assert_eq!(table.headers.len(), 5);
        assert_eq!(table.rows[0].line, 3);

        let err = build_dataset(&table, &ColumnMapping::default()).unwrap_err();
        assert!(format!("{err:#}").contains("line 4"));

        range.set_value((3, 3), Data::Float(30.0));
        let ds = build_dataset(&range_table(&range), &ColumnMapping::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.transactions[0].date, date(2024, 1, 5));
        assert_eq!(ds.transactions[0].quantity, 2);
        assert_eq!(ds.transactions[1].date, date(2024, 2, 10));
        assert_eq!(ds.transactions[1].region, "RJ");
    }

    #[test]
    fn test_cell_text_of_whole_number() {
        assert_eq!(cell_text(&Cell::Number(35.0)), "35");
        assert_eq!(cell_text(&Cell::Text("  Loja Centro ".into())), "Loja Centro");
    }
}
