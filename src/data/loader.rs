use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::Datelike;
use serde_json::Value as JsonValue;

use super::model::{CellValue, RawRow, SupplierRecord};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Source formats and payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// xlsx / xlsm / xls / xlsb / ods – only the first sheet is read.
    Workbook,
    Csv,
    Json,
}

impl SourceFormat {
    /// Pick the format from a file name or URL path. Dispatch by extension.
    pub fn from_path(path: &str) -> Result<Self, LoadError> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(SourceFormat::Workbook),
            "csv" => Ok(SourceFormat::Csv),
            "json" => Ok(SourceFormat::Json),
            other => Err(LoadError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Raw bytes of the source together with how to read them.
#[derive(Debug, Clone)]
pub struct Payload {
    pub bytes: Vec<u8>,
    pub format: SourceFormat,
}

// ---------------------------------------------------------------------------
// Fetch – the resource retrieval collaborator
// ---------------------------------------------------------------------------

/// Retrieves the raw supplier spreadsheet. Implemented by [`Source`]; tests
/// provide in-memory implementations.
pub trait Fetch: Send + Sync {
    fn fetch(&self) -> Result<Payload, LoadError>;

    /// Human-readable location, used in logs and the status bar.
    fn describe(&self) -> String;
}

/// Where the supplier data lives: a local file or an http(s) URL.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Path(PathBuf),
    Url { url: String, timeout: Duration },
}

impl Source {
    /// Values starting with `http://` or `https://` are URLs, anything else a path.
    pub fn parse(location: &str, timeout: Duration) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url {
                url: location.to_string(),
                timeout,
            }
        } else {
            Source::Path(PathBuf::from(location))
        }
    }

    fn format(&self) -> Result<SourceFormat, LoadError> {
        match self {
            Source::Path(path) => SourceFormat::from_path(&path.to_string_lossy()),
            Source::Url { url, .. } => {
                // Ignore query and fragment when looking at the extension.
                let path = url::Url::parse(url)
                    .map(|u| u.path().to_string())
                    .unwrap_or_else(|_| url.clone());
                SourceFormat::from_path(&path)
            }
        }
    }
}

impl Fetch for Source {
    fn fetch(&self) -> Result<Payload, LoadError> {
        let format = self.format()?;
        let bytes = match self {
            Source::Path(path) => std::fs::read(path).map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            })?,
            Source::Url { url, timeout } => fetch_url(url, *timeout)?,
        };
        Ok(Payload { bytes, format })
    }

    fn describe(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Url { url, .. } => url.clone(),
        }
    }
}

fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.bytes()?.to_vec())
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// The calendar year on the local clock. Captured once per load.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Fetch and parse the source into typed records, preserving row order.
pub fn load(fetch: &dyn Fetch, current_year: i32) -> Result<Vec<SupplierRecord>, LoadError> {
    let payload = fetch.fetch()?;
    let rows = parse_rows(&payload)?;
    Ok(rows
        .iter()
        .map(|row| SupplierRecord::from_row(row, current_year))
        .collect())
}

/// Result of a load as seen by a view: failures are reported, never thrown.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Vec<SupplierRecord>),
    /// The source was read but contained no rows.
    Empty,
    Failed(String),
}

impl LoadOutcome {
    /// Records to show; `Failed` and `Empty` both yield none.
    pub fn records(&self) -> &[SupplierRecord] {
        match self {
            LoadOutcome::Loaded(records) => records,
            LoadOutcome::Empty | LoadOutcome::Failed(_) => &[],
        }
    }
}

/// Like [`load`], but logs failures and folds them into [`LoadOutcome`].
pub fn load_outcome(fetch: &dyn Fetch, current_year: i32) -> LoadOutcome {
    let location = fetch.describe();
    match load(fetch, current_year) {
        Ok(records) if records.is_empty() => {
            log::info!("Loaded 0 suppliers from {location}");
            LoadOutcome::Empty
        }
        Ok(records) => {
            log::info!("Loaded {} suppliers from {location}", records.len());
            LoadOutcome::Loaded(records)
        }
        Err(e) => {
            log::error!("Failed to load suppliers from {location}: {e}");
            LoadOutcome::Failed(e.to_string())
        }
    }
}

/// Parse a payload into header-keyed rows. Blank cells are left out and rows
/// without any non-blank cell are skipped.
pub fn parse_rows(payload: &Payload) -> Result<Vec<RawRow>, LoadError> {
    match payload.format {
        SourceFormat::Workbook => parse_workbook(&payload.bytes),
        SourceFormat::Csv => parse_csv(&payload.bytes),
        SourceFormat::Json => parse_json(&payload.bytes),
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// First sheet only. The first row of the used range is the header row.
fn parse_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoSheet)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(|h| h.to_string()).collect();

    Ok(rows
        .map(|cells| {
            build_row(
                &headers,
                cells.iter().map(cell_from_sheet),
            )
        })
        .filter(|row| !row.is_empty())
        .collect())
}

fn cell_from_sheet(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Integer(*i)),
        Data::Float(f) => Some(CellValue::Float(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
    }
}

/// Zip headers with cells. Columns without a header are dropped and the
/// first occurrence of a repeated header wins.
fn build_row<I>(headers: &[String], cells: I) -> RawRow
where
    I: Iterator<Item = Option<CellValue>>,
{
    let mut row = RawRow::new();
    for (header, cell) in headers.iter().zip(cells) {
        if header.is_empty() {
            continue;
        }
        if let Some(value) = cell {
            row.entry(header.clone()).or_insert(value);
        }
    }
    row
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; every field is kept as text.
fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = build_row(
            &headers,
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| CellValue::Text(field.to_string()))),
        );
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected shape (a sheet exported as records):
///
/// ```json
/// [
///   { "Industry Type": "Automotive", "Company Name": "Acme", "Established Year": 1998 },
///   ...
/// ]
/// ```
fn parse_json(bytes: &[u8]) -> Result<Vec<RawRow>, LoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = root.as_array().ok_or(LoadError::JsonShape)?;

    let mut rows = Vec::with_capacity(records.len());
    for rec in records {
        let obj = rec.as_object().ok_or(LoadError::JsonShape)?;
        let row: RawRow = obj
            .iter()
            .filter_map(|(key, val)| json_to_cell(val).map(|cell| (key.clone(), cell)))
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn json_to_cell(val: &JsonValue) -> Option<CellValue> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(CellValue::Text(s.clone())),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(CellValue::Integer(i))
            } else {
                n.as_f64().map(CellValue::Float)
            }
        }
        JsonValue::Bool(b) => Some(CellValue::Bool(*b)),
        other => Some(CellValue::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Experience, UNKNOWN_INDUSTRY};

    struct Fixed(Payload);

    impl Fetch for Fixed {
        fn fetch(&self) -> Result<Payload, LoadError> {
            Ok(self.0.clone())
        }
        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    struct Broken;

    impl Fetch for Broken {
        fn fetch(&self) -> Result<Payload, LoadError> {
            Err(LoadError::UnsupportedFormat(".bin".into()))
        }
        fn describe(&self) -> String {
            "broken".into()
        }
    }

    fn csv_payload(text: &str) -> Payload {
        Payload {
            bytes: text.as_bytes().to_vec(),
            format: SourceFormat::Csv,
        }
    }

    const CSV: &str = "\
Industry Type,Company Name,Product Name,Location,Established Year,Product Link,Trust Status,Notes
Automotive,Acme,Brake pads,\"Pune, MH\",2006,https://example.com/1,Trusted Seller,ignored
,Bolt Co,Bolts,Austin TX,,https://example.com/2,Pending,
,,,,,,,
Lighting,Lumen,LED strip,Chennai,1990,https://example.com/3,Trusted Seller,
";

    #[test]
    fn format_dispatch_by_extension() {
        assert_eq!(SourceFormat::from_path("data.xlsx").unwrap(), SourceFormat::Workbook);
        assert_eq!(SourceFormat::from_path("DATA.ODS").unwrap(), SourceFormat::Workbook);
        assert_eq!(SourceFormat::from_path("a/b.csv").unwrap(), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path("rows.json").unwrap(), SourceFormat::Json);
        assert!(matches!(
            SourceFormat::from_path("notes.txt"),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn source_parse_distinguishes_urls() {
        let t = Duration::from_secs(5);
        assert!(matches!(Source::parse("https://host/data.xlsx", t), Source::Url { .. }));
        assert_eq!(Source::parse("data.xlsx", t), Source::Path(PathBuf::from("data.xlsx")));
    }

    #[test]
    fn url_format_ignores_query_string() {
        let src = Source::parse("https://host/files/data.csv?v=3", Duration::from_secs(5));
        assert_eq!(src.format().unwrap(), SourceFormat::Csv);
    }

    #[test]
    fn csv_rows_preserve_order_and_skip_blank_lines() {
        let records = load(&Fixed(csv_payload(CSV)), 2026).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.company_name.as_str()).collect();
        assert_eq!(names, ["Acme", "Bolt Co", "Lumen"]);

        assert_eq!(records[0].location, "Pune, MH");
        assert_eq!(records[0].experience, Experience::Years(20));
        assert_eq!(records[1].industry_type, UNKNOWN_INDUSTRY);
        assert_eq!(records[1].experience, Experience::NotAvailable);
        assert!(records[2].is_verified());
    }

    #[test]
    fn json_rows_are_parsed() {
        let json = r#"[
            {"Industry Type": "Metal", "Company Name": "Forge", "Location": "Austin, TX", "Established Year": 2014},
            {"Company Name": "NoYear", "Location": "Boston, MA", "Established Year": null}
        ]"#;
        let payload = Payload {
            bytes: json.as_bytes().to_vec(),
            format: SourceFormat::Json,
        };
        let records = load(&Fixed(payload), 2026).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].experience, Experience::Years(12));
        assert_eq!(records[1].industry_type, UNKNOWN_INDUSTRY);
        assert_eq!(records[1].experience, Experience::NotAvailable);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        let payload = Payload {
            bytes: br#"{"rows": []}"#.to_vec(),
            format: SourceFormat::Json,
        };
        assert!(matches!(parse_rows(&payload), Err(LoadError::JsonShape)));
    }

    #[test]
    fn garbage_workbook_is_an_error() {
        let payload = Payload {
            bytes: b"definitely not a workbook".to_vec(),
            format: SourceFormat::Workbook,
        };
        assert!(parse_rows(&payload).is_err());
    }

    #[test]
    fn outcome_distinguishes_failure_from_empty() {
        assert!(matches!(load_outcome(&Broken, 2026), LoadOutcome::Failed(_)));

        let header_only = csv_payload("Industry Type,Company Name\n");
        assert_eq!(load_outcome(&Fixed(header_only), 2026), LoadOutcome::Empty);

        let outcome = load_outcome(&Fixed(csv_payload(CSV)), 2026);
        assert_eq!(outcome.records().len(), 3);
        assert!(LoadOutcome::Failed("x".into()).records().is_empty());
    }

    #[test]
    fn sheet_cells_map_blank_to_absent() {
        assert_eq!(cell_from_sheet(&Data::Empty), None);
        assert_eq!(cell_from_sheet(&Data::String(String::new())), None);
        assert_eq!(cell_from_sheet(&Data::Float(1999.0)), Some(CellValue::Float(1999.0)));
    }

    #[test]
    fn repeated_header_keeps_first_value() {
        let headers = vec!["Location".to_string(), "".to_string(), "Location".to_string()];
        let cells = vec![
            Some(CellValue::Text("first".into())),
            Some(CellValue::Text("orphan".into())),
            Some(CellValue::Text("second".into())),
        ];
        let row = build_row(&headers, cells.into_iter());
        assert_eq!(row.len(), 1);
        assert_eq!(row["Location"], CellValue::Text("first".into()));
    }
}
