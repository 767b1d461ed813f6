use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column headers of the source sheet (case- and space-sensitive)
// ---------------------------------------------------------------------------

pub const COL_INDUSTRY_TYPE: &str = "Industry Type";
pub const COL_COMPANY_NAME: &str = "Company Name";
pub const COL_PRODUCT_NAME: &str = "Product Name";
pub const COL_LOCATION: &str = "Location";
pub const COL_ESTABLISHED_YEAR: &str = "Established Year";
pub const COL_PRODUCT_LINK: &str = "Product Link";
pub const COL_TRUST_STATUS: &str = "Trust Status";

/// Industry used when the source row has no industry cell.
pub const UNKNOWN_INDUSTRY: &str = "Unknown";

/// The only trust status that renders as verified.
pub const TRUSTED_SELLER: &str = "Trusted Seller";

// ---------------------------------------------------------------------------
// CellValue – a single loosely-typed cell of a source row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it comes out of a spreadsheet, CSV or JSON
/// source. Only lives at the load boundary; everything downstream works on
/// [`SupplierRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Integral floats print like integers ("2001", not "2001.0").
            CellValue::Float(v) if is_integral_i64(*v) => write!(f, "{}", *v as i64),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl CellValue {
    /// Whether the cell counts as "present" for fallback purposes.
    /// Empty text and numeric zero are treated like a missing cell.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            CellValue::Integer(i) => *i == 0,
            CellValue::Float(v) => *v == 0.0 || v.is_nan(),
            CellValue::Bool(b) => !b,
        }
    }

    /// Interpret the cell as a year.
    ///
    /// Numbers are truncated toward zero. Text is read with leading-integer
    /// semantics: surrounding whitespace is skipped, an optional sign and the
    /// leading run of digits are used, anything after them is ignored.
    pub fn as_year(&self) -> Option<i32> {
        match self {
            CellValue::Integer(i) => i32::try_from(*i).ok(),
            CellValue::Float(v) if v.is_finite() => {
                let t = v.trunc();
                (t >= i32::MIN as f64 && t <= i32::MAX as f64).then_some(t as i32)
            }
            CellValue::Text(s) => parse_leading_int(s),
            _ => None,
        }
    }
}

/// Integral and exactly representable as `i64`, so the cast is lossless.
fn is_integral_i64(v: f64) -> bool {
    v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64
}

/// Leading-integer parse: skips leading whitespace, takes an optional sign
/// and the run of digits after it.
pub(crate) fn parse_leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i32 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// One source row keyed by column header. Blank cells are absent keys.
pub type RawRow = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// Experience – derived years of activity, or the "N/A" sentinel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Experience {
    Years(i32),
    NotAvailable,
}

impl Experience {
    /// `current_year - established_year`, or `NotAvailable` without a year
    /// or when the difference does not fit.
    pub fn derive(established_year: Option<i32>, current_year: i32) -> Self {
        established_year
            .and_then(|year| current_year.checked_sub(year))
            .map_or(Experience::NotAvailable, Experience::Years)
    }

    pub fn years(&self) -> Option<i32> {
        match self {
            Experience::Years(y) => Some(*y),
            Experience::NotAvailable => None,
        }
    }

    /// True iff the years are known and at least `min_years`.
    pub fn at_least(&self, min_years: u32) -> bool {
        self.years()
            .is_some_and(|y| i64::from(y) >= i64::from(min_years))
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Experience::Years(y) => write!(f, "{y}"),
            Experience::NotAvailable => write!(f, "N/A"),
        }
    }
}

// ---------------------------------------------------------------------------
// SupplierRecord – one row of the directory
// ---------------------------------------------------------------------------

/// A supplier row after parsing. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub industry_type: String,
    pub company_name: String,
    pub product_name: String,
    pub location: String,
    pub established_year: Option<i32>,
    /// Fixed at load time; never recomputed.
    pub experience: Experience,
    pub trust_status: String,
    pub product_link: String,
}

impl SupplierRecord {
    /// Build a typed record from a raw row, applying the fallback values:
    /// missing industry → `"Unknown"`, missing year → `N/A` experience.
    /// Rows are never rejected.
    pub fn from_row(row: &RawRow, current_year: i32) -> Self {
        let text = |col: &str| row.get(col).map(|v| v.to_string()).unwrap_or_default();

        let industry_type = row
            .get(COL_INDUSTRY_TYPE)
            .filter(|v| !v.is_blank())
            .map(|v| v.to_string())
            .unwrap_or_else(|| UNKNOWN_INDUSTRY.to_string());

        let established_year = row
            .get(COL_ESTABLISHED_YEAR)
            .filter(|v| !v.is_blank())
            .and_then(CellValue::as_year);

        SupplierRecord {
            industry_type,
            company_name: text(COL_COMPANY_NAME),
            product_name: text(COL_PRODUCT_NAME),
            location: text(COL_LOCATION),
            established_year,
            experience: Experience::derive(established_year, current_year),
            trust_status: text(COL_TRUST_STATUS),
            product_link: text(COL_PRODUCT_LINK),
        }
    }

    /// Exact match against `"Trusted Seller"`.
    pub fn is_verified(&self) -> bool {
        self.trust_status == TRUSTED_SELLER
    }
}
