use serde::{Deserialize, Serialize};

use super::facets::ALL_INDUSTRIES;
use super::model::SupplierRecord;

// ---------------------------------------------------------------------------
// Filter criteria: the current predicates of a listing view
// ---------------------------------------------------------------------------

/// Current filter selection. Each field is independently optional:
/// * `industry` – `"All"` or empty means no industry filter
/// * `location` – blank (after trimming) means no location filter
/// * `experience` – `None` (or zero) means no minimum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub industry: String,
    pub location: String,
    pub experience: Option<u32>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            industry: ALL_INDUSTRIES.to_string(),
            location: String::new(),
            experience: None,
        }
    }
}

impl FilterCriteria {
    /// The industry to match exactly, if the industry predicate is active.
    pub fn active_industry(&self) -> Option<&str> {
        let industry = self.industry.as_str();
        (!industry.is_empty() && industry != ALL_INDUSTRIES).then_some(industry)
    }

    /// The lower-cased location needle, if the location predicate is active.
    ///
    /// Activity is judged on the trimmed text, but the needle itself is not
    /// trimmed.
    pub fn active_location(&self) -> Option<String> {
        (!self.location.trim().is_empty()).then(|| self.location.to_lowercase())
    }

    /// The minimum years of experience, if the experience predicate is active.
    pub fn active_experience(&self) -> Option<u32> {
        self.experience.filter(|&n| n > 0)
    }

    /// True when no predicate is active.
    pub fn is_unfiltered(&self) -> bool {
        self.active_industry().is_none()
            && self.active_location().is_none()
            && self.active_experience().is_none()
    }

    /// Whether a single record passes all active predicates.
    pub fn matches(&self, record: &SupplierRecord) -> bool {
        self.compile().matches(record)
    }

    fn compile(&self) -> Predicates<'_> {
        Predicates {
            industry: self.active_industry(),
            location: self.active_location(),
            min_experience: self.active_experience(),
        }
    }
}

/// Criteria resolved once per scan so the location needle is lower-cased
/// only once.
struct Predicates<'a> {
    industry: Option<&'a str>,
    location: Option<String>,
    min_experience: Option<u32>,
}

impl Predicates<'_> {
    fn matches(&self, record: &SupplierRecord) -> bool {
        if let Some(industry) = self.industry {
            if record.industry_type != industry {
                return false;
            }
        }
        if let Some(needle) = &self.location {
            if !record.location.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(min_years) = self.min_experience {
            // N/A experience never satisfies a minimum.
            if !record.experience.at_least(min_years) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Applying criteria
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active filters, in source order.
pub fn filtered_indices(records: &[SupplierRecord], criteria: &FilterCriteria) -> Vec<usize> {
    let predicates = criteria.compile();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| predicates.matches(record))
        .map(|(i, _)| i)
        .collect()
}

/// The ordered subsequence of `records` that passes `criteria`.
/// A full re-scan on every call.
pub fn apply<'a>(records: &'a [SupplierRecord], criteria: &FilterCriteria) -> Vec<&'a SupplierRecord> {
    let predicates = criteria.compile();
    records.iter().filter(|r| predicates.matches(r)).collect()
}
