use std::collections::HashSet;

use super::model::SupplierRecord;

/// Facet value meaning "no industry filter". Always the first facet.
pub const ALL_INDUSTRIES: &str = "All";

/// Distinct industry types in first-seen order, prefixed with `"All"`.
///
/// This is the only place industry facets are derived; the home search bar
/// and the listing filter both call it, so they always agree.
pub fn industry_facets(records: &[SupplierRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut facets = vec![ALL_INDUSTRIES.to_string()];
    for record in records {
        if seen.insert(record.industry_type.as_str()) {
            facets.push(record.industry_type.clone());
        }
    }
    facets
}
