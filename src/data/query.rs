use std::fmt;

use url::form_urlencoded;

use super::filter::FilterCriteria;
use super::model::parse_leading_int;

pub const INDUSTRY_PARAM: &str = "industry";
pub const LOCATION_PARAM: &str = "location";
pub const EXPERIENCE_PARAM: &str = "experience";

// ---------------------------------------------------------------------------
// FilterCriteria <-> query string
// ---------------------------------------------------------------------------

impl FilterCriteria {
    /// Read criteria from a query string (with or without the leading `?`).
    ///
    /// Missing or empty parameters leave the default in place; only the first
    /// occurrence of a repeated key counts. An `experience` value is read by its
    /// leading integer and ignored unless that is positive.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .filter(|v| !v.is_empty())
        };

        let mut criteria = FilterCriteria::default();
        if let Some(industry) = first(INDUSTRY_PARAM) {
            criteria.industry = industry.to_string();
        }
        if let Some(location) = first(LOCATION_PARAM) {
            criteria.location = location.to_string();
        }
        if let Some(raw) = first(EXPERIENCE_PARAM) {
            criteria.experience = parse_experience(raw);
        }
        criteria
    }

    /// Serialise the active criteria. Inactive ones are omitted, so default
    /// criteria produce an empty string.
    pub fn to_query(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(industry) = self.active_industry() {
            out.append_pair(INDUSTRY_PARAM, industry);
        }
        if self.active_location().is_some() {
            out.append_pair(LOCATION_PARAM, &self.location);
        }
        if let Some(years) = self.active_experience() {
            out.append_pair(EXPERIENCE_PARAM, &years.to_string());
        }
        out.finish()
    }
}

fn parse_experience(raw: &str) -> Option<u32> {
    match parse_leading_int(raw).and_then(|years| u32::try_from(years).ok()) {
        Some(years) if years > 0 => Some(years),
        _ => {
            log::debug!("Ignoring experience filter {raw:?}: not a positive integer");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Route – the navigation target shown in the address bar
// ---------------------------------------------------------------------------

pub const HOME_PATH: &str = "/";
pub const SUPPLIERS_PATH: &str = "/suppliers";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Home,
    Suppliers(FilterCriteria),
}

impl Route {
    /// Parse `"/suppliers?industry=Metal"`, a bare path, or a full URL.
    /// Unknown paths fall back to the home page.
    pub fn parse(target: &str) -> Self {
        let target = target.trim();
        let (path, query) = match url::Url::parse(target) {
            Ok(url) if url.has_host() => (url.path().to_string(), url.query().unwrap_or("").to_string()),
            _ => {
                let without_fragment = target.split('#').next().unwrap_or("");
                match without_fragment.split_once('?') {
                    Some((p, q)) => (p.to_string(), q.to_string()),
                    None => (without_fragment.to_string(), String::new()),
                }
            }
        };

        let path = path.trim_end_matches('/');
        match path {
            "" => Route::Home,
            p if p == SUPPLIERS_PATH || p == SUPPLIERS_PATH.trim_start_matches('/') => {
                Route::Suppliers(FilterCriteria::from_query(&query))
            }
            other => {
                log::warn!("Unknown route {other:?}, showing home");
                Route::Home
            }
        }
    }

    pub fn criteria(&self) -> Option<&FilterCriteria> {
        match self {
            Route::Home => None,
            Route::Suppliers(criteria) => Some(criteria),
        }
    }

    /// Whether both routes render the same page (ignoring the query).
    pub fn same_page(&self, other: &Route) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "{HOME_PATH}"),
            Route::Suppliers(criteria) => {
                let query = criteria.to_query();
                if query.is_empty() {
                    write!(f, "{SUPPLIERS_PATH}")
                } else {
                    write!(f, "{SUPPLIERS_PATH}?{query}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        assert_eq!(FilterCriteria::from_query(""), FilterCriteria::default());
        assert_eq!(FilterCriteria::from_query("?"), FilterCriteria::default());
    }

    #[test]
    fn keys_map_to_fields() {
        let c = FilterCriteria::from_query("?industry=Oil+%26+Gas&location=Pune&experience=20");
        assert_eq!(c.industry, "Oil & Gas");
        assert_eq!(c.location, "Pune");
        assert_eq!(c.experience, Some(20));
    }

    #[test]
    fn empty_values_mean_unset() {
        // The home search bar submits every key, even unset ones.
        let c = FilterCriteria::from_query("industry=&location=&experience=");
        assert_eq!(c, FilterCriteria::default());
    }

    #[test]
    fn any_positive_experience_is_accepted() {
        assert_eq!(FilterCriteria::from_query("experience=7").experience, Some(7));
        assert_eq!(FilterCriteria::from_query("experience=0").experience, None);
        assert_eq!(FilterCriteria::from_query("experience=-5").experience, None);
        assert_eq!(FilterCriteria::from_query("experience=ten").experience, None);
    }

    #[test]
    fn experience_uses_leading_integer() {
        assert_eq!(FilterCriteria::from_query("experience=5abc").experience, Some(5));
        assert_eq!(FilterCriteria::from_query("experience=10.5").experience, Some(10));
        assert_eq!(FilterCriteria::from_query("experience=0.9").experience, None);
    }

    #[test]
    fn first_occurrence_wins() {
        let c = FilterCriteria::from_query("industry=Metal&industry=Lighting");
        assert_eq!(c.industry, "Metal");
    }

    #[test]
    fn default_criteria_serialise_to_nothing() {
        assert_eq!(FilterCriteria::default().to_query(), "");
        assert_eq!(Route::Suppliers(FilterCriteria::default()).to_string(), "/suppliers");
    }

    #[test]
    fn serialised_query_reads_back() {
        let criteria = FilterCriteria {
            industry: "Oil & Gas".into(),
            location: "Navi Mumbai".into(),
            experience: Some(30),
        };
        let query = criteria.to_query();
        assert_eq!(query, "industry=Oil+%26+Gas&location=Navi+Mumbai&experience=30");
        assert_eq!(FilterCriteria::from_query(&query), criteria);
    }

    #[test]
    fn route_parsing() {
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/nowhere"), Route::Home);
        assert_eq!(
            Route::parse("/suppliers/"),
            Route::Suppliers(FilterCriteria::default())
        );
        let route = Route::parse("https://directory.example/suppliers?location=spring#top");
        assert_eq!(route.criteria().map(|c| c.location.as_str()), Some("spring"));
        let bare = Route::parse("/suppliers?industry=Metal#cards");
        assert_eq!(bare.criteria().map(|c| c.industry.as_str()), Some("Metal"));
    }

    #[test]
    fn same_page_ignores_query() {
        let a = Route::parse("/suppliers?industry=Metal");
        let b = Route::parse("/suppliers");
        assert!(a.same_page(&b));
        assert!(!a.same_page(&Route::Home));
    }
}
