use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::data::facets::industry_facets;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::loader::{self, Fetch, LoadOutcome};
use crate::data::model::SupplierRecord;
use crate::data::query::Route;

// ---------------------------------------------------------------------------
// Background load, discarded when the owning view goes away
// ---------------------------------------------------------------------------

/// One outstanding load running on a worker thread.
///
/// Dropping the task cancels it: a worker that finishes afterwards throws
/// its result away instead of delivering it.
pub struct LoadTask {
    rx: Receiver<LoadOutcome>,
    cancelled: Arc<AtomicBool>,
}

impl LoadTask {
    /// Start loading on a worker thread. `on_finish` runs on the worker once
    /// it is done, with `true` if the outcome was delivered and `false` if it
    /// was discarded.
    pub fn spawn<F>(fetch: Arc<dyn Fetch>, on_finish: F) -> Self
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        thread::spawn(move || {
            // Current year is fixed for the lifetime of this load.
            let outcome = loader::load_outcome(fetch.as_ref(), loader::current_year());
            let delivered = !flag.load(Ordering::Acquire) && tx.send(outcome).is_ok();
            if !delivered {
                log::debug!("Discarded load of {}: view closed", fetch.describe());
            }
            on_finish(delivered);
        });

        Self { rx, cancelled }
    }

    /// Non-blocking check for the outcome.
    pub fn try_take(&self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(worker_lost()),
        }
    }

    /// Block until the outcome arrives.
    pub fn wait(&self) -> LoadOutcome {
        self.rx.recv().unwrap_or_else(|_| worker_lost())
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

fn worker_lost() -> LoadOutcome {
    LoadOutcome::Failed("load worker stopped without a result".to_string())
}

// ---------------------------------------------------------------------------
// View phases
// ---------------------------------------------------------------------------

/// `Uninitialized → Loading → Loaded → Filtered`, or `Failed` if the
/// source could not be read. A listing re-enters `Filtered` on every
/// criteria change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Loaded,
    Filtered,
    Failed(String),
}

/// What the listing should tell the user. Loading, failure and "nothing
/// matches" are never conflated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    Loading,
    LoadFailed(String),
    /// Source loaded fine but has no rows.
    NoData,
    NoMatches,
    Showing(usize),
}

/// The record set owned by one view, plus its pending load.
struct Dataset {
    phase: Phase,
    records: Vec<SupplierRecord>,
    facets: Vec<String>,
    task: Option<LoadTask>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
            records: Vec::new(),
            facets: industry_facets(&[]),
            task: None,
        }
    }
}

impl Dataset {
    fn mount<F>(&mut self, fetch: Arc<dyn Fetch>, on_finish: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        if self.phase != Phase::Uninitialized {
            log::debug!("View already mounted, not loading {} again", fetch.describe());
            return;
        }
        log::info!("Loading suppliers from {}", fetch.describe());
        self.task = Some(LoadTask::spawn(fetch, on_finish));
        self.phase = Phase::Loading;
    }

    /// Returns true when a pending outcome was ingested.
    fn poll(&mut self) -> bool {
        let Some(outcome) = self.task.as_ref().and_then(LoadTask::try_take) else {
            return false;
        };
        self.ingest(outcome);
        true
    }

    fn wait(&mut self) -> bool {
        let Some(task) = self.task.as_ref() else {
            return false;
        };
        let outcome = task.wait();
        self.ingest(outcome);
        true
    }

    fn ingest(&mut self, outcome: LoadOutcome) {
        self.task = None;
        match outcome {
            LoadOutcome::Loaded(records) => {
                self.facets = industry_facets(&records);
                self.records = records;
                self.phase = Phase::Loaded;
            }
            LoadOutcome::Empty => {
                self.facets = industry_facets(&[]);
                self.records.clear();
                self.phase = Phase::Loaded;
            }
            LoadOutcome::Failed(reason) => {
                self.facets = industry_facets(&[]);
                self.records.clear();
                self.phase = Phase::Failed(reason);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Listing view: records + criteria → visible subset
// ---------------------------------------------------------------------------

/// State of the supplier listing page, independent of rendering.
pub struct ListingView {
    data: Dataset,
    criteria: FilterCriteria,
    /// Indices of records passing the current criteria.
    visible: Vec<usize>,
}

impl ListingView {
    /// A fresh view whose criteria come from the route it was opened with.
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            data: Dataset::default(),
            criteria,
            visible: Vec::new(),
        }
    }

    /// Start the one load this view performs.
    pub fn mount<F>(&mut self, fetch: Arc<dyn Fetch>, on_finish: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.data.mount(fetch, on_finish);
    }

    /// Pick up a finished load, if any. Returns true if the view changed.
    pub fn poll(&mut self) -> bool {
        let changed = self.data.poll();
        if changed {
            self.refilter();
        }
        changed
    }

    /// Block until the pending load finishes.
    pub fn wait(&mut self) -> bool {
        let changed = self.data.wait();
        if changed {
            self.refilter();
        }
        changed
    }

    /// Replace the criteria and recompute the visible subset.
    /// Returns false if nothing changed.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> bool {
        if criteria == self.criteria {
            return false;
        }
        self.criteria = criteria;
        self.refilter();
        true
    }

    /// Full re-scan of the records. Does nothing before the load finished.
    fn refilter(&mut self) {
        if matches!(self.data.phase, Phase::Loaded | Phase::Filtered) {
            self.visible = filtered_indices(&self.data.records, &self.criteria);
            self.data.phase = Phase::Filtered;
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.data.phase
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn facets(&self) -> &[String] {
        &self.data.facets
    }

    pub fn records(&self) -> &[SupplierRecord] {
        &self.data.records
    }

    /// Records passing the current criteria, in source order.
    pub fn visible(&self) -> impl Iterator<Item = &SupplierRecord> + '_ {
        self.visible.iter().map(|&i| &self.data.records[i])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// The route that reproduces this view.
    pub fn route(&self) -> Route {
        Route::Suppliers(self.criteria.clone())
    }

    pub fn status(&self) -> ListingStatus {
        match &self.data.phase {
            Phase::Uninitialized | Phase::Loading => ListingStatus::Loading,
            Phase::Failed(reason) => ListingStatus::LoadFailed(reason.clone()),
            Phase::Loaded | Phase::Filtered if self.data.records.is_empty() => ListingStatus::NoData,
            Phase::Loaded | Phase::Filtered if self.visible.is_empty() => ListingStatus::NoMatches,
            Phase::Loaded | Phase::Filtered => ListingStatus::Showing(self.visible.len()),
        }
    }
}

// ---------------------------------------------------------------------------
// Home view: facet list + a draft search
// ---------------------------------------------------------------------------

/// State of the home search bar. Loads the dataset on its own to offer the
/// industry facets.
pub struct HomeView {
    data: Dataset,
    /// Criteria being edited in the search bar, not yet applied.
    pub draft: FilterCriteria,
}

impl Default for HomeView {
    fn default() -> Self {
        Self {
            data: Dataset::default(),
            draft: FilterCriteria::default(),
        }
    }
}

impl HomeView {
    pub fn mount<F>(&mut self, fetch: Arc<dyn Fetch>, on_finish: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.data.mount(fetch, on_finish);
    }

    pub fn poll(&mut self) -> bool {
        self.data.poll()
    }

    pub fn wait(&mut self) -> bool {
        self.data.wait()
    }

    pub fn phase(&self) -> &Phase {
        &self.data.phase
    }

    pub fn facets(&self) -> &[String] {
        &self.data.facets
    }

    /// Where the search button navigates to.
    pub fn search_route(&self) -> Route {
        Route::Suppliers(self.draft.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{Payload, SourceFormat};
    use crate::error::LoadError;

    struct Csv(&'static str);

    impl Fetch for Csv {
        fn fetch(&self) -> Result<Payload, LoadError> {
            Ok(Payload {
                bytes: self.0.as_bytes().to_vec(),
                format: SourceFormat::Csv,
            })
        }
        fn describe(&self) -> String {
            "memory.csv".into()
        }
    }

    struct Unreachable;

    impl Fetch for Unreachable {
        fn fetch(&self) -> Result<Payload, LoadError> {
            Err(LoadError::Status {
                status: 404,
                url: "https://host/data.xlsx".into(),
            })
        }
        fn describe(&self) -> String {
            "https://host/data.xlsx".into()
        }
    }

    const DATA: &str = "\
Industry Type,Company Name,Location,Established Year,Trust Status
Metal,Forge One,\"Austin, TX\",1990,Trusted Seller
Lighting,Lumen,\"Springfield, IL\",,Pending
Metal,Forge Two,\"Boston, MA\",2025,Pending
";

    fn loaded_listing(criteria: FilterCriteria) -> ListingView {
        let mut view = ListingView::new(criteria);
        view.mount(Arc::new(Csv(DATA)), |_| {});
        assert!(view.wait());
        view
    }

    #[test]
    fn starts_uninitialized_then_loading() {
        let mut view = ListingView::new(FilterCriteria::default());
        assert_eq!(view.phase(), &Phase::Uninitialized);
        assert_eq!(view.status(), ListingStatus::Loading);
        view.mount(Arc::new(Csv(DATA)), |_| {});
        assert!(matches!(view.phase(), Phase::Loading | Phase::Filtered));
    }

    #[test]
    fn load_completes_into_filtered() {
        let view = loaded_listing(FilterCriteria::default());
        assert_eq!(view.phase(), &Phase::Filtered);
        assert_eq!(view.status(), ListingStatus::Showing(3));
        assert_eq!(view.facets(), ["All", "Metal", "Lighting"]);
    }

    #[test]
    fn initial_criteria_apply_once_loaded() {
        let criteria = FilterCriteria::from_query("industry=Metal");
        let view = loaded_listing(criteria);
        let names: Vec<_> = view.visible().map(|r| r.company_name.as_str()).collect();
        assert_eq!(names, ["Forge One", "Forge Two"]);
    }

    #[test]
    fn criteria_change_refilters() {
        let mut view = loaded_listing(FilterCriteria::default());
        assert!(view.set_criteria(FilterCriteria::from_query("experience=20")));
        // The Lighting row has no year and drops out.
        assert_eq!(view.visible_count(), 1);
        assert!(!view.set_criteria(FilterCriteria::from_query("experience=20")));

        assert!(view.set_criteria(FilterCriteria::from_query("location=zzz")));
        assert_eq!(view.status(), ListingStatus::NoMatches);
        assert_eq!(view.phase(), &Phase::Filtered);
    }

    #[test]
    fn criteria_set_while_loading_are_kept() {
        let mut view = ListingView::new(FilterCriteria::default());
        view.set_criteria(FilterCriteria::from_query("location=boston"));
        assert_eq!(view.visible_count(), 0);
        view.mount(Arc::new(Csv(DATA)), |_| {});
        view.wait();
        assert_eq!(view.visible_count(), 1);
    }

    #[test]
    fn failure_is_a_distinct_state() {
        let mut view = ListingView::new(FilterCriteria::default());
        view.mount(Arc::new(Unreachable), |_| {});
        view.wait();
        assert!(matches!(view.phase(), Phase::Failed(_)));
        assert!(matches!(view.status(), ListingStatus::LoadFailed(_)));
        assert_eq!(view.facets(), ["All"]);
    }

    #[test]
    fn header_only_source_is_no_data() {
        let mut view = ListingView::new(FilterCriteria::default());
        view.mount(Arc::new(Csv("Industry Type,Company Name\n")), |_| {});
        view.wait();
        assert_eq!(view.status(), ListingStatus::NoData);
    }

    #[test]
    fn mount_happens_once() {
        let mut view = loaded_listing(FilterCriteria::default());
        view.mount(Arc::new(Unreachable), |_| {});
        assert_eq!(view.phase(), &Phase::Filtered);
        assert!(!view.poll());
    }

    #[test]
    fn dropped_view_discards_result() {
        struct Gated(std::sync::Mutex<mpsc::Receiver<()>>);

        impl Fetch for Gated {
            fn fetch(&self) -> Result<Payload, LoadError> {
                let gate = self.0.lock().map_err(|_| LoadError::NoSheet)?;
                let _ = gate.recv();
                Csv(DATA).fetch()
            }
            fn describe(&self) -> String {
                "gated".into()
            }
        }

        let (open_gate, gate) = mpsc::channel();
        let (finished_tx, finished_rx) = mpsc::channel();

        let mut view = ListingView::new(FilterCriteria::default());
        view.mount(Arc::new(Gated(std::sync::Mutex::new(gate))), move |delivered| {
            let _ = finished_tx.send(delivered);
        });
        drop(view);
        open_gate.send(()).unwrap();

        assert!(!finished_rx.recv().unwrap());
    }

    #[test]
    fn home_view_shares_facet_derivation() {
        let mut home = HomeView::default();
        home.mount(Arc::new(Csv(DATA)), |_| {});
        home.wait();
        let listing = loaded_listing(FilterCriteria::default());
        assert_eq!(home.facets(), listing.facets());
        assert_eq!(home.phase(), &Phase::Loaded);
    }

    #[test]
    fn home_search_builds_listing_route() {
        let mut home = HomeView::default();
        home.draft.industry = "Lighting".into();
        home.draft.experience = Some(20);
        assert_eq!(
            home.search_route().to_string(),
            "/suppliers?industry=Lighting&experience=20"
        );
    }
}
