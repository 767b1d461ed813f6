use std::sync::Arc;

use crate::data::filter::FilterCriteria;
use crate::data::loader::Fetch;
use crate::data::query::Route;
use crate::state::{HomeView, ListingView};

/// Repaint hook handed to background loads.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

/// The page currently mounted. Each owns its own record set.
pub enum Page {
    Home(HomeView),
    Suppliers(ListingView),
}

/// Keeps the current route and the mounted page in step.
///
/// * Navigating to a route reads its criteria into the page.
/// * Criteria edited on the listing are written back into the route.
/// * Changing page drops the old one, which cancels its pending load.
pub struct Router {
    fetch: Arc<dyn Fetch>,
    notify: Notify,
    route: Route,
    page: Page,
}

impl Router {
    pub fn new(fetch: Arc<dyn Fetch>, start: Route, notify: Notify) -> Self {
        let page = mount_page(&start, &fetch, &notify);
        Self {
            fetch,
            notify,
            route: start,
            page,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn source(&self) -> String {
        self.fetch.describe()
    }

    /// Go to `route`. Staying on the listing only swaps criteria; any other
    /// move mounts a fresh page.
    pub fn navigate(&mut self, route: Route) {
        log::debug!("Navigate {} → {}", self.route, route);
        match (&mut self.page, &route) {
            (Page::Suppliers(listing), Route::Suppliers(criteria)) => {
                listing.set_criteria(criteria.clone());
            }
            (Page::Home(_), Route::Home) => {}
            _ => self.page = mount_page(&route, &self.fetch, &self.notify),
        }
        self.route = route;
    }

    /// User edited the listing filters: apply them and rewrite the route in
    /// place. Ignored when the listing is not mounted.
    pub fn update_criteria(&mut self, criteria: FilterCriteria) {
        let Page::Suppliers(listing) = &mut self.page else {
            log::debug!("Ignoring criteria update outside the listing");
            return;
        };
        if listing.set_criteria(criteria) {
            self.route = listing.route();
        }
    }

    /// Point at a different source and remount the current page.
    pub fn set_fetch(&mut self, fetch: Arc<dyn Fetch>) {
        log::info!("Switching source to {}", fetch.describe());
        self.fetch = fetch;
        self.page = mount_page(&self.route, &self.fetch, &self.notify);
    }

    /// Pick up a finished load. Returns true if the page changed.
    pub fn poll(&mut self) -> bool {
        match &mut self.page {
            Page::Home(home) => home.poll(),
            Page::Suppliers(listing) => listing.poll(),
        }
    }

    /// Block until the mounted page finished loading.
    pub fn wait(&mut self) -> bool {
        match &mut self.page {
            Page::Home(home) => home.wait(),
            Page::Suppliers(listing) => listing.wait(),
        }
    }

    /// Facets of the mounted page.
    pub fn facets(&self) -> &[String] {
        match &self.page {
            Page::Home(home) => home.facets(),
            Page::Suppliers(listing) => listing.facets(),
        }
    }
}

fn mount_page(route: &Route, fetch: &Arc<dyn Fetch>, notify: &Notify) -> Page {
    let notify = Arc::clone(notify);
    let on_finish = move |_delivered: bool| notify();
    match route {
        Route::Home => {
            let mut home = HomeView::default();
            home.mount(Arc::clone(fetch), on_finish);
            Page::Home(home)
        }
        Route::Suppliers(criteria) => {
            let mut listing = ListingView::new(criteria.clone());
            listing.mount(Arc::clone(fetch), on_finish);
            Page::Suppliers(listing)
        }
    }
}
