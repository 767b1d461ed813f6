use std::sync::Arc;

use eframe::egui;

use crate::color::BadgeColors;
use crate::config::AppConfig;
use crate::data::loader::Fetch;
use crate::data::query::Route;
use crate::router::{Page, Router};
use crate::state::Phase;
use crate::ui::{home, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DirectoryApp {
    pub router: Router,

    /// Address bar text; mirrors the route unless the user is editing it.
    pub address: String,
    pub address_dirty: bool,

    /// Industry badge colours for the mounted page's facets.
    pub colors: BadgeColors,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl DirectoryApp {
    pub fn new(config: &AppConfig, ctx: egui::Context) -> Self {
        let fetch: Arc<dyn Fetch> = Arc::new(config.source.clone());
        let notify = Arc::new(move || ctx.request_repaint());
        let router = Router::new(fetch, config.start_route.clone(), notify);
        let address = router.route().to_string();
        Self {
            router,
            address,
            address_dirty: false,
            colors: BadgeColors::default(),
            status_message: None,
        }
    }

    pub fn navigate(&mut self, route: Route) {
        let remount = !self.router.route().same_page(&route);
        self.router.navigate(route);
        if remount {
            self.status_message = None;
            self.colors = BadgeColors::new(self.router.facets());
        }
        self.address_dirty = false;
        self.sync_address();
    }

    pub fn set_source(&mut self, fetch: Arc<dyn Fetch>) {
        self.router.set_fetch(fetch);
        self.colors = BadgeColors::new(self.router.facets());
        self.sync_address();
    }

    fn sync_address(&mut self) {
        if !self.address_dirty {
            self.address = self.router.route().to_string();
        }
    }

    /// Pick up a finished background load.
    fn poll(&mut self) {
        if !self.router.poll() {
            return;
        }
        self.colors = BadgeColors::new(self.router.facets());
        let phase = match self.router.page() {
            Page::Home(home) => home.phase(),
            Page::Suppliers(listing) => listing.phase(),
        };
        self.status_message = match phase {
            Phase::Failed(reason) => Some(format!("Error: {reason}")),
            _ => None,
        };
    }
}

impl eframe::App for DirectoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll();

        // ---- Top panel: menu + address bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, self);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::source_label(ui, self);
        });

        let mut next_route = None;
        let mut edited = None;

        match self.router.page_mut() {
            Page::Home(home_view) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    next_route = home::search_bar(ui, home_view);
                });
            }
            Page::Suppliers(listing) => {
                // ---- Left side panel: filters ----
                egui::SidePanel::left("filter_panel")
                    .default_width(220.0)
                    .resizable(true)
                    .show(ctx, |ui| {
                        edited = panels::filter_panel(ui, listing.facets(), listing.criteria());
                    });

                // ---- Central panel: suppliers ----
                let colors = &self.colors;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("🏭 Supplier Listings");
                    ui.separator();
                    table::supplier_table(ui, listing, colors);
                });
            }
        }

        if let Some(criteria) = edited {
            // Filter edits are written back into the address bar.
            self.router.update_criteria(criteria);
            self.sync_address();
        }
        if let Some(route) = next_route {
            self.navigate(route);
        }
    }
}
