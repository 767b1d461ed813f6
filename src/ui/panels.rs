use std::sync::Arc;

use eframe::egui::{self, Color32, Key, RichText, Ui};

use crate::app::DirectoryApp;
use crate::data::facets::ALL_INDUSTRIES;
use crate::data::filter::FilterCriteria;
use crate::data::loader::Source;
use crate::data::query::Route;
use crate::router::Page;

/// Minimum-experience choices offered in the dropdowns. Any positive value
/// arriving through a route is still honoured.
pub const EXPERIENCE_PRESETS: [u32; 6] = [5, 10, 20, 30, 50, 80];

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu, navigation buttons and address bar.
pub fn top_bar(ui: &mut Ui, app: &mut DirectoryApp) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open spreadsheet…").clicked() {
                open_file_dialog(app);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button("🏠 Home").clicked() {
            app.navigate(Route::Home);
        }
        if ui.button("🏭 Suppliers").clicked() {
            app.navigate(Route::Suppliers(FilterCriteria::default()));
        }

        ui.separator();

        let response = ui.add(
            egui::TextEdit::singleline(&mut app.address)
                .hint_text("/suppliers?industry=…")
                .desired_width(360.0),
        );
        if response.changed() {
            app.address_dirty = true;
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            let route = Route::parse(&app.address);
            app.address_dirty = false;
            app.navigate(route);
        }

        if let Some(msg) = &app.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Listing filters (left side panel)
// ---------------------------------------------------------------------------

/// Render the filter widgets for the listing. Returns the edited criteria
/// when the user changed something.
pub fn filter_panel(ui: &mut Ui, facets: &[String], current: &FilterCriteria) -> Option<FilterCriteria> {
    let mut draft = current.clone();

    ui.heading("Filters");
    ui.separator();

    ui.strong("Industry");
    industry_combo(ui, "listing_industry", facets, &mut draft.industry);
    ui.add_space(8.0);

    ui.strong("Location");
    ui.add(
        egui::TextEdit::singleline(&mut draft.location)
            .hint_text("Type city or state...")
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);

    ui.strong("Experience");
    experience_combo(ui, "listing_experience", &mut draft.experience);
    ui.add_space(8.0);

    if ui.small_button("Clear filters").clicked() {
        draft = FilterCriteria::default();
    }

    (draft != *current).then_some(draft)
}

/// Industry dropdown over the facet list. An empty selection shows as "All".
pub fn industry_combo(ui: &mut Ui, id: &str, facets: &[String], industry: &mut String) {
    let shown = if industry.is_empty() {
        ALL_INDUSTRIES
    } else {
        industry.as_str()
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(shown.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for facet in facets {
                ui.selectable_value(industry, facet.clone(), facet.as_str());
            }
        });
}

/// Minimum-experience dropdown: "All" plus the presets.
pub fn experience_combo(ui: &mut Ui, id: &str, experience: &mut Option<u32>) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(experience_label(*experience))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(experience, None, experience_label(None));
            for years in EXPERIENCE_PRESETS {
                ui.selectable_value(experience, Some(years), experience_label(Some(years)));
            }
        });
}

pub fn experience_label(experience: Option<u32>) -> String {
    match experience {
        Some(years) if years > 0 => format!("{years}+ Years"),
        _ => "All".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Status line for the listing
// ---------------------------------------------------------------------------

pub fn source_label(ui: &mut Ui, app: &DirectoryApp) {
    let counts = match app.router.page() {
        Page::Suppliers(listing) => format!(
            "{} suppliers loaded, {} visible",
            listing.records().len(),
            listing.visible_count()
        ),
        Page::Home(_) => String::new(),
    };
    ui.horizontal(|ui: &mut Ui| {
        ui.weak(format!("Source: {}", app.router.source()));
        if !counts.is_empty() {
            ui.separator();
            ui.label(counts);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(app: &mut DirectoryApp) {
    let file = rfd::FileDialog::new()
        .set_title("Open supplier spreadsheet")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "xlsb", "ods", "csv", "json"])
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "xlsb", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        app.status_message = None;
        app.set_source(Arc::new(Source::Path(path)));
    }
}
