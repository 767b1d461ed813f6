use eframe::egui::{self, Ui};

use crate::data::query::Route;
use crate::state::{HomeView, Phase};
use crate::ui::panels::{experience_combo, industry_combo};

/// Render the home search bar. Returns the route to navigate to when the
/// user presses Search.
pub fn search_bar(ui: &mut Ui, home: &mut HomeView) -> Option<Route> {
    let mut target = None;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading("🔍 Find Suppliers");
        ui.add_space(16.0);

        if *home.phase() == Phase::Loading {
            ui.add(egui::Spinner::new());
        }

        ui.horizontal(|ui: &mut Ui| {
            let facets = home.facets().to_vec();
            industry_combo(ui, "home_industry", &facets, &mut home.draft.industry);

            ui.add(
                egui::TextEdit::singleline(&mut home.draft.location)
                    .hint_text("📍 Enter Location")
                    .desired_width(200.0),
            );

            experience_combo(ui, "home_experience", &mut home.draft.experience);

            if ui.button("🔍 Search").clicked() {
                target = Some(home.search_route());
            }
        });
    });

    target
}
