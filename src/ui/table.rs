use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::BadgeColors;
use crate::data::model::SupplierRecord;
use crate::state::{ListingStatus, ListingView};

const VERIFIED: Color32 = Color32::from_rgb(0x16, 0xa3, 0x4a);
const UNVERIFIED: Color32 = Color32::from_rgb(0xdc, 0x26, 0x26);

// ---------------------------------------------------------------------------
// Supplier table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered suppliers, or a message for every non-result state.
pub fn supplier_table(ui: &mut Ui, listing: &ListingView, colors: &BadgeColors) {
    match listing.status() {
        ListingStatus::Loading => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.add(egui::Spinner::new().size(32.0));
            });
            return;
        }
        ListingStatus::LoadFailed(reason) => {
            centered_message(ui, &format!("Could not load suppliers: {reason}"), UNVERIFIED);
            return;
        }
        ListingStatus::NoData => {
            centered_message(ui, "The supplier sheet has no rows.", Color32::GRAY);
            return;
        }
        ListingStatus::NoMatches => {
            centered_message(ui, "No suppliers found for the selected filters.", Color32::GRAY);
            return;
        }
        ListingStatus::Showing(_) => {}
    }

    let rows: Vec<&SupplierRecord> = listing.visible().collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto().at_least(130.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for title in [
                "Industry",
                "Company",
                "Product",
                "Location",
                "Established",
                "Experience",
                "Status",
                "Link",
            ] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(26.0, rows.len(), |mut row| {
                let rec = rows[row.index()];
                row.col(|ui: &mut Ui| {
                    industry_badge(ui, &rec.industry_type, colors);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(RichText::new(&rec.company_name).strong());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("🏷 {}", rec.product_name));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("📍 {}", rec.location));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(established_text(rec));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(match rec.experience.years() {
                        Some(years) => format!("{years} years"),
                        None => rec.experience.to_string(),
                    });
                });
                row.col(|ui: &mut Ui| {
                    trust_label(ui, rec);
                });
                row.col(|ui: &mut Ui| {
                    if !rec.product_link.is_empty() {
                        ui.hyperlink_to("View Product", &rec.product_link);
                    }
                });
            });
        });
}

fn industry_badge(ui: &mut Ui, industry: &str, colors: &BadgeColors) {
    ui.label(
        RichText::new(format!(" {industry} "))
            .strong()
            .color(Color32::WHITE)
            .background_color(colors.color_for(industry)),
    );
}

fn trust_label(ui: &mut Ui, rec: &SupplierRecord) {
    if rec.is_verified() {
        ui.label(RichText::new("✅ Verified Supplier").color(VERIFIED));
    } else {
        ui.label(RichText::new("⚠ Not Verified").color(UNVERIFIED));
    }
}

fn established_text(rec: &SupplierRecord) -> String {
    match rec.established_year {
        Some(year) => format!("🗓 {year}"),
        None => "🗓 N/A".to_string(),
    }
}

fn centered_message(ui: &mut Ui, text: &str, color: Color32) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(text).size(16.0).color(color));
    });
}
