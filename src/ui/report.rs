use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use household_impact::analysis::{AnalysisEngine, Decomposition, HouseholdReport};
use household_impact::data::model::HouseholdRecord;
use household_impact::format;
use household_impact::ExplorerError;

use crate::color;
use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Household report (central panel)
// ---------------------------------------------------------------------------

/// Render the analysis of the selected household.
pub fn household_report(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a household dataset to begin  (File → Open…)");
        });
        return;
    }

    match &state.current {
        None => {
            ui.label("No household selected.");
        }
        Some(Err(e)) => error_message(ui, e),
        Some(Ok(selected)) => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    report_body(ui, &selected.report, &selected.record);
                });
        }
    }
}

fn error_message(ui: &mut Ui, error: &ExplorerError) {
    let text = match error {
        ExplorerError::EmptyResult => {
            "No households match the selected filters. Please adjust your criteria.".to_string()
        }
        ExplorerError::NotFound { household_id } => format!(
            "Household {household_id} is no longer in the filtered set. \
             Draw a new random household or relax the filters."
        ),
        other => other.to_string(),
    };
    ui.label(RichText::new(text).color(Color32::YELLOW));
}

fn report_body(ui: &mut Ui, report: &HouseholdReport, record: &HouseholdRecord) {
    let profile = &report.profile;
    ui.heading(format!("Household {}", profile.household_id));
    ui.add_space(4.0);

    // ---- Profile and baseline ----
    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.strong("Household Profile");
        egui::Grid::new("profile_grid").num_columns(2).show(ui, |ui: &mut Ui| {
            ui.label("State");
            ui.label(&profile.state);
            ui.end_row();
            ui.label("Head of Household Age");
            ui.label(format!("{:.0}", profile.age_of_head));
            ui.end_row();
            ui.label("Marital Status");
            ui.label(profile.marital_label());
            ui.end_row();
            ui.label("Dependents");
            let ages = &report.details.dependent_ages;
            if ages.is_empty() {
                ui.label(profile.number_of_dependents.to_string());
            } else {
                let list: Vec<String> = ages.iter().map(u32::to_string).collect();
                ui.label(format!("{} (ages {})", profile.number_of_dependents, list.join(", ")));
            }
            ui.end_row();
            ui.label("Tax Units");
            ui.label(format!("{:.0}", report.details.tax_units));
            ui.end_row();
            ui.label("Household Weight");
            ui.label(format::weight(profile.household_weight));
            ui.end_row();
        });

        if !report.details.income_sources.is_empty() {
            ui.add_space(4.0);
            ui.strong("Income Sources");
            for (source, amount) in &report.details.income_sources {
                ui.label(format!("{source}: {}", format::currency(*amount)));
            }
        }

        let ui = &mut cols[1];
        ui.strong("Baseline");
        ui.label(format!("{}: {}", report.baseline_label, format::currency(report.baseline)));
        ui.label(format!(
            "Gross Income: {}",
            format::currency(report.details.gross_income)
        ));
        ui.label(format!(
            "Net Income: {}",
            format::currency(profile.baseline_net_income)
        ));
        for line in &report.additional_taxes {
            ui.label(line);
        }

        ui.add_space(8.0);
        let change = &report.change;
        let tone = color::tone_color(change.tone);
        ui.strong(change.change_label);
        ui.label(
            RichText::new(format!(
                "{} ({})",
                format::currency(change.change),
                format::signed_percent(change.pct_change)
            ))
            .color(tone)
            .size(20.0),
        );
        ui.label(format!("{}: {}", change.final_label, format::currency(change.final_value)));
    });
    ui.separator();

    // ---- Reform breakdown ----
    ui.strong(format!("{} by Reform", report.focus.delta_label()));
    match &report.decomposition {
        Decomposition::NoSignificantReforms => {
            ui.label(format!(
                "This household is not significantly affected by any reform for {}.",
                report.focus.label()
            ));
        }
        Decomposition::Mismatch { expected, actual } => {
            ui.label(
                RichText::new(format!(
                    "Reform changes add up to {}, but the total in the data is {}.",
                    format::currency(*actual),
                    format::currency(*expected)
                ))
                .color(Color32::RED),
            );
        }
        Decomposition::Decomposed(waterfall) => {
            egui::Grid::new("reform_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for impact in &report.impacts {
                        ui.label(&impact.name);
                        let tone = color::tone_color(report.focus.tone(impact.total_change));
                        ui.label(
                            RichText::new(format::signed_currency(impact.total_change)).color(tone),
                        );
                        ui.end_row();
                    }
                });
            ui.add_space(6.0);
            plot::waterfall_chart(ui, waterfall, report.focus);
        }
    }
    ui.separator();

    // ---- Story ----
    ui.label(RichText::new(&report.story).italics());
    ui.add_space(4.0);
    ui.small(AnalysisEngine::new(report.focus).scope_summary());
    ui.add_space(4.0);

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("📋 Copy report as JSON").clicked() {
            match serde_json::to_string_pretty(report) {
                Ok(json) => ui.ctx().copy_text(json),
                Err(e) => log::error!("could not serialise report: {e}"),
            }
        }
    });
    ui.separator();

    // ---- Raw record ----
    egui::CollapsingHeader::new("Full Household Data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| record_table(ui, record));
}

fn record_table(ui: &mut Ui, record: &HouseholdRecord) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(240.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Column");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Value");
            });
        })
        .body(|mut body| {
            for (column, value) in record.fields() {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(column);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(value.to_string());
                    });
                });
            }
        });
}
