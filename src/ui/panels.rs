use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use household_impact::analysis::AnalysisFocus;
use household_impact::config::DEFAULT_DATA_FILE;
use household_impact::data::filter::{
    label_of, StateFilter, AGE_RANGES, DEPENDENT_OPTIONS, INCOME_RANGES, MARITAL_OPTIONS,
    WEIGHT_OPTIONS,
};
use household_impact::selection::InterestingCase;

use crate::state::{AppState, SelectionMethod};

// ---------------------------------------------------------------------------
// Left side panel – filters, household selection, analysis type
// ---------------------------------------------------------------------------

/// Render the left panel and recompute when any choice changed.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Household");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let states: Vec<String> = dataset.states.iter().cloned().collect();

    let before = state.inputs.clone();
    let mut reshuffle = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Filters ----
            egui::CollapsingHeader::new(RichText::new("🔍 Filters").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    filter_widgets(ui, state, &states);
                    ui.small(format!("📊 {}", state.visible_summary));
                });
            ui.separator();

            // ---- Selection method ----
            ui.strong("Selection Method");
            for method in SelectionMethod::ALL {
                ui.radio_value(&mut state.inputs.method, method, method.label());
            }
            ui.add_space(4.0);

            match state.inputs.method {
                SelectionMethod::RandomShuffle => {
                    if ui.button("🎲 Get Random Household").clicked() {
                        reshuffle = true;
                    }
                    if let Some(id) = state.session.current() {
                        ui.label(format!("Random Household ID: {id}"));
                    }
                }
                SelectionMethod::ById => id_picker(ui, state),
                SelectionMethod::InterestingCases => case_picker(ui, state),
            }
            ui.separator();

            // ---- Analysis type ----
            ui.strong("Analysis Type");
            for focus in AnalysisFocus::ALL {
                ui.radio_value(&mut state.inputs.focus, focus, focus.label());
            }
        });

    if reshuffle {
        state.reshuffle();
    } else if state.inputs != before {
        state.refresh();
    }
}

fn filter_widgets(ui: &mut Ui, state: &mut AppState, states: &[String]) {
    let criteria = &mut state.inputs.criteria;

    egui::ComboBox::from_label("Minimum Household Weight")
        .selected_text(label_of(&WEIGHT_OPTIONS, &criteria.min_weight))
        .show_ui(ui, |ui: &mut Ui| {
            for (label, value) in WEIGHT_OPTIONS {
                ui.selectable_value(&mut criteria.min_weight, value, label);
            }
        });

    egui::ComboBox::from_label("Net Income")
        .selected_text(label_of(&INCOME_RANGES, &criteria.income))
        .show_ui(ui, |ui: &mut Ui| {
            for (label, value) in INCOME_RANGES {
                ui.selectable_value(&mut criteria.income, value, label);
            }
        });

    egui::ComboBox::from_label("State")
        .selected_text(criteria.state.label().to_string())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut criteria.state, StateFilter::All, StateFilter::ALL_LABEL);
            for s in states {
                ui.selectable_value(&mut criteria.state, StateFilter::Only(s.clone()), s);
            }
        });

    egui::ComboBox::from_label("Marital Status")
        .selected_text(label_of(&MARITAL_OPTIONS, &criteria.marital))
        .show_ui(ui, |ui: &mut Ui| {
            for (label, value) in MARITAL_OPTIONS {
                ui.selectable_value(&mut criteria.marital, value, label);
            }
        });

    egui::ComboBox::from_label("Number of Dependents")
        .selected_text(label_of(&DEPENDENT_OPTIONS, &criteria.dependents))
        .show_ui(ui, |ui: &mut Ui| {
            for (label, value) in DEPENDENT_OPTIONS {
                ui.selectable_value(&mut criteria.dependents, value, label);
            }
        });

    egui::ComboBox::from_label("Head of Household Age")
        .selected_text(label_of(&AGE_RANGES, &criteria.age))
        .show_ui(ui, |ui: &mut Ui| {
            for (label, value) in AGE_RANGES {
                ui.selectable_value(&mut criteria.age, value, label);
            }
        });

    ui.checkbox(&mut criteria.single_tax_unit, "Households with Only 1 Tax Unit");
}

fn id_picker(ui: &mut Ui, state: &mut AppState) {
    let selected = state
        .inputs
        .chosen_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    egui::ComboBox::from_label("Choose Household ID")
        .selected_text(selected)
        .height(320.0)
        .show_ui(ui, |ui: &mut Ui| {
            for &id in &state.visible_ids {
                ui.selectable_value(&mut state.inputs.chosen_id, Some(id), id.to_string());
            }
        });
}

fn case_picker(ui: &mut Ui, state: &mut AppState) {
    let previous_case = state.inputs.case;
    egui::ComboBox::from_label("Select Case Type")
        .selected_text(state.inputs.case.label())
        .show_ui(ui, |ui: &mut Ui| {
            for case in InterestingCase::ALL {
                ui.selectable_value(&mut state.inputs.case, case, case.label());
            }
        });
    if state.inputs.case != previous_case {
        state.inputs.case_rank = 1;
    }

    let current_label = state
        .ranked
        .get(state.inputs.case_rank.saturating_sub(1))
        .map(|c| c.label.clone())
        .unwrap_or_default();
    egui::ComboBox::from_label(format!("Top {} for {}", state.ranked.len(), state.inputs.case.label()))
        .selected_text(current_label)
        .show_ui(ui, |ui: &mut Ui| {
            for candidate in &state.ranked {
                ui.selectable_value(&mut state.inputs.case_rank, candidate.rank, &candidate.label);
            }
        });

    if let Some(candidate) = state.ranked.get(state.inputs.case_rank.saturating_sub(1)) {
        ui.label(format!("Selected Household ID: {}", candidate.household_id));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} households loaded", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open household dataset")
        .set_file_name(DEFAULT_DATA_FILE)
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, &path);
    }
}

/// Load a dataset and hand it to the state, reporting failures in the bar.
pub fn load_into(state: &mut AppState, path: &std::path::Path) {
    match household_impact::data::loader::load_file(path) {
        Ok(dataset) => state.set_dataset(dataset),
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", path.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
