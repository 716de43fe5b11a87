use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use household_impact::analysis::{AnalysisFocus, StepKind, Waterfall};
use household_impact::format;

use crate::color;

// ---------------------------------------------------------------------------
// Waterfall chart (central panel)
// ---------------------------------------------------------------------------

const BAR_WIDTH: f64 = 0.6;

/// Render the baseline → reforms → final waterfall.
///
/// Baseline and final bars start at zero; each reform bar floats on the
/// running total before it.
pub fn waterfall_chart(ui: &mut Ui, waterfall: &Waterfall, focus: AnalysisFocus) {
    ui.strong(&waterfall.title);

    let bars: Vec<Bar> = waterfall
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let fill = match step.kind {
                StepKind::Baseline | StepKind::Final => color::totals_color(),
                StepKind::Reform => color::tone_color(focus.tone(step.amount)),
            };
            let text = match step.kind {
                StepKind::Reform => format::signed_currency(step.amount),
                _ => format::currency(step.amount),
            };
            Bar::new(i as f64, step.amount)
                .base_offset(step.base())
                .width(BAR_WIDTH)
                .fill(fill)
                .name(format!("{}: {text}", step.label))
        })
        .collect();

    let chart = BarChart::new(bars).color(Color32::GRAY);
    let (min, max) = waterfall.value_range();

    Plot::new("waterfall_plot")
        .height(ui.available_height().max(260.0) * 0.6)
        .x_axis_label("Step (baseline, reforms, final)")
        .y_axis_label(focus.label())
        .include_y(min)
        .include_y(max)
        .include_x(-0.5)
        .include_x(waterfall.steps.len() as f64 - 0.5)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });

    // Step index legend under the chart.
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, step) in waterfall.steps.iter().enumerate() {
            ui.small(format!("{i}: {}", step.label));
        }
    });
}
