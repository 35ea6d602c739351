use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, PlotUi, Points, VLine};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Stacked recording plots (central panel)
// ---------------------------------------------------------------------------

const MARKER_COLOR: Color32 = Color32::from_gray(140);

/// Render one plot per loaded recording, stacked vertically on a common time range.
pub fn recording_plots(ui: &mut Ui, state: &AppState) {
    if !state.has_data() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No recordings loaded  (File → Open config…)");
        });
        return;
    }

    let panels = [
        state.voltages.is_some(),
        state.spikes.is_some(),
        state.stimulus.is_some(),
        state.adaptation.is_some(),
    ]
    .iter()
    .filter(|&&shown| shown)
    .count();
    let spacing = ui.spacing().item_spacing.y;
    let height = (ui.available_height() - spacing * (panels as f32 - 1.0)) / panels as f32;
    let range = state.time_range();

    if state.voltages.is_some() {
        voltage_plot(ui, state, height, range);
    }
    if state.spikes.is_some() {
        spike_raster(ui, state, height, range);
    }
    if state.stimulus.is_some() {
        stimulus_plot(ui, state, height, range);
    }
    if state.adaptation.is_some() {
        adaptation_plot(ui, state, height, range);
    }
}

/// Shared axis setup: the same x range for every panel.
fn time_plot(id: &str, height: f32, range: Option<(f64, f64)>) -> Plot {
    let plot = Plot::new(id)
        .height(height)
        .x_axis_label("Time [ms]")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    match range {
        Some((lo, hi)) => plot.include_x(lo).include_x(hi),
        None => plot,
    }
}

fn draw_markers(plot_ui: &mut PlotUi, state: &AppState) {
    for &t in &state.config.marker_times {
        plot_ui.vline(
            VLine::new(t)
                .color(MARKER_COLOR)
                .style(LineStyle::dashed_loose()),
        );
    }
}

fn voltage_plot(ui: &mut Ui, state: &AppState, height: f32, range: Option<(f64, f64)>) {
    let Some(voltages) = &state.voltages else {
        return;
    };

    time_plot("voltage_plot", height, range)
        .legend(Legend::default())
        .y_axis_label("Membrane voltage [mV]")
        .show(ui, |plot_ui| {
            for channel in 0..voltages.channel_count() {
                if !state.is_channel_visible(channel) {
                    continue;
                }
                let line = Line::new(PlotPoints::new(voltages.channel_points(channel)))
                    .name(channel.to_string())
                    .color(state.colors.color_for(channel as i64))
                    .width(1.5);
                plot_ui.line(line);
            }
            draw_markers(plot_ui, state);
        });
}

fn spike_raster(ui: &mut Ui, state: &AppState, height: f32, range: Option<(f64, f64)>) {
    let Some(spikes) = &state.spikes else {
        return;
    };

    time_plot("spike_raster", height, range)
        .y_axis_label("Neuron ID")
        .include_y(0.0)
        .include_y(state.config.channel_count as f64)
        .show(ui, |plot_ui| {
            // One series per neuron so each keeps its channel colour.
            for (&id, _) in spikes.counts_by_neuron().iter() {
                if !state.is_neuron_shown(id) {
                    continue;
                }
                let points: Vec<[f64; 2]> = spikes.points().filter(|p| p[1] == id as f64).collect();
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .radius(2.0)
                        .color(state.colors.color_for(id)),
                );
            }
            draw_markers(plot_ui, state);
        });
}

fn stimulus_plot(ui: &mut Ui, state: &AppState, height: f32, range: Option<(f64, f64)>) {
    let Some(stimulus) = &state.stimulus else {
        return;
    };

    time_plot("stimulus_plot", height, range)
        .legend(Legend::default())
        .y_axis_label("Stimulus")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::new(stimulus.points_a()))
                    .name("A")
                    .color(Color32::from_rgb(220, 70, 70))
                    .width(1.5),
            );
            plot_ui.line(
                Line::new(PlotPoints::new(stimulus.points_b()))
                    .name("B")
                    .color(Color32::from_rgb(70, 110, 220))
                    .width(1.5),
            );
            draw_markers(plot_ui, state);
        });
}

fn adaptation_plot(ui: &mut Ui, state: &AppState, height: f32, range: Option<(f64, f64)>) {
    let Some(adaptation) = &state.adaptation else {
        return;
    };

    time_plot("adaptation_plot", height, range)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::new(adaptation.voltage_points()))
                    .name("V [mV]")
                    .width(1.5),
            );
            plot_ui.line(
                Line::new(PlotPoints::new(adaptation.adaptation_points()))
                    .name("w [pA]")
                    .width(1.5),
            );
        });
}
