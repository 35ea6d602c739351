use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, RecordingStatus};

// ---------------------------------------------------------------------------
// Left side panel – channels and recording status
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Channels");
            ui.separator();

            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.set_all_channels(true);
                }
                if ui.small_button("None").clicked() {
                    state.set_all_channels(false);
                }
            });

            for (channel, (name, color)) in state.colors.legend_entries().into_iter().enumerate() {
                let mut checked = state.is_channel_visible(channel);
                let label = RichText::new(format!("Neuron {name}")).color(color);
                if ui.checkbox(&mut checked, label).changed() {
                    state.toggle_channel(channel);
                }
            }

            ui.add_space(8.0);
            ui.heading("Recordings");
            ui.separator();

            for (name, status) in &state.statuses {
                let color = match status {
                    RecordingStatus::NotConfigured => Color32::GRAY,
                    RecordingStatus::Loaded(_) => ui.visuals().text_color(),
                    RecordingStatus::Failed(_) => Color32::RED,
                };
                ui.strong(*name);
                ui.label(RichText::new(status.to_string()).color(color).small());
            }

            if !state.config.marker_times.is_empty() {
                ui.add_space(8.0);
                ui.heading("Markers");
                ui.separator();
                let times: Vec<String> = state
                    .config
                    .marker_times
                    .iter()
                    .map(|t| format!("{t} ms"))
                    .collect();
                ui.label(times.join(", "));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open config…").clicked() {
                open_config_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(path) = &state.config_path {
            ui.label(path.display().to_string());
            ui.separator();
        }

        if let Some(spikes) = &state.spikes {
            ui.label(format!("{} spikes", spikes.len()));
        }
        if let Some(voltages) = &state.voltages {
            ui.label(format!(
                "{} samples × {} neurons",
                voltages.sample_count(),
                voltages.channel_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_config_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open run config")
        .add_filter("Run config", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_config(&path);
    }
}
