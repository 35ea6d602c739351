use std::fmt;
use std::path::{Path, PathBuf};

use rusty_raster::config::RunConfig;
use rusty_raster::data::{
    AdaptationRecording, LoadResult, SpikeRecording, StimulusRecording, TimedStimulus,
    VoltageRecording,
};

use crate::color::ChannelColors;

// ---------------------------------------------------------------------------
// Per-recording load status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RecordingStatus {
    NotConfigured,
    Loaded(String),
    Failed(String),
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingStatus::NotConfigured => write!(f, "not configured"),
            RecordingStatus::Loaded(summary) => write!(f, "{summary}"),
            RecordingStatus::Failed(err) => write!(f, "error: {err}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: RunConfig,
    /// Where `config` came from, for the title bar and reloads.
    pub config_path: Option<PathBuf>,

    pub spikes: Option<SpikeRecording>,
    pub voltages: Option<VoltageRecording>,
    pub stimulus: Option<TimedStimulus>,
    pub adaptation: Option<AdaptationRecording>,

    /// Status line per recording kind, in display order.
    pub statuses: Vec<(&'static str, RecordingStatus)>,

    /// Which voltage channels are drawn.
    pub visible_channels: Vec<bool>,
    pub colors: ChannelColors,

    /// Error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: RunConfig, config_path: Option<PathBuf>) -> Self {
        let channel_count = config.channel_count;
        Self {
            config,
            config_path,
            spikes: None,
            voltages: None,
            stimulus: None,
            adaptation: None,
            statuses: Vec::new(),
            visible_channels: vec![true; channel_count],
            colors: ChannelColors::new(channel_count),
            status_message: None,
        }
    }

    /// Replace the config with one read from disk and reload everything.
    pub fn open_config(&mut self, path: &Path) {
        match RunConfig::from_file(path) {
            Ok(config) => {
                log::info!("Opened config {}", path.display());
                *self = AppState::new(config, Some(path.to_path_buf()));
                self.reload();
            }
            Err(e) => {
                log::error!("Failed to open config: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Load every configured recording from scratch.
    ///
    /// A recording that fails to load is cleared so nothing inconsistent is
    /// drawn; the others are unaffected.
    pub fn reload(&mut self) {
        let channel_count = self.config.channel_count;
        let header_mode = self.config.header_mode;

        let (spikes, spikes_status) = load_slot("spikes", self.config.spikes.as_deref(), |p| {
            SpikeRecording::load(p, header_mode)
        });
        let (voltages, voltages_status) =
            load_slot("voltages", self.config.voltages.as_deref(), |p| {
                VoltageRecording::load(p, channel_count, header_mode)
            });
        let (stimulus, stimulus_status) =
            load_slot("stimulus", self.config.stimulus.as_deref(), |p| {
                let stim = StimulusRecording::load(p)?;
                match &voltages {
                    Some(v) => stim.paired_with(v).map(Some),
                    None => Ok(None),
                }
            });
        let (adaptation, adaptation_status) =
            load_slot("adaptation", self.config.adaptation.as_deref(), AdaptationRecording::load);

        // Stimulus has no time column of its own.
        let stimulus_status = match (&stimulus, stimulus_status) {
            (Some(None), RecordingStatus::Loaded(_)) => {
                RecordingStatus::Failed("needs the voltage recording for its time axis".into())
            }
            (_, status) => status,
        };

        self.spikes = spikes;
        self.voltages = voltages;
        self.stimulus = stimulus.flatten();
        self.adaptation = adaptation;
        self.statuses = vec![
            ("Spikes", spikes_status),
            ("Voltages", voltages_status),
            ("Stimulus", stimulus_status),
            ("Adaptation", adaptation_status),
        ];

        let failures: Vec<String> = self
            .statuses
            .iter()
            .filter_map(|(name, status)| match status {
                RecordingStatus::Failed(err) => Some(format!("{name}: {err}")),
                _ => None,
            })
            .collect();
        self.status_message = (!failures.is_empty()).then(|| failures.join("; "));
    }

    pub fn toggle_channel(&mut self, channel: usize) {
        if let Some(visible) = self.visible_channels.get_mut(channel) {
            *visible = !*visible;
        }
    }

    pub fn set_all_channels(&mut self, visible: bool) {
        self.visible_channels.iter_mut().for_each(|v| *v = visible);
    }

    pub fn is_channel_visible(&self, channel: usize) -> bool {
        self.visible_channels.get(channel).copied().unwrap_or(false)
    }

    /// Whether a neuron's spikes go on the raster. Only neurons with a toggled-off
    /// voltage channel are hidden; ids outside `0..channel_count` always show.
    pub fn is_neuron_shown(&self, id: i64) -> bool {
        usize::try_from(id)
            .ok()
            .and_then(|c| self.visible_channels.get(c).copied())
            .unwrap_or(true)
    }

    /// Time span covered by any loaded recording, shared by all plots.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        let mut include = |t: f64| {
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(t), hi.max(t)),
                None => (t, t),
            });
        };

        if let Some((lo, hi)) = self.spikes.as_ref().and_then(SpikeRecording::time_range) {
            include(lo);
            include(hi);
        }
        if let Some(v) = &self.voltages {
            v.times.rows().iter().flatten().for_each(|&t| include(t));
        }
        if let Some(s) = &self.stimulus {
            s.time.iter().for_each(|&t| include(t));
        }
        if let Some(a) = &self.adaptation {
            a.time.iter().for_each(|&t| include(t));
        }
        bounds
    }

    pub fn has_data(&self) -> bool {
        self.spikes.is_some()
            || self.voltages.is_some()
            || self.stimulus.is_some()
            || self.adaptation.is_some()
    }
}

fn load_slot<T>(
    name: &str,
    path: Option<&Path>,
    load: impl FnOnce(&Path) -> LoadResult<T>,
) -> (Option<T>, RecordingStatus) {
    let Some(path) = path else {
        return (None, RecordingStatus::NotConfigured);
    };
    match load(path) {
        Ok(recording) => {
            log::info!("Loaded {name} from {}", path.display());
            let summary = format!("{}", path.display());
            (Some(recording), RecordingStatus::Loaded(summary))
        }
        Err(e) => {
            log::error!("Failed to load {name} from {}: {e}", path.display());
            (None, RecordingStatus::Failed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn config_in(dir: &Path) -> RunConfig {
        RunConfig {
            spikes: Some(write(dir, "spikes.csv", "Time [ms], Neuron ID\n1.0, 0\n2.0, 1\n")),
            voltages: Some(write(
                dir,
                "voltages.csv",
                "Time [ms], Neuron number, V\n0.0, 0, -60\n0.0, 1, -61\n0.1, 0, -59\n0.1, 1, -58\n",
            )),
            stimulus: Some(write(dir, "stim.csv", "0.5, 0\n0, 0.5\n")),
            adaptation: None,
            channel_count: 2,
            ..RunConfig::default()
        }
    }

    #[test]
    fn reload_loads_every_configured_recording() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(config_in(dir.path()), None);
        state.reload();

        assert_eq!(state.spikes.as_ref().map(SpikeRecording::len), Some(2));
        assert_eq!(state.voltages.as_ref().map(|v| v.sample_count()), Some(2));
        assert_eq!(state.stimulus.as_ref().map(|s| s.time.clone()), Some(vec![0.0, 0.1]));
        assert!(state.adaptation.is_none());
        assert_eq!(state.statuses[3].1, RecordingStatus::NotConfigured);
        assert!(state.status_message.is_none());
        assert_eq!(state.time_range(), Some((0.0, 2.0)));
    }

    #[test]
    fn failed_recording_is_cleared_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.channel_count = 3;
        let mut state = AppState::new(config, None);
        state.reload();

        // 4 voltage rows do not split into 3 channels; stimulus loses its time axis.
        assert!(state.voltages.is_none());
        assert!(state.stimulus.is_none());
        assert!(state.spikes.is_some());
        assert!(matches!(state.statuses[1].1, RecordingStatus::Failed(_)));
        assert!(matches!(state.statuses[2].1, RecordingStatus::Failed(_)));
        assert!(state.status_message.as_deref().unwrap().starts_with("Voltages:"));
    }

    #[test]
    fn channel_toggles() {
        let mut state = AppState::new(RunConfig::default(), None);
        assert_eq!(state.visible_channels.len(), 4);
        state.toggle_channel(2);
        assert!(!state.is_channel_visible(2));
        state.toggle_channel(9);
        state.set_all_channels(false);
        assert!(!state.is_channel_visible(0));
        state.set_all_channels(true);
        assert!(state.is_channel_visible(2));
        assert!(!state.is_channel_visible(4));
    }

    #[test]
    fn raster_shows_neurons_beyond_voltage_channels() {
        let mut state = AppState::new(RunConfig::default(), None);
        state.toggle_channel(1);

        assert!(state.is_neuron_shown(0));
        assert!(!state.is_neuron_shown(1));
        assert!(state.is_neuron_shown(4));
        assert!(state.is_neuron_shown(7));
        assert!(state.is_neuron_shown(-1));

        state.set_all_channels(false);
        assert!(!state.is_neuron_shown(3));
        assert!(state.is_neuron_shown(7));
    }
}
