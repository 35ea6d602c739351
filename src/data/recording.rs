use std::collections::BTreeMap;
use std::path::Path;

use super::error::{LoadError, LoadResult};
use super::loader::{load, reshape_to_channels, HeaderMode, RecordingFile};
use super::model::{ChannelGroup, ParsedTable};
use super::schema::ColumnSchema;

// ---------------------------------------------------------------------------
// Typed views over the simulator output formats
// ---------------------------------------------------------------------------

/// Spike events: `times[i]` is when neuron `neuron_ids[i]` fired.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeRecording {
    pub times: Vec<f64>,
    pub neuron_ids: Vec<i64>,
}

impl SpikeRecording {
    pub fn load(path: &Path, header_mode: HeaderMode) -> LoadResult<Self> {
        let file = RecordingFile::new(path, ColumnSchema::spikes()).with_header_mode(header_mode);
        Ok(Self::from_table(load(&file)?))
    }

    fn from_table(mut table: ParsedTable) -> Self {
        Self {
            times: table.take_floats("time").unwrap_or_default(),
            neuron_ids: table.take_integers("neuron_id").unwrap_or_default(),
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Earliest and latest spike time, `None` when there are no spikes.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let first = *self.times.first()?;
        Some(
            self.times
                .iter()
                .fold((first, first), |(lo, hi), &t| (lo.min(t), hi.max(t))),
        )
    }

    /// Number of spikes fired by each neuron that fired at all.
    pub fn counts_by_neuron(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for &id in &self.neuron_ids {
            *counts.entry(id).or_insert(0) += 1;
        }
        counts
    }

    /// `[time, id]` pairs, ready for a scatter plot.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.times
            .iter()
            .zip(&self.neuron_ids)
            .map(|(&t, &id)| [t, id as f64])
    }
}

/// Membrane voltages of `channel_count` neurons, reshaped to `[sample][neuron]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageRecording {
    pub times: ChannelGroup<f64>,
    pub voltages: ChannelGroup<f64>,
}

impl VoltageRecording {
    pub fn load(path: &Path, channel_count: usize, header_mode: HeaderMode) -> LoadResult<Self> {
        let file =
            RecordingFile::new(path, ColumnSchema::voltages()).with_header_mode(header_mode);
        Self::from_table(load(&file)?, channel_count)
    }

    fn from_table(mut table: ParsedTable, channel_count: usize) -> LoadResult<Self> {
        // neuron_index is parsed for type checking only; row order defines the channel.
        let times = table.take_floats("time").unwrap_or_default();
        let voltages = table.take_floats("voltage").unwrap_or_default();
        Ok(Self {
            times: reshape_to_channels(times, channel_count)?,
            voltages: reshape_to_channels(voltages, channel_count)?,
        })
    }

    pub fn channel_count(&self) -> usize {
        self.voltages.channel_count()
    }

    pub fn sample_count(&self) -> usize {
        self.voltages.sample_count()
    }

    /// `[time, voltage]` pairs of one channel.
    pub fn channel_points(&self, channel: usize) -> Vec<[f64; 2]> {
        self.times
            .channel(channel)
            .zip(self.voltages.channel(channel))
            .map(|(&t, &v)| [t, v])
            .collect()
    }

    /// Time of each sample, taken from the first channel.
    pub fn sample_times(&self) -> Vec<f64> {
        self.times.channel_series(0)
    }
}

/// The two external stimulus inputs, one row per simulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusRecording {
    pub channel_a: Vec<f64>,
    pub channel_b: Vec<f64>,
}

impl StimulusRecording {
    /// `stim.csv` has no header row.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let file = RecordingFile::new(path, ColumnSchema::stimulus()).with_header(false);
        let mut table = load(&file)?;
        Ok(Self {
            channel_a: table.take_floats("channel_a").unwrap_or_default(),
            channel_b: table.take_floats("channel_b").unwrap_or_default(),
        })
    }

    pub fn len(&self) -> usize {
        self.channel_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel_a.is_empty()
    }

    /// Attach the voltage recording's time axis to the stimulus samples.
    pub fn paired_with(&self, voltages: &VoltageRecording) -> LoadResult<TimedStimulus> {
        let time = voltages.sample_times();
        if time.len() != self.len() {
            return Err(LoadError::LengthMismatch {
                left: "stimulus",
                left_len: self.len(),
                right: "voltage samples",
                right_len: time.len(),
            });
        }
        Ok(TimedStimulus {
            time,
            channel_a: self.channel_a.clone(),
            channel_b: self.channel_b.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimedStimulus {
    pub time: Vec<f64>,
    pub channel_a: Vec<f64>,
    pub channel_b: Vec<f64>,
}

impl TimedStimulus {
    pub fn points_a(&self) -> Vec<[f64; 2]> {
        zip_points(&self.time, &self.channel_a)
    }

    pub fn points_b(&self) -> Vec<[f64; 2]> {
        zip_points(&self.time, &self.channel_b)
    }
}

/// Single adaptive-exponential neuron trace.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptationRecording {
    pub time: Vec<f64>,
    pub voltage: Vec<f64>,
    pub adaptation: Vec<f64>,
}

impl AdaptationRecording {
    /// `data.csv` has no header row; the RK4 slope columns are dropped.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let file = RecordingFile::new(path, ColumnSchema::adaptation()).with_header(false);
        let mut table = load(&file)?;
        Ok(Self {
            time: table.take_floats("time").unwrap_or_default(),
            voltage: table.take_floats("voltage").unwrap_or_default(),
            adaptation: table.take_floats("adaptation").unwrap_or_default(),
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn voltage_points(&self) -> Vec<[f64; 2]> {
        zip_points(&self.time, &self.voltage)
    }

    pub fn adaptation_points(&self) -> Vec<[f64; 2]> {
        zip_points(&self.time, &self.adaptation)
    }
}

fn zip_points(x: &[f64], y: &[f64]) -> Vec<[f64; 2]> {
    x.iter().zip(y).map(|(&x, &y)| [x, y]).collect()
}
