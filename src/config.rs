use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::HeaderMode;

// ---------------------------------------------------------------------------
// RunConfig – which recordings to show and how to interpret them
// ---------------------------------------------------------------------------

/// Expected JSON layout (every field optional):
///
/// ```json
/// {
///   "spikes": "spikes.csv",
///   "voltages": "voltages.csv",
///   "stimulus": "stim.csv",
///   "adaptation": null,
///   "channel_count": 4,
///   "header_mode": "skip",
///   "marker_times": [10.0, 40.0, 45.0, 75.0]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub spikes: Option<PathBuf>,
    pub voltages: Option<PathBuf>,
    pub stimulus: Option<PathBuf>,
    pub adaptation: Option<PathBuf>,
    /// Neurons interleaved in the voltage recording.
    pub channel_count: usize,
    pub header_mode: HeaderMode,
    /// Stimulus onsets drawn as dashed vertical lines.
    pub marker_times: Vec<f64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            spikes: Some(PathBuf::from("spikes.csv")),
            voltages: Some(PathBuf::from("voltages.csv")),
            stimulus: None,
            adaptation: None,
            channel_count: 4,
            header_mode: HeaderMode::Skip,
            marker_times: vec![10.0, 40.0, 45.0, 75.0],
        }
    }
}

impl RunConfig {
    /// Read a config file; relative recording paths resolve against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let config = config.resolve_against(base);
        config.validate()?;
        Ok(config)
    }

    pub fn resolve_against(mut self, base: &Path) -> Self {
        for slot in [
            &mut self.spikes,
            &mut self.voltages,
            &mut self.stimulus,
            &mut self.adaptation,
        ] {
            if let Some(p) = slot.as_mut() {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_count == 0 {
            bail!("channel_count must be at least 1");
        }
        if let Some(t) = self.marker_times.iter().find(|t| !t.is_finite()) {
            bail!("marker time {t} is not finite");
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing config")
    }
}
