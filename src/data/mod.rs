/// Data layer: column schemas, loading, reshaping, typed recordings.
///
/// Architecture:
/// ```text
///  spikes.csv / voltages.csv / stim.csv / data.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  rows → zip_columns → typed parse → ParsedTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ reshape_to_channels│  flat row-major → ChannelGroup [sample][channel]
///   └──────────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ recording  │  SpikeRecording, VoltageRecording, ...
///   └───────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod recording;
pub mod schema;

pub use error::{LoadError, LoadResult};
pub use loader::{load, load_reader, reshape_to_channels, zip_columns, HeaderMode, RecordingFile};
pub use model::{ChannelGroup, ColumnValues, ParsedTable};
pub use recording::{
    AdaptationRecording, SpikeRecording, StimulusRecording, TimedStimulus, VoltageRecording,
};
pub use schema::{ColumnKind, ColumnSchema, ColumnSpec};
