//! Loading and viewing of spiking-network simulation recordings.
//!
//! The [`data`] module is the reusable core; [`config`] describes a run;
//! the viewer binary in `main.rs` draws what they produce.

pub mod config;
pub mod data;
