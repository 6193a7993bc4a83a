//! Filter panel for baseball game results.
//!
//! The [`data`] layer loads and normalizes a game table and runs the filter
//! pipeline, [`config`] reads and writes filter presets, and [`state`] holds
//! the control-panel state the desktop front end renders.

pub mod config;
pub mod data;
pub mod state;
