//! Configuration for graph construction and logging.
//!
//! The distance cutoff itself is fixed (see [`crate::graph::EDGE_THRESHOLD`]);
//! only how neighbors are found and how chatty the console logger is can be
//! tuned. From JavaScript the config is a plain object, e.g.
//! `{ neighborSearch: "spatialIndex", logLevel: "debug" }`.

use serde::{Deserialize, Serialize};

/// Strategy used to find vertex pairs within the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NeighborSearch {
    /// Test every ordered pair. O(V²), no extra memory.
    #[default]
    AllPairs,
    /// Query a 3D R-tree for candidates, then confirm each exactly.
    SpatialIndex,
}

/// Maximum level forwarded by the console logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for building a proximity graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProximityConfig {
    /// Neighbor search strategy (default: all pairs).
    pub neighbor_search: NeighborSearch,
    /// Console log level (default: info).
    pub log_level: LogLevel,
}
