// config.rs
use crate::error::SimulationError;
use crate::intersection::direction::Direction;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How vehicle origins are distributed across the four approaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrafficPattern {
    /// Every approach is equally likely.
    #[default]
    Uniform,
    /// `heavy_origin` is `weight` times as likely as each other approach.
    Skewed { heavy_origin: Direction, weight: u32 },
}

/// Parameters of one simulation run, loaded from JSON. Missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Concurrent vehicle workers. Also the intersection capacity.
    pub vehicle_threads: usize,
    /// Vehicles each worker sends through, one after another.
    pub vehicles_per_thread: usize,
    /// Pause before each vehicle arrives.
    pub interarrival_ms: u64,
    /// Time a vehicle spends inside the intersection.
    pub crossing_ms: u64,
    pub traffic: TrafficPattern,
    /// Seed for reproducible routes; worker `n` uses `seed + n`.
    pub seed: Option<u64>,
    /// Where to write one row per vehicle, if anywhere.
    pub csv_path: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            vehicle_threads: 10,
            vehicles_per_thread: 20,
            interarrival_ms: 1,
            crossing_ms: 10,
            traffic: TrafficPattern::Uniform,
            seed: None,
            csv_path: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, SimulationError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SimulationError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.vehicle_threads == 0 {
            return Err(SimulationError::InvalidConfig(
                "vehicle_threads must be positive".into(),
            ));
        }
        if self.vehicles_per_thread == 0 {
            return Err(SimulationError::InvalidConfig(
                "vehicles_per_thread must be positive".into(),
            ));
        }
        if let TrafficPattern::Skewed { weight: 0, .. } = self.traffic {
            return Err(SimulationError::InvalidConfig(
                "skewed traffic weight must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn interarrival(&self) -> Duration {
        Duration::from_millis(self.interarrival_ms)
    }

    pub fn crossing(&self) -> Duration {
        Duration::from_millis(self.crossing_ms)
    }

    pub fn total_vehicles(&self) -> usize {
        self.vehicle_threads * self.vehicles_per_thread
    }
}
