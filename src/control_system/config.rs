use crate::error::SignalError;
use crate::global_variables::{
    BASE_GREEN_TIME, CYCLE_INTERVAL_SECS, EMERGENCY_PROBABILITY, IDLE_GREEN_TIME,
    PLUS_JUNCTION_LANES, PREEMPTION_GREEN_TIME,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables of the green/red time formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Green seconds shared out between lanes each cycle.
    pub base_green_time: u32,
    /// Multiply the green budget by the number of lanes.
    pub scale_by_lane_count: bool,
    /// Capped green seconds granted to a lane with an emergency vehicle.
    pub preemption_green_time: u32,
    /// Green seconds for non-emergency lanes when nothing is waiting anywhere.
    pub idle_green_time: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            base_green_time: BASE_GREEN_TIME,
            scale_by_lane_count: false,
            preemption_green_time: PREEMPTION_GREEN_TIME,
            idle_green_time: IDLE_GREEN_TIME,
        }
    }
}

impl AllocatorConfig {
    /// Green budget of one cycle for a ring of `lane_count` lanes.
    pub fn scale_factor(&self, lane_count: usize) -> u64 {
        let base = u64::from(self.base_green_time);
        if self.scale_by_lane_count {
            base * lane_count as u64
        } else {
            base
        }
    }

    /// Rejects settings whose green budget or cycle total cannot be
    /// expressed in whole seconds as a `u32` on the largest junction.
    pub fn validate(&self) -> Result<(), SignalError> {
        let budget = self.scale_factor(PLUS_JUNCTION_LANES);
        if budget > u64::from(u32::MAX) {
            return Err(SignalError::Config(format!(
                "green budget {budget}s does not fit in a cycle"
            )));
        }
        let widest = budget
            .max(u64::from(self.preemption_green_time))
            .max(u64::from(self.idle_green_time));
        let cycle = widest * PLUS_JUNCTION_LANES as u64;
        if cycle > u64::from(u32::MAX) {
            return Err(SignalError::Config(format!(
                "cycle total up to {cycle}s does not fit in a red time"
            )));
        }
        Ok(())
    }
}

/// Settings of the periodic controller loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub allocator: AllocatorConfig,
    pub cycle_interval_secs: u64,
    /// Stop after this many cycles; run until interrupted when absent.
    pub max_cycles: Option<u64>,
    pub emergency_probability: f64,
    pub seed: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            allocator: AllocatorConfig::default(),
            cycle_interval_secs: CYCLE_INTERVAL_SECS,
            max_cycles: None,
            emergency_probability: EMERGENCY_PROBABILITY,
            seed: None,
        }
    }
}

impl ControllerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SignalError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SignalError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SignalError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded controller config from {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        self.allocator.validate()?;
        if !(0.0..=1.0).contains(&self.emergency_probability) {
            return Err(SignalError::Config(format!(
                "emergency_probability {} is outside 0..=1",
                self.emergency_probability
            )));
        }
        Ok(())
    }
}
