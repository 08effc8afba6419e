// src/shared_data.rs

use crate::control_system::sequencer::DispatchSequence;
use crate::intersection::{GreenTime, JunctionType, Lane, LaneNumber, Priority};
use serde::{Deserialize, Serialize};

/// One row of the lane store: `lane_number, vehicle_count, emergency_vehicle`.
///
/// Values are kept as raw integers; the ring validates them on `populate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneReading {
    pub lane_number: i64,
    pub vehicle_count: i64,
    pub emergency_vehicle: i64,
}

/// Computed signal timing of a single lane for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalTiming {
    pub lane_number: LaneNumber,
    pub vehicle_count: u32,
    pub emergency_vehicle: bool,
    pub green_time: GreenTime,
    pub red_time: u32,
    pub priority: Priority,
    pub waiting_time: u64,
}

impl From<&Lane> for SignalTiming {
    fn from(lane: &Lane) -> Self {
        Self {
            lane_number: lane.lane_number(),
            vehicle_count: lane.vehicle_count(),
            emergency_vehicle: lane.has_emergency_vehicle(),
            green_time: lane.green_time(),
            red_time: lane.red_time(),
            priority: lane.priority(),
            waiting_time: lane.waiting_time(),
        }
    }
}

/// Everything one evaluation cycle produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub junction: JunctionType,
    pub total_vehicles: u64,
    /// Sum of every lane's effective green seconds.
    pub total_time: u64,
    /// Per-lane timings in ring order.
    pub timings: Vec<SignalTiming>,
    pub sequence: DispatchSequence,
}

impl CycleReport {
    pub fn timing(&self, lane_number: LaneNumber) -> Option<&SignalTiming> {
        self.timings.iter().find(|t| t.lane_number == lane_number)
    }

    /// Timings in dispatch order, highest priority first.
    pub fn dispatch_order(&self) -> impl Iterator<Item = &SignalTiming> + '_ {
        self.sequence
            .lane_numbers()
            .filter_map(move |number| self.timing(number))
    }
}
