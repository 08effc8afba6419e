use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable 1-based identifier of a lane, assigned in ring order when the ring is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneNumber(u32);

impl LaneNumber {
    pub(crate) fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LaneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lane {}", self.0)
    }
}

/// Dispatch precedence of a lane.
///
/// Emergency lanes form one reserved tier above every normal score, so the
/// ordering never depends on a numeric sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    /// Score equal to the number of waiting vehicles.
    Normal(u32),
    Emergency,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal(0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Normal(score) => write!(f, "{score}"),
            Priority::Emergency => write!(f, "EMERGENCY"),
        }
    }
}

/// Green time allocated to a lane for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GreenTime {
    /// Share of the cycle's green budget proportional to waiting vehicles.
    Proportional(u32),
    /// Emergency preemption, counted as the capped number of seconds it holds.
    Preemption(u32),
}

impl GreenTime {
    /// Effective seconds used in every sum and in red-time arithmetic.
    pub fn seconds(self) -> u32 {
        match self {
            GreenTime::Proportional(secs) | GreenTime::Preemption(secs) => secs,
        }
    }

    pub fn is_preemption(self) -> bool {
        matches!(self, GreenTime::Preemption(_))
    }
}

impl Default for GreenTime {
    fn default() -> Self {
        GreenTime::Proportional(0)
    }
}

/// One approach to the intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    lane_number: LaneNumber,
    /// Vehicles currently waiting, supplied each cycle.
    pub(crate) vehicle_count: u32,
    /// Whether an emergency vehicle is waiting this cycle.
    pub(crate) emergency_vehicle: bool,
    pub(crate) green_time: GreenTime,
    pub(crate) red_time: u32,
    pub(crate) priority: Priority,
    /// Seconds spent waiting since the lane was last served first.
    pub(crate) waiting_time: u64,
}

impl Lane {
    /// Creates a lane with every per-cycle field zeroed.
    pub(crate) fn new(lane_number: LaneNumber) -> Self {
        Self {
            lane_number,
            vehicle_count: 0,
            emergency_vehicle: false,
            green_time: GreenTime::default(),
            red_time: 0,
            priority: Priority::default(),
            waiting_time: 0,
        }
    }

    pub fn lane_number(&self) -> LaneNumber {
        self.lane_number
    }

    pub fn vehicle_count(&self) -> u32 {
        self.vehicle_count
    }

    pub fn has_emergency_vehicle(&self) -> bool {
        self.emergency_vehicle
    }

    pub fn green_time(&self) -> GreenTime {
        self.green_time
    }

    pub fn red_time(&self) -> u32 {
        self.red_time
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn waiting_time(&self) -> u64 {
        self.waiting_time
    }

    /// Clears the inputs of the previous snapshot.
    pub(crate) fn reset_inputs(&mut self) {
        self.vehicle_count = 0;
        self.emergency_vehicle = false;
    }

    pub(crate) fn accrue_wait(&mut self, seconds: u32) {
        self.waiting_time = self.waiting_time.saturating_add(u64::from(seconds));
    }

    pub(crate) fn mark_serviced(&mut self) {
        self.waiting_time = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emergency_outranks_any_normal_score() {
        assert!(Priority::Emergency > Priority::Normal(u32::MAX));
        assert!(Priority::Normal(10) > Priority::Normal(5));
        assert_eq!(Priority::default(), Priority::Normal(0));
    }

    #[test]
    fn test_green_time_seconds() {
        assert_eq!(GreenTime::Proportional(15).seconds(), 15);
        assert_eq!(GreenTime::Preemption(120).seconds(), 120);
        assert!(GreenTime::Preemption(120).is_preemption());
        assert!(!GreenTime::Proportional(0).is_preemption());
    }

    #[test]
    fn test_new_lane_is_zeroed() {
        let lane = Lane::new(LaneNumber::new(2));
        assert_eq!(lane.lane_number().get(), 2);
        assert_eq!(lane.vehicle_count(), 0);
        assert!(!lane.has_emergency_vehicle());
        assert_eq!(lane.green_time(), GreenTime::Proportional(0));
        assert_eq!(lane.red_time(), 0);
        assert_eq!(lane.waiting_time(), 0);
    }

    #[test]
    fn test_waiting_time_saturates_and_resets() {
        let mut lane = Lane::new(LaneNumber::new(1));
        lane.waiting_time = u64::MAX - 1;
        lane.accrue_wait(10);
        assert_eq!(lane.waiting_time(), u64::MAX);
        lane.mark_serviced();
        assert_eq!(lane.waiting_time(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(LaneNumber::new(3).to_string(), "Lane 3");
        assert_eq!(Priority::Normal(7).to_string(), "7");
        assert_eq!(Priority::Emergency.to_string(), "EMERGENCY");
    }
}
