// Green time shared out between the lanes of one cycle (seconds).
pub const BASE_GREEN_TIME: u32 = 30;

// Capped green time granted to a lane carrying an emergency vehicle (seconds).
pub const PREEMPTION_GREEN_TIME: u32 = 120;

// Green time given to every non-emergency lane when no vehicles are waiting.
pub const IDLE_GREEN_TIME: u32 = 0;

// Lane counts per junction type.
pub const T_JUNCTION_LANES: usize = 3;
pub const PLUS_JUNCTION_LANES: usize = 4;

// Pause between two evaluation cycles (seconds).
pub const CYCLE_INTERVAL_SECS: u64 = 10;

// Random traffic generation.
pub const MAX_ARRIVALS_PER_CYCLE: u32 = 5;
pub const EMERGENCY_PROBABILITY: f64 = 0.5;

// Default lane store file.
pub const LANE_STORE_CSV: &str = "lanes.csv";
