//! Signal timing for a single road intersection.
//!
//! Lanes live in a fixed [`LaneRing`]; each cycle a [`LaneDataSource`] writes
//! vehicle counts and emergency flags into it, the [`SignalAllocator`] turns
//! them into green/red times and priorities, and the lanes are ordered into a
//! [`DispatchSequence`].

pub mod control_system;
pub mod data_sources;
pub mod engine;
pub mod error;
pub mod global_variables;
pub mod intersection;
pub mod monitoring;
pub mod shared_data;

pub use control_system::{
    run_cycle, AllocatorConfig, ControllerConfig, DispatchSequence, SignalAllocator,
};
pub use data_sources::LaneDataSource;
pub use error::SignalError;
pub use intersection::{
    destroy_ring, GreenTime, JunctionType, Lane, LaneNumber, LaneRing, Priority,
};
pub use shared_data::{CycleReport, LaneReading, SignalTiming};
