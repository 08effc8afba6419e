// control_system/mod.rs
pub mod config;
pub mod sequencer;
pub mod signal_allocator;

pub use config::{AllocatorConfig, ControllerConfig};
pub use sequencer::DispatchSequence;
pub use signal_allocator::{run_cycle, SignalAllocator};
