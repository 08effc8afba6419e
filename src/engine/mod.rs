// engine/mod.rs
pub mod controller;
pub mod options;

pub use controller::{run_controller_loop, run_controller_loop_until, SignalController};
pub use options::{prompt_junction_type, ControllerOptions, SourceKind, USAGE};
