// data_sources/mod.rs
pub mod csv_store;
pub mod interactive_source;
pub mod random_source;

pub use csv_store::CsvLaneStore;
pub use interactive_source::InteractiveSource;
pub use random_source::RandomTrafficSource;

use crate::error::SignalError;
use crate::intersection::LaneRing;

/// Supplies a fresh snapshot of vehicle counts and emergency flags before each cycle.
pub trait LaneDataSource {
    fn name(&self) -> &str;

    /// Writes the snapshot into the ring through [`LaneRing::populate`].
    fn fetch(&mut self, ring: &mut LaneRing) -> Result<(), SignalError>;
}

impl<S: LaneDataSource + ?Sized> LaneDataSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&mut self, ring: &mut LaneRing) -> Result<(), SignalError> {
        (**self).fetch(ring)
    }
}
