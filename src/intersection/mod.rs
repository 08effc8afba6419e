// intersection/mod.rs
pub mod lane;
pub mod ring;

pub use lane::{GreenTime, Lane, LaneNumber, Priority};
pub use ring::{destroy_ring, JunctionType, LaneRing, RingIter};
