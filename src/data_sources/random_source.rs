use crate::data_sources::LaneDataSource;
use crate::error::SignalError;
use crate::global_variables::{EMERGENCY_PROBABILITY, MAX_ARRIVALS_PER_CYCLE};
use crate::intersection::LaneRing;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Simulated sensors: every cycle a few vehicles arrive on each lane and an
/// emergency vehicle shows up with a fixed probability.
pub struct RandomTrafficSource {
    rng: StdRng,
    max_arrivals: u32,
    emergency_probability: f64,
}

impl RandomTrafficSource {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Reproducible source for tests and benchmarks.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            max_arrivals: MAX_ARRIVALS_PER_CYCLE,
            emergency_probability: EMERGENCY_PROBABILITY,
        }
    }

    pub fn with_emergency_probability(mut self, probability: f64) -> Result<Self, SignalError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(SignalError::InvalidInput(format!(
                "emergency probability {probability}"
            )));
        }
        self.emergency_probability = probability;
        Ok(self)
    }

    /// Arrivals per lane are drawn from `0..max_arrivals`.
    pub fn with_max_arrivals(mut self, max_arrivals: u32) -> Self {
        self.max_arrivals = max_arrivals;
        self
    }
}

impl Default for RandomTrafficSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LaneDataSource for RandomTrafficSource {
    fn name(&self) -> &str {
        "random"
    }

    fn fetch(&mut self, ring: &mut LaneRing) -> Result<(), SignalError> {
        let current: Vec<(u32, u32)> = ring
            .iter()
            .map(|lane| (lane.lane_number().get(), lane.vehicle_count()))
            .collect();

        for (lane_number, count) in current {
            let arrivals = if self.max_arrivals == 0 {
                0
            } else {
                self.rng.random_range(0..self.max_arrivals)
            };
            let emergency = self.rng.random_bool(self.emergency_probability);
            let next = count.saturating_add(arrivals);
            ring.populate(lane_number, i64::from(next), i64::from(emergency))?;
        }
        log::debug!("Random source refreshed {} lanes", ring.lane_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::JunctionType;

    fn counts(ring: &LaneRing) -> Vec<u32> {
        ring.iter().map(|lane| lane.vehicle_count()).collect()
    }

    #[test]
    fn test_counts_only_grow_within_bounds() {
        let mut ring = LaneRing::create(JunctionType::PlusJunction).unwrap();
        let mut source = RandomTrafficSource::seeded(7);
        let mut previous = counts(&ring);
        for _ in 0..20 {
            source.fetch(&mut ring).unwrap();
            let now = counts(&ring);
            for (before, after) in previous.iter().zip(&now) {
                assert!(after >= before);
                assert!(after - before < MAX_ARRIVALS_PER_CYCLE);
            }
            previous = now;
        }
    }

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = LaneRing::create(JunctionType::TJunction).unwrap();
        let mut b = LaneRing::create(JunctionType::TJunction).unwrap();
        let mut source_a = RandomTrafficSource::seeded(42);
        let mut source_b = RandomTrafficSource::seeded(42);
        for _ in 0..5 {
            source_a.fetch(&mut a).unwrap();
            source_b.fetch(&mut b).unwrap();
        }
        assert_eq!(counts(&a), counts(&b));
    }

    #[test]
    fn test_emergency_probability_extremes() {
        let mut ring = LaneRing::create(JunctionType::TJunction).unwrap();
        let mut never = RandomTrafficSource::seeded(1)
            .with_emergency_probability(0.0)
            .unwrap();
        never.fetch(&mut ring).unwrap();
        assert!(ring.iter().all(|lane| !lane.has_emergency_vehicle()));

        let mut always = RandomTrafficSource::seeded(1)
            .with_emergency_probability(1.0)
            .unwrap();
        always.fetch(&mut ring).unwrap();
        assert!(ring.iter().all(|lane| lane.has_emergency_vehicle()));

        assert!(RandomTrafficSource::seeded(1)
            .with_emergency_probability(2.0)
            .is_err());
    }

    #[test]
    fn test_no_arrivals() {
        let mut ring = LaneRing::create(JunctionType::TJunction).unwrap();
        let mut source = RandomTrafficSource::seeded(3).with_max_arrivals(0);
        source.fetch(&mut ring).unwrap();
        assert_eq!(counts(&ring), vec![0, 0, 0]);
    }
}
