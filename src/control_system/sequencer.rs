use crate::intersection::{Lane, LaneNumber, LaneRing, Priority};
use serde::Serialize;
use std::fmt;

/// Order in which lanes are served this cycle, highest priority first.
///
/// Holds lane numbers only; lane data stays in the ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DispatchSequence {
    order: Vec<LaneNumber>,
}

impl DispatchSequence {
    /// Inserts lanes one by one in ring order. Each lane goes in front of the
    /// first entry with a strictly lower priority, so equal priorities keep
    /// ascending lane-number order.
    pub fn from_ring(ring: &LaneRing) -> Self {
        let mut entries: Vec<(Priority, LaneNumber)> = Vec::with_capacity(ring.lane_count());
        ring.for_each(|lane| {
            let priority = lane.priority();
            let at = entries.partition_point(|(existing, _)| *existing >= priority);
            entries.insert(at, (priority, lane.lane_number()));
        });

        Self {
            order: entries.into_iter().map(|(_, number)| number).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Lane served first.
    pub fn first(&self) -> Option<LaneNumber> {
        self.order.first().copied()
    }

    pub fn lane_numbers(&self) -> impl Iterator<Item = LaneNumber> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[LaneNumber] {
        &self.order
    }

    /// Resolves the sequence against the ring it was built from.
    pub fn lanes<'r>(&'r self, ring: &'r LaneRing) -> impl Iterator<Item = &'r Lane> + 'r {
        self.order.iter().filter_map(move |number| ring.lane(*number))
    }
}

impl fmt::Display for DispatchSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, number) in self.order.iter().enumerate() {
            if idx > 0 {
                write!(f, " > ")?;
            }
            write!(f, "{number}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::JunctionType;
    use std::collections::HashSet;

    fn ring_with_priorities(junction: JunctionType, priorities: &[Priority]) -> LaneRing {
        let mut ring = LaneRing::create(junction).unwrap();
        let mut next = priorities.iter();
        ring.for_each_mut(|lane| {
            if let Some(priority) = next.next() {
                lane.priority = *priority;
            }
        });
        ring
    }

    fn numbers(sequence: &DispatchSequence) -> Vec<u32> {
        sequence.lane_numbers().map(LaneNumber::get).collect()
    }

    #[test]
    fn test_descending_with_ties_in_lane_order() {
        let ring = ring_with_priorities(
            JunctionType::TJunction,
            &[Priority::Normal(10), Priority::Normal(5), Priority::Normal(5)],
        );
        let sequence = DispatchSequence::from_ring(&ring);
        assert_eq!(numbers(&sequence), vec![1, 2, 3]);
        assert_eq!(sequence.to_string(), "Lane 1 > Lane 2 > Lane 3");
    }

    #[test]
    fn test_emergency_goes_first() {
        let ring = ring_with_priorities(
            JunctionType::TJunction,
            &[Priority::Normal(10), Priority::Emergency, Priority::Normal(5)],
        );
        assert_eq!(numbers(&DispatchSequence::from_ring(&ring)), vec![2, 1, 3]);
    }

    #[test]
    fn test_simultaneous_emergencies_ordered_by_lane_number() {
        let ring = ring_with_priorities(
            JunctionType::PlusJunction,
            &[
                Priority::Normal(40),
                Priority::Emergency,
                Priority::Normal(2),
                Priority::Emergency,
            ],
        );
        assert_eq!(numbers(&DispatchSequence::from_ring(&ring)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_ascending_input_is_reversed() {
        let ring = ring_with_priorities(
            JunctionType::PlusJunction,
            &[
                Priority::Normal(1),
                Priority::Normal(2),
                Priority::Normal(3),
                Priority::Normal(4),
            ],
        );
        assert_eq!(numbers(&DispatchSequence::from_ring(&ring)), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_sequence_is_permutation_and_sorted() {
        let ring = ring_with_priorities(
            JunctionType::PlusJunction,
            &[
                Priority::Normal(3),
                Priority::Normal(3),
                Priority::Emergency,
                Priority::Normal(0),
            ],
        );
        let sequence = DispatchSequence::from_ring(&ring);
        assert_eq!(sequence.len(), 4);
        let unique: HashSet<_> = sequence.lane_numbers().collect();
        assert_eq!(unique.len(), 4);

        let lanes: Vec<&Lane> = sequence.lanes(&ring).collect();
        for pair in lanes.windows(2) {
            assert!(pair[0].priority() >= pair[1].priority());
            if pair[0].priority() == pair[1].priority() {
                assert!(pair[0].lane_number() < pair[1].lane_number());
            }
        }
        assert_eq!(sequence.first().map(LaneNumber::get), Some(3));
    }
}
