use crate::error::SignalError;
use crate::global_variables::{PLUS_JUNCTION_LANES, T_JUNCTION_LANES};
use crate::intersection::lane::{Lane, LaneNumber};
use crate::shared_data::LaneReading;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical layout of the intersection; fixes the number of lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JunctionType {
    /// Three approaches.
    TJunction,
    /// Four approaches.
    PlusJunction,
}

impl JunctionType {
    pub fn lane_count(self) -> usize {
        match self {
            JunctionType::TJunction => T_JUNCTION_LANES,
            JunctionType::PlusJunction => PLUS_JUNCTION_LANES,
        }
    }

    /// Maps the operator code (0 for T, 1 for +) to a junction type.
    pub fn from_code(code: i64) -> Result<Self, SignalError> {
        match code {
            0 => Ok(JunctionType::TJunction),
            1 => Ok(JunctionType::PlusJunction),
            other => Err(SignalError::InvalidInput(format!(
                "intersection type {other} (expected 0 for T, 1 for +)"
            ))),
        }
    }
}

impl FromStr for JunctionType {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "t" | "tee" | "t-junction" => Ok(JunctionType::TJunction),
            "1" | "+" | "plus" | "cross" | "+-junction" => Ok(JunctionType::PlusJunction),
            other => Err(SignalError::InvalidInput(format!(
                "intersection type '{other}' (expected t or plus)"
            ))),
        }
    }
}

impl fmt::Display for JunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JunctionType::TJunction => write!(f, "T-junction"),
            JunctionType::PlusJunction => write!(f, "+-junction"),
        }
    }
}

/// Closed loop of the lanes of one intersection.
///
/// Lanes live in a single vector in ring order; the successor of the last lane
/// is the first. No lane is added or removed after creation.
#[derive(Debug, Clone)]
pub struct LaneRing {
    junction: JunctionType,
    lanes: Vec<Lane>,
}

impl LaneRing {
    /// Allocates every lane of the junction, numbered 1..=n with zeroed fields.
    pub fn create(junction: JunctionType) -> Result<Self, SignalError> {
        let count = junction.lane_count();
        let mut lanes = Vec::new();
        lanes.try_reserve_exact(count).map_err(|e| {
            SignalError::ResourceExhausted(format!("storage for {count} lanes: {e}"))
        })?;
        lanes.extend((1..=count as u32).map(|n| Lane::new(LaneNumber::new(n))));

        log::debug!("Created {} ring with {} lanes", junction, count);
        Ok(Self { junction, lanes })
    }

    /// Releases the ring and all of its lanes at once.
    pub fn destroy(self) {
        log::debug!("Releasing {} ring", self.junction);
    }

    pub fn junction_type(&self) -> JunctionType {
        self.junction
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// First lane of the ring (lane 1).
    pub fn head(&self) -> &Lane {
        &self.lanes[0]
    }

    pub fn lane(&self, lane_number: LaneNumber) -> Option<&Lane> {
        self.position(lane_number.get()).map(|idx| &self.lanes[idx])
    }

    /// Looks up a lane by its raw number, as supplied by an input collaborator.
    pub fn lane_number(&self, number: u32) -> Option<LaneNumber> {
        self.position(number).map(|idx| self.lanes[idx].lane_number())
    }

    pub fn next_lane(&self, lane_number: LaneNumber) -> Option<LaneNumber> {
        let idx = self.position(lane_number.get())?;
        Some(self.lanes[(idx + 1) % self.lanes.len()].lane_number())
    }

    pub fn previous_lane(&self, lane_number: LaneNumber) -> Option<LaneNumber> {
        let idx = self.position(lane_number.get())?;
        let len = self.lanes.len();
        Some(self.lanes[(idx + len - 1) % len].lane_number())
    }

    /// Iterates once around the ring starting at lane 1.
    pub fn iter(&self) -> RingIter<'_> {
        RingIter::new(&self.lanes, 0)
    }

    /// Iterates once around the ring starting at `start`, wrapping past the last lane.
    pub fn iter_from(&self, start: LaneNumber) -> Option<RingIter<'_>> {
        self.position(start.get())
            .map(|idx| RingIter::new(&self.lanes, idx))
    }

    /// Applies `visitor` to each lane exactly once, in ring order.
    pub fn for_each<F: FnMut(&Lane)>(&self, visitor: F) {
        self.iter().for_each(visitor);
    }

    /// Like [`LaneRing::for_each`] but starting anywhere on the ring.
    pub fn for_each_from<F: FnMut(&Lane)>(
        &self,
        start: LaneNumber,
        visitor: F,
    ) -> Result<(), SignalError> {
        let iter = self
            .iter_from(start)
            .ok_or_else(|| SignalError::InvalidInput(format!("{start} is not on this ring")))?;
        iter.for_each(visitor);
        Ok(())
    }

    pub fn for_each_mut<F: FnMut(&mut Lane)>(&mut self, visitor: F) {
        self.lanes.iter_mut().for_each(visitor);
    }

    /// Writes one lane's snapshot, rejecting values outside their domain.
    pub fn populate(
        &mut self,
        lane_number: u32,
        vehicle_count: i64,
        emergency_vehicle: i64,
    ) -> Result<(), SignalError> {
        let idx = self.position(lane_number).ok_or_else(|| {
            SignalError::InvalidInput(format!(
                "lane {lane_number} does not exist on a {} ({} lanes)",
                self.junction,
                self.lanes.len()
            ))
        })?;
        let count = u32::try_from(vehicle_count).map_err(|_| {
            SignalError::InvalidInput(format!(
                "vehicle count {vehicle_count} for lane {lane_number}"
            ))
        })?;
        let emergency = match emergency_vehicle {
            0 => false,
            1 => true,
            other => {
                return Err(SignalError::InvalidInput(format!(
                    "emergency flag {other} for lane {lane_number} (expected 0 or 1)"
                )))
            }
        };

        let lane = &mut self.lanes[idx];
        lane.vehicle_count = count;
        lane.emergency_vehicle = emergency;
        Ok(())
    }

    /// Writes a stored lane row through the same validation as [`LaneRing::populate`].
    pub fn populate_reading(&mut self, reading: &LaneReading) -> Result<(), SignalError> {
        let lane_number = u32::try_from(reading.lane_number).map_err(|_| {
            SignalError::InvalidInput(format!("lane number {}", reading.lane_number))
        })?;
        self.populate(lane_number, reading.vehicle_count, reading.emergency_vehicle)
    }

    /// Zeroes every lane's vehicle count and emergency flag.
    pub fn reset_inputs(&mut self) {
        self.for_each_mut(Lane::reset_inputs);
    }

    fn position(&self, number: u32) -> Option<usize> {
        let idx = (number as usize).checked_sub(1)?;
        (idx < self.lanes.len()).then_some(idx)
    }
}

/// Releases a ring if one is present.
pub fn destroy_ring(ring: Option<LaneRing>) {
    if let Some(ring) = ring {
        ring.destroy();
    }
}

/// One pass around the ring: yields exactly `lane_count` lanes and stops
/// when it is back at the lane it started from.
pub struct RingIter<'a> {
    lanes: &'a [Lane],
    start: usize,
    visited: usize,
}

impl<'a> RingIter<'a> {
    fn new(lanes: &'a [Lane], start: usize) -> Self {
        Self {
            lanes,
            start,
            visited: 0,
        }
    }
}

impl<'a> Iterator for RingIter<'a> {
    type Item = &'a Lane;

    fn next(&mut self) -> Option<Self::Item> {
        if self.visited == self.lanes.len() {
            return None;
        }
        let idx = (self.start + self.visited) % self.lanes.len();
        self.visited += 1;
        Some(&self.lanes[idx])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.lanes.len() - self.visited;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RingIter<'_> {}
