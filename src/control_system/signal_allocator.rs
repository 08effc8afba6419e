use crate::control_system::config::AllocatorConfig;
use crate::control_system::sequencer::DispatchSequence;
use crate::intersection::{GreenTime, LaneRing, Priority};
use crate::shared_data::{CycleReport, SignalTiming};

/// Computes green time, red time and priority for every lane of a ring,
/// then orders the lanes for dispatch.
///
/// The result depends only on the ring's current snapshot; the only state
/// carried between cycles is each lane's waiting-time counter.
#[derive(Debug, Clone, Default)]
pub struct SignalAllocator {
    config: AllocatorConfig,
}

impl SignalAllocator {
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Runs one evaluation cycle over the ring's current snapshot.
    pub fn run_cycle(&self, ring: &mut LaneRing) -> CycleReport {
        let total_vehicles = total_vehicles(ring);
        let total_time = self.allocate_green(ring, total_vehicles);
        assign_red_and_priority(ring, total_time);

        let sequence = DispatchSequence::from_ring(ring);
        update_waiting_times(ring, &sequence);

        log::info!(
            "{} cycle: {} vehicles, {}s total green, sequence {}",
            ring.junction_type(),
            total_vehicles,
            total_time,
            sequence
        );

        CycleReport {
            junction: ring.junction_type(),
            total_vehicles,
            total_time,
            timings: ring.iter().map(SignalTiming::from).collect(),
            sequence,
        }
    }

    /// Second pass: shares the green budget out in proportion to waiting
    /// vehicles and returns the cycle's total green seconds.
    ///
    /// Shares use largest-remainder apportionment, so when no lane is
    /// preempted they add up to the budget exactly.
    fn allocate_green(&self, ring: &mut LaneRing, total_vehicles: u64) -> u64 {
        let budget = self.config.scale_factor(ring.lane_count());
        let preemption = self.config.preemption_green_time;
        let idle = self.config.idle_green_time;

        let shares = if total_vehicles == 0 {
            log::debug!("No vehicles waiting, idle green time {}s", idle);
            vec![u64::from(idle); ring.lane_count()]
        } else {
            let counts: Vec<u64> = ring.iter().map(|lane| u64::from(lane.vehicle_count())).collect();
            apportion(&counts, budget)
        };

        let mut shares = shares.into_iter();
        let mut total_time = 0u64;
        ring.for_each_mut(|lane| {
            let share = shares.next().unwrap_or_default();
            lane.green_time = if lane.emergency_vehicle {
                GreenTime::Preemption(preemption)
            } else {
                GreenTime::Proportional(u32::try_from(share).unwrap_or(u32::MAX))
            };
            total_time += u64::from(lane.green_time.seconds());

            log::debug!(
                "{}: {} vehicles, green {:?}",
                lane.lane_number(),
                lane.vehicle_count,
                lane.green_time
            );
        });
        total_time
    }
}

/// Runs one cycle with the given configuration.
pub fn run_cycle(ring: &mut LaneRing, config: &AllocatorConfig) -> CycleReport {
    SignalAllocator::new(config.clone()).run_cycle(ring)
}

/// First pass: vehicles waiting across the whole intersection.
fn total_vehicles(ring: &LaneRing) -> u64 {
    let mut total = 0u64;
    ring.for_each(|lane| total += u64::from(lane.vehicle_count()));
    total
}

/// Third pass: red time is the rest of the cycle.
fn assign_red_and_priority(ring: &mut LaneRing, total_time: u64) {
    ring.for_each_mut(|lane| {
        let green = u64::from(lane.green_time.seconds());
        lane.red_time = u32::try_from(total_time - green).unwrap_or(u32::MAX);
        lane.priority = if lane.emergency_vehicle {
            Priority::Emergency
        } else {
            Priority::Normal(lane.vehicle_count)
        };
    });
}

/// The lane served first starts waiting afresh; every other lane sits through its red time.
fn update_waiting_times(ring: &mut LaneRing, sequence: &DispatchSequence) {
    let served = sequence.first();
    ring.for_each_mut(|lane| {
        if Some(lane.lane_number()) == served {
            lane.mark_serviced();
        } else {
            let red = lane.red_time;
            lane.accrue_wait(red);
        }
    });
}

/// Splits `budget` seconds over `counts` by largest remainder.
///
/// Every lane gets the floor of its exact share; the seconds left over go one
/// each to the largest remainders, ties to the later lane in ring order.
/// A lane with more vehicles never gets less than a lane with fewer.
fn apportion(counts: &[u64], budget: u64) -> Vec<u64> {
    let total: u128 = counts.iter().map(|&c| u128::from(c)).sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let mut shares = Vec::with_capacity(counts.len());
    let mut remainders = Vec::with_capacity(counts.len());
    for (idx, &count) in counts.iter().enumerate() {
        let exact = u128::from(count) * u128::from(budget);
        // Each floor is at most `budget`, which is a u64.
        shares.push(u64::try_from(exact / total).unwrap_or(budget));
        remainders.push((exact % total, idx));
    }

    let allotted: u64 = shares.iter().sum();
    let leftover = budget.saturating_sub(allotted) as usize;
    remainders.sort_unstable_by(|a, b| b.cmp(a));
    for &(_, idx) in remainders.iter().take(leftover) {
        shares[idx] += 1;
    }
    shares
}
