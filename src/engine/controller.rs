use crate::control_system::SignalAllocator;
use crate::data_sources::LaneDataSource;
use crate::error::SignalError;
use crate::intersection::LaneRing;
use crate::monitoring::{draw_signal_chart, write_report, ReportFormat};
use crate::shared_data::CycleReport;
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::task;
use tokio::time::{sleep, Duration};

/// Owns the lane ring and drives it through complete cycles:
/// fetch a snapshot, allocate, report.
pub struct SignalController {
    ring: LaneRing,
    allocator: SignalAllocator,
    source: Box<dyn LaneDataSource + Send>,
    output: Box<dyn Write + Send>,
    format: ReportFormat,
    chart: Option<PathBuf>,
}

impl SignalController {
    pub fn new(
        ring: LaneRing,
        allocator: SignalAllocator,
        source: Box<dyn LaneDataSource + Send>,
    ) -> Self {
        Self {
            ring,
            allocator,
            source,
            output: Box::new(io::stdout()),
            format: ReportFormat::Text,
            chart: None,
        }
    }

    pub fn with_output(mut self, output: Box<dyn Write + Send>, format: ReportFormat) -> Self {
        self.output = output;
        self.format = format;
        self
    }

    /// Redraws a PNG chart of the latest cycle at `path`.
    pub fn with_chart(mut self, path: PathBuf) -> Self {
        self.chart = Some(path);
        self
    }

    pub fn ring(&self) -> &LaneRing {
        &self.ring
    }

    pub fn into_ring(self) -> LaneRing {
        self.ring
    }

    /// Runs one full cycle. Nothing in here awaits, so a started cycle always completes.
    pub fn run_once(&mut self) -> Result<CycleReport, SignalError> {
        self.source.fetch(&mut self.ring)?;
        let report = self.allocator.run_cycle(&mut self.ring);
        write_report(&mut self.output, &report, self.format)?;
        self.output.flush()?;

        if let Some(path) = &self.chart {
            if let Err(e) = draw_signal_chart(path, &report) {
                log::warn!("Failed to draw signal chart {}: {}", path.display(), e);
            }
        }
        Ok(report)
    }
}

/// Repeats cycles every `interval` until `max_cycles` have run or Ctrl-C is pressed.
///
/// Each cycle runs on the blocking pool while holding the controller lock;
/// the wait between cycles happens outside it. Returns the number of cycles completed.
pub async fn run_controller_loop(
    controller: Arc<Mutex<SignalController>>,
    max_cycles: Option<u64>,
    interval: Duration,
) -> Result<u64, SignalError> {
    run_controller_loop_until(controller, max_cycles, interval, tokio::signal::ctrl_c()).await
}

/// Like [`run_controller_loop`], but stops once `shutdown` resolves.
///
/// The same `shutdown` future is polled across every wait, so a request
/// that arrives while a cycle is running stops the loop after that cycle.
pub async fn run_controller_loop_until<F: Future>(
    controller: Arc<Mutex<SignalController>>,
    max_cycles: Option<u64>,
    interval: Duration,
    shutdown: F,
) -> Result<u64, SignalError> {
    let mut completed = 0u64;
    log::info!(
        "Starting signal controller (interval {:?}, cycles {:?})",
        interval,
        max_cycles
    );
    tokio::pin!(shutdown);

    while max_cycles.map_or(true, |max| completed < max) {
        let ctrl = Arc::clone(&controller);
        task::spawn_blocking(move || {
            let mut ctrl = ctrl
                .lock()
                .map_err(|e| SignalError::Task(format!("controller lock poisoned: {e}")))?;
            ctrl.run_once()
        })
        .await
        .map_err(|e| SignalError::Task(e.to_string()))??;
        completed += 1;

        if max_cycles.is_some_and(|max| completed >= max) {
            break;
        }
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                log::info!("Interrupted after {} cycles", completed);
                break;
            }
            _ = sleep(interval) => {}
        }
    }
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_sources::RandomTrafficSource;
    use crate::intersection::JunctionType;
    use crate::shared_data::LaneReading;

    /// Replays fixed snapshots, one per cycle, then fails.
    struct Replay {
        snapshots: Vec<Vec<LaneReading>>,
    }

    impl LaneDataSource for Replay {
        fn name(&self) -> &str {
            "replay"
        }

        fn fetch(&mut self, ring: &mut LaneRing) -> Result<(), SignalError> {
            if self.snapshots.is_empty() {
                return Err(SignalError::InvalidInput("no more snapshots".to_string()));
            }
            let snapshot = self.snapshots.remove(0);
            crate::data_sources::csv_store::apply_readings(ring, &snapshot)
        }
    }

    fn reading(lane_number: i64, vehicle_count: i64, emergency_vehicle: i64) -> LaneReading {
        LaneReading {
            lane_number,
            vehicle_count,
            emergency_vehicle,
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn controller(source: Box<dyn LaneDataSource + Send>, out: SharedBuffer) -> SignalController {
        let ring = LaneRing::create(JunctionType::TJunction).unwrap();
        SignalController::new(ring, SignalAllocator::default(), source)
            .with_output(Box::new(out), ReportFormat::Text)
    }

    #[test]
    fn test_run_once_reports_cycle() {
        let source = Replay {
            snapshots: vec![vec![reading(1, 10, 0), reading(2, 5, 1), reading(3, 5, 0)]],
        };
        let out = SharedBuffer::default();
        let mut ctrl = controller(Box::new(source), out.clone());

        let report = ctrl.run_once().unwrap();
        assert_eq!(report.sequence.to_string(), "Lane 2 > Lane 1 > Lane 3");
        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("Priority Sequence: Lane 2 > Lane 1 > Lane 3"));
    }

    #[test]
    fn test_failed_fetch_keeps_previous_snapshot() {
        let source = Replay {
            snapshots: vec![vec![reading(1, 4, 0)], vec![reading(1, -2, 0)]],
        };
        let mut ctrl = controller(Box::new(source), SharedBuffer::default());
        ctrl.run_once().unwrap();
        assert!(matches!(ctrl.run_once(), Err(SignalError::InvalidInput(_))));
        assert_eq!(ctrl.ring().head().vehicle_count(), 4);
    }

    #[tokio::test]
    async fn test_loop_stops_after_max_cycles() {
        let out = SharedBuffer::default();
        let ctrl = Arc::new(Mutex::new(controller(
            Box::new(RandomTrafficSource::seeded(5)),
            out.clone(),
        )));

        let completed = run_controller_loop(Arc::clone(&ctrl), Some(3), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(completed, 3);

        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("Priority Sequence:").count(), 3);
    }

    #[tokio::test]
    async fn test_loop_propagates_source_errors() {
        let source = Replay {
            snapshots: vec![vec![reading(1, 1, 0)]],
        };
        let ctrl = Arc::new(Mutex::new(controller(
            Box::new(source),
            SharedBuffer::default(),
        )));
        let result = run_controller_loop(ctrl, Some(5), Duration::ZERO).await;
        assert!(matches!(result, Err(SignalError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_loop_stops_when_shutdown_resolves() {
        let out = SharedBuffer::default();
        let ctrl = Arc::new(Mutex::new(controller(
            Box::new(RandomTrafficSource::seeded(11)),
            out.clone(),
        )));

        let completed = run_controller_loop_until(
            ctrl,
            None,
            Duration::from_secs(3600),
            std::future::ready(()),
        )
        .await
        .unwrap();
        assert_eq!(completed, 1);

        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("Priority Sequence:").count(), 1);
    }

    #[tokio::test]
    async fn test_pending_shutdown_runs_to_max_cycles() {
        let ctrl = Arc::new(Mutex::new(controller(
            Box::new(RandomTrafficSource::seeded(12)),
            SharedBuffer::default(),
        )));
        let completed = run_controller_loop_until(
            ctrl,
            Some(4),
            Duration::ZERO,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();
        assert_eq!(completed, 4);
    }
}
