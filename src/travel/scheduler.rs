//! Shuttle availability schedule.
//!
//! Every period each travel point with a bound shuttle flips between
//! *available* (shuttle posture [`ShuttlePosture::Idle`]) and *departed*
//! ([`ShuttlePosture::Departed`]). Points without a shuttle are never touched.
//!
//! The timer runs as one tokio task. Ticks follow a fixed-rate grid; a tick that
//! overruns makes the next grid slots be skipped rather than fired in a burst.
//! Control goes through [`ShuttleScheduleHandle`].

use chrono::{DateTime, Utc};
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};

use super::registry::TravelPointRegistry;
use super::types::{ShuttlePosture, TravelPoint, DEFAULT_SHUTTLE_INTERVAL_SECS};
use crate::logutil::escape_log;

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Shuttles that took off (available -> departed).
    pub departed: usize,
    /// Shuttles that landed (departed -> available).
    pub arrived: usize,
    /// Points without a shuttle.
    pub skipped: usize,
}

/// Flip one point. Returns the posture written, or `None` when the point has no shuttle.
///
/// Flag and posture are changed under the point's lock.
pub fn toggle_point(point: &TravelPoint) -> Option<ShuttlePosture> {
    let mut state = point.state();
    let shuttle = state.shuttle.clone()?;
    let posture = if state.available {
        ShuttlePosture::Departed
    } else {
        ShuttlePosture::Idle
    };
    shuttle.set_posture(posture);
    state.available = posture == ShuttlePosture::Idle;
    debug!(
        "Shuttle at {} is {}",
        escape_log(point.name()),
        if state.available { "available" } else { "not available" }
    );
    Some(posture)
}

pub struct ShuttleScheduler {
    registry: Arc<TravelPointRegistry>,
}

impl ShuttleScheduler {
    pub fn new(registry: Arc<TravelPointRegistry>) -> Self {
        Self { registry }
    }

    /// Flip every shuttle-bound point once.
    pub fn tick(&self) -> TickReport {
        let mut report = TickReport::default();
        // Map lock is only held while cloning the handles.
        for point in self.registry.all_points() {
            match toggle_point(&point) {
                Some(ShuttlePosture::Departed) => report.departed += 1,
                Some(ShuttlePosture::Idle) => report.arrived += 1,
                None => report.skipped += 1,
            }
        }
        debug!(
            "shuttle tick: departed={} arrived={} skipped={}",
            report.departed, report.arrived, report.skipped
        );
        report
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShuttleScheduleConfig {
    pub period: Duration,
}

impl Default for ShuttleScheduleConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(DEFAULT_SHUTTLE_INTERVAL_SECS),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleStats {
    pub ticks: u64,
    pub departures: u64,
    pub arrivals: u64,
    pub last_tick: Option<DateTime<Utc>>,
}

enum ScheduleCommand {
    Snapshot(oneshot::Sender<ScheduleStats>),
    Shutdown(oneshot::Sender<()>),
}

#[derive(Clone, Debug)]
pub struct ShuttleScheduleHandle {
    tx: mpsc::UnboundedSender<ScheduleCommand>,
}

impl ShuttleScheduleHandle {
    /// Stop the timer task and wait until it has exited.
    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        if self.tx.send(ScheduleCommand::Shutdown(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    pub async fn snapshot(&self) -> Option<ScheduleStats> {
        let (tx, rx) = oneshot::channel();
        if self.tx.send(ScheduleCommand::Snapshot(tx)).is_ok() {
            rx.await.ok()
        } else {
            None
        }
    }
}

/// Spawn the shuttle timer on the current tokio runtime. The first tick fires one
/// full period after start. Dropping every handle leaves the timer running.
pub fn start_shuttle_schedule(
    registry: Arc<TravelPointRegistry>,
    cfg: ShuttleScheduleConfig,
) -> ShuttleScheduleHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<ScheduleCommand>();
    let handle = ShuttleScheduleHandle { tx };
    let scheduler = ShuttleScheduler::new(registry);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + cfg.period, cfg.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut stats = ScheduleStats::default();
        loop {
            tokio::select! {
                Some(cmd) = rx.recv() => {
                    match cmd {
                        ScheduleCommand::Snapshot(resp) => { let _ = resp.send(stats.clone()); }
                        ScheduleCommand::Shutdown(done) => { let _ = done.send(()); break; }
                    }
                }
                _ = interval.tick() => {
                    let report = scheduler.tick();
                    stats.ticks += 1;
                    stats.departures += report.departed as u64;
                    stats.arrivals += report.arrived as u64;
                    stats.last_tick = Some(Utc::now());
                }
            }
        }
        debug!("shuttle schedule terminated after {} ticks", stats.ticks);
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::travel::interfaces::Shuttle;
    use crate::travel::types::{ObjectId, Planet};
    use std::sync::atomic::{AtomicU8, Ordering};

    struct TestShuttle(AtomicU8);

    impl Shuttle for TestShuttle {
        fn object_id(&self) -> ObjectId {
            1
        }
        fn set_posture(&self, posture: ShuttlePosture) {
            self.0.store(posture.code(), Ordering::SeqCst);
        }
    }

    #[test]
    fn toggle_flips_flag_and_posture_together() {
        let planet = Planet::new(0, "naboo");
        let reg = TravelPointRegistry::new();
        let point = reg.add_travel_point(&planet, "Theed", 0.0, 0.0, 0.0);
        let shuttle = Arc::new(TestShuttle(AtomicU8::new(99)));
        reg.bind_shuttle(&planet, "Theed", shuttle.clone()).unwrap();
        assert_eq!(shuttle.0.load(Ordering::SeqCst), 0);

        assert_eq!(toggle_point(&point), Some(ShuttlePosture::Departed));
        assert!(!point.is_shuttle_available());
        assert_eq!(shuttle.0.load(Ordering::SeqCst), 2);

        assert_eq!(toggle_point(&point), Some(ShuttlePosture::Idle));
        assert!(point.is_shuttle_available());
        assert_eq!(shuttle.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn toggle_skips_points_without_shuttle() {
        let planet = Planet::new(0, "naboo");
        let reg = TravelPointRegistry::new();
        let point = reg.add_travel_point(&planet, "Keren", 0.0, 0.0, 0.0);
        assert_eq!(toggle_point(&point), None);
        assert!(point.is_shuttle_available());
    }

    #[test]
    fn default_period_is_one_minute() {
        assert_eq!(ShuttleScheduleConfig::default().period, Duration::from_secs(60));
    }
}
