//! Tick sources that drive the engine
//!
//! The engine owns one scheduler. `start_game` starts it (cancelling any
//! previous registration) and a collision stops it. The scheduler itself never
//! touches game state: `IntervalScheduler` only emits `Tick` messages, and the
//! owner of the engine turns each message into a call to `tick()`.

use log::debug;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Control points the engine needs from a tick source
pub trait TickScheduler {
    /// Begin ticking at `period`, replacing any previous registration
    fn start(&mut self, period: Duration);
    /// Stop ticking. Calling it when already stopped does nothing.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Scheduler without a timer, for callers that invoke `tick()` themselves
#[derive(Debug, Default, Clone)]
pub struct IdleScheduler {
    running: bool,
    period: Option<Duration>,
    starts: usize,
}

impl IdleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Period of the most recent `start`
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// How many times `start` has been called
    pub fn start_count(&self) -> usize {
        self.starts
    }
}

impl TickScheduler for IdleScheduler {
    fn start(&mut self, period: Duration) {
        self.running = true;
        self.period = Some(period);
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// One timer firing. `generation` identifies the `start` call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Tokio interval that sends a `Tick` down a channel every period
pub struct IntervalScheduler {
    sender: UnboundedSender<Tick>,
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl IntervalScheduler {
    /// Create the scheduler and the receiving end of its tick channel
    pub fn new() -> (Self, UnboundedReceiver<Tick>) {
        let (sender, receiver) = unbounded_channel();
        let scheduler = Self {
            sender,
            task: None,
            generation: 0,
        };
        (scheduler, receiver)
    }

    /// True if the tick came from the current registration.
    ///
    /// Ticks already queued when the scheduler was restarted or stopped are stale.
    pub fn is_current(&self, tick: Tick) -> bool {
        self.task.is_some() && tick.generation == self.generation
    }
}

impl TickScheduler for IntervalScheduler {
    fn start(&mut self, period: Duration) {
        self.stop();
        self.generation += 1;

        let sender = self.sender.clone();
        let generation = self.generation;
        debug!("Starting tick stream {} every {:?}", generation, period);

        self.task = Some(tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval fires immediately
            timer.tick().await;

            loop {
                timer.tick().await;
                if sender.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Stopping tick stream {}", self.generation);
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[test]
    fn test_idle_scheduler_tracks_state() {
        let mut scheduler = IdleScheduler::new();
        assert!(!scheduler.is_running());

        scheduler.start(Duration::from_millis(200));
        assert!(scheduler.is_running());
        assert_eq!(scheduler.period(), Some(Duration::from_millis(200)));

        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.start_count(), 1);
    }

    #[tokio::test]
    async fn test_interval_scheduler_emits_ticks() {
        let (mut scheduler, mut ticks) = IntervalScheduler::new();
        scheduler.start(Duration::from_millis(5));

        let tick = timeout(Duration::from_secs(2), ticks.recv())
            .await
            .expect("no tick within timeout")
            .expect("channel closed");

        assert!(scheduler.is_current(tick));
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert!(!scheduler.is_current(tick));
    }

    #[tokio::test]
    async fn test_restart_makes_old_ticks_stale() {
        let (mut scheduler, mut ticks) = IntervalScheduler::new();
        scheduler.start(Duration::from_millis(5));

        let old = timeout(Duration::from_secs(2), ticks.recv())
            .await
            .unwrap()
            .unwrap();

        scheduler.start(Duration::from_millis(5));
        assert!(scheduler.is_running());
        assert!(!scheduler.is_current(old));

        // Skip anything the first stream queued before it was aborted
        let fresh = loop {
            let tick = timeout(Duration::from_secs(2), ticks.recv())
                .await
                .unwrap()
                .unwrap();
            if scheduler.is_current(tick) {
                break tick;
            }
        };
        assert_eq!(fresh.generation, old.generation + 1);
    }
}
