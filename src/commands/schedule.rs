//! Fixed-interval pass scheduler
//!
//! The first pass starts immediately, then one per interval. Passes run on
//! the blocking pool behind a [`PassGate`]; a tick that finds the previous
//! pass still running is dropped rather than queued.

use crate::commands::sync::{self, PassGate};
use crate::logging::LogSink;
use crate::Config;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Counters for a scheduler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub passes_completed: usize,
    pub passes_aborted: usize,
    pub ticks_skipped: usize,
}

#[derive(Debug, Default)]
struct Counters {
    completed: AtomicUsize,
    aborted: AtomicUsize,
    skipped: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            passes_completed: self.completed.load(Ordering::Relaxed),
            passes_aborted: self.aborted.load(Ordering::Relaxed),
            ticks_skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

pub struct Scheduler {
    config: Config,
    log: Arc<dyn LogSink>,
    gate: PassGate,
    counters: Arc<Counters>,
}

impl Scheduler {
    pub fn new(config: Config, log: Arc<dyn LogSink>) -> Self {
        Self {
            config,
            log,
            gate: PassGate::new(),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Handle on the gate shared with every pass this scheduler starts
    pub fn gate(&self) -> PassGate {
        self.gate.clone()
    }

    /// Run until ctrl-c
    pub async fn run(self) -> SchedulerStats {
        self.run_until(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("received ctrl-c, stopping after the current pass"),
                Err(err) => tracing::error!("ctrl-c handler failed: {err}"),
            }
        })
        .await
    }

    /// Run until `shutdown` resolves, then wait for the in-flight pass
    pub async fn run_until<F>(self, shutdown: F) -> SchedulerStats
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut in_flight: Option<JoinHandle<()>> = None;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    let Some(guard) = self.gate.try_enter() else {
                        self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                        tracing::debug!("previous pass still running; tick dropped");
                        continue;
                    };

                    let config = self.config.clone();
                    let log = Arc::clone(&self.log);
                    let counters = Arc::clone(&self.counters);
                    in_flight = Some(tokio::task::spawn_blocking(move || {
                        let _guard = guard;
                        log.log("Pass started");
                        match sync::run(&config, log.as_ref()) {
                            Ok(_) => counters.completed.fetch_add(1, Ordering::Relaxed),
                            Err(_) => counters.aborted.fetch_add(1, Ordering::Relaxed),
                        };
                    }));
                }
            }
        }

        if let Some(handle) = in_flight {
            if let Err(err) = handle.await {
                tracing::error!("pass task failed: {err}");
            }
        }
        self.counters.snapshot()
    }
}
