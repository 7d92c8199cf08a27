use crate::engine::ScreeningEngine;
use crate::schedule::RefreshSchedule;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

/// Cloneable control handle for a running scheduler
#[derive(Clone)]
pub struct RefreshHandle {
    trigger: Arc<Notify>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl RefreshHandle {
    /// Request an immediate reload. Triggers that arrive while one is already
    /// pending collapse into it.
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    /// Stop the loop once any in-flight reload has finished
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

/// Drives `ScreeningEngine::reload` on a schedule and on demand.
pub struct RefreshScheduler {
    engine: Arc<ScreeningEngine>,
    schedule: RefreshSchedule,
    handle: RefreshHandle,
    shutdown_rx: watch::Receiver<bool>,
}

impl RefreshScheduler {
    pub fn new(engine: Arc<ScreeningEngine>, schedule: RefreshSchedule) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            engine,
            schedule,
            handle: RefreshHandle {
                trigger: Arc::new(Notify::new()),
                shutdown: Arc::new(shutdown_tx),
            },
            shutdown_rx,
        }
    }

    pub fn handle(&self) -> RefreshHandle {
        self.handle.clone()
    }

    /// Run the loop on a new task.
    pub fn spawn(self) -> (RefreshHandle, JoinHandle<()>) {
        let handle = self.handle();
        (handle, tokio::spawn(self.run()))
    }

    pub async fn run(mut self) {
        let mut next_due = self.schedule.next_after(Utc::now());
        tracing::info!(
            "Refresh scheduler started ({}), next reload at {}",
            self.schedule,
            next_due.to_rfc3339()
        );

        loop {
            if *self.shutdown_rx.borrow() {
                break;
            }

            let wait = (next_due - Utc::now()).to_std().unwrap_or_default();

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    self.reload("scheduled").await;
                    next_due = self.schedule.next_after_due(next_due, Utc::now());
                    tracing::info!("Next scheduled reload at {}", next_due.to_rfc3339());
                }
                _ = self.handle.trigger.notified() => {
                    self.reload("manual").await;
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Refresh scheduler stopped");
    }

    async fn reload(&self, reason: &str) {
        match self.engine.reload().await {
            Ok(stats) => tracing::info!(
                "{} reload complete: {} sanctions, {} PEPs",
                reason,
                stats.sanctions_count,
                stats.peps_count
            ),
            Err(e) => tracing::error!("{} reload failed: {}", reason, e),
        }
    }
}
