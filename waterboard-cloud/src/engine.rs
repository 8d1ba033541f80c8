//! Sync engine event loop.
//!
//! Listens for connectivity events and manual sync commands and runs the
//! coordinator's push-then-pull sequence. A reconnect is followed by a
//! settling delay before the first attempt, and queued reconnect signals
//! are coalesced after each cycle so a flaky link triggers one sync, not
//! many.

use crate::sync::SyncCoordinator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Commands sent to the sync engine.
#[derive(Debug)]
pub enum SyncCommand {
    /// Run push-then-pull immediately (manual sync from the UI).
    SyncNow,
    Stop,
}

/// Connectivity transitions reported by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

/// Handle for sending commands to the sync engine.
#[derive(Clone)]
pub struct SyncHandle {
    command_tx: mpsc::Sender<SyncCommand>,
}

impl SyncHandle {
    pub async fn sync_now(&self) -> bool {
        self.command_tx.send(SyncCommand::SyncNow).await.is_ok()
    }

    pub async fn stop(&self) -> bool {
        self.command_tx.send(SyncCommand::Stop).await.is_ok()
    }
}

/// Creates the sync engine, its command handle, and the connectivity sender.
pub fn create_sync_engine(
    coordinator: Arc<SyncCoordinator>,
    settle_delay: Duration,
) -> (SyncHandle, mpsc::Sender<ConnectivityEvent>, SyncEngine) {
    let (command_tx, command_rx) = mpsc::channel(16);
    let (connectivity_tx, connectivity_rx) = mpsc::channel(16);

    let handle = SyncHandle { command_tx };
    let engine = SyncEngine {
        coordinator,
        command_rx,
        connectivity_rx,
        settle_delay,
    };

    (handle, connectivity_tx, engine)
}

/// Event loop driving the sync coordinator.
pub struct SyncEngine {
    coordinator: Arc<SyncCoordinator>,
    command_rx: mpsc::Receiver<SyncCommand>,
    connectivity_rx: mpsc::Receiver<ConnectivityEvent>,
    settle_delay: Duration,
}

impl SyncEngine {
    /// Runs until stopped or all senders are dropped.
    pub async fn run(mut self) {
        info!("sync engine started");

        loop {
            tokio::select! {
                Some(event) = self.connectivity_rx.recv() => {
                    match event {
                        ConnectivityEvent::Online => {
                            debug!("network reconnected, settling before sync");
                            tokio::time::sleep(self.settle_delay).await;
                            self.sync_cycle().await;
                            self.drain_connectivity();
                        }
                        ConnectivityEvent::Offline => {
                            debug!("network went offline");
                        }
                    }
                }
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SyncCommand::SyncNow) => {
                            self.sync_cycle().await;
                        }
                        Some(SyncCommand::Stop) => {
                            info!("sync engine stopping");
                            break;
                        }
                        None => {
                            info!("command channel closed, stopping sync engine");
                            break;
                        }
                    }
                }
            }
        }

        info!("sync engine stopped");
    }

    /// Push first so local edits reach the remote before it is treated as
    /// authoritative, then pull.
    async fn sync_cycle(&self) {
        let pushed = self.coordinator.push_local_to_remote().await;
        let pulled = self.coordinator.pull_remote_to_local().await;
        debug!(
            "sync cycle done: pushed {} skipped {} failed {} / pulled {} failed {}",
            pushed.pushed, pushed.skipped, pushed.failed, pulled.pulled, pulled.failed
        );
    }

    /// Drops reconnect signals that queued up during a cycle. The cycle
    /// that just ran already reflects the reconnected state.
    fn drain_connectivity(&mut self) {
        while self.connectivity_rx.try_recv().is_ok() {}
    }
}
