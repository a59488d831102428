//! Engine lifecycle.
//!
//! [`SyncEngine::start`] validates the configuration, wires one detector,
//! session, coordinator and controller together and spawns their loops. The
//! returned [`SyncEngineHandle`] is the only way to observe or stop them.

use std::sync::Arc;
use std::time::Duration;

use cs_core::{
    ClipboardProviderPort, ConfigurationError, ConnectionStatus, EndpointTag, ServerAddress,
    StatusSinkPort, TransportPort,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::state::{new_shared_state, SharedSyncState};
use crate::usecases::sync::{
    ChangeDetector, ReconnectStats, ReconnectionController, SyncCoordinator, SyncSession,
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Validated engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server: ServerAddress,
    pub endpoint_tag: EndpointTag,
    pub poll_interval: Duration,
    pub reconnect_delay: Duration,
    pub connect_timeout: Duration,
}

impl EngineConfig {
    /// Settings with default timings.
    pub fn new(server: ServerAddress, endpoint_tag: EndpointTag) -> Self {
        Self {
            server,
            endpoint_tag,
            poll_interval: DEFAULT_POLL_INTERVAL,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("poll_interval", self.poll_interval),
            ("reconnect_delay", self.reconnect_delay),
            ("connect_timeout", self.connect_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigurationError::ZeroDuration { name });
            }
        }
        Ok(())
    }
}

/// A configured, not yet running engine.
pub struct SyncEngine {
    config: EngineConfig,
    clipboard: Arc<dyn ClipboardProviderPort>,
    transport: Arc<dyn TransportPort>,
    status_sink: Arc<dyn StatusSinkPort>,
}

impl SyncEngine {
    pub fn new(
        config: EngineConfig,
        clipboard: Arc<dyn ClipboardProviderPort>,
        transport: Arc<dyn TransportPort>,
        status_sink: Arc<dyn StatusSinkPort>,
    ) -> Self {
        Self {
            config,
            clipboard,
            transport,
            status_sink,
        }
    }

    /// Spawn the detector and controller loops on the current runtime.
    ///
    /// Fails before any connection attempt when the configuration is invalid.
    pub fn start(self) -> Result<SyncEngineHandle, ConfigurationError> {
        self.config.validate()?;

        let state = new_shared_state();
        let session = Arc::new(SyncSession::new(
            self.transport,
            self.config.endpoint_tag.clone(),
            self.config.connect_timeout,
        ));
        let coordinator = Arc::new(SyncCoordinator::new(
            Arc::clone(&self.clipboard),
            Arc::clone(&session),
            state.clone(),
        ));
        let detector = ChangeDetector::new(
            self.clipboard,
            state.clone(),
            self.config.poll_interval,
        );
        let controller = ReconnectionController::new(
            self.config.server.clone(),
            session,
            Arc::clone(&coordinator),
            state.clone(),
            self.status_sink,
            self.config.reconnect_delay,
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let detector_task = tokio::spawn(detector.run(coordinator, shutdown_rx.clone()));
        let controller_task = tokio::spawn(controller.run(shutdown_rx));

        info!(
            server = %self.config.server,
            tag = %self.config.endpoint_tag,
            "Sync engine started"
        );

        Ok(SyncEngineHandle {
            state,
            shutdown_tx,
            detector_task,
            controller_task,
        })
    }
}

/// Running engine. Dropping the handle also stops the engine, without
/// waiting for it.
pub struct SyncEngineHandle {
    state: SharedSyncState,
    shutdown_tx: watch::Sender<bool>,
    detector_task: JoinHandle<()>,
    controller_task: JoinHandle<ReconnectStats>,
}

impl SyncEngineHandle {
    pub async fn status(&self) -> ConnectionStatus {
        self.state.lock().await.status
    }

    /// Signal shutdown and wait for both loops to finish.
    pub async fn stop(self) -> ReconnectStats {
        let _ = self.shutdown_tx.send(true);

        if let Err(err) = self.detector_task.await {
            warn!(error = %err, "Change detector task ended abnormally");
        }
        let stats = match self.controller_task.await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(error = %err, "Reconnection controller task ended abnormally");
                ReconnectStats::default()
            }
        };

        info!("Sync engine stopped");
        stats
    }
}
