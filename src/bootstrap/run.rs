//! Engine wiring for the command line.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use cs_app::{EngineConfig, ReconnectStats, SyncEngine, SyncEngineHandle};
use cs_core::{ClipboardProviderPort, StatusSinkPort, TransportPort};
use cs_platform::{
    ChannelStatusSink, FanoutStatusSink, StatusUpdate, SystemClipboard, TracingStatusSink,
    WebSocketTransport,
};
use tokio::sync::watch;
use tracing::info;

/// Port implementations an engine runs against.
pub struct EngineAdapters {
    pub clipboard: Arc<dyn ClipboardProviderPort>,
    pub transport: Arc<dyn TransportPort>,
    pub status_sink: Arc<dyn StatusSinkPort>,
}

impl EngineAdapters {
    /// System clipboard and websocket transport. Status transitions are
    /// logged and also published on the returned receiver.
    pub fn system(config: &EngineConfig) -> anyhow::Result<(Self, watch::Receiver<StatusUpdate>)> {
        let clipboard =
            SystemClipboard::new().context("Failed to open the system clipboard")?;
        let (channel_sink, status_rx) = ChannelStatusSink::new();
        let status_sink = FanoutStatusSink::new()
            .with(Arc::new(TracingStatusSink))
            .with(Arc::new(channel_sink));

        let adapters = Self {
            clipboard: Arc::new(clipboard),
            transport: Arc::new(WebSocketTransport::new(config.connect_timeout)),
            status_sink: Arc::new(status_sink),
        };
        Ok((adapters, status_rx))
    }
}

pub fn start_engine(
    config: EngineConfig,
    adapters: EngineAdapters,
) -> anyhow::Result<SyncEngineHandle> {
    SyncEngine::new(
        config,
        adapters.clipboard,
        adapters.transport,
        adapters.status_sink,
    )
    .start()
    .context("Invalid sync configuration")
}

/// Run an engine until `shutdown` resolves, then stop it.
pub async fn run_until<F>(
    config: EngineConfig,
    adapters: EngineAdapters,
    shutdown: F,
) -> anyhow::Result<ReconnectStats>
where
    F: Future<Output = ()>,
{
    let handle = start_engine(config, adapters)?;
    shutdown.await;
    info!("Shutdown requested");

    let stats = handle.stop().await;
    info!(
        attempts = stats.connect_attempts,
        connections = stats.connections,
        "Engine stopped"
    );
    Ok(stats)
}
