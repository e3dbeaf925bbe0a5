use std::sync::Arc;
use std::time::Duration;

use hanyu_core::state::AppState;
use hanyu_types::AppEvent;
use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;

/// Feed page events from the bridge socket, or clipboard text when the
/// bridge is off
pub async fn watcher_io(
    state: Arc<AppState>,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (listen_to_ws, ws_url, delta_time) = {
        let config = state.config.read().await;
        (
            config.listen_to_ws,
            config.network.ws_url.clone(),
            Duration::from_millis(config.delta_time),
        )
    };

    if listen_to_ws {
        tracing::info!("Starting WebSocket listener on {}", ws_url);

        hanyu_io::ws::start_ws_listener(&ws_url, move |event| {
            let tx = event_tx.clone();
            tokio::spawn(async move {
                if let Err(e) = tx.send(event).await {
                    tracing::error!("Failed to send bridge event to overlay: {}", e);
                }
            });
        })
        .await?;

        cancel.cancelled().await;
        tracing::info!("WebSocket listener stopping");
    } else {
        tracing::info!("Starting clipboard watcher");

        let tx = event_tx.clone();
        tokio::select! {
            result = hanyu_io::clipboard::watch_clipboard(delta_time, move |event| {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = tx.send(event).await {
                        tracing::error!("Failed to send clipboard text to overlay: {}", e);
                    }
                });
            }) => {
                if let Err(e) = result {
                    tracing::error!("Clipboard watcher error: {}", e);
                }
            }
            _ = cancel.cancelled() => {
                tracing::info!("Clipboard watcher stopping");
            }
        }
    }

    Ok(())
}
